//! Mapping between on-disk point records and working points.
//!
//! Coordinates: `working = raw + offset / scale` per axis, inverted with
//! rounding so that `encode_xyz(decode_xyz(raw)) == raw` for every `i32`
//! input.
//!
//! Colors: `working = raw / 256` and `raw = working * 256`. This pair is
//! lossy: decoding drops the low byte of each 16-bit channel and encoding
//! cannot recover it, so `encode_color(decode_color(c))` is `c` with its low
//! byte cleared.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::pointcloud::header::PointCloudHeader;
use crate::pointcloud::point::{RawPointRecord, WorkingPoint};

pub const DEFAULT_PARALLEL_MIN_LEN: usize = 4096;

const COLOR_SHIFT: u32 = 8;

pub fn decode_xyz(raw: [i64; 3], header: &PointCloudHeader) -> [f64; 3] {
    let shift = header.shift();
    [
        raw[0] as f64 + shift[0],
        raw[1] as f64 + shift[1],
        raw[2] as f64 + shift[2],
    ]
}

pub fn encode_xyz(xyz: [f64; 3], header: &PointCloudHeader) -> [i64; 3] {
    let shift = header.shift();
    [
        (xyz[0] - shift[0]).round() as i64,
        (xyz[1] - shift[1]).round() as i64,
        (xyz[2] - shift[2]).round() as i64,
    ]
}

pub fn decode_color(rgb: [u16; 3]) -> [u8; 3] {
    rgb.map(|c| u8::try_from(c >> COLOR_SHIFT).unwrap_or(u8::MAX))
}

pub fn encode_color(rgb: [u8; 3]) -> [u16; 3] {
    rgb.map(|c| u16::from(c).saturating_mul(1 << COLOR_SHIFT))
}

pub fn decode_point(record: &RawPointRecord, header: &PointCloudHeader) -> WorkingPoint {
    WorkingPoint::new(
        decode_xyz(record.xyz(), header),
        decode_color(record.rgb()),
    )
}

/// Fails with [`Error::InvalidArgument`] when a coordinate is not finite or
/// does not fit the stored `i32` after encoding.
pub fn encode_point(point: &WorkingPoint, header: &PointCloudHeader) -> Result<RawPointRecord> {
    if let Some(axis) = point.xyz().iter().position(|v| !v.is_finite()) {
        return Err(Error::invalid_argument(format!(
            "coordinate on axis {axis} is not finite (point {point:?})"
        )));
    }
    let encoded = encode_xyz(point.xyz(), header);
    let mut xyz = [0i32; 3];
    for (axis, (value, out)) in encoded.iter().zip(xyz.iter_mut()).enumerate() {
        *out = i32::try_from(*value).map_err(|_| {
            Error::invalid_argument(format!(
                "encoded coordinate {value} on axis {axis} does not fit in i32 (point {point:?})"
            ))
        })?;
    }
    Ok(RawPointRecord::new(xyz, encode_color(point.rgb())))
}

/// Batch codec over a fixed header.
///
/// Points are independent, so batches run on the rayon pool with the header
/// shared read-only.
#[derive(Debug, Clone, Copy)]
pub struct PointCodec {
    header: PointCloudHeader,
    min_len: usize,
}

impl PointCodec {
    pub fn new(header: PointCloudHeader) -> Self {
        Self {
            header,
            min_len: DEFAULT_PARALLEL_MIN_LEN,
        }
    }

    /// Minimum number of points handed to a single rayon job.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    pub fn header(&self) -> &PointCloudHeader {
        &self.header
    }

    pub fn decode_points(&self, records: &[RawPointRecord]) -> Vec<WorkingPoint> {
        records
            .par_iter()
            .with_min_len(self.min_len)
            .map(|record| decode_point(record, &self.header))
            .collect()
    }

    pub fn encode_points(&self, points: &[WorkingPoint]) -> Result<Vec<RawPointRecord>> {
        points
            .par_iter()
            .with_min_len(self.min_len)
            .map(|point| encode_point(point, &self.header))
            .collect()
    }
}
