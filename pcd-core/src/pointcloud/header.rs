use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Keeps `raw + shift` within f64's half-unit precision for every i32 raw
// value, so decode then encode is exact.
const MAX_DECODED_MAGNITUDE: f64 = (1u64 << 51) as f64;

/// Per-axis scale and offset taken from a LAS header.
///
/// Fields are private so a header cannot change once a cloud is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCloudHeader {
    scale: [f64; 3],
    offset: [f64; 3],
}

impl PointCloudHeader {
    /// Fails with [`Error::InvalidArgument`] unless every scale is finite and
    /// strictly positive, every offset is finite, and `offset / scale` is
    /// small enough for decoded coordinates to stay exact.
    pub fn new(scale: [f64; 3], offset: [f64; 3]) -> Result<Self> {
        for (axis, s) in ["x", "y", "z"].iter().zip(scale) {
            if !s.is_finite() || s <= 0.0 {
                return Err(Error::invalid_argument(format!(
                    "scale for axis {axis} must be finite and positive, got {s}"
                )));
            }
        }
        for (axis, o) in ["x", "y", "z"].iter().zip(offset) {
            if !o.is_finite() {
                return Err(Error::invalid_argument(format!(
                    "offset for axis {axis} must be finite, got {o}"
                )));
            }
        }
        let header = Self { scale, offset };
        for (axis, shift) in ["x", "y", "z"].iter().zip(header.shift()) {
            if shift.abs() + i32::MAX as f64 > MAX_DECODED_MAGNITUDE {
                return Err(Error::invalid_argument(format!(
                    "offset / scale for axis {axis} is {shift}, too large to decode exactly"
                )));
            }
        }
        Ok(header)
    }

    pub fn scale(&self) -> [f64; 3] {
        self.scale
    }

    pub fn offset(&self) -> [f64; 3] {
        self.offset
    }

    /// The amount added to a stored integer when decoding: `offset / scale`.
    pub fn shift(&self) -> [f64; 3] {
        [
            self.offset[0] / self.scale[0],
            self.offset[1] / self.scale[1],
            self.offset[2] / self.scale[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_divides_offset_by_scale() {
        let header = PointCloudHeader::new([0.01, 0.5, 2.0], [100.0, 1.0, 50.0]).unwrap();
        assert_eq!(header.shift(), [10000.0, 2.0, 25.0]);
        assert_eq!(header.scale(), [0.01, 0.5, 2.0]);
        assert_eq!(header.offset(), [100.0, 1.0, 50.0]);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = PointCloudHeader::new([0.01, 0.0, 0.01], [0.0; 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn negative_or_nan_scale_is_rejected() {
        assert!(PointCloudHeader::new([-0.01, 0.01, 0.01], [0.0; 3]).is_err());
        assert!(PointCloudHeader::new([0.01, f64::NAN, 0.01], [0.0; 3]).is_err());
        assert!(PointCloudHeader::new([0.01, 0.01, f64::INFINITY], [0.0; 3]).is_err());
    }

    #[test]
    fn oversized_shift_is_rejected() {
        let err = PointCloudHeader::new([1e-10; 3], [1e6, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(PointCloudHeader::new([0.01; 3], [0.0, 0.0, -1e14]).is_err());

        // Typical projected coordinates at millimetre scale still fit.
        let header = PointCloudHeader::new([0.001; 3], [512_000.0, 4_123_000.0, 10.0]).unwrap();
        assert_eq!(header.shift()[1].round(), 4_123_000_000.0);
    }

    #[test]
    fn non_finite_offset_is_rejected() {
        assert!(PointCloudHeader::new([0.01; 3], [0.0, f64::NAN, 0.0]).is_err());
    }
}
