use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use pcd_core::pointcloud::{header::PointCloudHeader, point::RawPointRecord};
use pcd_core::{Error, Result};

use super::PointStore;
use crate::las_error;

/// A LAS file opened in read mode, with every point record loaded eagerly.
#[derive(Debug)]
pub struct LasStore {
    path: PathBuf,
    las_header: las::Header,
    header: PointCloudHeader,
    points: Option<Vec<RawPointRecord>>,
}

impl LasStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let start = std::time::Instant::now();

        let file = File::open(path)?;
        let mut reader = las::Reader::new(BufReader::new(file)).map_err(las_error)?;
        let las_header = reader.header().clone();
        let transforms = las_header.transforms().clone();
        let header = PointCloudHeader::new(
            [transforms.x.scale, transforms.y.scale, transforms.z.scale],
            [transforms.x.offset, transforms.y.offset, transforms.z.offset],
        )?;
        log::debug!(
            "{}: scale {:?}, offset {:?}",
            path.display(),
            header.scale(),
            header.offset()
        );

        let mut las_points = Vec::new();
        reader
            .read_all_points_into(&mut las_points)
            .map_err(las_error)?;

        let missing_color = las_points.iter().filter(|p| p.color.is_none()).count();
        if missing_color > 0 {
            log::warn!(
                "{}: {} of {} points carry no color, storing them as black",
                path.display(),
                missing_color,
                las_points.len()
            );
        }

        let points = las_points
            .par_iter()
            .map(|p| Self::convert_las_point(p, &transforms))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "read {} points from {} in {:?}",
            points.len(),
            path.display(),
            start.elapsed()
        );

        Ok(Self {
            path: path.to_path_buf(),
            las_header,
            header,
            points: Some(points),
        })
    }

    // The las reader hands out scaled floats; invert its own transform to get
    // back the stored integers.
    fn convert_las_point(
        las_point: &las::Point,
        transforms: &las::Vector<las::Transform>,
    ) -> Result<RawPointRecord> {
        let xyz = [
            transforms.x.inverse(las_point.x).map_err(las_error)?,
            transforms.y.inverse(las_point.y).map_err(las_error)?,
            transforms.z.inverse(las_point.z).map_err(las_error)?,
        ];
        let rgb = las_point
            .color
            .map(|c| [c.red, c.green, c.blue])
            .unwrap_or([0, 0, 0]);
        Ok(RawPointRecord::new(xyz, rgb))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full LAS header, used as the template when writing points back.
    pub fn las_header(&self) -> &las::Header {
        &self.las_header
    }
}

impl PointStore for LasStore {
    fn header(&self) -> &PointCloudHeader {
        &self.header
    }

    fn points(&self) -> Result<&[RawPointRecord]> {
        self.points.as_deref().ok_or(Error::ClosedHandle)
    }

    fn point_count(&self) -> usize {
        self.points.as_ref().map_or(0, Vec::len)
    }

    fn close(&mut self) {
        if self.points.take().is_some() {
            log::debug!("closed {}", self.path.display());
        }
    }

    fn is_closed(&self) -> bool {
        self.points.is_none()
    }
}

#[cfg(test)]
mod tests {
    use las::{point::Format, Builder, Color, Transform, Vector, Writer};
    use tempfile::tempdir;

    use super::*;

    fn write_las(path: &Path, scale: f64, offset: [f64; 3], records: &[RawPointRecord]) {
        let mut builder = Builder::from((1, 2));
        builder.point_format = Format::new(2).unwrap();
        builder.transforms = Vector {
            x: Transform { scale, offset: offset[0] },
            y: Transform { scale, offset: offset[1] },
            z: Transform { scale, offset: offset[2] },
        };
        let header = builder.into_header().unwrap();
        let transforms = header.transforms().clone();
        let mut writer = Writer::from_path(path, header).unwrap();
        for r in records {
            writer
                .write_point(las::Point {
                    x: transforms.x.direct(r.x),
                    y: transforms.y.direct(r.y),
                    z: transforms.z.direct(r.z),
                    color: Some(Color::new(r.red, r.green, r.blue)),
                    ..Default::default()
                })
                .unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn open_reads_raw_integers_and_header() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.las");
        let records = vec![
            RawPointRecord::new([500, 500, 500], [4096, 8192, 16384]),
            RawPointRecord::new([-7, 0, 123_456], [0, 65535, 300]),
        ];
        write_las(&path, 0.01, [100.0, 100.0, 50.0], &records);

        let store = LasStore::open(&path).unwrap();
        assert_eq!(store.header().scale(), [0.01; 3]);
        assert_eq!(store.header().offset(), [100.0, 100.0, 50.0]);
        assert_eq!(store.point_count(), 2);
        assert_eq!(store.points().unwrap(), records.as_slice());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn close_is_idempotent_and_blocks_reads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.las");
        write_las(&path, 0.001, [0.0; 3], &[RawPointRecord::default()]);

        let mut store = LasStore::open(&path).unwrap();
        assert!(!store.is_closed());
        store.close();
        store.close();
        assert!(store.is_closed());
        assert_eq!(store.point_count(), 0);
        assert!(matches!(store.points(), Err(Error::ClosedHandle)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = LasStore::open(dir.path().join("nope.las")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn garbage_file_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.las");
        std::fs::write(&path, vec![0u8; 512]).unwrap();
        let err = LasStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
