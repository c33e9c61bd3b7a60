use std::path::{Path, PathBuf};

use las::{point::Format, Builder, Color, Transform, Vector, Writer};
use pcd_core::pointcloud::point::RawPointRecord;

pub const METADATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ModelMetadata version="1">
    <SRS>ENU:1.3521,103.8198</SRS>
    <SRSOrigin>0,0,0</SRSOrigin>
</ModelMetadata>
"#;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn las_header(scale: f64, offset: [f64; 3]) -> las::Header {
    let mut builder = Builder::from((1, 2));
    builder.point_format = Format::new(2).unwrap();
    builder.transforms = Vector {
        x: Transform { scale, offset: offset[0] },
        y: Transform { scale, offset: offset[1] },
        z: Transform { scale, offset: offset[2] },
    };
    builder.into_header().unwrap()
}

pub fn write_las(path: &Path, header: las::Header, records: &[RawPointRecord]) {
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

/// Writes a LAS file and its metadata XML into `dir`, returning both paths.
pub fn fixture(
    dir: &Path,
    scale: f64,
    offset: [f64; 3],
    records: &[RawPointRecord],
) -> (PathBuf, PathBuf) {
    let las_path = dir.join("cloud.las");
    let xml_path = dir.join("metadata.xml");
    write_las(&las_path, las_header(scale, offset), records);
    std::fs::write(&xml_path, METADATA).unwrap();
    (las_path, xml_path)
}

pub fn grid(n: i32) -> Vec<RawPointRecord> {
    (0..n)
        .map(|i| {
            let c = (i as u16).wrapping_mul(257);
            RawPointRecord::new([i, -i, i * 3], [c, c / 2, u16::MAX - c])
        })
        .collect()
}
