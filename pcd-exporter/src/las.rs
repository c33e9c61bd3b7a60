use std::{
    io::{BufWriter, Write as _},
    path::Path,
};

use las::{point::Format, Color, Transform, Vector};

use pcd_core::pointcloud::point::RawPointRecord;
use pcd_core::{Error, Result};
use pcd_parser::las_error;

/// Writes raw point records to `destination` as a LAS file with `header`.
///
/// The stored integers in the new file are exactly `points`' X/Y/Z, encoded
/// through `header`'s own scale and offset. Point attributes other than
/// position and color are zeroed. The file is first written next to
/// `destination` and renamed into place once complete, so a failed write
/// leaves nothing behind.
pub fn write_raw_points<P: AsRef<Path>>(
    destination: P,
    header: las::Header,
    points: &[RawPointRecord],
) -> Result<()> {
    let destination = destination.as_ref();
    let start = std::time::Instant::now();

    let format = header.point_format().clone();
    if format.is_compressed {
        return Err(Error::format("compressed (LAZ) output is not supported"));
    }
    if format.has_waveform {
        return Err(Error::format(
            "point formats with waveform packets are not supported",
        ));
    }
    if !format.has_color {
        log::warn!(
            "point format of {} has no color, dropping RGB",
            destination.display()
        );
    }
    let transforms = header.transforms().clone();

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".pcd-")
        .suffix(".las")
        .tempfile_in(dir)?;

    let mut writer =
        las::Writer::new(BufWriter::new(tmp.reopen()?), header).map_err(las_error)?;
    for record in points {
        writer
            .write_point(to_las_point(record, &transforms, &format))
            .map_err(las_error)?;
    }
    let mut inner = writer.into_inner().map_err(las_error)?;
    inner.flush()?;
    inner.get_ref().sync_all()?;
    drop(inner);

    tmp.persist(destination).map_err(|e| Error::Io(e.error))?;

    log::info!(
        "wrote {} points to {} in {:?}",
        points.len(),
        destination.display(),
        start.elapsed()
    );
    Ok(())
}

fn to_las_point(
    record: &RawPointRecord,
    transforms: &Vector<Transform>,
    format: &Format,
) -> las::Point {
    las::Point {
        x: transforms.x.direct(record.x),
        y: transforms.y.direct(record.y),
        z: transforms.z.direct(record.z),
        color: format
            .has_color
            .then(|| Color::new(record.red, record.green, record.blue)),
        gps_time: format.has_gps_time.then_some(0.0),
        nir: format.has_nir.then_some(0),
        extra_bytes: vec![0; format.extra_bytes as usize],
        ..Default::default()
    }
}
