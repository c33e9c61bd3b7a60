//! Reads the affine geo-transform of a GeoTIFF from the tags of its first IFD.
//! Pixel data is never decoded.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use pcd_core::georef::RasterGeoTransform;
use pcd_core::{Error, Result};

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;

const TYPE_DOUBLE: u16 = 12;
const MAX_TAG_VALUES: u32 = 1 << 20;

#[derive(Debug, Clone, Copy)]
enum Endian {
    Little,
    Big,
}

struct TiffReader<R> {
    inner: R,
    endian: Endian,
}

impl<R: Read + Seek> TiffReader<R> {
    fn read_u16(&mut self) -> Result<u16> {
        let value = match self.endian {
            Endian::Little => self.inner.read_u16::<LittleEndian>(),
            Endian::Big => self.inner.read_u16::<BigEndian>(),
        };
        value.map_err(tiff_io)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let value = match self.endian {
            Endian::Little => self.inner.read_u32::<LittleEndian>(),
            Endian::Big => self.inner.read_u32::<BigEndian>(),
        };
        value.map_err(tiff_io)
    }

    fn read_f64_vec(&mut self, offset: u32, count: u32) -> Result<Vec<f64>> {
        self.inner
            .seek(SeekFrom::Start(offset as u64))
            .map_err(tiff_io)?;
        let mut values = vec![0.0; count as usize];
        let read = match self.endian {
            Endian::Little => self.inner.read_f64_into::<LittleEndian>(&mut values),
            Endian::Big => self.inner.read_f64_into::<BigEndian>(&mut values),
        };
        read.map_err(tiff_io)?;
        Ok(values)
    }

    /// Collects the georeferencing tags of the IFD at `offset`.
    fn read_geo_tags(&mut self, offset: u32) -> Result<HashMap<u16, Vec<f64>>> {
        self.inner
            .seek(SeekFrom::Start(offset as u64))
            .map_err(tiff_io)?;
        let entry_count = self.read_u16()?;

        let mut wanted = Vec::new();
        for _ in 0..entry_count {
            let tag = self.read_u16()?;
            let field_type = self.read_u16()?;
            let count = self.read_u32()?;
            let value_offset = self.read_u32()?;

            if !matches!(
                tag,
                TAG_MODEL_PIXEL_SCALE | TAG_MODEL_TIEPOINT | TAG_MODEL_TRANSFORMATION
            ) {
                continue;
            }
            if field_type != TYPE_DOUBLE {
                return Err(Error::format(format!(
                    "GeoTIFF tag {tag} must be DOUBLE, found field type {field_type}"
                )));
            }
            if count == 0 || count > MAX_TAG_VALUES {
                return Err(Error::format(format!(
                    "GeoTIFF tag {tag} has an impossible value count {count}"
                )));
            }
            wanted.push((tag, count, value_offset));
        }

        // DOUBLE values never fit the 4-byte inline slot, so each one lives at
        // its offset.
        let mut tags = HashMap::new();
        for (tag, count, value_offset) in wanted {
            tags.insert(tag, self.read_f64_vec(value_offset, count)?);
        }
        Ok(tags)
    }
}

fn tiff_io(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::format("unexpected end of TIFF data")
    } else {
        Error::Io(err)
    }
}

pub fn read_geotransform<P: AsRef<Path>>(path: P) -> Result<RasterGeoTransform> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let gt = read_geotransform_from(BufReader::new(file))?;
    log::debug!("{}: geo-transform {:?}", path.display(), gt.to_array());
    Ok(gt)
}

pub fn read_geotransform_from<R: Read + Seek>(mut read: R) -> Result<RasterGeoTransform> {
    let mut byte_order = [0u8; 2];
    read.read_exact(&mut byte_order).map_err(tiff_io)?;
    let endian = match &byte_order {
        b"II" => Endian::Little,
        b"MM" => Endian::Big,
        _ => return Err(Error::format("not a TIFF file: bad byte order mark")),
    };

    let mut tiff = TiffReader {
        inner: read,
        endian,
    };
    match tiff.read_u16()? {
        42 => {}
        43 => return Err(Error::format("BigTIFF files are not supported")),
        magic => return Err(Error::format(format!("not a TIFF file: magic number {magic}"))),
    }
    let first_ifd = tiff.read_u32()?;
    let tags = tiff.read_geo_tags(first_ifd)?;

    geotransform_from_tags(&tags)
}

fn geotransform_from_tags(tags: &HashMap<u16, Vec<f64>>) -> Result<RasterGeoTransform> {
    if let Some(m) = tags.get(&TAG_MODEL_TRANSFORMATION) {
        if m.len() != 16 {
            return Err(Error::format(format!(
                "ModelTransformationTag must hold 16 values, found {}",
                m.len()
            )));
        }
        return Ok(RasterGeoTransform::from_array([
            m[3], m[0], m[1], m[7], m[4], m[5],
        ]));
    }

    let Some(tiepoints) = tags.get(&TAG_MODEL_TIEPOINT) else {
        log::warn!("raster has no georeferencing tags, using the identity transform");
        return Ok(RasterGeoTransform::default());
    };
    if tiepoints.len() % 6 != 0 {
        return Err(Error::format(format!(
            "ModelTiepointTag must hold a multiple of 6 values, found {}",
            tiepoints.len()
        )));
    }
    if tiepoints.len() > 6 {
        log::warn!(
            "raster has {} tie points (ground control points), not an affine transform",
            tiepoints.len() / 6
        );
        return Ok(RasterGeoTransform::default());
    }

    let (sx, sy) = match tags.get(&TAG_MODEL_PIXEL_SCALE) {
        Some(scale) if scale.len() >= 2 => (scale[0], scale[1]),
        Some(scale) => {
            return Err(Error::format(format!(
                "ModelPixelScaleTag must hold at least 2 values, found {}",
                scale.len()
            )))
        }
        None => {
            log::warn!("ModelPixelScaleTag is missing, assuming a pixel size of 1.0");
            (1.0, 1.0)
        }
    };

    let (i, j, x, y) = (tiepoints[0], tiepoints[1], tiepoints[3], tiepoints[4]);
    Ok(RasterGeoTransform::from_array([
        x - i * sx,
        sx,
        0.0,
        y + j * sy,
        0.0,
        -sy,
    ]))
}
