pub mod geotiff;
pub mod xml;

use std::path::Path;

use pcd_core::georef::{GeoAnchor, RasterGeoTransform};
use pcd_core::Result;

pub trait GeoReferenceProvider {
    fn read_raster_geotransform(&self, path: &Path) -> Result<RasterGeoTransform>;

    fn parse_anchor_xml(&self, path: &Path) -> Result<GeoAnchor>;
}

/// Reads georeferencing straight from files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileGeoReference;

impl GeoReferenceProvider for FileGeoReference {
    fn read_raster_geotransform(&self, path: &Path) -> Result<RasterGeoTransform> {
        geotiff::read_geotransform(path)
    }

    fn parse_anchor_xml(&self, path: &Path) -> Result<GeoAnchor> {
        xml::parse_anchor_xml(path)
    }
}
