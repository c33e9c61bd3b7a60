use serde::{Deserialize, Serialize};

/// Real-world location of a cloud, read from its XML metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchor {
    pub latitude: f64,
    pub longitude: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_z: f64,
}

impl GeoAnchor {
    pub fn origin(&self) -> [f64; 3] {
        [self.origin_x, self.origin_y, self.origin_z]
    }
}

/// Affine pixel to geo mapping of a raster, in GDAL geo-transform order.
///
/// Field names follow GDAL: `gt[4]` is `rotation2` and `gt[5]` is
/// `pixel_height`. Some tools label `gt[4]` as the pixel height instead; the
/// positions in [`RasterGeoTransform::to_array`] are the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterGeoTransform {
    pub x_offset: f64,
    pub pixel_width: f64,
    pub rotation1: f64,
    pub y_offset: f64,
    pub rotation2: f64,
    pub pixel_height: f64,
}

impl RasterGeoTransform {
    pub fn from_array(gt: [f64; 6]) -> Self {
        Self {
            x_offset: gt[0],
            pixel_width: gt[1],
            rotation1: gt[2],
            y_offset: gt[3],
            rotation2: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.x_offset,
            self.pixel_width,
            self.rotation1,
            self.y_offset,
            self.rotation2,
            self.pixel_height,
        ]
    }

    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.x_offset + col * self.pixel_width + row * self.rotation1,
            self.y_offset + col * self.rotation2 + row * self.pixel_height,
        )
    }
}

impl Default for RasterGeoTransform {
    // GDAL's transform for a raster without georeferencing.
    fn default() -> Self {
        Self::from_array([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }
}
