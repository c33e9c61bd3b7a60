use std::path::Path;

use pcd_core::georef::{GeoAnchor, RasterGeoTransform};
use pcd_core::pointcloud::{
    codec::PointCodec,
    header::PointCloudHeader,
    point::{PointSet, RawPointRecord, WorkingPoint},
    sampling::sampler::{PointCloudSampler, RandomSampler},
};
use pcd_core::Result;
use pcd_parser::georef::{FileGeoReference, GeoReferenceProvider};
use pcd_parser::reader::{las::LasStore, PointStore};

use crate::options::CloudOptions;

/// A LAS point cloud together with its geo anchor.
///
/// The cloud exclusively owns its store. Every read returns an owned copy of
/// the points, so nothing handed out can alter what the store holds.
#[derive(Debug)]
pub struct PointCloud {
    store: LasStore,
    anchor: GeoAnchor,
    codec: PointCodec,
    sampler: RandomSampler,
}

impl PointCloud {
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(points_path: P, metadata_path: Q) -> Result<Self> {
        Self::load_with_options(points_path, metadata_path, &CloudOptions::default())
    }

    pub fn load_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
        points_path: P,
        metadata_path: Q,
        options: &CloudOptions,
    ) -> Result<Self> {
        let points_path = points_path.as_ref();
        let metadata_path = metadata_path.as_ref();
        log::info!(
            "loading {} with metadata {}",
            points_path.display(),
            metadata_path.display()
        );

        let store = LasStore::open(points_path)?;
        let anchor = FileGeoReference.parse_anchor_xml(metadata_path)?;
        let codec = PointCodec::new(*store.header()).with_min_len(options.parallel_min_len);

        Ok(Self {
            store,
            anchor,
            codec,
            sampler: RandomSampler::new(options.random_seed),
        })
    }

    /// Returns all points, or `sample_size` of them drawn without
    /// replacement, either as stored or decoded when `transformed` is set.
    pub fn data(&mut self, sample_size: Option<usize>, transformed: bool) -> Result<PointSet> {
        if transformed {
            self.working_data(sample_size).map(PointSet::Working)
        } else {
            self.raw_data(sample_size).map(PointSet::Raw)
        }
    }

    pub fn raw_data(&mut self, sample_size: Option<usize>) -> Result<Vec<RawPointRecord>> {
        let points = self.store.points()?;
        match sample_size {
            Some(sample_size) => self.sampler.sample(points, sample_size),
            None => Ok(points.to_vec()),
        }
    }

    pub fn working_data(&mut self, sample_size: Option<usize>) -> Result<Vec<WorkingPoint>> {
        let points = self.store.points()?;
        match sample_size {
            Some(sample_size) => {
                let sample = self.sampler.sample(points, sample_size)?;
                Ok(self.codec.decode_points(&sample))
            }
            None => Ok(self.codec.decode_points(points)),
        }
    }

    /// Encodes working points back into raw records with this cloud's header.
    /// The store is left untouched.
    pub fn encode(&self, points: &[WorkingPoint]) -> Result<Vec<RawPointRecord>> {
        self.codec.encode_points(points)
    }

    /// Writes the store's raw points to `destination`, using `alt_header` in
    /// place of the source header when given.
    pub fn write_las<P: AsRef<Path>>(
        &self,
        destination: P,
        alt_header: Option<las::Header>,
    ) -> Result<()> {
        let points = self.store.points()?;
        let header = match alt_header {
            Some(header) => header,
            None => self.store.las_header().clone(),
        };
        pcd_exporter::las::write_raw_points(destination, header, points)
    }

    /// Releases the store. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.store.close();
    }

    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    pub fn header(&self) -> &PointCloudHeader {
        self.store.header()
    }

    pub fn las_header(&self) -> &las::Header {
        self.store.las_header()
    }

    pub fn anchor(&self) -> &GeoAnchor {
        &self.anchor
    }

    pub fn point_count(&self) -> usize {
        self.store.point_count()
    }

    pub fn geo_info<P: AsRef<Path>>(geotiff_path: P) -> Result<RasterGeoTransform> {
        FileGeoReference.read_raster_geotransform(geotiff_path.as_ref())
    }
}
