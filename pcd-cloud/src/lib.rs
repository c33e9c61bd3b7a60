pub mod cloud;
pub mod options;

pub use cloud::PointCloud;
pub use options::CloudOptions;
pub use pcd_core::{Error, Result};
