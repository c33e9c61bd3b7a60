pub mod error;
pub mod georef;
pub mod pointcloud;

pub use error::{Error, Result};
