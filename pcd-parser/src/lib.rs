pub mod georef;
pub mod reader;

use pcd_core::Error;

/// Maps an error from the `las` crate into this workspace's taxonomy.
///
/// I/O failures stay I/O failures; everything else means the container or
/// its records are malformed.
pub fn las_error(err: las::Error) -> Error {
    match err {
        las::Error::Io(err) => Error::Io(err),
        other => Error::Format(other.to_string()),
    }
}
