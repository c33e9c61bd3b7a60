pub mod las;

use pcd_core::pointcloud::{header::PointCloudHeader, point::RawPointRecord};
use pcd_core::Result;

/// Read access to the raw records of one opened point-cloud container.
pub trait PointStore {
    fn header(&self) -> &PointCloudHeader;

    /// Fails with `Error::ClosedHandle` once the store has been closed.
    fn points(&self) -> Result<&[RawPointRecord]>;

    fn point_count(&self) -> usize;

    /// Releases the point buffers. Closing twice is a no-op.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}
