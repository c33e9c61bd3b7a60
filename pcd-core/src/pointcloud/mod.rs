pub mod codec;
pub mod header;
pub mod point;
pub mod sampling;
