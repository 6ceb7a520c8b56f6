//! Driving a parser from a byte source
//!
//! [`FrameStream`] turns any [`ByteSource`] into an iterator of records.

mod driver;
mod source;

pub use driver::FrameStream;
pub use source::{ByteSource, ChunkSource, ReadSource};
