pub mod chart;
pub mod de;
pub mod fs;
pub mod mapper;
pub mod schema;

pub use crate::mapper::{parse, parse_bytes, DecodeError};
pub use crate::schema::{Segment, SegmentId, SegmentSet, TickerSymbol};
