//! Row-level views of the sensor log: time ordering, cleaning split and
//! scatter point lists.

mod cleaning;
mod scatter;
mod time_index;

pub use cleaning::CleaningImpact;
pub use scatter::ScatterBuilder;
pub use time_index::{TimeIndex, parse_timestamp};
