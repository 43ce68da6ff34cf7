//! Traffic-ticket domain: raw tables, typed records and the lookup result.

pub mod amount;
pub mod models;
pub mod result;
pub mod table;
pub mod transform;

pub use models::{Amount, Media, Resolution, TrafficTicket};
pub use result::QueryResult;
pub use table::{ExtractedTable, extract_table, scrape_table};
pub use transform::transform;
