//! Traffic-ticket ("comparendo") lookup against the Barranquilla transit portal.
//!
//! [`get`] drives a headless browser to the portal, searches a license plate and
//! normalizes the physical and electronic ticket tables into [`TrafficTicket`]s.

pub mod cli;
pub mod config;
pub mod logging;
pub mod lookup;
pub mod portal;
pub mod tickets;
pub mod utils;

pub use lookup::{LookupError, TicketLookup, get, get_with_config};
pub use tickets::{Media, QueryResult, TrafficTicket};
