//! Core data model: requests, records, and result rows.

mod record;
mod request;
mod row;

pub use record::{DIR_CONTENT_TYPE, FILE_CONTENT_TYPE, ObjectType, PLAIN_CONTENT_TYPE, Record};
pub use request::{ListingRequest, MAX_DELIMITER};
pub use row::ListingRow;
