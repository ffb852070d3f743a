//! Prelude module for convenient imports.

pub use crate::config::ListerConfig;
pub use crate::error::{BoxedError, ListError, ListResult};
pub use crate::lister::Lister;
pub use crate::source::{NameSource, RecordResolver, Resolution};
pub use crate::types::{ListingRequest, ListingRow, ObjectType, Record};
