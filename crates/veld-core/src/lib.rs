#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod filter;
mod lister;
mod source;
mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

#[doc(hidden)]
pub mod prelude;

pub use config::ListerConfig;
pub use error::{BoxedError, ListError, ListResult};
pub use lister::Lister;
pub use source::{NameSource, RecordResolver, Resolution};
pub use types::{
    DIR_CONTENT_TYPE, FILE_CONTENT_TYPE, ListingRequest, ListingRow, MAX_DELIMITER, ObjectType,
    PLAIN_CONTENT_TYPE, Record,
};

/// Tracing target for listing operations.
pub const TRACING_TARGET: &str = "veld_core";
