#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod sidecar;
mod walk;

#[doc(hidden)]
pub mod prelude;

pub use error::{DirfsError, DirfsResult};
pub use sidecar::SidecarStore;
pub use walk::{DirAccount, DirContainer};

/// Tracing target for directory storage operations.
pub const TRACING_TARGET: &str = "veld_dirfs";
