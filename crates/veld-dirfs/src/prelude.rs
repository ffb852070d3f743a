//! Prelude module for convenient imports.

pub use crate::error::{DirfsError, DirfsResult};
pub use crate::sidecar::SidecarStore;
pub use crate::walk::{DirAccount, DirContainer};
