//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for the values access control
//! works with.

pub mod id;
pub mod label;
pub mod role;

pub use id::{IdError, StoreId, UserId};
pub use label::{Label, LabelError, LabelSet};
pub use role::Role;
