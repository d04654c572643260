//! Bazaar Core - access-control types for the marketplace.
//!
//! This crate provides the types and pure functions shared by every Bazaar
//! component that needs to answer "may this caller see this page?":
//! - `dashboard` - Admin and seller dashboards (Appwrite-backed)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Identities are fetched elsewhere and handed in; everything here is
//! deterministic and side-effect free.
//!
//! # Modules
//!
//! - [`types`] - Validated document IDs, labels and well-known roles
//! - [`identity`] - The authenticated user record and its label set
//! - [`access`] - Label resolution, role flags and the three-way access decision
//! - [`tenant`] - Store ownership checks and post-sign-in landing routes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod identity;
pub mod tenant;
pub mod types;

pub use access::{AccessDecision, AuthState, MatchMode, Requirement, RoleFlags, resolve};
pub use identity::{Identity, IdentityError};
pub use tenant::{Landing, Store, StoreKind, decide_store_access, landing_for};
pub use types::*;
