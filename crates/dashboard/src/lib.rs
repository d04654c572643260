//! Bazaar Dashboard library.
//!
//! Admin and seller dashboards for the marketplace. Every page is gated by
//! the labels on the caller's Appwrite account:
//! - `superAdmin` - marketplace administration
//! - `physicalStoreOwner` - dashboards for the caller's physical stores
//! - `virtualStoreOwner` - dashboards for the caller's virtual stores
//!
//! The crate is split into a library and a thin binary so the router can be
//! exercised in tests with in-memory collaborators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod appwrite;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
