//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Identity (one Appwrite account lookup per request, stored as `AuthState`)
//!
//! Route handlers then gate themselves with the extractors in [`auth`].

pub mod auth;
pub mod identity;
pub mod request_id;

pub use auth::{
    AccessRejection, AnyStoreOwner, CurrentAuth, Gate, PhysicalStoreOwner, Require, SystemAdmin,
    VirtualStoreOwner, enforce, path_and_query, sign_in_path,
};
pub use identity::{identity_middleware, session_token};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
