//! JSON API handlers.
//!
//! Paths under `/api/` answer access failures with status codes instead of
//! redirects or HTML pages.

pub mod access;
