//! Core building blocks for cgw-publish
//!
//! - **config**: run configuration, credentials, and record defaults
//! - **error**: comprehensive error types with contextual help messages

pub mod config;
pub mod error;
