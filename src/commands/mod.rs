//! CLI commands for cgw-publish
//!
//! - **push**: generate the metadata document and hand it to the publisher
//! - **plan**: preview the metadata document without publishing

pub mod plan;
pub mod push;

pub use plan::run_plan;
pub use push::run_push;
