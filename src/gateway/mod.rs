//! Content gateway domain: manifest, checksums, metadata generation, publishing
//!
//! - **manifest**: product identity and component list loaded from the release data file
//! - **checksum**: streaming SHA-256 digests and canonical URL derivation
//! - **metadata**: artifact matching and metadata record generation (the core)
//! - **publisher**: external publisher invocation and result record bookkeeping

pub mod checksum;
pub mod manifest;
pub mod metadata;
pub mod publisher;
