//! Structured document model.
//!
//! A [`Resource`] is one parsed YAML document with a mapping at the root,
//! the shape every Kubernetes-style manifest has. Loaders hand resources to
//! the generators and transformers; the hashing core consumes them
//! read-only.

mod types;

pub use types::*;
