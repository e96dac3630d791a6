//! ConfigMap and Secret generation from key/value sources.
//!
//! Generators assemble resources from three source shapes: `key=value`
//! literals, files (key defaults to the file name), and env files. The
//! produced resources flow through the same transformers as loaded ones
//! and receive a content-hash name suffix unless disabled.
//!
//! # Modules
//!
//! - [`kv`] - key/value source parsing and key validation
//! - [`configmap`] - ConfigMap assembly (`data` / `binaryData` split)
//! - [`secret`] - Secret assembly (base64-encoded `data`)
//! - [`types`] - generator argument structs

pub mod configmap;
pub mod kv;
pub mod secret;
mod types;

pub use configmap::make_configmap;
pub use secret::make_secret;
pub use types::*;

/// Errors that can occur while generating a resource.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
  #[error("generator must have a name")]
  MissingName,

  #[error("literal source '{spec}' must be key=value")]
  InvalidLiteral { spec: String },

  #[error("invalid key '{key}': keys may contain alphanumerics, '-', '_' and '.'")]
  InvalidKey { key: String },

  #[error("duplicate key '{key}' in generator '{name}'")]
  DuplicateKey { key: String, name: String },

  #[error("env file line '{line}' must be KEY=VALUE")]
  InvalidEnvLine { line: String },

  #[error("failed to read source '{path}': {source}")]
  ReadSource {
    path: String,
    #[source]
    source: std::io::Error,
  },
}
