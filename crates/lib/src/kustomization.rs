//! The kustomization file model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generate::{GeneratorArgs, GeneratorOptions, SecretArgs};
use crate::transform::Image;

/// File names probed when loading a kustomization directory.
pub const KUSTOMIZATION_FILE_NAMES: [&str; 2] = ["kustomization.yaml", "kustomization.yml"];

/// A parsed kustomization file.
///
/// Unknown fields are ignored rather than rejected, so directories written
/// for a superset of this tool still build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Kustomization {
  /// Resource entries: YAML files, or directories holding their own
  /// kustomization (built recursively as bases).
  pub resources: Vec<String>,

  /// Namespace set on every namespaced resource.
  pub namespace: String,

  /// Prefix prepended to every resource name.
  pub name_prefix: String,
  /// Suffix appended to every resource name (before any hash suffix).
  pub name_suffix: String,

  /// Labels merged into every resource's metadata.
  pub common_labels: BTreeMap<String, String>,
  /// Annotations merged into every resource's metadata.
  pub common_annotations: BTreeMap<String, String>,

  /// Image substitution rules.
  pub images: Vec<Image>,

  /// ConfigMap generators.
  pub config_map_generator: Vec<GeneratorArgs>,
  /// Secret generators.
  pub secret_generator: Vec<SecretArgs>,
  /// Options applied to all generators in this kustomization.
  pub generator_options: Option<GeneratorOptions>,
}

impl Kustomization {
  pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(text)
  }
}
