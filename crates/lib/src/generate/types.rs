//! Generator argument structs, deserialized from kustomization files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Arguments shared by ConfigMap and Secret generators.
///
/// ```yaml
/// configMapGenerator:
///   - name: app-config
///     literals:
///       - mode=production
///     files:
///       - settings.ini
///     envs:
///       - defaults.env
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorArgs {
  /// Base name of the generated resource, before any affix or hash suffix.
  pub name: String,
  /// `key=value` literal sources.
  pub literals: Vec<String>,
  /// File sources; `key=path` overrides the file-name key.
  pub files: Vec<String>,
  /// Env-file sources, one `KEY=VALUE` per line.
  pub envs: Vec<String>,
  /// Per-generator options, merged over the kustomization-wide ones.
  pub options: Option<GeneratorOptions>,
}

/// Arguments for a Secret generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretArgs {
  #[serde(flatten)]
  pub generator: GeneratorArgs,
  /// Secret `type`; defaults to `Opaque`.
  #[serde(rename = "type")]
  pub secret_type: Option<String>,
}

/// Options applied to generated resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
  /// Labels to add to generated resource metadata.
  pub labels: BTreeMap<String, String>,
  /// Annotations to add to generated resource metadata.
  pub annotations: BTreeMap<String, String>,
  /// Skip the content-hash name suffix for this resource.
  pub disable_name_suffix_hash: bool,
}

impl GeneratorOptions {
  /// Merge kustomization-wide options with per-generator ones.
  ///
  /// Per-generator labels/annotations win on key conflicts; the suffix
  /// hash is disabled if either level disables it.
  pub fn merged(global: Option<&GeneratorOptions>, local: Option<&GeneratorOptions>) -> GeneratorOptions {
    let mut merged = global.cloned().unwrap_or_default();
    if let Some(local) = local {
      merged.labels.extend(local.labels.clone());
      merged.annotations.extend(local.annotations.clone());
      merged.disable_name_suffix_hash |= local.disable_name_suffix_hash;
    }
    merged
  }
}
