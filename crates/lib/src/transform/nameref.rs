//! Name-reference renaming.
//!
//! Renaming passes (name affixes, content-hash suffixes) record what they
//! renamed; this module rewrites references to the old names at the common
//! reference sites so workloads keep pointing at the resources they were
//! written against.

use serde_yaml::Value;

use crate::resource::Resource;

/// Record of one resource renamed by a transformer pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
  pub kind: String,
  pub old: String,
  pub new: String,
}

/// Mapping keys whose `name` child refers to a ConfigMap.
const CONFIGMAP_REF_KEYS: [&str; 3] = ["configMap", "configMapRef", "configMapKeyRef"];
/// Mapping keys whose `name` child refers to a Secret.
const SECRET_REF_KEYS: [&str; 2] = ["secretRef", "secretKeyRef"];

/// Rewrite references to renamed ConfigMaps/Secrets across all resources.
///
/// Covered sites: `env`/`envFrom` (`configMapRef`, `secretRef`,
/// `configMapKeyRef`, `secretKeyRef`), volume `configMap.name` and volume
/// `secret.secretName`.
pub fn update_name_references(resources: &mut [Resource], renames: &[Rename]) {
  if renames.is_empty() {
    return;
  }
  for resource in resources {
    for (key, value) in resource.root_mut().iter_mut() {
      rewrite(key.as_str().unwrap_or(""), value, renames);
    }
  }
}

fn rewrite(key: &str, value: &mut Value, renames: &[Rename]) {
  match value {
    Value::String(current) if key == "secretName" => {
      rename_in_place(current, "Secret", renames);
    }
    Value::Mapping(mapping) => {
      let referenced_kind = if CONFIGMAP_REF_KEYS.contains(&key) {
        Some("ConfigMap")
      } else if SECRET_REF_KEYS.contains(&key) {
        Some("Secret")
      } else {
        None
      };
      if let Some(kind) = referenced_kind {
        if let Some(Value::String(name)) = mapping.get_mut("name") {
          rename_in_place(name, kind, renames);
        }
      }
      for (child_key, child) in mapping.iter_mut() {
        rewrite(child_key.as_str().unwrap_or(""), child, renames);
      }
    }
    Value::Sequence(items) => {
      for item in items {
        rewrite("", item, renames);
      }
    }
    _ => {}
  }
}

fn rename_in_place(name: &mut String, kind: &str, renames: &[Rename]) {
  for rename in renames {
    if rename.kind == kind && rename.old == *name {
      *name = rename.new.clone();
      return;
    }
  }
}
