//! Name prefix/suffix application.

use crate::resource::Resource;
use crate::transform::Rename;

/// Apply `namePrefix` and `nameSuffix` to every named resource.
///
/// Resources without a `metadata.name` are left alone. Returns one rename
/// per touched resource so references written against the original names
/// can follow the move.
pub fn apply_name_affix(resources: &mut [Resource], prefix: &str, suffix: &str) -> Vec<Rename> {
  if prefix.is_empty() && suffix.is_empty() {
    return Vec::new();
  }
  let mut renames = Vec::new();
  for resource in resources {
    let old = resource.name().to_string();
    if old.is_empty() {
      continue;
    }
    let new = format!("{prefix}{old}{suffix}");
    resource.set_name(&new);
    renames.push(Rename {
      kind: resource.kind().to_string(),
      old,
      new,
    });
  }
  renames
}
