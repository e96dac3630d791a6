//! Content-hash name suffixes.
//!
//! Generated ConfigMaps and Secrets get a `-<token>` suffix derived from
//! their content (see [`crate::hash`]). The returned renames feed
//! [`super::nameref::update_name_references`] so workloads keep pointing
//! at the suffixed resources.

use crate::hash::{self, HashError};
use crate::resource::Resource;
use crate::transform::Rename;

/// Append the content-hash token to each target's name.
///
/// `targets` are the generated resources that should be suffixed.
pub fn apply_hash_suffix(targets: &mut [Resource]) -> Result<Vec<Rename>, HashError> {
  let mut renames = Vec::with_capacity(targets.len());
  for resource in targets {
    let token = hash::hash_resource(resource)?;
    let old = resource.name().to_string();
    let new = format!("{old}-{token}");
    resource.set_name(&new);
    renames.push(Rename {
      kind: resource.kind().to_string(),
      old,
      new,
    });
  }
  Ok(renames)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hash::TOKEN_LEN;

  #[test]
  fn suffix_is_the_content_token() {
    let mut targets =
      vec![Resource::from_yaml("kind: ConfigMap\nmetadata:\n  name: cfg\ndata:\n  a: \"1\"\n").unwrap()];
    let renames = apply_hash_suffix(&mut targets).unwrap();

    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0].old, "cfg");
    assert!(renames[0].new.starts_with("cfg-"));
    assert_eq!(renames[0].new.len(), "cfg-".len() + TOKEN_LEN);
    assert_eq!(targets[0].name(), renames[0].new);
  }

  #[test]
  fn suffix_changes_with_content() {
    let mut a =
      vec![Resource::from_yaml("kind: ConfigMap\nmetadata:\n  name: cfg\ndata:\n  a: \"1\"\n").unwrap()];
    let mut b =
      vec![Resource::from_yaml("kind: ConfigMap\nmetadata:\n  name: cfg\ndata:\n  a: \"2\"\n").unwrap()];
    let ra = apply_hash_suffix(&mut a).unwrap();
    let rb = apply_hash_suffix(&mut b).unwrap();
    assert_ne!(ra[0].new, rb[0].new);
  }
}
