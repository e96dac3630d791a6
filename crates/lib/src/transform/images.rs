//! Image name/tag/digest substitution.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::resource::Resource;

/// An image substitution rule.
///
/// ```yaml
/// images:
///   - name: nginx
///     newTag: 1.27.1
///   - name: internal/app
///     newName: registry.example.com/app
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
  /// Image name to match, without tag or digest.
  pub name: String,
  /// Replacement name.
  pub new_name: Option<String>,
  /// Replacement tag. Ignored when `digest` is set.
  pub new_tag: Option<String>,
  /// Replacement digest; pins the image and drops any tag.
  pub digest: Option<String>,
}

/// Rewrite matching `image:` fields everywhere in the given resources.
///
/// The walk is structural rather than schema-aware: any string value under
/// an `image` key is a candidate, which covers containers and
/// initContainers in every workload kind without enumerating them.
pub fn apply_images(resources: &mut [Resource], images: &[Image]) {
  if images.is_empty() {
    return;
  }
  for resource in resources {
    for (key, value) in resource.root_mut().iter_mut() {
      rewrite(key.as_str().unwrap_or(""), value, images);
    }
  }
}

fn rewrite(key: &str, value: &mut Value, images: &[Image]) {
  match value {
    Value::String(current) if key == "image" => {
      for image in images {
        if let Some(replacement) = substitute(current, image) {
          *current = replacement;
          break;
        }
      }
    }
    Value::Mapping(mapping) => {
      for (child_key, child) in mapping.iter_mut() {
        rewrite(child_key.as_str().unwrap_or(""), child, images);
      }
    }
    Value::Sequence(items) => {
      for item in items {
        rewrite("", item, images);
      }
    }
    _ => {}
  }
}

/// Apply one rule to one image reference, if its name matches.
fn substitute(current: &str, image: &Image) -> Option<String> {
  let (name, tag, digest) = split_reference(current);
  if name != image.name {
    return None;
  }

  let new_name = image.new_name.as_deref().unwrap_or(name);
  if let Some(new_digest) = image.digest.as_deref() {
    return Some(format!("{new_name}@{new_digest}"));
  }
  let new_tag = image.new_tag.as_deref().or(tag);
  match (new_tag, digest) {
    (Some(tag), _) => Some(format!("{new_name}:{tag}")),
    (None, Some(digest)) => Some(format!("{new_name}@{digest}")),
    (None, None) => Some(new_name.to_string()),
  }
}

/// Split `name[:tag][@digest]`.
///
/// A colon only counts as a tag separator after the last slash, so
/// registry ports (`registry:5000/app`) are not mistaken for tags.
fn split_reference(reference: &str) -> (&str, Option<&str>, Option<&str>) {
  let (rest, digest) = match reference.split_once('@') {
    Some((rest, digest)) => (rest, Some(digest)),
    None => (reference, None),
  };
  let slash = rest.rfind('/').map(|i| i + 1).unwrap_or(0);
  match rest[slash..].rfind(':') {
    Some(colon) => {
      let colon = slash + colon;
      (&rest[..colon], Some(&rest[colon + 1..]), digest)
    }
    None => (rest, None, digest),
  }
}
