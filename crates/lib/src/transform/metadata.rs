//! Common label and annotation injection.

use std::collections::BTreeMap;

use crate::resource::Resource;

/// Merge `commonLabels` into every resource's `metadata.labels`.
pub fn apply_common_labels(resources: &mut [Resource], labels: &BTreeMap<String, String>) {
  for resource in resources {
    resource.merge_metadata_map("labels", labels);
  }
}

/// Merge `commonAnnotations` into every resource's `metadata.annotations`.
pub fn apply_common_annotations(resources: &mut [Resource], annotations: &BTreeMap<String, String>) {
  for resource in resources {
    resource.merge_metadata_map("annotations", annotations);
  }
}
