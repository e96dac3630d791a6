//! Namespace assignment.

use crate::resource::Resource;

/// Kinds that live outside any namespace and must not receive one.
const CLUSTER_SCOPED_KINDS: [&str; 6] = [
  "Namespace",
  "ClusterRole",
  "ClusterRoleBinding",
  "CustomResourceDefinition",
  "PersistentVolume",
  "StorageClass",
];

/// Set `metadata.namespace` on every namespaced resource.
///
/// An existing namespace is overwritten; the overlay's choice wins.
pub fn apply_namespace(resources: &mut [Resource], namespace: &str) {
  if namespace.is_empty() {
    return;
  }
  for resource in resources {
    if CLUSTER_SCOPED_KINDS.contains(&resource.kind()) {
      continue;
    }
    resource.set_namespace(namespace);
  }
}
