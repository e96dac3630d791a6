//! End-to-end builds over fixture directories.

use std::fs;
use std::path::Path;

use kapstan_lib::build::{BuildError, build, render};
use kapstan_lib::hash::TOKEN_LEN;

fn write(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
}

#[test]
fn generated_configmap_gets_hash_suffix_and_references_follow() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "resources:\n",
      "  - deployment.yaml\n",
      "configMapGenerator:\n",
      "  - name: app-config\n",
      "    literals:\n",
      "      - mode=debug\n",
    ),
  );
  write(
    &dir.path().join("deployment.yaml"),
    concat!(
      "apiVersion: apps/v1\n",
      "kind: Deployment\n",
      "metadata:\n",
      "  name: app\n",
      "spec:\n",
      "  template:\n",
      "    spec:\n",
      "      containers:\n",
      "        - name: main\n",
      "          image: app:v1\n",
      "          envFrom:\n",
      "            - configMapRef:\n",
      "                name: app-config\n",
    ),
  );

  let resources = build(dir.path()).unwrap();
  assert_eq!(resources.len(), 2);

  let configmap = resources.iter().find(|r| r.kind() == "ConfigMap").unwrap();
  assert!(configmap.name().starts_with("app-config-"));
  assert_eq!(configmap.name().len(), "app-config-".len() + TOKEN_LEN);

  let deployment = resources.iter().find(|r| r.kind() == "Deployment").unwrap();
  assert!(deployment.to_yaml().unwrap().contains(&format!("name: {}", configmap.name())));
}

#[test]
fn name_prefix_keeps_generator_references_intact() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "namePrefix: staging-\n",
      "resources:\n",
      "  - deployment.yaml\n",
      "configMapGenerator:\n",
      "  - name: app-config\n",
      "    literals:\n",
      "      - mode=debug\n",
    ),
  );
  write(
    &dir.path().join("deployment.yaml"),
    concat!(
      "apiVersion: apps/v1\n",
      "kind: Deployment\n",
      "metadata:\n",
      "  name: app\n",
      "spec:\n",
      "  template:\n",
      "    spec:\n",
      "      containers:\n",
      "        - name: main\n",
      "          envFrom:\n",
      "            - configMapRef:\n",
      "                name: app-config\n",
    ),
  );

  let resources = build(dir.path()).unwrap();

  let configmap = resources.iter().find(|r| r.kind() == "ConfigMap").unwrap();
  assert!(configmap.name().starts_with("staging-app-config-"));

  // The reference must track both renames: the prefix and the hash suffix.
  let deployment = resources.iter().find(|r| r.kind() == "Deployment").unwrap();
  assert_eq!(deployment.name(), "staging-app");
  let yaml = deployment.to_yaml().unwrap();
  assert!(yaml.contains(&format!("name: {}", configmap.name())));
  assert!(!yaml.contains("name: app-config\n"));
}

#[test]
fn name_prefix_updates_references_between_loaded_resources() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    "namePrefix: dev-\nresources:\n  - all.yaml\n",
  );
  write(
    &dir.path().join("all.yaml"),
    concat!(
      "apiVersion: v1\n",
      "kind: ConfigMap\n",
      "metadata:\n",
      "  name: settings\n",
      "data:\n",
      "  mode: debug\n",
      "---\n",
      "apiVersion: v1\n",
      "kind: Pod\n",
      "metadata:\n",
      "  name: web\n",
      "spec:\n",
      "  volumes:\n",
      "    - name: config\n",
      "      configMap:\n",
      "        name: settings\n",
    ),
  );

  let resources = build(dir.path()).unwrap();
  let pod = resources.iter().find(|r| r.kind() == "Pod").unwrap();
  assert!(pod.to_yaml().unwrap().contains("name: dev-settings"));
}

#[test]
fn namespace_is_applied_to_namespaced_resources() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "namespace: staging\n",
      "resources:\n",
      "  - manifests.yaml\n",
      "configMapGenerator:\n",
      "  - name: app-config\n",
      "    literals:\n",
      "      - mode=debug\n",
    ),
  );
  write(
    &dir.path().join("manifests.yaml"),
    concat!(
      "apiVersion: v1\n",
      "kind: Service\n",
      "metadata:\n",
      "  name: api\n",
      "  namespace: old\n",
      "---\n",
      "apiVersion: v1\n",
      "kind: Namespace\n",
      "metadata:\n",
      "  name: staging\n",
    ),
  );

  let resources = build(dir.path()).unwrap();
  let service = resources.iter().find(|r| r.kind() == "Service").unwrap();
  assert_eq!(service.namespace(), "staging");
  let configmap = resources.iter().find(|r| r.kind() == "ConfigMap").unwrap();
  assert_eq!(configmap.namespace(), "staging");
  let namespace = resources.iter().find(|r| r.kind() == "Namespace").unwrap();
  assert_eq!(namespace.namespace(), "");
}

#[test]
fn disable_name_suffix_hash_keeps_the_plain_name() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "configMapGenerator:\n",
      "  - name: plain\n",
      "    literals:\n",
      "      - a=1\n",
      "generatorOptions:\n",
      "  disableNameSuffixHash: true\n",
    ),
  );

  let resources = build(dir.path()).unwrap();
  assert_eq!(resources[0].name(), "plain");
}

#[test]
fn overlay_builds_its_base_recursively() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("base/kustomization.yaml"),
    "resources:\n  - service.yaml\n",
  );
  write(
    &dir.path().join("base/service.yaml"),
    "apiVersion: v1\nkind: Service\nmetadata:\n  name: api\n",
  );
  write(
    &dir.path().join("overlay/kustomization.yaml"),
    concat!(
      "resources:\n",
      "  - ../base\n",
      "namePrefix: staging-\n",
      "commonLabels:\n",
      "  env: staging\n",
    ),
  );

  let resources = build(&dir.path().join("overlay")).unwrap();
  assert_eq!(resources.len(), 1);
  assert_eq!(resources[0].name(), "staging-api");
  assert!(resources[0].to_yaml().unwrap().contains("env: staging"));
}

#[test]
fn images_are_rewritten_in_loaded_resources() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "resources:\n",
      "  - pod.yaml\n",
      "images:\n",
      "  - name: nginx\n",
      "    newTag: \"1.27\"\n",
    ),
  );
  write(
    &dir.path().join("pod.yaml"),
    "apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\nspec:\n  containers:\n    - name: web\n      image: nginx:1.25\n",
  );

  let resources = build(dir.path()).unwrap();
  assert!(resources[0].to_yaml().unwrap().contains("image: nginx:1.27"));
}

#[test]
fn builds_are_deterministic() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    concat!(
      "secretGenerator:\n",
      "  - name: creds\n",
      "    literals:\n",
      "      - user=admin\n",
      "      - password=hunter2\n",
    ),
  );

  let first = render(&build(dir.path()).unwrap()).unwrap();
  let second = render(&build(dir.path()).unwrap()).unwrap();
  assert_eq!(first, second);
  assert!(first.contains("kind: Secret"));
}

#[test]
fn multi_document_resource_files_are_split() {
  let dir = tempfile::tempdir().unwrap();
  write(&dir.path().join("kustomization.yaml"), "resources:\n  - all.yaml\n");
  write(
    &dir.path().join("all.yaml"),
    "kind: Service\nmetadata:\n  name: a\n---\nkind: Service\nmetadata:\n  name: b\n",
  );

  let resources = build(dir.path()).unwrap();
  assert_eq!(resources.len(), 2);

  let rendered = render(&resources).unwrap();
  assert_eq!(rendered.matches("kind: Service").count(), 2);
  assert!(rendered.contains("---\n"));
}

#[test]
fn missing_kustomization_is_reported() {
  let dir = tempfile::tempdir().unwrap();
  let err = build(dir.path()).unwrap_err();
  assert!(matches!(err, BuildError::MissingKustomization { .. }));
}

#[test]
fn failing_generator_is_named_in_the_error() {
  let dir = tempfile::tempdir().unwrap();
  write(
    &dir.path().join("kustomization.yaml"),
    "configMapGenerator:\n  - name: broken\n    literals:\n      - not-a-pair\n",
  );

  match build(dir.path()).unwrap_err() {
    BuildError::Generate { name, .. } => assert_eq!(name, "broken"),
    other => panic!("unexpected error: {other}"),
  }
}
