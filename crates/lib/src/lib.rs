//! kapstan-lib: configuration overlays for Kubernetes-style manifests
//!
//! This crate takes a base set of resource documents plus layered
//! kustomization directives and produces the final merged output:
//! - `resource`: the structured document model (parsed YAML trees)
//! - `hash`: content-addressed name tokens for generated resources
//! - `generate`: ConfigMap/Secret generation from key/value sources
//! - `transform`: name affixes, label/annotation injection, image rewrites
//! - `build`: overlay orchestration over a kustomization directory

pub mod build;
pub mod generate;
pub mod hash;
pub mod kustomization;
pub mod resource;
pub mod transform;
