//! Overlay build orchestration.
//!
//! This module ties the pipeline together for one kustomization
//! directory:
//!
//! 1. Load the kustomization file
//! 2. Load each resource entry (file, or base directory built recursively)
//! 3. Run the ConfigMap/Secret generators
//! 4. Apply transformers: name affixes (with reference renaming),
//!    namespace, labels, annotations, images
//! 5. Hash-suffix generated resources and rewrite references to them
//!
//! Errors carry the resource or generator they refer to; an unhashable
//! resource is fatal for the build, since a resource that cannot be
//! hashed cannot be safely named.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::generate::{self, GenerateError, GeneratorOptions};
use crate::hash::HashError;
use crate::kustomization::{KUSTOMIZATION_FILE_NAMES, Kustomization};
use crate::resource::{Resource, ResourceError};
use crate::transform;

/// Errors that can occur while building a kustomization directory.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  #[error("no kustomization file in '{dir}'")]
  MissingKustomization { dir: String },

  #[error("failed to read '{path}': {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse '{path}': {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("invalid resource in '{path}': {source}")]
  Resource {
    path: String,
    #[source]
    source: ResourceError,
  },

  #[error("generator '{name}': {source}")]
  Generate {
    name: String,
    #[source]
    source: GenerateError,
  },

  #[error("failed to hash {kind} '{name}': {source}")]
  Hash {
    kind: String,
    name: String,
    #[source]
    source: HashError,
  },

  #[error("failed to render '{kind}/{name}': {source}")]
  Render {
    kind: String,
    name: String,
    #[source]
    source: ResourceError,
  },
}

/// Build a kustomization directory into its final resource set.
pub fn build(dir: &Path) -> Result<Vec<Resource>, BuildError> {
  let kustomization = load_kustomization(dir)?;
  info!(dir = %dir.display(), "building kustomization");

  // Bases and plain resource files, in declaration order.
  let mut resources = Vec::new();
  for entry in &kustomization.resources {
    let path = dir.join(entry);
    if path.is_dir() {
      debug!(base = %path.display(), "building base directory");
      resources.extend(build(&path)?);
    } else {
      debug!(file = %path.display(), "loading resource file");
      let text = fs::read_to_string(&path).map_err(|source| BuildError::Io {
        path: path.display().to_string(),
        source,
      })?;
      let documents = Resource::parse_documents(&text).map_err(|source| BuildError::Resource {
        path: path.display().to_string(),
        source,
      })?;
      resources.extend(documents);
    }
  }

  // Generators append after loaded resources; remember where they start
  // and which ones opted out of the hash suffix.
  let generated_start = resources.len();
  let mut suffix_disabled = Vec::new();
  let global_options = kustomization.generator_options.as_ref();

  for args in &kustomization.config_map_generator {
    let options = GeneratorOptions::merged(global_options, args.options.as_ref());
    let configmap =
      generate::make_configmap(args, &options, dir).map_err(|source| BuildError::Generate {
        name: args.name.clone(),
        source,
      })?;
    debug!(name = %args.name, "generated configmap");
    suffix_disabled.push(options.disable_name_suffix_hash);
    resources.push(configmap);
  }
  for args in &kustomization.secret_generator {
    let options = GeneratorOptions::merged(global_options, args.generator.options.as_ref());
    let secret = generate::make_secret(args, &options, dir).map_err(|source| BuildError::Generate {
      name: args.generator.name.clone(),
      source,
    })?;
    debug!(name = %args.generator.name, "generated secret");
    suffix_disabled.push(options.disable_name_suffix_hash);
    resources.push(secret);
  }

  // Affixing renames resources; references written against the original
  // names must follow before the hash-suffix pass renames them again.
  let affix_renames = transform::apply_name_affix(
    &mut resources,
    &kustomization.name_prefix,
    &kustomization.name_suffix,
  );
  transform::update_name_references(&mut resources, &affix_renames);
  transform::apply_namespace(&mut resources, &kustomization.namespace);
  transform::apply_common_labels(&mut resources, &kustomization.common_labels);
  transform::apply_common_annotations(&mut resources, &kustomization.common_annotations);
  transform::apply_images(&mut resources, &kustomization.images);

  // Hash-suffix the generated resources that did not opt out, then fix
  // up references across the whole set.
  let mut renames = Vec::new();
  for (offset, disabled) in suffix_disabled.iter().enumerate() {
    if *disabled {
      continue;
    }
    let index = generated_start + offset;
    let kind = resources[index].kind().to_string();
    let name = resources[index].name().to_string();
    let mut batch = transform::apply_hash_suffix(std::slice::from_mut(&mut resources[index]))
      .map_err(|source| BuildError::Hash { kind, name, source })?;
    renames.append(&mut batch);
  }
  transform::update_name_references(&mut resources, &renames);

  info!(
    count = resources.len(),
    generated = resources.len() - generated_start,
    "build complete"
  );
  Ok(resources)
}

/// Render resources as a multi-document YAML stream.
pub fn render(resources: &[Resource]) -> Result<String, BuildError> {
  let mut documents = Vec::with_capacity(resources.len());
  for resource in resources {
    let yaml = resource.to_yaml().map_err(|source| BuildError::Render {
      kind: resource.kind().to_string(),
      name: resource.name().to_string(),
      source,
    })?;
    documents.push(yaml);
  }
  Ok(documents.join("---\n"))
}

fn load_kustomization(dir: &Path) -> Result<Kustomization, BuildError> {
  for file_name in KUSTOMIZATION_FILE_NAMES {
    let path = dir.join(file_name);
    if !path.exists() {
      continue;
    }
    let text = fs::read_to_string(&path).map_err(|source| BuildError::Io {
      path: path.display().to_string(),
      source,
    })?;
    return Kustomization::from_yaml(&text).map_err(|source| BuildError::Parse {
      path: path.display().to_string(),
      source,
    });
  }
  Err(BuildError::MissingKustomization {
    dir: dir.display().to_string(),
  })
}
