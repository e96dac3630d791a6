//! Overlay transformers.
//!
//! Each transformer rewrites a set of resources in place. The build
//! pipeline applies them in a fixed order: name affixes, then namespace
//! assignment, then common labels and annotations, then image rewrites,
//! then the content-hash name suffix. Passes that rename resources
//! return [`Rename`] records; [`update_name_references`] rewrites
//! references to the old names.
//!
//! # Modules
//!
//! - [`affix`] - name prefix/suffix application
//! - [`namespace`] - namespace assignment
//! - [`metadata`] - common label and annotation injection
//! - [`images`] - image name/tag/digest substitution
//! - [`hash_suffix`] - content-hash name suffixes
//! - [`nameref`] - reference renaming after a rename pass

pub mod affix;
pub mod hash_suffix;
pub mod images;
pub mod metadata;
pub mod nameref;
pub mod namespace;

pub use affix::apply_name_affix;
pub use hash_suffix::apply_hash_suffix;
pub use images::{Image, apply_images};
pub use metadata::{apply_common_annotations, apply_common_labels};
pub use nameref::{Rename, update_name_references};
pub use namespace::apply_namespace;
