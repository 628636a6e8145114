//! Rejig - Project generation from templates.
//!
//! Rejig renders a registered project template into a fresh directory tree,
//! substituting user-supplied parameters into file names and contents.
//! Templates live on the local filesystem or in remote git repositories, and
//! can be grouped into namespaced inventories.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - Template manifest and inventory definition files
//! - [`options`] - Application options: registered templates and inventories
//! - [`prompt`] - Interactive parameter gathering
//! - [`render`] - Template rendering into a target directory
//! - [`resolver`] - Alias resolution against the registry
//! - [`vfs`] - Virtual filesystem over local and remote sources
//!
//! # Example
//!
//! ```
//! use rejig::options::{AppOptions, SourceKind, TemplateOptions};
//! use rejig::resolver::find_template;
//!
//! let options = AppOptions {
//!     templates: vec![TemplateOptions::new(SourceKind::Local, "/srv/templates/api", "api")],
//!     inventories: vec![],
//! };
//! let template = find_template(&options, "api").unwrap();
//! assert_eq!(template.name, "api");
//! ```

pub mod cli;
pub mod error;
pub mod manifest;
pub mod options;
pub mod prompt;
pub mod render;
pub mod resolver;
pub mod vfs;

pub use error::{RejigError, Result};
