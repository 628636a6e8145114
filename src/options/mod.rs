//! Application options.
//!
//! The engine is configured by a single YAML file (by default
//! `~/.rejig.yaml`) declaring the templates and inventories the user has
//! registered. [`AppOptions::load`] reads, parses and validates it in one
//! step; a missing default file simply yields an empty registry so a fresh
//! install works out of the box.

mod inventory;
mod template;

pub use inventory::InventoryOptions;
pub use template::{SourceKind, TemplateOptions};

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RejigError, Result};

/// File name of the options file under the user's home directory.
pub const OPTIONS_FILE_NAME: &str = ".rejig.yaml";

/// The full set of templates and inventories known to the engine.
///
/// Values of this type are plain data: nothing global, nothing cached across
/// invocations. Every component that needs the registry takes it as an
/// argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// Individually registered templates, addressed by bare name
    pub templates: Vec<TemplateOptions>,
    /// Registered inventories, addressed by `namespace.name`
    pub inventories: Vec<InventoryOptions>,
}

impl AppOptions {
    /// Load options from `explicit`, or from the default location when no
    /// path is given.
    ///
    /// A missing file at the default location yields empty options; a
    /// missing explicitly-requested file is an error. The parsed options are
    /// validated before being returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                debug!(path = %path.display(), "no options file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(RejigError::ConfigParse {
                    path,
                    message: e.to_string(),
                })
            }
        };

        let options: AppOptions =
            serde_yaml::from_str(&content).map_err(|e| RejigError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        debug!(
            path = %path.display(),
            templates = options.templates.len(),
            inventories = options.inventories.len(),
            "loaded application options"
        );
        options.validate()?;
        Ok(options)
    }

    /// Check every template and inventory descriptor, accumulating all
    /// problems rather than stopping at the first.
    pub fn validate(&self) -> Result<()> {
        let mut messages = Vec::new();
        self.validate_templates(&mut messages);
        self.validate_inventories(&mut messages);

        if messages.is_empty() {
            Ok(())
        } else {
            Err(RejigError::Validation { messages })
        }
    }

    /// Find a registered template by bare name.
    pub fn find_template(&self, name: &str) -> Option<&TemplateOptions> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Find a registered inventory by namespace.
    pub fn find_inventory(&self, namespace: &str) -> Option<&InventoryOptions> {
        self.inventories.iter().find(|i| i.namespace == namespace)
    }

    fn validate_templates(&self, messages: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for (i, template) in self.templates.iter().enumerate() {
            if template.name.is_empty() {
                messages.push(format!("template {i} name is undefined"));
            }
            if template.source.is_empty() {
                messages.push(format!("template {i} source is undefined"));
            }
            if !template.name.is_empty() && !seen.insert(template.name.as_str()) {
                messages.push(format!(
                    "template name '{}' is defined more than once",
                    template.name
                ));
            }
            for expr in &template.exclusions {
                if let Err(e) = regex::Regex::new(expr) {
                    messages.push(template::exclusion_message(&template.name, expr, &e));
                }
            }
        }
    }

    fn validate_inventories(&self, messages: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for (i, inventory) in self.inventories.iter().enumerate() {
            if inventory.namespace.is_empty() {
                messages.push(format!("inventory {i} namespace is undefined"));
            }
            if inventory.source.is_empty() {
                messages.push(format!("inventory {i} source is undefined"));
            }
            if !inventory.namespace.is_empty() && !seen.insert(inventory.namespace.as_str()) {
                messages.push(format!(
                    "inventory namespace '{}' is defined more than once",
                    inventory.namespace
                ));
            }
        }
    }
}

/// Default options file path, under the user's home directory.
fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(OPTIONS_FILE_NAME))
}
