//! Template and inventory definition files.
//!
//! Every template carries a manifest (`.rejig.yml`) at its root describing
//! version metadata and the user-configurable parameters it supports. An
//! inventory carries a separate definition file (`.rejig.inv.yml`) at its
//! root listing the templates it contains.
//!
//! Both documents tolerate unknown top-level keys: anything outside the
//! recognized sections is preserved verbatim in an `extra` map so newer
//! manifests keep parsing on older engines.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RejigError, Result};
use crate::vfs::Vfs;

/// Fixed name of the template manifest file, at the template root.
pub const MANIFEST_FILE_NAME: &str = ".rejig.yml";

/// Fixed name of the inventory definition file, at the inventory root.
pub const INVENTORY_FILE_NAME: &str = ".rejig.inv.yml";

/// Version identifiers for various aspects of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Versions {
    /// Schema version describing the format of the manifest file
    pub schema: String,
    /// Minimum version of the rejig engine needed to process the template
    pub rejig: String,
    /// Version number of the template itself
    pub template: String,
}

/// A single user-configurable parameter declared by a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Name of the argument, exactly as used in the template contents
    pub name: String,
    /// Descriptive text explaining the purpose of the argument
    #[serde(default)]
    pub description: String,
}

/// The `template` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSection {
    /// Parameters supported by the template, in prompt order
    pub args: Vec<ArgSpec>,
}

/// Parsed content of a template manifest file. Immutable after parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Version identifiers for various aspects of the template
    pub versions: Versions,
    /// Metadata describing the template
    pub template: TemplateSection,
    /// Unrecognized top-level keys, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A template declared inside an inventory definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Name used to address the template as `namespace.name`
    pub name: String,
    /// Root of the template, relative to the inventory source
    pub source: String,
}

/// Parsed content of an inventory definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    /// Templates declared by this inventory
    pub templates: Vec<InventoryEntry>,
    /// Unrecognized top-level keys, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Manifest {
    /// Read and parse a template manifest through a virtual filesystem.
    pub fn parse(vfs: &Vfs, path: &Path) -> Result<Self> {
        let raw = read_definition(vfs, path)?;
        serde_yaml::from_slice(&raw).map_err(|e| RejigError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parse a template manifest from raw YAML.
    pub fn parse_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

impl Inventory {
    /// Read and parse an inventory definition through a virtual filesystem.
    pub fn parse(vfs: &Vfs, path: &Path) -> Result<Self> {
        let raw = read_definition(vfs, path)?;
        serde_yaml::from_slice(&raw).map_err(|e| RejigError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Read a definition file, mapping a missing file to [`RejigError::ManifestNotFound`].
fn read_definition(vfs: &Vfs, path: &Path) -> Result<Vec<u8>> {
    match vfs.read(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RejigError::ManifestNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}
