//! Inventory source descriptors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manifest::{Inventory, INVENTORY_FILE_NAME};
use crate::options::{SourceKind, TemplateOptions};
use crate::vfs::Vfs;

/// Metadata describing a collection of templates published together under a
/// shared namespace.
///
/// An inventory contributes nothing at load time beyond this descriptor; its
/// definition file is only fetched and parsed when a namespaced alias is
/// resolved or the inventory is listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryOptions {
    /// Protocol to use when retrieving the inventory
    #[serde(rename = "type")]
    pub kind: SourceKind,

    /// Path or URL where the inventory can be found
    #[serde(default)]
    pub source: String,

    /// Namespace prefix used to refer to this inventory's templates
    #[serde(default)]
    pub namespace: String,
}

impl InventoryOptions {
    pub fn new(
        kind: SourceKind,
        source: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            namespace: namespace.into(),
        }
    }

    /// Open a virtual filesystem over this inventory's backing store.
    pub fn open(&self) -> Result<Vfs> {
        self.kind.open(&self.source)
    }

    /// Root folder of the inventory within its virtual filesystem.
    pub fn root_dir(&self) -> PathBuf {
        match self.kind {
            SourceKind::Local => PathBuf::from(&self.source),
            SourceKind::Git => PathBuf::from("."),
        }
    }

    /// Path to the inventory definition file within its virtual filesystem.
    pub fn inventory_path(&self) -> PathBuf {
        self.root_dir().join(INVENTORY_FILE_NAME)
    }

    /// Fetch the inventory definition and expand each listed template into a
    /// full descriptor.
    ///
    /// Expanded descriptors share the inventory's kind and source; the
    /// entry's own source becomes a sub-directory under the inventory root.
    /// They carry no exclusions of their own.
    pub fn template_definitions(&self) -> Result<Vec<TemplateOptions>> {
        let vfs = self.open()?;
        let inventory = Inventory::parse(&vfs, &self.inventory_path())?;

        Ok(inventory
            .templates
            .into_iter()
            .map(|entry| {
                TemplateOptions::new(self.kind, self.source.clone(), entry.name)
                    .with_sub_dir(entry.source)
            })
            .collect())
    }
}
