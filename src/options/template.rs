//! Template source descriptors.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RejigError, Result};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::vfs::{git, Vfs};

/// Supported backing stores for template and inventory sources.
///
/// This is a closed set: adding a new store means adding a variant here and
/// teaching [`SourceKind::open`] about it, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Source is stored on the local file system
    Local,
    /// Source is stored in a git repository
    Git,
}

impl SourceKind {
    /// Open a read-only virtual filesystem over a source location.
    ///
    /// Local sources are viewed in place; git sources are shallow-cloned
    /// into memory.
    pub fn open(&self, source: &str) -> Result<Vfs> {
        match self {
            SourceKind::Local => Ok(Vfs::Os),
            SourceKind::Git => git::clone_to_memory(source),
        }
    }

    /// Configuration-file spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Git => "git",
        }
    }
}

/// Metadata describing the source location of a single template.
///
/// Exclusion patterns are regular expressions matched against each entry's
/// path relative to the template root. They are compiled at most once per
/// descriptor, on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Protocol to use when retrieving template content
    #[serde(rename = "type")]
    pub kind: SourceKind,

    /// Path or URL where the source template can be found
    #[serde(default)]
    pub source: String,

    /// Friendly name used to refer to the template from the command line
    #[serde(default)]
    pub name: String,

    /// Optional sub-directory under `source` where the template definition
    /// lives. When absent the template is expected at the source root.
    #[serde(default, rename = "subdir", skip_serializing_if = "Option::is_none")]
    pub sub_dir: Option<String>,

    /// Regular expressions for files to exclude from template processing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,

    #[serde(skip)]
    compiled: OnceLock<Vec<Regex>>,
}

impl TemplateOptions {
    /// Create a descriptor with no sub-directory and no exclusions.
    pub fn new(kind: SourceKind, source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            name: name.into(),
            sub_dir: None,
            exclusions: Vec::new(),
            compiled: OnceLock::new(),
        }
    }

    /// Set the sub-directory under the source root.
    pub fn with_sub_dir(mut self, sub_dir: impl Into<String>) -> Self {
        self.sub_dir = Some(sub_dir.into());
        self
    }

    /// Set the exclusion patterns.
    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Source location with `~/` expanded to the user's home directory
    /// (local sources only).
    pub fn expanded_source(&self) -> String {
        if self.kind != SourceKind::Local {
            return self.source.clone();
        }
        match self.source.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest).to_string_lossy().into_owned(),
                None => self.source.clone(),
            },
            None => self.source.clone(),
        }
    }

    /// Open a virtual filesystem over this template's backing store.
    pub fn open(&self) -> Result<Vfs> {
        self.kind.open(&self.expanded_source())
    }

    /// Root folder of the template within its virtual filesystem.
    pub fn root_dir(&self) -> PathBuf {
        let base = match self.kind {
            SourceKind::Local => PathBuf::from(self.expanded_source()),
            SourceKind::Git => PathBuf::from("."),
        };
        match &self.sub_dir {
            Some(sub) => base.join(sub),
            None => base,
        }
    }

    /// Path to the template manifest file within its virtual filesystem.
    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir().join(MANIFEST_FILE_NAME)
    }

    /// Compiled exclusion patterns, built on first call and cached.
    ///
    /// Invalid patterns are caught by options validation before anything is
    /// rendered; this surfaces the same message if a descriptor bypassed it.
    pub fn exclusion_patterns(&self) -> Result<&[Regex]> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled.as_slice());
        }
        let mut patterns = Vec::with_capacity(self.exclusions.len());
        for expr in &self.exclusions {
            let re = Regex::new(expr).map_err(|e| RejigError::Validation {
                messages: vec![exclusion_message(&self.name, expr, &e)],
            })?;
            patterns.push(re);
        }
        Ok(self.compiled.get_or_init(|| patterns).as_slice())
    }

    /// Whether a path relative to the template root matches any exclusion.
    pub fn is_excluded(&self, rel_path: &str) -> Result<bool> {
        Ok(self
            .exclusion_patterns()?
            .iter()
            .any(|re| re.is_match(rel_path)))
    }
}

impl PartialEq for TemplateOptions {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.source == other.source
            && self.name == other.name
            && self.sub_dir == other.sub_dir
            && self.exclusions == other.exclusions
    }
}

pub(crate) fn exclusion_message(name: &str, expr: &str, err: &regex::Error) -> String {
    format!("template '{name}' exclusion pattern '{expr}' is invalid: {err}")
}
