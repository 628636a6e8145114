//! Template alias resolution.
//!
//! An alias is either a bare template name (`api`) looked up among the
//! individually registered templates, or a namespaced form (`MyNS.api`)
//! resolved through a registered inventory. Resolution through an inventory
//! fetches the inventory's definition file on demand.

use tracing::debug;

use crate::error::{RejigError, Result};
use crate::options::{AppOptions, TemplateOptions};

/// Resolve `alias` to a template descriptor using the given registry.
///
/// A namespaced alias has exactly two dot-separated parts; more than two is
/// malformed. An unknown name, an unknown namespace and a name missing from
/// an otherwise valid inventory all report the same unknown-template error
/// carrying the full alias as given.
pub fn find_template(options: &AppOptions, alias: &str) -> Result<TemplateOptions> {
    let parts: Vec<&str> = alias.split('.').collect();
    match parts.as_slice() {
        [name] => {
            debug!(alias, "resolving bare template name");
            options
                .find_template(name)
                .cloned()
                .ok_or_else(|| unknown(alias))
        }
        [namespace, name] => {
            debug!(alias, namespace, "resolving namespaced template");
            let inventory = options.find_inventory(namespace).ok_or_else(|| unknown(alias))?;
            inventory
                .template_definitions()?
                .into_iter()
                .find(|t| t.name == *name)
                .ok_or_else(|| unknown(alias))
        }
        _ => Err(RejigError::InvalidAlias {
            alias: alias.to_string(),
        }),
    }
}

fn unknown(alias: &str) -> RejigError {
    RejigError::UnknownTemplate {
        alias: alias.to_string(),
    }
}
