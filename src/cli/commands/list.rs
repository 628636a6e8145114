//! List command implementation.
//!
//! `rejig list` prints every registered template alias, including the
//! contents of each registered inventory. An inventory that cannot be
//! fetched is reported inline without failing the whole listing.

use std::io::{self, Write};

use console::style;
use tracing::warn;

use crate::error::{RejigError, Result};
use crate::options::AppOptions;

/// Run the list command, printing to standard output.
pub fn execute(options: &AppOptions) -> Result<()> {
    execute_with_output(options, &mut io::stdout())
}

/// Run the list command, printing to the given stream.
pub fn execute_with_output<W: Write>(options: &AppOptions, output: &mut W) -> Result<()> {
    if options.templates.is_empty() && options.inventories.is_empty() {
        writeln!(output, "No templates registered").map_err(output_error)?;
        return Ok(());
    }

    if !options.templates.is_empty() {
        writeln!(output, "{}", style("Templates:").bold()).map_err(output_error)?;
        for template in &options.templates {
            writeln!(
                output,
                "  {} {}",
                style(&template.name).cyan(),
                style(format!("({} {})", template.kind.as_str(), template.source)).dim()
            )
            .map_err(output_error)?;
        }
    }

    for inventory in &options.inventories {
        writeln!(
            output,
            "{}",
            style(format!("Inventory {}:", inventory.namespace)).bold()
        )
        .map_err(output_error)?;
        match inventory.template_definitions() {
            Ok(definitions) => {
                for template in definitions {
                    writeln!(
                        output,
                        "  {}.{}",
                        style(&inventory.namespace).cyan(),
                        style(&template.name).cyan()
                    )
                    .map_err(output_error)?;
                }
            }
            Err(e) => {
                warn!(namespace = %inventory.namespace, error = %e, "failed to read inventory");
                writeln!(output, "  {}", style(format!("unavailable: {e}")).yellow())
                    .map_err(output_error)?;
            }
        }
    }

    Ok(())
}

fn output_error(e: io::Error) -> RejigError {
    RejigError::Input {
        message: e.to_string(),
    }
}
