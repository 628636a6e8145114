//! Interactive parameter gathering.
//!
//! Templates declare their parameters in the manifest; before rendering, the
//! user is prompted for a value for each one, in declaration order. Prompting
//! reads and writes through injected streams so tests can drive it without a
//! terminal.

use std::io::{BufRead, Write};

use crate::error::{RejigError, Result};
use crate::manifest::Manifest;

/// Parameter values gathered for a render, in prompt order.
///
/// Order is preserved deliberately: it makes output and logs follow the
/// manifest's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: Vec<(String, String)>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(slot) = self.values.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.into();
        } else {
            self.values.push((name, value.into()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert to a substitution context usable by the renderer.
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (name, value) in &self.values {
            context.insert(name, value);
        }
        context
    }
}

/// Prompt for a value for each parameter the manifest declares.
///
/// Each prompt is written as `description(name): ` and a single line is read
/// in response, with trailing whitespace trimmed. Any read failure, including
/// end of input before all parameters are answered, aborts with an input
/// error; no partial context is returned.
pub fn gather_params<R: BufRead, W: Write>(
    manifest: &Manifest,
    input: &mut R,
    output: &mut W,
) -> Result<RenderContext> {
    let mut context = RenderContext::new();

    for arg in &manifest.template.args {
        write!(output, "{}({}): ", arg.description, arg.name).map_err(input_error)?;
        output.flush().map_err(input_error)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(input_error)?;
        if read == 0 {
            return Err(RejigError::Input {
                message: format!("end of input while reading value for '{}'", arg.name),
            });
        }
        context.insert(&arg.name, line.trim_end().to_string());
    }

    Ok(context)
}

fn input_error(e: std::io::Error) -> RejigError {
    RejigError::Input {
        message: e.to_string(),
    }
}
