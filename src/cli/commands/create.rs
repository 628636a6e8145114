//! Create command implementation.
//!
//! `rejig create <target> <alias>` resolves a template, prompts for its
//! parameters and renders it into the target directory.

use std::io::{self, Write};
use std::path::Path;

use console::style;
use tracing::info;

use crate::cli::args::CreateArgs;
use crate::error::{RejigError, Result};
use crate::manifest::Manifest;
use crate::options::AppOptions;
use crate::prompt::gather_params;
use crate::render::render;
use crate::resolver::find_template;

/// Run the create command with prompts on the process's standard streams.
pub fn execute(options: &AppOptions, args: &CreateArgs) -> Result<()> {
    let stdin = io::stdin();
    execute_with_io(options, args, &mut stdin.lock(), &mut io::stdout())
}

/// Run the create command, prompting through the given streams.
pub fn execute_with_io<R, W>(
    options: &AppOptions,
    args: &CreateArgs,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    R: io::BufRead,
    W: Write,
{
    ensure_target_usable(&args.target_path)?;

    writeln!(
        output,
        "{}",
        style(format!("Loading template {}...", args.template_alias)).cyan()
    )
    .map_err(output_error)?;

    let template = find_template(options, &args.template_alias)?;
    let vfs = template.open()?;
    let manifest = Manifest::parse(&vfs, &template.manifest_path())?;
    info!(
        alias = %args.template_alias,
        version = %manifest.versions.template,
        args = manifest.template.args.len(),
        "template loaded"
    );

    let context = gather_params(&manifest, input, output)?;

    writeln!(output, "{}", style("Generating project...").cyan()).map_err(output_error)?;
    let exclusions = template.exclusion_patterns()?;
    render(
        &vfs,
        &template.root_dir(),
        &args.target_path,
        &context,
        exclusions,
    )?;

    writeln!(
        output,
        "{} {}",
        style("Project generated in").green(),
        style(args.target_path.display()).green().bold()
    )
    .map_err(output_error)?;
    Ok(())
}

/// Refuse to render into a directory that already has content.
fn ensure_target_usable(target: &Path) -> Result<()> {
    match std::fs::read_dir(target) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                Err(RejigError::PathNotEmpty {
                    path: target.to_path_buf(),
                })
            } else {
                Ok(())
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn output_error(e: io::Error) -> RejigError {
    RejigError::Input {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE_NAME;
    use crate::options::{SourceKind, TemplateOptions};
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_sample_template(dir: &Path) {
        fs::write(
            dir.join(MANIFEST_FILE_NAME),
            "template:\n  args:\n    - name: project_name\n      description: Name of the project\n",
        )
        .unwrap();
        fs::write(dir.join("hello.txt"), "hello {{project_name}}\n").unwrap();
    }

    fn registry_for(dir: &Path) -> AppOptions {
        AppOptions {
            templates: vec![TemplateOptions::new(
                SourceKind::Local,
                dir.to_string_lossy().into_owned(),
                "sample",
            )],
            inventories: vec![],
        }
    }

    #[test]
    fn create_renders_into_fresh_directory() {
        let source = TempDir::new().unwrap();
        write_sample_template(source.path());
        let target = TempDir::new().unwrap();
        let target_path = target.path().join("out");

        let args = CreateArgs {
            target_path: target_path.clone(),
            template_alias: "sample".into(),
        };
        let mut input = Cursor::new(b"MyProj\n".to_vec());
        let mut output = Vec::new();

        execute_with_io(&registry_for(source.path()), &args, &mut input, &mut output).unwrap();

        assert_eq!(
            fs::read_to_string(target_path.join("hello.txt")).unwrap(),
            "hello MyProj\n"
        );
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Loading template sample..."));
        assert!(printed.contains("Name of the project(project_name): "));
        assert!(printed.contains("Generating project..."));
    }

    #[test]
    fn create_refuses_non_empty_target() {
        let source = TempDir::new().unwrap();
        write_sample_template(source.path());
        let target = TempDir::new().unwrap();
        fs::write(target.path().join("existing.txt"), "data").unwrap();

        let args = CreateArgs {
            target_path: target.path().to_path_buf(),
            template_alias: "sample".into(),
        };
        let mut input = Cursor::new(b"MyProj\n".to_vec());
        let mut output = Vec::new();

        let err = execute_with_io(&registry_for(source.path()), &args, &mut input, &mut output)
            .unwrap_err();
        assert!(matches!(err, RejigError::PathNotEmpty { .. }));
        // Refused before any prompt was shown
        assert!(output.is_empty());
    }

    #[test]
    fn create_accepts_existing_empty_target() {
        let source = TempDir::new().unwrap();
        write_sample_template(source.path());
        let target = TempDir::new().unwrap();

        let args = CreateArgs {
            target_path: target.path().to_path_buf(),
            template_alias: "sample".into(),
        };
        let mut input = Cursor::new(b"MyProj\n".to_vec());
        let mut output = Vec::new();

        execute_with_io(&registry_for(source.path()), &args, &mut input, &mut output).unwrap();
        assert!(target.path().join("hello.txt").exists());
    }

    #[test]
    fn create_reports_unknown_alias() {
        let args = CreateArgs {
            target_path: PathBuf::from("/tmp/never-created"),
            template_alias: "missing".into(),
        };
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        let err = execute_with_io(&AppOptions::default(), &args, &mut input, &mut output)
            .unwrap_err();
        assert!(matches!(err, RejigError::UnknownTemplate { .. }));
    }

    #[test]
    fn create_reports_missing_manifest() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("loose.txt"), "no manifest here").unwrap();
        let target = TempDir::new().unwrap();

        let args = CreateArgs {
            target_path: target.path().join("out"),
            template_alias: "sample".into(),
        };
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        let err = execute_with_io(&registry_for(source.path()), &args, &mut input, &mut output)
            .unwrap_err();
        assert!(matches!(err, RejigError::ManifestNotFound { .. }));
    }
}
