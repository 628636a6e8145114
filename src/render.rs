//! Template rendering.
//!
//! Walks a template tree and reproduces it under a target directory,
//! substituting parameters into both entry names and file contents. The
//! manifest file itself and anything matching an exclusion pattern is left
//! out of the output; excluding a directory prunes its entire subtree.
//!
//! File contents that are not valid UTF-8 are copied through byte for byte,
//! so binary assets inside a template survive unmodified. Permission bits
//! are carried over from the source on platforms that have them.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tera::Tera;
use tracing::{debug, trace};

use crate::error::{RejigError, Result};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::prompt::RenderContext;
use crate::vfs::Vfs;

/// Render the template rooted at `root` within `vfs` into `target`.
///
/// Directories are created before the entries inside them; the walk order
/// guarantees a parent is always seen first. Substitution failures carry the
/// source-relative path of the offending entry and are distinct from plain
/// I/O failures.
pub fn render(
    vfs: &Vfs,
    root: &Path,
    target: &Path,
    context: &RenderContext,
    exclusions: &[Regex],
) -> Result<()> {
    let tera_context = context.to_tera();
    let mut pruned: Vec<PathBuf> = Vec::new();

    fs::create_dir_all(target).map_err(|e| io_error(PathBuf::new())(e))?;

    for entry in vfs.walk(root).map_err(|e| io_error(root.into())(e))? {
        if entry.rel.as_os_str().is_empty() {
            continue;
        }
        let rel_str = entry.rel.to_string_lossy();
        if rel_str == MANIFEST_FILE_NAME {
            continue;
        }
        if pruned.iter().any(|p| entry.rel.starts_with(p)) {
            trace!(path = %rel_str, "inside excluded directory, skipping");
            continue;
        }

        let meta = vfs
            .metadata(&entry.path)
            .map_err(io_error(entry.rel.clone()))?;

        if exclusions.iter().any(|re| re.is_match(&rel_str)) {
            debug!(path = %rel_str, "excluded from rendering");
            if meta.is_dir {
                pruned.push(entry.rel.clone());
            }
            continue;
        }

        let rendered_rel = Tera::one_off(&rel_str, &tera_context, false)
            .map_err(template_error(entry.rel.clone()))?;
        let dest = target.join(&rendered_rel);

        if meta.is_dir {
            trace!(from = %rel_str, to = %rendered_rel, "creating directory");
            fs::create_dir_all(&dest).map_err(io_error(entry.rel.clone()))?;
        } else {
            trace!(from = %rel_str, to = %rendered_rel, "rendering file");
            let raw = vfs
                .read(&entry.path)
                .map_err(io_error(entry.rel.clone()))?;
            let data = match String::from_utf8(raw) {
                Ok(text) => Tera::one_off(&text, &tera_context, false)
                    .map_err(template_error(entry.rel.clone()))?
                    .into_bytes(),
                // Not text, copy through untouched
                Err(e) => e.into_bytes(),
            };
            fs::write(&dest, data).map_err(io_error(entry.rel.clone()))?;
        }

        set_mode(&dest, meta.mode).map_err(io_error(entry.rel.clone()))?;
    }

    Ok(())
}

fn io_error(path: PathBuf) -> impl FnOnce(std::io::Error) -> RejigError {
    move |source| RejigError::RenderIo { path, source }
}

fn template_error(path: PathBuf) -> impl FnOnce(tera::Error) -> RejigError {
    move |source| RejigError::TemplateSyntax { path, source }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryTree;
    use tempfile::TempDir;

    fn sample_template() -> Vfs {
        let mut tree = MemoryTree::new();
        tree.add_file(
            MANIFEST_FILE_NAME,
            b"template:\n  args:\n    - name: project_name\n    - name: version\n".to_vec(),
            0o644,
        );
        tree.add_file(".gitignore", b"target/\n".to_vec(), 0o644);
        tree.add_file("version.txt", b"{{version}}\n".to_vec(), 0o644);
        tree.add_file(
            "{{project_name}}/main.txt",
            b"starting {{project_name}}\n".to_vec(),
            0o644,
        );
        Vfs::Memory(tree)
    }

    fn sample_context() -> RenderContext {
        let mut context = RenderContext::new();
        context.insert("project_name", "MyProj");
        context.insert("version", "1.2.3");
        context
    }

    #[test]
    fn renders_names_and_contents() {
        let vfs = sample_template();
        let target = TempDir::new().unwrap();

        render(&vfs, Path::new("."), target.path(), &sample_context(), &[]).unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join(".gitignore")).unwrap(),
            "target/\n"
        );
        assert_eq!(
            fs::read_to_string(target.path().join("version.txt")).unwrap(),
            "1.2.3\n"
        );
        assert_eq!(
            fs::read_to_string(target.path().join("MyProj/main.txt")).unwrap(),
            "starting MyProj\n"
        );
    }

    #[test]
    fn manifest_file_is_not_rendered() {
        let vfs = sample_template();
        let target = TempDir::new().unwrap();

        render(&vfs, Path::new("."), target.path(), &sample_context(), &[]).unwrap();
        assert!(!target.path().join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn excluded_directory_is_pruned_with_descendants() {
        let mut tree = MemoryTree::new();
        tree.add_file("keep.txt", b"keep".to_vec(), 0o644);
        tree.add_file(".github/workflows/ci.yml", b"jobs:\n".to_vec(), 0o644);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        let exclusions = vec![Regex::new(r"^\.github$").unwrap()];
        render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &exclusions,
        )
        .unwrap();

        assert!(target.path().join("keep.txt").exists());
        assert!(!target.path().join(".github").exists());
    }

    #[test]
    fn excluded_file_is_skipped() {
        let mut tree = MemoryTree::new();
        tree.add_file("keep.txt", b"keep".to_vec(), 0o644);
        tree.add_file("secret.pem", b"key".to_vec(), 0o600);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        let exclusions = vec![Regex::new(r"\.pem$").unwrap()];
        render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &exclusions,
        )
        .unwrap();

        assert!(target.path().join("keep.txt").exists());
        assert!(!target.path().join("secret.pem").exists());
    }

    #[test]
    fn renders_from_subdirectory_root() {
        let mut tree = MemoryTree::new();
        tree.add_file("templates/api/hello.txt", b"hi {{name}}\n".to_vec(), 0o644);
        tree.add_file("unrelated.txt", b"no".to_vec(), 0o644);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        let mut context = RenderContext::new();
        context.insert("name", "there");
        render(
            &vfs,
            Path::new("templates/api"),
            target.path(),
            &context,
            &[],
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join("hello.txt")).unwrap(),
            "hi there\n"
        );
        assert!(!target.path().join("unrelated.txt").exists());
    }

    #[test]
    fn binary_contents_pass_through_untouched() {
        let payload = vec![0u8, 159, 146, 150, 255];
        let mut tree = MemoryTree::new();
        tree.add_file("blob.bin", payload.clone(), 0o644);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &[],
        )
        .unwrap();

        assert_eq!(fs::read(target.path().join("blob.bin")).unwrap(), payload);
    }

    #[test]
    fn bad_substitution_in_contents_reports_source_path() {
        let mut tree = MemoryTree::new();
        tree.add_file("broken.txt", b"{{ unclosed\n".to_vec(), 0o644);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        let err = render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &[],
        )
        .unwrap_err();

        match err {
            RejigError::TemplateSyntax { path, .. } => {
                assert_eq!(path, Path::new("broken.txt"));
            }
            other => panic!("expected TemplateSyntax, got {other:?}"),
        }
    }

    #[test]
    fn missing_parameter_fails_rendering() {
        let mut tree = MemoryTree::new();
        tree.add_file("needs.txt", b"{{never_given}}\n".to_vec(), 0o644);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        let err = render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, RejigError::TemplateSyntax { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_are_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let mut tree = MemoryTree::new();
        tree.add_file("run.sh", b"#!/bin/sh\n".to_vec(), 0o755);
        let vfs = Vfs::Memory(tree);
        let target = TempDir::new().unwrap();

        render(
            &vfs,
            Path::new("."),
            target.path(),
            &RenderContext::new(),
            &[],
        )
        .unwrap();

        let mode = fs::metadata(target.path().join("run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o7777, 0o755);
    }

    #[test]
    fn renders_from_real_filesystem() {
        let source = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("{{dir}}")).unwrap();
        fs::write(source.path().join("{{dir}}/note.txt"), "v{{version}}").unwrap();
        fs::write(source.path().join(MANIFEST_FILE_NAME), "template:\n  args: []\n").unwrap();
        let target = TempDir::new().unwrap();

        let mut context = RenderContext::new();
        context.insert("dir", "out");
        context.insert("version", "2");
        render(&Vfs::Os, source.path(), target.path(), &context, &[]).unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join("out/note.txt")).unwrap(),
            "v2"
        );
        assert!(!target.path().join(MANIFEST_FILE_NAME).exists());
    }
}
