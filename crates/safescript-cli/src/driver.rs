//! Directory driver: walks the source root, transforms script files into the
//! destination tree and copies everything else.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use safescript_codegen::{with_source_mapping_url, SourceMap};
use safescript_compiler::{
    compile_javascript, transform, ModuleKind, PipelineError, TransformOptions,
};
use safescript_types::CompileErrors;

use crate::reporter::Reporter;

/// Options for one run over a source tree.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub src: PathBuf,
    /// Same as `src` for an in-place run.
    pub dest: PathBuf,
    pub source_map: bool,
    pub allow_ts: bool,
    pub allow_angular: bool,
    pub module: ModuleKind,
}

/// Counts for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub transformed: usize,
    pub copied: usize,
    /// Files not emitted because of error diagnostics.
    pub failed: usize,
    /// Error diagnostics across all files.
    pub errors: usize,
    /// Entries the directory walk could not read.
    pub unreadable: usize,
}

impl Summary {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Script,
    TypeScript,
    Other,
}

fn file_kind(path: &Path, allow_ts: bool) -> FileKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js" | "jsx") => FileKind::Script,
        Some("ts" | "tsx") if allow_ts => FileKind::TypeScript,
        _ => FileKind::Other,
    }
}

/// Process every file under `options.src`. Diagnostics go to stderr through
/// `reporter`; a file with error diagnostics is skipped and the run goes on.
pub fn run(options: &DriverOptions, reporter: &Reporter) -> Result<Summary> {
    let src = fs::canonicalize(&options.src)
        .with_context(|| format!("cannot read source root {}", options.src.display()))?;
    fs::create_dir_all(&options.dest)
        .with_context(|| format!("cannot create {}", options.dest.display()))?;
    let dest = fs::canonicalize(&options.dest)?;
    let in_place = src == dest;
    let nested_dest = !in_place && dest.starts_with(&src);

    let mut summary = Summary::default();

    // Collected up front so outputs written under `src` are never revisited.
    let files: Vec<PathBuf> = WalkDir::new(&src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(nested_dest && entry.path().starts_with(&dest)))
        .filter_map(|entry| readable(entry, &mut summary))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    for path in files {
        let relative = path.strip_prefix(&src)?;
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        match file_kind(&path, options.allow_ts) {
            FileKind::Other => {
                if !in_place {
                    fs::copy(&path, &target)
                        .with_context(|| format!("cannot copy {}", path.display()))?;
                    summary.copied += 1;
                }
            }
            kind => {
                let errors = process_file(options, reporter, &path, &target, kind)?;
                if errors > 0 {
                    summary.failed += 1;
                    summary.errors += errors;
                } else {
                    summary.transformed += 1;
                }
            }
        }
    }
    tracing::debug!(?summary, "run finished");
    Ok(summary)
}

/// Unwrap a walk entry, logging and counting the ones that cannot be read.
fn readable(entry: walkdir::Result<DirEntry>, summary: &mut Summary) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
            tracing::warn!(%path, error = %e, "skipping unreadable entry");
            summary.unreadable += 1;
            None
        }
    }
}

/// Transform one file and write its outputs. Returns the number of error
/// diagnostics; nothing is written when it is nonzero.
fn process_file(
    options: &DriverOptions,
    reporter: &Reporter,
    path: &Path,
    target: &Path,
    kind: FileKind,
) -> Result<usize> {
    let source =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let filename = path.display().to_string();
    let transform_options = TransformOptions {
        module: options.module,
        source_map: options.source_map,
        ..TransformOptions::default()
    };
    let result = transform(&source, &filename, &transform_options);
    report(reporter, &result.errors);
    let code = match result.code {
        Some(code) if result.success => code,
        _ => return Ok(result.errors.total_errors.max(1)),
    };
    tracing::debug!(file = %filename, passes = result.passes, changed = result.changed, "transformed");

    if kind == FileKind::TypeScript && !options.allow_angular {
        let js_target = javascript_target(target);
        let js_name = file_name(&js_target);
        let output = match compile_javascript(
            &code,
            &filename,
            &js_name,
            result.source_map.as_ref(),
        ) {
            Ok(output) => output,
            Err(PipelineError::Diagnostics { errors, .. }) => {
                report(reporter, &errors);
                return Ok(errors.total_errors.max(1));
            }
        };
        return write_output(&js_target, path, output.code, output.source_map, true)
            .map(|()| 0);
    }

    let append_url = kind != FileKind::TypeScript;
    write_output(target, path, code, result.source_map, append_url).map(|()| 0)
}

fn report(reporter: &Reporter, errors: &CompileErrors) {
    if errors.total_errors > 0 || errors.total_warnings > 0 {
        eprintln!("{}", reporter.render(errors));
    }
}

/// Write `code` to `target`, and its map to `{target}.map` with `file` set to
/// the output's name and `sources` to the original relative to the output.
fn write_output(
    target: &Path,
    original: &Path,
    code: String,
    source_map: Option<SourceMap>,
    append_url: bool,
) -> Result<()> {
    let Some(mut map) = source_map else {
        fs::write(target, code).with_context(|| format!("cannot write {}", target.display()))?;
        return Ok(());
    };
    let map_path = map_path(target);
    let output_dir = target.parent().unwrap_or_else(|| Path::new(""));
    map.file = file_name(target);
    map.sources = vec![relative_path(output_dir, original)];
    fs::write(&map_path, map.to_json()?)
        .with_context(|| format!("cannot write {}", map_path.display()))?;

    let code = if append_url {
        with_source_mapping_url(&code, &file_name(&map_path))
    } else {
        code
    };
    fs::write(target, code).with_context(|| format!("cannot write {}", target.display()))?;
    Ok(())
}

/// `a.ts` → `a.js`, `a.tsx` → `a.jsx`.
fn javascript_target(target: &Path) -> PathBuf {
    match target.extension().and_then(|ext| ext.to_str()) {
        Some("tsx") => target.with_extension("jsx"),
        _ => target.with_extension("js"),
    }
}

fn map_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path to `to` relative to the directory `from`, with `/` separators.
/// Both must be absolute.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Compose two map files; the result keeps SECOND's `file` and FIRST's
/// `sources`.
pub fn compose_files(first: &Path, second: &Path) -> Result<SourceMap> {
    let read = |path: &Path| -> Result<SourceMap> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        SourceMap::from_json(&text).with_context(|| format!("invalid source map {}", path.display()))
    };
    let first = read(first)?;
    let second = read(second)?;
    Ok(safescript_codegen::compose_source_maps(&first, &second)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_extensions() {
        assert_eq!(file_kind(Path::new("a.js"), false), FileKind::Script);
        assert_eq!(file_kind(Path::new("a.jsx"), false), FileKind::Script);
        assert_eq!(file_kind(Path::new("a.ts"), true), FileKind::TypeScript);
        assert_eq!(file_kind(Path::new("a.ts"), false), FileKind::Other);
        assert_eq!(file_kind(Path::new("a.css"), true), FileKind::Other);
        assert_eq!(file_kind(Path::new("Makefile"), true), FileKind::Other);
    }

    #[test]
    fn unreadable_entries_are_counted() {
        let mut summary = Summary::default();
        let missing = WalkDir::new("/safescript/missing/root").into_iter().next();
        let Some(entry) = missing else {
            panic!("walk yields the root entry");
        };
        assert!(readable(entry, &mut summary).is_none());
        assert_eq!(summary.unreadable, 1);

        let here = WalkDir::new(".").into_iter().next();
        assert!(here.and_then(|entry| readable(entry, &mut summary)).is_some());
        assert_eq!(summary.unreadable, 1);
    }

    #[test]
    fn relative_paths() {
        assert_eq!(
            relative_path(Path::new("/p/dist"), Path::new("/p/src/a.ts")),
            "../src/a.ts"
        );
        assert_eq!(
            relative_path(Path::new("/p/src/lib"), Path::new("/p/src/lib/a.js")),
            "a.js"
        );
    }

    #[test]
    fn output_names() {
        assert_eq!(javascript_target(Path::new("/d/a.ts")), PathBuf::from("/d/a.js"));
        assert_eq!(javascript_target(Path::new("/d/a.tsx")), PathBuf::from("/d/a.jsx"));
        assert_eq!(map_path(Path::new("/d/a.js")), PathBuf::from("/d/a.js.map"));
    }
}
