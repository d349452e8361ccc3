use crate::config::Config;
use crate::emitter::{self, EmitOptions, GenerationResult};
use crate::error::{Error, Result};
use crate::generator::{self, GeneratorConfig};
use crate::scanner::{self, ScanOptions};
use crate::variant::{self, ResolveOptions};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DEFAULT_BASE_CSS: &str = include_str!("base.css");
pub const BASE_CSS_FILE_NAME: &str = "vibe-base.css";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub scan: ScanOptions,
    pub resolve: ResolveOptions,
    pub minify: bool,
    pub include_base: bool,
    pub base_css: Option<PathBuf>,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ProjectOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scan: ScanOptions {
                patterns: config.patterns.clone(),
                exclude: config.exclude.clone(),
                ignore_classes: config.ignore.clone(),
                respect_gitignore: true,
            },
            resolve: ResolveOptions {
                generator: GeneratorConfig {
                    prefix: config.prefix.clone(),
                    colors: config.theme.colors.clone(),
                },
                allow_unprefixed: config.allow_unprefixed,
            },
            minify: config.minify,
            include_base: config.include_base,
            base_css: config.base_css.clone(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.resolve.generator.prefix
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub files: usize,
    pub total: usize,
    pub recognized: usize,
    pub unknown: Vec<String>,
}

/// Scans a directory and classifies every candidate without writing anything.
pub fn scan_project(directory: &Path, options: &ProjectOptions) -> Result<ScanReport> {
    let scanned = scanner::scan_directory(directory, &options.scan)?;
    let tokens: Vec<&String> = scanned.classes.iter().collect();
    let recognized: Vec<bool> = tokens
        .par_iter()
        .map(|token| variant::resolve(token, &options.resolve).is_some())
        .collect();

    let unknown = tokens
        .iter()
        .zip(&recognized)
        .filter(|(_, known)| !**known)
        .map(|(token, _)| (*token).clone())
        .collect::<Vec<_>>();

    Ok(ScanReport {
        files: scanned.files_scanned(),
        total: tokens.len(),
        recognized: tokens.len() - unknown.len(),
        unknown,
    })
}

/// Scans, generates, and atomically writes the stylesheet to `output`.
pub fn generate_project(
    directory: &Path,
    options: &ProjectOptions,
    output: &Path,
) -> Result<GenerationResult> {
    let scanned = scanner::scan_directory(directory, &options.scan)?;
    let tokens: Vec<String> = scanned.classes.into_iter().collect();
    let result = render(&tokens, directory, options)?;
    write_atomic(output, &result.css)?;
    tracing::info!(
        output = %output.display(),
        rules = result.rule_count,
        unknown = result.unknown.len(),
        bytes = result.bytes(),
        "stylesheet written"
    );
    Ok(result)
}

/// Emits the stylesheet for an already collected token list.
pub fn render(tokens: &[String], directory: &Path, options: &ProjectOptions) -> Result<GenerationResult> {
    let base_css = load_base_css(directory, options)?;
    let emit_options = EmitOptions {
        resolve: options.resolve.clone(),
        minify: options.minify,
        base_css,
    };
    Ok(emitter::emit(tokens, &emit_options))
}

/// Picks the base stylesheet: an explicitly configured file, then
/// `<directory>/vibe-base.css`, then the compiled-in variables.
pub fn load_base_css(directory: &Path, options: &ProjectOptions) -> Result<Option<String>> {
    if !options.include_base {
        return Ok(None);
    }
    if let Some(path) = &options.base_css {
        let path = if path.is_absolute() {
            path.clone()
        } else {
            directory.join(path)
        };
        return fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| Error::read(path, err));
    }

    let conventional = directory.join(BASE_CSS_FILE_NAME);
    if conventional.is_file() {
        return fs::read_to_string(&conventional)
            .map(Some)
            .map_err(|err| Error::read(conventional, err));
    }

    Ok(Some(default_base_css(options.prefix())))
}

pub fn default_base_css(prefix: &str) -> String {
    DEFAULT_BASE_CSS.replace("--vibe-", &generator::variable_prefix(prefix))
}

/// Writes through a temp file in the destination directory and renames it
/// into place, so `path` holds either the old or the new contents.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| Error::write(path, err))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|err| Error::write(path, err))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| Error::write(path, err))?;
    file.flush().map_err(|err| Error::write(path, err))?;
    file.persist(path)
        .map_err(|err| Error::write(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ProjectOptions, default_base_css, generate_project, load_base_css, scan_project, write_atomic};
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("Index.razor"),
            "<div class=\"vibe-flex hover:vibe-bg-secondary flex\"></div>",
        )
        .expect("write fixture");
        dir
    }

    #[test]
    fn scan_reports_recognized_and_unknown() {
        let dir = fixture();
        let report = scan_project(dir.path(), &ProjectOptions::default()).expect("scan");
        assert_eq!(report.files, 1);
        assert_eq!(report.total, 3);
        assert_eq!(report.recognized, 2);
        assert_eq!(report.unknown, vec!["flex".to_string()]);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing");
        assert!(matches!(
            scan_project(&missing, &ProjectOptions::default()),
            Err(Error::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn generate_writes_output() {
        let dir = fixture();
        let output = dir.path().join("wwwroot").join("vibe.css");
        let result =
            generate_project(dir.path(), &ProjectOptions::default(), &output).expect("generate");
        let written = fs::read_to_string(&output).expect("read output");
        assert_eq!(written, result.css.to_string());
        assert!(written.contains("--vibe-secondary"));
        assert!(written.contains(".hover\\:vibe-bg-secondary:hover"));
    }

    #[test]
    fn base_css_prefers_project_file() {
        let dir = TempDir::new().expect("temp dir");
        let options = ProjectOptions::default();
        let builtin = load_base_css(dir.path(), &options).expect("builtin");
        assert!(builtin.is_some_and(|css| css.contains("--vibe-primary")));

        fs::write(dir.path().join("vibe-base.css"), ":root { --x: 1; }").expect("write base");
        let project = load_base_css(dir.path(), &options).expect("project base");
        assert_eq!(project.as_deref(), Some(":root { --x: 1; }"));

        let without = ProjectOptions {
            include_base: false,
            ..ProjectOptions::default()
        };
        assert_eq!(load_base_css(dir.path(), &without).expect("no base"), None);
    }

    #[test]
    fn builtin_base_follows_prefix() {
        let css = default_base_css("ui");
        assert!(css.contains("--ui-primary"));
        assert!(!css.contains("--vibe-"));
    }

    #[test]
    fn atomic_write_replaces_contents() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("out.css");
        write_atomic(&path, "a").expect("first write");
        write_atomic(&path, "b").expect("second write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "b");
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").expect("write blocker");
        let path = blocker.join("out.css");
        assert!(matches!(write_atomic(&path, "css"), Err(Error::Write { .. })));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }
}
