//! Incremental regeneration on file changes.

use crate::emitter::GenerationResult;
use crate::error::{Error, Result};
use crate::pipeline::{self, BASE_CSS_FILE_NAME, ProjectOptions};
use crate::scanner::{self, FileFilter, ScanResult};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Tokens contributed by each file, with a count of how many files
/// contribute every token. A token disappears only once no file mentions it.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    files: HashMap<PathBuf, BTreeSet<String>>,
    counts: BTreeMap<String, usize>,
}

impl TokenIndex {
    pub fn from_scan(scan: ScanResult) -> Self {
        let mut index = Self::default();
        for (path, tokens) in scan.files {
            index.replace_file(path, tokens);
        }
        index
    }

    /// Swaps a file's contribution for a fresh scan. Returns whether the
    /// overall token set changed.
    pub fn replace_file(&mut self, path: PathBuf, tokens: BTreeSet<String>) -> bool {
        let previous = self.files.remove(&path).unwrap_or_default();
        let mut changed = false;
        for token in previous.difference(&tokens) {
            changed |= self.release(token);
        }
        for token in tokens.difference(&previous) {
            changed |= self.retain(token);
        }
        if !tokens.is_empty() {
            self.files.insert(path, tokens);
        }
        changed
    }

    pub fn remove_file(&mut self, path: &Path) -> bool {
        let Some(previous) = self.files.remove(path) else {
            return false;
        };
        let mut changed = false;
        for token in &previous {
            changed |= self.release(token);
        }
        changed
    }

    /// All live tokens in sorted order.
    pub fn tokens(&self) -> Vec<String> {
        self.counts.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contributors(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    fn retain(&mut self, token: &str) -> bool {
        let count = self.counts.entry(token.to_string()).or_insert(0);
        *count += 1;
        *count == 1
    }

    fn release(&mut self, token: &str) -> bool {
        match self.counts.get_mut(token) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(token);
                true
            }
            None => false,
        }
    }
}

pub struct WatchSession {
    directory: PathBuf,
    output: PathBuf,
    options: ProjectOptions,
    filter: FileFilter,
    index: TokenIndex,
    last_css: Option<String>,
}

impl WatchSession {
    /// Runs a full scan and writes the first stylesheet.
    pub fn start(directory: &Path, options: ProjectOptions, output: &Path) -> Result<Self> {
        let directory = directory
            .canonicalize()
            .map_err(|_| Error::DirectoryNotFound {
                path: directory.to_path_buf(),
            })?;
        let filter = FileFilter::new(&directory, &options.scan)?;
        let index = TokenIndex::from_scan(scanner::scan_directory(&directory, &options.scan)?);

        let mut session = Self {
            directory,
            output: output.to_path_buf(),
            options,
            filter,
            index,
            last_css: None,
        };
        session.rebuild()?;
        Ok(session)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    /// Rescans the changed paths and rewrites the stylesheet when the token
    /// set or the base stylesheet changed. Returns the new result, if any.
    pub fn apply(&mut self, paths: &BTreeSet<PathBuf>) -> Result<Option<GenerationResult>> {
        let mut dirty = false;
        for path in paths {
            if self.is_base_css(path) {
                dirty = true;
                continue;
            }
            if !self.filter.accepts(path) {
                continue;
            }
            let scanned = if path.is_file() {
                scanner::scan_file(path, &self.options.scan)
            } else {
                None
            };
            dirty |= match scanned {
                Some(tokens) => self.index.replace_file(path.clone(), tokens),
                None => self.index.remove_file(path),
            };
        }

        if !dirty {
            tracing::debug!(paths = paths.len(), "change did not affect classes");
            return Ok(None);
        }
        self.rebuild().map(Some)
    }

    fn rebuild(&mut self) -> Result<GenerationResult> {
        let tokens = self.index.tokens();
        let result = pipeline::render(&tokens, &self.directory, &self.options)?;
        if self.last_css.as_deref() != Some(&*result.css) {
            pipeline::write_atomic(&self.output, &result.css)?;
            self.last_css = Some(result.css.to_string());
        }
        tracing::info!(
            classes = result.recognized,
            unknown = result.unknown.len(),
            bytes = result.bytes(),
            "regenerated stylesheet"
        );
        Ok(result)
    }

    fn is_base_css(&self, path: &Path) -> bool {
        if !self.options.include_base {
            return false;
        }
        match &self.options.base_css {
            Some(base) if base.is_absolute() => path == base,
            Some(base) => path == self.directory.join(base),
            None => path == self.directory.join(BASE_CSS_FILE_NAME),
        }
    }
}

/// Watches `directory` until the watcher shuts down, regenerating `output`
/// after every debounced batch of changes.
pub fn watch(
    directory: &Path,
    options: ProjectOptions,
    output: &Path,
    debounce: Duration,
) -> Result<()> {
    let mut session = WatchSession::start(directory, options, output)?;
    eprintln!(
        "generated {} classes -> {}",
        session.index().len(),
        output.display()
    );

    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(debounce, tx).map_err(|err| Error::Watch(err.to_string()))?;
    debouncer
        .watcher()
        .watch(session.directory(), RecursiveMode::Recursive)
        .map_err(|err| Error::Watch(err.to_string()))?;

    eprintln!("watching for changes (press Ctrl+C to stop)...");

    while let Ok(first) = rx.recv() {
        let mut changed = BTreeSet::new();
        collect_paths(first, &mut changed);
        // batches that queued up while the last rebuild ran
        while let Ok(next) = rx.try_recv() {
            collect_paths(next, &mut changed);
        }
        if changed.is_empty() {
            continue;
        }

        match session.apply(&changed) {
            Ok(Some(result)) => eprintln!(
                "rebuilt {} classes ({} bytes)",
                result.recognized,
                result.bytes()
            ),
            Ok(None) => {}
            Err(err) => eprintln!("rebuild failed: {}", err),
        }
    }

    tracing::warn!("file watcher disconnected");
    Ok(())
}

fn collect_paths(batch: DebounceEventResult, changed: &mut BTreeSet<PathBuf>) {
    match batch {
        Ok(events) => changed.extend(events.into_iter().map(|event| event.path)),
        Err(err) => tracing::warn!("file watcher error: {}", err),
    }
}
