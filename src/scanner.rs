use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PATTERNS: [&str; 3] = ["*.razor", "*.cshtml", "*.html"];
pub const DEFAULT_EXCLUDES: [&str; 3] = ["bin/**", "obj/**", "node_modules/**"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub patterns: Vec<String>,
    pub exclude: Vec<String>,
    pub ignore_classes: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            exclude: DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect(),
            ignore_classes: Vec::new(),
            respect_gitignore: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub classes: BTreeSet<String>,
    pub files: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl ScanResult {
    pub fn files_scanned(&self) -> usize {
        self.files.len()
    }
}

/// Decides which files under a root take part in a scan.
#[derive(Debug, Clone)]
pub struct FileFilter {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(root: &Path, options: &ScanOptions) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            include: build_globset(&options.patterns)?,
            exclude: build_globset(&options.exclude)?,
        })
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if path
            .components()
            .any(|component| component.as_os_str() == "node_modules")
        {
            return false;
        }
        if self.exclude.is_match(relative) {
            return false;
        }
        self.include.is_match(relative)
            || path
                .file_name()
                .is_some_and(|name| self.include.is_match(Path::new(name)))
    }
}

pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    let paths = collect_files(root, options)?;

    let per_file = paths
        .par_iter()
        .filter_map(|path| scan_file(path, options).map(|classes| (path.clone(), classes)))
        .collect::<Vec<_>>();

    let mut result = ScanResult::default();
    for (path, classes) in per_file {
        result.classes.extend(classes.iter().cloned());
        result.files.insert(path, classes);
    }

    tracing::info!(
        root = %root.display(),
        files = result.files_scanned(),
        classes = result.classes.len(),
        "scan finished"
    );
    Ok(result)
}

pub fn collect_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let filter = FileFilter::new(root, options)?;
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore);

    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if filter.accepts(entry.path()) {
            paths.push(entry.path().to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads and scans one file; unreadable or non UTF-8 files yield `None`.
pub fn scan_file(path: &Path, options: &ScanOptions) -> Option<BTreeSet<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("failed to read {}: {}", path.display(), err);
            return None;
        }
    };
    let mut classes = extract_classes(&text, SourceKind::from_path(path));
    for ignored in &options.ignore_classes {
        classes.remove(ignored);
    }
    tracing::debug!(path = %path.display(), classes = classes.len(), "scanned file");
    Some(classes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Markup,
    Razor,
    Code,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .map(|value| value.to_ascii_lowercase());
        match ext.as_deref() {
            Some("razor") | Some("cshtml") => SourceKind::Razor,
            Some("cs") | Some("js") | Some("ts") | Some("jsx") | Some("tsx") | Some("mjs") => {
                SourceKind::Code
            }
            _ => SourceKind::Markup,
        }
    }
}

pub fn extract_classes(text: &str, kind: SourceKind) -> BTreeSet<String> {
    let mut lists = extract_class_attributes(text);
    let mut literals = Vec::new();

    match kind {
        SourceKind::Markup => {}
        SourceKind::Razor => {
            lists.extend(extract_assignments(text));
            for block in extract_code_blocks(text) {
                literals.extend(extract_string_literals(block));
            }
        }
        SourceKind::Code => {
            lists.extend(extract_assignments(text));
            literals.extend(extract_string_literals(text));
        }
    }

    let mut classes = BTreeSet::new();
    for list in lists {
        for token in tokenize_class_list(list.trim()) {
            if is_valid_candidate(&token) {
                classes.insert(token);
            }
        }
    }
    for literal in literals {
        let tokens = tokenize_class_list(literal.trim());
        if tokens.is_empty() || !tokens.iter().all(|token| is_valid_candidate(token)) {
            continue;
        }
        classes.extend(tokens.into_iter().filter(|token| token.contains('-')));
    }
    classes
}

const CLASS_ATTRIBUTES: [&str; 3] = ["class", "cssclass", "additionalclasses"];

fn extract_class_attributes(text: &str) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    let mut out = Vec::new();

    for attr in CLASS_ATTRIBUTES {
        for (idx, _) in lowered.match_indices(attr) {
            if !is_attr_boundary(text, idx, attr.len()) {
                continue;
            }
            let mut pos = skip_whitespace(text, idx + attr.len());
            if !text[pos..].starts_with('=') || text[pos..].starts_with("==") {
                continue;
            }
            pos = skip_whitespace(text, pos + 1);
            if pos >= text.len() {
                continue;
            }
            let (values, _) = parse_attribute_value(text, pos);
            out.extend(values);
        }
    }

    out
}

const ASSIGNMENT_TARGETS: [&str; 2] = ["CssClass", "AdditionalClasses"];

/// `CssClass = cond ? "a" : "b";` style statements: every literal up to the
/// terminating `;` is a class list.
fn extract_assignments(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    for target in ASSIGNMENT_TARGETS {
        for (idx, _) in text.match_indices(target) {
            if !is_identifier_boundary(text, idx, target.len()) {
                continue;
            }
            let pos = skip_whitespace(text, idx + target.len());
            if !text[pos..].starts_with('=') || text[pos..].starts_with("==") {
                continue;
            }
            let start = pos + 1;
            if let Some(end) = find_statement_end(text, start) {
                out.extend(extract_string_literals(&text[start..end]));
            }
        }
    }

    out
}

/// Index of the `;` closing a single-line statement, skipping literals.
fn find_statement_end(text: &str, mut idx: usize) -> Option<usize> {
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        match ch {
            ';' => return Some(idx),
            '\n' | '>' => return None,
            '"' | '\'' => {
                let (_, new_idx) = parse_string_literal(text, idx + size, ch);
                idx = new_idx;
            }
            _ => idx += size,
        }
    }
    None
}

fn extract_code_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    for directive in ["@code", "@functions"] {
        for (idx, _) in text.match_indices(directive) {
            let pos = skip_whitespace(text, idx + directive.len());
            if text[pos..].starts_with('{') {
                let (body, _) = extract_braced_body(text, pos);
                blocks.push(body);
            }
        }
    }
    blocks
}

fn parse_attribute_value(text: &str, idx: usize) -> (Vec<String>, usize) {
    let Some((ch, size)) = next_char(text, idx) else {
        return (Vec::new(), idx);
    };

    match ch {
        '"' | '\'' => parse_quoted_value(text, idx + size, ch),
        '@' => {
            let mut values = Vec::new();
            let end = skip_razor_expression(text, idx + size, &mut values);
            (values, end)
        }
        _ => parse_unquoted_value(text, idx),
    }
}

/// Splits a quoted attribute into its plain class text plus the literals of
/// any embedded `@(...)` expressions. Words glued to an interpolation are
/// dropped since their final spelling is only known at runtime.
fn parse_quoted_value(text: &str, mut idx: usize, quote: char) -> (Vec<String>, usize) {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut skipping_word = false;

    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        if ch == quote {
            idx += size;
            break;
        }
        if ch == '@' {
            if text[idx + size..].starts_with('@') {
                current.push('@');
                idx += size * 2;
                continue;
            }
            drop_trailing_word(&mut current);
            idx = skip_razor_expression(text, idx + size, &mut values);
            skipping_word = true;
            continue;
        }
        if ch.is_whitespace() {
            skipping_word = false;
            current.push(' ');
        } else if !skipping_word {
            current.push(ch);
        }
        idx += size;
    }

    values.push(current);
    (values, idx)
}

/// Skips one Razor expression starting right after `@`, collecting literals
/// from explicit `@(...)` forms. Returns the index after the expression.
fn skip_razor_expression(text: &str, idx: usize, literals: &mut Vec<String>) -> usize {
    let Some((ch, _)) = next_char(text, idx) else {
        return idx;
    };
    match ch {
        '(' => {
            let (inner, end) = extract_parenthesized(text, idx);
            literals.extend(extract_string_literals(inner));
            end
        }
        '{' => extract_braced_body(text, idx).1,
        _ => {
            let mut pos = idx;
            while let Some((next, size)) = next_char(text, pos) {
                if !(is_identifier_char(next) || next == '.') {
                    break;
                }
                pos += size;
            }
            if text[pos..].starts_with('(') {
                pos = extract_parenthesized(text, pos).1;
            }
            pos
        }
    }
}

fn drop_trailing_word(current: &mut String) {
    let keep = current
        .rfind(char::is_whitespace)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    current.truncate(keep);
}

fn parse_unquoted_value(text: &str, mut idx: usize) -> (Vec<String>, usize) {
    let mut value = String::new();
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        if ch.is_whitespace() || ch == '>' || ch == ';' {
            break;
        }
        value.push(ch);
        idx += size;
    }
    (vec![value], idx)
}

fn extract_parenthesized(text: &str, idx: usize) -> (&str, usize) {
    let mut depth: usize = 0;
    let mut pos = idx;
    let mut start = None;

    while pos < text.len() {
        let Some((ch, size)) = next_char(text, pos) else {
            break;
        };
        match ch {
            '(' => {
                depth += 1;
                if depth == 1 {
                    start = Some(pos + size);
                }
                pos += size;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let begin = start.unwrap_or(pos);
                    return (&text[begin..pos], pos + size);
                }
                pos += size;
            }
            '"' | '\'' => {
                let (_, new_pos) = parse_string_literal(text, pos + size, ch);
                pos = new_pos;
            }
            _ => pos += size,
        }
    }

    let begin = start.unwrap_or(idx + 1).min(text.len());
    (&text[begin..], text.len())
}

fn extract_braced_body(text: &str, idx: usize) -> (&str, usize) {
    let mut depth: usize = 0;
    let mut pos = idx;
    let mut start = None;

    while pos < text.len() {
        let Some((ch, size)) = next_char(text, pos) else {
            break;
        };
        match ch {
            '{' => {
                depth += 1;
                if depth == 1 {
                    start = Some(pos + size);
                }
                pos += size;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let begin = start.unwrap_or(pos);
                    return (&text[begin..pos], pos + size);
                }
                pos += size;
            }
            '"' | '\'' => {
                let (_, new_pos) = parse_string_literal(text, pos + size, ch);
                pos = new_pos;
            }
            _ => pos += size,
        }
    }

    let begin = start.unwrap_or(idx + 1).min(text.len());
    (&text[begin..], text.len())
}

fn extract_string_literals(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        match ch {
            '"' | '\'' | '`' => {
                let (value, new_idx) = parse_string_literal(text, idx + size, ch);
                if !value.is_empty() {
                    out.push(value);
                }
                idx = new_idx;
            }
            _ => idx += size,
        }
    }
    out
}

fn parse_string_literal(text: &str, mut idx: usize, quote: char) -> (String, usize) {
    let mut value = String::new();
    while idx < text.len() {
        let Some((ch, size)) = next_char(text, idx) else {
            break;
        };
        if ch == '\\' {
            let next_idx = idx + size;
            if let Some((next, next_size)) = next_char(text, next_idx) {
                value.push('\\');
                value.push(next);
                idx = next_idx + next_size;
                continue;
            }
            break;
        }
        if ch == quote {
            idx += size;
            break;
        }
        value.push(ch);
        idx += size;
    }
    (value, idx)
}

fn tokenize_class_list(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth: usize = 0;

    for ch in input.chars() {
        match ch {
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            _ => {}
        }
        if ch.is_whitespace() && bracket_depth == 0 {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn is_valid_candidate(token: &str) -> bool {
    if token.is_empty() || token.starts_with('.') || token.starts_with('/') {
        return false;
    }
    if token.chars().any(char::is_whitespace) {
        return false;
    }

    let mut has_letter = false;
    let mut bracket_depth = 0usize;

    for ch in token.chars() {
        if ch.is_ascii_alphabetic() {
            has_letter = true;
        }
        if !is_allowed_char(ch) {
            return false;
        }
        match ch {
            '[' => bracket_depth += 1,
            ']' => {
                if bracket_depth == 0 {
                    return false;
                }
                bracket_depth -= 1;
            }
            '(' | ')' | ',' | '\'' | '"' | '%' | '#' if bracket_depth == 0 => return false,
            _ => {}
        }
    }

    if bracket_depth != 0 || token.ends_with(':') || token.ends_with('-') {
        return false;
    }

    has_letter
}

fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '-' | '_' | '/' | ':' | '.' | '%' | '#' | '[' | ']' | '(' | ')' | ',' | '\'' | '"'
        )
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| Error::InvalidPattern {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| Error::InvalidPattern {
        pattern: patterns.join(","),
        message: err.to_string(),
    })
}

fn is_attr_boundary(text: &str, idx: usize, len: usize) -> bool {
    let prev = text[..idx].chars().next_back();
    let next = text[idx + len..].chars().next();

    let prev_ok = prev.is_none_or(is_boundary_char);
    let next_ok = next.is_none_or(|c| c.is_whitespace() || c == '=');

    prev_ok && next_ok
}

fn is_identifier_boundary(text: &str, idx: usize, len: usize) -> bool {
    let prev = text[..idx].chars().next_back();
    let next = text[idx + len..].chars().next();

    let prev_ok = prev.is_none_or(|c| !is_identifier_char(c));
    let next_ok = next.is_none_or(|c| !is_identifier_char(c));

    prev_ok && next_ok
}

fn is_boundary_char(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn skip_whitespace(text: &str, mut idx: usize) -> usize {
    while let Some((ch, size)) = next_char(text, idx) {
        if !ch.is_whitespace() {
            break;
        }
        idx += size;
    }
    idx
}

fn next_char(text: &str, idx: usize) -> Option<(char, usize)> {
    text.get(idx..)?.chars().next().map(|ch| (ch, ch.len_utf8()))
}
