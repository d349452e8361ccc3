use crate::variant::{self, Breakpoint, ResolveOptions, Rule};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub resolve: ResolveOptions,
    pub minify: bool,
    /// Stylesheet placed verbatim after the header, before any utility rule.
    pub base_css: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub css: CssOutput,
    /// Candidate tokens handed to the emitter.
    pub total: usize,
    pub recognized: usize,
    /// Rules written after selector deduplication.
    pub rule_count: usize,
    pub unknown: Vec<String>,
}

impl GenerationResult {
    pub fn bytes(&self) -> usize {
        self.css.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssOutput(String);

impl CssOutput {
    pub fn new(css: String) -> Self {
        Self(css)
    }
}

impl Deref for CssOutput {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CssOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<CssOutput> for String {
    fn from(value: CssOutput) -> Self {
        value.0
    }
}

/// Resolves every token and serializes the stylesheet.
///
/// Resolution runs in parallel; assembly walks the results in input order so
/// plain rules keep first-seen order and media groups follow ascending
/// breakpoint width regardless of which worker finished first.
pub fn emit(tokens: &[String], options: &EmitOptions) -> GenerationResult {
    let resolved: Vec<Option<Rule>> = tokens
        .par_iter()
        .map(|token| variant::resolve(token, &options.resolve))
        .collect();

    let mut seen = HashSet::new();
    let mut plain = Vec::new();
    let mut media: BTreeMap<Breakpoint, Vec<Rule>> = BTreeMap::new();
    let mut unknown = Vec::new();
    let mut recognized = 0usize;

    for (token, rule) in tokens.iter().zip(resolved) {
        let Some(rule) = rule else {
            tracing::debug!(token = %token, "unrecognized class");
            unknown.push(token.clone());
            continue;
        };
        recognized += 1;
        if !seen.insert(rule.selector.clone()) {
            continue;
        }
        match rule.breakpoint {
            None => plain.push(rule),
            Some(breakpoint) => media.entry(breakpoint).or_default().push(rule),
        }
    }

    let rule_count = plain.len() + media.values().map(Vec::len).sum::<usize>();
    let mut css = header(rule_count);
    if let Some(base) = options.base_css.as_deref().filter(|base| !base.trim().is_empty()) {
        css.push_str(base.trim_end());
        css.push('\n');
        if !options.minify {
            css.push('\n');
        }
    }
    css.push_str(&serialize(&plain, &media, options.minify));

    GenerationResult {
        css: CssOutput::new(css),
        total: tokens.len(),
        recognized,
        rule_count,
        unknown,
    }
}

fn header(rule_count: usize) -> String {
    format!(
        "/*! vibe-css v{} | {} utilities */\n",
        env!("CARGO_PKG_VERSION"),
        rule_count
    )
}

fn serialize(plain: &[Rule], media: &BTreeMap<Breakpoint, Vec<Rule>>, minify: bool) -> String {
    let mut blocks = Vec::new();
    for rule in plain {
        blocks.push(render_rule(rule, "", minify));
    }
    for (breakpoint, rules) in media {
        let query = breakpoint.media_query();
        if minify {
            let body: String = rules.iter().map(|rule| render_rule(rule, "", true)).collect();
            blocks.push(format!("{}{{{}}}", query, body));
        } else {
            let body = rules
                .iter()
                .map(|rule| render_rule(rule, "  ", false))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(format!("{} {{\n{}\n}}", query, body));
        }
    }

    if minify {
        blocks.concat()
    } else if blocks.is_empty() {
        String::new()
    } else {
        let mut css = blocks.join("\n\n");
        css.push('\n');
        css
    }
}

fn render_rule(rule: &Rule, indent: &str, minify: bool) -> String {
    if minify {
        let body = rule
            .declarations
            .iter()
            .map(|declaration| format!("{}:{}", declaration.property, declaration.value))
            .collect::<Vec<_>>()
            .join(";");
        return format!("{}{{{}}}", rule.selector, body);
    }

    let mut out = format!("{}{} {{\n", indent, rule.selector);
    for declaration in &rule.declarations {
        out.push_str(&format!("{}  {};\n", indent, declaration));
    }
    out.push_str(indent);
    out.push('}');
    out
}
