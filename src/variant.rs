use crate::generator::{self, Declaration, GeneratorConfig, has_balanced_brackets};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|breakpoint| breakpoint.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }

    pub fn min_width(self) -> u32 {
        match self {
            Breakpoint::Sm => 640,
            Breakpoint::Md => 768,
            Breakpoint::Lg => 1024,
            Breakpoint::Xl => 1280,
            Breakpoint::Xxl => 1536,
        }
    }

    pub fn media_query(self) -> String {
        format!("@media (min-width: {}px)", self.min_width())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    PseudoClass(&'static str),
    Breakpoint(Breakpoint),
    Dark,
}

const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("hover", ":hover"),
    ("focus", ":focus"),
    ("focus-within", ":focus-within"),
    ("focus-visible", ":focus-visible"),
    ("active", ":active"),
    ("visited", ":visited"),
    ("disabled", ":disabled"),
    ("enabled", ":enabled"),
    ("checked", ":checked"),
    ("required", ":required"),
    ("invalid", ":invalid"),
    ("empty", ":empty"),
    ("first", ":first-child"),
    ("last", ":last-child"),
    ("odd", ":nth-child(odd)"),
    ("even", ":nth-child(even)"),
];

pub fn parse_variant(name: &str) -> Option<Variant> {
    if name == "dark" {
        return Some(Variant::Dark);
    }
    if let Some(breakpoint) = Breakpoint::from_name(name) {
        return Some(Variant::Breakpoint(breakpoint));
    }
    PSEUDO_CLASSES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, suffix)| Variant::PseudoClass(*suffix))
}

/// One emitted CSS rule: a selector, its declarations and the breakpoint
/// whose media query wraps it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub breakpoint: Option<Breakpoint>,
}

impl Rule {
    pub fn media_query(&self) -> Option<String> {
        self.breakpoint.map(Breakpoint::media_query)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub generator: GeneratorConfig,
    pub allow_unprefixed: bool,
}

/// Resolves a full class token into a rule. Any unrecognized variant,
/// unbalanced bracket, missing prefix or unknown utility yields `None`.
pub fn resolve(token: &str, options: &ResolveOptions) -> Option<Rule> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    if !has_balanced_brackets(token) {
        return None;
    }

    let (variants, base) = split_variants(token);
    if base.is_empty() {
        return None;
    }

    let mut pseudo = String::new();
    let mut breakpoint = None;
    let mut dark = false;
    for name in variants {
        match parse_variant(name)? {
            Variant::PseudoClass(suffix) => pseudo.push_str(suffix),
            Variant::Breakpoint(found) => {
                if breakpoint.replace(found).is_some() {
                    return None;
                }
            }
            Variant::Dark => dark = true,
        }
    }

    let utility = strip_prefix(
        base,
        &options.generator.prefix,
        options.allow_unprefixed,
    )?;
    let declarations = generator::generate(&utility, &options.generator)?;

    let mut selector = format!(".{}{}", escape_selector(token), pseudo);
    if dark {
        selector = format!(".dark {}", selector);
    }

    Some(Rule {
        selector,
        declarations,
        breakpoint,
    })
}

/// Removes the configured prefix, keeping a leading `-` for negative values:
/// `-vibe-mt-4` and `vibe--mt-4` both become `-mt-4`.
fn strip_prefix<'a>(base: &'a str, prefix: &str, allow_unprefixed: bool) -> Option<Cow<'a, str>> {
    if prefix.is_empty() {
        return Some(Cow::Borrowed(base));
    }
    let (negative, unsigned) = match base.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, base),
    };
    let stripped = unsigned
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'));
    match stripped {
        Some(rest) if negative => Some(Cow::Owned(format!("-{}", rest))),
        Some(rest) => Some(Cow::Borrowed(rest)),
        None if allow_unprefixed => Some(Cow::Borrowed(base)),
        None => None,
    }
}

/// Splits on `:` outside of brackets and parentheses. The last segment is
/// the utility, everything before it the variant chain.
pub fn split_variants(class: &str) -> (Vec<&str>, &str) {
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;
    let mut split_indices = Vec::new();

    for (idx, ch) in class.char_indices() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            ':' if paren_depth == 0 && bracket_depth == 0 => split_indices.push(idx),
            _ => {}
        }
    }

    if split_indices.is_empty() {
        return (Vec::new(), class);
    }
    let mut variants = Vec::new();
    let mut start = 0usize;
    for idx in split_indices {
        variants.push(&class[start..idx]);
        start = idx + 1;
    }
    (variants, &class[start..])
}

/// Escapes a class name for use after `.` in a selector.
pub fn escape_selector(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() * 2);
    let leading_dash = class.starts_with('-');

    for (idx, ch) in class.chars().enumerate() {
        let leading_digit = ch.is_ascii_digit() && (idx == 0 || (idx == 1 && leading_dash));
        if leading_digit {
            escaped.push_str(&format!("\\{:x} ", u32::from(ch)));
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::{Breakpoint, ResolveOptions, escape_selector, resolve, split_variants};
    use crate::generator::GeneratorConfig;

    fn options() -> ResolveOptions {
        ResolveOptions::default()
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_selector("vibe-w-[500px]"), "vibe-w-\\[500px\\]");
        assert_eq!(escape_selector("hover:vibe-p-4"), "hover\\:vibe-p-4");
        assert_eq!(escape_selector("vibe-w-1/2"), "vibe-w-1\\/2");
        assert_eq!(escape_selector("vibe-p-0.5"), "vibe-p-0\\.5");
        assert_eq!(escape_selector("2xl:vibe-flex"), "\\32 xl\\:vibe-flex");
        assert_eq!(escape_selector("-2"), "-\\32 ");
    }

    #[test]
    fn splits_outside_brackets_only() {
        let (variants, base) = split_variants("sm:hover:vibe-bg-[url(a:b)]");
        assert_eq!(variants, vec!["sm", "hover"]);
        assert_eq!(base, "vibe-bg-[url(a:b)]");
    }

    #[test]
    fn pseudo_class_appends_to_escaped_token() {
        let rule = resolve("hover:vibe-bg-secondary", &options()).expect("should resolve");
        assert_eq!(rule.selector, ".hover\\:vibe-bg-secondary:hover");
        assert_eq!(rule.declarations[0].value, "var(--vibe-secondary)");
        assert_eq!(rule.media_query(), None);
    }

    #[test]
    fn breakpoint_sets_media_query() {
        let rule = resolve("md:vibe-flex-col", &options()).expect("should resolve");
        assert_eq!(rule.selector, ".md\\:vibe-flex-col");
        assert_eq!(rule.breakpoint, Some(Breakpoint::Md));
        assert_eq!(
            rule.media_query().as_deref(),
            Some("@media (min-width: 768px)")
        );
    }

    #[test]
    fn dark_wraps_with_ancestor() {
        let rule = resolve("dark:hover:vibe-text-white", &options()).expect("should resolve");
        assert_eq!(rule.selector, ".dark .dark\\:hover\\:vibe-text-white:hover");
    }

    #[test]
    fn variants_chain_in_any_order() {
        let first = resolve("lg:focus:dark:vibe-p-4", &options()).expect("should resolve");
        let second = resolve("dark:focus:lg:vibe-p-4", &options()).expect("should resolve");
        assert_eq!(first.breakpoint, Some(Breakpoint::Lg));
        assert_eq!(second.breakpoint, Some(Breakpoint::Lg));
        assert!(first.selector.starts_with(".dark "));
        assert!(first.selector.ends_with(":focus"));
        assert!(second.selector.ends_with(":focus"));
    }

    #[test]
    fn unknown_variants_fail_closed() {
        assert!(resolve("banana:vibe-flex", &options()).is_none());
        assert!(resolve("hover:banana:vibe-flex", &options()).is_none());
        assert!(resolve(":vibe-flex", &options()).is_none());
        assert!(resolve("vibe-flex:", &options()).is_none());
        assert!(resolve("sm:md:vibe-flex", &options()).is_none());
    }

    #[test]
    fn unbalanced_brackets_are_unknown() {
        assert!(resolve("vibe-w-[500px", &options()).is_none());
        assert!(resolve("vibe-w-500px]", &options()).is_none());
        assert!(resolve("sm:[vibe-w-1", &options()).is_none());
    }

    #[test]
    fn prefix_gates_candidates() {
        assert!(resolve("flex", &options()).is_none());
        assert!(resolve("other-flex", &options()).is_none());
        assert!(resolve("vibe-flex", &options()).is_some());

        let relaxed = ResolveOptions {
            allow_unprefixed: true,
            ..ResolveOptions::default()
        };
        assert!(resolve("flex", &relaxed).is_some());
        assert!(resolve("vibe-flex", &relaxed).is_some());
    }

    #[test]
    fn custom_prefix() {
        let custom = ResolveOptions {
            generator: GeneratorConfig {
                prefix: "ui".to_string(),
                ..GeneratorConfig::default()
            },
            allow_unprefixed: false,
        };
        assert!(resolve("ui-flex", &custom).is_some());
        assert!(resolve("vibe-flex", &custom).is_none());
        let rule = resolve("ui-bg-primary", &custom).expect("semantic color");
        assert_eq!(rule.declarations[0].value, "var(--ui-primary)");
    }

    #[test]
    fn negative_margins_keep_dash_before_prefix() {
        let rule = resolve("-vibe-mt-4", &options()).expect("should resolve");
        assert_eq!(rule.selector, ".-vibe-mt-4");
        assert_eq!(rule.declarations[0].value, "-1rem");
        let alt = resolve("vibe--mt-4", &options()).expect("should resolve");
        assert_eq!(alt.declarations[0].value, "-1rem");
        assert!(resolve("-vibe-p-4", &options()).is_none());
    }

    #[test]
    fn arbitrary_value_selector() {
        let rule = resolve("vibe-w-[500px]", &options()).expect("should resolve");
        assert_eq!(rule.selector, ".vibe-w-\\[500px\\]");
        assert_eq!(rule.declarations[0].to_string(), "width: 500px");
    }
}
