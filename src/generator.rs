use crate::palette;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub prefix: String,
    pub colors: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: "vibe".to_string(),
            colors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// A base utility (variants and prefix already stripped) in the first form
/// that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utility {
    Keyword(&'static [(&'static str, &'static str)]),
    Color {
        properties: &'static [&'static str],
        value: String,
    },
    Fraction {
        properties: &'static [&'static str],
        percent: String,
    },
    Scale {
        properties: &'static [&'static str],
        value: String,
    },
    Arbitrary {
        properties: &'static [&'static str],
        value: String,
    },
}

impl Utility {
    pub fn declarations(&self) -> Vec<Declaration> {
        match self {
            Utility::Keyword(pairs) => pairs
                .iter()
                .map(|(property, value)| Declaration::new(*property, *value))
                .collect(),
            Utility::Color { properties, value }
            | Utility::Fraction {
                properties,
                percent: value,
            }
            | Utility::Scale { properties, value }
            | Utility::Arbitrary { properties, value } => properties
                .iter()
                .map(|property| Declaration::new(*property, value.as_str()))
                .collect(),
        }
    }
}

/// Parses and renders one base utility, `None` when no form applies.
pub fn generate(base: &str, config: &GeneratorConfig) -> Option<Vec<Declaration>> {
    parse_utility(base, config).map(|utility| utility.declarations())
}

pub fn parse_utility(base: &str, config: &GeneratorConfig) -> Option<Utility> {
    if base.is_empty() {
        return None;
    }
    keyword_utility(base)
        .or_else(|| color_utility(base, config))
        .or_else(|| fraction_utility(base))
        .or_else(|| scale_utility(base))
        .or_else(|| arbitrary_utility(base))
}

fn keyword_utility(base: &str) -> Option<Utility> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, declarations)| Utility::Keyword(*declarations))
}

fn color_utility(base: &str, config: &GeneratorConfig) -> Option<Utility> {
    let (properties, rest) = COLOR_TARGETS.iter().find_map(|(key, properties)| {
        base.strip_prefix(*key)
            .and_then(|rest| rest.strip_prefix('-'))
            .map(|rest| (*properties, rest))
    })?;
    let value = resolve_color(rest, config)?;
    Some(Utility::Color { properties, value })
}

fn resolve_color(raw: &str, config: &GeneratorConfig) -> Option<String> {
    let (color, opacity) = match raw.split_once('/') {
        Some((color, opacity)) => (color, Some(parse_opacity(opacity)?)),
        None => (raw, None),
    };

    if let Some(value) = palette::special_color(color) {
        return match opacity {
            None => Some(value.to_string()),
            Some(opacity) => palette::with_opacity(value, opacity),
        };
    }

    if palette::is_semantic_color(color) {
        let variable = format!("var({}{})", variable_prefix(&config.prefix), color);
        return Some(match opacity {
            None => variable,
            Some(opacity) => format!(
                "color-mix(in srgb, {} {}%, transparent)",
                variable, opacity
            ),
        });
    }

    let (family, shade_raw) = color.rsplit_once('-')?;
    let shade = palette::parse_shade(shade_raw)?;
    let hex = match palette::try_get_color(family, shade) {
        Some(hex) => hex.to_string(),
        None => config
            .colors
            .get(family)
            .and_then(|shades| shades.get(shade_raw))
            .cloned()?,
    };
    match opacity {
        None => Some(hex),
        Some(opacity) => palette::with_opacity(&hex, opacity),
    }
}

/// Leading part of the custom properties behind semantic colors,
/// `--vibe-` for the default prefix and `--` when the prefix is empty.
pub fn variable_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        "--".to_string()
    } else {
        format!("--{}-", prefix)
    }
}

fn parse_opacity(raw: &str) -> Option<u8> {
    let value = raw.parse::<u8>().ok()?;
    if value > 100 || value.to_string() != raw {
        return None;
    }
    Some(value)
}

fn fraction_utility(base: &str) -> Option<Utility> {
    let (spec, rest) = find_property(base)?;
    if !spec.scale.allows_fractions() {
        return None;
    }
    let (numerator, denominator) = rest.split_once('/')?;
    if !is_plain_integer(numerator) || !is_plain_integer(denominator) {
        return None;
    }
    let numerator = numerator.parse::<u32>().ok()?;
    let denominator = denominator.parse::<u32>().ok()?;
    if numerator == 0 || denominator == 0 {
        return None;
    }
    Some(Utility::Fraction {
        properties: spec.properties,
        percent: format_percentage(numerator, denominator),
    })
}

fn scale_utility(base: &str) -> Option<Utility> {
    let (negative, unsigned) = match base.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, base),
    };
    let (spec, rest) = find_property(unsigned)?;
    if negative && spec.scale != Scale::Margin {
        return None;
    }
    let value = spec.scale.resolve(rest)?;
    let value = if negative { negate(&value)? } else { value };
    Some(Utility::Scale {
        properties: spec.properties,
        value,
    })
}

fn arbitrary_utility(base: &str) -> Option<Utility> {
    let open = base.find('[')?;
    let inner = base[open + 1..].strip_suffix(']')?;
    let key = base[..open].strip_suffix('-')?;
    if !is_valid_arbitrary_value(inner) {
        return None;
    }

    let color_properties = COLOR_TARGETS
        .iter()
        .find(|(target, _)| *target == key)
        .map(|(_, properties)| *properties);
    let scale_properties = PROPERTIES
        .iter()
        .find(|spec| spec.key == key)
        .map(|spec| spec.properties);

    let properties = match (color_properties, scale_properties) {
        (Some(color), Some(_)) if looks_like_color(inner) => color,
        (Some(color), None) => color,
        (_, Some(scale)) => scale,
        (None, None) => return None,
    };

    Some(Utility::Arbitrary {
        properties,
        value: inner.to_string(),
    })
}

fn find_property(base: &str) -> Option<(&'static PropertySpec, &str)> {
    PROPERTIES
        .iter()
        .filter_map(|spec| {
            base.strip_prefix(spec.key)
                .and_then(|rest| rest.strip_prefix('-'))
                .map(|rest| (spec, rest))
        })
        .max_by_key(|(spec, _)| spec.key.len())
}

pub fn is_valid_arbitrary_value(value: &str) -> bool {
    if value.is_empty() || value.contains([';', '{', '}']) {
        return false;
    }
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    has_balanced_brackets(value)
}

/// True when every `[` and `(` is closed in order.
pub fn has_balanced_brackets(value: &str) -> bool {
    let mut stack = Vec::new();
    for ch in value.chars() {
        match ch {
            '[' | '(' => stack.push(ch),
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

fn looks_like_color(value: &str) -> bool {
    value.starts_with('#')
        || ["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "oklch(", "oklab(", "color-mix("]
            .iter()
            .any(|function| value.starts_with(function))
}

fn is_plain_integer(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|ch| ch.is_ascii_digit())
}

fn negate(value: &str) -> Option<String> {
    if value.starts_with("0px") || value == "0" {
        return Some(value.to_string());
    }
    if value.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Some(format!("-{}", value));
    }
    None
}

/// `100 * numerator / denominator` with up to six significant digits.
pub fn format_percentage(numerator: u32, denominator: u32) -> String {
    let value = 100.0 * f64::from(numerator) / f64::from(denominator);
    let integer_digits = if value >= 1.0 {
        value.log10().floor() as i32 + 1
    } else {
        1
    };
    let decimals = (6 - integer_digits).max(0) as usize;
    format!("{}%", trim_number(&format!("{:.*}", decimals, value)))
}

fn format_rem(steps: f64) -> String {
    format!("{}rem", trim_number(&format!("{:.4}", steps * 0.25)))
}

fn trim_number(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    Margin,
    Spacing,
    Width,
    Height,
    Size,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Inset,
    Basis,
    Opacity,
    ZIndex,
    Order,
    GridTracks,
    Span,
    BorderWidth,
    Radius,
    LineHeight,
    Duration,
    ArbitraryOnly,
}

impl Scale {
    fn allows_fractions(self) -> bool {
        matches!(
            self,
            Scale::Width | Scale::Height | Scale::Size | Scale::Inset | Scale::Basis
        )
    }

    fn resolve(self, raw: &str) -> Option<String> {
        let named = match self {
            Scale::Margin => match raw {
                "auto" => Some("auto"),
                _ => None,
            },
            Scale::Spacing | Scale::ArbitraryOnly => None,
            Scale::Width => match raw {
                "auto" => Some("auto"),
                "full" => Some("100%"),
                "screen" => Some("100vw"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::Height => match raw {
                "auto" => Some("auto"),
                "full" => Some("100%"),
                "screen" => Some("100vh"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::Size => match raw {
                "auto" => Some("auto"),
                "full" => Some("100%"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::MinWidth => match raw {
                "full" => Some("100%"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::MinHeight => match raw {
                "full" => Some("100%"),
                "screen" => Some("100vh"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::MaxWidth => match raw {
                "none" => Some("none"),
                "xs" => Some("20rem"),
                "sm" => Some("24rem"),
                "md" => Some("28rem"),
                "lg" => Some("32rem"),
                "xl" => Some("36rem"),
                "2xl" => Some("42rem"),
                "3xl" => Some("48rem"),
                "4xl" => Some("56rem"),
                "5xl" => Some("64rem"),
                "6xl" => Some("72rem"),
                "7xl" => Some("80rem"),
                "full" => Some("100%"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                "prose" => Some("65ch"),
                "screen-sm" => Some("640px"),
                "screen-md" => Some("768px"),
                "screen-lg" => Some("1024px"),
                "screen-xl" => Some("1280px"),
                "screen-2xl" => Some("1536px"),
                _ => None,
            },
            Scale::MaxHeight => match raw {
                "none" => Some("none"),
                "full" => Some("100%"),
                "screen" => Some("100vh"),
                "min" => Some("min-content"),
                "max" => Some("max-content"),
                "fit" => Some("fit-content"),
                _ => None,
            },
            Scale::Inset | Scale::Basis => match raw {
                "auto" => Some("auto"),
                "full" => Some("100%"),
                _ => None,
            },
            Scale::Opacity => {
                let value = raw.parse::<u8>().ok()?;
                if value > 100 || value % 5 != 0 || value.to_string() != raw {
                    return None;
                }
                return Some(palette::format_alpha(value));
            }
            Scale::ZIndex => match raw {
                "0" | "10" | "20" | "30" | "40" | "50" => return Some(raw.to_string()),
                "auto" => Some("auto"),
                _ => None,
            },
            Scale::Order => match raw {
                "first" => Some("-9999"),
                "last" => Some("9999"),
                "none" => Some("0"),
                _ => return twelve_step(raw).map(|n| n.to_string()),
            },
            Scale::GridTracks => match raw {
                "none" => Some("none"),
                "subgrid" => Some("subgrid"),
                _ => {
                    return twelve_step(raw).map(|n| format!("repeat({}, minmax(0, 1fr))", n));
                }
            },
            Scale::Span => match raw {
                "full" => Some("1 / -1"),
                "auto" => Some("auto"),
                _ => return twelve_step(raw).map(|n| format!("span {} / span {}", n, n)),
            },
            Scale::BorderWidth => match raw {
                "0" => Some("0px"),
                "2" => Some("2px"),
                "4" => Some("4px"),
                "8" => Some("8px"),
                _ => None,
            },
            Scale::Radius => match raw {
                "none" => Some("0px"),
                "sm" => Some("0.125rem"),
                "md" => Some("0.375rem"),
                "lg" => Some("0.5rem"),
                "xl" => Some("0.75rem"),
                "2xl" => Some("1rem"),
                "3xl" => Some("1.5rem"),
                "full" => Some("9999px"),
                _ => None,
            },
            Scale::LineHeight => match raw {
                "none" => Some("1"),
                "tight" => Some("1.25"),
                "snug" => Some("1.375"),
                "normal" => Some("1.5"),
                "relaxed" => Some("1.625"),
                "loose" => Some("2"),
                "3" | "4" | "5" | "6" | "7" | "8" | "9" | "10" => return spacing_value(raw),
                _ => None,
            },
            Scale::Duration => match raw {
                "0" | "75" | "100" | "150" | "200" | "300" | "500" | "700" | "1000" => {
                    return Some(format!("{}ms", raw));
                }
                _ => None,
            },
        };

        if let Some(value) = named {
            return Some(value.to_string());
        }
        if self.uses_spacing() {
            return spacing_value(raw);
        }
        None
    }

    fn uses_spacing(self) -> bool {
        matches!(
            self,
            Scale::Margin
                | Scale::Spacing
                | Scale::Width
                | Scale::Height
                | Scale::Size
                | Scale::MinWidth
                | Scale::MinHeight
                | Scale::MaxWidth
                | Scale::MaxHeight
                | Scale::Inset
                | Scale::Basis
        )
    }
}

const SPACING_STEPS: [&str; 33] = [
    "0.5", "1", "1.5", "2", "2.5", "3", "3.5", "4", "5", "6", "7", "8", "9", "10", "11", "12",
    "14", "16", "20", "24", "28", "32", "36", "40", "44", "48", "52", "56", "60", "64", "72",
    "80", "96",
];

/// Spacing step `n` is `n * 0.25rem`; `0` and `px` are literal lengths.
fn spacing_value(raw: &str) -> Option<String> {
    match raw {
        "0" => Some("0px".to_string()),
        "px" => Some("1px".to_string()),
        _ if SPACING_STEPS.contains(&raw) => raw.parse::<f64>().ok().map(format_rem),
        _ => None,
    }
}

fn twelve_step(raw: &str) -> Option<u8> {
    let value = raw.parse::<u8>().ok()?;
    if (1..=12).contains(&value) && value.to_string() == raw {
        Some(value)
    } else {
        None
    }
}

struct PropertySpec {
    key: &'static str,
    properties: &'static [&'static str],
    scale: Scale,
}

const fn spec(
    key: &'static str,
    properties: &'static [&'static str],
    scale: Scale,
) -> PropertySpec {
    PropertySpec {
        key,
        properties,
        scale,
    }
}

const PROPERTIES: &[PropertySpec] = &[
    spec("p", &["padding"], Scale::Spacing),
    spec("px", &["padding-left", "padding-right"], Scale::Spacing),
    spec("py", &["padding-top", "padding-bottom"], Scale::Spacing),
    spec("pt", &["padding-top"], Scale::Spacing),
    spec("pr", &["padding-right"], Scale::Spacing),
    spec("pb", &["padding-bottom"], Scale::Spacing),
    spec("pl", &["padding-left"], Scale::Spacing),
    spec("m", &["margin"], Scale::Margin),
    spec("mx", &["margin-left", "margin-right"], Scale::Margin),
    spec("my", &["margin-top", "margin-bottom"], Scale::Margin),
    spec("mt", &["margin-top"], Scale::Margin),
    spec("mr", &["margin-right"], Scale::Margin),
    spec("mb", &["margin-bottom"], Scale::Margin),
    spec("ml", &["margin-left"], Scale::Margin),
    spec("gap", &["gap"], Scale::Spacing),
    spec("gap-x", &["column-gap"], Scale::Spacing),
    spec("gap-y", &["row-gap"], Scale::Spacing),
    spec("w", &["width"], Scale::Width),
    spec("h", &["height"], Scale::Height),
    spec("size", &["width", "height"], Scale::Size),
    spec("min-w", &["min-width"], Scale::MinWidth),
    spec("min-h", &["min-height"], Scale::MinHeight),
    spec("max-w", &["max-width"], Scale::MaxWidth),
    spec("max-h", &["max-height"], Scale::MaxHeight),
    spec("inset", &["inset"], Scale::Inset),
    spec("inset-x", &["left", "right"], Scale::Inset),
    spec("inset-y", &["top", "bottom"], Scale::Inset),
    spec("top", &["top"], Scale::Inset),
    spec("right", &["right"], Scale::Inset),
    spec("bottom", &["bottom"], Scale::Inset),
    spec("left", &["left"], Scale::Inset),
    spec("basis", &["flex-basis"], Scale::Basis),
    spec("opacity", &["opacity"], Scale::Opacity),
    spec("z", &["z-index"], Scale::ZIndex),
    spec("order", &["order"], Scale::Order),
    spec("grid-cols", &["grid-template-columns"], Scale::GridTracks),
    spec("grid-rows", &["grid-template-rows"], Scale::GridTracks),
    spec("col-span", &["grid-column"], Scale::Span),
    spec("row-span", &["grid-row"], Scale::Span),
    spec("border", &["border-width"], Scale::BorderWidth),
    spec("border-t", &["border-top-width"], Scale::BorderWidth),
    spec("border-r", &["border-right-width"], Scale::BorderWidth),
    spec("border-b", &["border-bottom-width"], Scale::BorderWidth),
    spec("border-l", &["border-left-width"], Scale::BorderWidth),
    spec("rounded", &["border-radius"], Scale::Radius),
    spec("leading", &["line-height"], Scale::LineHeight),
    spec("duration", &["transition-duration"], Scale::Duration),
    spec("text", &["font-size"], Scale::ArbitraryOnly),
];

const COLOR_TARGETS: &[(&str, &[&str])] = &[
    ("bg", &["background-color"]),
    ("text", &["color"]),
    ("border", &["border-color"]),
    ("outline", &["outline-color"]),
    ("decoration", &["text-decoration-color"]),
    ("accent", &["accent-color"]),
    ("caret", &["caret-color"]),
    ("fill", &["fill"]),
    ("stroke", &["stroke"]),
];

type Keyword = (&'static str, &'static [(&'static str, &'static str)]);

const KEYWORDS: &[Keyword] = &[
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("inline-grid", &[("display", "inline-grid")]),
    ("table", &[("display", "table")]),
    ("contents", &[("display", "contents")]),
    ("hidden", &[("display", "none")]),
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
    ("flex-nowrap", &[("flex-wrap", "nowrap")]),
    ("flex-1", &[("flex", "1 1 0%")]),
    ("flex-auto", &[("flex", "1 1 auto")]),
    ("flex-initial", &[("flex", "0 1 auto")]),
    ("flex-none", &[("flex", "none")]),
    ("grow", &[("flex-grow", "1")]),
    ("grow-0", &[("flex-grow", "0")]),
    ("shrink", &[("flex-shrink", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
    ("items-start", &[("align-items", "flex-start")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("items-center", &[("align-items", "center")]),
    ("items-baseline", &[("align-items", "baseline")]),
    ("items-stretch", &[("align-items", "stretch")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("justify-around", &[("justify-content", "space-around")]),
    ("justify-evenly", &[("justify-content", "space-evenly")]),
    ("content-start", &[("align-content", "flex-start")]),
    ("content-center", &[("align-content", "center")]),
    ("content-between", &[("align-content", "space-between")]),
    ("self-auto", &[("align-self", "auto")]),
    ("self-start", &[("align-self", "flex-start")]),
    ("self-end", &[("align-self", "flex-end")]),
    ("self-center", &[("align-self", "center")]),
    ("self-stretch", &[("align-self", "stretch")]),
    ("static", &[("position", "static")]),
    ("fixed", &[("position", "fixed")]),
    ("absolute", &[("position", "absolute")]),
    ("relative", &[("position", "relative")]),
    ("sticky", &[("position", "sticky")]),
    ("visible", &[("visibility", "visible")]),
    ("invisible", &[("visibility", "hidden")]),
    ("overflow-auto", &[("overflow", "auto")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-visible", &[("overflow", "visible")]),
    ("overflow-scroll", &[("overflow", "scroll")]),
    ("overflow-x-auto", &[("overflow-x", "auto")]),
    ("overflow-x-hidden", &[("overflow-x", "hidden")]),
    ("overflow-y-auto", &[("overflow-y", "auto")]),
    ("overflow-y-hidden", &[("overflow-y", "hidden")]),
    ("box-border", &[("box-sizing", "border-box")]),
    ("box-content", &[("box-sizing", "content-box")]),
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("text-justify", &[("text-align", "justify")]),
    ("text-xs", &[("font-size", "0.75rem"), ("line-height", "1rem")]),
    ("text-sm", &[("font-size", "0.875rem"), ("line-height", "1.25rem")]),
    ("text-base", &[("font-size", "1rem"), ("line-height", "1.5rem")]),
    ("text-lg", &[("font-size", "1.125rem"), ("line-height", "1.75rem")]),
    ("text-xl", &[("font-size", "1.25rem"), ("line-height", "1.75rem")]),
    ("text-2xl", &[("font-size", "1.5rem"), ("line-height", "2rem")]),
    ("text-3xl", &[("font-size", "1.875rem"), ("line-height", "2.25rem")]),
    ("text-4xl", &[("font-size", "2.25rem"), ("line-height", "2.5rem")]),
    ("text-5xl", &[("font-size", "3rem"), ("line-height", "1")]),
    ("text-6xl", &[("font-size", "3.75rem"), ("line-height", "1")]),
    ("text-7xl", &[("font-size", "4.5rem"), ("line-height", "1")]),
    ("text-8xl", &[("font-size", "6rem"), ("line-height", "1")]),
    ("text-9xl", &[("font-size", "8rem"), ("line-height", "1")]),
    ("font-thin", &[("font-weight", "100")]),
    ("font-extralight", &[("font-weight", "200")]),
    ("font-light", &[("font-weight", "300")]),
    ("font-normal", &[("font-weight", "400")]),
    ("font-medium", &[("font-weight", "500")]),
    ("font-semibold", &[("font-weight", "600")]),
    ("font-bold", &[("font-weight", "700")]),
    ("font-extrabold", &[("font-weight", "800")]),
    ("font-black", &[("font-weight", "900")]),
    ("font-mono", &[(
        "font-family",
        "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace",
    )]),
    ("italic", &[("font-style", "italic")]),
    ("not-italic", &[("font-style", "normal")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("normal-case", &[("text-transform", "none")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("line-through", &[("text-decoration-line", "line-through")]),
    ("no-underline", &[("text-decoration-line", "none")]),
    ("truncate", &[
        ("overflow", "hidden"),
        ("text-overflow", "ellipsis"),
        ("white-space", "nowrap"),
    ]),
    ("whitespace-normal", &[("white-space", "normal")]),
    ("whitespace-nowrap", &[("white-space", "nowrap")]),
    ("whitespace-pre", &[("white-space", "pre")]),
    ("whitespace-pre-wrap", &[("white-space", "pre-wrap")]),
    ("break-words", &[("overflow-wrap", "break-word")]),
    ("break-all", &[("word-break", "break-all")]),
    ("border", &[("border-width", "1px")]),
    ("border-t", &[("border-top-width", "1px")]),
    ("border-r", &[("border-right-width", "1px")]),
    ("border-b", &[("border-bottom-width", "1px")]),
    ("border-l", &[("border-left-width", "1px")]),
    ("border-solid", &[("border-style", "solid")]),
    ("border-dashed", &[("border-style", "dashed")]),
    ("border-dotted", &[("border-style", "dotted")]),
    ("border-none", &[("border-style", "none")]),
    ("rounded", &[("border-radius", "0.25rem")]),
    ("shadow-sm", &[("box-shadow", "0 1px 2px 0 rgb(0 0 0 / 0.05)")]),
    ("shadow", &[(
        "box-shadow",
        "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
    )]),
    ("shadow-md", &[(
        "box-shadow",
        "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
    )]),
    ("shadow-lg", &[(
        "box-shadow",
        "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
    )]),
    ("shadow-xl", &[(
        "box-shadow",
        "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
    )]),
    ("shadow-none", &[("box-shadow", "0 0 #0000")]),
    ("outline-none", &[
        ("outline", "2px solid transparent"),
        ("outline-offset", "2px"),
    ]),
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("cursor-default", &[("cursor", "default")]),
    ("cursor-not-allowed", &[("cursor", "not-allowed")]),
    ("select-none", &[("user-select", "none")]),
    ("select-text", &[("user-select", "text")]),
    ("select-all", &[("user-select", "all")]),
    ("pointer-events-none", &[("pointer-events", "none")]),
    ("pointer-events-auto", &[("pointer-events", "auto")]),
    ("transition", &[
        (
            "transition-property",
            "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform",
        ),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-none", &[("transition-property", "none")]),
    ("sr-only", &[
        ("position", "absolute"),
        ("width", "1px"),
        ("height", "1px"),
        ("padding", "0"),
        ("margin", "-1px"),
        ("overflow", "hidden"),
        ("clip", "rect(0, 0, 0, 0)"),
        ("white-space", "nowrap"),
        ("border-width", "0"),
    ]),
];

#[cfg(test)]
mod tests {
    use super::{Declaration, GeneratorConfig, Utility, format_percentage, generate, parse_utility};
    use std::collections::BTreeMap;

    fn decls(base: &str) -> Option<Vec<String>> {
        generate(base, &GeneratorConfig::default())
            .map(|decls| decls.iter().map(Declaration::to_string).collect())
    }

    #[test]
    fn exact_keywords_win() {
        assert_eq!(decls("flex"), Some(vec!["display: flex".to_string()]));
        assert_eq!(decls("hidden"), Some(vec!["display: none".to_string()]));
        assert_eq!(
            decls("flex-col"),
            Some(vec!["flex-direction: column".to_string()])
        );
        assert_eq!(
            decls("text-sm"),
            Some(vec![
                "font-size: 0.875rem".to_string(),
                "line-height: 1.25rem".to_string()
            ])
        );
    }

    #[test]
    fn resolves_palette_colors() {
        assert_eq!(
            decls("bg-red-500"),
            Some(vec!["background-color: #ef4444".to_string()])
        );
        assert_eq!(decls("text-blue-600"), Some(vec!["color: #2563eb".to_string()]));
        assert_eq!(
            decls("bg-green-300/50"),
            Some(vec!["background-color: rgb(134 239 172 / 0.5)".to_string()])
        );
    }

    #[test]
    fn unknown_color_family_or_shade_is_unknown() {
        assert_eq!(decls("bg-reddish-500"), None);
        assert_eq!(decls("bg-red-550"), None);
        assert_eq!(decls("bg-red-500/101"), None);
        assert_eq!(decls("bg-red-500/"), None);
    }

    #[test]
    fn special_and_semantic_colors() {
        assert_eq!(
            decls("bg-transparent"),
            Some(vec!["background-color: transparent".to_string()])
        );
        assert_eq!(
            decls("text-current"),
            Some(vec!["color: currentColor".to_string()])
        );
        assert_eq!(
            decls("bg-black/25"),
            Some(vec!["background-color: rgb(0 0 0 / 0.25)".to_string()])
        );
        assert_eq!(decls("bg-current/50"), None);
        assert_eq!(
            decls("bg-secondary"),
            Some(vec!["background-color: var(--vibe-secondary)".to_string()])
        );
        assert_eq!(
            decls("bg-primary/40"),
            Some(vec![
                "background-color: color-mix(in srgb, var(--vibe-primary) 40%, transparent)"
                    .to_string()
            ])
        );
    }

    #[test]
    fn custom_families_extend_the_palette() {
        let mut shades = BTreeMap::new();
        shades.insert("500".to_string(), "#123456".to_string());
        shades.insert("55".to_string(), "#654321".to_string());
        let mut colors = BTreeMap::new();
        colors.insert("brand".to_string(), shades);
        let config = GeneratorConfig {
            prefix: "vibe".to_string(),
            colors,
        };

        let declarations = generate("bg-brand-500/50", &config).expect("brand color resolves");
        assert_eq!(declarations[0].value, "rgb(18 52 86 / 0.5)");
        assert!(generate("bg-brand-55", &config).is_none());
        assert_eq!(
            generate("bg-red-500", &config).expect("builtin still resolves")[0].value,
            "#ef4444"
        );
    }

    #[test]
    fn fractions_resolve_before_arbitrary_or_unknown() {
        assert_eq!(decls("w-1/2"), Some(vec!["width: 50%".to_string()]));
        assert_eq!(decls("w-2/3"), Some(vec!["width: 66.6667%".to_string()]));
        assert_eq!(decls("h-1/3"), Some(vec!["height: 33.3333%".to_string()]));
        assert!(matches!(
            parse_utility("w-1/2", &GeneratorConfig::default()),
            Some(Utility::Fraction { .. })
        ));
        assert_eq!(decls("p-1/2"), None);
        assert_eq!(decls("w-1/0"), None);
    }

    #[test]
    fn formats_percentages_with_six_significant_digits() {
        assert_eq!(format_percentage(1, 2), "50%");
        assert_eq!(format_percentage(1, 3), "33.3333%");
        assert_eq!(format_percentage(5, 6), "83.3333%");
        assert_eq!(format_percentage(1, 1), "100%");
        assert_eq!(format_percentage(3, 2), "150%");
        assert_eq!(format_percentage(1, 12), "8.33333%");
    }

    #[test]
    fn spacing_scale_and_named_buckets() {
        assert_eq!(decls("p-4"), Some(vec!["padding: 1rem".to_string()]));
        assert_eq!(decls("mt-2"), Some(vec!["margin-top: 0.5rem".to_string()]));
        assert_eq!(decls("p-0.5"), Some(vec!["padding: 0.125rem".to_string()]));
        assert_eq!(decls("p-px"), Some(vec!["padding: 1px".to_string()]));
        assert_eq!(
            decls("px-2"),
            Some(vec![
                "padding-left: 0.5rem".to_string(),
                "padding-right: 0.5rem".to_string()
            ])
        );
        assert_eq!(decls("w-full"), Some(vec!["width: 100%".to_string()]));
        assert_eq!(decls("h-screen"), Some(vec!["height: 100vh".to_string()]));
        assert_eq!(decls("max-w-lg"), Some(vec!["max-width: 32rem".to_string()]));
        assert_eq!(decls("mx-auto").map(|d| d.len()), Some(2));
        assert_eq!(decls("p-13"), None);
        assert_eq!(decls("p-4.0"), None);
    }

    #[test]
    fn negative_values_only_for_margins() {
        assert_eq!(decls("-mt-4"), Some(vec!["margin-top: -1rem".to_string()]));
        assert_eq!(decls("-m-px"), Some(vec!["margin: -1px".to_string()]));
        assert_eq!(decls("-p-4"), None);
        assert_eq!(decls("-top-4"), None);
        assert_eq!(decls("-m-auto"), None);
    }

    #[test]
    fn other_scales() {
        assert_eq!(decls("opacity-50"), Some(vec!["opacity: 0.5".to_string()]));
        assert_eq!(decls("opacity-51"), None);
        assert_eq!(decls("z-10"), Some(vec!["z-index: 10".to_string()]));
        assert_eq!(
            decls("grid-cols-3"),
            Some(vec!["grid-template-columns: repeat(3, minmax(0, 1fr))".to_string()])
        );
        assert_eq!(decls("border-2"), Some(vec!["border-width: 2px".to_string()]));
        assert_eq!(
            decls("rounded-lg"),
            Some(vec!["border-radius: 0.5rem".to_string()])
        );
        assert_eq!(
            decls("duration-300"),
            Some(vec!["transition-duration: 300ms".to_string()])
        );
    }

    #[test]
    fn arbitrary_values_pass_through() {
        assert_eq!(decls("w-[500px]"), Some(vec!["width: 500px".to_string()]));
        assert_eq!(
            decls("bg-[#1da1f2]"),
            Some(vec!["background-color: #1da1f2".to_string()])
        );
        assert_eq!(decls("text-[14px]"), Some(vec!["font-size: 14px".to_string()]));
        assert_eq!(
            decls("text-[rgb(1,2,3)]"),
            Some(vec!["color: rgb(1,2,3)".to_string()])
        );
        assert_eq!(
            decls("h-[calc(100vh-4rem)]"),
            Some(vec!["height: calc(100vh-4rem)".to_string()])
        );
    }

    #[test]
    fn malformed_arbitrary_values_are_unknown() {
        assert_eq!(decls("w-[]"), None);
        assert_eq!(decls("w-[500px"), None);
        assert_eq!(decls("w-[calc(1px]"), None);
        assert_eq!(decls("w-[1px;color:red]"), None);
        assert_eq!(decls("nope-[1px]"), None);
    }

    #[test]
    fn unknown_tokens() {
        assert_eq!(decls(""), None);
        assert_eq!(decls("banana"), None);
        assert_eq!(decls("Flex"), None);
        assert_eq!(decls("BG-red-500"), None);
    }
}
