//! Built-in color tables.
//!
//! Every family carries one hex value per entry of [`SHADES`], in the same
//! order. The tables are plain constant data and are never mutated.

/// Canonical shade steps, ascending.
pub const SHADES: [u16; 11] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

const PALETTE: &[(&str, [&str; 11])] = &[
    (
        "slate",
        [
            "#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155",
            "#1e293b", "#0f172a", "#020617",
        ],
    ),
    (
        "gray",
        [
            "#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151",
            "#1f2937", "#111827", "#030712",
        ],
    ),
    (
        "zinc",
        [
            "#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46",
            "#27272a", "#18181b", "#09090b",
        ],
    ),
    (
        "neutral",
        [
            "#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040",
            "#262626", "#171717", "#0a0a0a",
        ],
    ),
    (
        "stone",
        [
            "#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c",
            "#292524", "#1c1917", "#0c0a09",
        ],
    ),
    (
        "red",
        [
            "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c",
            "#991b1b", "#7f1d1d", "#450a0a",
        ],
    ),
    (
        "orange",
        [
            "#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c",
            "#9a3412", "#7c2d12", "#431407",
        ],
    ),
    (
        "amber",
        [
            "#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309",
            "#92400e", "#78350f", "#451a03",
        ],
    ),
    (
        "yellow",
        [
            "#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207",
            "#854d0e", "#713f12", "#422006",
        ],
    ),
    (
        "lime",
        [
            "#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f",
            "#3f6212", "#365314", "#1a2e05",
        ],
    ),
    (
        "green",
        [
            "#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d",
            "#166534", "#14532d", "#052e16",
        ],
    ),
    (
        "emerald",
        [
            "#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857",
            "#065f46", "#064e3b", "#022c22",
        ],
    ),
    (
        "teal",
        [
            "#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e",
            "#115e59", "#134e4a", "#042f2e",
        ],
    ),
    (
        "cyan",
        [
            "#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490",
            "#155e75", "#164e63", "#083344",
        ],
    ),
    (
        "sky",
        [
            "#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1",
            "#075985", "#0c4a6e", "#082f49",
        ],
    ),
    (
        "blue",
        [
            "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8",
            "#1e40af", "#1e3a8a", "#172554",
        ],
    ),
    (
        "indigo",
        [
            "#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca",
            "#3730a3", "#312e81", "#1e1b4b",
        ],
    ),
    (
        "violet",
        [
            "#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9",
            "#5b21b6", "#4c1d95", "#2e1065",
        ],
    ),
    (
        "purple",
        [
            "#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce",
            "#6b21a8", "#581c87", "#3b0764",
        ],
    ),
    (
        "fuchsia",
        [
            "#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf",
            "#86198f", "#701a75", "#4a044e",
        ],
    ),
    (
        "pink",
        [
            "#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d",
            "#9d174d", "#831843", "#500724",
        ],
    ),
    (
        "rose",
        [
            "#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c",
            "#9f1239", "#881337", "#4c0519",
        ],
    ),
];

const SPECIAL_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("transparent", "transparent"),
    ("current", "currentColor"),
    ("inherit", "inherit"),
];

/// Theme color names backed by custom properties declared in the base stylesheet.
pub const SEMANTIC_COLORS: &[&str] = &[
    "primary",
    "secondary",
    "accent",
    "success",
    "warning",
    "danger",
    "info",
    "muted",
    "background",
    "foreground",
    "border",
];

/// Looks up the hex value for a palette family at one of the canonical shades.
pub fn try_get_color(family: &str, shade: u16) -> Option<&'static str> {
    let index = shade_index(shade)?;
    PALETTE
        .iter()
        .find(|(name, _)| *name == family)
        .map(|(_, shades)| shades[index])
}

pub fn shade_index(shade: u16) -> Option<usize> {
    SHADES.iter().position(|candidate| *candidate == shade)
}

/// Parses a shade written in a class name. Only the exact canonical spelling
/// is accepted, so `050` or `+500` are rejected.
pub fn parse_shade(raw: &str) -> Option<u16> {
    SHADES
        .iter()
        .copied()
        .find(|shade| shade.to_string() == raw)
}

pub fn is_palette_family(family: &str) -> bool {
    PALETTE.iter().any(|(name, _)| *name == family)
}

pub fn families() -> impl Iterator<Item = &'static str> {
    PALETTE.iter().map(|(name, _)| *name)
}

pub fn special_color(name: &str) -> Option<&'static str> {
    SPECIAL_COLORS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

pub fn is_semantic_color(name: &str) -> bool {
    SEMANTIC_COLORS.contains(&name)
}

/// Parses `#rgb` or `#rrggbb` into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut channels = digits
                .chars()
                .map(|ch| u8::from_str_radix(&format!("{}{}", ch, ch), 16).ok());
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        6 => Some((
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        )),
        _ => None,
    }
}

/// Renders a hex color with an alpha channel taken from a 0-100 opacity,
/// e.g. `#86efac` at 50 becomes `rgb(134 239 172 / 0.5)`.
pub fn with_opacity(hex: &str, opacity: u8) -> Option<String> {
    if opacity > 100 {
        return None;
    }
    let (r, g, b) = hex_to_rgb(hex)?;
    Some(format!("rgb({} {} {} / {})", r, g, b, format_alpha(opacity)))
}

pub fn format_alpha(opacity: u8) -> String {
    let rendered = format!("{:.2}", f64::from(opacity) / 100.0);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        SHADES, families, format_alpha, hex_to_rgb, parse_shade, special_color, try_get_color,
        with_opacity,
    };

    #[test]
    fn resolves_known_family_and_shade() {
        assert_eq!(try_get_color("red", 500), Some("#ef4444"));
        assert_eq!(try_get_color("blue", 600), Some("#2563eb"));
        assert_eq!(try_get_color("green", 300), Some("#86efac"));
        assert_eq!(try_get_color("slate", 950), Some("#020617"));
    }

    #[test]
    fn rejects_unknown_family_or_shade() {
        assert_eq!(try_get_color("reddish", 500), None);
        assert_eq!(try_get_color("red", 550), None);
        assert_eq!(try_get_color("red", 0), None);
    }

    #[test]
    fn every_family_is_complete() {
        for family in families() {
            for shade in SHADES {
                let hex = try_get_color(family, shade).expect("shade should exist");
                assert!(hex_to_rgb(hex).is_some(), "{}-{} is not valid hex", family, shade);
            }
        }
    }

    #[test]
    fn parses_only_canonical_shades() {
        assert_eq!(parse_shade("500"), Some(500));
        assert_eq!(parse_shade("950"), Some(950));
        assert_eq!(parse_shade("050"), None);
        assert_eq!(parse_shade("55"), None);
        assert_eq!(parse_shade(""), None);
    }

    #[test]
    fn converts_opacity_to_rgb() {
        assert_eq!(
            with_opacity("#86efac", 50).as_deref(),
            Some("rgb(134 239 172 / 0.5)")
        );
        assert_eq!(with_opacity("#000", 5).as_deref(), Some("rgb(0 0 0 / 0.05)"));
        assert_eq!(with_opacity("#ffffff", 100).as_deref(), Some("rgb(255 255 255 / 1)"));
        assert_eq!(with_opacity("#ffffff", 101), None);
        assert_eq!(with_opacity("currentColor", 50), None);
    }

    #[test]
    fn formats_alpha_without_trailing_zeros() {
        assert_eq!(format_alpha(0), "0");
        assert_eq!(format_alpha(25), "0.25");
        assert_eq!(format_alpha(30), "0.3");
    }

    #[test]
    fn special_keywords_bypass_shades() {
        assert_eq!(special_color("current"), Some("currentColor"));
        assert_eq!(special_color("black"), Some("#000000"));
        assert_eq!(special_color("red"), None);
    }
}
