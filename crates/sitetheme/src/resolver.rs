//! Palette + mode -> flat map of CSS custom properties.
//!
//! [`resolve`] is pure: the same palette and mode always produce the same
//! [`ResolvedTheme`], variable for variable and byte for byte.
//!
//! # Example
//!
//! ```rust
//! use sitetheme::{resolve, Mode, PaletteDefinition};
//!
//! let theme = resolve(&PaletteDefinition::klein(), Mode::Dark).unwrap();
//! assert_eq!(theme.get(sitetheme::vars::NAME_COLOR), Some("#fbbf24"));
//! assert_eq!(theme.get(sitetheme::vars::BG_PRIMARY), Some("#0f1419"));
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::Serialize;
use tracing::{debug, warn};

use crate::color::{ColorError, CssColor, HexColor, ensure_contrast_ratio, scale_brightness};
use crate::derive::{dark_highlight, gentle_color};
use crate::palette::{Mode, PaletteDefinition, Swatch};

/// Minimum contrast for light-mode links against the page background.
pub const LINK_MIN_CONTRAST: f64 = 4.5;

/// Substitute for palette fields that fail to parse.
pub const NEUTRAL: HexColor = HexColor::from_u32(0x6b7280);

/// Names of every variable the resolver emits.
pub mod vars {
    pub const PRIMARY_COLOR: &str = "--primary-color";
    pub const PRIMARY_HOVER: &str = "--primary-hover";
    pub const PRIMARY_LIGHT: &str = "--primary-light";
    pub const ACCENT_COLOR: &str = "--accent-color";
    pub const ACCENT_HOVER: &str = "--accent-hover";
    pub const ACCENT_LIGHT: &str = "--accent-light";

    pub const BLUE_ACCENT: &str = "--blue-accent";
    pub const BLUE_HOVER: &str = "--blue-hover";
    pub const NAME_COLOR: &str = "--name-color";
    pub const SECTION_ACCENT: &str = "--section-accent";

    pub const HIGHLIGHT_BG_SOFT: &str = "--highlight-bg-soft";
    pub const GRADIENT_PRIMARY: &str = "--gradient-primary";
    pub const GRADIENT_ACCENT: &str = "--gradient-accent";
    pub const HIGHLIGHT_SOFT: &str = "--highlight-soft";

    pub const BG_PRIMARY: &str = "--bg-primary";
    pub const BG_SECONDARY: &str = "--bg-secondary";
    pub const BG_TERTIARY: &str = "--bg-tertiary";
    pub const TEXT_PRIMARY: &str = "--text-primary";
    pub const TEXT_SECONDARY: &str = "--text-secondary";
    pub const TEXT_MUTED: &str = "--text-muted";
    pub const TEXT_LIGHT: &str = "--text-light";
    pub const BORDER_COLOR: &str = "--border-color";
    pub const BORDER_LIGHT: &str = "--border-light";
    pub const BLUE_LIGHT: &str = "--blue-light";

    pub const SHADOW_SM: &str = "--shadow-sm";
    pub const SHADOW_MD: &str = "--shadow-md";
    pub const SHADOW_LG: &str = "--shadow-lg";
    pub const SHADOW_COLORED: &str = "--shadow-colored";
}

const LIGHT_SURFACES: [(&str, &str); 13] = [
    (vars::BG_PRIMARY, "#ffffff"),
    (vars::BG_SECONDARY, "#fafbfc"),
    (vars::BG_TERTIARY, "#f3f4f6"),
    (vars::TEXT_PRIMARY, "#111827"),
    (vars::TEXT_SECONDARY, "#374151"),
    (vars::TEXT_MUTED, "#6b7280"),
    (vars::TEXT_LIGHT, "#9ca3af"),
    (vars::BORDER_COLOR, "#e5e7eb"),
    (vars::BORDER_LIGHT, "#f3f4f6"),
    (vars::BLUE_LIGHT, "#f1f5f9"),
    (vars::SHADOW_SM, "0 1px 2px 0 rgb(0 0 0 / 0.03)"),
    (
        vars::SHADOW_MD,
        "0 4px 6px -1px rgb(0 0 0 / 0.06), 0 2px 4px -2px rgb(0 0 0 / 0.06)",
    ),
    (
        vars::SHADOW_LG,
        "0 10px 15px -3px rgb(0 0 0 / 0.08), 0 4px 6px -4px rgb(0 0 0 / 0.08)",
    ),
];

const DARK_SURFACES: [(&str, &str); 13] = [
    (vars::BG_PRIMARY, "#0f1419"),
    (vars::BG_SECONDARY, "#1a202c"),
    (vars::BG_TERTIARY, "#2d3748"),
    (vars::TEXT_PRIMARY, "#ffffff"),
    (vars::TEXT_SECONDARY, "#f7fafc"),
    (vars::TEXT_MUTED, "#e2e8f0"),
    (vars::TEXT_LIGHT, "#cbd5e0"),
    (vars::BORDER_COLOR, "#4a5568"),
    (vars::BORDER_LIGHT, "#2d3748"),
    (vars::BLUE_LIGHT, "#2a4365"),
    (vars::SHADOW_SM, "0 2px 4px 0 rgb(0 0 0 / 0.6)"),
    (
        vars::SHADOW_MD,
        "0 6px 12px -2px rgb(0 0 0 / 0.8), 0 4px 8px -4px rgb(0 0 0 / 0.8)",
    ),
    (
        vars::SHADOW_LG,
        "0 20px 25px -5px rgb(0 0 0 / 0.9), 0 10px 15px -8px rgb(0 0 0 / 0.9)",
    ),
];

/// The full set of style variables for one palette in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    palette_id: String,
    mode: Mode,
    variables: BTreeMap<String, String>,
}

impl ResolvedTheme {
    pub fn palette_id(&self) -> &str {
        &self.palette_id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Value of a variable, e.g. `theme.get("--bg-primary")`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Render as a single CSS rule.
    pub fn to_css(&self, selector: &str) -> String {
        let mut css = String::with_capacity(64 * self.variables.len());
        let _ = writeln!(css, "{selector} {{");
        for (name, value) in &self.variables {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

/// Compute every style variable for `palette` in `mode`.
///
/// # Errors
/// Returns [`ColorError::InvalidField`] naming the first palette color that is
/// not a `#rrggbb` value.
pub fn resolve(palette: &PaletteDefinition, mode: Mode) -> Result<ResolvedTheme, ColorError> {
    let swatch = palette.colors.parse()?;
    Ok(build(palette, &swatch, mode))
}

/// Like [`resolve`], but invalid colors are replaced by [`NEUTRAL`] and logged
/// instead of failing.
pub fn resolve_or_neutral(palette: &PaletteDefinition, mode: Mode) -> ResolvedTheme {
    let (swatch, errors) = palette.colors.parse_or(NEUTRAL);
    for err in &errors {
        warn!(
            theme.palette = %palette.id,
            theme.field = err.field().unwrap_or("?"),
            error = %err,
            "Substituting neutral color"
        );
    }
    build(palette, &swatch, mode)
}

/// The palette's own text for a color when it parsed to `parsed`, otherwise
/// the substitute.
fn as_written(raw: &str, parsed: HexColor) -> String {
    match HexColor::parse(raw) {
        Ok(color) if color == parsed => raw.trim().to_string(),
        _ => parsed.to_string(),
    }
}

fn build(palette: &PaletteDefinition, c: &Swatch, mode: Mode) -> ResolvedTheme {
    let mut variables = BTreeMap::new();
    let mut set = |name: &str, value: String| {
        variables.insert(name.to_string(), value);
    };
    let hex = CssColor::Hex;
    let brighter = |color: CssColor, factor: f64| CssColor::Rgb(scale_brightness(color.rgb(), factor));
    let raw = &palette.colors;
    let primary = as_written(&raw.primary, c.primary);
    let primary_hover = as_written(&raw.primary_hover, c.primary_hover);
    let primary_light = as_written(&raw.primary_light, c.primary_light);
    let accent = as_written(&raw.accent, c.accent);
    let accent_hover = as_written(&raw.accent_hover, c.accent_hover);

    set(vars::PRIMARY_COLOR, primary.clone());
    set(vars::PRIMARY_HOVER, primary_hover.clone());
    set(vars::PRIMARY_LIGHT, primary_light.clone());
    set(vars::ACCENT_COLOR, accent.clone());
    set(vars::ACCENT_HOVER, accent_hover.clone());
    set(vars::ACCENT_LIGHT, as_written(&raw.accent_light, c.accent_light));

    match mode {
        Mode::Light => {
            let link = ensure_contrast_ratio(c.primary, HexColor::WHITE, LINK_MIN_CONTRAST);
            let link = if link == CssColor::Hex(c.primary) {
                primary.clone()
            } else {
                link.to_string()
            };
            set(vars::BLUE_ACCENT, link.clone());
            set(vars::BLUE_HOVER, primary_hover.clone());
            set(vars::NAME_COLOR, link);
            set(vars::SECTION_ACCENT, primary.clone());
            set(
                vars::GRADIENT_PRIMARY,
                linear_gradient(&[(&primary, 0), (&primary_hover, 100)]),
            );
            set(
                vars::HIGHLIGHT_SOFT,
                linear_gradient(&[
                    (&as_written(&raw.highlight_border, c.highlight_border), 0),
                    (&primary, 50),
                    (&primary_light, 100),
                ]),
            );
            set(vars::HIGHLIGHT_BG_SOFT, as_written(&raw.highlight, c.highlight));
            set(vars::SHADOW_COLORED, format!("0 4px 14px 0 {primary}20"));
        }
        Mode::Dark => {
            let gentle = gentle_color(c.primary);
            set(vars::BLUE_ACCENT, gentle.to_string());
            set(vars::BLUE_HOVER, brighter(gentle, 1.1).to_string());
            set(vars::NAME_COLOR, gentle.to_string());
            set(vars::SECTION_ACCENT, gentle.to_string());
            set(
                vars::GRADIENT_PRIMARY,
                linear_gradient(&[(gentle, 0), (brighter(gentle, 1.2), 100)]),
            );
            set(
                vars::HIGHLIGHT_SOFT,
                linear_gradient(&[
                    (brighter(hex(c.highlight_border), 1.3), 0),
                    (brighter(hex(c.primary), 1.4), 50),
                    (brighter(hex(c.primary_light), 1.2), 100),
                ]),
            );
            set(vars::HIGHLIGHT_BG_SOFT, dark_highlight(c.highlight).to_string());
            set(vars::SHADOW_COLORED, format!("0 6px 20px 0 {primary}40"));
        }
    }

    set(
        vars::GRADIENT_ACCENT,
        linear_gradient(&[(&accent, 0), (&accent_hover, 100)]),
    );

    let surfaces = match mode {
        Mode::Light => &LIGHT_SURFACES,
        Mode::Dark => &DARK_SURFACES,
    };
    for &(name, value) in surfaces {
        set(name, value.to_string());
    }

    debug!(
        theme.palette = %palette.id,
        theme.mode = %mode,
        theme.variables = variables.len(),
        "Resolved theme"
    );

    ResolvedTheme {
        palette_id: palette.id.clone(),
        mode,
        variables,
    }
}

/// `linear-gradient(135deg, a 0%, b 100%)` with any number of stops.
fn linear_gradient<C: fmt::Display>(stops: &[(C, u8)]) -> String {
    let mut out = String::from("linear-gradient(135deg");
    for (color, at) in stops {
        let _ = write!(out, ", {color} {at}%");
    }
    out.push(')');
    out
}
