//! Counter-colors derived from a palette's primary color.
//!
//! Each derivation is a literal lookup table of hand-picked pairs first. The
//! algorithmic branch only runs for colors absent from the table and is a
//! best-effort heuristic, nothing more.

use crate::color::{CssColor, HexColor, Hsl, rgb_to_hsl};
use tracing::debug;

/// Hand-picked soft, non-blue counterparts for dark backgrounds.
const GENTLE_REMAP: [(u32, u32); 9] = [
    (0x002fa7, 0xfbbf24), // klein -> warm gold
    (0x1e40af, 0xf59e0b), // blue -> amber
    (0x2563eb, 0xd97706), // blue -> orange
    (0x407d52, 0x86efac), // green -> pale green
    (0x059669, 0x6ee7b7),
    (0x7c3aed, 0xc4b5fd), // purple -> pale purple
    (0xdc2626, 0xfca5a5), // red -> pale red
    (0x0d9488, 0x5eead4), // teal -> pale teal
    (0xea580c, 0xfdba74), // orange -> pale orange
];

/// Hand-picked deep warm counterparts that stay readable on white.
const WARM_REMAP: [(u32, u32); 9] = [
    (0x002fa7, 0xd97706),
    (0x1e40af, 0xdc2626),
    (0x2563eb, 0xea580c),
    (0x407d52, 0x059669),
    (0x059669, 0x047857),
    (0x7c3aed, 0x7c2d12),
    (0xdc2626, 0x991b1b),
    (0x0d9488, 0x0f766e),
    (0xea580c, 0xc2410c),
];

/// Translucent dark-mode replacements for known light highlight backgrounds.
const DARK_HIGHLIGHT: [(u32, &str); 8] = [
    (0xeff6ff, "rgba(0, 47, 167, 0.3)"),
    (0xf0fdf4, "rgba(64, 125, 82, 0.25)"),
    (0xfef3c7, "rgba(146, 64, 14, 0.3)"),
    (0xfef3e2, "rgba(146, 64, 14, 0.3)"),
    (0xfef7ff, "rgba(124, 58, 237, 0.3)"),
    (0xfef2f2, "rgba(220, 38, 38, 0.3)"),
    (0xf0fdfa, "rgba(13, 148, 136, 0.3)"),
    (0xfff7ed, "rgba(234, 88, 12, 0.3)"),
];

/// Used for any highlight color missing from [`DARK_HIGHLIGHT`].
pub const DEFAULT_DARK_HIGHLIGHT: &str = "rgba(0, 47, 167, 0.3)";

fn lookup<T: Copy>(table: &[(u32, T)], color: HexColor) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| HexColor::from_u32(*key) == color)
        .map(|(_, value)| *value)
}

/// Soft warm counter-color for links and headings on dark backgrounds.
pub fn gentle_color(primary: HexColor) -> CssColor {
    if let Some(mapped) = lookup(&GENTLE_REMAP, primary) {
        let mapped = HexColor::from_u32(mapped);
        debug!(color.primary = %primary, color.gentle = %mapped, "Gentle color from table");
        return CssColor::Hex(mapped);
    }
    let generated = generate_gentle(primary);
    debug!(color.primary = %primary, color.gentle = %generated.to_rgb(), "Gentle color generated");
    CssColor::Rgb(generated.to_rgb())
}

/// Heuristic fallback: cap saturation, lift lightness into `[0.70, 0.85]`.
pub fn generate_gentle(color: HexColor) -> Hsl {
    let hsl = rgb_to_hsl(color.rgb());
    Hsl::new(
        hsl.h,
        (hsl.s * 0.8).min(0.7),
        (hsl.l + 0.4).clamp(0.7, 0.85),
    )
}

/// Deep warm counter-color that keeps contrast on light backgrounds.
pub fn warm_color(primary: HexColor) -> CssColor {
    if let Some(mapped) = lookup(&WARM_REMAP, primary) {
        return CssColor::Hex(HexColor::from_u32(mapped));
    }
    let generated = generate_warm(primary);
    debug!(color.primary = %primary, color.warm = %generated.to_rgb(), "Warm color generated");
    CssColor::Rgb(generated.to_rgb())
}

/// Heuristic fallback: pull the hue toward red/orange/yellow, keep saturation
/// at least 0.6 and lightness within `[0.3, 0.5]`.
pub fn generate_warm(color: HexColor) -> Hsl {
    let hsl = rgb_to_hsl(color.rgb());
    let h = if hsl.h > 0.5 {
        0.08 + (hsl.h - 0.5) * 0.1
    } else if hsl.h > 0.16 {
        0.16
    } else {
        hsl.h
    };
    Hsl::new(h, hsl.s.max(0.6), hsl.l.clamp(0.3, 0.5))
}

/// Dark-mode replacement for a light highlight background.
pub fn dark_highlight(highlight: HexColor) -> &'static str {
    lookup(&DARK_HIGHLIGHT, highlight).unwrap_or(DEFAULT_DARK_HIGHLIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb, contrast_ratio};

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).expect("valid hex")
    }

    #[test]
    fn test_gentle_klein_is_gold() {
        assert_eq!(gentle_color(hex("#002fa7")).to_string(), "#fbbf24");
    }

    #[test]
    fn test_gentle_table_entries() {
        for (from, to) in GENTLE_REMAP {
            let out = gentle_color(HexColor::from_u32(from));
            assert_eq!(out, CssColor::Hex(HexColor::from_u32(to)));
        }
    }

    #[test]
    fn test_gentle_lookup_ignores_case() {
        assert_eq!(gentle_color(hex("#7C3AED")).to_string(), "#c4b5fd");
    }

    #[test]
    fn test_gentle_generated_is_light_and_muted() {
        let out = gentle_color(hex("#123456"));
        assert!(matches!(out, CssColor::Rgb(_)));
        let hsl = out.rgb().to_hsl();
        // Rounding to 8-bit channels can nudge lightness slightly.
        assert!(hsl.l >= 0.69 && hsl.l <= 0.86, "lightness {}", hsl.l);
        assert!(hsl.s <= 0.71, "saturation {}", hsl.s);
    }

    #[test]
    fn test_generate_gentle_bounds() {
        let hsl = generate_gentle(hex("#000000"));
        assert_eq!(hsl.l, 0.7);
        let hsl = generate_gentle(hex("#ffffff"));
        assert_eq!(hsl.l, 0.85);
        let hsl = generate_gentle(hex("#ff0000"));
        assert_eq!(hsl.s, 0.7);
    }

    #[test]
    fn test_warm_table_and_fallback() {
        assert_eq!(warm_color(hex("#002fa7")).to_string(), "#d97706");

        let out = warm_color(hex("#3355ff"));
        let hsl = generate_warm(hex("#3355ff"));
        assert!(hsl.h < 0.1, "blue hue should rotate toward orange");
        assert!(hsl.s >= 0.6);
        assert!((0.3..=0.5).contains(&hsl.l));
        assert!(out.to_string().starts_with("rgb("));
    }

    #[test]
    fn test_warm_fallback_readable_on_white() {
        let out = warm_color(hex("#a0c4ff"));
        assert!(contrast_ratio(out.rgb(), Rgb::WHITE) > 2.0);
    }

    #[test]
    fn test_dark_highlight_table() {
        assert_eq!(dark_highlight(hex("#f0fdf4")), "rgba(64, 125, 82, 0.25)");
        assert_eq!(dark_highlight(hex("#fff7ed")), "rgba(234, 88, 12, 0.3)");
        assert_eq!(dark_highlight(hex("#123123")), DEFAULT_DARK_HIGHLIGHT);
    }
}
