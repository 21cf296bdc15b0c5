#![allow(clippy::float_cmp)]

use proptest::prelude::*;
use sitetheme::{
    CssColor, HexColor, Mode, PaletteColors, PaletteDefinition, Rgb, contrast_ratio,
    ensure_contrast_ratio, hsl_to_rgb, resolve, rgb_to_hsl, scale_brightness,
};

fn any_rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(Rgb::from)
}

fn any_hex() -> impl Strategy<Value = HexColor> {
    any_rgb().prop_map(HexColor::from_rgb)
}

fn any_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Light), Just(Mode::Dark)]
}

fn within_one(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= 1
}

// =============================================================================
// Conversions
// =============================================================================

proptest! {
    #[test]
    fn hsl_round_trip_within_one(rgb in any_rgb()) {
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        prop_assert!(within_one(rgb.r, back.r), "{rgb:?} -> {back:?}");
        prop_assert!(within_one(rgb.g, back.g), "{rgb:?} -> {back:?}");
        prop_assert!(within_one(rgb.b, back.b), "{rgb:?} -> {back:?}");
    }

    #[test]
    fn hue_is_normalized(rgb in any_rgb()) {
        let hsl = rgb_to_hsl(rgb);
        prop_assert!((0.0..1.0).contains(&hsl.h), "hue {}", hsl.h);
        prop_assert!((0.0..=1.0).contains(&hsl.s));
        prop_assert!((0.0..=1.0).contains(&hsl.l));
    }

    #[test]
    fn hex_display_parses_back(hex in any_hex()) {
        let text = hex.to_string();
        prop_assert_eq!(HexColor::parse(&text.to_uppercase()), Ok(hex));
    }
}

// =============================================================================
// Contrast
// =============================================================================

proptest! {
    #[test]
    fn contrast_with_self_is_one(rgb in any_rgb()) {
        prop_assert!((contrast_ratio(rgb, rgb) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn contrast_is_symmetric_and_bounded(a in any_rgb(), b in any_rgb()) {
        let ab = contrast_ratio(a, b);
        prop_assert_eq!(ab, contrast_ratio(b, a));
        prop_assert!(ab >= 1.0);
        prop_assert!(ab <= 21.0 + 1e-9);
    }

    #[test]
    fn scaling_down_never_brightens(rgb in any_rgb(), tenths in 0u8..=10) {
        let scaled = scale_brightness(rgb, f64::from(tenths) / 10.0);
        prop_assert!(scaled.r <= rgb.r && scaled.g <= rgb.g && scaled.b <= rgb.b);
    }

    #[test]
    fn ensured_contrast_on_white_meets_minimum(fg in any_hex()) {
        let out = ensure_contrast_ratio(fg, HexColor::WHITE, 4.5);
        prop_assert!(contrast_ratio(out.rgb(), Rgb::WHITE) >= 4.5, "{fg} -> {out}");
    }

    #[test]
    fn passing_foreground_is_returned_unchanged(fg in any_hex(), bg in any_hex()) {
        let ratio = contrast_ratio(fg.rgb(), bg.rgb());
        prop_assert_eq!(ensure_contrast_ratio(fg, bg, ratio), CssColor::Hex(fg));
    }
}

// =============================================================================
// Resolver
// =============================================================================

proptest! {
    #[test]
    fn resolve_is_deterministic(
        primary in any_hex(),
        accent in any_hex(),
        highlight in any_hex(),
        mode in any_mode(),
    ) {
        let colors = PaletteColors {
            primary: primary.to_string(),
            accent: accent.to_string(),
            highlight: highlight.to_string(),
            ..PaletteColors::klein()
        };
        let palette = PaletteDefinition::new("generated", "Generated", colors);
        let a = resolve(&palette, mode).expect("valid palette");
        let b = resolve(&palette, mode).expect("valid palette");
        prop_assert_eq!(a.to_css(":root"), b.to_css(":root"));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn light_links_always_readable(primary in any_hex()) {
        let colors = PaletteColors {
            primary: primary.to_string(),
            ..PaletteColors::klein()
        };
        let palette = PaletteDefinition::new("generated", "Generated", colors);
        let theme = resolve(&palette, Mode::Light).expect("valid palette");
        let expected = ensure_contrast_ratio(primary, HexColor::WHITE, 4.5);
        prop_assert!(contrast_ratio(expected.rgb(), Rgb::WHITE) >= 4.5);
        let expected = expected.to_string();
        prop_assert_eq!(theme.get("--blue-accent"), Some(expected.as_str()));
    }
}
