#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics and color math
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::new_without_default)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]

//! # sitetheme
//!
//! Light/dark mode and named color palettes for a static site.
//!
//! A site ships a small catalog of palettes, eight colors each. This crate turns
//! a palette plus a mode into the full set of CSS custom properties the
//! stylesheet reads (link colors that keep WCAG contrast, soft counter-colors
//! for dark backgrounds, gradients and surface tones) and keeps the user's
//! choice applied and persisted.
//!
//! ## Quick Start
//!
//! ```rust
//! use sitetheme::{resolve, Catalog, Mode};
//!
//! let catalog = Catalog::builtin();
//! let theme = resolve(catalog.default_palette(), Mode::Light).unwrap();
//! println!("{}", theme.to_css(":root"));
//! ```
//!
//! ## Live state
//!
//! [`ThemeState`] ties a catalog to a document through small ports
//! ([`PreferenceStore`], [`StyleSink`], [`SystemScheme`]):
//!
//! ```rust
//! use sitetheme::{Catalog, FixedScheme, MemoryStore, Mode, StyleSnapshot, ThemeConfig, ThemeState};
//!
//! let document = StyleSnapshot::new();
//! let mut state = ThemeState::new(
//!     Catalog::builtin(),
//!     ThemeConfig::default(),
//!     MemoryStore::new(),
//!     document.clone(),
//!     FixedScheme::LIGHT,
//! );
//! state.toggle_mode();
//! assert_eq!(document.attribute("data-theme").as_deref(), Some("dark"));
//! assert_eq!(state.current().mode, Mode::Dark);
//! ```

pub mod catalog;
pub mod color;
pub mod config;
pub mod derive;
pub mod palette;
pub mod ports;
pub mod resolver;
pub mod state;

pub use catalog::{Catalog, CatalogError, DEFAULT_PALETTE};
pub use color::{
    ColorError, CssColor, HexColor, Hsl, Rgb, contrast_ratio, ensure_contrast_ratio, hex_to_rgb,
    hsl_to_rgb, meets_aa, meets_aaa, relative_luminance, rgb_to_hsl, scale_brightness,
};
pub use config::{ConfigError, ThemeConfig};
pub use derive::{dark_highlight, gentle_color, warm_color};
pub use palette::{Mode, PaletteColors, PaletteDefinition, ParseModeError, Swatch};
#[cfg(feature = "native")]
pub use ports::{FileCatalog, FileStore};
pub use ports::{
    CatalogSource, FixedScheme, MemoryStore, PreferenceStore, StaticCatalog, StyleSink,
    StyleSnapshot, SystemScheme,
};
pub use resolver::{NEUTRAL, ResolvedTheme, resolve, resolve_or_neutral, vars};
pub use state::{ListenerId, Selection, ThemeState};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::color::{CssColor, HexColor};
    pub use crate::palette::{Mode, PaletteDefinition};
    pub use crate::ports::{PreferenceStore, StyleSink, SystemScheme};
    pub use crate::resolver::{ResolvedTheme, resolve, resolve_or_neutral};
    pub use crate::state::{Selection, ThemeState};
}
