//! Command-line interface for `sitetheme`.
//!
//! # Examples
//!
//! ```bash
//! # CSS for the built-in palette in dark mode
//! sitetheme resolve --mode dark
//!
//! # JSON for a palette from a catalog file
//! sitetheme resolve --catalog themes.json --palette forest --format json
//!
//! # Check a color pair against WCAG
//! sitetheme contrast "#002fa7" "#ffffff"
//!
//! # Drive the persisted selection like the site's toggle button does
//! sitetheme state --toggle
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use sitetheme::{HexColor, Mode};

/// Resolve site color palettes to CSS custom properties.
#[derive(Parser, Debug, Clone)]
#[command(name = "sitetheme", author, version, about)]
pub struct Cli {
    /// TOML file with storage keys, attribute names and catalog location
    #[arg(long, global = true, env = "SITETHEME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the variables for one palette and mode
    Resolve(ResolveArgs),

    /// Contrast ratio of two colors with WCAG verdicts
    Contrast {
        /// Foreground color (#rrggbb)
        foreground: HexColor,
        /// Background color (#rrggbb)
        background: HexColor,
    },

    /// Colors derived from a primary color
    Derive {
        /// Primary color (#rrggbb)
        color: HexColor,
    },

    /// List the palettes in a catalog
    List(CatalogArgs),

    /// Update and print the persisted theme selection
    State(StateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Catalog file (.json or .toml). Defaults to the configured catalog
    /// location when that file exists, else the built-in palette.
    #[arg(long, short = 'c', env = "SITETHEME_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Palette id (defaults to the catalog default)
    #[arg(long, short = 'p')]
    pub palette: Option<String>,

    /// light or dark
    #[arg(long, short = 'm', default_value = "light")]
    pub mode: Mode,

    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Css)]
    pub format: OutputFormat,

    /// Selector for CSS output
    #[arg(long, default_value = ":root")]
    pub selector: String,
}

#[derive(Args, Debug, Clone)]
pub struct StateArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Preference file (JSON). Defaults to the user config directory.
    #[arg(long, env = "SITETHEME_STORE")]
    pub store: Option<PathBuf>,

    /// Select a palette
    #[arg(long, short = 'p')]
    pub palette: Option<String>,

    /// Select a mode explicitly
    #[arg(long, short = 'm', conflicts_with = "toggle")]
    pub mode: Option<Mode>,

    /// Flip between light and dark
    #[arg(long)]
    pub toggle: bool,

    /// Pretend the operating system prefers a dark scheme
    #[arg(long)]
    pub system_dark: bool,

    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Css)]
    pub format: OutputFormat,

    /// Selector for CSS output
    #[arg(long, default_value = ":root")]
    pub selector: String,
}

/// Output formats for resolved themes.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// A CSS rule of custom properties
    #[default]
    Css,
    /// The resolved theme as JSON
    Json,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default `EnvFilter` directive for the verbosity flag.
    pub const fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl StateArgs {
    /// The preference file to use: `--store`, else the per-user config dir.
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "sitetheme").map_or_else(
        || PathBuf::from("sitetheme-preferences.json"),
        |dirs| dirs.config_dir().join("preferences.json"),
    )
}

impl CatalogArgs {
    /// Explicit catalog, else `fallback` if it exists on disk.
    pub fn resolve_path(&self, fallback: &str) -> Option<PathBuf> {
        self.catalog.clone().or_else(|| {
            let path = Path::new(fallback);
            path.is_file().then(|| path.to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("sitetheme").chain(args.iter().copied()))
    }

    #[test]
    fn test_resolve_defaults() {
        let cli = parse(&["resolve"]).expect("parse");
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.mode, Mode::Light);
        assert_eq!(args.format, OutputFormat::Css);
        assert_eq!(args.selector, ":root");
        assert!(args.palette.is_none());
    }

    #[test]
    fn test_mode_is_validated() {
        assert!(parse(&["resolve", "--mode", "dim"]).is_err());
        assert!(parse(&["resolve", "--mode", "dark"]).is_ok());
    }

    #[test]
    fn test_contrast_rejects_bad_colors() {
        assert!(parse(&["contrast", "#002fa7", "white"]).is_err());
        let cli = parse(&["contrast", "#002FA7", "#ffffff"]).expect("parse");
        let Command::Contrast { foreground, .. } = cli.command else {
            panic!("expected contrast");
        };
        assert_eq!(foreground.to_string(), "#002fa7");
    }

    #[test]
    fn test_state_mode_conflicts_with_toggle() {
        assert!(parse(&["state", "--mode", "dark", "--toggle"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["list"]).expect("parse").log_directive(), "warn");
        assert_eq!(parse(&["-vv", "list"]).expect("parse").log_directive(), "debug");
    }

    #[test]
    fn test_catalog_fallback_requires_existing_file() {
        let args = CatalogArgs { catalog: None };
        assert_eq!(args.resolve_path("./definitely-missing-themes.json"), None);
        let explicit = CatalogArgs {
            catalog: Some(PathBuf::from("a.toml")),
        };
        assert_eq!(
            explicit.resolve_path("./themes.json"),
            Some(PathBuf::from("a.toml"))
        );
    }
}
