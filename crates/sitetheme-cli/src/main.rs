#![forbid(unsafe_code)]

//! # sitetheme CLI
//!
//! Resolve palette catalogs to CSS, inspect contrast and derived colors, and
//! drive a persisted theme selection from the shell.
//!
//! ## Usage
//!
//! ```bash
//! sitetheme resolve --catalog themes.json --palette forest --mode dark
//! sitetheme contrast "#38bdf8" "#ffffff"
//! sitetheme derive "#7c3aed"
//! sitetheme list --catalog themes.json
//! sitetheme state --store prefs.json --toggle
//! ```

mod cli;

use std::path::Path;

use anyhow::Context as _;
use sitetheme::{
    Catalog, FileCatalog, FileStore, FixedScheme, HexColor, StyleSnapshot, ThemeConfig, ThemeState,
    contrast_ratio, dark_highlight, ensure_contrast_ratio, gentle_color, meets_aa, meets_aaa,
    resolve_or_neutral, warm_color,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{CatalogArgs, Cli, Command, OutputFormat, ResolveArgs, StateArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.log_directive());

    let config = match &cli.config {
        Some(path) => ThemeConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    match cli.command {
        Command::Resolve(args) => run_resolve(&config, &args),
        Command::Contrast {
            foreground,
            background,
        } => {
            run_contrast(foreground, background);
            Ok(())
        }
        Command::Derive { color } => {
            run_derive(color);
            Ok(())
        }
        Command::List(args) => {
            run_list(&config, &args);
            Ok(())
        }
        Command::State(args) => run_state(config, &args),
    }
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_catalog(config: &ThemeConfig, args: &CatalogArgs) -> Catalog {
    match args.resolve_path(config.catalog_location()) {
        Some(path) => {
            debug!(catalog.path = %path.display(), "Loading catalog");
            Catalog::load_or_builtin(&FileCatalog::new(path))
        }
        None => Catalog::builtin(),
    }
}

fn run_resolve(config: &ThemeConfig, args: &ResolveArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(config, &args.catalog);
    let palette = match args.palette.as_deref().or(config.default_palette_id()) {
        Some(id) => catalog.palette_or_default(id),
        None => catalog.default_palette(),
    };
    let theme = resolve_or_neutral(palette, args.mode);
    match args.format {
        OutputFormat::Css => print!("{}", theme.to_css(&args.selector)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&theme)?),
    }
    Ok(())
}

fn run_contrast(foreground: HexColor, background: HexColor) {
    let (fg, bg) = (foreground.rgb(), background.rgb());
    let verdict = |pass: bool| if pass { "pass" } else { "fail" };
    println!("Contrast ratio: {:.2}:1", contrast_ratio(fg, bg));
    println!("AA:  {}", verdict(meets_aa(fg, bg)));
    println!("AAA: {}", verdict(meets_aaa(fg, bg)));
}

fn run_derive(color: HexColor) {
    println!("gentle:    {}", gentle_color(color));
    println!("warm:      {}", warm_color(color));
    println!(
        "link:      {}",
        ensure_contrast_ratio(color, HexColor::WHITE, 4.5)
    );
    println!("highlight: {}", dark_highlight(color));
}

fn run_list(config: &ThemeConfig, args: &CatalogArgs) {
    let catalog = load_catalog(config, args);
    for palette in catalog.palettes() {
        let marker = if palette.id == catalog.default_id() { '*' } else { ' ' };
        println!(
            "{marker} {:<12} {:<16} {}",
            palette.id, palette.display_name, palette.colors.primary
        );
    }
}

fn run_state(config: ThemeConfig, args: &StateArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(&config, &args.catalog);
    let store_path = args.store_path();
    debug!(store.path = %store_path.display(), "Using preference store");

    let document = StyleSnapshot::new();
    let mut state = ThemeState::new(
        catalog,
        config,
        FileStore::open(&store_path),
        document.clone(),
        FixedScheme {
            prefers_dark: args.system_dark,
        },
    );

    if let Some(id) = &args.palette {
        if !state.set_palette(id) {
            eprintln!(
                "unknown palette '{id}', using '{}'",
                state.current().palette_id
            );
        }
    }
    if let Some(mode) = args.mode {
        state.set_mode(mode);
    } else if args.toggle {
        state.toggle_mode();
    }

    print_state(&state, &document, args, &store_path)
}

fn print_state(
    state: &ThemeState,
    document: &StyleSnapshot,
    args: &StateArgs,
    store_path: &Path,
) -> anyhow::Result<()> {
    let selection = state.current();
    match args.format {
        OutputFormat::Css => {
            println!(
                "/* palette: {}, mode: {}, store: {} */",
                selection.palette_id,
                selection.mode,
                store_path.display()
            );
            print!("{}", document.to_css(&args.selector));
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "selection": selection,
                "explicitMode": state.is_mode_explicit(),
                "variables": document.properties(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
