//! The live theme selection for one document.
//!
//! [`ThemeState`] owns the catalog and the host ports. Every change resolves the
//! selected palette, pushes the variables into the [`StyleSink`], persists the
//! selection and notifies listeners, in that order.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, DEFAULT_PALETTE};
use crate::config::ThemeConfig;
use crate::palette::{Mode, PaletteDefinition};
use crate::ports::{PreferenceStore, StyleSink, SystemScheme};
use crate::resolver::{ResolvedTheme, resolve_or_neutral};

/// The user-visible selection: which palette, which mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub palette_id: String,
    pub mode: Mode,
}

/// Identifier for a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&Selection)>;

/// Current palette and mode, applied to a document.
pub struct ThemeState {
    catalog: Catalog,
    config: ThemeConfig,
    default_palette: String,
    palette_id: String,
    mode: Mode,
    explicit_mode: bool,
    store: Box<dyn PreferenceStore>,
    sink: Box<dyn StyleSink>,
    system: Box<dyn SystemScheme>,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener_id: u64,
    resolved: ResolvedTheme,
}

impl fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeState")
            .field("palette_id", &self.palette_id)
            .field("mode", &self.mode)
            .field("explicit_mode", &self.explicit_mode)
            .field("palettes", &self.catalog.len())
            .field("listeners", &format!("{} listeners", self.listeners.len()))
            .finish_non_exhaustive()
    }
}

impl ThemeState {
    /// Restore the stored selection (or the defaults) and apply it.
    ///
    /// With nothing stored, the configured default palette is used, then
    /// `klein`, then the catalog's default. An unknown stored palette falls
    /// back to the configured default or the catalog's default; a stored
    /// mode that does not parse counts as no stored mode, in which case the
    /// system preference decides.
    pub fn new(
        catalog: Catalog,
        config: ThemeConfig,
        store: impl PreferenceStore + 'static,
        sink: impl StyleSink + 'static,
        system: impl SystemScheme + 'static,
    ) -> Self {
        let default_palette = match config.default_palette_id() {
            Some(id) if catalog.contains(id) => id.to_string(),
            Some(id) => {
                warn!(
                    theme.palette = id,
                    theme.default = catalog.default_id(),
                    "Configured default palette not in catalog"
                );
                catalog.default_id().to_string()
            }
            None => catalog.default_id().to_string(),
        };

        let palette_id = match store.get(config.palette_key_name()) {
            Some(id) if catalog.contains(&id) => id,
            Some(id) => {
                warn!(theme.palette = %id, "Stored palette unknown, using default");
                default_palette.clone()
            }
            None => first_visit_palette(&catalog, &config),
        };

        let stored_mode = store
            .get(config.mode_key_name())
            .and_then(|raw| match raw.parse::<Mode>() {
                Ok(mode) => Some(mode),
                Err(err) => {
                    debug!(error = %err, "Ignoring stored mode");
                    None
                }
            });
        let explicit_mode = stored_mode.is_some();
        let mode = stored_mode.unwrap_or_else(|| Mode::from_prefers_dark(system.prefers_dark()));

        let resolved = resolve_or_neutral(catalog.palette_or_default(&palette_id), mode);
        let mut state = Self {
            catalog,
            config,
            default_palette,
            palette_id,
            mode,
            explicit_mode,
            store: Box::new(store),
            sink: Box::new(sink),
            system: Box::new(system),
            listeners: BTreeMap::new(),
            next_listener_id: 1,
            resolved,
        };
        state.apply();
        state
    }

    /// Switch palette. Returns `false` if `id` was unknown and the default
    /// palette was applied instead.
    pub fn set_palette(&mut self, id: &str) -> bool {
        let known = self.catalog.contains(id);
        if known {
            self.palette_id = id.to_string();
        } else {
            warn!(
                theme.palette = id,
                theme.default = %self.default_palette,
                "Unknown palette, using default"
            );
            self.palette_id.clone_from(&self.default_palette);
        }
        self.apply();
        known
    }

    /// Switch mode. The choice is remembered and stops the state from
    /// following the system preference.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.explicit_mode = true;
        self.apply();
    }

    /// Flip light/dark and return the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        let mode = self.mode.toggle();
        self.set_mode(mode);
        mode
    }

    /// Follow an OS-level scheme change, unless the user chose a mode.
    ///
    /// Returns `true` when the theme was re-applied.
    pub fn system_scheme_changed(&mut self, prefers_dark: bool) -> bool {
        if self.explicit_mode {
            debug!(theme.mode = %self.mode, "Explicit mode set, ignoring system scheme");
            return false;
        }
        let mode = Mode::from_prefers_dark(prefers_dark);
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.apply();
        true
    }

    /// Re-read the system preference and follow it as [`system_scheme_changed`](Self::system_scheme_changed) does.
    pub fn sync_system_scheme(&mut self) -> bool {
        let prefers_dark = self.system.prefers_dark();
        self.system_scheme_changed(prefers_dark)
    }

    pub fn current(&self) -> Selection {
        Selection {
            palette_id: self.palette_id.clone(),
            mode: self.mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the mode came from storage or the user rather than the system.
    pub fn is_mode_explicit(&self) -> bool {
        self.explicit_mode
    }

    pub fn current_palette(&self) -> &PaletteDefinition {
        self.catalog.palette_or_default(&self.palette_id)
    }

    /// Variables applied by the last change.
    pub fn resolved(&self) -> &ResolvedTheme {
        &self.resolved
    }

    /// Every palette the user can pick, in id order.
    pub fn available_palettes(&self) -> impl Iterator<Item = &PaletteDefinition> {
        self.catalog.palettes()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Register a listener for selection changes.
    pub fn on_change<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&Selection) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.insert(id, Box::new(callback));
        debug!(theme.listener_id = id.0, "Theme listener registered");
        id
    }

    /// Remove a listener by id.
    pub fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_some() {
            debug!(theme.listener_id = id.0, "Theme listener removed");
        }
    }

    fn apply(&mut self) {
        let palette = self.catalog.palette_or_default(&self.palette_id);
        self.resolved = resolve_or_neutral(palette, self.mode);

        self.sink
            .set_attribute(self.config.mode_attribute_name(), self.mode.as_str());
        self.sink
            .set_attribute(self.config.palette_attribute_name(), &self.palette_id);
        for (name, value) in self.resolved.iter() {
            self.sink.set_property(name, value);
        }

        self.store
            .set(self.config.palette_key_name(), &self.palette_id);
        if self.explicit_mode {
            self.store
                .set(self.config.mode_key_name(), self.mode.as_str());
        }

        info!(
            theme.palette = %self.palette_id,
            theme.mode = %self.mode,
            theme.explicit = self.explicit_mode,
            "Theme applied"
        );
        self.notify_listeners();
    }

    fn notify_listeners(&self) {
        let selection = self.current();
        for (id, listener) in &self.listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener(&selection)));
            if result.is_err() {
                warn!(
                    theme.listener_id = id.0,
                    theme.palette = %selection.palette_id,
                    "Theme listener panicked"
                );
            }
        }
    }
}

/// Palette for a visitor with no stored selection.
fn first_visit_palette(catalog: &Catalog, config: &ThemeConfig) -> String {
    config
        .default_palette_id()
        .filter(|id| catalog.contains(id))
        .or_else(|| catalog.contains(DEFAULT_PALETTE).then_some(DEFAULT_PALETTE))
        .unwrap_or_else(|| catalog.default_id())
        .to_string()
}
