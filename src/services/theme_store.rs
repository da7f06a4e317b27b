//! Theme Store: persisted dark/light preference and the toggle glyph.

use crate::services::local_store::LocalStoreTrait;
use crate::types::errors::StoreError;
use crate::types::settings::ThemePreference;

/// Local storage key holding the preference.
pub const THEME_KEY: &str = "theme";

/// Glyph shown on the theme toggle; it names the mode a click switches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeIcon {
    Sun,
    Moon,
}

impl ThemeIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ThemeIcon::Sun => "☀️",
            ThemeIcon::Moon => "🌙",
        }
    }
}

/// Theme state applied to the root of the page.
pub struct ThemeStore<S: LocalStoreTrait> {
    store: S,
    preference: ThemePreference,
}

impl<S: LocalStoreTrait> ThemeStore<S> {
    /// Reads the stored preference before anything theme-dependent is rendered.
    pub fn load(store: S) -> Self {
        let preference = match store.get(THEME_KEY) {
            Some(value) => ThemePreference::parse(value).unwrap_or_else(|| {
                log::warn!("ignoring unknown theme preference {:?}", value);
                ThemePreference::default()
            }),
            None => ThemePreference::default(),
        };
        Self { store, preference }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn is_dark(&self) -> bool {
        self.preference == ThemePreference::Dark
    }

    pub fn icon(&self) -> ThemeIcon {
        match self.preference {
            ThemePreference::Dark => ThemeIcon::Sun,
            ThemePreference::Light => ThemeIcon::Moon,
        }
    }

    /// Class set on the document root.
    pub fn root_class(&self) -> &'static str {
        match self.preference {
            ThemePreference::Dark => "dark-mode",
            ThemePreference::Light => "light-mode",
        }
    }

    /// Flips the mode and writes the new preference before returning.
    ///
    /// The in-memory mode flips even if the write fails; the error is reported.
    pub fn toggle(&mut self) -> Result<ThemePreference, StoreError> {
        self.preference = self.preference.flipped();
        self.store.set(THEME_KEY, self.preference.as_str())?;
        Ok(self.preference)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
