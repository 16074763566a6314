use super::storage::ClientStorage;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const THEME_KEY: &str = "photoshare_theme";

/// Client hint carrying the operating system color scheme.
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class set on the `<html>` element.
    pub fn html_class(&self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Reads the system preference hint, if the browser sent one.
pub fn system_preference(headers: &HeaderMap) -> Option<Theme> {
    headers
        .get(COLOR_SCHEME_HINT)?
        .to_str()
        .ok()?
        .trim_matches('"')
        .parse()
        .ok()
}

pub struct ThemeState<'a, S: ClientStorage + ?Sized> {
    storage: &'a mut S,
    system_preference: Option<Theme>,
}

impl<'a, S: ClientStorage + ?Sized> ThemeState<'a, S> {
    pub fn new(storage: &'a mut S, system_preference: Option<Theme>) -> Self {
        Self {
            storage,
            system_preference,
        }
    }

    pub fn get_theme(&self) -> Theme {
        self.storage
            .get(THEME_KEY)
            .and_then(|saved| saved.parse().ok())
            .or(self.system_preference)
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.storage.set(THEME_KEY, theme.as_str());
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.get_theme().toggled();
        self.set_theme(theme);
        theme
    }

    pub fn init_theme(&mut self) -> Theme {
        let theme = self.get_theme();
        self.set_theme(theme);
        theme
    }

    pub fn is_dark(&self) -> bool {
        self.get_theme() == Theme::Dark
    }
}
