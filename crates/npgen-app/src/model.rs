// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Light => "🌓",
            Self::Dark => "🌞",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    DigitField,
    CopyButton,
    ThemeToggle,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseKind {
    Copied,
    Error,
}

/// Optional controls. A missing part gets no handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetParts {
    pub copy_button: bool,
    pub theme_toggle: bool,
}

impl Default for WidgetParts {
    fn default() -> Self {
        Self {
            copy_button: true,
            theme_toggle: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    DarkMode,
}

impl SettingKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DarkMode => "darkMode",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DarkMode => "dark mode",
        }
    }
}

/// Stored flags are the literal strings `"true"` and `"false"`; anything
/// else is unreadable.
pub fn parse_stored_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub const fn stored_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::{SettingKey, Theme, parse_stored_flag, stored_flag};

    #[test]
    fn stored_flag_accepts_only_literal_booleans() {
        assert_eq!(parse_stored_flag("true"), Some(true));
        assert_eq!(parse_stored_flag("false"), Some(false));
        for raw in ["TRUE", "True", "1", "yes", "on", " true", "maybe", ""] {
            assert_eq!(parse_stored_flag(raw), None, "{raw:?}");
        }
        assert_eq!(stored_flag(true), "true");
        assert_eq!(stored_flag(false), "false");
    }

    #[test]
    fn setting_key_uses_fixed_storage_name() {
        assert_eq!(SettingKey::DarkMode.as_str(), "darkMode");
        assert_eq!(SettingKey::DarkMode.label(), "dark mode");
    }

    #[test]
    fn theme_toggle_flips_glyph() {
        let theme = Theme::default();
        assert_eq!(theme, Theme::Light);
        assert_eq!(theme.glyph(), "🌓");
        assert_eq!(theme.toggled(), Theme::Dark);
        assert_eq!(theme.toggled().glyph(), "🌞");
        assert!(Theme::from_dark(true).is_dark());
    }
}
