//! Internationalization - Key to localized string lookup
//!
//! The core never hard-codes user-facing text. It asks a [`Translate`]
//! implementation for a key and fills `{name}` placeholders.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;

/// Keys used by the client core.
pub mod keys {
    pub const RESEND_COUNTDOWN: &str = "verification.resend_in";
    pub const RESEND_AVAILABLE: &str = "verification.resend_available";
    pub const GENERIC_ERROR: &str = "errors.generic";
    pub const REWARD_RECEIVED: &str = "rewards.received";
}

pub trait Translate {
    /// Localized string for `key`.
    fn t(&self, key: &str) -> String;

    /// Localized string with `{name}` placeholders replaced from `args`.
    fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.t(key), args)
    }
}

/// Replace `{name}` placeholders. Unknown placeholders are left as-is.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// In-memory message catalog for one locale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Built-in English strings for the core keys.
    pub fn english() -> Self {
        Self::new("en")
            .with(keys::RESEND_COUNTDOWN, "Resend code in {time}")
            .with(keys::RESEND_AVAILABLE, "Resend code")
            .with(keys::GENERIC_ERROR, "Something went wrong, please try again")
            .with(keys::REWARD_RECEIVED, "You received a reward")
    }

    /// Load a flat `{ "key": "text" }` JSON object.
    pub fn from_json(locale: impl Into<String>, json: &str) -> Result<Self> {
        Ok(Self {
            locale: locale.into(),
            entries: serde_json::from_str(json)?,
        })
    }

    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }

    /// Overlay `other` on top of this catalog.
    pub fn merge(mut self, other: Catalog) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Translate for Catalog {
    /// Falls back to the key itself when missing.
    fn t(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(text) => text.clone(),
            None => {
                debug!(locale = %self.locale, key, "missing translation");
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        let catalog = Catalog::english();
        assert_eq!(catalog.t(keys::RESEND_AVAILABLE), "Resend code");
        assert_eq!(catalog.t("missing.key"), "missing.key");
    }

    #[test]
    fn test_placeholders() {
        let catalog = Catalog::english();
        assert_eq!(
            catalog.t_with(keys::RESEND_COUNTDOWN, &[("time", "00:42")]),
            "Resend code in 00:42"
        );
        assert_eq!(interpolate("{a} {b}", &[("a", "1")]), "1 {b}");
    }

    #[test]
    fn test_json_overlay() {
        let es = Catalog::from_json("es", r#"{"verification.resend_available":"Reenviar código"}"#)
            .unwrap();
        let merged = Catalog::english().merge(es);
        assert_eq!(merged.t(keys::RESEND_AVAILABLE), "Reenviar código");
        assert_eq!(merged.t(keys::GENERIC_ERROR), "Something went wrong, please try again");
        assert!(Catalog::from_json("xx", "[1,2]").is_err());
    }
}
