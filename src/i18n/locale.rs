//! Locale guard.
//!
//! # Design Decisions
//! - Membership is exact and case-sensitive ("en" ≠ "EN")
//! - A [`Locale`] can only be obtained through [`SupportedLocales::check`]
//! - Rejection is a value, never an error

use std::fmt;

use serde::Serialize;

use crate::config::I18nConfig;

/// A locale code known to be in the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of checking a candidate string against the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleCheck {
    Supported(Locale),
    Unsupported(String),
}

impl LocaleCheck {
    pub fn is_supported(&self) -> bool {
        matches!(self, LocaleCheck::Supported(_))
    }

    /// Converts into a `Result`, keeping the rejected string as the error.
    pub fn into_result(self) -> Result<Locale, String> {
        match self {
            LocaleCheck::Supported(locale) => Ok(locale),
            LocaleCheck::Unsupported(raw) => Err(raw),
        }
    }
}

/// Ordered, immutable list of supported locale codes.
#[derive(Debug, Clone)]
pub struct SupportedLocales {
    codes: Vec<String>,
    default_index: usize,
}

impl SupportedLocales {
    /// Build from a list of codes; the first entry is the default.
    ///
    /// Returns `None` for an empty list.
    pub fn new<I, S>(codes: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        if codes.is_empty() {
            return None;
        }
        Some(Self {
            codes,
            default_index: 0,
        })
    }

    /// Build from validated config. Falls back to the first code if the
    /// configured default is absent.
    pub fn from_config(config: &I18nConfig) -> Option<Self> {
        let mut locales = Self::new(config.locales.iter().cloned())?;
        if let Some(i) = locales.position(&config.default_locale) {
            locales.default_index = i;
        }
        Some(locales)
    }

    /// Check `candidate` for membership.
    pub fn check(&self, candidate: &str) -> LocaleCheck {
        match self.position(candidate) {
            Some(i) => LocaleCheck::Supported(Locale(self.codes[i].clone())),
            None => LocaleCheck::Unsupported(candidate.to_string()),
        }
    }

    pub fn is_supported(&self, candidate: &str) -> bool {
        self.position(candidate).is_some()
    }

    pub fn default_locale(&self) -> Locale {
        Locale(self.codes[self.default_index].clone())
    }

    /// Resolve an optional request parameter, defaulting when absent.
    pub fn resolve(&self, requested: Option<&str>) -> LocaleCheck {
        match requested {
            Some(code) => self.check(code),
            None => LocaleCheck::Supported(self.default_locale()),
        }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    fn position(&self, candidate: &str) -> Option<usize> {
        self.codes.iter().position(|code| code == candidate)
    }
}
