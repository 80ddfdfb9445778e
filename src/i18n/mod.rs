//! Locale handling.
//!
//! Supported locales come from `i18n` config; every locale that reaches a
//! handler has been checked against that list.

pub mod locale;

pub use locale::{Locale, LocaleCheck, SupportedLocales};
