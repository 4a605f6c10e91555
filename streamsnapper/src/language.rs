//! Language preferences and the runtime locale lookup behind `"local"`.

use crate::error::{Error, Result};

pub const DEFAULT_LOCALE: &str = "en-US";

/// Supplies the viewer's locale for the `"local"` language sentinel.
pub trait LocaleResolver: Send + Sync {
    /// Locale as a BCP 47 style tag (`pt-BR`), or `None` when unknown.
    fn locale(&self) -> Option<String>;
}

/// Reads the POSIX locale variables, in the order the C library honours
/// them, and falls back to a fixed tag.
#[derive(Debug, Clone)]
pub struct SystemLocale {
    fallback: String
}

impl SystemLocale {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into()
        }
    }
}

impl Default for SystemLocale {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleResolver for SystemLocale {
    fn locale(&self) -> Option<String> {
        let detected = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| parse_posix_locale(&value));

        match detected {
            Some(locale) => {
                tracing::debug!(%locale, "detected system locale");
                Some(locale)
            }
            None => {
                tracing::debug!(fallback = %self.fallback, "using fallback locale");
                Some(self.fallback.clone())
            }
        }
    }
}

/// A locale fixed at construction, for tests and for callers that already
/// know the viewer's language.
#[derive(Debug, Clone)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(Some(locale.into()))
    }
}

impl LocaleResolver for FixedLocale {
    fn locale(&self) -> Option<String> {
        self.0.clone()
    }
}

/// `en_US.UTF-8` and `en_US@euro` become `en-US`; `C` and `POSIX` carry no
/// language.
pub fn parse_posix_locale(value: &str) -> Option<String> {
    let tag = value
        .split(['.', '@'])
        .next()
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "C" && *tag != "POSIX")?;

    Some(tag.replace('_', "-"))
}

/// What to return when no entry of a language priority list matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageFallback {
    /// Return nothing.
    #[default]
    None,
    /// Return the source-language streams, if any.
    Source,
    /// Return every stream.
    Any
}

/// One entry of a language priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguagePreference {
    /// The language the video was uploaded in.
    Source,
    /// The runtime locale, resolved through a [`LocaleResolver`].
    Local,
    /// Any language.
    All,
    /// A normalized language code (`en`, `pt-br`).
    Code(String)
}

impl LanguagePreference {
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        match entry.to_ascii_lowercase().as_str() {
            "source" => return Ok(LanguagePreference::Source),
            "local" => return Ok(LanguagePreference::Local),
            "all" => return Ok(LanguagePreference::All),
            _ => {}
        }

        if !is_language_code(entry) {
            return Err(Error::invalid_query(
                "languages",
                format!("\"{entry}\" is neither a language code nor one of source, local, all")
            ));
        }

        Ok(LanguagePreference::Code(normalize(entry)))
    }
}

/// Primary subtag of two or three letters, then up to eight alphanumerics
/// per subtag (`en`, `pt-BR`, `zh-Hans`, `en-orig`).
fn is_language_code(code: &str) -> bool {
    let mut subtags = code.split(['-', '_']);

    let primary_ok = subtags
        .next()
        .is_some_and(|primary| (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic()));

    primary_ok
        && subtags.all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

pub(crate) fn normalize(code: &str) -> String {
    code.trim().to_ascii_lowercase().replace('_', "-")
}

/// `en` matches `en`, `en-US` and `en-orig`; `en-US` only matches `en-US`.
pub(crate) fn matches(target: &str, stream_language: &str) -> bool {
    let stream_language = normalize(stream_language);
    if stream_language == target {
        return true;
    }

    !target.contains('-') && stream_language.split('-').next() == Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_posix_locale() {
        assert_eq!(parse_posix_locale("en_US.UTF-8"), Some("en-US".to_string()));
        assert_eq!(parse_posix_locale("de_DE@euro"), Some("de-DE".to_string()));
        assert_eq!(parse_posix_locale("pt"), Some("pt".to_string()));
        assert_eq!(parse_posix_locale("C.UTF-8"), None);
        assert_eq!(parse_posix_locale("POSIX"), None);
        assert_eq!(parse_posix_locale(""), None);
    }

    #[test]
    fn test_parse_preferences() {
        assert_eq!(LanguagePreference::parse("Source").unwrap(), LanguagePreference::Source);
        assert_eq!(LanguagePreference::parse("local").unwrap(), LanguagePreference::Local);
        assert_eq!(LanguagePreference::parse("ALL").unwrap(), LanguagePreference::All);
        assert_eq!(
            LanguagePreference::parse("pt_BR").unwrap(),
            LanguagePreference::Code("pt-br".to_string())
        );
        assert_eq!(
            LanguagePreference::parse("zh-Hans").unwrap(),
            LanguagePreference::Code("zh-hans".to_string())
        );
    }

    #[test]
    fn test_invalid_preferences_name_parameter() {
        for bad in ["", "best", "e", "en-", "en us", "12"] {
            match LanguagePreference::parse(bad) {
                Err(Error::InvalidQuery { parameter, .. }) => assert_eq!(parameter, "languages"),
                other => panic!("expected InvalidQuery for {bad:?}, got {other:?}")
            }
        }
    }

    #[test]
    fn test_matches() {
        assert!(matches("en", "en"));
        assert!(matches("en", "en-US"));
        assert!(matches("en", "en-orig"));
        assert!(matches("en-us", "en_US"));
        assert!(!matches("en-us", "en-GB"));
        assert!(!matches("en-us", "en"));
        assert!(!matches("es", "en"));
    }

    #[test]
    fn test_fixed_locale() {
        assert_eq!(FixedLocale::new("pt-BR").locale(), Some("pt-BR".to_string()));
        assert_eq!(FixedLocale(None).locale(), None);
    }
}
