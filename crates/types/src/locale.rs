use std::fmt;
use std::str::FromStr;

use crate::error::PropertyError;

/// A language tag with an optional country, e.g. `en` or `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    pub language: String,
    pub country: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>, country: Option<&str>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            country: country.map(|c| c.to_uppercase()),
        }
    }

    /// Bundle name suffixes from least to most specific: `_en`, `_en_US`.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = vec![format!("_{}", self.language)];
        if let Some(country) = &self.country {
            out.push(format!("_{}_{}", self.language, country));
        }
        out
    }
}

impl FromStr for Locale {
    type Err = PropertyError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let mut parts = tag.trim().split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PropertyError::mismatch("locale", "language tag", tag));
        }
        let country = parts.next().filter(|c| !c.is_empty());
        if parts.next().is_some() {
            return Err(PropertyError::mismatch("locale", "language tag", tag));
        }
        Ok(Locale::new(language, country))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => write!(f, "{}", self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let locale: Locale = "EN".parse().unwrap();
        assert_eq!(locale.language, "en");
        assert_eq!(locale.country, None);
        assert_eq!(locale.candidates(), vec!["_en".to_string()]);
    }

    #[test]
    fn test_parse_with_country() {
        for tag in ["en_US", "en-us"] {
            let locale: Locale = tag.parse().unwrap();
            assert_eq!(locale.to_string(), "en_US");
            assert_eq!(locale.candidates(), vec!["_en".to_string(), "_en_US".to_string()]);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Locale>().is_err());
        assert!("e1".parse::<Locale>().is_err());
        assert!("en_US_x_y".parse::<Locale>().is_err());
    }
}
