//! Entities a caller can load.

use std::fmt;
use std::str::FromStr;

/// A country, a locale within a country, or several of either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// Whole country (summed over its locales when reported per locale)
    Country(String),
    /// One locale of a country
    Locale {
        /// Locale name
        locale: String,
        /// Country name
        country: String,
    },
    /// Several entities, handled one by one
    Many(Vec<Entity>),
}

impl Entity {
    /// Whole-country entity.
    pub fn country(name: impl Into<String>) -> Self {
        Self::Country(name.into())
    }

    /// Single-locale entity.
    pub fn locale(locale: impl Into<String>, country: impl Into<String>) -> Self {
        Self::Locale {
            locale: locale.into(),
            country: country.into(),
        }
    }

    /// Display key: `country` or `locale, country`, normalized.
    ///
    /// `None` for [`Entity::Many`], which has no key of its own.
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Country(country) => Some(normalize(country)),
            Self::Locale { locale, country } => {
                Some(format!("{}, {}", normalize(locale), normalize(country)))
            }
            Self::Many(_) => None,
        }
    }

    /// Country and optional locale to resolve, `None` for [`Entity::Many`].
    pub fn target(&self) -> Option<(&str, Option<&str>)> {
        match self {
            Self::Country(country) => Some((country.as_str(), None)),
            Self::Locale { locale, country } => Some((country.as_str(), Some(locale.as_str()))),
            Self::Many(_) => None,
        }
    }
}

fn normalize(name: &str) -> String {
    epicurve_data::locale::normalize(name)
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Many(entities) => {
                let keys: Vec<String> = entities.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", keys.join("; "))
            }
            single => f.write_str(&single.key().unwrap_or_default()),
        }
    }
}

impl From<&str> for Entity {
    fn from(country: &str) -> Self {
        Self::country(country)
    }
}

impl From<(&str, &str)> for Entity {
    /// `(locale, country)` pair.
    fn from((locale, country): (&str, &str)) -> Self {
        Self::locale(locale, country)
    }
}

impl<E: Into<Self>> From<Vec<E>> for Entity {
    fn from(entities: Vec<E>) -> Self {
        Self::Many(entities.into_iter().map(Into::into).collect())
    }
}

impl FromStr for Entity {
    type Err = std::convert::Infallible;

    /// `country` or `country:locale`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once(':') {
            Some((country, locale)) if !locale.trim().is_empty() => {
                Self::locale(locale.trim(), country.trim())
            }
            Some((country, _)) => Self::country(country.trim()),
            None => Self::country(s.trim()),
        })
    }
}
