//! Country / locale to row mapping.
//!
//! Feeds report some countries as a single row and others as one row per
//! region (state, province, overseas territory). The index records which
//! shape each country has so that a whole-country request can be answered
//! either with one row or with the set of regional rows to be summed.

use crate::error::{DataError, Result};
use std::collections::BTreeMap;
use tracing::warn;

/// Locale key that holds a country-level row once regional rows appear.
pub const COUNTRY_LEVEL: &str = "";

/// Normalize a country or locale name for indexing and lookup.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// How a country is reported in a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleEntry {
    /// Country reported as one row with no sub-locale
    SingleRow(usize),
    /// Country reported per region, locale name to row
    MultiRow(BTreeMap<String, usize>),
}

impl LocaleEntry {
    /// Every row referenced by this entry, in locale order.
    pub fn rows(&self) -> Vec<usize> {
        match self {
            Self::SingleRow(row) => vec![*row],
            Self::MultiRow(locales) => locales.values().copied().collect(),
        }
    }

    /// Locale names reported for the country (empty for a single-row country).
    pub fn locales(&self) -> Vec<String> {
        match self {
            Self::SingleRow(_) => Vec::new(),
            Self::MultiRow(locales) => locales.keys().cloned().collect(),
        }
    }
}

/// Rows a lookup resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single row
    Row(usize),
    /// Whole-country aggregate; the rows must be summed elementwise
    Aggregate(Vec<usize>),
}

impl Resolution {
    /// Rows covered by the resolution.
    pub fn rows(&self) -> &[usize] {
        match self {
            Self::Row(row) => std::slice::from_ref(row),
            Self::Aggregate(rows) => rows,
        }
    }
}

/// Mapping from normalized country name to its [`LocaleEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleIndex {
    entries: BTreeMap<String, LocaleEntry>,
    row_count: usize,
}

impl LocaleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `row` for the given country and locale.
    ///
    /// A country first seen as a single row is promoted to a regional entry
    /// when a named locale arrives; its original row is kept under
    /// [`COUNTRY_LEVEL`].
    ///
    /// # Errors
    /// Returns [`DataError::DuplicateLocale`] when the (country, locale) pair
    /// already maps to another row.
    pub fn insert(&mut self, country: &str, locale: &str, row: usize) -> Result<()> {
        let country = normalize(country);
        let locale = normalize(locale);

        let duplicate = |existing: usize, locale: String| DataError::DuplicateLocale {
            country: country.clone(),
            locale,
            existing,
            duplicate: row,
        };

        match self.entries.get_mut(&country) {
            None => {
                let entry = if locale.is_empty() {
                    LocaleEntry::SingleRow(row)
                } else {
                    LocaleEntry::MultiRow(BTreeMap::from([(locale, row)]))
                };
                self.entries.insert(country.clone(), entry);
            }
            Some(LocaleEntry::SingleRow(existing)) => {
                let existing = *existing;
                if locale.is_empty() {
                    return Err(duplicate(existing, locale));
                }
                warn!(
                    country = %country,
                    locale = %locale,
                    "country-level row followed by regional rows; keeping it under the empty locale"
                );
                let locales =
                    BTreeMap::from([(COUNTRY_LEVEL.to_string(), existing), (locale, row)]);
                self.entries
                    .insert(country.clone(), LocaleEntry::MultiRow(locales));
            }
            Some(LocaleEntry::MultiRow(locales)) => {
                if let Some(&existing) = locales.get(&locale) {
                    if existing != row {
                        return Err(duplicate(existing, locale));
                    }
                } else {
                    locales.insert(locale, row);
                }
            }
        }

        self.row_count = self.row_count.max(row + 1);
        Ok(())
    }

    /// Resolve a country, optionally narrowed to one locale.
    ///
    /// # Errors
    /// - [`DataError::UnknownCountry`] listing every known country
    /// - [`DataError::UnknownLocale`] listing the locales of the country
    pub fn resolve(&self, country: &str, locale: Option<&str>) -> Result<Resolution> {
        let country = normalize(country);
        let entry = self
            .entries
            .get(&country)
            .ok_or_else(|| DataError::UnknownCountry {
                country: country.clone(),
                available: self.countries(),
            })?;

        match (entry, locale.map(normalize)) {
            (LocaleEntry::SingleRow(row), None) => Ok(Resolution::Row(*row)),
            (LocaleEntry::MultiRow(_), None) => Ok(Resolution::Aggregate(entry.rows())),
            (LocaleEntry::MultiRow(locales), Some(locale)) => locales
                .get(&locale)
                .map(|row| Resolution::Row(*row))
                .ok_or_else(|| DataError::UnknownLocale {
                    country,
                    locale,
                    available: entry.locales(),
                }),
            (LocaleEntry::SingleRow(_), Some(locale)) => Err(DataError::UnknownLocale {
                country,
                locale,
                available: Vec::new(),
            }),
        }
    }

    /// Entry for a country, if present.
    pub fn get(&self, country: &str) -> Option<&LocaleEntry> {
        self.entries.get(&normalize(country))
    }

    /// Every known country, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of rows covered by the index.
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of countries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
