use crate::errors::SizingError;
use anyhow::{bail, Context};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use std::io::Read;

/// This module contains the reference table of peak sun hours by location.

/// Reference table mapping a city/region/country key to the equivalent
/// hours per day of full-intensity sunlight there.
///
/// Irradiance is load-bearing for system size, so lookups fail loudly: an
/// unmatched or ambiguous location is reported back to the caller instead
/// of falling back to a generic value that would misrepresent the quoted
/// system.
#[derive(Clone, Debug, Default)]
pub struct PeakSunHoursTable {
    entries: IndexMap<String, f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct PeakSunHoursRow {
    location: String,
    peak_sun_hours: f64,
}

impl PeakSunHoursTable {
    /// Read the table from CSV with `location` and `peak_sun_hours` columns.
    pub fn new(csv: impl Read) -> anyhow::Result<Self> {
        let rows = csv::Reader::from_reader(csv)
            .deserialize::<PeakSunHoursRow>()
            .collect::<Result<Vec<_>, _>>()
            .context("Reading the peak sun hours table failed")?;
        Self::from_entries(rows.into_iter().map(|row| (row.location, row.peak_sun_hours)))
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, f64)>,
    ) -> anyhow::Result<Self> {
        let mut table: IndexMap<String, f64> = Default::default();
        for (location, peak_sun_hours) in entries {
            let key = normalize_key(&location);
            if key.is_empty() {
                bail!("A peak sun hours entry has an empty location key");
            }
            if peak_sun_hours <= 0. {
                bail!("Peak sun hours for {location} must be positive (got {peak_sun_hours})");
            }
            table.insert(key, peak_sun_hours);
        }
        Ok(Self { entries: table })
    }

    /// Resolve a free-text location to its peak sun hours.
    ///
    /// Matching is case-insensitive on the trimmed string: an exact key
    /// match is preferred, then substring containment in either direction
    /// (so "Accra" finds "Accra, Ghana" and vice versa), with the longest
    /// matching key winning. A length tie between entries that disagree on
    /// the value is treated as unresolvable rather than guessed at.
    pub fn resolve(&self, location: &str) -> Result<f64, SizingError> {
        let query = normalize_key(location);
        if query.is_empty() {
            return Err(SizingError::LocationNotFound(location.to_owned()));
        }
        if let Some(peak_sun_hours) = self.entries.get(&query) {
            return Ok(*peak_sun_hours);
        }

        let candidates = self
            .entries
            .iter()
            .filter(|(key, _)| key.contains(&query) || query.contains(key.as_str()))
            .max_set_by_key(|(key, _)| key.len());
        match candidates.as_slice() {
            [] => Err(SizingError::LocationNotFound(location.to_owned())),
            [(_, peak_sun_hours)] => Ok(**peak_sun_hours),
            [(_, first), rest @ ..] => {
                if rest.iter().all(|(_, other)| is_close!(**other, **first)) {
                    Ok(**first)
                } else {
                    Err(SizingError::LocationNotFound(location.to_owned()))
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(location: &str) -> String {
    location.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn table() -> PeakSunHoursTable {
        PeakSunHoursTable::from_entries([
            ("Accra, Ghana".to_owned(), 5.5),
            ("Kumasi".to_owned(), 5.1),
            ("Tema".to_owned(), 5.3),
            ("Tema Industrial Area".to_owned(), 5.6),
            ("Takoradi East".to_owned(), 5.),
            ("Takoradi West".to_owned(), 5.4),
            ("Lagos East".to_owned(), 5.2),
            ("Lagos West".to_owned(), 5.2),
        ])
        .unwrap()
    }

    #[rstest]
    fn should_resolve_exact_match_ignoring_case_and_whitespace(table: PeakSunHoursTable) {
        assert_eq!(table.resolve("Kumasi").unwrap(), 5.1);
        assert_eq!(table.resolve("  kumasi  ").unwrap(), 5.1);
        assert_eq!(table.resolve("ACCRA, GHANA").unwrap(), 5.5);
    }

    #[rstest]
    fn should_resolve_query_contained_in_key(table: PeakSunHoursTable) {
        assert_eq!(table.resolve("Accra").unwrap(), 5.5);
    }

    #[rstest]
    fn should_resolve_key_contained_in_query(table: PeakSunHoursTable) {
        assert_eq!(table.resolve("Kumasi, Ghana").unwrap(), 5.1);
    }

    #[rstest]
    fn should_prefer_the_longest_matching_key(table: PeakSunHoursTable) {
        // "Tema Industrial" matches both "tema" and "tema industrial area"
        assert_eq!(table.resolve("Tema Industrial").unwrap(), 5.6);
    }

    #[rstest]
    fn ambiguous_match_with_disagreeing_values_should_fail(table: PeakSunHoursTable) {
        // "Takoradi" matches east and west, which disagree
        assert_eq!(
            table.resolve("Takoradi"),
            Err(SizingError::LocationNotFound("Takoradi".to_owned()))
        );
    }

    #[rstest]
    fn ambiguous_match_with_agreeing_values_should_resolve(table: PeakSunHoursTable) {
        assert_eq!(table.resolve("Lagos").unwrap(), 5.2);
    }

    #[rstest]
    fn unknown_location_should_never_default(table: PeakSunHoursTable) {
        assert_eq!(
            table.resolve("Nowhereville"),
            Err(SizingError::LocationNotFound("Nowhereville".to_owned()))
        );
    }

    #[rstest]
    fn empty_location_should_fail(table: PeakSunHoursTable) {
        assert!(table.resolve("").is_err());
        assert!(table.resolve("   ").is_err());
    }

    #[rstest]
    fn should_read_table_from_csv() {
        let csv = "location,peak_sun_hours\nAccra,5.5\nKumasi,5.1\n";
        let table = PeakSunHoursTable::new(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("accra").unwrap(), 5.5);
    }

    #[rstest]
    fn non_positive_peak_sun_hours_should_be_rejected() {
        let csv = "location,peak_sun_hours\nAccra,0\n";
        assert!(PeakSunHoursTable::new(csv.as_bytes()).is_err());
    }
}
