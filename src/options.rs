//! Selectable choices derived from the reference dataset.
//!
//! The district list is a pure function of the chosen location, so a form
//! recomputes it by calling [`OptionResolver::districts_for`] on every
//! location change.

use crate::data::ReferenceDataset;
use std::collections::{HashMap, HashSet};

/// Location list and location -> districts mapping, both in first-seen order.
///
/// # Examples
///
/// ```
/// use crimerisk::data::{LocationRow, ReferenceDataset};
/// use crimerisk::options::OptionResolver;
///
/// let ds = ReferenceDataset::from_rows(vec![
///     LocationRow::new("Tamil Nadu", "Chennai"),
///     LocationRow::new("Tamil Nadu", "Madurai"),
///     LocationRow::new("Kerala", "Kochi"),
/// ]);
/// let options = OptionResolver::from_dataset(&ds);
/// assert_eq!(options.locations(), &["Tamil Nadu", "Kerala"]);
/// assert_eq!(options.districts_for("Tamil Nadu"), &["Chennai", "Madurai"]);
/// assert!(options.districts_for("Goa").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionResolver {
    locations: Vec<String>,
    districts: Vec<Vec<String>>,
    by_location: HashMap<String, usize>,
}

impl OptionResolver {
    /// Groups the dataset rows by `STATE/UT`.
    #[must_use]
    pub fn from_dataset(dataset: &ReferenceDataset) -> Self {
        let mut resolver = Self::default();
        let mut seen: HashSet<(usize, &str)> = HashSet::new();

        for row in dataset.rows() {
            let slot = match resolver.by_location.get(&row.state) {
                Some(&slot) => slot,
                None => {
                    let slot = resolver.locations.len();
                    resolver.by_location.insert(row.state.clone(), slot);
                    resolver.locations.push(row.state.clone());
                    resolver.districts.push(Vec::new());
                    slot
                }
            };
            if seen.insert((slot, row.district.as_str())) {
                resolver.districts[slot].push(row.district.clone());
            }
        }

        resolver
    }

    /// Distinct locations in first-seen order.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Distinct districts of `location` in first-seen order; empty if unknown.
    #[must_use]
    pub fn districts_for(&self, location: &str) -> &[String] {
        self.by_location
            .get(location)
            .map(|&slot| self.districts[slot].as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `district` is offered for `location`.
    #[must_use]
    pub fn contains(&self, location: &str, district: &str) -> bool {
        self.districts_for(location).iter().any(|d| d == district)
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn n_locations(&self) -> usize {
        self.locations.len()
    }

    /// Iterates `(location, districts)` pairs in location order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.locations
            .iter()
            .zip(&self.districts)
            .map(|(location, districts)| (location.as_str(), districts.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LocationRow;
    use proptest::prelude::*;

    fn scenario_dataset() -> ReferenceDataset {
        ReferenceDataset::from_rows(vec![
            LocationRow::new("Tamil Nadu", "Chennai"),
            LocationRow::new("Tamil Nadu", "Madurai"),
            LocationRow::new("Kerala", "Kochi"),
        ])
    }

    #[test]
    fn test_locations_first_seen_order() {
        let options = OptionResolver::from_dataset(&scenario_dataset());
        assert_eq!(options.locations(), &["Tamil Nadu", "Kerala"]);
        assert_eq!(options.n_locations(), 2);
    }

    #[test]
    fn test_districts_for_location() {
        let options = OptionResolver::from_dataset(&scenario_dataset());
        assert_eq!(options.districts_for("Tamil Nadu"), &["Chennai", "Madurai"]);
        assert_eq!(options.districts_for("Kerala"), &["Kochi"]);
    }

    #[test]
    fn test_districts_for_unknown_is_empty() {
        let options = OptionResolver::from_dataset(&scenario_dataset());
        assert!(options.districts_for("Unknown State").is_empty());
        assert!(options.districts_for("").is_empty());
    }

    #[test]
    fn test_repeated_rows_are_deduplicated() {
        let ds = ReferenceDataset::from_rows(vec![
            LocationRow::new("Goa", "North Goa"),
            LocationRow::new("Goa", "South Goa"),
            LocationRow::new("Goa", "North Goa"),
        ]);
        let options = OptionResolver::from_dataset(&ds);
        assert_eq!(options.districts_for("Goa"), &["North Goa", "South Goa"]);
    }

    #[test]
    fn test_same_district_name_in_two_states() {
        let ds = ReferenceDataset::from_rows(vec![
            LocationRow::new("Bihar", "Aurangabad"),
            LocationRow::new("Maharashtra", "Aurangabad"),
        ]);
        let options = OptionResolver::from_dataset(&ds);
        assert_eq!(options.districts_for("Bihar"), &["Aurangabad"]);
        assert_eq!(options.districts_for("Maharashtra"), &["Aurangabad"]);
    }

    #[test]
    fn test_contains() {
        let options = OptionResolver::from_dataset(&scenario_dataset());
        assert!(options.contains("Kerala", "Kochi"));
        assert!(!options.contains("Kerala", "Chennai"));
        assert!(!options.contains("Goa", "Kochi"));
    }

    #[test]
    fn test_empty_dataset() {
        let options = OptionResolver::from_dataset(&ReferenceDataset::default());
        assert!(options.locations().is_empty());
        assert_eq!(options.iter().count(), 0);
    }

    #[test]
    fn test_iter_pairs() {
        let options = OptionResolver::from_dataset(&scenario_dataset());
        let pairs: Vec<(&str, usize)> = options.iter().map(|(l, d)| (l, d.len())).collect();
        assert_eq!(pairs, vec![("Tamil Nadu", 2), ("Kerala", 1)]);
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..5, 0u8..8), 0..60)
    }

    fn dataset_of(rows: &[(u8, u8)]) -> ReferenceDataset {
        ReferenceDataset::from_rows(
            rows.iter()
                .map(|(s, d)| LocationRow::new(format!("S{s}"), format!("D{d}")))
                .collect(),
        )
    }

    proptest! {
        #[test]
        fn prop_districts_match_grouped_rows(rows in rows_strategy(), probe in 0u8..6) {
            let ds = dataset_of(&rows);
            let options = OptionResolver::from_dataset(&ds);
            let location = format!("S{probe}");

            let mut expected: Vec<String> = Vec::new();
            for row in ds.rows().iter().filter(|r| r.state == location) {
                if !expected.contains(&row.district) {
                    expected.push(row.district.clone());
                }
            }

            prop_assert_eq!(options.districts_for(&location), expected.as_slice());
        }

        #[test]
        fn prop_districts_have_no_duplicates(rows in rows_strategy()) {
            let options = OptionResolver::from_dataset(&dataset_of(&rows));
            for (_, districts) in options.iter() {
                let unique: HashSet<&String> = districts.iter().collect();
                prop_assert_eq!(unique.len(), districts.len());
            }
        }

        #[test]
        fn prop_every_location_has_a_district(rows in rows_strategy()) {
            let options = OptionResolver::from_dataset(&dataset_of(&rows));
            for location in options.locations() {
                prop_assert!(!options.districts_for(location).is_empty());
            }
        }
    }
}
