use std::collections::BTreeSet;
use std::fmt;

use super::DataError;

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Landing outcome of a single launch, stored as `class` (0 / 1) in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub const FAILURE_LABEL: &'static str = "Failed Landing";
    pub const SUCCESS_LABEL: &'static str = "Successful Landing";

    /// Interpret a raw `class` value. Anything other than 0 or 1 is rejected.
    pub fn from_class(class: i64) -> Result<Self, DataError> {
        match class {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(DataError::InvalidClass(other)),
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    /// Human readable label used for the derived "Landing Outcome" column.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => Self::FAILURE_LABEL,
            Outcome::Success => Self::SUCCESS_LABEL,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub flight_number: i64,
    pub launch_site: String,
    pub outcome: Outcome,
    /// Payload mass in kg.
    pub payload_mass: f64,
    pub booster_version: String,
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// PayloadBounds
// ---------------------------------------------------------------------------

/// Minimum and maximum payload mass over the whole table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded table with indices computed once at load time.
/// Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    /// Sorted distinct launch sites.
    sites: BTreeSet<String>,
    /// Sorted distinct booster version categories.
    booster_categories: BTreeSet<String>,
    payload_bounds: Option<PayloadBounds>,
}

impl LaunchTable {
    /// Build column indices and payload bounds from loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<PayloadBounds> = None;

        for rec in &records {
            sites.insert(rec.launch_site.clone());
            booster_categories.insert(rec.booster_category.clone());

            let m = rec.payload_mass;
            payload_bounds = Some(match payload_bounds {
                Some(b) => PayloadBounds {
                    min: b.min.min(m),
                    max: b.max.max(m),
                },
                None => PayloadBounds { min: m, max: m },
            });
        }

        LaunchTable {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &BTreeSet<String> {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    /// `None` for an empty table.
    pub fn payload_bounds(&self) -> Option<PayloadBounds> {
        self.payload_bounds
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.contains(site)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(site: &str, class: i64, payload: f64, category: &str) -> LaunchRecord {
        LaunchRecord {
            flight_number: 0,
            launch_site: site.to_string(),
            outcome: Outcome::from_class(class).unwrap(),
            payload_mass: payload,
            booster_version: format!("F9 {category}"),
            booster_category: category.to_string(),
        }
    }

    /// Small table shaped like the real launch file.
    pub(crate) fn sample_table() -> LaunchTable {
        LaunchTable::from_records(vec![
            record("CCAFS LC-40", 0, 0.0, "v1.0"),
            record("CCAFS LC-40", 0, 525.0, "v1.0"),
            record("CCAFS LC-40", 1, 2296.0, "v1.1"),
            record("VAFB SLC-4E", 0, 500.0, "v1.1"),
            record("VAFB SLC-4E", 1, 9600.0, "FT"),
            record("KSC LC-39A", 1, 5300.0, "FT"),
            record("KSC LC-39A", 1, 3136.0, "B4"),
            record("KSC LC-39A", 0, 6460.0, "B4"),
            record("CCAFS SLC-40", 1, 4600.0, "B5"),
            record("CCAFS SLC-40", 0, 3681.0, "FT"),
        ])
    }

    #[test]
    fn outcome_from_class() {
        assert_eq!(Outcome::from_class(0).unwrap(), Outcome::Failure);
        assert_eq!(Outcome::from_class(1).unwrap(), Outcome::Success);
        assert!(matches!(
            Outcome::from_class(2),
            Err(DataError::InvalidClass(2))
        ));
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Failure.label(), "Failed Landing");
        assert_eq!(Outcome::Success.to_string(), "Successful Landing");
        assert_eq!(Outcome::Success.class(), 1);
    }

    #[test]
    fn table_indices_and_bounds() {
        let table = sample_table();
        assert_eq!(table.len(), 10);
        assert_eq!(
            table.sites().iter().map(String::as_str).collect::<Vec<_>>(),
            ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"]
        );
        assert_eq!(table.booster_categories().len(), 5);
        assert_eq!(
            table.payload_bounds(),
            Some(PayloadBounds {
                min: 0.0,
                max: 9600.0
            })
        );
        assert!(table.has_site("KSC LC-39A"));
        assert!(!table.has_site("Boca Chica"));
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = LaunchTable::from_records(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.payload_bounds(), None);
        assert!(table.sites().is_empty());
    }
}
