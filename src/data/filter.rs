use std::collections::BTreeMap;
use std::fmt;

use super::model::{LaunchRecord, LaunchTable, PayloadBounds};

// ---------------------------------------------------------------------------
// Filter predicates: launch site and payload range
// ---------------------------------------------------------------------------

/// Site selector value. `All` disables the site predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub const ALL_LABEL: &'static str = "All Sites";

    /// Whether a record passes the site predicate.
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }

    /// Chart title shared by both charts.
    pub fn chart_title(&self) -> String {
        match self {
            SiteSelection::All => "Total launches for all sites".to_string(),
            SiteSelection::Site(site) => format!("Total launches for {site}"),
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(Self::ALL_LABEL),
            SiteSelection::Site(site) => f.write_str(site),
        }
    }
}

/// Payload mass window in kg.
///
/// Both bounds are exclusive: a launch passes when `low < payload < high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        if low <= high {
            PayloadRange { low, high }
        } else {
            PayloadRange {
                low: high,
                high: low,
            }
        }
    }

    pub fn contains(&self, payload: f64) -> bool {
        self.low < payload && payload < self.high
    }
}

impl From<PayloadBounds> for PayloadRange {
    fn from(bounds: PayloadBounds) -> Self {
        PayloadRange::new(bounds.min, bounds.max)
    }
}

// ---------------------------------------------------------------------------
// Chart inputs
// ---------------------------------------------------------------------------

/// One slice of the distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

/// Input for the distribution (pie) chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PieChart {
    pub title: String,
    /// Ordered by label; groups without rows are absent.
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

/// Points of one booster version category: `[payload_mass, class]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<[f64; 2]>,
}

/// Input for the correlation (scatter) chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScatterChart {
    pub title: String,
    /// One series per booster version category, ordered by category.
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Filter functions
// ---------------------------------------------------------------------------

/// Distribution chart for the selected site.
///
/// * `All` → successful launches grouped by launch site.
/// * A single site → that site's launches grouped by landing outcome label.
pub fn pie_chart(table: &LaunchTable, site: &SiteSelection) -> PieChart {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();

    for rec in table.records() {
        let key = match site {
            SiteSelection::All if rec.outcome.is_success() => rec.launch_site.as_str(),
            SiteSelection::All => continue,
            SiteSelection::Site(_) if site.matches(rec) => rec.outcome.label(),
            SiteSelection::Site(_) => continue,
        };
        *groups.entry(key).or_default() += 1;
    }

    PieChart {
        title: site.chart_title(),
        slices: groups
            .into_iter()
            .map(|(label, count)| PieSlice {
                label: label.to_string(),
                count,
            })
            .collect(),
    }
}

/// Return indices of launches passing both the site and the payload predicate.
pub fn filtered_indices(
    table: &LaunchTable,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| site.matches(rec) && range.contains(rec.payload_mass))
        .map(|(i, _)| i)
        .collect()
}

/// Correlation chart: payload mass against outcome class, coloured by
/// booster version category.
pub fn scatter_chart(
    table: &LaunchTable,
    site: &SiteSelection,
    range: &PayloadRange,
) -> ScatterChart {
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();

    for idx in filtered_indices(table, site, range) {
        let rec = &table.records()[idx];
        groups
            .entry(rec.booster_category.as_str())
            .or_default()
            .push([rec.payload_mass, f64::from(rec.outcome.class())]);
    }

    ScatterChart {
        title: site.chart_title(),
        series: groups
            .into_iter()
            .map(|(category, points)| ScatterSeries {
                category: category.to_string(),
                points,
            })
            .collect(),
    }
}
