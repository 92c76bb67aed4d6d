use std::path::PathBuf;

use crate::color::ColorMap;
use crate::config::SliderConfig;
use crate::data::filter::{
    filtered_indices, pie_chart, scatter_chart, PayloadRange, PieChart, ScatterChart,
    SiteSelection,
};
use crate::data::model::{LaunchTable, Outcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file loads successfully).
    pub table: Option<LaunchTable>,

    /// File the table was read from.
    pub source: Option<PathBuf>,

    /// Site selector value.
    pub site: SiteSelection,

    /// Payload range selector value.
    pub payload: PayloadRange,

    /// Bounds and step of the payload range selector.
    pub slider: SliderConfig,

    /// Distribution chart input for the current selection (cached).
    pub pie: PieChart,

    /// Correlation chart input for the current selection (cached).
    pub scatter: ScatterChart,

    /// Indices of launches shown in the correlation chart (cached).
    pub visible_indices: Vec<usize>,

    pub site_colors: ColorMap,
    pub outcome_colors: ColorMap,
    pub booster_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the records table under the charts is expanded.
    pub show_records: bool,
}

impl AppState {
    pub fn new(slider: SliderConfig) -> Self {
        Self {
            table: None,
            source: None,
            site: SiteSelection::All,
            payload: PayloadRange::new(slider.min, slider.max),
            slider,
            pie: PieChart::default(),
            scatter: ScatterChart::default(),
            visible_indices: Vec::new(),
            site_colors: ColorMap::default(),
            outcome_colors: ColorMap::new([Outcome::FAILURE_LABEL, Outcome::SUCCESS_LABEL]),
            booster_colors: ColorMap::default(),
            status_message: None,
            show_records: false,
        }
    }

    /// Ingest a newly loaded table, reset the controls and colours.
    pub fn set_table(&mut self, table: LaunchTable, source: Option<PathBuf>) {
        self.site = SiteSelection::All;
        self.payload = match table.payload_bounds() {
            Some(bounds) => self.clamp_range(bounds.into()),
            None => PayloadRange::new(self.slider.min, self.slider.max),
        };
        self.site_colors = ColorMap::new(table.sites().iter().cloned());
        self.booster_colors = ColorMap::new(table.booster_categories().iter().cloned());

        self.table = Some(table);
        self.source = source;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute both charts after a control change.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.pie = pie_chart(table, &self.site);
        self.visible_indices = filtered_indices(table, &self.site, &self.payload);
        self.scatter = scatter_chart(table, &self.site, &self.payload);
        log::debug!(
            "site={} payload=({}, {}) -> {} pie rows, {} scatter points",
            self.site,
            self.payload.low,
            self.payload.high,
            self.pie.total(),
            self.scatter.point_count()
        );
    }

    /// Change the site selector value.
    pub fn select_site(&mut self, site: SiteSelection) {
        if self.site != site {
            self.site = site;
            self.refresh();
        }
    }

    /// Change the payload range selector value; clamped to the slider bounds.
    pub fn set_payload_range(&mut self, low: f64, high: f64) {
        let range = self.clamp_range(PayloadRange::new(low, high));
        if self.payload != range {
            self.payload = range;
            self.refresh();
        }
    }

    fn clamp_range(&self, range: PayloadRange) -> PayloadRange {
        let clamp = |v: f64| v.clamp(self.slider.min, self.slider.max);
        PayloadRange::new(clamp(range.low), clamp(range.high))
    }

    /// Options of the site selector: "All Sites" followed by every site in the table.
    pub fn site_options(&self) -> Vec<SiteSelection> {
        let sites = self.table.iter().flat_map(|t| t.sites().iter().cloned());
        std::iter::once(SiteSelection::All)
            .chain(sites.map(SiteSelection::Site))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    fn loaded() -> AppState {
        let mut state = AppState::new(SliderConfig::default());
        state.set_table(sample_table(), None);
        state
    }

    #[test]
    fn set_table_initialises_controls() {
        let state = loaded();
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload, PayloadRange::new(0.0, 9600.0));
        assert_eq!(state.pie.total(), 5);
        assert_eq!(state.visible_indices.len(), 8);
        assert_eq!(state.site_colors.len(), 4);
        assert_eq!(state.booster_colors.len(), 5);
    }

    #[test]
    fn selecting_site_refreshes_both_charts() {
        let mut state = loaded();
        state.select_site(SiteSelection::Site("KSC LC-39A".into()));
        assert_eq!(state.pie.title, "Total launches for KSC LC-39A");
        assert_eq!(state.pie.total(), 3);
        assert_eq!(state.scatter.title, "Total launches for KSC LC-39A");
        assert_eq!(state.visible_indices, vec![5, 6, 7]);
    }

    #[test]
    fn payload_range_is_clamped_and_ordered() {
        let mut state = loaded();
        state.set_payload_range(20_000.0, 3000.0);
        assert_eq!(state.payload, PayloadRange::new(3000.0, 10_000.0));
        assert!(state
            .visible_indices
            .iter()
            .all(|&i| state.table.as_ref().unwrap().records()[i].payload_mass > 3000.0));
    }

    #[test]
    fn site_options_start_with_all() {
        let state = loaded();
        let options = state.site_options();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0], SiteSelection::All);
        assert_eq!(options[1], SiteSelection::Site("CCAFS LC-40".into()));

        let empty = AppState::new(SliderConfig::default());
        assert_eq!(empty.site_options(), vec![SiteSelection::All]);
    }

    #[test]
    fn new_table_resets_to_all_sites_and_full_bounds() {
        let mut state = loaded();
        state.select_site(SiteSelection::Site("VAFB SLC-4E".into()));
        state.set_payload_range(1000.0, 2000.0);

        state.set_table(sample_table(), None);
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload, PayloadRange::new(0.0, 9600.0));
        assert_eq!(state.pie.title, "Total launches for all sites");
    }
}
