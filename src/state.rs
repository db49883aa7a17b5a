//! Application state: the loaded dataset plus the one filter selection.
//!
//! The dataset never changes after load. The selection is only mutated
//! through [`DashboardState::apply`], which always hands back a freshly
//! recomputed view.

use crate::aggregator::{compute_view, distinct_values};
use crate::types::{
    Choice, Dataset, DashboardView, FilterChange, FilterOptions, FilterSelection, Record,
    YearChoice, ALL_LABEL,
};
use crate::util::parse_year_safe;
use std::sync::Arc;
use tracing::debug;

pub struct DashboardState {
    data: Dataset,
    options: FilterOptions,
    selection: FilterSelection,
}

impl DashboardState {
    pub fn new(data: Dataset) -> Self {
        let options = distinct_values(&data);
        Self {
            data,
            options,
            selection: FilterSelection::default(),
        }
    }

    /// State with no rows, used when the source could not be loaded.
    pub fn empty() -> Self {
        Self::new(Arc::from(Vec::<Record>::new()))
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn is_loaded(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn view(&self) -> DashboardView {
        compute_view(&self.data, &self.selection)
    }

    /// Apply one filter edit and recompute.
    pub fn apply(&mut self, change: FilterChange) -> DashboardView {
        match change {
            FilterChange::Region(v) => self.selection.region = parse_choice(&v),
            FilterChange::SubRegion(v) => self.selection.sub_region = parse_choice(&v),
            FilterChange::Year(v) => self.selection.year = parse_year_choice(&v),
            FilterChange::Reset => self.selection = FilterSelection::default(),
        }
        debug!(selection = ?self.selection, "filter changed");
        self.view()
    }

    pub fn reset(&mut self) -> DashboardView {
        self.apply(FilterChange::Reset)
    }
}

fn parse_choice(value: &str) -> Choice<String> {
    let value = value.trim();
    if value == ALL_LABEL {
        Choice::All
    } else {
        Choice::Only(value.to_string())
    }
}

fn parse_year_choice(value: &str) -> YearChoice {
    let value = value.trim();
    if value == ALL_LABEL {
        return YearChoice::All;
    }
    match parse_year_safe(Some(value)) {
        Some(y) => YearChoice::Only(y),
        None => YearChoice::Unparseable(value.to_string()),
    }
}
