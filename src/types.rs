use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tabled::Tabled;

/// Columns the loader requires in the CSV header.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Region",
    "SubRegion",
    "Year",
    "Production",
    "TotalDemand",
    "SupplyGap",
];

/// Label used by every filter control for "no constraint".
pub const ALL_LABEL: &str = "All";

/// One CSV row exactly as read. Every field stays textual until coercion.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "SubRegion")]
    pub sub_region: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Production")]
    pub production: Option<String>,
    #[serde(rename = "TotalDemand")]
    pub total_demand: Option<String>,
    #[serde(rename = "SupplyGap")]
    pub supply_gap: Option<String>,
}

/// A coerced dataset row. Numeric fields are `None` when the source text
/// could not be read as a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub region: String,
    pub sub_region: String,
    pub year: Option<i32>,
    pub production: Option<f64>,
    pub total_demand: Option<f64>,
    pub supply_gap: Option<f64>,
}

impl Record {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Production => self.production,
            Metric::TotalDemand => self.total_demand,
            Metric::SupplyGap => self.supply_gap,
        }
    }
}

/// Immutable, shareable dataset.
pub type Dataset = Arc<[Record]>;

/// The per-row numeric columns that can be aggregated by year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Production,
    TotalDemand,
    SupplyGap,
}

impl Metric {
    /// Human-readable series name.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Production => "Production",
            Metric::TotalDemand => "Total Demand",
            Metric::SupplyGap => "Supply Gap",
        }
    }
}

/// A single filter constraint: either unconstrained or pinned to a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL_LABEL),
            Choice::Only(v) => write!(f, "{}", v),
        }
    }
}

impl<T: Serialize> Serialize for Choice<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Choice::All => serializer.serialize_str(ALL_LABEL),
            Choice::Only(v) => v.serialize(serializer),
        }
    }
}

/// Year constraint. A selection that is not a number is kept as
/// `Unparseable` so it can be displayed, and matches no row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearChoice {
    #[default]
    All,
    Only(i32),
    Unparseable(String),
}

impl YearChoice {
    pub fn admits(&self, year: Option<i32>) -> bool {
        match self {
            YearChoice::All => true,
            YearChoice::Only(y) => year == Some(*y),
            YearChoice::Unparseable(_) => false,
        }
    }
}

impl fmt::Display for YearChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearChoice::All => f.write_str(ALL_LABEL),
            YearChoice::Only(y) => write!(f, "{}", y),
            YearChoice::Unparseable(s) => f.write_str(s),
        }
    }
}

impl Serialize for YearChoice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearChoice::All => serializer.serialize_str(ALL_LABEL),
            YearChoice::Only(y) => serializer.serialize_i32(*y),
            YearChoice::Unparseable(s) => serializer.serialize_str(s),
        }
    }
}

/// The three independent filter constraints, all `All` by default.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterSelection {
    pub region: Choice<String>,
    pub sub_region: Choice<String>,
    pub year: YearChoice,
}

impl FilterSelection {
    pub fn matches(&self, record: &Record) -> bool {
        self.region.admits(&record.region)
            && self.sub_region.admits(&record.sub_region)
            && self.year.admits(record.year)
    }
}

/// A single user edit to the filter selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Region(String),
    SubRegion(String),
    Year(String),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// Year-keyed sums of one metric, strictly ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSeries {
    pub metric: Metric,
    pub points: Vec<YearPoint>,
}

impl YearSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|i| self.points[i].value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_production: f64,
    pub total_demand: f64,
    pub balance: f64,
    pub self_sufficiency_ratio: Option<f64>,
}

/// Distinct values offered by the filter controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub sub_regions: Vec<String>,
    pub years: Vec<i32>,
}

/// Everything a renderer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub matched_rows: usize,
    pub summary: SummaryStats,
    pub production: YearSeries,
    pub total_demand: YearSeries,
    pub supply_gap: YearSeries,
}

/// One row of the per-year CSV export.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesExportRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Production")]
    #[tabled(rename = "Production")]
    pub production: String,
    #[serde(rename = "TotalDemand")]
    #[tabled(rename = "TotalDemand")]
    pub total_demand: String,
    #[serde(rename = "SupplyGap")]
    #[tabled(rename = "SupplyGap")]
    pub supply_gap: String,
}

/// JSON export of the current view.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub generated_at: String,
    pub selection: &'a FilterSelection,
    #[serde(flatten)]
    pub view: &'a DashboardView,
}
