pub mod aggregator;
pub mod chart;
pub mod cli;
pub mod display;
pub mod error;
pub mod loader;
pub mod output;
pub mod state;
pub mod types;
pub mod util;

pub use aggregator::{compute_view, distinct_values, filter_rows, summarize, year_series};
pub use chart::{ChartRenderer, ChartSpec, TextChartRenderer};
pub use error::{ExportError, LoadError};
pub use loader::{load_dataset, read_dataset, LoadReport};
pub use state::DashboardState;
pub use types::{
    Choice, DashboardView, Dataset, FilterChange, FilterOptions, FilterSelection, Metric, Record,
    SummaryStats, YearChoice, YearPoint, YearSeries,
};
