use crate::types::{
    DashboardView, FilterOptions, FilterSelection, Metric, Record, SummaryStats, YearPoint,
    YearSeries,
};
use std::collections::{BTreeMap, BTreeSet};

/// Rows that satisfy every non-`All` constraint, in dataset order.
pub fn filter_rows<'a>(data: &'a [Record], selection: &FilterSelection) -> Vec<&'a Record> {
    data.iter().filter(|r| selection.matches(r)).collect()
}

/// Totals over the filtered rows. Missing values count as zero here.
pub fn summarize(rows: &[&Record]) -> SummaryStats {
    let total_production: f64 = rows.iter().map(|r| r.production.unwrap_or(0.0)).sum();
    let total_demand: f64 = rows.iter().map(|r| r.total_demand.unwrap_or(0.0)).sum();
    let self_sufficiency_ratio = if total_demand != 0.0 {
        Some(total_production / total_demand)
    } else {
        None
    };
    SummaryStats {
        total_production,
        total_demand,
        balance: total_production - total_demand,
        self_sufficiency_ratio,
    }
}

/// Per-year sums of one metric. Rows without a year or without a value for
/// `metric` are left out of this series only.
pub fn year_series(rows: &[&Record], metric: Metric) -> YearSeries {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in rows {
        let (Some(year), Some(value)) = (r.year, r.metric(metric)) else {
            continue;
        };
        *by_year.entry(year).or_insert(0.0) += value;
    }
    YearSeries {
        metric,
        points: by_year
            .into_iter()
            .map(|(year, value)| YearPoint { year, value })
            .collect(),
    }
}

/// Distinct filter values over the whole, unfiltered dataset.
pub fn distinct_values(data: &[Record]) -> FilterOptions {
    let regions: BTreeSet<&str> = data.iter().map(|r| r.region.as_str()).collect();
    let sub_regions: BTreeSet<&str> = data.iter().map(|r| r.sub_region.as_str()).collect();
    let years: BTreeSet<i32> = data.iter().filter_map(|r| r.year).collect();
    FilterOptions {
        regions: regions.into_iter().map(String::from).collect(),
        sub_regions: sub_regions.into_iter().map(String::from).collect(),
        years: years.into_iter().collect(),
    }
}

/// Full recomputation for one selection.
pub fn compute_view(data: &[Record], selection: &FilterSelection) -> DashboardView {
    let rows = filter_rows(data, selection);
    DashboardView {
        matched_rows: rows.len(),
        summary: summarize(&rows),
        production: year_series(&rows, Metric::Production),
        total_demand: year_series(&rows, Metric::TotalDemand),
        supply_gap: year_series(&rows, Metric::SupplyGap),
    }
}
