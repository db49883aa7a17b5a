use crate::error::ExportError;
use crate::types::{DashboardSnapshot, DashboardView, FilterSelection, SeriesExportRow};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

/// Merge the three series into one row per year. Cells are empty where a
/// series has no value for that year.
pub fn series_rows(view: &DashboardView) -> Vec<SeriesExportRow> {
    let years: BTreeSet<i32> = [&view.production, &view.total_demand, &view.supply_gap]
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year))
        .collect();
    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    years
        .into_iter()
        .map(|year| SeriesExportRow {
            year,
            production: cell(view.production.value_at(year)),
            total_demand: cell(view.total_demand.value_at(year)),
            supply_gap: cell(view.supply_gap.value_at(year)),
        })
        .collect()
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_series_csv(path: &Path, view: &DashboardView) -> Result<usize, ExportError> {
    let rows = series_rows(view);
    write_csv(path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "series exported");
    Ok(rows.len())
}

pub fn snapshot<'a>(
    selection: &'a FilterSelection,
    view: &'a DashboardView,
) -> DashboardSnapshot<'a> {
    DashboardSnapshot {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        selection,
        view,
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "snapshot exported");
    Ok(())
}

/// Markdown table of at most `max_rows` rows, or a placeholder.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}
