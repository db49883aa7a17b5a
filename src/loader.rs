use crate::error::LoadError;
use crate::types::{Dataset, RawRow, Record, REQUIRED_COLUMNS};
use crate::util::{parse_metric_safe, parse_year_safe};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows the CSV reader could not decode at all; these are skipped.
    pub unreadable_rows: usize,
    pub missing_year: usize,
    /// Rows with at least one metric that is text rather than a number.
    /// Blank metric cells read as zero and are not counted here.
    pub non_numeric_rows: usize,
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport), LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading dataset");
    read_dataset(file)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<(Dataset, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().map_err(LoadError::Header)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut report = LoadReport::default();
    let mut records: Vec<Record> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                // Header is line 1, so data row `idx` is on line `idx + 2`.
                debug!(line = idx + 2, error = %e, "skipping unreadable row");
                report.unreadable_rows += 1;
                continue;
            }
        };

        let record = coerce(row);
        if record.year.is_none() {
            report.missing_year += 1;
        }
        if record.production.is_none()
            || record.total_demand.is_none()
            || record.supply_gap.is_none()
        {
            report.non_numeric_rows += 1;
        }
        records.push(record);
    }

    report.loaded_rows = records.len();
    info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        unreadable = report.unreadable_rows,
        missing_year = report.missing_year,
        non_numeric = report.non_numeric_rows,
        "dataset loaded"
    );
    Ok((Dataset::from(records), report))
}

fn coerce(row: RawRow) -> Record {
    let text = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
    Record {
        year: parse_year_safe(row.year.as_deref()),
        production: parse_metric_safe(row.production.as_deref()),
        total_demand: parse_metric_safe(row.total_demand.as_deref()),
        supply_gap: parse_metric_safe(row.supply_gap.as_deref()),
        region: text(row.region),
        sub_region: text(row.sub_region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Region,SubRegion,Year,Production,TotalDemand,SupplyGap,Notes
Asia,East Asia,2020,10,8,-2,ok
Asia, South Asia ,2021,N/A,9,1.5,
Africa,West Africa,n.d.,\"1,200\",900,,
";

    #[test]
    fn reads_and_coerces_rows() {
        let (data, report) = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.missing_year, 1);
        assert_eq!(report.non_numeric_rows, 1);

        assert_eq!(data[0].year, Some(2020));
        assert_eq!(data[0].supply_gap, Some(-2.0));
        assert_eq!(data[1].sub_region, "South Asia");
        assert_eq!(data[1].production, None);
        assert_eq!(data[2].year, None);
        assert_eq!(data[2].production, Some(1200.0));
        assert_eq!(data[2].supply_gap, Some(0.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Region,SubRegion,Year,Production,TotalDemand\nAsia,East,2020,1,2\n";
        match read_dataset(csv.as_bytes()) {
            Err(LoadError::MissingColumn(c)) => assert_eq!(c, "SupplyGap"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn column_order_is_free() {
        let csv = "SupplyGap,Year,Region,TotalDemand,SubRegion,Production\n\
                   3,2019,Europe,5,North,2\n";
        let (data, _) = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(data[0].region, "Europe");
        assert_eq!(data[0].year, Some(2019));
        assert_eq!(data[0].production, Some(2.0));
        assert_eq!(data[0].supply_gap, Some(3.0));
    }

    #[test]
    fn exponent_cells_are_numbers() {
        let csv = "Region,SubRegion,Year,Production,TotalDemand,SupplyGap\n\
                   Asia,East,2020,1.5e2,100,-5E1\n";
        let (data, report) = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(report.non_numeric_rows, 0);
        assert_eq!(data[0].production, Some(150.0));
        assert_eq!(data[0].supply_gap, Some(-50.0));

        let view = crate::aggregator::compute_view(&data, &Default::default());
        assert_eq!(view.summary.total_production, 150.0);
        assert_eq!(view.summary.self_sufficiency_ratio, Some(1.5));
        assert_eq!(view.production.value_at(2020), Some(150.0));
    }

    #[test]
    fn blank_metric_cell_still_joins_its_year() {
        let csv = "Region,SubRegion,Year,Production,TotalDemand,SupplyGap\n\
                   Asia,East,2020,10,8,\n";
        let (data, _) = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(data[0].supply_gap, Some(0.0));

        let view = crate::aggregator::compute_view(&data, &Default::default());
        assert_eq!(
            view.supply_gap.points,
            vec![crate::types::YearPoint { year: 2020, value: 0.0 }]
        );
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let csv = "Region,SubRegion,Year,Production,TotalDemand,SupplyGap\n";
        let (data, report) = read_dataset(csv.as_bytes()).unwrap();
        assert!(data.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_dataset("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("not/here.csv"));
    }
}
