use crate::types::YearSeries;
use crate::util::{format_number, format_opt};
use std::collections::BTreeSet;
use std::io::{self, Write};
use tabled::{builder::Builder, settings::Style};

pub const EMPTY_CHART: &str = "(no data for current selection)";

const BAR: &str = "█";

/// Titles and axis labels for one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
}

impl ChartSpec {
    /// Year on x, MMT on y.
    pub fn yearly(title: &str) -> Self {
        Self {
            title: title.to_string(),
            x_title: "Year".to_string(),
            y_title: "MMT".to_string(),
        }
    }
}

/// Sink for chart output. Renderers never feed back into aggregation.
pub trait ChartRenderer {
    fn line_chart(&mut self, spec: &ChartSpec, series: &[&YearSeries]) -> io::Result<()>;
    fn bar_chart(&mut self, spec: &ChartSpec, series: &YearSeries) -> io::Result<()>;
}

/// Draws charts as plain text.
pub struct TextChartRenderer<W: Write> {
    out: W,
    bar_width: usize,
    decimals: usize,
}

impl<W: Write> TextChartRenderer<W> {
    pub fn new(out: W, bar_width: usize) -> Self {
        Self {
            out,
            bar_width: bar_width.max(1),
            decimals: 1,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&mut self, spec: &ChartSpec) -> io::Result<()> {
        writeln!(self.out, "{}", spec.title)?;
        writeln!(self.out, "(x: {}, y: {})", spec.x_title, spec.y_title)?;
        Ok(())
    }
}

impl<W: Write> ChartRenderer for TextChartRenderer<W> {
    /// One row per year, one column per series.
    fn line_chart(&mut self, spec: &ChartSpec, series: &[&YearSeries]) -> io::Result<()> {
        self.header(spec)?;
        let years: BTreeSet<i32> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.year))
            .collect();
        if years.is_empty() {
            return writeln!(self.out, "{}\n", EMPTY_CHART);
        }

        let mut builder = Builder::default();
        let mut head = vec![spec.x_title.clone()];
        head.extend(series.iter().map(|s| s.metric.label().to_string()));
        builder.push_record(head);
        for year in years {
            let mut row = vec![year.to_string()];
            row.extend(
                series
                    .iter()
                    .map(|s| format_opt(s.value_at(year), self.decimals)),
            );
            builder.push_record(row);
        }
        let table = builder.build().with(Style::markdown()).to_string();
        writeln!(self.out, "{}\n", table)
    }

    /// Horizontal bars scaled to the largest magnitude. Negative values
    /// grow left of the axis.
    fn bar_chart(&mut self, spec: &ChartSpec, series: &YearSeries) -> io::Result<()> {
        self.header(spec)?;
        if series.is_empty() {
            return writeln!(self.out, "{}\n", EMPTY_CHART);
        }

        let max = series
            .points
            .iter()
            .map(|p| p.value.abs())
            .fold(0.0_f64, f64::max);
        let has_negative = series.points.iter().any(|p| p.value < 0.0);
        let (left_width, right_width) = if has_negative {
            let half = (self.bar_width / 2).max(1);
            (half, half)
        } else {
            (0, self.bar_width)
        };

        for p in &series.points {
            let scale = if p.value < 0.0 { left_width } else { right_width };
            let len = if max > 0.0 {
                ((p.value.abs() / max) * scale as f64).round() as usize
            } else {
                0
            };
            let (left, right) = if p.value < 0.0 {
                (BAR.repeat(len), String::new())
            } else {
                (String::new(), BAR.repeat(len))
            };
            writeln!(
                self.out,
                "{:>6} {:>lw$}|{:<rw$} {}",
                p.year,
                left,
                right,
                format_number(p.value, self.decimals),
                lw = left_width,
                rw = right_width,
            )?;
        }
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metric, YearPoint};

    fn series(metric: Metric, points: &[(i32, f64)]) -> YearSeries {
        YearSeries {
            metric,
            points: points
                .iter()
                .map(|&(year, value)| YearPoint { year, value })
                .collect(),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut TextChartRenderer<Vec<u8>>) -> io::Result<()>,
    {
        let mut r = TextChartRenderer::new(Vec::new(), 10);
        f(&mut r).unwrap();
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn empty_series_prints_placeholder() {
        let empty = series(Metric::SupplyGap, &[]);
        let out = render(|r| r.bar_chart(&ChartSpec::yearly("Supply Gap"), &empty));
        assert!(out.contains(EMPTY_CHART));

        let out = render(|r| r.line_chart(&ChartSpec::yearly("Trend"), &[&empty, &empty]));
        assert!(out.contains(EMPTY_CHART));
    }

    #[test]
    fn line_chart_aligns_years_across_series() {
        let prod = series(Metric::Production, &[(2020, 1500.0), (2021, 7.0)]);
        let dem = series(Metric::TotalDemand, &[(2021, 9.0)]);
        let out = render(|r| r.line_chart(&ChartSpec::yearly("Trend"), &[&prod, &dem]));
        assert!(out.contains("Total Demand"));
        assert!(out.contains("1,500.0"));
        let row_2020 = out.lines().find(|l| l.contains("2020")).unwrap();
        assert!(row_2020.contains(crate::util::PLACEHOLDER));
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let gap = series(Metric::SupplyGap, &[(2020, 10.0), (2021, 5.0), (2022, 0.0)]);
        let out = render(|r| r.bar_chart(&ChartSpec::yearly("Supply Gap"), &gap));
        let count = |year: &str| {
            out.lines()
                .find(|l| l.trim_start().starts_with(year))
                .map(|l| l.matches(BAR).count())
                .unwrap()
        };
        assert_eq!(count("2020"), 10);
        assert_eq!(count("2021"), 5);
        assert_eq!(count("2022"), 0);
    }

    #[test]
    fn negative_bars_grow_left() {
        let gap = series(Metric::SupplyGap, &[(2020, -4.0), (2021, 4.0)]);
        let out = render(|r| r.bar_chart(&ChartSpec::yearly("Supply Gap"), &gap));
        let line = out.lines().find(|l| l.contains("2020")).unwrap();
        let axis = line.find('|').unwrap();
        assert!(line[..axis].contains(BAR));
        assert!(!line[axis..].contains(BAR));
        assert!(line.ends_with("-4.0"));
    }
}
