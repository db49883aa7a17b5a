use crate::chart::{ChartRenderer, ChartSpec};
use crate::types::{DashboardView, FilterSelection, SummaryStats};
use crate::util::{format_int, format_number, format_ratio};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Production, demand, balance and self-sufficiency ratio.
pub fn write_summary<W: Write>(out: &mut W, stats: &SummaryStats) -> io::Result<()> {
    let rows = [
        ("Production (MMT)", format_number(stats.total_production, 1)),
        ("Total Demand (MMT)", format_number(stats.total_demand, 1)),
        ("Balance (MMT)", format_number(stats.balance, 1)),
        ("Self-Sufficiency Ratio", format_ratio(stats.self_sufficiency_ratio)),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<24} {:>16}", label, value)?;
    }
    Ok(())
}

pub fn write_selection<W: Write>(
    out: &mut W,
    selection: &FilterSelection,
    matched_rows: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "Region: {} | SubRegion: {} | Year: {} ({} rows)",
        selection.region,
        selection.sub_region,
        selection.year,
        format_int(matched_rows)
    )
}

/// Full dashboard: selection, KPIs, trend chart, supply gap chart.
pub fn render_dashboard<W, R>(
    out: &mut W,
    charts: &mut R,
    selection: &FilterSelection,
    view: &DashboardView,
) -> io::Result<()>
where
    W: Write,
    R: ChartRenderer,
{
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Grain Supply & Demand Dashboard")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    write_selection(out, selection, view.matched_rows)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    write_summary(out, &view.summary)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    out.flush()?;

    charts.line_chart(
        &ChartSpec::yearly("Production vs Total Demand"),
        &[&view.production, &view.total_demand],
    )?;
    charts.bar_chart(&ChartSpec::yearly("Supply Gap by Year"), &view.supply_gap)?;
    Ok(())
}

/// Numbered option list with `All` as entry 0.
pub fn write_options<W: Write, T: ToString>(
    out: &mut W,
    title: &str,
    items: &[T],
) -> io::Result<()> {
    writeln!(out, "{}:", title)?;
    writeln!(out, "  [0] {}", crate::types::ALL_LABEL)?;
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, item.to_string())?;
    }
    Ok(())
}
