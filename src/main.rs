// Entry point and interactive console flow.
//
// - The dataset is loaded once at startup from `--data`.
// - Flags set the starting selection; `--once` renders it and exits.
// - Otherwise a numbered menu changes one filter at a time, and every
//   change re-renders the whole dashboard before the next prompt.
use anyhow::{Context, Result};
use clap::Parser;
use grain_dashboard::cli::Args;
use grain_dashboard::display::{render_dashboard, write_options};
use grain_dashboard::output::{
    preview_table_rows, series_rows, snapshot, write_json, write_series_csv,
};
use grain_dashboard::util::format_int;
use grain_dashboard::{
    load_dataset, DashboardState, FilterChange, FilterOptions, TextChartRenderer,
};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

const SERIES_EXPORT: &str = "grain_series.csv";
const SNAPSHOT_EXPORT: &str = "grain_summary.json";

fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().lock().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Map a menu answer to a filter value: `0` is `All`, `n` is the n-th
/// option, anything else is taken literally.
fn resolve_option<T: ToString>(input: &str, items: &[T]) -> String {
    match input.parse::<usize>() {
        Ok(0) => grain_dashboard::types::ALL_LABEL.to_string(),
        Ok(n) if n <= items.len() => items[n - 1].to_string(),
        _ => input.to_string(),
    }
}

fn render(state: &DashboardState, bar_width: usize) -> io::Result<()> {
    let view = state.view();
    let mut out = io::stdout();
    let mut charts = TextChartRenderer::new(io::stdout(), bar_width);
    render_dashboard(&mut out, &mut charts, state.selection(), &view)
}

fn export(
    state: &DashboardState,
    csv_path: Option<&Path>,
    json_path: Option<&Path>,
) -> Result<()> {
    let view = state.view();
    if let Some(path) = csv_path {
        let rows = write_series_csv(path, &view)
            .with_context(|| format!("exporting series to {}", path.display()))?;
        println!("Series exported to {} ({} years)", path.display(), format_int(rows));
    }
    if let Some(path) = json_path {
        write_json(path, &snapshot(state.selection(), &view))
            .with_context(|| format!("exporting snapshot to {}", path.display()))?;
        println!("Snapshot exported to {}", path.display());
    }
    Ok(())
}

fn load_state(args: &Args) -> Result<DashboardState> {
    match load_dataset(&args.data) {
        Ok((data, report)) => {
            println!(
                "Loaded {} rows from {} ({} with unusable numbers, {} unreadable)\n",
                format_int(report.loaded_rows),
                args.data.display(),
                format_int(report.non_numeric_rows),
                format_int(report.unreadable_rows)
            );
            Ok(DashboardState::new(data))
        }
        Err(e) if args.once => {
            Err(e).with_context(|| format!("loading {}", args.data.display()))
        }
        Err(e) => {
            error!(error = %e, "dataset load failed");
            eprintln!("Failed to load {}: {}\n", args.data.display(), e);
            Ok(DashboardState::empty())
        }
    }
}

/// The three filter controls offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterControl {
    Region,
    SubRegion,
    Year,
}

impl FilterControl {
    fn label(self) -> &'static str {
        match self {
            FilterControl::Region => "region",
            FilterControl::SubRegion => "sub-region",
            FilterControl::Year => "year",
        }
    }

    fn items(self, options: &FilterOptions) -> Vec<String> {
        match self {
            FilterControl::Region => options.regions.clone(),
            FilterControl::SubRegion => options.sub_regions.clone(),
            FilterControl::Year => options.years.iter().map(|y| y.to_string()).collect(),
        }
    }

    fn change(self, value: String) -> FilterChange {
        match self {
            FilterControl::Region => FilterChange::Region(value),
            FilterControl::SubRegion => FilterChange::SubRegion(value),
            FilterControl::Year => FilterChange::Year(value),
        }
    }
}

fn choose_filter(state: &mut DashboardState, control: FilterControl) -> io::Result<bool> {
    let items = control.items(state.options());
    let mut out = io::stdout().lock();
    write_options(&mut out, &format!("Select {}", control.label()), &items)?;
    drop(out);

    let Some(input) = read_line("Enter choice: ") else {
        return Ok(false);
    };
    if input.is_empty() {
        return Ok(true);
    }
    state.apply(control.change(resolve_option(&input, &items)));
    Ok(true)
}

fn run_menu(state: &mut DashboardState, bar_width: usize) -> Result<()> {
    if state.is_loaded() {
        render(state, bar_width)?;
    } else {
        warn!("no data loaded; dashboard left empty");
    }

    loop {
        println!("[1] Set region");
        println!("[2] Set sub-region");
        println!("[3] Set year");
        println!("[4] Reset filters");
        println!("[5] Show dashboard");
        println!("[6] Export ({}, {})", SERIES_EXPORT, SNAPSHOT_EXPORT);
        println!("[0] Exit\n");

        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        let keep_going = match choice.as_str() {
            "1" => choose_filter(state, FilterControl::Region)?,
            "2" => choose_filter(state, FilterControl::SubRegion)?,
            "3" => choose_filter(state, FilterControl::Year)?,
            "4" => {
                state.reset();
                true
            }
            "5" => true,
            "6" => {
                let csv_path = Path::new(SERIES_EXPORT);
                let json_path = Path::new(SNAPSHOT_EXPORT);
                if let Err(e) = export(state, Some(csv_path), Some(json_path)) {
                    error!("export failed: {:#}", e);
                    eprintln!("Export failed: {:#}\n", e);
                } else {
                    println!("{}\n", preview_table_rows(&series_rows(&state.view()), 3));
                }
                continue;
            }
            "0" => break,
            _ => {
                println!("Invalid choice. Please enter 0-6.\n");
                continue;
            }
        };
        if !keep_going {
            break;
        }
        println!();
        render(state, bar_width)?;
    }
    println!("Exiting the program.");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    info!("grain_dashboard v{}", env!("CARGO_PKG_VERSION"));

    let mut state = load_state(&args)?;
    for change in args.initial_changes() {
        state.apply(change);
    }

    export(
        &state,
        args.export_csv.as_deref(),
        args.export_json.as_deref(),
    )?;

    let bar_width = usize::from(args.bar_width);
    if args.once {
        render(&state, bar_width)?;
        return Ok(());
    }
    run_menu(&mut state, bar_width)
}
