// Entry point and high-level CLI flow.
//
// - `report` loads both files, prints previews and exports every table.
// - `goal` prints a goal simulation for the selected period.
// - `menu` (the default) keeps the data cached across an interactive loop
//   until the user reloads it or exits.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ride_report::config::Config;
use ride_report::delta::Metric;
use ride_report::filter::DateFilter;
use ride_report::goal::Goal;
use ride_report::output::{self, Formatter};
use ride_report::reports::{self, DashboardReport, ReportOptions};
use ride_report::store::DataStore;
use ride_report::util::{format_int, parse_f64_safe};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ride_report")]
#[command(about = "Ride-hailing income reports from ride and cost spreadsheets")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ride_report.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rides CSV export
    #[arg(long, global = true)]
    rides: Option<PathBuf>,

    /// Operating costs CSV export
    #[arg(long, global = true)]
    costs: Option<PathBuf>,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long, global = true, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long, global = true, requires = "from")]
    to: Option<NaiveDate>,

    /// Only the last N days before the latest ride
    #[arg(long, global = true, conflicts_with_all = ["from", "to"])]
    last_days: Option<u32>,

    /// Metric used for month-over-month and week-over-week tables
    #[arg(long, global = true, value_enum, default_value_t = Metric::Total)]
    metric: Metric,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print previews and export all tables to the output directory
    Report {
        /// Directory for CSV/JSON output
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Simulate a revenue goal against the current pace
    Goal {
        /// Target gross revenue
        #[arg(long)]
        target: f64,

        /// Days to reach the target
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Interactive menu (default)
    Menu,
}

impl Cli {
    fn date_filter(&self) -> DateFilter {
        match (self.from, self.to, self.last_days) {
            (Some(start), Some(end), _) => DateFilter::Between { start, end },
            (_, _, Some(n)) => DateFilter::LastDays(n),
            _ => DateFilter::All,
        }
    }
}

struct App {
    config: Config,
    store: DataStore,
    filter: DateFilter,
    metric: Metric,
    formatter: Formatter,
}

impl App {
    fn options(&self, goal: Option<Goal>) -> ReportOptions {
        ReportOptions {
            metric: self.metric,
            histogram_bins: self.config.histogram_bins,
            goal,
        }
    }

    fn report(&self, goal: Option<Goal>) -> Result<DashboardReport> {
        Ok(reports::report_from_store(&self.store, self.filter, &self.options(goal))?)
    }

    fn print_load_summary(&self) {
        if let Some((rides, costs)) = self.store.load_reports() {
            println!(
                "Processing dataset... ({} rides loaded from {}, {} skipped; {} cost rows from {})",
                format_int(rides.loaded_rows as u64),
                self.store.rides_path().display(),
                format_int(rides.skipped_rows as u64),
                format_int(costs.loaded_rows as u64),
                self.store.costs_path().display()
            );
            if rides.missing_time > 0 {
                println!(
                    "Note: {} rides have no usable time and are left out of shift figures.",
                    format_int(rides.missing_time as u64)
                );
            }
            println!();
        }
    }

    fn print_report(&self, report: &DashboardReport) {
        let f = &self.formatter;
        let n = self.config.preview_rows;
        match &report.range {
            Some(r) => println!(
                "Period: {} to {}\n",
                r.start.format("%d/%m/%Y"),
                r.end.format("%d/%m/%Y")
            ),
            None => println!("Period: (no rides)\n"),
        }

        println!("Overview\n");
        output::preview_table_rows(&output::overview_rows(&report.overview, f), usize::MAX);

        println!("Month over Month - {}\n", report.monthly.metric.label());
        output::preview_table_rows(
            &output::delta_rows(report.monthly.granularity, &report.monthly.deltas, f),
            n,
        );
        println!("Week over Week - {}\n", report.weekly.metric.label());
        output::preview_table_rows(
            &output::delta_rows(report.weekly.granularity, &report.weekly.deltas, f),
            n,
        );

        if let Some(b) = &report.profitability.per_km_box {
            println!(
                "Revenue per km: median {}, IQR {} to {}, {} outlier(s)\n",
                f.money(b.median),
                f.money(b.q1),
                f.money(b.q3),
                b.outliers.len()
            );
        }
        if let Some(p) = &report.pareto.summary {
            println!(
                "Pareto: the top {} rides ({:.1}% of rides) make 80% of revenue\n",
                p.cutoff_rank, p.ride_share_pct
            );
        }

        println!("Weekly Review\n");
        output::preview_table_rows(&output::weekday_rows(&report.weekdays, f), 7);
        if let Some(x) = &report.weekday_extremes {
            println!(
                "Best day: {} (median {}, {} rides)",
                ride_report::weekday::weekday_name(x.best.weekday),
                f.money(x.best.median),
                x.best.count
            );
            println!(
                "Worst day: {} (median {}, {} rides)\n",
                ride_report::weekday::weekday_name(x.worst.weekday),
                f.money(x.worst.median),
                x.worst.count
            );
        }

        if let Some(plan) = &report.goal {
            self.print_goal(plan);
        }
    }

    fn print_goal(&self, plan: &ride_report::goal::GoalPlan) {
        println!("Goal Simulation\n");
        for line in output::goal_lines(plan, &self.formatter) {
            println!("- {}", line);
        }
        println!();
        output::preview_table_rows(&output::shift_rows(plan, &self.formatter), 3);
    }

    fn handle_load(&mut self, force: bool) {
        let result = if force { self.store.reload() } else { self.store.load() };
        match result {
            Ok(()) => self.print_load_summary(),
            Err(e) => eprintln!("Failed to load files: {}\n", e),
        }
    }

    fn handle_report(&self, output_dir: &std::path::Path) -> Result<()> {
        let report = self.report(None)?;
        self.print_report(&report);
        let written = output::export_report(&report, output_dir)
            .with_context(|| format!("writing reports to {}", output_dir.display()))?;
        println!("(Full tables exported: {} files in {})\n", written.len(), output_dir.display());
        Ok(())
    }

    fn handle_goal(&self, target: f64, days: u32) -> Result<()> {
        let goal = Goal::new(target, days)?;
        let report = self.report(Some(goal))?;
        if let Some(plan) = &report.goal {
            self.print_goal(plan);
        }
        Ok(())
    }

    /// Menu loop over `input`. Ends on option 5 or when the input is closed.
    fn run_menu<R: BufRead>(&mut self, input: &mut R) {
        loop {
            println!("Select an option:");
            println!("[1] Load the files");
            println!("[2] Generate Reports");
            println!("[3] Goal Simulation");
            println!("[4] Reload the files");
            println!("[5] Exit\n");
            let Some(choice) = read_line(input, "Enter choice: ") else {
                println!("\nExiting the program.");
                break;
            };
            match choice.as_str() {
                "1" => self.handle_load(false),
                "2" | "3" if !self.store.is_loaded() => {
                    println!("Error: No data loaded. Please load the files first (option 1).\n");
                }
                "2" => {
                    let dir = self.config.output_dir.clone();
                    if let Err(e) = self.handle_report(&dir) {
                        eprintln!("Report error: {:#}\n", e);
                    }
                }
                "3" => {
                    let Some(target) = read_line(input, "Target revenue: ") else {
                        break;
                    };
                    let Some(days) = read_line(input, "Days to reach it: ") else {
                        break;
                    };
                    let target = parse_f64_safe(Some(&target), self.config.decimal_comma);
                    match (target, days.parse::<u32>()) {
                        (Some(t), Ok(d)) => {
                            if let Err(e) = self.handle_goal(t, d) {
                                eprintln!("{:#}\n", e);
                            }
                        }
                        _ => println!("Invalid number.\n"),
                    }
                }
                "4" => self.handle_load(true),
                "5" => {
                    println!("Exiting the program.");
                    break;
                }
                _ => println!("Invalid choice. Please enter 1 to 5.\n"),
            }
        }
    }
}

/// Print `prompt` and read one trimmed line. `None` once the input is closed
/// or unreadable.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read from stdin");
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(p) = &cli.rides {
        config.rides_path = p.clone();
    }
    if let Some(p) = &cli.costs {
        config.costs_path = p.clone();
    }

    let mut app = App {
        store: DataStore::new(&config.rides_path, &config.costs_path)
            .with_decimal_comma(config.decimal_comma),
        formatter: Formatter {
            currency_symbol: config.currency_symbol.clone(),
            decimal_comma: config.decimal_comma,
        },
        filter: cli.date_filter(),
        metric: cli.metric,
        config,
    };

    match cli.command {
        Some(Commands::Report { output_dir }) => {
            app.store.load().context("loading ride and cost files")?;
            app.print_load_summary();
            let dir = output_dir.unwrap_or_else(|| app.config.output_dir.clone());
            app.handle_report(&dir)?;
        }
        Some(Commands::Goal { target, days }) => {
            app.store.load().context("loading ride and cost files")?;
            app.handle_goal(target, days)?;
        }
        Some(Commands::Menu) | None => app.run_menu(&mut io::stdin().lock()),
    }

    Ok(())
}
