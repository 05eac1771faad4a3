use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use deal_lens::comparison::{ComparisonMatrix, SelectionState};
use deal_lens::config::Config;
use deal_lens::portfolio::{Portfolio, PortfolioFilter, Project, Stage};
use deal_lens::scoring::{MetricCatalog, SortDirection, SortKey};
use deal_lens::verbose;

const EXIT_SUCCESS: i32 = 0;
const EXIT_PORTFOLIO: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_SCORING: i32 = 5;

/// Size of the generated portfolio used when no portfolio file is configured
const DEFAULT_PORTFOLIO_SIZE: usize = 8;
const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Which projects and metrics to compare, and how to order them
#[derive(Args, Debug, Default)]
struct CompareArgs {
    /// Project ids to compare (defaults to the first few in the portfolio)
    #[arg(long, value_delimiter = ',')]
    projects: Vec<String>,

    /// Metric ids to show (defaults to the first few in the catalog)
    #[arg(long, value_delimiter = ',')]
    metrics: Vec<String>,

    /// Sort by a metric id or "overall"
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// Only consider projects in these stages (e.g. seed,series-a)
    #[arg(long, value_delimiter = ',')]
    stage: Vec<String>,

    /// Only consider projects in these sectors
    #[arg(long, value_delimiter = ',')]
    sector: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the comparison matrix (default if no subcommand)
    Compare {
        #[command(flatten)]
        args: CompareArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the full scorecard of one project
    Show {
        /// Project id (as shown by `compare --format tsv`)
        id: String,
    },
    /// List the metric catalog
    Metrics,
    /// Write a generated mock portfolio (uses the global --seed)
    Generate {
        /// Number of projects
        #[arg(long, default_value_t = DEFAULT_PORTFOLIO_SIZE)]
        count: usize,

        /// Output path (defaults to ~/.config/deal-lens/portfolio.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Interactive comparison
    Tui {
        #[command(flatten)]
        args: CompareArgs,
    },
}

#[derive(Parser, Debug)]
#[command(name = "deal-lens")]
#[command(about = "Side-by-side scoring of venture portfolio projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/deal-lens/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Portfolio JSON file (overrides the config)
    #[arg(short, long, global = true)]
    portfolio: Option<PathBuf>,

    /// Seed for the generated portfolio
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(code);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    deal_lens::diagnostics::set_verbose(cli.verbose);
    let start_time = Instant::now();

    let command = cli.command.unwrap_or(Commands::Compare {
        args: CompareArgs::default(),
        format: OutputFormat::Table,
    });

    // Commands that do not need a loaded config
    match &command {
        Commands::Init { force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(deal_lens::config::get_config_path);
            match deal_lens::config::write_default_config(&path, *force) {
                Ok(true) => println!("Wrote default config to {}", path.display()),
                Ok(false) => fail(
                    EXIT_CONFIG,
                    format!("Config already exists at {} (use --force to overwrite)", path.display()),
                ),
                Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Generate { count, out } => {
            let path = out
                .clone()
                .unwrap_or_else(deal_lens::portfolio::get_portfolio_path);
            let portfolio = deal_lens::portfolio::generate_portfolio(*count, cli.seed);
            if let Err(e) = deal_lens::portfolio::save_portfolio(&path, &portfolio) {
                fail(EXIT_PORTFOLIO, format!("Portfolio error: {:#}", e));
            }
            println!(
                "Wrote {} projects (seed {}) to {}",
                portfolio.projects.len(),
                cli.seed,
                path.display()
            );
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    let config = match deal_lens::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    // Validate scoring config at startup
    let effective_scoring = config.effective_scoring();
    if let Err(errors) = deal_lens::scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let catalog = match deal_lens::scoring::build_catalog(&effective_scoring) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Scoring config error: {:#}", e)),
    };
    verbose!("Loaded {} metrics: {}", catalog.len(), catalog.ids().join(", "));

    if let Commands::Metrics = command {
        println!("{}", deal_lens::output::format_metric_list(&catalog));
        std::process::exit(EXIT_SUCCESS);
    }

    let portfolio = load_portfolio(cli.portfolio.as_ref(), &config, cli.seed);
    verbose!("Portfolio has {} projects", portfolio.projects.len());

    match command {
        Commands::Show { id } => {
            let Some(project) = portfolio.get(&id) else {
                fail(
                    EXIT_PORTFOLIO,
                    format!("Unknown project '{}'. Known ids: {}", id, portfolio.ids().join(", ")),
                );
            };
            let metrics = catalog.select(|_| true);
            let cells = match metrics
                .iter()
                .map(|m| deal_lens::scoring::score_metric(project, m))
                .collect::<anyhow::Result<Vec<_>>>()
            {
                Ok(cells) => cells,
                Err(e) => fail(EXIT_SCORING, format!("Scoring error: {:#}", e)),
            };
            let overall = match deal_lens::scoring::aggregate_score(project, &metrics) {
                Ok(score) => score,
                Err(e) => fail(EXIT_SCORING, format!("Scoring error: {:#}", e)),
            };
            let use_colors = deal_lens::output::should_use_colors();
            println!(
                "{}",
                deal_lens::output::format_scorecard(project, &cells, overall, &catalog, use_colors)
            );
        }
        Commands::Compare { args, format } => {
            let projects = filter_portfolio(portfolio, &args);
            let selection = build_selection(&args, &config, &projects, &catalog);

            let matrix = match ComparisonMatrix::build(&projects, &catalog, &selection) {
                Ok(m) => m,
                Err(e) => fail(EXIT_SCORING, format!("Scoring error: {:#}", e)),
            };

            match format {
                OutputFormat::Table => {
                    let use_colors = deal_lens::output::should_use_colors();
                    println!(
                        "{}",
                        deal_lens::output::format_matrix(&matrix, &selection, use_colors)
                    );
                }
                OutputFormat::Tsv => println!("{}", deal_lens::output::format_tsv(&matrix)),
                OutputFormat::Json => match deal_lens::output::format_json(&matrix) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(EXIT_SCORING, format!("Failed to serialize: {:#}", e)),
                },
            }

            verbose!(
                "Compared {} projects on {} metrics in {:?}",
                matrix.rows.len(),
                matrix.metric_ids.len(),
                start_time.elapsed()
            );
        }
        Commands::Tui { args } => {
            let projects = filter_portfolio(portfolio, &args);
            let selection = build_selection(&args, &config, &projects, &catalog);

            let theme = deal_lens::tui::resolve_theme();
            verbose!("Using {:?} theme", theme);
            let app = deal_lens::tui::App::new(
                projects,
                catalog,
                selection,
                deal_lens::tui::ThemeColors::for_theme(theme),
            );
            if let Err(e) = deal_lens::tui::run_tui(app).await {
                fail(EXIT_SCORING, format!("TUI error: {:#}", e));
            }
        }
        Commands::Metrics | Commands::Init { .. } | Commands::Generate { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Portfolio from --portfolio, then the config, then a generated one
fn load_portfolio(flag: Option<&PathBuf>, config: &Config, seed: u64) -> Portfolio {
    match flag.or(config.portfolio.as_ref()) {
        Some(path) => {
            verbose!("Loading portfolio from {}", path.display());
            match deal_lens::portfolio::load_portfolio(path) {
                Ok(p) => p,
                Err(e) => fail(EXIT_PORTFOLIO, format!("Portfolio error: {:#}", e)),
            }
        }
        None => {
            verbose!(
                "No portfolio configured, generating {} projects with seed {}",
                DEFAULT_PORTFOLIO_SIZE,
                seed
            );
            deal_lens::portfolio::generate_portfolio(DEFAULT_PORTFOLIO_SIZE, seed)
        }
    }
}

fn filter_portfolio(portfolio: Portfolio, args: &CompareArgs) -> Vec<Project> {
    let mut filter = PortfolioFilter::new();
    for stage in &args.stage {
        match Stage::parse(stage) {
            Some(s) => filter.toggle_stage(s),
            None => fail(
                EXIT_CONFIG,
                format!(
                    "Unknown stage '{}'. Expected one of: {}",
                    stage,
                    Stage::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                ),
            ),
        }
    }
    for sector in &args.sector {
        filter.toggle_sector(sector);
    }

    let before = portfolio.projects.len();
    let projects = deal_lens::portfolio::filter_projects(portfolio.projects, &filter);
    if !filter.is_empty() {
        verbose!("Filter kept {} of {} projects", projects.len(), before);
    }
    projects
}

/// Initial selection: explicit flags win over the configured defaults.
fn build_selection(
    args: &CompareArgs,
    config: &Config,
    projects: &[Project],
    catalog: &MetricCatalog<Project>,
) -> SelectionState {
    let project_ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();
    let mut selection = SelectionState::with_defaults(
        &project_ids,
        &catalog.ids(),
        config.comparison.default_projects,
        config.comparison.default_metrics,
    );

    if !args.projects.is_empty() {
        if let Some(unknown) = args.projects.iter().find(|id| !project_ids.contains(id)) {
            fail(
                EXIT_PORTFOLIO,
                format!("Unknown or filtered-out project '{}'", unknown),
            );
        }
        selection.select_entities(args.projects.iter().cloned());
    }

    if !args.metrics.is_empty() {
        if let Some(unknown) = args.metrics.iter().find(|id| catalog.get(id).is_none()) {
            fail(
                EXIT_CONFIG,
                format!("Unknown metric '{}'. Known metrics: {}", unknown, catalog.ids().join(", ")),
            );
        }
        selection.select_metrics(args.metrics.iter().cloned());
    }

    if let Some(sort) = &args.sort {
        let key = SortKey::parse(sort);
        let direction = if args.asc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        if !selection.set_sort(key.clone(), direction) {
            fail(
                EXIT_SCORING,
                format!("Cannot sort by '{}': metric is not selected", key),
            );
        }
    }

    selection
}
