use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};

use estatais_panel::report::render;
use estatais_panel::schema::panel_schema;
use estatais_panel::utils::logging::console;
use estatais_panel::{
    Dataset, OutputFormat, Page, PanelConfig, build_all, build_page, export_comparison,
};

#[derive(Parser)]
#[command(
    name = "estatais-panel",
    about = "Painel de indicadores das empresas estatais",
    version
)]
struct Cli {
    /// Data file (CSV or Parquet) or a directory of them
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State in focus
    #[arg(long, global = true)]
    state: Option<String>,

    /// Year in focus
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Years for the state comparison, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// States for the state comparison, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    states: Option<Vec<String>>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Debug logging
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page
    Page {
        /// home, companies, governance, results, government or states
        #[arg(value_parser = parse_page)]
        page: Page,
    },
    /// Render every page
    All,
    /// Describe the loaded data
    Inspect,
    /// Write the state comparison datasets as CSV
    Export {
        /// Output directory
        #[arg(long, default_value = "export")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Json => Self::Json,
        }
    }
}

fn parse_page(slug: &str) -> std::result::Result<Page, String> {
    slug.parse().map_err(|e: estatais_panel::PanelError| e.to_string())
}

fn resolve_config(cli: &Cli) -> Result<PanelConfig> {
    let config = match &cli.config {
        Some(path) => PanelConfig::from_json_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => PanelConfig::default(),
    };
    let mut config = config.with_env_overrides();

    if let Some(data) = &cli.data {
        config.data_path.clone_from(data);
    }
    if let Some(state) = &cli.state {
        config.state = state.trim().to_uppercase();
    }
    if let Some(year) = cli.year {
        config.focus_year = year;
    }
    if let Some(years) = &cli.years {
        config.comparison_years.clone_from(years);
    }
    if let Some(states) = &cli.states {
        config.comparison_states = states.iter().map(|s| s.trim().to_uppercase()).collect();
    }

    config.validate().context("invalid configuration")?;
    debug!("Resolved configuration: {config:?}");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = resolve_config(&cli)?;

    let start = Instant::now();
    let dataset = Dataset::load(&config)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    info!(
        "Loaded {} rows from {} in {:?}",
        dataset.num_rows(),
        dataset.source().display(),
        start.elapsed()
    );

    match cli.command {
        Commands::Page { page } => {
            let report = build_page(page, &dataset, &config)?;
            println!(
                "{}",
                render::render(&[report], cli.format.into(), dataset.source())?
            );
        }
        Commands::All => {
            let reports = build_all(&dataset, &config)?;
            println!(
                "{}",
                render::render(&reports, cli.format.into(), dataset.source())?
            );
        }
        Commands::Inspect => {
            console::print_batch_summary(
                dataset.batches().len(),
                dataset.num_rows(),
                start.elapsed(),
            );
            console::print_schema_info(&panel_schema());
            console::print_availability(dataset.availability());
            let years = dataset.years()?;
            let states = dataset.states()?;
            println!(
                "Years: {}",
                years.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            println!("States ({}): {}", states.len(), states.join(", "));
            println!(
                "Pages: {}",
                Page::ALL.iter().map(|p| p.slug()).collect::<Vec<_>>().join(", ")
            );
        }
        Commands::Export { out } => {
            let written = export_comparison(&dataset, &config, &out)
                .with_context(|| format!("exporting to {}", out.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
