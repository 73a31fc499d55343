use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sleep_health_dashboard::{charts, compute_metrics, dashboard, db, loader, report};
use sleep_health_dashboard::{ChartSpec, Column, SleepRecord};

#[derive(Parser)]
#[command(name = "sleep-health-dashboard")]
#[command(about = "Stat cards and chart data for the sleep health survey", long_about = None)]
struct Cli {
    /// Postgres connection string; when set, records are read from the database
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Input {
    /// Survey CSV file, used when no database is configured
    #[arg(long, env = "SLEEP_HEALTH_CSV", default_value = "data/sleep_health.csv")]
    csv: PathBuf,
}

#[derive(clap::Args)]
struct Source {
    #[command(flatten)]
    input: Input,
    /// Keep only rows with this sleep disorder (repeatable; default is all)
    #[arg(long = "disorder")]
    disorders: Vec<String>,
}

#[derive(Subcommand)]
enum ChartCommand {
    /// Pie chart of one column; --hole above zero draws a donut
    Pie {
        #[arg(long)]
        column: Column,
        #[arg(long)]
        label: String,
        #[arg(long, default_value_t = 0.0)]
        hole: f64,
    },
    /// Single-level treemap of one column
    Treemap {
        #[arg(long)]
        column: Column,
        #[arg(long)]
        label: String,
    },
    /// Funnel of one column, optionally split by a second column
    Funnel {
        #[arg(long)]
        column: Column,
        #[arg(long)]
        label: String,
        #[arg(long)]
        color: Option<Column>,
    },
    /// Per-group averages with the overall mean as a reference line
    Average {
        #[arg(long)]
        group: Column,
        #[arg(long)]
        value: Column,
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Import survey records from a CSV file into the database
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List the sleep disorder values available for filtering
    Disorders {
        #[command(flatten)]
        input: Input,
    },
    /// Print the four stat cards
    Metrics {
        #[command(flatten)]
        source: Source,
    },
    /// Print the full dashboard as JSON
    Charts {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        pretty: bool,
    },
    /// Build a single chart from arbitrary columns and print it as JSON
    Chart {
        #[command(flatten)]
        source: Source,
        #[command(subcommand)]
        chart: ChartCommand,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value_t = 20)]
        preview: usize,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
}

async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn load_records(
    database_url: Option<&str>,
    input: &Input,
) -> anyhow::Result<Vec<SleepRecord>> {
    match database_url {
        Some(url) => {
            let pool = connect(url).await?;
            db::fetch_records(&pool).await
        }
        None => loader::load_csv(&input.csv)
            .with_context(|| format!("failed to load {}", input.csv.display())),
    }
}

fn build_chart(records: &[SleepRecord], chart: ChartCommand) -> anyhow::Result<ChartSpec> {
    let spec = match chart {
        ChartCommand::Pie {
            column,
            label,
            hole,
        } => charts::pie_chart(records, column, &label, hole)?,
        ChartCommand::Treemap { column, label } => charts::treemap(records, column, &label),
        ChartCommand::Funnel {
            column,
            label,
            color,
        } => charts::funnel_chart(records, column, &label, color),
        ChartCommand::Average {
            group,
            value,
            title,
        } => charts::average_by_group(records, group, value, title.as_deref())?,
    };
    Ok(spec)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sleep_health_dashboard=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::InitDb => {
            let url = database_url.context("DATABASE_URL must be set to initialise the schema")?;
            db::init_db(&connect(url).await?).await?;
            println!("Schema ready.");
        }
        Commands::Import { csv } => {
            let url = database_url.context("DATABASE_URL must be set to import records")?;
            let inserted = db::import_csv(&connect(url).await?, &csv).await?;
            println!("Inserted {inserted} records from {}.", csv.display());
        }
        Commands::Disorders { input } => {
            let records = load_records(database_url, &input).await?;
            for disorder in dashboard::sleep_disorders(&records) {
                println!("{disorder}");
            }
        }
        Commands::Metrics { source } => {
            let records = load_records(database_url, &source.input).await?;
            let filtered = dashboard::filter_by_disorder(&records, &source.disorders);
            for card in compute_metrics(&filtered).iter() {
                println!("{}: {} ({})", card.title, card.content, card.trend);
            }
        }
        Commands::Charts { source, pretty } => {
            let records = load_records(database_url, &source.input).await?;
            let dashboard = dashboard::build_dashboard(&records, &source.disorders)?;
            let json = if pretty {
                serde_json::to_string_pretty(&dashboard)?
            } else {
                serde_json::to_string(&dashboard)?
            };
            println!("{json}");
        }
        Commands::Chart { source, chart } => {
            let records = load_records(database_url, &source.input).await?;
            let filtered = dashboard::filter_by_disorder(&records, &source.disorders);
            let spec = build_chart(&filtered, chart)?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        Commands::Report {
            source,
            preview,
            out,
        } => {
            let records = load_records(database_url, &source.input).await?;
            let dashboard = dashboard::build_dashboard(&records, &source.disorders)?;
            let report = report::build_report(&dashboard, Utc::now().date_naive(), preview);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
