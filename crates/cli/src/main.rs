//! Command-line access to the Ansiversa databases.

use ansiversa_accounts::CORE;
use ansiversa_db::{load_env_config, DbContext, EnvOptions, ListOptions, Tenant};
use ansiversa_quiz::questions::{create_question, list_questions};
use ansiversa_quiz::{Difficulty, NewQuestion, QUIZ};
use ansiversa_telemetry::{init_logging, Metrics};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value as Json};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ansiversa-db")]
#[command(about = "Bootstrap and inspect the Ansiversa core and quiz databases")]
struct Cli {
    /// Log level or filter directive
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true, default_value = "false")]
    json_logs: bool,

    /// Print Prometheus metrics to stderr on exit
    #[arg(long, global = true, default_value = "false")]
    print_metrics: bool,

    /// App tenants to read connection settings for
    #[arg(long, global = true, value_delimiter = ',', default_value = "quiz")]
    apps: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TenantArg {
    Core,
    Quiz,
    All,
}

impl TenantArg {
    fn tenants(self) -> Vec<&'static Tenant> {
        match self {
            TenantArg::Core => vec![&CORE],
            TenantArg::Quiz => vec![&QUIZ],
            TenantArg::All => vec![&CORE, &QUIZ],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables and indexes
    Bootstrap {
        #[arg(long, value_enum, default_value = "all")]
        tenant: TenantArg,
    },
    /// Print one page of questions as JSON
    ListQuestions {
        #[arg(long)]
        topic_id: Option<i64>,

        #[arg(long)]
        roadmap_id: Option<i64>,

        /// Difficulty symbol: E, M or D
        #[arg(long)]
        level: Option<String>,

        #[arg(long)]
        page: Option<f64>,

        #[arg(long)]
        page_size: Option<f64>,
    },
    /// Create questions from a CSV file
    ImportQuestions {
        #[arg(long)]
        csv: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.json_logs)?;

    let config = load_env_config(&EnvOptions::with_apps(cli.apps.iter().cloned()))?;
    let ctx = DbContext::new(config).with_metrics(Metrics::new()?);

    match cli.command {
        Commands::Bootstrap { tenant } => bootstrap(&ctx, tenant).await?,
        Commands::ListQuestions {
            topic_id,
            roadmap_id,
            level,
            page,
            page_size,
        } => {
            let mut options = ListOptions {
                page,
                page_size,
                ..ListOptions::default()
            };
            if let Some(topic_id) = topic_id {
                options = options.filter("topicId", topic_id);
            }
            if let Some(roadmap_id) = roadmap_id {
                options = options.filter("roadmapId", roadmap_id);
            }
            if let Some(level) = level {
                options = options.filter("level", Difficulty::from_symbol(&level));
            }
            let page = list_questions(&ctx, &options).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::ImportQuestions { csv } => import_questions(&ctx, &csv).await?,
    }

    if cli.print_metrics {
        if let Some(metrics) = ctx.metrics() {
            eprintln!("{}", metrics.gather()?);
        }
    }

    Ok(())
}

async fn bootstrap(ctx: &DbContext, tenant: TenantArg) -> anyhow::Result<()> {
    for tenant in tenant.tenants() {
        ctx.ensure_schema(tenant).await?;
        info!(tenant = tenant.name, "Schema ready");
    }
    Ok(())
}

async fn import_questions(ctx: &DbContext, csv_path: &str) -> anyhow::Result<()> {
    info!("Importing questions from {}", csv_path);

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut count = 0;
    for (line, result) in reader.deserialize().enumerate() {
        let record: QuestionRecord = result?;
        let input = record
            .into_question()
            .with_context(|| format!("invalid options on record {}", line + 1))?;
        if input.options.is_empty() {
            warn!(record = line + 1, "Question has no options");
        }
        create_question(ctx, &input).await?;
        count += 1;
    }

    info!("Imported {} questions", count);
    Ok(())
}

#[derive(serde::Deserialize)]
struct QuestionRecord {
    platform_id: i64,
    subject_id: i64,
    topic_id: i64,
    roadmap_id: i64,
    question: String,
    /// JSON object keyed by option label.
    options: String,
    answer: String,
    explanation: Option<String>,
    level: Option<String>,
    is_active: Option<bool>,
}

impl QuestionRecord {
    fn into_question(self) -> anyhow::Result<NewQuestion> {
        let options: Map<String, Json> = if self.options.trim().is_empty() {
            Map::new()
        } else {
            serde_json::from_str(&self.options)?
        };
        Ok(NewQuestion {
            platform_id: self.platform_id,
            subject_id: self.subject_id,
            topic_id: self.topic_id,
            roadmap_id: self.roadmap_id,
            prompt: self.question,
            options,
            answer: self.answer,
            explanation: self.explanation.filter(|text| !text.is_empty()),
            level: self
                .level
                .as_deref()
                .map(Difficulty::from_symbol)
                .unwrap_or_default(),
            is_active: self.is_active,
        })
    }
}
