use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chemecare_core::{
    AppConfig, Answers, ChatClient, Completer, EventKind, FacilitySnapshot, Provider, Secrets,
    Session, Store, TodoRefresh, config::{CONFIG_FILE, DATA_DIR_ENV}, extract_action_items,
    get_root_data_dir, prompts,
};

mod render;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliProvider {
    Together,
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Together => Provider::Together,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliEventKind {
    AssetPing,
    ScheduledCycle,
    RegulatoryUpdate,
    ContractorEvent,
    IncidentFlag,
}

impl From<CliEventKind> for EventKind {
    fn from(cli: CliEventKind) -> Self {
        match cli {
            CliEventKind::AssetPing => EventKind::AutonomousAssetPing,
            CliEventKind::ScheduledCycle => EventKind::ScheduledCycle,
            CliEventKind::RegulatoryUpdate => EventKind::RegulatoryUpdate,
            CliEventKind::ContractorEvent => EventKind::ContractorEvent,
            CliEventKind::IncidentFlag => EventKind::IncidentFlag,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum AnalysisKind {
    /// Patterns, risks and preventive measures for the last 10 events
    Insights,
    /// Detailed analysis of the last 5 events
    Recent,
    /// Facility report with KPIs, risks and next steps
    Report,
    /// Maintenance predictions for monitored assets
    Maintenance,
}

#[derive(Parser)]
#[command(name = "chemecare")]
#[command(about = "Log chemical facility events, triage them and track follow-up work with AI")]
struct Cli {
    /// Directory holding events.json, todos.json and session.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to chemecare.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// AI provider, overriding the config file
    #[arg(short, long, global = true)]
    provider: Option<CliProvider>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Welcome screen with a short summary
    Home,
    /// Log and list facility events
    Event {
        #[command(subcommand)]
        action: EventCommand,
    },
    /// Answer the decision gate questions for an event
    Orchestrate {
        /// Event id or unique id prefix
        event: String,
        /// The event has a safety impact
        #[arg(long)]
        safety: bool,
        /// The event is a compliance deviation
        #[arg(long)]
        compliance: bool,
        /// The event signals an asset health risk
        #[arg(long)]
        asset: bool,
    },
    /// Show recent orchestrator decisions
    Decisions {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the alert matrix
    Alerts {
        #[command(subcommand)]
        action: Option<AlertCommand>,
        /// Include dismissed alerts
        #[arg(long)]
        all: bool,
    },
    /// Plant overview; refreshes the AI todo list unless --offline
    Dashboard {
        /// Skip the AI todo refresh
        #[arg(long)]
        offline: bool,
    },
    /// Work through the todo list
    Todo {
        #[command(subcommand)]
        action: TodoCommand,
    },
    /// Run one of the AI analyses
    Analyze {
        kind: AnalysisKind,
        /// Append the bullet points of the answer to the todo list
        #[arg(long)]
        save_todos: bool,
    },
    /// Show whether AI analysis is available
    Status,
    /// Legacy vs new system comparison
    Benefits,
}

#[derive(Subcommand)]
enum EventCommand {
    /// Record a new event
    Add {
        #[arg(short = 't', long = "type", value_enum)]
        kind: CliEventKind,
        /// What happened
        details: Vec<String>,
    },
    /// List the most recent events
    List {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum AlertCommand {
    /// Dismiss an alert by id prefix
    Dismiss { id: String },
}

#[derive(Subcommand)]
enum TodoCommand {
    /// List todos
    List,
    /// Mark todo #N done
    Done { index: usize },
    /// Mark todo #N not done
    Undo { index: usize },
    /// Add a todo by hand
    Add { action: Vec<String> },
}

struct App {
    session: Session,
    config: AppConfig,
    secrets_path: PathBuf,
    provider: Provider,
    facility: FacilitySnapshot,
}

impl App {
    async fn load(cli: &Cli) -> Result<Self> {
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(get_root_data_dir);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE));
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.clone());

        let config = AppConfig::load(&config_path).await?;
        let secrets_path = config.secrets_path(&config_dir);
        let provider = cli
            .provider
            .clone()
            .map(Provider::from)
            .unwrap_or(config.provider);
        let facility = FacilitySnapshot::with_overrides(&config.facility);

        tracing::debug!(data_dir = %data_dir.display(), provider = provider.name(), "starting");
        let session = Session::open(Store::new(data_dir)).await?;

        Ok(Self {
            session,
            config,
            secrets_path,
            provider,
            facility,
        })
    }

    /// Secrets are read here so offline commands never touch them.
    async fn client(&self) -> chemecare_core::Result<ChatClient> {
        let secrets = Secrets::load(&self.secrets_path).await?;
        let api_key = self.provider.resolve_api_key(&secrets)?;
        ChatClient::new(self.provider, &self.config, api_key)
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chemecare=debug,chemecare_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = App::load(&cli).await?;

    match cli.command {
        Command::Home => render::home(&app.session),
        Command::Event { action } => match action {
            EventCommand::Add { kind, details } => {
                let event = app
                    .session
                    .add_event(kind.into(), &details.join(" "))
                    .await?;
                println!(
                    "{} Event added successfully! {}",
                    style("✓").green().bold(),
                    style(event.short_id()).dim()
                );
            }
            EventCommand::List { limit } => render::events(app.session.recent_events(limit)),
        },
        Command::Orchestrate {
            event,
            safety,
            compliance,
            asset,
        } => {
            let answers = Answers {
                safety_impact: safety,
                compliance_deviation: compliance,
                asset_health_risk: asset,
            };
            let decision = app.session.orchestrate(&event, answers).await?;
            println!(
                "{} Outcome: {}",
                style("✓").green().bold(),
                render::outcome(decision.outcome)
            );
            if let Some(alert) = app.session.alerts().active().next() {
                println!(
                    "  {} {} → {}",
                    style("Alert:").dim(),
                    alert.label,
                    alert.auto_action
                );
            }
        }
        Command::Decisions { limit } => render::decisions(app.session.orchestrator_log(), limit),
        Command::Alerts { action, all } => match action {
            Some(AlertCommand::Dismiss { id }) => {
                let alert = app.session.dismiss_alert(&id).await?;
                println!(
                    "{} Dismissed {} ({})",
                    style("✓").green().bold(),
                    alert.label,
                    style(alert.short_id()).dim()
                );
            }
            None => render::alerts(app.session.alerts(), all),
        },
        Command::Dashboard { offline } => {
            render::dashboard(&app.facility);
            if !offline {
                refresh_todos(&mut app).await;
            }
            render::todos(app.session.todos());
        }
        Command::Todo { action } => match action {
            TodoCommand::List => render::todos(app.session.todos()),
            TodoCommand::Done { index } => {
                let todo = app.session.set_todo_done(index, true).await?;
                println!("{} {}", style("✓").green().bold(), todo.action);
            }
            TodoCommand::Undo { index } => {
                let todo = app.session.set_todo_done(index, false).await?;
                println!("{} {}", style("↺").yellow().bold(), todo.action);
            }
            TodoCommand::Add { action } => {
                app.session.add_manual_todos(&[action.join(" ")]).await?;
                render::todos(app.session.todos());
            }
        },
        Command::Analyze { kind, save_todos } => analyze(&mut app, kind, save_todos).await?,
        Command::Status => render::status(&app.provider, app.client().await, &app.secrets_path),
        Command::Benefits => render::benefits(&app.facility),
    }

    Ok(())
}

/// Errors here are shown inline; the dashboard still renders the previous todos.
async fn refresh_todos(app: &mut App) {
    if app.session.events().is_empty() {
        return;
    }
    let client = match app.client().await {
        Ok(client) => client,
        Err(e) => {
            println!("{} {}", style("AI todo list unavailable:").yellow(), e);
            return;
        }
    };

    let spinner = create_spinner("Generating AI todo list and risk assessment from events...");
    match app.session.refresh_todos(&client).await {
        Ok(TodoRefresh::Replaced { todos, alerts }) => {
            spinner.finish_with_message(format!(
                "{} {} todos generated, {} alerts raised",
                style("✓").green().bold(),
                todos,
                alerts
            ));
        }
        Ok(_) => spinner.finish_with_message(format!(
            "{} No structured todos in the response; keeping previous list",
            style("!").yellow().bold()
        )),
        Err(e) => spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), e)),
    }
}

async fn analyze(app: &mut App, kind: AnalysisKind, save_todos: bool) -> Result<()> {
    let events = app.session.events();
    let (prompt, title) = match kind {
        AnalysisKind::Insights | AnalysisKind::Recent if events.is_empty() => {
            println!("{}", style("No events to analyze").yellow());
            return Ok(());
        }
        AnalysisKind::Insights => (prompts::insights_prompt(events), "Event Analysis"),
        AnalysisKind::Recent => (prompts::recent_analysis_prompt(events), "Analysis Results"),
        AnalysisKind::Report => (
            prompts::facility_report_prompt(events, &app.facility),
            "AI Report",
        ),
        AnalysisKind::Maintenance => (
            prompts::maintenance_prompt(&app.facility),
            "Maintenance Predictions",
        ),
    };

    let client = app.client().await?;
    let spinner = create_spinner(&format!(
        "Generating {} with {}...",
        title.to_lowercase(),
        app.provider.name()
    ));
    let text = match client.complete(&prompt).await {
        Ok(text) => {
            spinner.finish_with_message(format!("{} {}", style("✓").green().bold(), title));
            text
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", text);

    if save_todos {
        let items = extract_action_items(&text);
        let added = app.session.add_manual_todos(&items).await?;
        println!(
            "\n{} {} items added to the todo list",
            style("✓").green().bold(),
            added
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemecare_core::ChemError;

    #[tokio::test]
    async fn malformed_secrets_only_fail_ai_commands() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secrets.toml"), "not = [valid").unwrap();
        let data_dir = dir.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from(["chemecare", "--data-dir", &data_dir, "todo", "list"]);
        let app = App::load(&cli).await.unwrap();
        assert!(app.session.todos().is_empty());
        assert!(matches!(
            app.client().await,
            Err(ChemError::ConfigError(_))
        ));
    }
}
