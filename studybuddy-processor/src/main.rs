//! studybuddy-processor - Study material generator
//!
//! Uploads a document to the processing service and presents the returned
//! study guide, flashcards, quiz and audio narration in the terminal.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use studybuddy_common::config::{
    default_config_path, load_toml_config, write_toml_config, CliOverrides, CompiledDefaults,
    ConfigResolver, ServiceSettings, TomlConfig,
};
use studybuddy_common::events::{EventBus, StudyEvent};
use studybuddy_processor::models::{ArtifactBundle, SelectedFile};
use studybuddy_processor::presenter::{quiz, render, ArtifactPresenter, ArtifactView};
use studybuddy_processor::services::{
    notifier, ConsoleNotifier, FanOutNotifier, HttpProcessingService, LogNotifier,
    NotificationSink, ProcessingOrchestrator,
};
use studybuddy_processor::ProcessingError;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studybuddy-processor", version, about = "Turn documents into study materials")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Processing service base URL
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Processing service API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Print notifications to the log instead of the terminal
    #[arg(long, global = true)]
    quiet: bool,

    /// Print every processing event as a JSON line on stderr
    #[arg(long, global = true)]
    events: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process the first of the given files and present the results
    Process {
        /// Documents to select (only the first is processed)
        files: Vec<PathBuf>,

        #[command(flatten)]
        present: PresentArgs,

        /// Save the artifact bundle as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Present a previously saved artifact bundle
    Show {
        bundle: PathBuf,

        #[command(flatten)]
        present: PresentArgs,
    },
    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct PresentArgs {
    /// View to render (study-guide, flashcards, quiz, audio); all when omitted
    #[arg(long)]
    view: Option<ArtifactView>,

    /// Take the quiz interactively after rendering
    #[arg(long)]
    quiz: bool,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a config file with the given values
    Init,
    /// Print the resolved configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut resolver = ConfigResolver::new(CliOverrides {
        service_url: cli.service_url.clone(),
        api_key: cli.api_key.clone(),
        ..Default::default()
    });
    if let Some(path) = &cli.config {
        resolver = resolver.with_config_path(path);
    }
    // The configured level is not known yet; resolution logs go to a
    // temporary stderr subscriber
    let settings = tracing::subscriber::with_default(bootstrap_subscriber(), || resolver.resolve())
        .context("Failed to resolve configuration")?;

    init_tracing(&settings.log_level, settings.log_file.as_deref())?;

    info!(
        "studybuddy-processor {} ({} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    );

    match cli.command {
        Command::Process {
            ref files,
            ref present,
            ref save,
        } => run_process(&cli, &settings, files, present, save.as_deref()).await,
        Command::Show {
            ref bundle,
            ref present,
        } => run_show(&cli, bundle, present),
        Command::Config(ConfigCommand::Init) => run_config_init(&cli, resolver.config_path()),
        Command::Config(ConfigCommand::Show) => {
            run_config_show(&settings, resolver.config_path());
            Ok(())
        }
    }
}

/// Stderr subscriber used while the configuration itself is resolved
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CompiledDefaults::default().log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Logs go to stderr (or the configured file) so rendered views stay clean on stdout
fn init_tracing(configured_level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn build_notifier(cli: &Cli, event_bus: &EventBus) -> Arc<dyn NotificationSink> {
    let display: Box<dyn NotificationSink> = if cli.quiet {
        Box::new(LogNotifier)
    } else {
        Box::new(ConsoleNotifier)
    };
    Arc::new(FanOutNotifier::new(vec![display, Box::new(event_bus.clone())]))
}

async fn run_process(
    cli: &Cli,
    settings: &ServiceSettings,
    paths: &[PathBuf],
    present: &PresentArgs,
    save: Option<&Path>,
) -> Result<()> {
    let mut selection = Vec::with_capacity(paths.len());
    for path in paths {
        let file = SelectedFile::load(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        selection.push(file);
    }

    let event_bus = EventBus::new(CompiledDefaults::default().event_bus_capacity);
    let sink = build_notifier(cli, &event_bus);

    // Nothing to send, so the service settings are never consulted
    if selection.is_empty() {
        sink.notify(notifier::no_files_selected());
        bail!(ProcessingError::NoFilesSelected);
    }

    let progress = ProgressPrinter::spawn(&event_bus, cli.quiet, cli.events);

    let service = HttpProcessingService::new(settings)?;
    debug!(endpoint = %service.endpoint(), "Processing service configured");

    let mut orchestrator =
        ProcessingOrchestrator::new(Arc::new(service), sink, event_bus.clone());
    orchestrator.reset(selection);

    let outcome = orchestrator.submit().await.map(|_| ());

    progress.finish().await;

    // Details were already reported through the notifier
    if let Err(err) = outcome {
        bail!("Processing failed ({})", err.code());
    }

    let Some(presenter) = orchestrator.presenter() else {
        return Ok(());
    };

    if let Some(path) = save {
        save_bundle(presenter.bundle(), path)?;
    }

    present_bundle(presenter, present, orchestrator.notifier())
}

fn run_show(cli: &Cli, path: &Path, present: &PresentArgs) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let bundle = ArtifactBundle::from_json(&json)
        .with_context(|| format!("{} is not a valid artifact bundle", path.display()))?;

    let event_bus = EventBus::new(CompiledDefaults::default().event_bus_capacity);
    let notifier = build_notifier(cli, &event_bus);
    present_bundle(ArtifactPresenter::new(&bundle), present, notifier.as_ref())
}

fn present_bundle(
    mut presenter: ArtifactPresenter<'_>,
    present: &PresentArgs,
    notifier: &dyn NotificationSink,
) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    let views: Vec<ArtifactView> = match present.view {
        Some(view) => vec![view],
        None => ArtifactView::ALL.to_vec(),
    };
    for view in views {
        presenter.select(view);
        writeln!(stdout, "{}", render::render_view(presenter.current()))?;
    }

    if present.quiz {
        let mut session = presenter.quiz_session();
        let stdin = std::io::stdin().lock();
        if let Some(score) = quiz::take_quiz(&mut session, stdin, &mut stdout)? {
            presenter.report_quiz_completion(score, notifier);
        }
    }

    Ok(())
}

/// Prints stage progress (and optionally raw events) while a run is in flight
struct ProgressPrinter {
    handle: tokio::task::JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

impl ProgressPrinter {
    fn spawn(event_bus: &EventBus, quiet: bool, json_events: bool) -> Self {
        let mut rx = event_bus.subscribe();
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = rx.recv() => match event {
                        Ok(event) => print_event(&event, quiet, json_events),
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Progress printer lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = &mut shutdown_rx => {
                        while let Ok(event) = rx.try_recv() {
                            print_event(&event, quiet, json_events);
                        }
                        break;
                    }
                }
            }
        });

        Self { handle, shutdown }
    }

    /// Flush whatever is still queued and stop
    async fn finish(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

fn print_event(event: &StudyEvent, quiet: bool, json_events: bool) {
    if json_events {
        if let Ok(line) = serde_json::to_string(event) {
            eprintln!("{}", line);
        }
    }
    if let StudyEvent::StageAdvanced { new_stage, .. } = event {
        if !quiet {
            eprintln!("{}", render::render_progress(*new_stage));
        }
    }
}

fn save_bundle(bundle: &ArtifactBundle, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved artifact bundle to {}", path.display());
    Ok(())
}

fn run_config_init(cli: &Cli, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .context("Could not determine config directory; pass --config")?;

    let mut config = load_toml_config(&path)?.unwrap_or_else(TomlConfig::default);
    if let Some(url) = &cli.service_url {
        config.service_url = Some(url.clone());
    }
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }

    write_toml_config(&config, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_config_show(settings: &ServiceSettings, path: Option<&Path>) {
    let path = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    println!("config file:      {}", path);
    println!(
        "service url:      {}",
        settings.service_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "api key:          {}",
        if settings.api_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("function:         {}", settings.function_name);
    println!("timeout (secs):   {}", settings.request_timeout_secs);
    println!("log level:        {}", settings.log_level);
    println!(
        "log file:         {}",
        settings
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(stderr)".to_string())
    );
}
