//! snapshotter-notify - operator tool for the snapshotter reporting sinks
//!
//! Sends a single issue report or Telegram message through either pipeline,
//! which makes it easy to check which sinks a configuration enables.

use anyhow::{Context, Result};
use clap::Parser;
use snapshotter_notify::{
    cli::{ChatArgs, Cli, Command, IssueArgs},
    config::Config,
    logging,
    models::SnapshotterIssue,
    notification::{parse_chat_message, AsyncNotifier, BlockingNotifier},
};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = Config::load(&cli).unwrap_or_else(|err| {
        logging::init("error");
        error!("Failed to load configuration: {:#}", err);
        std::process::exit(1);
    });

    logging::init(&config.log_level);
    log_configuration(&config);

    let result = match cli.command {
        Some(Command::Issue(args)) => send_issue(&config, args),
        Some(Command::Chat(args)) => send_chat(&config, args),
        None => Ok(()),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn log_configuration(config: &Config) {
    let state = |enabled: bool| if enabled { "Enabled" } else { "Disabled" };
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Trace Logging: {}", state(config.logs.trace_enabled));
    info!(
        "Reporting Service: {}",
        state(config.reporting.service_url().is_some())
    );
    info!("Slack Webhook: {}", state(config.reporting.slack_url().is_some()));
    info!("Telegram Gateway: {}", state(config.reporting.telegram().is_some()));
    info!("HTTP Timeout: {}s", config.http.timeout_seconds);
    info!("-------------------------------------------------------");
}

fn send_issue(config: &Config, args: IssueArgs) -> Result<()> {
    let issue = SnapshotterIssue::now(
        args.instance_id,
        args.issue_type,
        args.project_id,
        args.epoch_id,
        args.extra,
    );

    if args.blocking {
        let notifier = BlockingNotifier::from_config(config)?;
        notifier.notify_issue(&issue);
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async {
        let notifier = AsyncNotifier::from_config(config)?;
        notifier.notify_issue(&issue);
        notifier.drain().await;
        Ok::<_, anyhow::Error>(())
    })
}

fn send_chat(config: &Config, args: ChatArgs) -> Result<()> {
    let payload = serde_json::from_str(&args.payload).context("--payload is not valid JSON")?;
    let Some(message) = parse_chat_message(&args.kind, payload) else {
        return Ok(());
    };

    if args.blocking {
        let notifier = BlockingNotifier::from_config(config)?;
        notifier.notify_chat(&message);
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async {
        let notifier = AsyncNotifier::from_config(config)?;
        notifier.notify_chat(&message);
        notifier.drain().await;
        Ok::<_, anyhow::Error>(())
    })
}
