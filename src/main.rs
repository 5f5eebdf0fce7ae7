use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use keygate::pipeline::DetachedLauncher;
use keygate::transport::HttpTransport;
use keygate::ui::{self, Terminal};
use keygate::{
    ActionPipeline, ApplicationContext, ChannelSink, DeviceIdentity, GateConfig, GateController,
    GateState, SessionClient, UiEvent,
};

#[derive(Parser)]
#[command(name = "keygate")]
#[command(about = "License-gated action launcher")]
struct Cli {
    #[arg(long, global = true, help = "Path to keygate.toml")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Unlock with a license key, then pick an action (default)
    Run,
    /// Print this machine's fingerprint
    Fingerprint,
    /// List configured actions
    Actions,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keygate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // no usable hardware id means no license binding: refuse to start
    let identity = DeviceIdentity::detect()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Fingerprint => {
            println!("{}", identity.fingerprint());
            Ok(())
        }
        Commands::Actions => {
            let config = GateConfig::load(cli.config.as_deref())?;
            for action in &config.actions {
                println!("{:<16} {}", action.name, action.label);
            }
            Ok(())
        }
        Commands::Run => {
            let config = GateConfig::load(cli.config.as_deref())?;
            run(config, identity).await
        }
    }
}

async fn run(config: GateConfig, identity: DeviceIdentity) -> Result<()> {
    if config.allow_test_key {
        tracing::warn!("allow_test_key is enabled: the literal test key unlocks the gate");
    }

    let transport = Arc::new(
        HttpTransport::new(config.request_timeout()).context("failed to build HTTP client")?,
    );
    let client = SessionClient::new(config.api_url.clone(), config.identity(), transport.clone())
        .with_test_key(config.allow_test_key);
    let gate = GateController::new(client);
    let pipeline = Arc::new(ActionPipeline::new(transport, Arc::new(DetachedLauncher)));

    let terminal = Terminal::new();
    let mut ctx = ApplicationContext::new(identity.fingerprint());

    gate.prepare(&mut ctx).await;

    // Locked: ask for keys until one is accepted
    while ctx.gate() != GateState::Unlocked {
        let Some(key) = terminal.prompt("Enter License Key:").await? else {
            tracing::info!("input closed before a key was accepted");
            return Ok(());
        };

        let (sink, mut rx) = ChannelSink::channel();
        let pb = ui::spinner("Checking license...");
        gate.submit(&mut ctx, &key, &sink).await?;
        pb.finish_and_clear();

        drop(sink);
        while let Some(event) = rx.recv().await {
            terminal.render(&event);
        }
    }

    // Unlocked: menu until an action completes or the user quits
    loop {
        let actions = gate.menu(&ctx, &config.actions)?;
        if actions.is_empty() {
            println!("No actions configured.");
            return Ok(());
        }
        terminal.show_menu(actions);

        let Some(choice) = terminal.prompt(">").await? else {
            return Ok(());
        };
        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let Some(action) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| actions.get(i))
            .cloned()
        else {
            println!("Unknown choice: {choice}");
            continue;
        };

        if let Some(question) = &action.confirm {
            if !terminal.confirm(question).await? {
                continue;
            }
        }

        let label = action.label.clone();
        let (sink, mut rx) = ChannelSink::channel();
        let handle = gate.launch(&ctx, pipeline.clone(), action, sink)?;
        let pb = ui::spinner(&label);

        while let Some(event) = rx.recv().await {
            if event == UiEvent::Quit {
                ui::spinner_success(&pb, &format!("{label} started"));
                return Ok(());
            }
            pb.suspend(|| terminal.render(&event));
        }

        // sender dropped without Quit: the run aborted
        let outcome = handle.await.context("pipeline task failed")?;
        ui::spinner_error(&pb, &format!("{label} aborted"));
        tracing::debug!(?outcome, "pipeline finished");
    }
}
