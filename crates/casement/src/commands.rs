use std::path::PathBuf;

use clap::ArgMatches;
use serde_json::Value;
use tracing::{error, info, warn};

use casement_core::config::{Environment, loading};
use casement_core::{
    BridgeClient, CasementConfig, IpcError, Orchestrator, ResponseEnvelope, RunOutcome,
    WindowSummary,
};

mod completions;

use crate::table::WindowTable;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("run", sub_matches)) => handle_run_command(sub_matches),
        Some(("invoke", sub_matches)) => handle_invoke_command(sub_matches),
        Some(("windows", sub_matches)) => handle_windows_command(sub_matches),
        Some(("quit", sub_matches)) => handle_quit_command(sub_matches),
        Some(("completions", sub_matches)) => completions::handle_completions_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn load_config_with_warning() -> CasementConfig {
    match CasementConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.casement/config.toml and ./.casement/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            CasementConfig::default()
        }
    }
}

/// Apply flags shared by every subcommand on top of the loaded config.
fn apply_global_overrides(config: &mut CasementConfig, matches: &ArgMatches) {
    if let Some(dir) = matches.get_one::<PathBuf>("runtime-dir") {
        config.paths.runtime_dir = Some(dir.clone());
    }
}

/// Config for client commands. Only `[paths]` matters to them.
fn client_config(matches: &ArgMatches) -> CasementConfig {
    let mut config = load_config_with_warning();
    apply_global_overrides(&mut config, matches);
    config
}

fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

fn handle_run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.run_started");

    // An explicit --config must load; the hierarchy falls back to defaults
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => loading::load_with_file(path).map_err(|e| {
            eprintln!("❌ Could not load config '{}': {}", path.display(), e);
            error!(event = "cli.run_failed", path = %path.display(), error = %e);
            e
        })?,
        None => load_config_with_warning(),
    };
    apply_global_overrides(&mut config, matches);
    if matches.get_flag("dev") {
        config.app.environment = Some(Environment::Development);
    }

    let bridge_socket = config.paths.bridge_socket_path();
    println!(
        "Starting {} ({})",
        config.app.title(),
        config.app.environment()
    );
    println!("   Bridge: {}", bridge_socket.display());

    let (orchestrator, _backend) = Orchestrator::headless(config);
    let rt = runtime()?;

    match rt.block_on(orchestrator.run()) {
        Ok(RunOutcome::Exited) => {
            println!("Host stopped.");
            info!(event = "cli.run_completed", outcome = "exited");
            Ok(())
        }
        Ok(RunOutcome::SecondaryInstance) => {
            println!("Already running. Activated the existing instance.");
            info!(event = "cli.run_completed", outcome = "secondary_instance");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Host failed: {}", e);
            error!(event = "cli.run_failed", error = %e);
            Err(e.into())
        }
    }
}

/// Parse a CLI argument as JSON, falling back to a plain string.
///
/// `casement invoke window:minimize main` sends `"main"` without the user
/// having to quote it twice.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Connect to the running host and invoke one command.
fn invoke_remote(
    config: &CasementConfig,
    command: &str,
    args: Vec<Value>,
) -> Result<ResponseEnvelope<Value>, IpcError> {
    let socket_path = config.paths.bridge_socket_path();
    let rt = runtime()?;
    rt.block_on(async {
        let mut client = BridgeClient::connect(&socket_path).await?;
        client.invoke(command, args).await
    })
}

fn report_ipc_error(event: &'static str, e: &IpcError) {
    eprintln!("❌ {}", e);
    if let IpcError::NotRunning { .. } = e {
        eprintln!("   Start it with 'casement run'.");
    }
    error!(event = event, error = %e);
}

fn handle_invoke_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches
        .get_one::<String>("command")
        .ok_or("Command argument is required")?;
    let args: Vec<Value> = matches
        .get_many::<String>("args")
        .map(|values| values.map(String::as_str).map(parse_arg).collect())
        .unwrap_or_default();

    info!(
        event = "cli.invoke_started",
        command = command.as_str(),
        arg_count = args.len()
    );

    let config = client_config(matches);
    let envelope = invoke_remote(&config, command, args).map_err(|e| {
        report_ipc_error("cli.invoke_failed", &e);
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if envelope.is_success() {
        info!(event = "cli.invoke_completed", command = command.as_str());
        Ok(())
    } else {
        let message = envelope
            .error
            .unwrap_or_else(|| "unknown error".to_string());
        error!(
            event = "cli.invoke_failed",
            command = command.as_str(),
            error = %message
        );
        Err(message.into())
    }
}

fn handle_windows_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.windows_started", json_output = json_output);

    let config = client_config(matches);
    let envelope = invoke_remote(&config, "window:getAllWindows", Vec::new()).map_err(|e| {
        report_ipc_error("cli.windows_failed", &e);
        e
    })?;

    let data = envelope.into_result().map_err(|message| {
        eprintln!("❌ {}", message);
        error!(event = "cli.windows_failed", error = %message);
        message
    })?;
    let windows: Vec<WindowSummary> = match data {
        Some(value) => serde_json::from_value(value)?,
        None => Vec::new(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&windows)?);
    } else if windows.is_empty() {
        println!("No windows open.");
    } else {
        println!("Open windows:");
        let table = WindowTable::new(&windows);
        table.print_table(&windows);
    }

    info!(event = "cli.windows_completed", count = windows.len());
    Ok(())
}

fn handle_quit_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.quit_started");

    let config = client_config(matches);
    let socket_path = config.paths.bridge_socket_path();
    let rt = runtime()?;
    rt.block_on(async {
        let mut client = BridgeClient::connect(&socket_path).await?;
        client.quit().await
    })
    .map_err(|e| {
        report_ipc_error("cli.quit_failed", &e);
        e
    })?;

    println!("Quit requested.");
    info!(event = "cli.quit_completed");
    Ok(())
}
