// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Entry point.
//!
//! ```text
//! .env --> cli::parse() --> Config --> Logging --> Command Dispatch
//!   Run | Convert | Inspect | LevelVersions | Options | Configs | Version
//! ```

use std::process::ExitCode;

use erutcurts::cli::{self, Command};
use erutcurts::cmd::config::{run_configs_command, run_options_command};
use erutcurts::cmd::convert::{run_convert_command, run_inspect_command};
use erutcurts::cmd::level_versions::run_level_versions_command;
use erutcurts::cmd::run::run_bot_command;
use erutcurts::cmd::{build_config_loader, load_config};
use erutcurts::config::types::LoggingConfig;
use erutcurts::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env is normal
    dotenvy::dotenv().ok();
    let cli = cli::parse();

    match dispatch_command(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(logging: &LoggingConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(logging.console_level)
        .with_file_level(logging.file_level)
        .maybe_with_log_file(logging.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: cli::Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        anyhow::bail!("No command specified");
    };

    match command {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Configs => {
            let loader = build_config_loader(&cli.global)?;
            run_configs_command(&loader.format_loaded_files());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli.global)?;
    let _log_guard = init_logging(&build_log_config(&config.logging))?;

    match command {
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Run => run_bot_command(config).await,
        Command::Convert(args) => run_convert_command(&args, &config).await.map(|_| ()),
        Command::Inspect(args) => run_inspect_command(&args),
        Command::LevelVersions(args) => run_level_versions_command(&args, &config).await,
        Command::Version | Command::Configs => Ok(()),
    }
}
