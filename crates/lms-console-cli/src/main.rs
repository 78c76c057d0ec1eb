// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use lms_console_api::{Client, Token};
use lms_console_app::AppState;
use lms_console_testkit::Catalog;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOKEN_ENV: &str = "LMS_CONSOLE_TOKEN";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `lms-console --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let ui_options = config.ui_options()?;

    let token = resolve_token(
        config.token(),
        env::var(TOKEN_ENV).ok().as_deref(),
        options.token.as_deref(),
    );

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        init_logging(&config)?;
        info!("starting in demo mode");
        let mut state = start_state(&config);
        let mut runtime = DemoRuntime::new(Catalog::demo());
        return lms_console_tui::run_app(&mut state, &mut runtime, ui_options);
    }

    let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        if let Some(token) = &token {
            client.dashboard_stats(token).with_context(|| {
                format!("verify token against {}", client.base_url())
            })?;
        }
        return Ok(());
    }

    init_logging(&config)?;
    info!(
        base_url = client.base_url(),
        signed_in = token.is_some(),
        "starting console"
    );
    let mut state = start_state(&config);
    let mut runtime = ApiRuntime::new(client, token);
    lms_console_tui::run_app(&mut state, &mut runtime, ui_options)
}

fn start_state(config: &Config) -> AppState {
    AppState {
        active_screen: config.start_screen(),
        ..AppState::default()
    }
}

/// Later sources win: config file, then environment, then command line.
fn resolve_token(
    from_config: Option<&str>,
    from_env: Option<&str>,
    from_args: Option<&str>,
) -> Option<Token> {
    [from_args, from_env, from_config]
        .into_iter()
        .flatten()
        .find_map(Token::new)
}

fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path()?;
    let file = open_log_file(&path)?;
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.log_level()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    token: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        token: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--token" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--token requires a value"))?;
                options.token = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("lms-console: LMS admin console");
    println!("  --config <path>          Use a specific config path");
    println!("  --token <token>          Admin bearer token (overrides {TOKEN_ENV} and [auth].token)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch against seeded demo data (no network)");
    println!("  --check                  Validate config and, with a token, the API session");
    println!("  --help                   Show this help");
}
