// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use npgen_app::ComposerState;
use npgen_db::Store;
use npgen_tui::Composer;
use runtime::StoreRuntime;
use std::env;
use std::path::{Path, PathBuf};

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
            "load config {}; run `npgen --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.ephemeral {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let catalog = config.catalog()?;
    let durations = config.feedback_durations()?;
    if options.check_only {
        let store = Store::open(&db_path).with_context(|| {
            format!(
                "open database {} -- if this path is wrong, set [storage].db_path or NPGEN_DB_PATH",
                db_path.display()
            )
        })?;
        store.bootstrap()?;
        return Ok(());
    }

    let _log_guard = logging::init(&config.log_file()?, config.log_level())?;
    tracing::info!(db = %db_path.display(), "starting npgen");

    let store = open_store(&db_path);
    let state = ComposerState::new(catalog, config.widget_parts());
    let runtime = StoreRuntime::new(store.as_ref());
    let mut composer = Composer::mount(state, runtime, durations);
    let result = npgen_tui::run_app(&mut composer);
    tracing::info!("npgen exited");
    result
}

// The composer stays usable without persistence; the theme just resets
// each launch.
fn open_store(path: &Path) -> Option<Store> {
    let opened = Store::open(path).and_then(|store| {
        store.bootstrap()?;
        Ok(store)
    });
    match opened {
        Ok(store) => Some(store),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{error:#}"),
                "settings store unavailable; theme will not persist"
            );
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    ephemeral: bool,
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
        print_config_path: false,
        print_db_path: false,
        ephemeral: false,
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
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--ephemeral" => options.ephemeral = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("npgen: compose part codes and copy them to the clipboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved settings database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --ephemeral              Keep settings in memory for this session only");
    println!("  --check                  Validate config and settings database, then exit");
    println!("  --help                   Show this help");
}
