use app::App;
use clap::Parser;
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecBuilder, LogSpecification, Logger,
    Naming,
};
use log::{LevelFilter, error, info, warn};
use std::{backtrace::Backtrace, panic, path::PathBuf, process};

mod app;
mod config;
mod dialog;
mod menu;
mod modules;
mod services;
mod theme;
mod watch;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the TOML config file
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    config_path: Option<PathBuf>,
}

pub fn get_log_spec(log_level: &str) -> LogSpecification {
    LogSpecification::env_or_parse(log_level).unwrap_or_else(|err| {
        warn!("Invalid log level {log_level:?}: {err}");
        LogSpecBuilder::new()
            .module("wsswitch", LevelFilter::Warn)
            .build()
    })
}

fn main() -> iced::Result {
    let args = Args::parse();

    let logger = Logger::with(LogSpecification::default())
        .log_to_file(FileSpec::default().directory("/tmp/wsswitch"))
        .duplicate_to_stderr(if cfg!(debug_assertions) {
            Duplicate::All
        } else {
            Duplicate::None
        })
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(7),
        )
        .start();
    let logger = match logger {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Failed to start the logger: {err}");
            process::exit(1);
        }
    };

    panic::set_hook(Box::new(|info| {
        let b = Backtrace::capture();
        error!("Panic: {info} \n {b}");
    }));

    let config_path = config::resolve_path(args.config_path);
    let config = config::read_config(&config_path).unwrap_or_else(|err| {
        error!("Failed to read config, using defaults: {err:#}");
        config::Config::default()
    });

    logger.set_new_spec(get_log_spec(&config.log_level));
    info!("Starting wsswitch {}", env!("CARGO_PKG_VERSION"));

    iced::daemon(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .style(App::style)
        .run_with(App::new((logger, config, config_path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_path_flag() {
        let args = Args::try_parse_from(["wsswitch", "--config-path", "/tmp/ws.toml"]).unwrap();
        assert_eq!(args.config_path, Some(PathBuf::from("/tmp/ws.toml")));

        let args = Args::try_parse_from(["wsswitch"]).unwrap();
        assert_eq!(args.config_path, None);
    }
}
