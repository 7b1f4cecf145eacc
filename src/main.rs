// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Hop CLI entrypoint.
//!
//! Opens a file in the terminal viewer; press `f` to hop.
//!
//! Logging is off unless `HOP_LOG_FILE` names a file to append to; `HOP_LOG` sets the filter
//! (default `warn`).

use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use hop::annotate::AnnotationStrategy;
use hop::labels::LabelScheme;
use hop::HopConfig;
use tracing_subscriber::EnvFilter;

const LOG_FILE_ENV: &str = "HOP_LOG_FILE";
const LOG_FILTER_ENV: &str = "HOP_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file> [--config <path>] [--strategy overlay|substitution] [--labels legacy|positional]\n\nConfig is read from --config, else from the file named by $HOP_CONFIG, else defaults.\n--strategy and --labels override the config.\n\nKeys: f hop, hjkl/arrows move, PgUp/PgDn page, Home/End jump to start/end, q quit."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    strategy: Option<AnnotationStrategy>,
    labels: Option<LabelScheme>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(PathBuf::from(path));
            }
            "--strategy" => {
                if options.strategy.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.strategy = Some(raw.parse().map_err(|_| ())?);
            }
            "--labels" => {
                if options.labels.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.labels = Some(raw.parse().map_err(|_| ())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
    }

    if options.file.is_none() {
        return Err(());
    }

    Ok(options)
}

fn load_config(options: &CliOptions) -> Result<HopConfig, Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => HopConfig::load(path)?,
        None => HopConfig::from_env()?,
    };
    if let Some(strategy) = options.strategy {
        config.strategy = strategy;
    }
    if let Some(labels) = options.labels {
        config.label_scheme = labels;
    }
    Ok(config)
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "hop".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging()?;
        let config = load_config(&options)?;
        tracing::info!(strategy = %config.strategy, labels = %config.label_scheme, "starting hop viewer");

        let Some(file) = options.file.as_deref() else {
            print_usage(&program);
            std::process::exit(2);
        };
        hop::tui::run(file, config)
    })();

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};
    use hop::annotate::AnnotationStrategy;
    use hop::labels::LabelScheme;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn file_is_required() {
        assert_eq!(parse(&[]), Err(()));
        assert_eq!(parse(&["--strategy", "overlay"]), Err(()));
    }

    #[test]
    fn flags_are_parsed() {
        let options = parse(&[
            "notes.txt",
            "--strategy",
            "substitution",
            "--labels",
            "positional",
            "--config",
            "hop.json",
        ])
        .expect("options");
        assert_eq!(options.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(options.config, Some(PathBuf::from("hop.json")));
        assert_eq!(options.strategy, Some(AnnotationStrategy::Substitution));
        assert_eq!(options.labels, Some(LabelScheme::Positional));
    }

    #[test]
    fn bad_or_repeated_flags_are_rejected() {
        assert_eq!(parse(&["a.txt", "--strategy", "inline"]), Err(()));
        assert_eq!(parse(&["a.txt", "--labels"]), Err(()));
        assert_eq!(parse(&["a.txt", "b.txt"]), Err(()));
        assert_eq!(parse(&["a.txt", "--config", "x", "--config", "y"]), Err(()));
        assert_eq!(parse(&["a.txt", "--verbose"]), Err(()));
    }
}
