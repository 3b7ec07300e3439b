use clap::{Args, Parser, Subcommand};
use entirius_core::config::{self, CONFIG_ENV};
use entirius_core::{greet, process_value, validate, Datum, TemplateConfig};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Entirius command-line interface
#[derive(Parser, Debug)]
#[command(name = "entirius", author, version, about = "Greet, validate and process values with Entirius templates", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to $ENTIRIUS_CONFIG or ~/.config/entirius/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Per-invocation overrides applied on top of the loaded config.
#[derive(Args, Debug, Default)]
struct Overrides {
    #[arg(long, global = true)]
    max_length: Option<usize>,
    #[arg(long, global = true)]
    min_length: Option<usize>,
    /// Character class each character must match, e.g. "[a-z]"
    #[arg(long, global = true)]
    allowed_chars: Option<String>,
    /// Keep leading and trailing whitespace
    #[arg(long, global = true)]
    no_strip: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a greeting
    Greet {
        #[arg(long)]
        name: Option<String>,
    },
    /// Check a value against the config; exits 2 when invalid
    Validate { value: String },
    /// Process a JSON value (string, array of strings, or object) and print the result as JSON
    Process {
        /// Inline JSON document
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        json: Option<String>,
        /// Read the JSON document from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .try_init();
}

fn base_config(explicit: Option<&PathBuf>) -> Result<TemplateConfig, String> {
    if let Some(path) = explicit {
        return config::load_config_from(path).map_err(|e| e.to_string());
    }
    if env::var_os(CONFIG_ENV).is_some() || config::default_config_path().exists() {
        let (cfg, path) = config::load_config().map_err(|e| e.to_string())?;
        tracing::debug!(path = %path.display(), "using config file");
        return Ok(cfg);
    }
    Ok(TemplateConfig::default())
}

fn apply_overrides(cfg: TemplateConfig, overrides: &Overrides) -> Result<TemplateConfig, String> {
    let mut builder = cfg.to_builder();
    if let Some(v) = overrides.max_length {
        builder = builder.max_length(v);
    }
    if let Some(v) = overrides.min_length {
        builder = builder.min_length(v);
    }
    if let Some(v) = &overrides.allowed_chars {
        builder = builder.allowed_chars(v.clone());
    }
    if overrides.no_strip {
        builder = builder.strip_whitespace(false);
    }
    builder.build().map_err(|e| e.to_string())
}

fn read_document(json: Option<String>, file: Option<PathBuf>) -> Result<Datum, String> {
    let text = match (json, file) {
        (Some(json), _) => json,
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
        (None, None) => return Err("no JSON document given".to_string()),
    };
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;
    Ok(Datum::from(value))
}

fn resolve_config(cli: &Cli) -> TemplateConfig {
    match base_config(cli.config.as_ref()).and_then(|cfg| apply_overrides(cfg, &cli.overrides)) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Failed to load config: {}", err);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Greet { name }) => {
            println!("{}", greet(name.as_deref()));
        }
        Some(Commands::Validate { value }) => {
            let cfg = resolve_config(&cli);
            if validate(value, &cfg) {
                println!("valid");
            } else {
                println!("invalid");
                std::process::exit(2);
            }
        }
        Some(Commands::Process { json, file, pretty }) => {
            let cfg = resolve_config(&cli);
            let data = match read_document(json.clone(), file.clone()) {
                Ok(data) => data,
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(1);
                }
            };
            let result = match process_value(data, Some(&cfg)) {
                Ok(result) => result,
                Err(err) => {
                    eprintln!("Processing failed: {}", err);
                    std::process::exit(1);
                }
            };
            let rendered = if *pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            };
            match rendered {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize result: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("No subcommand provided. Try `entirius greet`.");
        }
    }
}
