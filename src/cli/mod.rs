use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigLoader, CONFIG_ENV};

pub mod commands;

use self::commands::{ColorizeArgs, CopyArgs, ExampleArgs, PasteArgs, RenderArgs};

#[derive(Parser, Debug)]
#[command(
    name = "notefmt",
    version,
    about = "Format contact and schedule notes as bulleted, linked HTML"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over NOTEFMT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the formatter over a file or stdin
    Render(RenderArgs),
    /// Render the built-in example document
    Example(ExampleArgs),
    /// Color emails, phones and URLs in raw input the way the input surface does
    Colorize(ColorizeArgs),
    /// Reduce clipboard-style HTML or text to the plain text a paste inserts
    Paste(PasteArgs),
    /// Copy the source view's visible text to the system clipboard
    Copy(CopyArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let config = loader.load_or_init()?;

    let output = match cli.command {
        Commands::Render(args) => commands::render(&config, &args)?,
        Commands::Example(args) => commands::example(&config, &args)?,
        Commands::Colorize(args) => commands::colorize(&config, &args)?,
        Commands::Paste(args) => commands::paste(&args)?,
        Commands::Copy(args) => commands::copy(&config, &args)?,
    };
    print!("{output}");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
