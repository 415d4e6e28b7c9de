use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use flowerpass::{EncodingMode, Generator, Settings, SiteKey, Storage, default_storage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FLOWERPASS_LOG";

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Output alphabet: flower (hex) or base64
    #[arg(long, short)]
    mode: Option<EncodingMode>,

    /// Number of characters to keep
    #[arg(long, short)]
    length: Option<usize>,
}

impl OutputArgs {
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(mode) = self.mode {
            settings.set_mode(mode);
        }
        if let Some(length) = self.length {
            settings.set_length(length)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.mode.is_none() && self.length.is_none()
    }
}

fn resolve_storage(path: Option<PathBuf>) -> Result<Storage> {
    match path {
        Some(p) => Ok(Storage::new(p)),
        None => default_storage(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "flowerpass")]
#[command(
    version,
    about = "Derives per-site passwords from one master password. Nothing per site is stored."
)]
struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, value_name = "PATH", env = "FLOWERPASS_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derives the password for a site (URL or hostname)
    #[command(arg_required_else_help = true)]
    Derive {
        site: String,

        #[command(flatten)]
        output: OutputArgs,

        /// Use SITE verbatim as the site key instead of normalizing it
        #[arg(long, default_value_t = false)]
        raw_key: bool,
    },

    /// Prints the site key a URL or hostname normalizes to
    #[command(arg_required_else_help = true)]
    Site { site: String },

    /// Shows or changes saved settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Prints the current settings
    Show,

    /// Saves new defaults
    Set {
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Cli::parse();
    match args.command {
        Commands::Derive {
            site,
            output,
            raw_key,
        } => {
            let storage = resolve_storage(args.settings)?;
            let mut settings = Settings::load(&storage)?;
            output.apply(&mut settings)?;

            let site_key = if raw_key {
                SiteKey::new(site.trim())
            } else {
                SiteKey::resolve(&site)
            };
            if site_key.is_empty() {
                bail!("cannot determine site key from '{site}'");
            }
            tracing::debug!(site_key = %site_key, "resolved site key");

            let password = auth::read_master_password()?;
            match Generator::new(&settings).generate(&password, &site_key)? {
                Some(code) => println!("{}", code.as_str()),
                None => bail!("nothing to derive"),
            }
        }
        Commands::Site { site } => {
            let site_key = SiteKey::resolve(&site);
            if site_key.is_empty() {
                bail!("cannot determine site key from '{site}'");
            }
            println!("{site_key}");
        }
        Commands::Config(ConfigCommand::Show) => {
            let storage = resolve_storage(args.settings)?;
            let settings = Settings::load(&storage)?;
            println!("mode:   {}", settings.mode());
            println!("length: {}", settings.length());
            println!("file:   {}", storage.path().display());
        }
        Commands::Config(ConfigCommand::Set { output }) => {
            if output.is_empty() {
                bail!("nothing to change; pass --mode and/or --length");
            }
            let storage = resolve_storage(args.settings)?;
            let mut settings = Settings::load(&storage)?;
            output.apply(&mut settings)?;
            settings.save(&storage)?;
            println!("settings saved");
        }
    }

    Ok(())
}
