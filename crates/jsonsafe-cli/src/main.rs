use std::fs::File;
use std::io::{Read, stdin};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use jsonsafe::extension::{ExtensionConfig, Manifest};
use jsonsafe::{BigIntFormat, Options};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jsonsafe-cli",
    about = "Sanitize tagged JSON (big integers, dates, undefined) into plain JSON",
    version
)]
struct Args {
    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Replace containers nested deeper than N with null
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Write big integers as `<digits>n` (debug output only)
    #[arg(long, default_value_t = false)]
    bigint_suffix: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the extension API base URL for this manifest instead of sanitizing
    #[arg(long, value_name = "PATH", requires_all = ["production_url", "development_url"])]
    manifest: Option<PathBuf>,

    /// Base URL for store-installed extensions
    #[arg(long, value_name = "URL")]
    production_url: Option<String>,

    /// Base URL for unpacked development builds
    #[arg(long, value_name = "URL")]
    development_url: Option<String>,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jsonsafe={level},jsonsafe_cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_base_url(path: &Path, args: &Args) -> Result<()> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    let kind = manifest.install_kind();
    info!(?kind, version = %manifest.version, "resolved install kind");
    let config = ExtensionConfig {
        production_url: args.production_url.clone().unwrap_or_default(),
        development_url: args.development_url.clone().unwrap_or_default(),
    };
    println!("{}", config.base_url(kind));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(path) = &args.manifest {
        return print_base_url(path, &args);
    }

    let mut buf = String::new();
    match &args.input {
        Some(path) => {
            let mut f = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }
    debug!(bytes = buf.len(), "read input");

    let value = jsonsafe::from_tagged_str(&buf).context("input is not valid JSON")?;
    let options = Options {
        max_depth: args.max_depth,
        bigint_format: if args.bigint_suffix {
            BigIntFormat::Suffixed
        } else {
            BigIntFormat::Decimal
        },
        pretty: args.pretty,
    };
    let out = jsonsafe::to_string(&value, &options)?;
    println!("{}", out);

    Ok(())
}
