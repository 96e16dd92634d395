//! Gridfill - lay out a data-bound spreadsheet template for a given data set

mod config;

use anyhow::{Context, Result};
use gridfill_core::storage::{
    listing_content, parse_data, parse_template, write_listing, write_markdown,
};
use gridfill_core::{Settings, plan_workbook, sizes_from_data};
use gridfill_engine::engine::CollectionSizes;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: gridfill [OPTIONS] <TEMPLATE>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <TEMPLATE>                Template description (.toml)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --data <FILE>         Read collection sizes from JSON data");
    eprintln!("  -s, --size <NAME=N>       Set a collection size (can be repeated)");
    eprintln!("  -o, --output <FILE>       Write to FILE (.txt: listing, otherwise markdown preview)");
    eprintln!("  --config <FILE>           Load settings from TOML file");
    eprintln!("  --no-config               Ignore settings files");
    eprintln!("  -h, --help                Print help");
}

struct Args {
    template: PathBuf,
    data: Option<PathBuf>,
    sizes: Vec<(String, usize)>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    no_config: bool,
}

fn fail_usage(message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage();
    std::process::exit(1);
}

fn parse_size(value: &str) -> Option<(String, usize)> {
    let (name, count) = value.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), count.trim().parse().ok()?))
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();

    let mut template: Option<PathBuf> = None;
    let mut data: Option<PathBuf> = None;
    let mut sizes: Vec<(String, usize)> = Vec::new();
    let mut output: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut no_config = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-d" | "--data" => {
                i += 1;
                if i >= args.len() {
                    fail_usage("--data requires a file path");
                }
                data = Some(PathBuf::from(&args[i]));
            }
            "-s" | "--size" => {
                i += 1;
                if i >= args.len() {
                    fail_usage("--size requires NAME=N");
                }
                match parse_size(&args[i]) {
                    Some(size) => sizes.push(size),
                    None => fail_usage(&format!("Invalid size '{}', expected NAME=N", args[i])),
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    fail_usage("--output requires a file path");
                }
                output = Some(PathBuf::from(&args[i]));
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    fail_usage("--config requires a file path");
                }
                config = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => no_config = true,
            arg if arg.starts_with('-') => fail_usage(&format!("Unknown option: {}", arg)),
            _ => {
                if template.is_none() {
                    template = Some(PathBuf::from(&args[i]));
                } else {
                    fail_usage(&format!("Unexpected argument: {}", args[i]));
                }
            }
        }
        i += 1;
    }

    let Some(template) = template else {
        fail_usage("No template given");
    };
    Args {
        template,
        data,
        sizes,
        output,
        config,
        no_config,
    }
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let (settings, warnings) = if args.no_config {
        (Settings::default(), Vec::new())
    } else {
        config::load_settings(args.config.as_deref())
    };
    init_logging(&settings);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    debug!(?settings, "settings loaded");

    let template = parse_template(&args.template)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;

    let mut sizes = match &args.data {
        Some(path) => {
            let data = parse_data(path)
                .with_context(|| format!("Failed to load data {}", path.display()))?;
            sizes_from_data(&template, &data)
        }
        None => CollectionSizes::new(),
    };
    sizes.extend(args.sizes);

    let plans = plan_workbook(&template, &sizes, &settings)?;

    match &args.output {
        Some(path) if path.extension().is_some_and(|ext| ext == "txt") => {
            write_listing(path, &plans)?;
            eprintln!("Listing written to {}", path.display());
        }
        Some(path) => {
            write_markdown(path, &plans)?;
            eprintln!("Preview written to {}", path.display());
        }
        None => print!("{}", listing_content(&plans)),
    }
    Ok(())
}

fn main() {
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
