use clap::{Parser, Subcommand};
use lot_builder::config::{self, LotConfig};
use lot_builder::imaging::RustBackend;
use lot_builder::layout::{BACKGROUND_ASSET, LOGO_ASSET, Layout};
use lot_builder::output::{StatusLog, format_listing};
use lot_builder::rename::TEMP_SUFFIX;
use lot_builder::scan;
use lot_builder::wizard::{Sequence, Wizard};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lot-builder")]
#[command(about = "Organize, resize, and sequence auction-lot images")]
#[command(long_about = "\
Organize, resize, and sequence auction-lot images

Directory layout (created on first run, configurable in config.toml):

  <base>/
  ├── config.toml                          # Optional, see 'gen-config'
  ├── lot-builder.log                      # Status log
  ├── ADump/                               # Drop new images here
  │   ├── Original Lot Sticker Images/     # Originals after conversion
  │   ├── Final Lot Sticker Images/        # Finalized Lot###.jpg
  │   └── Temp Processing/                 # Stale canonical files
  └── zBin/                                # Optional logo.png, logo2.png

Workflow:
  1. convert           Lot sticker images → Lot001.jpg … (800×600 / 600×800)
  2. order             Commit a new order (positions are 1-based)
  3. finalize          Lot###.jpg → Final Lot Sticker Images
  4. order --auction   Auction photos in the dump → Auction001.jpg …

Run 'lot-builder gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Base directory holding the dump and the config file
    #[arg(long, default_value = ".", global = true)]
    base: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the directory layout
    Init,
    /// List the images in the dump in their current order
    List {
        /// Title the listing as auction photos
        #[arg(long)]
        auction: bool,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert and archive everything in the dump
    Convert,
    /// Reorder the dump and commit the order as canonical names
    Order {
        /// Name files AuctionNNN instead of LotNNN
        #[arg(long)]
        auction: bool,
        /// Move the file at position FROM to position TO (1-based, repeatable)
        #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,
        /// Complete new order as file names
        names: Vec<String>,
    },
    /// Move Lot###.jpg files into the final output directory
    Finalize,
    /// Validate config and layout, report decorative assets and orphans
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.base)?;
    let layout = Layout::new(&cli.base, &config.layout);
    let mut log = status_log(&cli.base, &config);

    if let Command::List { json: true, .. } = cli.command {
        log = log.quiet();
    }

    let mut wizard = Wizard::open(layout, config, RustBackend::new())?;

    let lines = match cli.command {
        Command::Init => wizard
            .layout()
            .directories()
            .iter()
            .map(|dir| format!("Ready: {}", dir.display()))
            .collect(),
        Command::List { auction, json } => {
            let sequence = if auction {
                wizard.refresh_auction()?;
                Sequence::Auction
            } else {
                Sequence::Lots
            };
            let files = wizard.order(sequence).files();
            if json {
                println!("{}", serde_json::to_string_pretty(files)?);
            }
            let title = if auction { "Auction photos" } else { "Lot images" };
            format_listing(title, files)
        }
        Command::Convert => wizard.run_master()?,
        Command::Order {
            auction,
            moves,
            names,
        } => {
            let sequence = if auction {
                wizard.refresh_auction()?;
                Sequence::Auction
            } else {
                Sequence::Lots
            };
            if !names.is_empty() {
                wizard.reorder(sequence, names.as_slice())?;
            }
            for (from, to) in moves {
                wizard.move_item(sequence, from - 1, to - 1)?;
            }
            wizard.apply_order(sequence)?
        }
        Command::Finalize => wizard.finalize_lots()?,
        Command::Check => check(wizard.layout())?,
        Command::GenConfig => Vec::new(),
    };

    log.emit(&lines)?;
    Ok(())
}

fn status_log(base: &Path, config: &LotConfig) -> StatusLog {
    if config.log.enabled {
        StatusLog::to_file(base.join(&config.log.file))
    } else {
        StatusLog::stdout_only()
    }
}

/// Parse `FROM:TO` with 1-based positions.
fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{s}'"))?;
    let parse = |v: &str| match v.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{v}' is not a position (1, 2, 3, ...)")),
        Ok(n) => Ok(n),
    };
    Ok((parse(from)?, parse(to)?))
}

/// Layout, assets, and leftover temp files.
fn check(layout: &Layout) -> Result<Vec<String>, scan::ScanError> {
    let backend = RustBackend::new();
    let mut lines = vec!["Config: ok".to_string()];

    for dir in layout.directories() {
        lines.push(format!("Directory: {}", dir.display()));
    }
    for asset in [LOGO_ASSET, BACKGROUND_ASSET] {
        let state = if layout.probe_asset(&backend, asset) {
            "found"
        } else {
            "not available"
        };
        lines.push(format!("Asset {}: {}", asset, state));
    }

    let orphans = scan::list(&layout.dump, &[TEMP_SUFFIX])?;
    if orphans.is_empty() {
        lines.push("No orphaned temporary files".to_string());
    } else {
        lines.push("Orphaned temporary files (rename or remove by hand):".to_string());
        for orphan in orphans {
            lines.push(format!("    {}", orphan.display_name));
        }
    }
    Ok(lines)
}
