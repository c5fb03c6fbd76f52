use std::io::{self, Write};
use std::path::PathBuf;

use chasebook::config::TrackerConfig;
use chasebook::consts::GALLERY_SLOTS;
use chasebook::engine::Tracker;
use chasebook::error::StoreError;
use chasebook::persistence::{self, DirStorage};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("refusing to reset without --yes")]
    ResetNotConfirmed,
    #[error("storage failed ({code}): {0}", code = .0.error_code())]
    Store(#[from] StoreError),
    #[error("write to stdout failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chasebook", about = "Inspect chase-bag tracker data on disk")]
struct Cli {
    #[arg(long, env = "CHASEBOOK_DATA_DIR", default_value = ".chasebook")]
    data_dir: PathBuf,

    #[arg(long, env = "CHASEBOOK_KEY_PREFIX", default_value = "")]
    key_prefix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bag ledger, box totals, and gallery counts.
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Every box in creation order.
    Boxes,
    /// Insurance slots and their marks.
    Marks,
    /// Remove every stored snapshot.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone)]
struct CliContext {
    data_dir: PathBuf,
    config: TrackerConfig,
}

impl CliContext {
    fn open(&self) -> Tracker<DirStorage> {
        Tracker::open(DirStorage::new(&self.data_dir), self.config.clone())
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let ctx = CliContext { data_dir: cli.data_dir, config: TrackerConfig::with_prefix(&cli.key_prefix) };
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Summary { json } => run_summary(&ctx, json, &mut out),
        Command::Boxes => run_boxes(&ctx, &mut out),
        Command::Marks => run_marks(&ctx, &mut out),
        Command::Reset { yes } => run_reset(&ctx, yes, &mut out),
    }
}

fn run_summary(ctx: &CliContext, as_json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let tracker = ctx.open();
    let core = tracker.core();
    let ledger = core.ledger();
    let gallery = core.gallery();
    let mark_counts: Vec<usize> = gallery.all_marks().iter().map(Vec::len).collect();

    if as_json {
        let value = json!({
            "bagCount": ledger.bag_count(),
            "selected": ledger.selected().len(),
            "remainingBags": ledger.remaining_bags(),
            "remainingChases": ledger.remaining_chases(),
            "hitRatio": core.hit_ratio(),
            "bagCost": ledger.bag_cost(),
            "unmarkedTotal": core.unmarked_total(),
            "buyoutProfit": core.buyout_profit(),
            "cooked": core.is_cooked(),
            "boxes": core.boxes().len(),
            "insuranceImages": gallery.populated_count(),
            "marks": mark_counts,
        });
        return print_json(&value, out);
    }

    let rows = [
        ("bags", ledger.bag_count().to_string()),
        ("selected", ledger.selected().len().to_string()),
        ("remaining bags", ledger.remaining_bags().to_string()),
        ("remaining chases", ledger.remaining_chases().to_string()),
        ("hit ratio", core.hit_ratio()),
        ("bag cost", format!("{:.2}", ledger.bag_cost())),
        ("unmarked total", format!("{:.2}", core.unmarked_total())),
        ("buyout profit", format!("{:.2}", core.buyout_profit())),
        ("cooked", yes_no(core.is_cooked()).to_owned()),
        ("boxes", core.boxes().len().to_string()),
        ("insurance images", format!("{}/{GALLERY_SLOTS}", gallery.populated_count())),
        ("marks", format!("{mark_counts:?}")),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<18}{value}", format!("{label}:"))?;
    }
    Ok(())
}

fn run_boxes(ctx: &CliContext, out: &mut impl Write) -> Result<(), CliError> {
    let tracker = ctx.open();
    let boxes = tracker.core().boxes();
    if boxes.is_empty() {
        writeln!(out, "no boxes")?;
        return Ok(());
    }
    for b in boxes {
        writeln!(
            out,
            "{}  pos=({:.1}, {:.1})  size={:.0}x{:.0}  value={:?}  marked={}  locked={}",
            b.id,
            b.x,
            b.y,
            b.width,
            b.height,
            b.value,
            yes_no(b.is_marked),
            yes_no(b.is_locked),
        )?;
    }
    Ok(())
}

fn run_marks(ctx: &CliContext, out: &mut impl Write) -> Result<(), CliError> {
    let tracker = ctx.open();
    let gallery = tracker.core().gallery();
    for (slot, (image, marks)) in gallery.images().iter().zip(gallery.all_marks()).enumerate() {
        let state = if image.is_some() { "image" } else { "empty" };
        writeln!(out, "slot {slot}: {state}, {} marks", marks.len())?;
        for mark in marks {
            writeln!(out, "  ({:.2}%, {:.2}%) size {}", mark.x, mark.y, mark.size)?;
        }
    }
    Ok(())
}

fn run_reset(ctx: &CliContext, confirmed: bool, out: &mut impl Write) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ResetNotConfirmed);
    }
    let mut store = DirStorage::new(&ctx.data_dir);
    persistence::clear_all(&mut store, &ctx.config.keys)?;
    tracing::info!(dir = %ctx.data_dir.display(), "stored snapshots removed");
    writeln!(out, "reset")?;
    Ok(())
}

fn print_json(value: &Value, out: &mut impl Write) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
