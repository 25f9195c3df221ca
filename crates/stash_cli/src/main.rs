use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde_json::Value as JsonValue;
use stash_core::CodecOptions;
use stash_core::core_api::{Engine, Session};
use stash_render::{
    render_item_sheet, render_json_full, render_json_layout, render_json_slot, render_layout,
    render_slot_table,
};
use tracing::info;

/// One `--set POS:NAME=VALUE` request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeEdit {
    position: usize,
    name: String,
    value: String,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "FILE.stash")]
    path: PathBuf,
    /// Show the attributes of the slot at this position.
    #[arg(long, value_name = "POS")]
    slot: Option<usize>,
    #[arg(long)]
    json: bool,
    /// Dump the byte layout of the stash blob.
    #[arg(long, conflicts_with = "slot")]
    layout: bool,
    /// Edit an attribute, keeping its type. Repeatable.
    #[arg(long = "set", value_name = "POS:NAME=VALUE", value_parser = parse_edit)]
    set: Vec<AttributeEdit>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Raw item size limit used when saving.
    #[arg(long = "item-capacity", value_name = "BYTES", conflicts_with = "unbounded")]
    item_capacity: Option<usize>,
    /// Save without item and blob size limits.
    #[arg(long)]
    unbounded: bool,
}

impl Cli {
    fn codec_options(&self) -> CodecOptions {
        if self.unbounded {
            return CodecOptions::unbounded();
        }
        match self.item_capacity {
            Some(capacity) => CodecOptions::default().with_item_capacity(Some(capacity)),
            None => CodecOptions::default(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let has_edits = !cli.set.is_empty();

    if has_edits && cli.output.is_none() {
        eprintln!("--set flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one --set flag");
        process::exit(2);
    }

    let engine = Engine::with_options(cli.codec_options());
    let mut session = engine.open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error loading stash file: {}", cli.path.display());
        eprintln!("  {}", e);
        process::exit(1);
    });

    for edit in &cli.set {
        session
            .set_attribute_value(edit.position, &edit.name, &edit.value)
            .unwrap_or_else(|e| {
                eprintln!("Error applying edit to slot {}: {e}", edit.position);
                process::exit(1);
            });
    }

    if let Some(out_path) = cli.output.as_ref() {
        session.save(out_path).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        info!(path = %out_path.display(), edits = cli.set.len(), "saved edited stash");
        if !cli.json && cli.slot.is_none() && !cli.layout {
            println!("Wrote edited stash to {}", out_path.display());
            return;
        }
    }

    if cli.json {
        print_json(&cli, &session);
        return;
    }

    if cli.layout {
        print!("{}", render_layout(session.layout()));
        return;
    }

    match cli.slot {
        Some(position) => {
            let sheet = render_item_sheet(&session, position).unwrap_or_else(|e| {
                eprintln!("{e}");
                process::exit(1);
            });
            print!("{sheet}");
        }
        None => print!("{}", render_slot_table(&session)),
    }
}

fn print_json(cli: &Cli, session: &Session) {
    let json: JsonValue = if cli.layout {
        render_json_layout(session.layout())
    } else if let Some(position) = cli.slot {
        render_json_slot(session, position).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        })
    } else {
        render_json_full(session)
    };
    let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn parse_edit(value: &str) -> Result<AttributeEdit, String> {
    let (position, rest) = value
        .split_once(':')
        .ok_or_else(|| format!("expected POS:NAME=VALUE, got '{value}'"))?;
    let (name, new_value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected POS:NAME=VALUE, got '{value}'"))?;
    let position = position
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid slot position '{position}'"))?;
    if name.is_empty() {
        return Err(format!("missing attribute name in '{value}'"));
    }
    Ok(AttributeEdit {
        position,
        name: name.to_string(),
        value: new_value.to_string(),
    })
}
