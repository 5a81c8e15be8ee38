use std::{collections::HashSet, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use shared::{
    domain::{default_items, ItemId, NewItem},
    reorder::plan_move,
};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/items.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate an empty collection, from a TOML file or the built-in list.
    Seed {
        #[arg(long)]
        from: Option<PathBuf>,
    },
    List,
    Move {
        id: String,
        from: u32,
        to: u32,
        /// Print the rank changes without writing them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify that stored ranks are exactly 0..n.
    Check,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    items: Vec<NewItem>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::Seed { from } => {
            let items = match from {
                Some(path) => {
                    let raw = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    parse_seed_file(&raw)?
                }
                None => default_items(),
            };
            let inserted = storage.seed_items(&items).await?;
            if inserted == 0 {
                println!("collection already populated; nothing seeded");
            } else {
                println!("seeded {inserted} items");
            }
        }
        Command::List => {
            for item in storage.list_items().await? {
                println!("{:>3}  {:<8} {}", item.order, item.id.as_str(), item.name);
            }
        }
        Command::Move {
            id,
            from,
            to,
            dry_run,
        } => {
            let id = ItemId::from(id);
            if dry_run {
                let items = storage.list_items().await?;
                for change in plan_move(&items, &id, from, to)? {
                    println!("{}: {} -> {}", change.id, change.from, change.to);
                }
            } else {
                storage.reorder_item(&id, from, to).await?;
                println!("moved {id} from {from} to {to}");
            }
        }
        Command::Check => {
            storage.verify_dense().await?;
            println!("ok: {} items, ranks dense", storage.item_count().await?);
        }
    }

    Ok(())
}

fn parse_seed_file(raw: &str) -> Result<Vec<NewItem>> {
    let file: SeedFile = toml::from_str(raw).context("invalid seed file")?;
    let mut seen = HashSet::new();
    for item in &file.items {
        if item.id.as_str().trim().is_empty() {
            bail!("seed file contains an item with an empty id");
        }
        if !seen.insert(&item.id) {
            bail!("seed file lists item '{}' more than once", item.id);
        }
    }
    Ok(file.items)
}
