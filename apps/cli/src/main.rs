use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{drag_end, DragOutcome, HttpItemsClient, ItemsApi, OptimisticList};
use shared::domain::{Item, ItemId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server_url: String,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the list in its current order.
    List,
    /// Move an item to a new zero-based position.
    Move { id: String, to: u32 },
    /// Drop one item onto the slot currently held by another, like a drag gesture.
    Drop { active: String, over: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let client = HttpItemsClient::new(&args.server_url)?;
    let mut list = OptimisticList::new(
        client
            .list_items()
            .await
            .with_context(|| format!("failed to load items from {}", args.server_url))?,
    );

    match args.command {
        Command::List => {}
        Command::Move { id, to } => {
            let id = ItemId::from(id);
            let over = list
                .items()
                .get(to as usize)
                .map(|item| item.id.clone())
                .ok_or_else(|| {
                    anyhow!(
                        "position {to} is out of range for {} items",
                        list.items().len()
                    )
                })?;
            settle(drag_end(&client, &mut list, &id, Some(&over)).await?)?;
        }
        Command::Drop { active, over } => {
            let over = ItemId::from(over);
            settle(drag_end(&client, &mut list, &ItemId::from(active), Some(&over)).await?)?;
        }
    }

    print_items(list.items(), args.json)
}

fn settle(outcome: DragOutcome) -> Result<()> {
    match outcome {
        DragOutcome::Ignored => {
            eprintln!("item is already in place; nothing to do");
            Ok(())
        }
        DragOutcome::Synced => Ok(()),
        DragOutcome::RolledBack(err) => Err(anyhow!(err).context("server rejected the move")),
    }
}

fn print_items(items: &[Item], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    for item in items {
        println!("{:>3}  {:<8} {}", item.order, item.id.as_str(), item.name);
    }
    Ok(())
}
