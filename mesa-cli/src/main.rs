//! `mesa` - order desk command line
//!
//! Split and merge orders, quote promotions and watch the notification
//! stream of a Mesa backend.

mod args;
mod config;
mod logger;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mesa_client::{
    ClientError, MesaApi, NetworkHttpClient, NotificationListener, OrderDesk, PromotionQuoter,
    QuoteOutcome, SplitOptions,
};
use serde::Serialize;
use shared::models::{CartLine, OrderStatus};
use shared::order::money::format_currency;
use shared::order::{MergeRequest, SplitItem};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "mesa", version, about = "Mesa order desk")]
struct Cli {
    /// Backend base URL (overrides MESA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Access token (overrides MESA_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Notification bus address (overrides MESA_NOTIFY_ADDR)
    #[arg(long, global = true)]
    notify_addr: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MESA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List orders
    Orders {
        /// active, paid or cancelled
        #[arg(long, value_parser = args::parse_status)]
        status: Option<OrderStatus>,
    },

    /// List tables, the merge summary and orders grouped by table
    Tables,

    /// Move items of an order into a new order
    Split {
        order_id: String,
        /// ITEM=QTY, repeatable
        #[arg(long = "item", required = true, value_parser = args::parse_split_line)]
        items: Vec<(String, u32)>,
        /// Seat the new order at this table
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Split off items worth up to AMOUNT
    SplitAmount {
        order_id: String,
        amount: f64,
        /// Print the allocation without splitting
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        table: Option<String>,
    },

    /// Check whether orders can be merged
    MergeValidate {
        #[arg(required = true)]
        order_ids: Vec<String>,
    },

    /// Merge orders
    Merge {
        #[arg(required = true)]
        order_ids: Vec<String>,
        /// Append into this order (must be one of ORDER_IDS)
        #[arg(long, conflicts_with = "create_new")]
        target: Option<String>,
        /// Create a new order at --table instead of appending
        #[arg(long, requires = "table")]
        create_new: bool,
        #[arg(long)]
        table: Option<String>,
    },

    /// Quote promotions for a cart
    Quote {
        /// MENU_ITEM=QTY@PRICE, repeatable
        #[arg(long = "line", required = true, value_parser = args::parse_cart_line)]
        lines: Vec<CartLine>,
    },

    /// Print order notifications until interrupted
    Watch,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_api(config: &CliConfig) -> anyhow::Result<MesaApi<NetworkHttpClient>> {
    let session = config.session();
    let http = NetworkHttpClient::new(&config.client_config(), session.clone())
        .context("failed to build HTTP client")?;
    Ok(MesaApi::new(Arc::new(http), session))
}

async fn run(command: Command, config: &CliConfig) -> anyhow::Result<()> {
    let api = build_api(config)?;
    let desk = OrderDesk::new(api.http().clone());

    match command {
        Command::Login { email, password } => {
            let login = api
                .login(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            tracing::info!(user = %login.user.email, "Signed in");
            println!("{}", login.token);
        }

        Command::Orders { status } => print_json(&api.list_orders(status).await?)?,

        Command::Tables => {
            let tables = api.list_tables().await?;
            let summary = api.table_summary().await?;
            let groups = api.order_groups().await?;
            print_json(&serde_json::json!({
                "tables": tables,
                "summary": summary,
                "groups": groups,
            }))?;
        }

        Command::Split {
            order_id,
            items,
            table,
            notes,
        } => {
            let order = api.get_order(&order_id).await?;
            let selection = items
                .into_iter()
                .map(|(item_id, qty)| match order.find_item(&item_id) {
                    Some(item) => SplitItem::from_item(item, qty),
                    None => SplitItem::new(item_id, qty),
                })
                .collect();
            let outcome = desk
                .split_items(
                    &order,
                    selection,
                    SplitOptions {
                        table_id: table,
                        notes,
                    },
                )
                .await?;
            print_json(&outcome.response)?;
        }

        Command::SplitAmount {
            order_id,
            amount,
            dry_run,
            table,
        } => {
            let order = api.get_order(&order_id).await?;
            if dry_run {
                let plan = desk.plan_by_amount(&order, amount)?;
                for item in &plan.items {
                    let label = if item.name.is_empty() { &item.item_id } else { &item.name };
                    println!(
                        "{} x{} {}",
                        label,
                        item.quantity,
                        format_currency(item.amount())
                    );
                }
                println!(
                    "allocated {} of {}",
                    format_currency(plan.allocated),
                    format_currency(amount)
                );
                return Ok(());
            }
            let outcome = desk
                .split_by_amount(
                    &order,
                    amount,
                    SplitOptions {
                        table_id: table,
                        notes: None,
                    },
                )
                .await?;
            print_json(&outcome.response)?;
        }

        Command::MergeValidate { order_ids } => {
            let summary = api.table_summary().await?;
            let validation = desk
                .validate_merge(&order_ids, &summary)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_json(&validation)?;
        }

        Command::Merge {
            order_ids,
            target,
            create_new,
            table,
        } => {
            let request = match (create_new, table) {
                (true, Some(table)) => MergeRequest::create_new(order_ids, table),
                (_, table) => {
                    let mut request = MergeRequest::append(order_ids, target);
                    request.table_id = table;
                    request
                }
            };
            let api_ref = &api;
            let outcome = desk
                .execute_merge(&request, || async move {
                    match api_ref.table_summary().await {
                        Ok(summary) => tracing::info!(
                            active_orders = summary.active_orders,
                            occupied_tables = summary.occupied_tables,
                            "Tables refreshed"
                        ),
                        Err(e) => tracing::warn!(error = %e, "Failed to refresh tables"),
                    }
                })
                .await?;
            println!("{}", outcome.message);
        }

        Command::Quote { lines } => {
            let quoter = PromotionQuoter::new(api.http().clone());
            match quoter.quote(&lines).await? {
                QuoteOutcome::Quote(quote) => print_json(&quote)?,
                QuoteOutcome::Superseded => tracing::debug!("Quote superseded"),
            }
        }

        Command::Watch => watch(&api, config).await?,
    }

    Ok(())
}

async fn watch(api: &MesaApi<NetworkHttpClient>, config: &CliConfig) -> anyhow::Result<()> {
    let client_config = config.client_config();
    let refresher = api.start_token_refresh(client_config.refresh);
    let listener = NotificationListener::start(&client_config, api.session().token().await)
        .map_err(ClientError::from)?;
    let mut events = listener.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => println!("{}", event),
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "Notification backlog dropped"),
                Err(RecvError::Closed) => {
                    tracing::warn!("Notification stream closed");
                    break;
                }
            }
        }
    }

    listener.stop().await;
    refresher.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::from_env().merge_overrides(cli.api_url, cli.token, cli.notify_addr);

    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    tracing::debug!(api_url = %config.api_url, "Mesa desk starting");

    run(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_split() {
        let cli = Cli::try_parse_from(["mesa", "split", "o1", "--item", "a=1", "--item", "b=2"])
            .unwrap();
        match cli.command {
            Command::Split { order_id, items, .. } => {
                assert_eq!(order_id, "o1");
                assert_eq!(items, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_merge_create_new_needs_table() {
        assert!(Cli::try_parse_from(["mesa", "merge", "o1", "o2", "--create-new"]).is_err());
        assert!(
            Cli::try_parse_from(["mesa", "merge", "o1", "o2", "--create-new", "--table", "t1"])
                .is_ok()
        );
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::try_parse_from(["mesa", "tables", "--api-url", "http://pos.local"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://pos.local"));
    }
}
