use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use orderapp::{Action, ActionOutcome, Controller, ControllerConfig};
use orderapp_datastore::InMemoryDataStore;
use orderapp_events::Hub;
use orderapp_observability::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "orderapp")]
#[command(version)]
#[command(about = "Run OrderApp actions against an in-memory data store", long_about = None)]
struct Cli {
    /// Log output format (json or compact)
    #[arg(long, global = true, env = "ORDERAPP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// host:port dialed by the connectivity probe
    #[arg(long, global = true)]
    probe_addr: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bulk-insert the demo records
    AddRecords,
    /// Save the sample blogs and orders
    CreateOrders,
    /// Delete a blog by name
    DeleteBlog {
        /// Blog name (defaults to ORDERAPP_DELETE_BLOG_NAME or "new blog 6")
        #[arg(long)]
        name: Option<String>,
    },
    /// Clear the data store and start it again
    Clear,
    /// Count stored blogs
    Count,
    /// Run several actions in order against the same store
    Script {
        #[arg(value_enum, required = true)]
        actions: Vec<Action>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ControllerConfig::from_env().context("failed to read ORDERAPP_* settings")?;
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(addr) = cli.probe_addr {
        config.probe_addr = Some(addr);
    }

    orderapp_observability::tracing::init(&LogConfig {
        format: config.log_format,
        ..LogConfig::default()
    });

    let actions = match cli.command {
        Command::AddRecords => vec![Action::AddRecords],
        Command::CreateOrders => vec![Action::CreateOrders],
        Command::DeleteBlog { name } => {
            if let Some(name) = name {
                config.delete_blog_name = name;
            }
            vec![Action::DeleteBlog]
        }
        Command::Clear => vec![Action::ClearDataStore],
        Command::Count => vec![Action::TotalOrders],
        Command::Script { actions } => actions,
    };

    let hub = Hub::new();
    let store = InMemoryDataStore::with_hub(hub.clone());
    let controller = Controller::new(store, hub, config);

    controller.start().await.context("startup sequence failed")?;

    for action in actions {
        let outcome = controller
            .handle(action)
            .await
            .with_context(|| format!("{action} failed"))?;
        report(&outcome);
    }

    // Let the live queries catch up before tearing down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    tracing::info!(
        blogs = controller.observed_blog_count(),
        latest_order = ?controller.latest_order().map(|o| o.id().to_string()),
        "observed state"
    );
    controller.shutdown().await;
    Ok(())
}

fn report(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::RecordsAdded(r) => println!("saved {} records ({} failed)", r.saved, r.failed),
        ActionOutcome::OrdersCreated(Some(order)) => println!("order {} is now {}", order.id(), order.status()),
        ActionOutcome::OrdersCreated(None) => println!("no order to update"),
        ActionOutcome::BlogDeleted(true) => println!("blog deleted"),
        ActionOutcome::BlogDeleted(false) => println!("no matching blog"),
        ActionOutcome::Cleared => println!("data store cleared"),
        ActionOutcome::TotalOrders(count) => println!("{count} blog(s)"),
    }
}
