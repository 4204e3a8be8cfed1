use crate::datastore::{self, memory::MemoryTodos};
use crate::libs::config::Config;
use crate::server;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,

    /// Run against the in-memory datastore backend (no credentials needed)
    #[arg(long)]
    memory: bool,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tudu=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::read()?;
    let mut server_config = config.server_or_default();
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let store = if args.memory {
        Arc::new(MemoryTodos::new()) as Arc<dyn datastore::TodoStore>
    } else {
        datastore::from_config(&config.datastore)?
    };

    server::serve(&server_config, store).await
}
