use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use tracing::{error, info, warn};

use crate::{
    connection::handle_client_connection,
    key_value_store::KeyValueStore,
    rdb::{Persistence, RdbFile},
};

pub const DEFAULT_PORT: u16 = 6379;

/// Command line flags of the server binary.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "respkv", version, about = "An in-memory key-value store speaking RESP")]
pub struct ServerArgs {
    /// The port to listen on
    #[arg(short, long, env = "RESPKV_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// The address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,
    /// Directory holding the snapshot file
    #[arg(long, default_value = ".")]
    pub dir: String,
    /// Name of the snapshot file
    #[arg(long, default_value = "dump.rdb")]
    pub dbfilename: String,
}

/// Server configuration shared by all connections. CONFIG SET writes to it.
#[derive(Debug)]
pub struct RedisServer {
    pub port: u16,
    pub bind: String,
    pub rdb_directory: String,
    pub rdb_filename: String,
}

impl RedisServer {
    pub fn new(args: ServerArgs) -> Self {
        RedisServer {
            port: args.port,
            bind: args.bind,
            rdb_directory: args.dir,
            rdb_filename: args.dbfilename,
        }
    }

    /// Snapshot storage for the current `dir` and `dbfilename`.
    pub fn persistence(&self) -> RdbFile {
        RdbFile::new(&self.rdb_directory, &self.rdb_filename)
    }

    /// Binds the listener, loads the snapshot and serves clients. Only
    /// returns on a startup failure.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = format!("{}:{}", self.bind, self.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;

        let store = Arc::new(Mutex::new(KeyValueStore::new()));
        load_snapshot(&self.persistence(), &store).await;

        serve(listener, Arc::new(RwLock::new(self)), store).await
    }
}

/// Restores the keyspace from `persistence`. A corrupt snapshot is logged
/// and the server starts empty.
pub async fn load_snapshot(persistence: &RdbFile, store: &Mutex<KeyValueStore>) {
    match persistence.load() {
        Ok(snapshot) => {
            let keys = snapshot.entries.len();
            store.lock().await.restore(snapshot);

            if keys > 0 {
                info!(keys, path = %persistence.path().display(), "snapshot loaded");
            }
        }
        Err(e) => {
            warn!(error = %e, path = %persistence.path().display(), "ignoring unreadable snapshot");
        }
    }
}

/// Accepts connections on `listener`, one task per client.
pub async fn serve(
    listener: TcpListener,
    server: Arc<RwLock<RedisServer>>,
    store: Arc<Mutex<KeyValueStore>>,
) -> anyhow::Result<()> {
    info!("listening on {}", listener.local_addr()?);

    loop {
        let (stream, client_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "failed to accept connection");
                continue;
            }
        };

        tokio::spawn(handle_client_connection(
            stream,
            client_address.to_string(),
            Arc::clone(&server),
            Arc::clone(&store),
        ));
    }
}
