mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod miner;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info, warn};

use api::AppState;
use config::NodeConfig;
use error::NodeError;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(&config).map_err(std::io::Error::other)?);

    // No persistence: this only trips if the ledger was built wrong.
    if let Err(e) = state
        .ledger
        .lock()
        .expect("mutex poisoned")
        .verify_integrity()
    {
        error!("ledger integrity fault at startup: {e}");
        return Err(std::io::Error::other(NodeError::from(e)));
    }

    println!(
        "⛓️ Starting node {} at http://{}:{} (difficulty {})",
        config.node_address, config.host, config.port, config.difficulty
    );

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    if let Some(seed) = &config.seed_node {
        match state.client.announce(seed).await {
            Ok(()) => {
                state
                    .peers
                    .write()
                    .expect("lock poisoned")
                    .register(seed);
                info!("announced to seed {seed}");
            }
            Err(e) => warn!("could not announce to seed {seed}: {e}"),
        }
    }

    server.await?;

    if let Some(seed) = &config.seed_node {
        if let Err(e) = state.client.withdraw(seed).await {
            warn!("could not deregister from seed {seed}: {e}");
        }
    }
    Ok(())
}
