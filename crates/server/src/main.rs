//! Lost & Found Server - HTTP API for the campus lost & found
//!
//! Configuration comes from an optional `server.{toml,yaml,json}` file,
//! `LOSTFOUND_SERVER__*` environment variables and a `.env` file.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
