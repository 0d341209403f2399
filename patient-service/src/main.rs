mod api;
mod app;
mod config;
mod error;
mod events;
mod repos;
mod services;
mod state;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
