use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result};
use log::info;
use valut::{RateStore, api, config::Config};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let store = RateStore::connect(&config)
        .await
        .with_context(|| format!("Can't open database {}", config.database_url))?;
    store
        .initialize()
        .await
        .context("Can't initialize the exchange_rates schema")?;

    let data = web::Data::new(store.clone());

    info!("Listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(api::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("Can't bind to {}", config.bind_addr))?
    .run()
    .await?;

    store.close().await;
    info!("Shut down");

    Ok(())
}
