use anyhow::Context;

use medstock_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    medstock_observability::init();

    let settings = Settings::load().context("failed to load settings")?;
    let bind_addr = settings.bind_addr.clone();

    let app = medstock_api::app::build_app(settings).context("failed to build app")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
