use anyhow::Context;
use tankobon_server::{get_configuration, get_db_connection_pool, initialize_tracing, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_tracing("tankobon_server".into(), "info".into(), std::io::stdout);

    let configuration = get_configuration().context("failed to read configuration")?;
    let db_pool = get_db_connection_pool(&configuration.database);

    let application = Application::build(configuration, db_pool)
        .await
        .context("failed to build application")?;
    tracing::info!(port = application.port(), "starting api server");
    application
        .run_until_stopped()
        .await
        .context("api server crashed")?;
    Ok(())
}
