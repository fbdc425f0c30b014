use book_inventory::infra::config::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("book_inventory=info,tower_http=info")),
        )
        .init();

    let settings = Settings::load(std::env::args().nth(1))?;
    book_inventory::interface::http::run(settings).await
}
