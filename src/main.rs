use std::net::SocketAddr;
use tokio::net::TcpListener;

use laddr::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let pool = laddr::db::init_pool(&config.database_url).await;

    let app = laddr::build_app(pool, config.linkedin.clone(), false).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.unwrap();

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}
