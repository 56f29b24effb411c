use portfolio::app_state::AppState;
use portfolio::configuration::get_configuration;
use portfolio::create_app;
use portfolio::errors::Error;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let configuration = get_configuration()?;
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )?;
    let app_state = AppState::init(&configuration);
    let app = create_app(&configuration.application, app_state);
    let listener = TcpListener::bind(addr).await?;
    info!("Server is running on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
