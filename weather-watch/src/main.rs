use tracing::info;
use tracing_subscriber::EnvFilter;

use weather_watch::engine::DecisionEngine;
use weather_watch::http::UserAgent;
use weather_watch::observations::{
    CachedObservationSource, ObservationClient, ObservationClientConfig,
};
use weather_watch::settings::Settings;
use weather_watch::stations::{StationClient, StationClientConfig};
use weather_watch::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("weather_watch=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env();
    let user_agent = UserAgent::for_contact(&settings.contact);
    let engine_config = settings.engine.clone();

    let station_config = StationClientConfig::new(user_agent.clone())
        .with_base_url(&settings.base_url)
        .with_timeouts(engine_config.connect_timeout, engine_config.request_timeout);
    let station_client =
        StationClient::new(station_config).expect("Failed to create station client");

    let observation_config = ObservationClientConfig::new(user_agent.clone())
        .with_connect_timeout(engine_config.connect_timeout)
        .with_timeout(engine_config.request_timeout);
    let observation_client =
        ObservationClient::new(observation_config).expect("Failed to create observation client");
    let observations = CachedObservationSource::new(
        observation_client,
        &engine_config.observation_cache_config(),
    );

    let engine = DecisionEngine::new(station_client, observations, engine_config);
    let app = create_router(AppState::new(engine));

    info!(
        addr = %settings.bind,
        upstream = %settings.base_url,
        user_agent = %user_agent,
        "weather-watch listening"
    );
    info!("GET  /health");
    info!("GET  /check/rain?lat=..&lon=..");
    info!("GET  /check/freeze?lat=..&lon=..");
    info!("GET  /stations?lat=..&lon=..");
    info!("POST /stations/cache/clear");

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
