use std::process::ExitCode;

use chat_bridge::config::Config;
use chat_bridge::routes::configure_routes;
use chat_bridge::state::AppState;
use chat_bridge::{logging, reply};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let generator = match reply::create_generator(&config.reply_backend) {
        Ok(generator) => generator,
        Err(e) => {
            error!(error = %e, "failed to set up reply generator");
            return ExitCode::FAILURE;
        }
    };

    let addr = config.socket_addr();
    let routes = configure_routes(AppState::new(&config, generator));

    info!(
        %addr,
        auth = config.api_key.is_some(),
        backend = ?config.reply_backend,
        "chat bridge listening"
    );
    warp::serve(routes).run(addr).await;

    ExitCode::SUCCESS
}
