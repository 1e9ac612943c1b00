use std::{net::SocketAddr, process::ExitCode};

use aula_bridge::{
    Bridge,
    clap::Parser,
    settings::{build_config, build_file_path, command::Args},
};
use axum::http::{Method, header};
use enviroment::build_address_http;
use middleware::tower_trace;
use server::build_routes;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

mod enviroment;
mod error;
mod logging;
mod middleware;
mod server;
mod wrappers;

mod doc;

const TARGET_MAIN: &str = "Aula-Http";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut file_path = args.file_path;
    if file_path.is_empty() {
        file_path = build_file_path();
    }

    let config = match build_config(args.env_config, &file_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let _logging = logging::init_logging(&config.logging);

    let address = build_address_http();
    let listener_http = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(TARGET_MAIN, "Can not bind {}: {}", address, e);
            return ExitCode::FAILURE;
        }
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    let bridge = match Bridge::build(config, None).await {
        Ok(bridge) => bridge,
        Err(e) => {
            error!(TARGET_MAIN, "Can not start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let token = bridge.token().clone();

    info!(TARGET_MAIN, "Listening on {}", address);
    let served = axum::serve(
        listener_http,
        tower_trace(build_routes(bridge))
            .layer(cors)
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        token.cancelled().await;
    })
    .await;

    match served {
        Ok(()) => {
            info!(TARGET_MAIN, "Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(TARGET_MAIN, "Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
