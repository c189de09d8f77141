//! Task store server entry point.
//!
//! Loads `.env`, reads `ServerConfig`, starts logging, opens the database and
//! serves until Ctrl-C.

use log::{error, info};
use std::process::ExitCode;
use todo_core::init_logging;
use todo_server::{router, AppState, ServerConfig, TaskStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(config.log_level, &config.log_dir.to_string_lossy(), true) {
        eprintln!("logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    let store = match TaskStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=server_start module=main status=error error_code=db_open_failed db_path={} error={err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let addr = config.socket_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "event=server_start module=main status=error error_code=bind_failed addr={addr} error={err}"
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        "event=server_start module=main status=ok addr={addr} db_path={}",
        config.db_path.display()
    );

    let app = router(AppState::new(store));
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=main status=error error={err}");
        return ExitCode::FAILURE;
    }

    info!("event=server_stop module=main status=ok");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=main status=error error={err}");
        std::future::pending::<()>().await;
    }
}
