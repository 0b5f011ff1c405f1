use actix_web::{web, App, HttpServer};
use hitlist::config::db::DbConfig;
use hitlist::config::notify::NotifyConfig;
use hitlist::config::ServerConfig;
use hitlist::infra::state::build_state;
use hitlist::middleware::request_trace::RequestTrace;
use hitlist::middleware::structured_logger::StructuredLogger;
use hitlist::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let configs = ServerConfig::from_env().and_then(|server| {
        Ok((server, DbConfig::from_env()?, NotifyConfig::from_env()?))
    });
    let (server, db_config, notify_config) = match configs {
        Ok(configs) => configs,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(db_config)
        .with_notify_config(notify_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %server.host,
        port = server.port,
        notifier = app_state.notifier.name(),
        "starting hitlist backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
