use clap::Parser;
use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database};

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Hitlist database migration tool")]
struct Args {
    /// Migration command to run: up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Database URL (postgres://... or sqlite://path?mode=rwc)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    if args.database_url.contains(":memory:") {
        // An in-memory database disappears when this process exits.
        tracing::error!("in-memory SQLite is not supported for CLI migrations");
        std::process::exit(2);
    }

    let mut opt = ConnectOptions::new(args.database_url);
    opt.max_connections(1).sqlx_logging(false);

    let db = match Database::connect(opt).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command).await {
        tracing::error!(error = %e, "migration failed");
        std::process::exit(1);
    }
}
