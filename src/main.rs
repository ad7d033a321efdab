//! Nutrilog
//!
//! An MCP server for a food database and food log.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrilog::build_info;
use nutrilog::config::Config;
use nutrilog::db::{self, Database};
use nutrilog::mcp::NutrilogService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = NutrilogService::new(&config, database);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
