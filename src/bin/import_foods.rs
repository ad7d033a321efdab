//! Import a food fixture into the database
//! Usage: cargo run --bin import_foods -- <foods.json>

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let fixture = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: import_foods <foods.json>");
            std::process::exit(2);
        }
    };

    let config = nutrilog::config::Config::from_env();
    println!("Database: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = nutrilog::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        nutrilog::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let report = nutrilog::import::import_file(&database, &fixture)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
