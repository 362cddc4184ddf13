mod inspect;
mod legacy;
mod orphans;
mod seed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::Connection;
use std::env;

#[derive(Parser)]
#[command(name = "sweetie")]
#[command(about = "Sweetie database maintenance CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the database with fixture data (skipped if users exist)
    Seed,
    /// Print per-table counts and flag broken foreign keys
    Inspect,
    /// Find rows whose foreign keys point at missing parents
    CheckOrphans {
        /// Delete the orphaned rows after confirmation
        #[arg(long)]
        fix: bool,
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Drop leftover pre-migration columns. Irreversible.
    DropLegacyColumns {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn connect() -> Result<PgConnection> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    PgConnection::establish(&database_url).context("Failed to connect to the database")
}

/// Reads a y/N answer from stdin.
pub fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{} (y/N): ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut conn = connect()?;

    match cli.command {
        Commands::Seed => seed::seed(&mut conn)?,
        Commands::Inspect => inspect::inspect(&mut conn)?,
        Commands::CheckOrphans { fix, yes } => orphans::check_orphans(&mut conn, fix, yes)?,
        Commands::DropLegacyColumns { yes } => legacy::drop_legacy_columns(&mut conn, yes)?,
    }

    Ok(())
}
