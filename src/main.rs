use anyhow::Result;
use clap::Parser;
use productseed::{connect_and_run, run, Cli, FailureKind, MemoryStore, RunError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    productseed::init_tracing();

    let cli = Cli::parse();
    let options = cli.run_options();

    let result = if cli.dry_run {
        info!("Dry run: writing to an in-memory table");
        run(MemoryStore::new(), &options).await
    } else {
        connect_and_run(&cli.db, &options).await
    };

    match result {
        Ok(summary) => {
            println!("Successfully inserted {} new products.", summary.inserted());
            if summary.report.skipped > 0 {
                println!(
                    "Skipped {} products whose code already existed.",
                    summary.report.skipped
                );
            }
            if let Some(total) = summary.total_rows {
                info!("products table now holds {} rows", total);
            }
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

fn report_failure(e: &RunError) {
    error!(kind = ?e.kind(), stage = %e.stage(), "{e}");
    eprintln!("An error occurred: {e}");
    eprintln!("{}", failure_hint(e.kind()));
}

fn failure_hint(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Connection => {
            "Check DB_HOST, DB_PORT, DB_USER and DB_PASSWORD, and that DB_NAME exists."
        }
        FailureKind::Schema => "Check that the user may create tables in DB_NAME.",
        FailureKind::Synthesis => "No products were written.",
        FailureKind::Write => "No products from this batch were committed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_hint_names_the_database() {
        let hint = failure_hint(FailureKind::Connection);
        for var in ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME"] {
            assert!(hint.contains(var), "{var} missing from {hint:?}");
        }
    }
}
