//! Recompute stored rating aggregates from review rows.
//!
//! Repairs aggregates left stale when an aggregate write failed after its
//! review was stored. Reconciles a single listing with `--business`, or every
//! listing otherwise. Safe to run beside a live server: each refresh locks
//! the listing row, so it queues behind in-flight review submissions.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Report, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use pulse_backend::domain::ports::RatingReconciler;
use pulse_backend::domain::{BusinessId, ReviewIngestionService};
use pulse_backend::outbound::persistence::{
    DbPool, DieselBusinessRepository, DieselReviewRepository, PoolConfig,
};

/// `reconcile-ratings` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-ratings",
    about = "Recompute business rating aggregates from stored reviews",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Reconcile only this business id.
    #[arg(long = "business", value_name = "uuid")]
    business: Option<BusinessId>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var("DATABASE_URL").ok())?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|err| Report::new(err).wrap_err("failed to create database pool"))?;
    let service = ReviewIngestionService::new(
        Arc::new(DieselBusinessRepository::new(pool.clone())),
        Arc::new(DieselReviewRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    match args.business {
        Some(id) => {
            let business = service
                .reconcile(&id)
                .await
                .map_err(|err| eyre!("reconcile {id} failed: {err}"))?;
            println!(
                "business={} avg_rating={} review_count={}",
                business.id,
                business.rating.average(),
                business.rating.review_count()
            );
        }
        None => {
            let report = service
                .reconcile_all()
                .await
                .map_err(|err| eyre!("reconcile failed: {err}"))?;
            println!("checked={} repaired={}", report.checked, report.repaired);
        }
    }
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    from_env
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| eyre!("database URL missing: set --database-url or DATABASE_URL"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("postgres://cli"), Some("postgres://env"), "postgres://cli")]
    #[case(None, Some("postgres://env"), "postgres://env")]
    fn explicit_url_wins_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect("url resolves");
        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(Some(" "), None)]
    #[case(None, None)]
    #[case(None, Some(""))]
    fn missing_or_blank_url_is_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        assert!(
            resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
                .is_err()
        );
    }

    #[rstest]
    fn business_flag_parses_uuid() {
        let args = CliArgs::try_parse_from([
            "reconcile-ratings",
            "--business",
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        ])
        .expect("args parse");
        assert_eq!(
            args.business.map(|id| id.to_string()).as_deref(),
            Some("3fa85f64-5717-4562-b3fc-2c963f66afa6")
        );
    }
}
