use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::{
    configuration::{Config, State},
    error::Error,
    handler::reward_file::{self, ImportMode, RewardBatch},
    helpers::reward_file_path,
    provider::DatabasePool,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Inserted {
        rows: u64,
        skipped: usize,
    },
    NothingPending {
        skipped: usize,
    },
    BoundaryNotFound {
        resume_point: String,
        skipped: usize,
    },
    MissingFile {
        path: PathBuf,
    },
}

impl ImportOutcome {
    pub fn inserted(&self) -> u64 {
        match self {
            ImportOutcome::Inserted { rows, .. } => *rows,
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<(String, Result<ImportOutcome, Error>)>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|(_, result)| result.is_err())
    }

    pub fn inserted(&self) -> u64 {
        self.results
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .map(ImportOutcome::inserted)
            .sum()
    }

    pub fn log_summary(&self) {
        for (currency, result) in &self.results {
            match result {
                Ok(ImportOutcome::Inserted { rows, skipped }) => {
                    info!("{}: inserted {} rows, skipped {} lines", currency, rows, skipped)
                },
                Ok(ImportOutcome::NothingPending { skipped }) => {
                    info!("{}: up to date, skipped {} lines", currency, skipped)
                },
                Ok(ImportOutcome::BoundaryNotFound { resume_point, .. }) => {
                    warn!("{}: no line at resume point {}, nothing imported", currency, resume_point)
                },
                Ok(ImportOutcome::MissingFile { path }) => {
                    info!("{}: no file {}", currency, path.display())
                },
                Err(e) => error!("{}: failed: {}", currency, e),
            }
        }

        info!(
            "Imported {} rows for {} currencies",
            self.inserted(),
            self.results.len()
        );
    }
}

/// Decides the outcome of a parsed file before anything touches the database.
fn pending_outcome(batch: &RewardBatch, mode: &ImportMode) -> Option<ImportOutcome> {
    if let ImportMode::After(resume_point) = mode {
        if !batch.boundary_found {
            return Some(ImportOutcome::BoundaryNotFound {
                resume_point: resume_point.to_owned(),
                skipped: batch.skipped,
            });
        }
    }

    if batch.rewards.is_empty() {
        return Some(ImportOutcome::NothingPending {
            skipped: batch.skipped,
        });
    }

    None
}

async fn import(
    database: &DatabasePool,
    path: &Path,
    mode: ImportMode,
) -> Result<ImportOutcome, Error> {
    let batch = reward_file::read_rewards(path, &mode)?;

    if let Some(outcome) = pending_outcome(&batch, &mode) {
        return Ok(outcome);
    }

    let mut tx = database.pool.begin().await?;
    let rows = database.rewards.insert_many(&batch.rewards, &mut tx).await?;
    tx.commit().await?;

    Ok(ImportOutcome::Inserted {
        rows,
        skipped: batch.skipped,
    })
}

/// Inserts every data line of `path` in one transaction.
pub async fn import_all(
    database: &DatabasePool,
    path: &Path,
) -> Result<ImportOutcome, Error> {
    import(database, path, ImportMode::All).await
}

/// Inserts the lines after the one whose timestamp equals `resume_point`.
pub async fn import_from(
    database: &DatabasePool,
    path: &Path,
    resume_point: &str,
) -> Result<ImportOutcome, Error> {
    import(database, path, ImportMode::After(resume_point.to_owned())).await
}

pub async fn import_currency(
    state: &State,
    currency: &str,
) -> Result<ImportOutcome, Error> {
    let path = reward_file_path(&state.config.data_dir, currency);

    if !path.is_file() {
        warn!("Could not find {}! Skipping", path.display());
        return Ok(ImportOutcome::MissingFile { path });
    }

    match state.database.rewards.get_last_distributed(currency).await? {
        None => {
            info!("{}: no rewards stored, importing {}", currency, path.display());
            import_all(&state.database, &path).await
        },
        Some(resume_point) => {
            info!(
                "{}: importing {} after {}",
                currency,
                path.display(),
                resume_point
            );
            import_from(&state.database, &path, &resume_point).await
        },
    }
}

/// Imports every configured currency; a failing currency does not stop the
/// following ones.
pub async fn run(state: &State) -> RunReport {
    let mut report = RunReport::default();

    for currency in &state.config.currencies {
        let result = import_currency(state, currency).await;

        if let Err(e) = &result {
            error!("{}: import failed: {}", currency, e);
        }

        report.results.push((currency.to_owned(), result));
    }

    report
}

/// Connects, prepares the schema and imports all currencies. Errors returned
/// from here abort the whole run.
pub async fn execute(config: Config) -> Result<RunReport, Error> {
    let database = DatabasePool::new(&config).await.map_err(|e| {
        error!("Error occurred when connecting to database! {}", e);
        e
    })?;

    execute_with(config, database).await
}

/// Runs the import on an open connection and closes it, also when the
/// schema cannot be prepared.
pub async fn execute_with(
    config: Config,
    database: DatabasePool,
) -> Result<RunReport, Error> {
    if let Err(e) = database.ensure_schema().await {
        error!("Failed to create rewards table! {}", e);
        database.close().await;
        return Err(e);
    }

    let state = State::new(config, database);
    let report = run(&state).await;
    state.database.close().await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::Reward;

    fn reward(ledger_id: &str) -> Reward {
        Reward {
            ledger_id: ledger_id.to_owned(),
            asset: String::from("BTC"),
            distributed: NaiveDate::from_ymd_opt(2021, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            amount: 0.1,
            balance: 1.0,
        }
    }

    #[test]
    fn test_pending_outcome_boundary_not_found() {
        let batch = RewardBatch {
            rewards: vec![],
            skipped: 1,
            boundary_found: false,
        };
        let mode = ImportMode::After(String::from("2021-05-01T00:00:00"));

        assert_eq!(
            pending_outcome(&batch, &mode),
            Some(ImportOutcome::BoundaryNotFound {
                resume_point: String::from("2021-05-01T00:00:00"),
                skipped: 1,
            })
        );
    }

    #[test]
    fn test_pending_outcome_nothing_pending() {
        let batch = RewardBatch {
            rewards: vec![],
            skipped: 2,
            boundary_found: true,
        };

        assert_eq!(
            pending_outcome(&batch, &ImportMode::All),
            Some(ImportOutcome::NothingPending { skipped: 2 })
        );
    }

    #[test]
    fn test_pending_outcome_needs_insert() {
        let batch = RewardBatch {
            rewards: vec![reward("L1"), reward("L2")],
            skipped: 0,
            boundary_found: true,
        };

        assert_eq!(pending_outcome(&batch, &ImportMode::All), None);
        assert_eq!(
            pending_outcome(&batch, &ImportMode::After(String::from("x"))),
            None
        );
    }

    #[tokio::test]
    async fn test_unreachable_database_aborts_run() {
        let config = Config {
            db_host: String::from("127.0.0.1"),
            db_port: 0,
            db_name: String::from("kraken"),
            db_user: String::from("kraken"),
            db_password: String::from("kraken"),
            currencies: vec![String::from("BTC")],
            data_dir: PathBuf::from("."),
        };

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            execute(config),
        )
        .await
        .expect("run must abort without waiting for a pool timeout");

        assert!(matches!(result, Err(Error::SQL(sqlx::Error::Io(_)))));
    }

    #[test]
    fn test_run_report() {
        let mut report = RunReport::default();
        report.results.push((
            String::from("BTC"),
            Ok(ImportOutcome::Inserted {
                rows: 3,
                skipped: 0,
            }),
        ));
        report.results.push((
            String::from("ETH"),
            Ok(ImportOutcome::MissingFile {
                path: PathBuf::from("staking_rewards_ETH.csv"),
            }),
        ));

        assert!(!report.has_failures());
        assert_eq!(report.inserted(), 3);

        report.results.push((
            String::from("DOT"),
            Err(Error::ConfigurationError(String::from("boom"))),
        ));

        assert!(report.has_failures());
        assert_eq!(report.inserted(), 3);
    }
}
