use sqlx::Connection;
use tracing::{debug, info};

use crate::{
    configuration::Config,
    dao::{ConnectOptions, DBConnection, PoolOption, PoolType},
    error::Error,
    model::{Reward, Table},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub rewards: Table<Reward>,
    pub pool: PoolType,
}

impl DatabasePool {
    /// Opens the single connection used for the whole run.
    ///
    /// A direct connection is tried first so that a refused or rejected
    /// connection fails immediately with its cause; the pool would keep
    /// retrying until its acquire timeout and report only `PoolTimedOut`.
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let options = ConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .database(&config.db_name)
            .username(&config.db_user)
            .password(&config.db_password);

        debug!(
            "Connecting to {}:{}/{} as {}",
            config.db_host, config.db_port, config.db_name, config.db_user
        );

        let connection = DBConnection::connect_with(&options).await?;
        connection.close().await?;

        let pool = PoolOption::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            rewards: Table::new(pool.clone()),
            pool,
        }
    }

    /// Creates the `rewards` table when it is missing.
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        if self.rewards.is_table_exists().await? {
            debug!("Table rewards exists");
            return Ok(());
        }

        self.rewards.create_table().await?;
        info!("Created table rewards");

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::Duration};

    fn unreachable_config() -> Config {
        Config {
            db_host: String::from("127.0.0.1"),
            db_port: 0,
            db_name: String::from("kraken"),
            db_user: String::from("kraken"),
            db_password: String::from("kraken"),
            currencies: vec![String::from("BTC")],
            data_dir: PathBuf::from("."),
        }
    }

    #[tokio::test]
    async fn test_port_zero_fails_fast_with_cause() {
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            DatabasePool::new(&unreachable_config()),
        )
        .await
        .expect("connection attempt must not wait for the pool timeout");

        match result {
            Err(Error::SQL(sqlx::Error::Io(_))) => {},
            Err(e) => panic!("expected the io cause, got: {:?}", e),
            Ok(_) => panic!("connection to port 0 must fail"),
        }
    }
}
