use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use csv::StringRecord;

use crate::{error::Error, model::Reward};

pub const CONFIG_NAME: &str = "krakenimport.conf";
pub const REWARD_FILE_BASE_NAME: &str = "staking_rewards_";
pub const REWARD_FILE_EXTENSION: &str = "csv";

pub const LEDGER_ID_MAX_LEN: usize = 19;
pub const ASSET_MAX_LEN: usize = 10;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Column positions of a reward line: `ledger_id;timestamp;asset;amount;balance`.
pub mod columns {
    pub const LEDGER_ID: usize = 0;
    pub const TIMESTAMP: usize = 1;
    pub const ASSET: usize = 2;
    pub const AMOUNT: usize = 3;
    pub const BALANCE: usize = 4;
    pub const COUNT: usize = 5;
}

pub fn reward_file_name(currency: &str) -> String {
    format!(
        "{}{}.{}",
        REWARD_FILE_BASE_NAME, currency, REWARD_FILE_EXTENSION
    )
}

pub fn reward_file_path(dir: &Path, currency: &str) -> PathBuf {
    dir.join(reward_file_name(currency))
}

pub fn split_currencies(data: &str) -> Vec<String> {
    data.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, Error> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(date_time);
        }
    }

    let date_time = DateTime::parse_from_rfc3339(value)?;
    Ok(date_time.naive_utc())
}

pub fn parse_reward_record(
    record: &StringRecord,
    line: u64,
) -> Result<Reward, Error> {
    let malformed = |reason: String| Error::MalformedLine { line, reason };

    if record.len() < columns::COUNT {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            columns::COUNT,
            record.len()
        )));
    }

    let field = |index: usize| record.get(index).unwrap_or_default();

    let ledger_id = field(columns::LEDGER_ID);
    if ledger_id.is_empty() || ledger_id.chars().count() > LEDGER_ID_MAX_LEN {
        return Err(malformed(format!("invalid ledger id '{}'", ledger_id)));
    }

    let asset = field(columns::ASSET);
    if asset.is_empty() || asset.chars().count() > ASSET_MAX_LEN {
        return Err(malformed(format!("invalid asset '{}'", asset)));
    }

    let distributed = parse_timestamp(field(columns::TIMESTAMP))
        .map_err(|e| malformed(format!("timestamp: {}", e)))?;
    let amount: f64 = field(columns::AMOUNT)
        .parse()
        .map_err(|e| malformed(format!("amount: {}", e)))?;
    let balance: f64 = field(columns::BALANCE)
        .parse()
        .map_err(|e| malformed(format!("balance: {}", e)))?;

    Ok(Reward {
        ledger_id: ledger_id.to_owned(),
        asset: asset.to_owned(),
        distributed,
        amount,
        balance,
    })
}
