//! Reading of `staking_rewards_<CURRENCY>.csv` exports.
//!
//! Lines are `ledger_id;timestamp;asset;amount;balance` after a header line.
//! The file is walked once, lazily; a line that does not parse is reported
//! and skipped without affecting the rest of the file.

use std::{fs::File, io, path::Path};

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::{
    error::Error,
    helpers::{columns, parse_reward_record},
    model::Reward,
};

pub type RawRecord = Result<StringRecord, csv::Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportMode {
    /// Every data line of the file.
    All,
    /// Only the lines after the first one whose timestamp equals the value.
    After(String),
}

#[derive(Debug, Default)]
pub struct RewardBatch {
    pub rewards: Vec<Reward>,
    pub skipped: usize,
    /// Always true for [`ImportMode::All`].
    pub boundary_found: bool,
}

/// Yields the records after the boundary record, dropping everything up to
/// and including it.
pub struct AfterBoundary<I> {
    records: I,
    boundary: String,
    found: bool,
    malformed: usize,
}

impl<I> AfterBoundary<I>
where
    I: Iterator<Item = RawRecord>,
{
    pub fn new(records: I, boundary: impl Into<String>) -> Self {
        AfterBoundary {
            records,
            boundary: boundary.into(),
            found: false,
            malformed: 0,
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }

    /// Dropped records that were unreadable or had no timestamp field.
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

impl<I> Iterator for AfterBoundary<I>
where
    I: Iterator<Item = RawRecord>,
{
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        while !self.found {
            match self.records.next()? {
                Ok(record)
                    if record.get(columns::TIMESTAMP)
                        == Some(self.boundary.as_str()) =>
                {
                    self.found = true;
                },
                Ok(record) if record.len() <= columns::TIMESTAMP => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    warn!("Failed to parse line! Line {}: no timestamp field", line);
                    self.malformed += 1;
                },
                Ok(_) => {},
                Err(e) => {
                    warn!("Failed to parse line! {}", e);
                    self.malformed += 1;
                },
            }
        }

        self.records.next()
    }
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b';')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .trim(Trim::All);
    builder
}

pub fn open(path: &Path) -> Result<Reader<File>, Error> {
    Ok(reader_builder().from_path(path)?)
}

pub fn records<R: io::Read>(reader: Reader<R>) -> impl Iterator<Item = RawRecord> {
    reader.into_records()
}

fn collect<I>(records: I) -> (Vec<Reward>, usize)
where
    I: Iterator<Item = RawRecord>,
{
    let mut rewards = vec![];
    let mut skipped = 0;

    for record in records {
        let parsed = record.map_err(Error::from).and_then(|record| {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            parse_reward_record(&record, line)
        });

        match parsed {
            Ok(reward) => rewards.push(reward),
            Err(e) => {
                warn!("Failed to parse line! {}", e);
                skipped += 1;
            },
        }
    }

    (rewards, skipped)
}

pub fn read_rewards_from<R: io::Read>(
    reader: Reader<R>,
    mode: &ImportMode,
) -> RewardBatch {
    match mode {
        ImportMode::All => {
            let (rewards, skipped) = collect(records(reader));
            RewardBatch {
                rewards,
                skipped,
                boundary_found: true,
            }
        },
        ImportMode::After(boundary) => {
            let mut rows = AfterBoundary::new(records(reader), boundary.as_str());
            let (rewards, skipped) = collect(&mut rows);
            RewardBatch {
                rewards,
                skipped: skipped + rows.malformed(),
                boundary_found: rows.found(),
            }
        },
    }
}

pub fn read_rewards(path: &Path, mode: &ImportMode) -> Result<RewardBatch, Error> {
    let reader = open(path)?;
    Ok(read_rewards_from(reader, mode))
}
