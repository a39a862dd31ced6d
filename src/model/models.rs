use chrono::NaiveDateTime;
use sqlx::FromRow;

/// One staking reward event as stored in the `rewards` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reward {
    pub ledger_id: String,
    pub asset: String,
    pub distributed: NaiveDateTime,
    pub amount: f64,
    pub balance: f64,
}
