//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The planner calls store methods through CampaignGateway; it never
//! executes SQL directly.

use crate::{
    error::PlanResult,
    funnel::{FunnelOutput, PlanInput},
    gateway::{Campaign, CampaignGateway, WeekKey},
    schedule::WeeklyTarget,
    types::PeriodMonths,
};
use chrono::NaiveDate;
use rusqlite::Connection;

mod campaign;
mod snapshot;
mod weekly_target;

pub struct PlanStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl PlanStore {
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    pub fn reopen(&self) -> PlanResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_campaigns.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_weekly_targets.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_result_snapshots.sql"))?;
        Ok(())
    }
}

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, msg.into())
}

impl CampaignGateway for PlanStore {
    fn upsert_campaign(
        &self,
        name: &str,
        go_live: NaiveDate,
        period_months: PeriodMonths,
    ) -> PlanResult<Campaign> {
        self.upsert_campaign_row(name, go_live, period_months)
    }

    fn latest_campaign(&self) -> PlanResult<Option<Campaign>> {
        self.latest_campaign_row()
    }

    fn upsert_weekly_targets(&self, rows: &[WeeklyTarget]) -> PlanResult<()> {
        self.upsert_weekly_target_rows(rows)
    }

    fn weekly_targets(&self, campaign_id: &str) -> PlanResult<Vec<WeeklyTarget>> {
        self.weekly_target_rows(campaign_id)
    }

    fn set_achieved(&self, campaign_id: &str, key: WeekKey, achieved: i64) -> PlanResult<()> {
        self.update_achieved(campaign_id, key, achieved)
    }

    fn save_result_snapshot(
        &self,
        campaign_id: &str,
        input: &PlanInput,
        output: &FunnelOutput,
    ) -> PlanResult<()> {
        self.insert_result_snapshot(campaign_id, input, output)
    }

    fn latest_result_snapshot(&self, campaign_id: &str) -> PlanResult<Option<FunnelOutput>> {
        self.latest_result_snapshot_row(campaign_id)
    }

    /// Dropping the transaction on error rolls every write back.
    fn with_transaction<T, F>(&self, f: F) -> PlanResult<T>
    where
        F: FnOnce(&Self) -> PlanResult<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}
