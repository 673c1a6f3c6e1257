use super::{conversion_error, PlanStore};
use crate::{error::PlanResult, gateway::Campaign, types::PeriodMonths};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl PlanStore {
    // ── Campaign ──────────────────────────────────────────────────

    pub(super) fn upsert_campaign_row(
        &self,
        name: &str,
        go_live: NaiveDate,
        period_months: PeriodMonths,
    ) -> PlanResult<Campaign> {
        let new_id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO campaign (campaign_id, name, go_live, period_months)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                go_live = excluded.go_live,
                period_months = excluded.period_months",
            params![
                new_id,
                name,
                go_live.format(DATE_FORMAT).to_string(),
                period_months as i64
            ],
        )?;
        let campaign = self.conn.query_row(
            "SELECT campaign_id, name, go_live, period_months
             FROM campaign WHERE name = ?1",
            params![name],
            campaign_from_row,
        )?;
        Ok(campaign)
    }

    pub(super) fn latest_campaign_row(&self) -> PlanResult<Option<Campaign>> {
        let campaign = self
            .conn
            .query_row(
                "SELECT campaign_id, name, go_live, period_months
                 FROM campaign ORDER BY id DESC LIMIT 1",
                [],
                campaign_from_row,
            )
            .optional()?;
        Ok(campaign)
    }

    pub fn campaign_count(&self) -> PlanResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM campaign", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn campaign_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Campaign> {
    let go_live: String = row.get(2)?;
    let go_live = NaiveDate::parse_from_str(&go_live, DATE_FORMAT)
        .map_err(|e| conversion_error(2, format!("bad go_live '{go_live}': {e}")))?;
    Ok(Campaign {
        campaign_id:   row.get(0)?,
        name:          row.get(1)?,
        go_live,
        period_months: row.get::<_, i64>(3)? as PeriodMonths,
    })
}
