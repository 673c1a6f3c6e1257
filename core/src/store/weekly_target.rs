use super::{conversion_error, PlanStore};
use crate::{
    error::{PlanError, PlanResult},
    gateway::WeekKey,
    schedule::{TargetKpi, WeeklyTarget},
};
use rusqlite::params;

impl PlanStore {
    // ── Weekly targets ────────────────────────────────────────────

    pub(super) fn upsert_weekly_target_rows(&self, rows: &[WeeklyTarget]) -> PlanResult<()> {
        // Joins the caller's transaction when one is already open.
        let tx = if self.conn.is_autocommit() {
            Some(self.conn.unchecked_transaction()?)
        } else {
            None
        };
        {
            let mut stmt = self.conn.prepare(
                "INSERT INTO weekly_target
                    (campaign_id, kpi, kpi_order, year, month, week, target, achieved)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(campaign_id, kpi, year, month, week) DO UPDATE SET
                    target = excluded.target,
                    kpi_order = excluded.kpi_order",
            )?;
            for r in rows {
                stmt.execute(params![
                    r.campaign_id,
                    r.kpi.label(),
                    kpi_order(r.kpi),
                    r.year,
                    r.month,
                    r.week,
                    r.target,
                    r.achieved,
                ])?;
            }
        }
        if let Some(tx) = tx {
            tx.commit()?;
        }
        log::debug!("upserted {} weekly target rows", rows.len());
        Ok(())
    }

    pub(super) fn weekly_target_rows(&self, campaign_id: &str) -> PlanResult<Vec<WeeklyTarget>> {
        let mut stmt = self.conn.prepare(
            "SELECT campaign_id, kpi, year, month, week, target, achieved
             FROM weekly_target WHERE campaign_id = ?1
             ORDER BY year, month, kpi_order, week",
        )?;
        let rows = stmt.query_map(params![campaign_id], |row| {
            let label: String = row.get(1)?;
            let kpi = TargetKpi::from_label(&label)
                .ok_or_else(|| conversion_error(1, format!("unknown KPI label '{label}'")))?;
            Ok(WeeklyTarget {
                campaign_id: row.get(0)?,
                kpi,
                year: row.get(2)?,
                month: row.get(3)?,
                week: row.get(4)?,
                target: row.get(5)?,
                achieved: row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub(super) fn update_achieved(
        &self,
        campaign_id: &str,
        key: WeekKey,
        achieved: i64,
    ) -> PlanResult<()> {
        if achieved < 0 {
            return Err(PlanError::InvalidGoal {
                field: "achieved",
                value: achieved as f64,
            });
        }
        let changed = self.conn.execute(
            "UPDATE weekly_target SET achieved = ?1
             WHERE campaign_id = ?2 AND kpi = ?3 AND year = ?4 AND month = ?5 AND week = ?6",
            params![achieved, campaign_id, key.kpi.label(), key.year, key.month, key.week],
        )?;
        if changed == 0 {
            return Err(PlanError::TargetRowNotFound {
                kpi:   key.kpi.label().to_string(),
                year:  key.year,
                month: key.month,
                week:  key.week,
            });
        }
        Ok(())
    }
}

fn kpi_order(kpi: TargetKpi) -> i64 {
    TargetKpi::ALL
        .iter()
        .position(|k| *k == kpi)
        .map(|i| i as i64)
        .unwrap_or(i64::MAX)
}
