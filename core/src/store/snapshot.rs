use super::PlanStore;
use crate::{
    error::PlanResult,
    funnel::{FunnelOutput, PlanInput},
};
use rusqlite::{params, OptionalExtension};

impl PlanStore {
    // ── Result snapshot ───────────────────────────────────────────

    pub(super) fn insert_result_snapshot(
        &self,
        campaign_id: &str,
        input: &PlanInput,
        output: &FunnelOutput,
    ) -> PlanResult<()> {
        self.conn.execute(
            "INSERT INTO result_snapshot (campaign_id, input_json, output_json)
             VALUES (?1, ?2, ?3)",
            params![
                campaign_id,
                serde_json::to_string(input)?,
                serde_json::to_string(output)?
            ],
        )?;
        Ok(())
    }

    pub(super) fn latest_result_snapshot_row(
        &self,
        campaign_id: &str,
    ) -> PlanResult<Option<FunnelOutput>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT output_json FROM result_snapshot
                 WHERE campaign_id = ?1 ORDER BY id DESC LIMIT 1",
                params![campaign_id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }
}
