//! The planner: calculate, save, and read back progress.
//!
//! ORDER on every save (fixed):
//!   1. Calculate the funnel (pure; errors stop everything).
//!   2. Upsert the campaign by name.
//!   3. Upsert the weekly target rows.
//!   4. Store the result snapshot.
//!
//! Steps 2 to 4 share one gateway transaction.
//!
//! A failure in steps 2 to 4 does not discard the calculation: the caller gets
//! the output back alongside the save error.

use crate::{
    config::PlannerConfig,
    error::{PlanError, PlanResult},
    funnel::{self, FunnelOutput, PlanInput},
    gateway::{Campaign, CampaignGateway, WeekKey},
    schedule::{self, WeeklyTarget},
    tracking::{self, LadderStep},
    types::PeriodMonths,
};
use chrono::NaiveDate;
use serde::Serialize;

pub struct Planner<G: CampaignGateway> {
    pub config: PlannerConfig,
    gateway:    G,
}

/// Result of calculate-and-save. `output` is present whenever the
/// calculation itself succeeded.
#[derive(Debug)]
pub struct SaveOutcome {
    pub output:   FunnelOutput,
    pub campaign: Option<Campaign>,
    pub error:    Option<PlanError>,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub campaign: Campaign,
    pub offset:   u32,
    pub year:     i32,
    pub month:    u32,
    pub weeks:    Vec<WeeklyTarget>,
    pub ladder:   Vec<LadderStep>,
}

pub fn campaign_name(go_live: NaiveDate, period_months: PeriodMonths) -> String {
    format!("Campaign {period_months}M {}", go_live.format("%Y-%m-%d"))
}

impl<G: CampaignGateway> Planner<G> {
    pub fn new(config: PlannerConfig, gateway: G) -> Self {
        Self { config, gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Pure pass-through to the calculator.
    pub fn calculate(&self, input: &PlanInput) -> PlanResult<FunnelOutput> {
        funnel::calculate(input)
    }

    pub fn calculate_and_save(
        &self,
        input: &PlanInput,
        go_live: NaiveDate,
        period_months: PeriodMonths,
    ) -> PlanResult<SaveOutcome> {
        schedule::validate_period(period_months)?;
        let output = funnel::calculate(input)?;

        match self.save(input, &output, go_live, period_months) {
            Ok(campaign) => {
                log::info!(
                    "saved campaign '{}' ({} months from {go_live})",
                    campaign.name,
                    campaign.period_months
                );
                Ok(SaveOutcome { output, campaign: Some(campaign), error: None })
            }
            Err(e) => {
                log::warn!("calculation completed but saving targets failed: {e}");
                Ok(SaveOutcome { output, campaign: None, error: Some(e) })
            }
        }
    }

    fn save(
        &self,
        input: &PlanInput,
        output: &FunnelOutput,
        go_live: NaiveDate,
        period_months: PeriodMonths,
    ) -> PlanResult<Campaign> {
        let name = campaign_name(go_live, period_months);
        self.gateway.with_transaction(|gateway| {
            let campaign = gateway.upsert_campaign(&name, go_live, period_months)?;
            let rows =
                schedule::build_weekly_targets(&campaign.campaign_id, output, go_live, period_months)?;
            gateway.upsert_weekly_targets(&rows)?;
            gateway.save_result_snapshot(&campaign.campaign_id, input, output)?;
            Ok(campaign)
        })
    }

    /// Weekly rows and ladder for the latest campaign's month at `offset`.
    pub fn month_view(&self, offset: u32) -> PlanResult<MonthView> {
        let campaign = self
            .gateway
            .latest_campaign()?
            .ok_or(PlanError::CampaignNotFound)?;
        let (year, month) =
            tracking::month_at_offset(campaign.go_live, offset, campaign.period_months);
        let offset = offset.min(campaign.period_months.saturating_sub(1));

        let rows = self.gateway.weekly_targets(&campaign.campaign_id)?;
        let ladder = tracking::ladder(&rows, year, month);
        let weeks = rows
            .into_iter()
            .filter(|r| r.year == year && r.month == month)
            .collect();

        Ok(MonthView { campaign, offset, year, month, weeks, ladder })
    }

    /// Record what was actually achieved in one week of the latest campaign.
    pub fn set_achieved(&self, key: WeekKey, achieved: i64) -> PlanResult<()> {
        let campaign = self
            .gateway
            .latest_campaign()?
            .ok_or(PlanError::CampaignNotFound)?;
        self.gateway.set_achieved(&campaign.campaign_id, key, achieved)?;
        log::debug!(
            "achieved {} = {achieved} ({}-{:02} week {})",
            key.kpi,
            key.year,
            key.month,
            key.week
        );
        Ok(())
    }

    pub fn latest_output(&self) -> PlanResult<Option<FunnelOutput>> {
        match self.gateway.latest_campaign()? {
            Some(c) => self.gateway.latest_result_snapshot(&c.campaign_id),
            None => Ok(None),
        }
    }
}
