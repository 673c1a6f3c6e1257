//! Persistence seam between the planner and whatever stores campaigns.
//!
//! RULE: the calculator never touches a gateway. Only the Planner does,
//! after a calculation has succeeded.

use crate::{
    error::PlanResult,
    funnel::{FunnelOutput, PlanInput},
    schedule::{TargetKpi, WeeklyTarget},
    types::{CampaignId, PeriodMonths},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub campaign_id:   CampaignId,
    pub name:          String,
    pub go_live:       NaiveDate,
    pub period_months: PeriodMonths,
}

/// Address of one weekly cell in the progress table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekKey {
    pub kpi:   TargetKpi,
    pub year:  i32,
    pub month: u32,
    pub week:  u32,
}

pub trait CampaignGateway {
    /// Insert or update by name. Keeps the existing id on update.
    fn upsert_campaign(
        &self,
        name: &str,
        go_live: NaiveDate,
        period_months: PeriodMonths,
    ) -> PlanResult<Campaign>;

    /// Most recently created campaign.
    fn latest_campaign(&self) -> PlanResult<Option<Campaign>>;

    /// Insert or update targets. Previously entered `achieved` values survive.
    fn upsert_weekly_targets(&self, rows: &[WeeklyTarget]) -> PlanResult<()>;

    fn weekly_targets(&self, campaign_id: &str) -> PlanResult<Vec<WeeklyTarget>>;

    fn set_achieved(&self, campaign_id: &str, key: WeekKey, achieved: i64) -> PlanResult<()>;

    fn save_result_snapshot(
        &self,
        campaign_id: &str,
        input: &PlanInput,
        output: &FunnelOutput,
    ) -> PlanResult<()>;

    fn latest_result_snapshot(&self, campaign_id: &str) -> PlanResult<Option<FunnelOutput>>;

    /// Run `f` so that its writes land together or not at all.
    fn with_transaction<T, F>(&self, f: F) -> PlanResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> PlanResult<T>,
    {
        f(self)
    }
}
