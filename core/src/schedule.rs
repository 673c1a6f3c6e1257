//! Weekly target schedule.
//!
//! Spreads each funnel total evenly over the campaign months, then over
//! four tracked weeks per month. This is the only place values are rounded
//! (up, so the weekly targets never undershoot the plan).

use crate::{
    error::{PlanError, PlanResult},
    funnel::FunnelOutput,
    types::{CampaignId, PeriodMonths, MAX_PERIOD_MONTHS, WEEKS_PER_MONTH},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The KPIs tracked week by week. Labels are stable storage keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TargetKpi {
    MeetingsLinkedIn,
    MeetingsEmail,
    MeetingsCall,
    PositiveRepliesLinkedIn,
    TotalRepliesLinkedIn,
    ConnectionRequestsLinkedIn,
    PositiveRepliesEmail,
    TotalRepliesEmail,
    EmailContacts,
    PositiveResponsesCall,
    TotalResponsesCall,
    PhoneContacts,
}

impl TargetKpi {
    /// Schedule order.
    pub const ALL: [TargetKpi; 12] = [
        TargetKpi::MeetingsLinkedIn,
        TargetKpi::MeetingsEmail,
        TargetKpi::MeetingsCall,
        TargetKpi::PositiveRepliesLinkedIn,
        TargetKpi::TotalRepliesLinkedIn,
        TargetKpi::ConnectionRequestsLinkedIn,
        TargetKpi::PositiveRepliesEmail,
        TargetKpi::TotalRepliesEmail,
        TargetKpi::EmailContacts,
        TargetKpi::PositiveResponsesCall,
        TargetKpi::TotalResponsesCall,
        TargetKpi::PhoneContacts,
    ];

    /// Ladder order: top of each channel's funnel down to its meetings.
    pub const LADDER: [TargetKpi; 12] = [
        TargetKpi::ConnectionRequestsLinkedIn,
        TargetKpi::TotalRepliesLinkedIn,
        TargetKpi::PositiveRepliesLinkedIn,
        TargetKpi::MeetingsLinkedIn,
        TargetKpi::EmailContacts,
        TargetKpi::TotalRepliesEmail,
        TargetKpi::PositiveRepliesEmail,
        TargetKpi::MeetingsEmail,
        TargetKpi::PhoneContacts,
        TargetKpi::TotalResponsesCall,
        TargetKpi::PositiveResponsesCall,
        TargetKpi::MeetingsCall,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TargetKpi::MeetingsLinkedIn           => "Meetings via LinkedIn",
            TargetKpi::MeetingsEmail              => "Meetings via Email",
            TargetKpi::MeetingsCall               => "Meetings via Call",
            TargetKpi::PositiveRepliesLinkedIn    => "Positive Replies LinkedIn",
            TargetKpi::TotalRepliesLinkedIn       => "Total Replies LinkedIn",
            TargetKpi::ConnectionRequestsLinkedIn => "Connection Requests to Send (LinkedIn)",
            TargetKpi::PositiveRepliesEmail       => "Positive Replies Email",
            TargetKpi::TotalRepliesEmail          => "Total Replies Email",
            TargetKpi::EmailContacts              => "Email Contacts Required",
            TargetKpi::PositiveResponsesCall      => "Positive Responses from Call",
            TargetKpi::TotalResponsesCall         => "Total Responses from Call",
            TargetKpi::PhoneContacts              => "Phone Contacts Required (Call)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// The funnel stage this KPI tracks, over the whole campaign.
    pub fn total_from(&self, out: &FunnelOutput) -> f64 {
        match self {
            TargetKpi::MeetingsLinkedIn           => out.linkedin.meetings,
            TargetKpi::MeetingsEmail              => out.email.meetings,
            TargetKpi::MeetingsCall               => out.call.meetings,
            TargetKpi::PositiveRepliesLinkedIn    => out.linkedin.positive_replies,
            TargetKpi::TotalRepliesLinkedIn       => out.linkedin.total_replies,
            TargetKpi::ConnectionRequestsLinkedIn => out.linkedin.connection_requests,
            TargetKpi::PositiveRepliesEmail       => out.email.positive_replies,
            TargetKpi::TotalRepliesEmail          => out.email.total_replies,
            TargetKpi::EmailContacts              => out.email.contacts,
            TargetKpi::PositiveResponsesCall      => out.call.positive_responses,
            TargetKpi::TotalResponsesCall         => out.call.total_responses,
            TargetKpi::PhoneContacts              => out.call.contacts,
        }
    }
}

impl fmt::Display for TargetKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One editable cell of the progress table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyTarget {
    pub campaign_id: CampaignId,
    pub kpi:         TargetKpi,
    pub year:        i32,
    pub month:       u32,
    pub week:        u32,
    pub target:      i64,
    pub achieved:    i64,
}

/// Calendar (year, month) `offset` months after `start`'s month.
pub fn shift_month(start: NaiveDate, offset: u32) -> (i32, u32) {
    let index = i64::from(start.year()) * 12 + i64::from(start.month0()) + i64::from(offset);
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// Campaigns run for 1 to `MAX_PERIOD_MONTHS` months.
pub fn validate_period(period_months: PeriodMonths) -> PlanResult<()> {
    if period_months == 0 || period_months > MAX_PERIOD_MONTHS {
        return Err(PlanError::InvalidGoal {
            field: "period_months",
            value: f64::from(period_months),
        });
    }
    Ok(())
}

pub fn monthly_target(total: f64, period_months: PeriodMonths) -> i64 {
    (total / period_months as f64).ceil() as i64
}

pub fn weekly_target(monthly: i64) -> i64 {
    (monthly as f64 / WEEKS_PER_MONTH as f64).ceil() as i64
}

/// Every (KPI, month, week) row for the campaign, achieved starting at 0.
pub fn build_weekly_targets(
    campaign_id: &str,
    out: &FunnelOutput,
    go_live: NaiveDate,
    period_months: PeriodMonths,
) -> PlanResult<Vec<WeeklyTarget>> {
    validate_period(period_months)?;

    let mut rows = Vec::with_capacity(
        (period_months * WEEKS_PER_MONTH) as usize * TargetKpi::ALL.len(),
    );
    for m in 0..period_months {
        let (year, month) = shift_month(go_live, m);
        for kpi in TargetKpi::ALL {
            let weekly = weekly_target(monthly_target(kpi.total_from(out), period_months));
            for week in 1..=WEEKS_PER_MONTH {
                rows.push(WeeklyTarget {
                    campaign_id: campaign_id.to_string(),
                    kpi,
                    year,
                    month,
                    week,
                    target: weekly,
                    achieved: 0,
                });
            }
        }
    }
    Ok(rows)
}
