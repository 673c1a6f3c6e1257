//! Progress tracking over saved weekly targets.

use crate::{
    schedule::{shift_month, TargetKpi, WeeklyTarget},
    types::PeriodMonths,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Target,
    Achieved,
}

/// Month shown at `offset`, clamped to the campaign's months.
pub fn month_at_offset(go_live: NaiveDate, offset: u32, period_months: PeriodMonths) -> (i32, u32) {
    let last = period_months.saturating_sub(1);
    shift_month(go_live, offset.min(last))
}

pub fn month_total(rows: &[WeeklyTarget], kpi: TargetKpi, year: i32, month: u32, field: Field) -> i64 {
    rows.iter()
        .filter(|r| r.kpi == kpi && r.year == year && r.month == month)
        .map(|r| match field {
            Field::Target   => r.target,
            Field::Achieved => r.achieved,
        })
        .sum()
}

/// Achieved as a percentage of target; 0 when nothing was targeted.
pub fn achievement_rate(achieved: i64, target: i64) -> f64 {
    if target > 0 {
        achieved as f64 / target as f64 * 100.0
    } else {
        0.0
    }
}

/// Unique KPIs in the order they first appear.
pub fn kpis_in_rows(rows: &[WeeklyTarget]) -> Vec<TargetKpi> {
    let mut seen = Vec::new();
    for r in rows {
        if !seen.contains(&r.kpi) {
            seen.push(r.kpi);
        }
    }
    seen
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LadderStep {
    pub kpi:              TargetKpi,
    pub label:            String,
    pub monthly_target:   i64,
    pub monthly_achieved: i64,
    pub achievement_rate: f64,
    pub on_track:         bool,
}

/// Monthly roll-up of every KPI in ladder order.
pub fn ladder(rows: &[WeeklyTarget], year: i32, month: u32) -> Vec<LadderStep> {
    TargetKpi::LADDER
        .iter()
        .map(|&kpi| {
            let monthly_target = month_total(rows, kpi, year, month, Field::Target);
            let monthly_achieved = month_total(rows, kpi, year, month, Field::Achieved);
            LadderStep {
                kpi,
                label: kpi.label().to_string(),
                monthly_target,
                monthly_achieved,
                achievement_rate: achievement_rate(monthly_achieved, monthly_target),
                on_track: monthly_achieved >= monthly_target,
            }
        })
        .collect()
}
