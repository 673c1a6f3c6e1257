//! Calculate-and-save through the SQLite store, then track progress.

mod common;

use chrono::NaiveDate;
use common::{init_logging, reference_input};
use pipeline_core::{
    config::PlannerConfig,
    error::{PlanError, PlanResult},
    funnel::{FunnelOutput, PlanInput},
    gateway::{Campaign, CampaignGateway, WeekKey},
    planner::{campaign_name, Planner},
    schedule::{TargetKpi, WeeklyTarget},
    store::PlanStore,
    types::{PeriodMonths, MAX_PERIOD_MONTHS},
};

fn build_planner() -> Planner<PlanStore> {
    init_logging();
    let store = PlanStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    Planner::new(PlannerConfig::default_test(), store)
}

fn go_live() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
}

#[test]
fn save_creates_campaign_and_all_weekly_rows() {
    let planner = build_planner();
    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap();
    assert!(outcome.is_saved(), "save failed: {:?}", outcome.error);

    let campaign = outcome.campaign.unwrap();
    assert_eq!(campaign.name, "Campaign 3M 2026-11-02");
    assert_eq!(campaign.period_months, 3);

    let rows = planner.gateway().weekly_targets(&campaign.campaign_id).unwrap();
    // 12 KPIs × 4 weeks × 3 months
    assert_eq!(rows.len(), 144);
    assert!(rows.iter().all(|r| r.achieved == 0));

    let months: Vec<(i32, u32)> = rows.iter().map(|r| (r.year, r.month)).collect();
    assert!(months.contains(&(2026, 11)));
    assert!(months.contains(&(2027, 1)));
    assert!(!months.contains(&(2027, 2)));
}

#[test]
fn weekly_targets_round_up_from_totals() {
    let planner = build_planner();
    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap();
    let rows = planner
        .gateway()
        .weekly_targets(&outcome.campaign.unwrap().campaign_id)
        .unwrap();

    // 200 LinkedIn meetings / 3 months → 67 → 17 a week
    let li = rows
        .iter()
        .find(|r| r.kpi == TargetKpi::MeetingsLinkedIn)
        .unwrap();
    assert_eq!(li.target, 17);

    // 15,873 requests / 3 → 5,292 → 1,323 a week
    let req = rows
        .iter()
        .find(|r| r.kpi == TargetKpi::ConnectionRequestsLinkedIn)
        .unwrap();
    assert_eq!(req.target, 1_323);
}

#[test]
fn recalculating_keeps_achieved_values() {
    let planner = build_planner();
    planner.calculate_and_save(&reference_input(), go_live(), 3).unwrap();

    let key = WeekKey { kpi: TargetKpi::MeetingsEmail, year: 2026, month: 11, week: 2 };
    planner.set_achieved(key, 5).unwrap();

    let mut bigger = reference_input();
    bigger.goal.target_units = 200.0;
    let outcome = planner.calculate_and_save(&bigger, go_live(), 3).unwrap();
    let campaign = outcome.campaign.unwrap();

    let rows = planner.gateway().weekly_targets(&campaign.campaign_id).unwrap();
    assert_eq!(rows.len(), 144, "upsert must not duplicate rows");
    let cell = rows
        .iter()
        .find(|r| r.kpi == key.kpi && r.month == 11 && r.week == 2)
        .unwrap();
    assert_eq!(cell.achieved, 5);
    // 200 email meetings / 3 → 67 → 17
    assert_eq!(cell.target, 17);
}

#[test]
fn month_view_rolls_up_the_latest_campaign() {
    let planner = build_planner();
    planner.calculate_and_save(&reference_input(), go_live(), 3).unwrap();

    for week in 1..=4 {
        let key = WeekKey { kpi: TargetKpi::MeetingsCall, year: 2026, month: 12, week };
        planner.set_achieved(key, 3).unwrap();
    }

    let view = planner.month_view(1).unwrap();
    assert_eq!((view.year, view.month), (2026, 12));
    assert_eq!(view.weeks.len(), 48);

    let call = view
        .ladder
        .iter()
        .find(|s| s.kpi == TargetKpi::MeetingsCall)
        .unwrap();
    // 33.3 call meetings / 3 → 12 → 3 a week
    assert_eq!(call.monthly_target, 12);
    assert_eq!(call.monthly_achieved, 12);
    assert!(call.on_track);
    assert_eq!(call.achievement_rate, 100.0);

    // Offsets past the end clamp to the last month.
    let last = planner.month_view(10).unwrap();
    assert_eq!((last.year, last.month, last.offset), (2027, 1, 2));
}

#[test]
fn achieved_on_missing_week_is_an_error() {
    let planner = build_planner();
    planner.calculate_and_save(&reference_input(), go_live(), 1).unwrap();

    let key = WeekKey { kpi: TargetKpi::MeetingsEmail, year: 2027, month: 6, week: 1 };
    assert!(matches!(
        planner.set_achieved(key, 1),
        Err(PlanError::TargetRowNotFound { .. })
    ));

    let key = WeekKey { kpi: TargetKpi::MeetingsEmail, year: 2026, month: 11, week: 1 };
    assert!(matches!(
        planner.set_achieved(key, -1),
        Err(PlanError::InvalidGoal { field: "achieved", .. })
    ));
}

#[test]
fn views_need_a_campaign() {
    let planner = build_planner();
    assert!(matches!(planner.month_view(0), Err(PlanError::CampaignNotFound)));
    assert!(planner.latest_output().unwrap().is_none());
}

#[test]
fn latest_output_matches_calculation() {
    let planner = build_planner();
    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap();
    let stored = planner.latest_output().unwrap().expect("snapshot saved");
    assert_eq!(stored, outcome.output);
}

#[test]
fn invalid_input_saves_nothing() {
    let planner = build_planner();
    let mut input = reference_input();
    input.assumptions.show_rate = 0.0;
    assert!(matches!(
        planner.calculate_and_save(&input, go_live(), 3),
        Err(PlanError::ZeroRate { rate: "show_rate" })
    ));
    assert_eq!(planner.gateway().campaign_count().unwrap(), 0);
}

#[test]
fn period_outside_supported_range_saves_nothing() {
    let planner = build_planner();
    for period in [0, MAX_PERIOD_MONTHS + 1, 1_100_000_000] {
        assert!(matches!(
            planner.calculate_and_save(&reference_input(), go_live(), period),
            Err(PlanError::InvalidGoal { field: "period_months", .. })
        ));
    }
    assert_eq!(planner.gateway().campaign_count().unwrap(), 0);

    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), MAX_PERIOD_MONTHS)
        .unwrap();
    let rows = planner
        .gateway()
        .weekly_targets(&outcome.campaign.unwrap().campaign_id)
        .unwrap();
    assert_eq!(rows.len(), 12 * 4 * MAX_PERIOD_MONTHS as usize);
}

/// Gateway whose writes always fail, to check the output survives.
struct OfflineGateway;

impl CampaignGateway for OfflineGateway {
    fn upsert_campaign(&self, _: &str, _: NaiveDate, _: PeriodMonths) -> PlanResult<Campaign> {
        Err(PlanError::Other(anyhow::anyhow!("backend unreachable")))
    }
    fn latest_campaign(&self) -> PlanResult<Option<Campaign>> {
        Ok(None)
    }
    fn upsert_weekly_targets(&self, _: &[WeeklyTarget]) -> PlanResult<()> {
        unreachable!("campaign upsert fails first")
    }
    fn weekly_targets(&self, _: &str) -> PlanResult<Vec<WeeklyTarget>> {
        Ok(Vec::new())
    }
    fn set_achieved(&self, _: &str, _: WeekKey, _: i64) -> PlanResult<()> {
        Ok(())
    }
    fn save_result_snapshot(&self, _: &str, _: &PlanInput, _: &FunnelOutput) -> PlanResult<()> {
        unreachable!("campaign upsert fails first")
    }
    fn latest_result_snapshot(&self, _: &str) -> PlanResult<Option<FunnelOutput>> {
        Ok(None)
    }
}

#[test]
fn save_failure_keeps_the_calculation() {
    let planner = Planner::new(PlannerConfig::default_test(), OfflineGateway);
    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap();
    assert!(!outcome.is_saved());
    assert!(outcome.campaign.is_none());
    assert_eq!(outcome.output.pipeline_value, 5_000_000.0);
    assert_eq!(campaign_name(go_live(), 3), "Campaign 3M 2026-11-02");
}

/// SQLite store that refuses weekly target writes.
struct TargetsRejected(PlanStore);

impl CampaignGateway for TargetsRejected {
    fn upsert_campaign(&self, name: &str, go_live: NaiveDate, period: PeriodMonths) -> PlanResult<Campaign> {
        self.0.upsert_campaign(name, go_live, period)
    }
    fn latest_campaign(&self) -> PlanResult<Option<Campaign>> {
        self.0.latest_campaign()
    }
    fn upsert_weekly_targets(&self, _: &[WeeklyTarget]) -> PlanResult<()> {
        Err(PlanError::Other(anyhow::anyhow!("disk full")))
    }
    fn weekly_targets(&self, campaign_id: &str) -> PlanResult<Vec<WeeklyTarget>> {
        self.0.weekly_targets(campaign_id)
    }
    fn set_achieved(&self, campaign_id: &str, key: WeekKey, achieved: i64) -> PlanResult<()> {
        self.0.set_achieved(campaign_id, key, achieved)
    }
    fn save_result_snapshot(&self, campaign_id: &str, input: &PlanInput, output: &FunnelOutput) -> PlanResult<()> {
        self.0.save_result_snapshot(campaign_id, input, output)
    }
    fn latest_result_snapshot(&self, campaign_id: &str) -> PlanResult<Option<FunnelOutput>> {
        self.0.latest_result_snapshot(campaign_id)
    }
    fn with_transaction<T, F>(&self, f: F) -> PlanResult<T>
    where
        F: FnOnce(&Self) -> PlanResult<T>,
    {
        self.0.with_transaction(|_| f(self))
    }
}

#[test]
fn failed_target_write_rolls_back_the_campaign() {
    init_logging();
    let store = PlanStore::in_memory().unwrap();
    store.migrate().unwrap();
    let planner = Planner::new(PlannerConfig::default_test(), TargetsRejected(store));

    let outcome = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap();
    assert!(!outcome.is_saved());
    assert_eq!(outcome.output.pipeline_value, 5_000_000.0);
    assert_eq!(planner.gateway().0.campaign_count().unwrap(), 0);
    assert!(matches!(planner.month_view(0), Err(PlanError::CampaignNotFound)));
    assert_eq!(planner.latest_output().unwrap(), None);
}

#[test]
fn file_store_survives_reopen() {
    init_logging();
    let dir = std::env::temp_dir().join(format!("plan-store-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("plans.db");

    let store = PlanStore::open(path.to_str().unwrap()).unwrap();
    store.migrate().unwrap();
    let planner = Planner::new(PlannerConfig::default_test(), store);
    let saved = planner
        .calculate_and_save(&reference_input(), go_live(), 3)
        .unwrap()
        .campaign
        .unwrap();

    let reopened = planner.gateway().reopen().unwrap();
    reopened.migrate().unwrap();
    assert_eq!(reopened.latest_campaign().unwrap(), Some(saved.clone()));
    assert_eq!(reopened.weekly_targets(&saved.campaign_id).unwrap().len(), 144);

    drop(reopened);
    drop(planner);
    let _ = std::fs::remove_dir_all(&dir);
}
