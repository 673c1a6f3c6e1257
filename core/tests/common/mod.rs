#![allow(dead_code)]

use pipeline_core::{
    assumptions::Assumptions,
    channel::{ChannelMode, ChannelSplit},
    config::PlannerConfig,
    funnel::{Goal, PlanInput},
};

/// 100 SALs at $50k, 60/30/10 split, default assumptions and accounts.
pub fn reference_input() -> PlanInput {
    let cfg = PlannerConfig::default_test();
    PlanInput {
        goal: Goal::new(100.0, 50_000.0),
        mode: ChannelMode::All {
            split: ChannelSplit::new(60, 30, 10),
            linkedin_capacity: Some(cfg.capacity.linkedin(cfg.linkedin_accounts, cfg.period_months)),
            call_capacity: Some(cfg.capacity.call(cfg.call_accounts, cfg.period_months)),
        },
        assumptions: Assumptions::default(),
    }
}

pub fn with_target(input: &PlanInput, target_units: f64) -> PlanInput {
    PlanInput {
        goal: Goal::new(target_units, input.goal.value_per_unit),
        ..input.clone()
    }
}

pub fn close(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() <= tol
}

/// Route library logs through the test harness; RUST_LOG=debug to see them.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
