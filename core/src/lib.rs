//! pipeline-core: backward funnel planning for outbound sales campaigns.
//!
//! `funnel::calculate` is the pure core. Everything else (weekly schedule,
//! progress tracking, export, persistence) is layered on its output.

pub mod assumptions;
pub mod channel;
pub mod config;
pub mod error;
pub mod export;
pub mod funnel;
pub mod gateway;
pub mod icp;
pub mod planner;
pub mod schedule;
pub mod store;
pub mod tracking;
pub mod types;
