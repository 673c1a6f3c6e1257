//! Shared primitive types used across the planner.

/// A percentage in (0, 100]. Converted to a fraction at the point of use.
pub type Percent = f64;

/// A stable, unique identifier for a saved campaign.
pub type CampaignId = String;

/// Number of months a campaign runs for.
pub type PeriodMonths = u32;

/// Longest campaign the planner schedules.
pub const MAX_PERIOD_MONTHS: PeriodMonths = 12;

/// Weeks tracked per calendar month in the progress tables.
pub const WEEKS_PER_MONTH: u32 = 4;
