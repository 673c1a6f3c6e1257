use crate::{
    assumptions::Assumptions,
    channel::{AccountCapacity, ChannelSplit},
    types::PeriodMonths,
};
use serde::{Deserialize, Serialize};

/// Per-account sending limits used to build capacity ceilings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapacityLimits {
    /// Connection requests one LinkedIn account may send per month.
    pub linkedin_requests_per_account_month: f64,
    /// Dials one caller seat may make per working day.
    pub call_dials_per_account_day: f64,
    pub working_days_per_month: f64,
}

impl Default for CapacityLimits {
    fn default() -> Self {
        Self {
            linkedin_requests_per_account_month: 500.0,
            call_dials_per_account_day:          150.0,
            working_days_per_month:              22.0,
        }
    }
}

impl CapacityLimits {
    pub fn linkedin(&self, accounts: u32, period_months: PeriodMonths) -> AccountCapacity {
        AccountCapacity::new(
            accounts,
            self.linkedin_requests_per_account_month,
            period_months as f64,
        )
    }

    pub fn call(&self, accounts: u32, period_months: PeriodMonths) -> AccountCapacity {
        AccountCapacity::new(
            accounts,
            self.call_dials_per_account_day,
            self.working_days_per_month * period_months as f64,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    pub assumptions:        Assumptions,
    pub split:              ChannelSplit,
    pub capacity:           CapacityLimits,
    pub period_months:      PeriodMonths,
    pub linkedin_accounts:  u32,
    pub call_accounts:      u32,
}

#[derive(Debug, Clone, Deserialize)]
struct DefaultsFile {
    assumptions: Assumptions,
    split: ChannelSplit,
    #[serde(default)]
    capacity: CapacityLimits,
    period_months: PeriodMonths,
    accounts: AccountsSection,
}

#[derive(Debug, Clone, Deserialize)]
struct AccountsSection {
    linkedin: u32,
    call: u32,
}

impl PlannerConfig {
    /// Load from the data/ directory.
    /// In tests, use PlannerConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/planner/defaults.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DefaultsFile = serde_json::from_str(&content)?;

        // Reject bad defaults at load time rather than on first calculation.
        file.assumptions
            .to_rates()
            .map_err(|e| anyhow::anyhow!("Invalid assumptions in {path}: {e}"))?;
        file.split
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid split in {path}: {e}"))?;
        crate::schedule::validate_period(file.period_months)
            .map_err(|e| anyhow::anyhow!("Invalid period in {path}: {e}"))?;

        Ok(Self {
            assumptions:       file.assumptions,
            split:             file.split,
            capacity:          file.capacity,
            period_months:     file.period_months,
            linkedin_accounts: file.accounts.linkedin,
            call_accounts:     file.accounts.call,
        })
    }

    /// Built-in defaults. In tests, prefer this over load().
    pub fn default_test() -> Self {
        Self::default()
    }
}

/// Matches data/planner/defaults.json.
impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            assumptions:       Assumptions::default(),
            split:             ChannelSplit::default(),
            capacity:          CapacityLimits::default(),
            period_months:     3,
            linkedin_accounts: 4,
            call_accounts:     2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_defaults(dir: &std::path::Path, body: &str) {
        std::fs::create_dir_all(dir.join("planner")).unwrap();
        std::fs::write(dir.join("planner/defaults.json"), body).unwrap();
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("planner-config-{name}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn shipped_defaults_match_built_in_defaults() {
        let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
        let loaded = PlannerConfig::load(data_dir).unwrap();
        assert_eq!(loaded, PlannerConfig::default_test());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = PlannerConfig::load("/nonexistent-planner-data").unwrap_err();
        assert!(err.to_string().contains("defaults.json"));
    }

    #[test]
    fn bad_split_rejected_at_load() {
        let dir = temp_dir("bad-split");
        let mut body = serde_json::json!({
            "assumptions": Assumptions::default(),
            "split": { "linkedin": 50, "email": 30, "call": 10 },
            "period_months": 3,
            "accounts": { "linkedin": 1, "call": 1 }
        });
        write_defaults(&dir, &body.to_string());
        let err = PlannerConfig::load(dir.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("90"));

        body["split"]["linkedin"] = serde_json::json!(60);
        write_defaults(&dir, &body.to_string());
        let cfg = PlannerConfig::load(dir.to_str().unwrap()).unwrap();
        assert_eq!(cfg.capacity, CapacityLimits::default());
    }

    #[test]
    fn capacity_builders_scale_with_period() {
        let limits = CapacityLimits::default();
        assert_eq!(limits.linkedin(4, 3).ceiling(), 6000.0);
        assert_eq!(limits.call(2, 1).ceiling(), 6600.0);
    }
}
