use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel split must total 100%, got {total}%")]
    SplitTotal { total: u64 },

    #[error("Rate '{rate}' is zero; every conversion rate must be above 0%")]
    ZeroRate { rate: &'static str },

    #[error("Rate '{rate}' must be in (0, 100], got {value}")]
    InvalidRate { rate: &'static str, value: f64 },

    #[error("Invalid '{field}': {value}")]
    InvalidGoal { field: &'static str, value: f64 },

    #[error("ICP field '{field}' must not be empty")]
    InvalidIcp { field: &'static str },

    #[error("No campaign found; run a calculation first")]
    CampaignNotFound,

    #[error("No target row for '{kpi}' in {year}-{month:02} week {week}")]
    TargetRowNotFound {
        kpi:   String,
        year:  i32,
        month: u32,
        week:  u32,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
