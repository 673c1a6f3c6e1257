//! Ideal-customer-profile records attached to a plan.

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueUmbrella {
    #[default]
    MakeMoney,
    SaveMoney,
    SaveTime,
    ReduceRisk,
}

impl ValueUmbrella {
    pub fn label(&self) -> &'static str {
        match self {
            ValueUmbrella::MakeMoney  => "Make Money",
            ValueUmbrella::SaveMoney  => "Save Money",
            ValueUmbrella::SaveTime   => "Save Time",
            ValueUmbrella::ReduceRisk => "Reduce Risk",
        }
    }
}

impl fmt::Display for ValueUmbrella {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IcpProfile {
    pub persona:      String,
    pub problem:      String,
    pub benefit:      String,
    pub umbrella:     ValueUmbrella,
    #[serde(default)]
    pub seniority:    Vec<String>,
    #[serde(default)]
    pub social_group: String,
}

impl IcpProfile {
    /// Persona, problem and benefit are required; whitespace is trimmed.
    pub fn new(persona: &str, problem: &str, benefit: &str, umbrella: ValueUmbrella) -> PlanResult<Self> {
        Ok(Self {
            persona:      required("persona", persona)?,
            problem:      required("problem", problem)?,
            benefit:      required("benefit", benefit)?,
            umbrella,
            seniority:    Vec::new(),
            social_group: String::new(),
        })
    }

    pub fn with_seniority<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seniority = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_social_group(mut self, group: &str) -> Self {
        self.social_group = group.trim().to_string();
        self
    }
}

fn required(field: &'static str, value: &str) -> PlanResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanError::InvalidIcp { field });
    }
    Ok(trimmed.to_string())
}
