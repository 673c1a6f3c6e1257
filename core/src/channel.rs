//! Outreach channels, the channel mode tagged union, and account capacity.
//!
//! The mode decides which channels receive meetings and which payload the
//! caller has to supply. Only `All` carries a split; only the modes that
//! include LinkedIn or Call carry a capacity for those channels.

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    #[serde(rename = "linkedin")]
    LinkedIn,
    Call,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::LinkedIn, Channel::Email, Channel::Call];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Email    => "Email",
            Channel::LinkedIn => "LinkedIn",
            Channel::Call     => "Call",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer percentage allocation of the meeting goal across channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelSplit {
    pub linkedin: u32,
    pub email:    u32,
    pub call:     u32,
}

impl ChannelSplit {
    pub fn new(linkedin: u32, email: u32, call: u32) -> Self {
        Self { linkedin, email, call }
    }

    /// Summed in `u64`, which three `u32` shares cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.linkedin) + u64::from(self.email) + u64::from(self.call)
    }

    /// The split must cover the whole meeting goal, no more and no less.
    pub fn validate(&self) -> PlanResult<()> {
        let total = self.total();
        if total != 100 {
            return Err(PlanError::SplitTotal { total });
        }
        Ok(())
    }

    pub fn share(&self, channel: Channel) -> u32 {
        match channel {
            Channel::LinkedIn => self.linkedin,
            Channel::Email    => self.email,
            Channel::Call     => self.call,
        }
    }
}

impl Default for ChannelSplit {
    fn default() -> Self {
        Self { linkedin: 60, email: 30, call: 10 }
    }
}

/// Sending ceiling for one channel over the planning horizon.
///
/// ceiling = accounts × per-account limit × periods. For LinkedIn the limit
/// is connection requests per account per month; for Call it is dials per
/// account per working day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccountCapacity {
    pub accounts:          u32,
    pub per_account_limit: f64,
    pub periods:           f64,
}

impl AccountCapacity {
    pub fn new(accounts: u32, per_account_limit: f64, periods: f64) -> Self {
        Self { accounts, per_account_limit, periods }
    }

    pub fn ceiling(&self) -> f64 {
        self.accounts as f64 * self.per_account_limit * self.periods
    }

    pub fn check(&self, required: f64) -> CapacityStatus {
        if required <= self.ceiling() {
            CapacityStatus::Ok
        } else {
            CapacityStatus::ExceedsCapacity
        }
    }
}

/// Informational feasibility result. Never an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CapacityStatus {
    Ok,
    ExceedsCapacity,
    NotChecked,
}

impl CapacityStatus {
    pub fn for_required(capacity: Option<&AccountCapacity>, required: f64) -> Self {
        match capacity {
            Some(cap) => cap.check(required),
            None      => CapacityStatus::NotChecked,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapacityStatus::Ok              => "OK",
            CapacityStatus::ExceedsCapacity => "Exceeds capacity",
            CapacityStatus::NotChecked      => "Not checked",
        }
    }
}

impl fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which channels the plan covers, with the payload each mode needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChannelMode {
    Email,
    #[serde(rename = "linkedin")]
    LinkedIn {
        #[serde(default)]
        capacity: Option<AccountCapacity>,
    },
    Call {
        #[serde(default)]
        capacity: Option<AccountCapacity>,
    },
    All {
        split: ChannelSplit,
        #[serde(default)]
        linkedin_capacity: Option<AccountCapacity>,
        #[serde(default)]
        call_capacity: Option<AccountCapacity>,
    },
}

impl ChannelMode {
    /// Effective split: 100% to the single channel outside `All`.
    pub fn split(&self) -> ChannelSplit {
        match self {
            ChannelMode::Email             => ChannelSplit::new(0, 100, 0),
            ChannelMode::LinkedIn { .. }   => ChannelSplit::new(100, 0, 0),
            ChannelMode::Call { .. }       => ChannelSplit::new(0, 0, 100),
            ChannelMode::All { split, .. } => *split,
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        match self {
            ChannelMode::All { split, .. } => split.validate(),
            _ => Ok(()),
        }
    }

    pub fn linkedin_capacity(&self) -> Option<&AccountCapacity> {
        match self {
            ChannelMode::LinkedIn { capacity }          => capacity.as_ref(),
            ChannelMode::All { linkedin_capacity, .. }  => linkedin_capacity.as_ref(),
            _ => None,
        }
    }

    pub fn call_capacity(&self) -> Option<&AccountCapacity> {
        match self {
            ChannelMode::Call { capacity }          => capacity.as_ref(),
            ChannelMode::All { call_capacity, .. }  => call_capacity.as_ref(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelMode::Email           => "Email",
            ChannelMode::LinkedIn { .. } => "LinkedIn",
            ChannelMode::Call { .. }     => "Call",
            ChannelMode::All { .. }      => "All",
        }
    }
}
