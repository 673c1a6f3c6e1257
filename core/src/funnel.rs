//! Funnel calculator: backward planning from a SAL goal.
//!
//! Pure and synchronous. No I/O, no rounding of intermediate stages.
//!
//! Canonical chain, per channel (each arrow divides by the named rate):
//!
//!   meetings  = target_units / (show × sal_per_meeting) × split
//!   LinkedIn: meetings →show→ positive →positive_share→ replies
//!             →reply_rate→ messages →accept_rate→ connection requests
//!             × connection_to_contact_ratio = verified contacts
//!   Email:    meetings →show→ positive →positive_share→ replies
//!             →reply_rate→ contacts
//!   Call:     meetings = positive responses →appointment_rate→ answered
//!             calls →pickup_rate→ dials = contacts
//!   TAM       = contacts / verified_contact_share

use crate::{
    assumptions::{Assumptions, Rates},
    channel::{CapacityStatus, Channel, ChannelMode},
    error::{PlanError, PlanResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Sales-accepted leads to generate.
    pub target_units:   f64,
    /// USD value of one SAL.
    pub value_per_unit: f64,
}

impl Goal {
    pub fn new(target_units: f64, value_per_unit: f64) -> Self {
        Self { target_units, value_per_unit }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if !self.target_units.is_finite() || self.target_units <= 0.0 {
            return Err(PlanError::InvalidGoal {
                field: "target_units",
                value: self.target_units,
            });
        }
        if !self.value_per_unit.is_finite() || self.value_per_unit < 0.0 {
            return Err(PlanError::InvalidGoal {
                field: "value_per_unit",
                value: self.value_per_unit,
            });
        }
        Ok(())
    }

    pub fn pipeline_value(&self) -> f64 {
        self.target_units * self.value_per_unit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanInput {
    pub goal:        Goal,
    pub mode:        ChannelMode,
    #[serde(default)]
    pub assumptions: Assumptions,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LinkedInFunnel {
    pub meetings:            f64,
    pub positive_replies:    f64,
    pub total_replies:       f64,
    pub messages:            f64,
    pub connection_requests: f64,
    pub verified_contacts:   f64,
    pub tam:                 f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EmailFunnel {
    pub meetings:         f64,
    pub positive_replies: f64,
    pub total_replies:    f64,
    pub contacts:         f64,
    pub tam:              f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CallFunnel {
    pub meetings:           f64,
    pub positive_responses: f64,
    /// Answered calls needed to book the meetings.
    pub total_responses:    f64,
    pub dials:              f64,
    pub contacts:           f64,
    pub tam:                f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelOutput {
    pub total_meetings:           f64,
    pub linkedin:                 LinkedInFunnel,
    pub email:                    EmailFunnel,
    pub call:                     CallFunnel,
    pub capacity_status_linkedin: CapacityStatus,
    pub capacity_status_call:     CapacityStatus,
    pub pipeline_value:           f64,
}

impl FunnelOutput {
    pub fn meetings(&self, channel: Channel) -> f64 {
        match channel {
            Channel::LinkedIn => self.linkedin.meetings,
            Channel::Email    => self.email.meetings,
            Channel::Call     => self.call.meetings,
        }
    }

    pub fn tam(&self, channel: Channel) -> f64 {
        match channel {
            Channel::LinkedIn => self.linkedin.tam,
            Channel::Email    => self.email.tam,
            Channel::Call     => self.call.tam,
        }
    }

    pub fn total_tam(&self) -> f64 {
        self.linkedin.tam + self.email.tam + self.call.tam
    }
}

/// Derive the full funnel. Validates everything before the first division.
pub fn calculate(input: &PlanInput) -> PlanResult<FunnelOutput> {
    input.goal.validate()?;
    input.mode.validate()?;
    let rates = input.assumptions.to_rates()?;

    let total_meetings = input.goal.target_units / (rates.show * rates.sal_per_meeting);
    let split = input.mode.split();
    let channel_meetings =
        |channel: Channel| total_meetings * split.share(channel) as f64 / 100.0;

    let linkedin = linkedin_funnel(channel_meetings(Channel::LinkedIn), &rates);
    let email = email_funnel(channel_meetings(Channel::Email), &rates);
    let call = call_funnel(channel_meetings(Channel::Call), &rates);

    let capacity_status_linkedin =
        CapacityStatus::for_required(input.mode.linkedin_capacity(), linkedin.connection_requests);
    let capacity_status_call =
        CapacityStatus::for_required(input.mode.call_capacity(), call.dials);

    log::debug!(
        "funnel mode={} meetings={:.2} li={:.2} em={:.2} call={:.2} cap_li={} cap_call={}",
        input.mode.name(),
        total_meetings,
        linkedin.meetings,
        email.meetings,
        call.meetings,
        capacity_status_linkedin,
        capacity_status_call
    );

    Ok(FunnelOutput {
        total_meetings,
        linkedin,
        email,
        call,
        capacity_status_linkedin,
        capacity_status_call,
        pipeline_value: input.goal.pipeline_value(),
    })
}

fn linkedin_funnel(meetings: f64, rates: &Rates) -> LinkedInFunnel {
    let positive_replies = meetings / rates.show;
    let total_replies = positive_replies / rates.linkedin_positive;
    let messages = total_replies / rates.linkedin_reply;
    let connection_requests = messages / rates.linkedin_accept;
    let verified_contacts = connection_requests * rates.connection_ratio;
    LinkedInFunnel {
        meetings,
        positive_replies,
        total_replies,
        messages,
        connection_requests,
        verified_contacts,
        tam: verified_contacts / rates.verified_share,
    }
}

fn email_funnel(meetings: f64, rates: &Rates) -> EmailFunnel {
    let positive_replies = meetings / rates.show;
    let total_replies = positive_replies / rates.email_positive;
    let contacts = total_replies / rates.email_reply;
    EmailFunnel {
        meetings,
        positive_replies,
        total_replies,
        contacts,
        tam: contacts / rates.verified_share,
    }
}

fn call_funnel(meetings: f64, rates: &Rates) -> CallFunnel {
    let total_responses = meetings / rates.call_appointment;
    let dials = total_responses / rates.call_pickup;
    CallFunnel {
        meetings,
        positive_responses: meetings,
        total_responses,
        dials,
        contacts: dials,
        tam: dials / rates.verified_share,
    }
}

/// Whether the team already runs outbound with a known offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutboundExperience {
    Proven,
    Experimental,
}

impl OutboundExperience {
    pub fn timeline_message(&self) -> &'static str {
        match self {
            OutboundExperience::Proven =>
                "Expected timeline for positive results: 2–3 months.",
            OutboundExperience::Experimental =>
                "Expected timeline for positive results: 4–5 months (experimental phase).",
        }
    }
}
