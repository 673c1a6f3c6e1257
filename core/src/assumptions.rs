//! Conversion-rate assumptions behind the funnel.
//!
//! Every rate is entered as a percentage in (0, 100] and divided by 100
//! only when used. `connection_to_contact_ratio` is a plain multiplier.

use crate::{
    error::{PlanError, PlanResult},
    types::Percent,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assumptions {
    // Applied to every meeting regardless of channel
    pub show_rate:       Percent,
    pub sal_per_meeting: Percent,
    // Email
    pub email_reply_rate:           Percent,
    pub email_positive_reply_share: Percent,
    // LinkedIn
    pub linkedin_reply_rate:             Percent,
    pub linkedin_positive_reply_share:   Percent,
    pub linkedin_connection_accept_rate: Percent,
    pub connection_to_contact_ratio:     f64,
    // Call
    pub call_pickup_rate:      Percent,
    pub call_appointment_rate: Percent,
    // List quality
    pub verified_contact_share: Percent,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            show_rate:                       60.0,
            sal_per_meeting:                 50.0,
            email_reply_rate:                3.0,
            email_positive_reply_share:      30.0,
            linkedin_reply_rate:             20.0,
            linkedin_positive_reply_share:   35.0,
            linkedin_connection_accept_rate: 30.0,
            connection_to_contact_ratio:     1.0,
            call_pickup_rate:                22.0,
            call_appointment_rate:           2.3,
            verified_contact_share:          40.0,
        }
    }
}

/// Validated assumption set, every rate already a fraction in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub show:                f64,
    pub sal_per_meeting:     f64,
    pub email_reply:         f64,
    pub email_positive:      f64,
    pub linkedin_reply:      f64,
    pub linkedin_positive:   f64,
    pub linkedin_accept:     f64,
    pub connection_ratio:    f64,
    pub call_pickup:         f64,
    pub call_appointment:    f64,
    pub verified_share:      f64,
}

impl Assumptions {
    /// (name, value) for every percentage field, in declaration order.
    pub fn named_rates(&self) -> [(&'static str, Percent); 10] {
        [
            ("show_rate", self.show_rate),
            ("sal_per_meeting", self.sal_per_meeting),
            ("email_reply_rate", self.email_reply_rate),
            ("email_positive_reply_share", self.email_positive_reply_share),
            ("linkedin_reply_rate", self.linkedin_reply_rate),
            ("linkedin_positive_reply_share", self.linkedin_positive_reply_share),
            ("linkedin_connection_accept_rate", self.linkedin_connection_accept_rate),
            ("call_pickup_rate", self.call_pickup_rate),
            ("call_appointment_rate", self.call_appointment_rate),
            ("verified_contact_share", self.verified_contact_share),
        ]
    }

    /// Check every rate before any division happens.
    pub fn to_rates(&self) -> PlanResult<Rates> {
        for (rate, value) in self.named_rates() {
            check_percent(rate, value)?;
        }
        let ratio = self.connection_to_contact_ratio;
        if ratio == 0.0 {
            return Err(PlanError::ZeroRate { rate: "connection_to_contact_ratio" });
        }
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(PlanError::InvalidRate {
                rate:  "connection_to_contact_ratio",
                value: ratio,
            });
        }

        Ok(Rates {
            show:             self.show_rate / 100.0,
            sal_per_meeting:  self.sal_per_meeting / 100.0,
            email_reply:      self.email_reply_rate / 100.0,
            email_positive:   self.email_positive_reply_share / 100.0,
            linkedin_reply:   self.linkedin_reply_rate / 100.0,
            linkedin_positive: self.linkedin_positive_reply_share / 100.0,
            linkedin_accept:  self.linkedin_connection_accept_rate / 100.0,
            connection_ratio: ratio,
            call_pickup:      self.call_pickup_rate / 100.0,
            call_appointment: self.call_appointment_rate / 100.0,
            verified_share:   self.verified_contact_share / 100.0,
        })
    }
}

fn check_percent(rate: &'static str, value: Percent) -> PlanResult<()> {
    if value == 0.0 {
        return Err(PlanError::ZeroRate { rate });
    }
    if !value.is_finite() || value < 0.0 || value > 100.0 {
        return Err(PlanError::InvalidRate { rate, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let rates = Assumptions::default().to_rates().unwrap();
        assert_eq!(rates.show, 0.6);
        assert!((rates.call_appointment - 0.023).abs() < 1e-12);
    }

    #[test]
    fn zero_rate_is_named() {
        let a = Assumptions { linkedin_reply_rate: 0.0, ..Assumptions::default() };
        match a.to_rates() {
            Err(PlanError::ZeroRate { rate }) => assert_eq!(rate, "linkedin_reply_rate"),
            other => panic!("expected ZeroRate, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_rates_rejected() {
        let a = Assumptions { show_rate: 120.0, ..Assumptions::default() };
        assert!(matches!(a.to_rates(), Err(PlanError::InvalidRate { rate: "show_rate", .. })));

        let a = Assumptions { call_pickup_rate: f64::NAN, ..Assumptions::default() };
        assert!(matches!(a.to_rates(), Err(PlanError::InvalidRate { .. })));

        let a = Assumptions { connection_to_contact_ratio: 0.0, ..Assumptions::default() };
        assert!(matches!(a.to_rates(), Err(PlanError::ZeroRate { .. })));
    }

    #[test]
    fn full_hundred_percent_is_accepted() {
        let a = Assumptions { show_rate: 100.0, ..Assumptions::default() };
        assert_eq!(a.to_rates().unwrap().show, 1.0);
    }
}
