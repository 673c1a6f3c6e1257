//! CSV export of pipeline results and ICP lists.
//!
//! Display rounding lives here; the calculator output is left untouched.

use crate::{
    error::{PlanError, PlanResult},
    funnel::FunnelOutput,
    icp::IcpProfile,
};
use std::io::Write;

pub const PIPELINE_HEADERS: [&str; 19] = [
    "Meetings to Book (PQLs)",
    "Meetings via LinkedIn",
    "Meetings via Email",
    "Meetings via Call",
    "Positive Replies LinkedIn",
    "Total Replies LinkedIn",
    "Connection Requests to Send",
    "Positive Replies Email",
    "Total Replies Email",
    "Email Contacts Required",
    "Positive Responses from Calls",
    "Total Responses from Calls",
    "Phone Contacts Required",
    "Required TAM LinkedIn",
    "Required TAM Email",
    "Required TAM Call",
    "LinkedIn Capacity Check",
    "Call Capacity Check",
    "Estimated Pipeline Value",
];

pub const ICP_HEADERS: [&str; 6] = [
    "Persona Group",
    "Seniority",
    "Pain Point",
    "Benefit from Feature",
    "Value Prop",
    "Social Group",
];

/// Whole number with thousands separators, e.g. `15,873`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar USD, e.g. `$5,000,000`.
pub fn format_currency(value: f64) -> String {
    let count = format_count(value);
    match count.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None      => format!("${count}"),
    }
}

pub fn pipeline_row(out: &FunnelOutput) -> Vec<String> {
    vec![
        format_count(out.total_meetings),
        format_count(out.linkedin.meetings),
        format_count(out.email.meetings),
        format_count(out.call.meetings),
        format_count(out.linkedin.positive_replies),
        format_count(out.linkedin.total_replies),
        format_count(out.linkedin.connection_requests),
        format_count(out.email.positive_replies),
        format_count(out.email.total_replies),
        format_count(out.email.contacts),
        format_count(out.call.positive_responses),
        format_count(out.call.total_responses),
        format_count(out.call.contacts),
        format_count(out.linkedin.tam),
        format_count(out.email.tam),
        format_count(out.call.tam),
        out.capacity_status_linkedin.to_string(),
        out.capacity_status_call.to_string(),
        format_currency(out.pipeline_value),
    ]
}

pub fn write_pipeline_csv<W: Write>(writer: W, out: &FunnelOutput) -> PlanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PIPELINE_HEADERS)?;
    wtr.write_record(pipeline_row(out))?;
    wtr.flush()?;
    Ok(())
}

pub fn write_icp_csv<W: Write>(writer: W, profiles: &[IcpProfile]) -> PlanResult<()> {
    if profiles.is_empty() {
        return Err(PlanError::InvalidIcp { field: "profiles" });
    }
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ICP_HEADERS)?;
    for icp in profiles {
        let seniority = icp.seniority.join(";");
        wtr.write_record([
            icp.persona.as_str(),
            seniority.as_str(),
            icp.problem.as_str(),
            icp.benefit.as_str(),
            icp.umbrella.label(),
            icp.social_group.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
