use crate::{facility::FacilitySnapshot, types::Event};

/// How many recent events go into the triage and insight prompts.
pub const TRIAGE_WINDOW: usize = 10;
/// How many recent events go into the one-off analysis and report prompts.
pub const SUMMARY_WINDOW: usize = 5;

pub fn format_events_with_status(events: &[Event], limit: usize) -> String {
    events
        .iter()
        .take(limit)
        .map(|e| format!("{}: {} (Status: {})", e.kind, e.details, e.status))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_events_plain(events: &[Event], limit: usize, prefix: &str) -> String {
    events
        .iter()
        .take(limit)
        .map(|e| format!("{}{}: {}", prefix, e.kind, e.details))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn insights_prompt(events: &[Event]) -> String {
    format!(
        r#"Analyze these chemical facility events and provide actionable insights:

Recent Events:
{events}

Provide a concise analysis with:
1. Key patterns identified
2. Risk assessment
3. Immediate action items
4. Compliance implications
5. Recommended preventive measures

Format as bullet points for easy reading."#,
        events = format_events_with_status(events, TRIAGE_WINDOW)
    )
}

pub fn todo_prompt(events: &[Event]) -> String {
    format!(
        "Analyze these chemical facility events and for each event, provide:\n\
         - A risk level (High, Medium, Low)\n\
         - A recommended action item\n\
         Format as: Event: <event details> | Risk: <risk> | Action: <todo>\n\n\
         Recent Events:\n{}\n",
        format_events_with_status(events, TRIAGE_WINDOW)
    )
}

pub fn recent_analysis_prompt(events: &[Event]) -> String {
    format!(
        r#"Analyze these recent chemical facility events and provide insights on patterns, risks, and recommendations:

Events:
{events}

Please provide a detailed analysis including:
1. Risk assessment
2. Pattern identification
3. Recommended actions
4. Compliance implications"#,
        events = format_events_plain(events, SUMMARY_WINDOW, "")
    )
}

pub fn facility_report_prompt(events: &[Event], facility: &FacilitySnapshot) -> String {
    let events_summary = if events.is_empty() {
        String::new()
    } else {
        format!(
            "\nRecent Events Summary:\n{}",
            format_events_plain(events, SUMMARY_WINDOW, "- ")
        )
    };

    format!(
        r#"Generate a comprehensive AI report for a chemical energy facility with the following data:

Compliance Rate: {compliance}%
Cost: ${cost}{unit}
Recent Events: {count} events{events_summary}
Assets: {assets} assets monitored

Please provide:
1. Executive Summary
2. Key Performance Indicators
3. Risk Assessment
4. Recommendations
5. Next Steps"#,
        compliance = facility.compliance,
        cost = facility.cost,
        unit = facility.cost_unit,
        count = events.len(),
        assets = facility.assets.len(),
    )
}

pub fn maintenance_prompt(facility: &FacilitySnapshot) -> String {
    let assets = facility
        .assets
        .iter()
        .map(|a| format!("{}: {} ({} risk)", a.name, a.status, a.risk))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Based on the following asset data, predict maintenance needs and provide recommendations:

Assets:
{assets}

Please provide:
1. Maintenance predictions for each asset
2. Priority recommendations
3. Timeline suggestions
4. Cost implications
5. Risk mitigation strategies"#
    )
}
