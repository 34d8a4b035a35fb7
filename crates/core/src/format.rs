use chrono::{DateTime, Utc};

use crate::{
    alerts::{Alert, format_urgency},
    facility::FacilitySnapshot,
    orchestrator::Answers,
    types::{Event, Todo},
};

/// Relative age, e.g. "3 days ago". Future timestamps read as "Just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then);
    if diff.num_seconds() <= 0 {
        return "Just now".to_string();
    }

    let days = diff.num_days();
    let seconds = diff.num_seconds() - days * 86400;
    if days > 0 {
        format!("{} days ago", days)
    } else if seconds > 3600 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds > 60 {
        format!("{} minutes ago", seconds / 60)
    } else {
        "Just now".to_string()
    }
}

pub fn format_answers(answers: &Answers) -> String {
    answers
        .as_array()
        .iter()
        .map(|a| if *a { "Yes" } else { "No" })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text gauge such as `[██████████████████░░] 92.0 / 100`.
pub fn format_gauge(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:.1} / {}",
        "█".repeat(filled),
        "░".repeat(width - filled),
        value,
        max
    )
}

pub fn format_event_line(event: &Event, now: DateTime<Utc>) -> String {
    format!(
        "{} - {} ({}) Status: {}",
        event.kind,
        event.details,
        time_ago(event.time, now),
        event.status
    )
}

pub fn format_todo_line(todo: &Todo) -> String {
    let mark = if todo.done { "[x]" } else { "[ ]" };
    if todo.event.is_empty() && todo.risk.is_empty() {
        format!("{} {}", mark, todo.action)
    } else {
        format!(
            "{} {} (Event: {}, Risk: {})",
            mark, todo.action, todo.event, todo.risk
        )
    }
}

/// Markdown view of one alert card.
pub fn format_alert_readable(alert: &Alert, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    output.push_str(&format!("### {} ({})\n\n", alert.label, alert.short_id()));
    output.push_str(&format!(
        "**Event:** {} - {}\n",
        alert.event.kind, alert.event.details
    ));
    output.push_str(&format!("**Auto Action:** {}\n", alert.auto_action));
    output.push_str(&format!(
        "**Urgency:** {}\n",
        format_urgency(alert.urgency_secs)
    ));
    output.push_str(&format!("**Created:** {}\n", time_ago(alert.created, now)));
    output
}

/// Legacy-vs-new comparison with a score bar per feature.
pub fn format_benefits_readable(facility: &FacilitySnapshot) -> String {
    let mut output = String::new();
    output.push_str("## Legacy vs New System Benefits\n\n");
    for benefit in &facility.benefits {
        output.push_str(&format!(
            "• **{}**: {}\n",
            benefit.feature, benefit.description
        ));
    }
    output.push('\n');

    output.push_str("## Benefit Impact Scores\n\n");
    let width = facility
        .benefits
        .iter()
        .map(|b| b.feature.len())
        .max()
        .unwrap_or(0);
    for benefit in &facility.benefits {
        output.push_str(&format!(
            "{:<width$}  {} {}\n",
            benefit.feature,
            "█".repeat(usize::from(benefit.score) / 5),
            benefit.score,
        ));
    }
    output
}
