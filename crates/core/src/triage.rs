//! Parsers for the free-text completions returned by the triage prompts.

use crate::types::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRow {
    pub event: String,
    pub risk: String,
    pub action: String,
}

const LIST_MARKERS: &[char] = &['-', '•', '*', ' '];
const ACTION_ITEM_TRIM: &[char] = &[
    '-', '•', '*', ' ', '.', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Strip a leading `-`, `•`, `*`, `1.` or `1)` list marker.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(LIST_MARKERS);
    let unnumbered = line.trim_start_matches(|c: char| c.is_ascii_digit());
    match unnumbered.strip_prefix(['.', ')']) {
        Some(rest) if unnumbered.len() < line.len() => rest.trim_start(),
        _ => line,
    }
}

/// Parse `Event: .. | Risk: .. | Action: ..` lines. Everything else is ignored.
pub fn parse_triage(text: &str) -> Vec<TriageRow> {
    text.lines()
        .filter(|line| line.contains("| Risk:") && line.contains("| Action:"))
        .filter_map(|line| {
            let mut parts = line.split('|');
            let event = strip_list_marker(parts.next()?.trim());
            let risk = parts.next()?;
            let action = parts.next()?;

            let row = TriageRow {
                event: event.replace("Event:", "").trim().to_string(),
                risk: risk.replace("Risk:", "").trim().to_string(),
                action: action.replace("Action:", "").trim().to_string(),
            };
            (!row.action.is_empty()).then_some(row)
        })
        .collect()
}

/// Turn a bulleted or numbered list into bare action items.
pub fn extract_action_items(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_matches(ACTION_ITEM_TRIM).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// First (newest) event whose details contain the text the model echoed back.
pub fn match_event<'a>(events: &'a [Event], event_text: &str) -> Option<&'a Event> {
    if event_text.is_empty() {
        return None;
    }
    events.iter().find(|e| e.details.contains(event_text))
}
