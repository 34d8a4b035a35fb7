use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChemError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "Autonomous Asset Ping")]
    AutonomousAssetPing,
    #[serde(rename = "Scheduled Cycle")]
    ScheduledCycle,
    #[serde(rename = "Regulatory Update")]
    RegulatoryUpdate,
    #[serde(rename = "Contractor Event")]
    ContractorEvent,
    #[serde(rename = "Incident Flag")]
    IncidentFlag,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::AutonomousAssetPing,
        EventKind::ScheduledCycle,
        EventKind::RegulatoryUpdate,
        EventKind::ContractorEvent,
        EventKind::IncidentFlag,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::AutonomousAssetPing => "Autonomous Asset Ping",
            EventKind::ScheduledCycle => "Scheduled Cycle",
            EventKind::RegulatoryUpdate => "Regulatory Update",
            EventKind::ContractorEvent => "Contractor Event",
            EventKind::IncidentFlag => "Incident Flag",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an event stands after the orchestrator has (or has not) looked at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Pending,
    Escalate,
    #[serde(rename = "Schedule Task")]
    ScheduleTask,
    #[serde(rename = "Auto-Resolve")]
    AutoResolve,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Escalate => "Escalate",
            EventStatus::ScheduleTask => "Schedule Task",
            EventStatus::AutoResolve => "Auto-Resolve",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk label produced by AI triage. Anything unrecognised is treated as `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RiskLevel {
    High,
    Medium,
    #[default]
    Low,
    Training,
    Compliance,
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "training" => RiskLevel::Training,
            "compliance" => RiskLevel::Compliance,
            _ => RiskLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::Training => "Training",
            RiskLevel::Compliance => "Compliance",
        }
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        RiskLevel::parse(&raw)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub details: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<RiskLevel>,
}

impl Event {
    /// Build a pending event, rejecting blank details the way the entry form does.
    pub fn new(kind: EventKind, details: &str) -> Result<Self> {
        let details = details.trim();
        if details.is_empty() {
            return Err(ChemError::Validation {
                reason: "event details must not be empty".to_string(),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            details: details.to_string(),
            time: Utc::now(),
            status: EventStatus::Pending,
            urgency: None,
        })
    }

    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

/// Identity of an event as captured at the moment an alert or decision was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRef {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub details: String,
}

impl From<&Event> for EventRef {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            kind: event.kind,
            details: event.details.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub risk: String,
    pub action: String,
    #[serde(default)]
    pub done: bool,
}

impl Todo {
    pub fn manual(action: &str) -> Self {
        Self {
            event: String::new(),
            event_id: None,
            risk: String::new(),
            action: action.to_string(),
            done: false,
        }
    }
}

pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_rejects_blank_details() {
        let err = Event::new(EventKind::IncidentFlag, "   ").unwrap_err();
        assert!(matches!(err, ChemError::Validation { .. }));
    }

    #[test]
    fn event_trims_details_and_starts_pending() {
        let event = Event::new(EventKind::ScheduledCycle, "  valve check  ").unwrap();
        assert_eq!(event.details, "valve check");
        assert_eq!(event.status, EventStatus::Pending);
        assert!(event.urgency.is_none());
    }

    #[test]
    fn event_serializes_with_display_labels() {
        let mut event = Event::new(EventKind::ContractorEvent, "scaffold up").unwrap();
        event.status = EventStatus::ScheduleTask;
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Contractor Event");
        assert_eq!(json["status"], "Schedule Task");
        assert!(json.get("urgency").is_none());
    }

    #[test]
    fn risk_level_parse_falls_back_to_low() {
        assert_eq!(RiskLevel::parse(" HIGH "), RiskLevel::High);
        assert_eq!(RiskLevel::parse("compliance"), RiskLevel::Compliance);
        assert_eq!(RiskLevel::parse("Severe"), RiskLevel::Low);
        let parsed: RiskLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, RiskLevel::Medium);
    }

    #[test]
    fn todo_tolerates_missing_optional_fields() {
        let todo: Todo = serde_json::from_str(r#"{"event": "x", "action": "inspect"}"#).unwrap();
        assert!(!todo.done);
        assert!(todo.event_id.is_none());
        assert_eq!(todo.risk, "");
    }
}
