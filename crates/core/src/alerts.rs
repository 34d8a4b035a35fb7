//! Alert matrix: risk and alert-type tables plus the alert list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ChemError, Result},
    types::{Event, EventRef, RiskLevel, short_id},
};

pub const MINUTE: u64 = 60;
pub const HOUR: u64 = 3600;
pub const DAY: u64 = 86400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertClass {
    Critical,
    Compliance,
    Asset,
    Rounding,
    Training,
}

/// What raised an alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    #[default]
    Orchestrator,
    Triage,
}

/// Alert categories raised by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    CriticalSafety,
    ComplianceDrift,
    AssetFailureRisk,
    Rounding,
    TrainingLapse,
}

pub struct AlertTypeDef {
    pub label: &'static str,
    pub class: AlertClass,
    pub auto_action: &'static str,
    pub urgency_secs: u64,
}

impl AlertType {
    pub fn def(&self) -> AlertTypeDef {
        match self {
            AlertType::CriticalSafety => AlertTypeDef {
                label: "Critical Safety",
                class: AlertClass::Critical,
                auto_action: "Shutdown command issued",
                urgency_secs: MINUTE,
            },
            AlertType::ComplianceDrift => AlertTypeDef {
                label: "Compliance Drift",
                class: AlertClass::Compliance,
                auto_action: "Draft gap report generated",
                urgency_secs: HOUR,
            },
            AlertType::AssetFailureRisk => AlertTypeDef {
                label: "Asset Failure Risk",
                class: AlertClass::Asset,
                auto_action: "Maintenance task scheduled",
                urgency_secs: 15 * MINUTE,
            },
            AlertType::Rounding => AlertTypeDef {
                label: "Rounding",
                class: AlertClass::Rounding,
                auto_action: "Small alert & data adjust",
                urgency_secs: 4 * HOUR,
            },
            AlertType::TrainingLapse => AlertTypeDef {
                label: "Training Lapse",
                class: AlertClass::Training,
                auto_action: "Auto-assign micro-course",
                urgency_secs: DAY,
            },
        }
    }
}

/// Class and urgency window for an AI-assigned risk level.
pub fn risk_profile(risk: RiskLevel) -> (AlertClass, u64) {
    match risk {
        RiskLevel::High => (AlertClass::Critical, MINUTE),
        RiskLevel::Medium => (AlertClass::Asset, 15 * MINUTE),
        RiskLevel::Low => (AlertClass::Rounding, 4 * HOUR),
        RiskLevel::Training => (AlertClass::Training, DAY),
        RiskLevel::Compliance => (AlertClass::Compliance, HOUR),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub label: String,
    pub class: AlertClass,
    #[serde(default)]
    pub auto_action: String,
    pub event: EventRef,
    pub created: DateTime<Utc>,
    pub urgency_secs: u64,
    #[serde(default)]
    pub source: AlertSource,
    #[serde(default)]
    pub dismissed: bool,
}

impl Alert {
    pub fn from_risk(event: &Event, risk: RiskLevel, auto_action: Option<&str>) -> Self {
        let (class, urgency_secs) = risk_profile(risk);
        Self {
            id: Uuid::new_v4(),
            label: risk.label().to_string(),
            class,
            auto_action: auto_action.unwrap_or_default().to_string(),
            event: EventRef::from(event),
            created: Utc::now(),
            urgency_secs,
            source: AlertSource::Triage,
            dismissed: false,
        }
    }

    pub fn from_type(event: &Event, alert_type: AlertType) -> Self {
        let def = alert_type.def();
        Self {
            id: Uuid::new_v4(),
            label: def.label.to_string(),
            class: def.class,
            auto_action: def.auto_action.to_string(),
            event: EventRef::from(event),
            created: Utc::now(),
            urgency_secs: def.urgency_secs,
            source: AlertSource::Orchestrator,
            dismissed: false,
        }
    }

    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

/// Newest-first alert list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertMatrix {
    alerts: Vec<Alert>,
}

impl AlertMatrix {
    pub fn raise(&mut self, alert: Alert) {
        tracing::info!(label = %alert.label, event = %alert.event.details, "alert raised");
        self.alerts.insert(0, alert);
    }

    /// Raise `alert`, dropping any active alert from the same source for the same event.
    pub fn replace_for_event(&mut self, alert: Alert) {
        let before = self.alerts.len();
        self.alerts.retain(|a| {
            a.dismissed || a.source != alert.source || a.event.id != alert.event.id
        });
        let replaced = before - self.alerts.len();
        if replaced > 0 {
            tracing::debug!(replaced, event = %alert.event.id, "superseded alerts dropped");
        }
        self.raise(alert);
    }

    pub fn active(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.dismissed)
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    /// Dismiss the single active alert whose id starts with `reference`.
    pub fn dismiss(&mut self, reference: &str) -> Result<&Alert> {
        let reference = reference.trim().to_ascii_lowercase();
        let not_found = || ChemError::AlertNotFound {
            reference: reference.clone(),
        };
        if reference.is_empty() {
            return Err(not_found());
        }

        let mut matches = self
            .alerts
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.dismissed && a.id.simple().to_string().starts_with(&reference))
            .map(|(i, _)| i);

        let idx = matches.next().ok_or_else(not_found)?;
        if matches.next().is_some() {
            return Err(ChemError::AmbiguousAlert { reference });
        }

        let alert = &mut self.alerts[idx];
        alert.dismissed = true;
        Ok(&*alert)
    }
}

/// Render an urgency window as `Nm`, `Nh` or `Nd`.
pub fn format_urgency(urgency_secs: u64) -> String {
    if urgency_secs < HOUR {
        format!("{}m", urgency_secs / MINUTE)
    } else if urgency_secs < DAY {
        format!("{}h", urgency_secs / HOUR)
    } else {
        format!("{}d", urgency_secs / DAY)
    }
}
