use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    alerts::AlertType,
    types::{Event, EventRef, EventStatus},
};

/// Answers to the three gate questions, in the order they are asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub safety_impact: bool,
    pub compliance_deviation: bool,
    pub asset_health_risk: bool,
}

impl Answers {
    pub fn as_array(&self) -> [bool; 3] {
        [
            self.safety_impact,
            self.compliance_deviation,
            self.asset_health_risk,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub outcome: EventStatus,
    pub color: &'static str,
    pub alert_type: AlertType,
}

pub fn decide(answers: Answers) -> Decision {
    if answers.safety_impact {
        Decision {
            outcome: EventStatus::Escalate,
            color: "#ff4d4f",
            alert_type: AlertType::CriticalSafety,
        }
    } else if answers.compliance_deviation || answers.asset_health_risk {
        Decision {
            outcome: EventStatus::ScheduleTask,
            color: "#faad14",
            alert_type: if answers.asset_health_risk {
                AlertType::AssetFailureRisk
            } else {
                AlertType::ComplianceDrift
            },
        }
    } else {
        Decision {
            outcome: EventStatus::AutoResolve,
            color: "#52c41a",
            alert_type: AlertType::Rounding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorEntry {
    pub event: EventRef,
    pub answers: Answers,
    pub outcome: EventStatus,
    pub color: String,
    pub timestamp: DateTime<Utc>,
}

impl OrchestratorEntry {
    pub fn new(event: &Event, answers: Answers, decision: &Decision) -> Self {
        Self {
            event: EventRef::from(event),
            answers,
            outcome: decision.outcome,
            color: decision.color.to_string(),
            timestamp: Utc::now(),
        }
    }
}
