//! Chem-E-Care Core Library
//!
//! Facility event log backed by flat JSON files, a three-question decision
//! gate, an alert matrix, and prompt builders plus parsers for LLM triage.

pub mod alerts;
pub mod client;
pub mod config;
pub mod error;
pub mod facility;
pub mod format;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod session;
pub mod store;
pub mod triage;
pub mod types;

// Re-export commonly used items at crate root
pub use alerts::{Alert, AlertClass, AlertMatrix, AlertSource, AlertType, format_urgency};
pub use client::{ChatClient, Completer};
pub use config::{AppConfig, Secrets};
pub use error::{ChemError, Result};
pub use facility::FacilitySnapshot;
pub use format::{
    format_alert_readable, format_answers, format_benefits_readable, format_event_line,
    format_gauge, format_todo_line, time_ago,
};
pub use orchestrator::{Answers, Decision, OrchestratorEntry, decide};
pub use provider::{Provider, ProviderConfig};
pub use session::{Session, TodoRefresh};
pub use store::{SessionState, Store, get_root_data_dir};
pub use triage::{TriageRow, extract_action_items, match_event, parse_triage};
pub use types::{Event, EventKind, EventStatus, RiskLevel, Todo};
