//! One user action at a time: load everything, mutate, persist what changed.

use crate::{
    alerts::{Alert, AlertMatrix},
    client::Completer,
    error::{ChemError, Result},
    orchestrator::{Answers, Decision, OrchestratorEntry, decide},
    prompts,
    store::{SessionState, Store},
    triage::{match_event, parse_triage},
    types::{Event, EventKind, RiskLevel, Todo},
};

pub struct Session {
    store: Store,
    events: Vec<Event>,
    todos: Vec<Todo>,
    state: SessionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoRefresh {
    /// The triage call succeeded and todos were replaced.
    Replaced { todos: usize, alerts: usize },
    /// The completion had no parseable rows; previous todos were kept.
    Unchanged,
    /// There are no events to triage.
    NoEvents,
}

impl Session {
    pub async fn open(store: Store) -> Result<Self> {
        let events = store.load_events().await?;
        let todos = store.load_todos().await?;
        let state = store.load_session().await?;
        tracing::debug!(
            events = events.len(),
            todos = todos.len(),
            alerts = state.alerts.all().len(),
            "session loaded"
        );
        Ok(Self {
            store,
            events,
            todos,
            state,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, limit: usize) -> &[Event] {
        &self.events[..limit.min(self.events.len())]
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn alerts(&self) -> &AlertMatrix {
        &self.state.alerts
    }

    pub fn orchestrator_log(&self) -> &[OrchestratorEntry] {
        &self.state.orchestrator_log
    }

    pub async fn add_event(&mut self, kind: EventKind, details: &str) -> Result<&Event> {
        let event = Event::new(kind, details)?;
        tracing::info!(id = %event.short_id(), kind = %event.kind, "event added");
        self.events.insert(0, event);
        self.store.save_events(&self.events).await?;
        Ok(&self.events[0])
    }

    /// Resolve a full id or a unique id prefix to an index into `events`.
    fn event_index(&self, reference: &str) -> Result<usize> {
        let reference = reference.trim().to_ascii_lowercase().replace('-', "");
        if reference.is_empty() {
            return Err(ChemError::EventNotFound { reference });
        }

        let mut matches = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.id.simple().to_string().starts_with(&reference))
            .map(|(i, _)| i);

        match (matches.next(), matches.next()) {
            (Some(i), None) => Ok(i),
            (Some(_), Some(_)) => Err(ChemError::AmbiguousEvent { reference }),
            (None, _) => Err(ChemError::EventNotFound { reference }),
        }
    }

    pub fn find_event(&self, reference: &str) -> Result<&Event> {
        Ok(&self.events[self.event_index(reference)?])
    }

    /// Run the decision gate for one event: log it, set its status and raise the alert.
    pub async fn orchestrate(&mut self, reference: &str, answers: Answers) -> Result<Decision> {
        let idx = self.event_index(reference)?;
        let decision = decide(answers);

        let event = &mut self.events[idx];
        event.status = decision.outcome;
        let entry = OrchestratorEntry::new(event, answers, &decision);
        let alert = Alert::from_type(event, decision.alert_type);
        tracing::info!(id = %event.short_id(), outcome = %decision.outcome, "orchestrator decision");

        self.state.orchestrator_log.insert(0, entry);
        self.state.alerts.raise(alert);

        self.store.save_events(&self.events).await?;
        self.store.save_session(&self.state).await?;
        Ok(decision)
    }

    pub async fn dismiss_alert(&mut self, reference: &str) -> Result<Alert> {
        let alert = self.state.alerts.dismiss(reference)?.clone();
        self.store.save_session(&self.state).await?;
        Ok(alert)
    }

    /// Mark a todo (1-based, as listed) done or not done.
    pub async fn set_todo_done(&mut self, index: usize, done: bool) -> Result<&Todo> {
        let len = self.todos.len();
        let todo = index
            .checked_sub(1)
            .and_then(|i| self.todos.get_mut(i))
            .ok_or(ChemError::TodoOutOfRange { index, len })?;

        if todo.done != done {
            todo.done = done;
            self.store.save_todos(&self.todos).await?;
        }
        Ok(&self.todos[index - 1])
    }

    pub async fn add_manual_todos(&mut self, actions: &[String]) -> Result<usize> {
        if actions.is_empty() {
            return Ok(0);
        }
        self.todos
            .extend(actions.iter().map(|action| Todo::manual(action)));
        self.store.save_todos(&self.todos).await?;
        Ok(actions.len())
    }

    /// Ask the model to triage recent events and replace the todo list with its answer.
    pub async fn refresh_todos<C: Completer>(&mut self, completer: &C) -> Result<TodoRefresh> {
        if self.events.is_empty() {
            return Ok(TodoRefresh::NoEvents);
        }

        let prompt = prompts::todo_prompt(&self.events);
        let text = completer.complete(&prompt).await?;
        let rows = parse_triage(&text);
        if rows.is_empty() {
            tracing::warn!("triage response contained no parseable rows");
            return Ok(TodoRefresh::Unchanged);
        }

        let mut todos = Vec::with_capacity(rows.len());
        let mut alerts = 0;
        for row in rows {
            let risk = RiskLevel::parse(&row.risk);
            let event_id = match_event(&self.events, &row.event).map(|e| e.id);

            let linked = event_id.and_then(|id| self.events.iter_mut().find(|e| e.id == id));
            if let Some(event) = linked {
                event.urgency = Some(risk);
                self.state.alerts.replace_for_event(Alert::from_risk(
                    event,
                    risk,
                    Some(row.action.as_str()),
                ));
                alerts += 1;
            }

            todos.push(Todo {
                event: row.event,
                event_id,
                risk: row.risk,
                action: row.action,
                done: false,
            });
        }

        let count = todos.len();
        self.todos = todos;
        self.store.save_todos(&self.todos).await?;
        if alerts > 0 {
            self.store.save_events(&self.events).await?;
            self.store.save_session(&self.state).await?;
        }
        tracing::info!(todos = count, alerts, "todo list refreshed");

        Ok(TodoRefresh::Replaced {
            todos: count,
            alerts,
        })
    }
}
