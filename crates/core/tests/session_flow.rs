use std::cell::RefCell;

use chemecare_core::{
    AlertClass, Answers, ChemError, Completer, EventKind, EventStatus, Result, RiskLevel, Session,
    Store, TodoRefresh,
};

/// Returns a canned completion and remembers the prompt it was given.
struct ScriptedCompleter {
    reply: std::result::Result<String, u16>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedCompleter {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl Completer for ScriptedCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ChemError::ApiStatus {
                status: *status,
                body: "boom".to_string(),
            }),
        }
    }
}

async fn open(dir: &std::path::Path) -> Session {
    Session::open(Store::new(dir)).await.unwrap()
}

#[tokio::test]
async fn added_event_reads_back_equal() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let added = session
        .add_event(EventKind::IncidentFlag, "chlorine sensor tripped")
        .await
        .unwrap()
        .clone();

    let reopened = open(dir.path()).await;
    assert_eq!(reopened.events(), &[added]);
}

#[tokio::test]
async fn newest_event_comes_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_event(EventKind::ScheduledCycle, "first")
        .await
        .unwrap();
    session
        .add_event(EventKind::ScheduledCycle, "second")
        .await
        .unwrap();

    let details: Vec<_> = session.events().iter().map(|e| e.details.as_str()).collect();
    assert_eq!(details, vec!["second", "first"]);
    assert_eq!(session.recent_events(1).len(), 1);
    assert_eq!(session.recent_events(10).len(), 2);
}

#[tokio::test]
async fn blank_event_is_rejected_and_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let err = session
        .add_event(EventKind::ContractorEvent, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, ChemError::Validation { .. }));
    assert!(!Store::new(dir.path()).events_path().exists());
}

#[tokio::test]
async fn orchestrate_sets_status_logs_and_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let id = session
        .add_event(EventKind::AutonomousAssetPing, "turbine #3 vibration")
        .await
        .unwrap()
        .short_id();

    let answers = Answers {
        safety_impact: false,
        compliance_deviation: true,
        asset_health_risk: true,
    };
    let decision = session.orchestrate(&id, answers).await.unwrap();
    assert_eq!(decision.outcome, EventStatus::ScheduleTask);

    let reopened = open(dir.path()).await;
    assert_eq!(reopened.events()[0].status, EventStatus::ScheduleTask);
    assert_eq!(reopened.orchestrator_log().len(), 1);
    assert_eq!(reopened.orchestrator_log()[0].answers, answers);

    let alert = reopened.alerts().active().next().unwrap();
    assert_eq!(alert.label, "Asset Failure Risk");
    assert_eq!(alert.class, AlertClass::Asset);
    assert_eq!(alert.auto_action, "Maintenance task scheduled");
}

#[tokio::test]
async fn events_resolve_by_full_id_or_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let id = session
        .add_event(EventKind::ContractorEvent, "hot work permit")
        .await
        .unwrap()
        .id;

    assert_eq!(session.find_event(&id.to_string()).unwrap().id, id);
    assert_eq!(session.find_event(&id.simple().to_string()[..6]).unwrap().id, id);
    assert!(matches!(
        session.find_event(""),
        Err(ChemError::EventNotFound { .. })
    ));
}

#[tokio::test]
async fn orchestrate_unknown_event_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let err = session
        .orchestrate("deadbeef", Answers::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ChemError::EventNotFound { .. }));
}

#[tokio::test]
async fn dismissed_alert_stays_dismissed() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let id = session
        .add_event(EventKind::IncidentFlag, "minor spill")
        .await
        .unwrap()
        .short_id();
    session.orchestrate(&id, Answers::default()).await.unwrap();

    let alert_id = session.alerts().active().next().unwrap().short_id();
    session.dismiss_alert(&alert_id).await.unwrap();

    let reopened = open(dir.path()).await;
    assert_eq!(reopened.alerts().active().count(), 0);
    assert_eq!(reopened.alerts().all().len(), 1);
}

#[tokio::test]
async fn refresh_todos_links_events_and_raises_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_event(EventKind::AutonomousAssetPing, "pump P-2 seal leak")
        .await
        .unwrap();
    session
        .add_event(EventKind::RegulatoryUpdate, "new EPA venting rule")
        .await
        .unwrap();

    let completer = ScriptedCompleter::ok(
        "Event: pump P-2 seal leak | Risk: High | Action: Isolate and replace seal\n\
         Event: something unrelated | Risk: Low | Action: Note it\n\
         Some closing remark.",
    );
    let outcome = session.refresh_todos(&completer).await.unwrap();
    assert_eq!(outcome, TodoRefresh::Replaced { todos: 2, alerts: 1 });

    let prompts = completer.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Regulatory Update: new EPA venting rule (Status: Pending)"));
    drop(prompts);

    let reopened = open(dir.path()).await;
    let todos = reopened.todos();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].action, "Isolate and replace seal");
    assert!(todos[0].event_id.is_some());
    assert!(todos[1].event_id.is_none());

    let pump = reopened
        .events()
        .iter()
        .find(|e| e.details.starts_with("pump"))
        .unwrap();
    assert_eq!(pump.urgency, Some(RiskLevel::High));
    assert_eq!(todos[0].event_id, Some(pump.id));

    let alert = reopened.alerts().active().next().unwrap();
    assert_eq!(alert.class, AlertClass::Critical);
    assert_eq!(alert.urgency_secs, 60);
    assert_eq!(alert.auto_action, "Isolate and replace seal");
}

#[tokio::test]
async fn unparseable_triage_keeps_previous_todos() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_event(EventKind::ScheduledCycle, "quarterly relief valve test")
        .await
        .unwrap();
    session
        .add_manual_todos(&["Order spare gaskets".to_string()])
        .await
        .unwrap();

    let completer = ScriptedCompleter::ok("I could not determine any risks.");
    let outcome = session.refresh_todos(&completer).await.unwrap();
    assert_eq!(outcome, TodoRefresh::Unchanged);
    assert_eq!(session.todos().len(), 1);
    assert_eq!(session.todos()[0].action, "Order spare gaskets");
}

#[tokio::test]
async fn refresh_without_events_makes_no_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let completer = ScriptedCompleter::ok("unused");
    assert_eq!(
        session.refresh_todos(&completer).await.unwrap(),
        TodoRefresh::NoEvents
    );
    assert!(completer.prompts.borrow().is_empty());
}

#[tokio::test]
async fn api_failure_surfaces_and_leaves_todos_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_event(EventKind::IncidentFlag, "flare stack smoking")
        .await
        .unwrap();

    let err = session
        .refresh_todos(&ScriptedCompleter::failing(503))
        .await
        .unwrap_err();
    assert!(matches!(err, ChemError::ApiStatus { status: 503, .. }));
    assert!(session.todos().is_empty());
}

#[tokio::test]
async fn todo_checkbox_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_manual_todos(&["Walk the tank farm".to_string(), "File report".to_string()])
        .await
        .unwrap();

    session.set_todo_done(2, true).await.unwrap();
    let reopened = open(dir.path()).await;
    assert!(!reopened.todos()[0].done);
    assert!(reopened.todos()[1].done);

    let mut session = reopened;
    assert!(matches!(
        session.set_todo_done(0, true).await,
        Err(ChemError::TodoOutOfRange { index: 0, len: 2 })
    ));
    assert!(matches!(
        session.set_todo_done(3, true).await,
        Err(ChemError::TodoOutOfRange { index: 3, len: 2 })
    ));
}

#[tokio::test]
async fn repeated_refresh_keeps_one_alert_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    session
        .add_event(EventKind::AutonomousAssetPing, "pump leak")
        .await
        .unwrap();

    let completer = ScriptedCompleter::ok("Event: pump leak | Risk: High | Action: Isolate");
    for _ in 0..3 {
        let mut session = open(dir.path()).await;
        session.refresh_todos(&completer).await.unwrap();
    }

    let reopened = open(dir.path()).await;
    assert_eq!(reopened.alerts().active().count(), 1);
    assert_eq!(reopened.alerts().all().len(), 1);
}

#[tokio::test]
async fn numbered_triage_rows_still_link_events() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path()).await;
    let pump = session
        .add_event(EventKind::AutonomousAssetPing, "pump leak")
        .await
        .unwrap()
        .id;

    let completer = ScriptedCompleter::ok("1. Event: pump leak | Risk: High | Action: Isolate");
    let outcome = session.refresh_todos(&completer).await.unwrap();
    assert_eq!(outcome, TodoRefresh::Replaced { todos: 1, alerts: 1 });
    assert_eq!(session.todos()[0].event, "pump leak");
    assert_eq!(session.todos()[0].event_id, Some(pump));
}
