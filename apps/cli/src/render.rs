//! Console views, one per dashboard page.

use std::path::Path;

use chrono::Utc;
use console::{StyledObject, style};

use chemecare_core::{
    AlertClass, AlertMatrix, ChatClient, ChemError, Event, EventStatus, FacilitySnapshot,
    OrchestratorEntry, Provider, Session, Todo, format_alert_readable, format_answers,
    format_benefits_readable, format_event_line, format_gauge, format_todo_line,
};

const RULE_WIDTH: usize = 60;

fn rule() {
    println!("{}", style("─".repeat(RULE_WIDTH)).dim());
}

fn header(title: &str) {
    println!("\n{}", style(title).cyan().bold());
    rule();
}

fn info(msg: &str) {
    println!("{}", style(msg).dim());
}

pub fn outcome(status: EventStatus) -> StyledObject<&'static str> {
    let label = status.label();
    match status {
        EventStatus::Escalate => style(label).red().bold(),
        EventStatus::ScheduleTask => style(label).yellow().bold(),
        EventStatus::AutoResolve => style(label).green().bold(),
        EventStatus::Pending => style(label).dim(),
    }
}

fn alert_label(class: AlertClass, label: &str) -> StyledObject<&str> {
    let styled = style(label).bold();
    match class {
        AlertClass::Critical => styled.red(),
        AlertClass::Compliance => styled.color256(208),
        AlertClass::Asset => styled.green(),
        AlertClass::Rounding => styled.magenta(),
        AlertClass::Training => styled.blue(),
    }
}

pub fn home(session: &Session) {
    println!(
        "\n{}  {}\n",
        style("Chem-E-Care").cyan().bold(),
        style("Facility Operations").dim()
    );
    println!("Manage your chemical energy facility with unified insights and AI-powered tools.\n");
    println!(
        "{} events logged · {} active alerts · {} open todos",
        style(session.events().len()).yellow(),
        style(session.alerts().active().count()).yellow(),
        style(session.todos().iter().filter(|t| !t.done).count()).yellow()
    );
    println!(
        "{} {}",
        style("Data:").dim(),
        style(session.store().dir().display()).cyan()
    );
    println!(
        "\n{} chemecare event add --type incident-flag \"...\"",
        style("Get started:").dim()
    );
}

pub fn events(events: &[Event]) {
    header("Recent Events");
    if events.is_empty() {
        info("No events yet.");
        return;
    }
    let now = Utc::now();
    for event in events {
        println!(
            "{} {}",
            style(event.short_id()).dim(),
            format_event_line(event, now)
        );
    }
}

pub fn decisions(log: &[OrchestratorEntry], limit: usize) {
    header("Orchestrator Decisions");
    if log.is_empty() {
        info("No orchestrator decisions yet.");
        return;
    }
    for entry in log.iter().take(limit) {
        println!(
            "{} - {}",
            style(entry.event.kind).bold(),
            entry.event.details
        );
        println!("  Answers: {}", format_answers(&entry.answers));
        println!("  Outcome: {}\n", outcome(entry.outcome));
    }
}

pub fn alerts(matrix: &AlertMatrix, include_dismissed: bool) {
    header("Alert Matrix");
    let now = Utc::now();
    let mut shown = 0;
    for alert in matrix.all() {
        if alert.dismissed && !include_dismissed {
            continue;
        }
        shown += 1;
        let readable = format_alert_readable(alert, now);
        let mut lines = readable.lines();
        if lines.next().is_some() {
            let suffix = if alert.dismissed { " (dismissed)" } else { "" };
            println!(
                "{} {}{}",
                alert_label(alert.class, &alert.label),
                style(alert.short_id()).dim(),
                style(suffix).dim()
            );
        }
        for line in lines.filter(|l| !l.is_empty()) {
            println!("  {}", line);
        }
        println!();
    }
    if shown == 0 {
        info("No alerts yet.");
    }
}

pub fn dashboard(facility: &FacilitySnapshot) {
    header("Asset Map");
    for asset in &facility.assets {
        let status = match asset.risk {
            "High" => style(asset.status).red(),
            "Medium" => style(asset.status).yellow(),
            _ => style(asset.status).green(),
        };
        println!(
            "{:>2}  {:<12} {:<10} {:<7} {}",
            asset.id,
            asset.name,
            status,
            asset.risk,
            style(asset.trend).dim()
        );
    }

    header("Compliance Gauge");
    println!(
        "Compliance % {}",
        format_gauge(f64::from(facility.compliance), 100.0, 30)
    );

    header(&format!("Cost vs Budget ({})", facility.cost_unit));
    let scale = facility.cost_scale;
    let gauge = format_gauge(facility.cost, scale.max, 30);
    let gauge = if facility.cost >= scale.alarm {
        style(gauge).red()
    } else if facility.cost >= scale.warn {
        style(gauge).yellow()
    } else {
        style(gauge).green()
    };
    println!("{}", gauge);

    header("Training Status");
    for record in &facility.training {
        let status = match record.status {
            "Expired" => style(record.status).red(),
            "Expiring" => style(record.status).yellow(),
            _ => style(record.status).green(),
        };
        println!("{:<8} {:<10} expires {}", record.name, status, record.expires);
    }

    header("AI Insights");
    for insight in &facility.insights {
        println!("• {}", insight);
    }
}

pub fn todos(todos: &[Todo]) {
    header("AI-Generated Todo List");
    if todos.is_empty() {
        info("No AI-generated todos available.");
        return;
    }
    for (idx, todo) in todos.iter().enumerate() {
        let line = format_todo_line(todo);
        let line = if todo.done {
            style(line).dim()
        } else {
            style(line)
        };
        println!("{:>3}. {}", idx + 1, line);
    }
}

pub fn status(provider: &Provider, client: Result<ChatClient, ChemError>, secrets_path: &Path) {
    match client {
        Ok(client) => println!(
            "{} AI Analysis: Ready ({} via {})",
            style("●").green().bold(),
            provider.name(),
            client.model()
        ),
        Err(e) => {
            println!("{} AI Analysis: Not available", style("●").red().bold());
            println!("  {}", e);
            println!(
                "  {} {}",
                style("Secrets file:").dim(),
                style(secrets_path.display()).cyan()
            );
        }
    }
}

pub fn benefits(facility: &FacilitySnapshot) {
    header("Benefits Comparison");
    println!("{}", format_benefits_readable(facility));
}
