use owo_colors::OwoColorize;
use tabled::{settings::Style, Table, Tabled};

use crate::report::ResolutionReport;
use crate::ui::theme;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct AssignmentRow {
    #[tabled(rename = "Namespace")]
    pub namespace: String,
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

#[derive(Tabled)]
pub struct UnresolvedRow {
    #[tabled(rename = "Namespace")]
    pub namespace: String,
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Waiting on")]
    pub waiting_on: String,
    #[tabled(rename = "Blocked by")]
    pub blocked_by: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<TableRow> = stats
        .iter()
        .map(|(label, value)| TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        })
        .collect();
    render(&rows)
}

pub fn assignment_table(report: &ResolutionReport) -> String {
    let rows: Vec<AssignmentRow> = report
        .assignments
        .iter()
        .map(|assigned| {
            let style = if assigned.kind == "fixed" {
                theme().fixed.clone()
            } else {
                theme().name.clone()
            };
            AssignmentRow {
                namespace: assigned.namespace.clone(),
                entity: assigned.entity.clone(),
                kind: assigned.kind.to_string(),
                name: assigned.name.style(style).to_string(),
            }
        })
        .collect();
    render(&rows)
}

pub fn unresolved_table(report: &ResolutionReport) -> String {
    let rows: Vec<UnresolvedRow> = report
        .unresolved
        .iter()
        .map(|entity| UnresolvedRow {
            namespace: entity.namespace.clone(),
            entity: entity.entity.clone(),
            waiting_on: entity.waiting_on.join(", "),
            blocked_by: entity.blocked_by.join(", "),
        })
        .collect();
    render(&rows)
}
