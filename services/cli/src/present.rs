use credit_intake::intake::{DecisionRecord, StepView, ValidationReport};

pub(crate) fn step(view: &StepView<'_>) -> String {
    let mut lines = vec![format!(
        "\nStep {}/{}: {}",
        view.index + 1,
        view.total,
        view.label
    )];

    for option in view.options {
        lines.push(format!("  {:<12} {}", option.value, option.label));
    }

    if let Some(error) = view.error {
        lines.push(format!("  ! {error}"));
    }

    let mut hints = Vec::new();
    if !view.is_first {
        hints.push(":back to go back");
    }
    hints.push(":quit to leave");
    lines.push(format!("  ({})", hints.join(", ")));

    lines.join("\n")
}

pub(crate) fn overlay(message: &str) -> String {
    format!("\n== Error ==\n{message}")
}

pub(crate) fn decision(record: &DecisionRecord) -> String {
    format!(
        "\nDecision received {}\n{}",
        record.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
        record.result.pretty()
    )
}

pub(crate) fn report(report: &ValidationReport) -> String {
    let mut lines = vec!["Some fields still need attention:".to_string()];
    for error in &report.errors {
        lines.push(format!("  - {}: {}", error.field.label(), error.message));
    }
    lines.join("\n")
}
