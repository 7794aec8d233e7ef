//! Report rendering

use console::style;
use shopwright::{ScenarioReport, StepStatus};

/// Render a report as plain text lines, one per step plus a summary.
#[must_use]
pub fn render_text(report: &ScenarioReport, color: bool) -> String {
    let mut out = String::new();
    for step in &report.steps {
        let (mark, detail) = match &step.status {
            StepStatus::Passed => (paint("✓", color, true), String::new()),
            StepStatus::Failed { message } => (paint("✗", color, false), format!(" - {message}")),
        };
        out.push_str(&format!(
            "  {mark} {} ({} ms){detail}\n",
            step.label,
            step.duration.as_millis()
        ));
    }
    let verdict = if report.passed() {
        paint("PASSED", color, true)
    } else {
        paint("FAILED", color, false)
    };
    out.push_str(&format!(
        "{} {verdict} in {:.2}s\n",
        report.name,
        report.duration.as_secs_f64()
    ));
    out
}

fn paint(text: &str, color: bool, ok: bool) -> String {
    if !color {
        return text.to_string();
    }
    if ok {
        style(text).green().bold().to_string()
    } else {
        style(text).red().bold().to_string()
    }
}

/// Print a report to stdout
pub fn print_report(report: &ScenarioReport, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        let color = console::colors_enabled();
        print!("{}", render_text(report, color));
    }
    Ok(())
}
