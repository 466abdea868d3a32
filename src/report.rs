//! Rendering of solved problems as a WIRE worksheet or as JSON.

use crate::circuit::{Metric, WireMetrics};
use crate::error::Result;
use crate::solver::Solution;

/// Output format for a rendered solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Worksheet table
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

const VALUE_WIDTH: usize = 12;

/// Render a solution in the requested format.
pub fn render(solution: &Solution, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_table(solution)),
        OutputFormat::Json => solution.to_json(),
    }
}

/// Render the worksheet: one row per component, then the source and totals.
///
/// Unknown fields print as `?`.
pub fn render_table(solution: &Solution) -> String {
    let mut rows: Vec<(&str, &WireMetrics)> = solution
        .components
        .iter()
        .map(|c| (c.id.as_str(), &c.metrics))
        .collect();
    rows.push((solution.source.id.as_str(), &solution.source.metrics));
    rows.push((crate::circuit::TOTALS_LABEL, &solution.totals));

    let name_width = rows.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0).max(4);

    let row = |name: &str, cells: Vec<String>| -> String {
        let cells: String = cells.iter().map(|cell| format!(" {:>VALUE_WIDTH$}", cell)).collect();
        format!("{:<name_width$}{}\n", name, cells)
    };

    let header = Metric::ALL.iter().map(|m| m.letter().to_string()).collect();
    let mut out = row("Node", header);
    out.push_str(&"-".repeat(name_width + (VALUE_WIDTH + 1) * Metric::ALL.len()));
    out.push('\n');

    for (name, metrics) in rows {
        let cells = Metric::ALL
            .iter()
            .map(|&metric| {
                metrics
                    .get(metric)
                    .map(|v| format_engineering(v, metric.unit()))
                    .unwrap_or_else(|| "?".to_string())
            })
            .collect();
        out.push_str(&row(name, cells));
    }

    if let Some(target) = &solution.target {
        let value = solution
            .value(target)
            .map(|v| format_engineering(v, target.metric.unit()))
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!("\n{} {} = {}\n", target.node, target.metric, value));
    }

    out
}

/// Format a value with an engineering prefix, e.g. `4.7 kΩ` or `30 mA`.
pub fn format_engineering(value: f64, unit: &str) -> String {
    if !value.is_finite() {
        return format!("{} {}", value, unit);
    }
    let abs = value.abs();
    let (scaled, prefix) = if abs == 0.0 {
        (0.0, "")
    } else if abs >= 1e9 {
        (value / 1e9, "G")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else if abs >= 1.0 {
        (value, "")
    } else if abs >= 1e-3 {
        (value * 1e3, "m")
    } else if abs >= 1e-6 {
        (value * 1e6, "µ")
    } else if abs >= 1e-9 {
        (value * 1e9, "n")
    } else {
        (value * 1e12, "p")
    };

    format!("{} {}{}", trim_decimal(scaled), prefix, unit)
}

fn trim_decimal(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
