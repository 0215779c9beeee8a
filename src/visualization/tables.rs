use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};

use crate::analysis::{Projection, TrendModel};
use crate::models::CaseSeries;

/// Group digits in thousands, e.g. 1234567 -> "1,234,567".
pub fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && grouped.chars().any(|c| c != '0' && c != ',') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn rate_text(proj: &Projection) -> String {
    match proj.model() {
        TrendModel::Exponential => proj
            .fit
            .daily_growth_rate()
            .map(|r| format!("{:+.1}%/day", r * 100.0))
            .unwrap_or_default(),
        TrendModel::Linear => proj
            .fit
            .daily_increment()
            .map(|d| format!("{}{}/day", if d < 0.0 { "-" } else { "+" }, thousands(d.abs())))
            .unwrap_or_default(),
    }
}

/// Format a short summary of the loaded case table.
pub fn format_series_summary(series: &CaseSeries) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Case Data".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        Cell::new("Observations"),
        Cell::new(format!("{}", series.len())),
    ]);
    table.add_row(vec![
        Cell::new("First date"),
        Cell::new(series.first_date().format("%b-%d").to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Last date"),
        Cell::new(series.last_date().format("%b-%d").to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Latest total"),
        Cell::new(thousands(series.latest_cases() as f64)),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print a short summary of the loaded case table.
pub fn print_series_summary(series: &CaseSeries) {
    print!("{}", format_series_summary(series));
}

/// Format one row per projection: fit quality, growth, and where it ends up.
pub fn format_projection_table(projections: &[Projection]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Trend Projections".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Window",
            "Model",
            "Points",
            "R\u{b2}",
            "Growth",
            "Doubling",
            "Projected",
            "% Pop.",
            "Ceiling",
        ]);

    for proj in projections {
        let (final_date, final_value, final_percent) = match proj.final_point() {
            Some(p) => (
                p.date.format("%b-%d").to_string(),
                thousands(p.value),
                format!("{:.2}%", p.percent),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        let doubling = proj
            .fit
            .doubling_time_days()
            .map(|d| format!("{d:.1} days"))
            .unwrap_or_else(|| "-".to_string());
        let ceiling = proj
            .saturation_date()
            .map(|d| d.format("%b-%d").to_string().red().to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&proj.label),
            Cell::new(proj.model().to_string()),
            Cell::new(format!("{}", proj.window_len)),
            Cell::new(format!("{:.3}", proj.fit.line.r_squared)),
            Cell::new(rate_text(proj)),
            Cell::new(doubling),
            Cell::new(format!("{final_value} ({final_date})")),
            Cell::new(final_percent),
            Cell::new(ceiling),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the projection table.
pub fn print_projection_table(projections: &[Projection]) {
    print!("{}", format_projection_table(projections));
}
