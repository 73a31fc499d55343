use std::fmt::Write;

use chrono::NaiveDate;

use crate::dashboard::Dashboard;
use crate::models::{ChartKind, ChartSpec};

fn kind_label(kind: &ChartKind) -> String {
    match kind {
        ChartKind::Pie { hole } if *hole > 0.0 => format!("donut, hole {hole:.1}"),
        ChartKind::Pie { .. } => "pie".to_string(),
        ChartKind::Treemap => "treemap".to_string(),
        ChartKind::Funnel => "funnel".to_string(),
        ChartKind::FunnelArea => "funnel area".to_string(),
        ChartKind::Line => "line".to_string(),
    }
}

fn write_chart(output: &mut String, chart: &ChartSpec) {
    let _ = writeln!(output, "### {} ({})", chart.title, kind_label(&chart.kind));

    if chart.point_count() == 0 {
        let _ = writeln!(output, "No data for this selection.");
        let _ = writeln!(output);
        return;
    }

    for series in chart.series.iter() {
        if chart.series.len() > 1 {
            let _ = writeln!(output, "**{}**", series.name);
        }
        for point in series.points.iter() {
            if matches!(chart.kind, ChartKind::Line) {
                let _ = writeln!(output, "- {}: {:.2}", point.label, point.value);
            } else {
                let _ = writeln!(output, "- {}: {} person", point.label, point.value);
            }
        }
    }
    let _ = writeln!(output);
}

pub fn build_report(dashboard: &Dashboard, generated_on: NaiveDate, preview: usize) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sleep Health Dashboard");
    let _ = writeln!(
        output,
        "Generated on {} for {} of {} individuals (sleep disorders: {})",
        generated_on,
        dashboard.rows.len(),
        dashboard.total_population,
        if dashboard.selected_disorders.is_empty() {
            "none".to_string()
        } else {
            dashboard.selected_disorders.join(", ")
        }
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Metrics");

    for card in dashboard.metrics.iter() {
        let _ = writeln!(
            output,
            "- {}: {} ({})",
            card.title, card.content, card.trend
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Charts");
    let _ = writeln!(output);

    for chart in dashboard.charts.iter() {
        write_chart(&mut output, chart);
    }

    let _ = writeln!(output, "## Records");

    if dashboard.rows.is_empty() {
        let _ = writeln!(output, "No records match this selection.");
        return output;
    }

    let _ = writeln!(
        output,
        "| Gender | Occupation | Sleep Duration | Quality Of Sleep | Stress Level | BMI | Blood Pressure | Daily Steps | Sleep Disorder | Age Group |"
    );
    let _ = writeln!(output, "|{}", "---|".repeat(10));
    for row in dashboard.rows.iter().take(preview) {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {}/10 | {}/10 | {} | {} | {} | {} | {} |",
            row.gender,
            row.occupation,
            row.sleep_duration,
            row.quality_of_sleep,
            row.stress_level,
            row.bmi_category,
            row.blood_pressure_category,
            row.daily_steps,
            if row.has_sleep_disorder { "yes" } else { "no" },
            row.age_group
        );
    }
    if dashboard.rows.len() > preview {
        let _ = writeln!(
            output,
            "\n_{} more rows not shown._",
            dashboard.rows.len() - preview
        );
    }

    output
}
