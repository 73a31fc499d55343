use serde::Serialize;

use crate::charts;
use crate::error::DashboardResult;
use crate::metrics::compute_metrics;
use crate::models::{ChartSpec, Column, MetricCard, SleepRecord};

pub const NO_SLEEP_ISSUE: &str = "No Issue";

pub fn sleep_disorders(records: &[SleepRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if !seen.contains(&record.sleep_disorder) {
            seen.push(record.sleep_disorder.clone());
        }
    }
    seen
}

pub fn filter_by_disorder(records: &[SleepRecord], selected: &[String]) -> Vec<SleepRecord> {
    if selected.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selected.contains(&r.sleep_disorder))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub gender: String,
    pub occupation: String,
    pub sleep_duration: f64,
    pub quality_of_sleep: f64,
    pub stress_level: f64,
    pub bmi_category: String,
    pub blood_pressure_category: String,
    pub daily_steps: f64,
    pub has_sleep_disorder: bool,
    pub age_group: String,
}

impl From<&SleepRecord> for DisplayRow {
    fn from(record: &SleepRecord) -> Self {
        Self {
            gender: record.gender.clone(),
            occupation: record.occupation.clone(),
            sleep_duration: record.sleep_duration,
            quality_of_sleep: record.quality_of_sleep,
            stress_level: record.stress_level,
            bmi_category: record.bmi_category.clone(),
            blood_pressure_category: record.blood_pressure_category.clone(),
            daily_steps: record.daily_steps,
            has_sleep_disorder: record.sleep_disorder != NO_SLEEP_ISSUE,
            age_group: record.age_group.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_population: usize,
    pub selected_disorders: Vec<String>,
    pub metrics: [MetricCard; 4],
    pub charts: Vec<ChartSpec>,
    pub rows: Vec<DisplayRow>,
}

// Occupation treemap and age group averages always use the whole population.
pub fn build_dashboard(
    records: &[SleepRecord],
    selected: &[String],
) -> DashboardResult<Dashboard> {
    let selected_disorders = if selected.is_empty() {
        sleep_disorders(records)
    } else {
        selected.to_vec()
    };
    let filtered = filter_by_disorder(records, &selected_disorders);
    tracing::info!(
        total = records.len(),
        filtered = filtered.len(),
        "building dashboard"
    );

    let metrics = compute_metrics(&filtered);
    let charts = vec![
        charts::pie_chart(&filtered, Column::Gender, "Gender", 0.4)?,
        charts::funnel_chart(
            &filtered,
            Column::BloodPressureCategory,
            "Blood Pressure",
            None,
        ),
        charts::pie_chart(&filtered, Column::BmiCategory, "BMI", 0.0)?,
        charts::treemap(records, Column::Occupation, "Job"),
        charts::average_by_group(records, Column::AgeGroup, Column::DailySteps, None)?,
        charts::average_by_group(records, Column::AgeGroup, Column::SleepDuration, None)?,
    ];
    let rows = filtered.iter().map(DisplayRow::from).collect();

    Ok(Dashboard {
        total_population: records.len(),
        selected_disorders,
        metrics,
        charts,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::metrics::tests::sample_record;

    fn population() -> Vec<SleepRecord> {
        ["No Issue", "Insomnia", "No Issue", "Sleep Apnea", "Insomnia"]
            .into_iter()
            .enumerate()
            .map(|(i, disorder)| SleepRecord {
                sleep_disorder: disorder.to_string(),
                sleep_duration: 5.5 + i as f64,
                ..sample_record(0.0, 8.0)
            })
            .collect()
    }

    #[test]
    fn disorders_listed_in_first_seen_order() {
        assert_eq!(
            sleep_disorders(&population()),
            vec!["No Issue", "Insomnia", "Sleep Apnea"]
        );
    }

    #[test]
    fn empty_selection_keeps_everything() {
        assert_eq!(filter_by_disorder(&population(), &[]).len(), 5);
        let insomnia = filter_by_disorder(&population(), &["Insomnia".to_string()]);
        assert_eq!(insomnia.len(), 2);
        assert!(insomnia.iter().all(|r| r.sleep_disorder == "Insomnia"));
    }

    #[test]
    fn display_rows_flag_disorders() {
        let records = population();
        let rows: Vec<DisplayRow> = records.iter().map(DisplayRow::from).collect();
        let flags: Vec<bool> = rows.iter().map(|r| r.has_sleep_disorder).collect();
        assert_eq!(flags, vec![false, true, false, true, true]);
        assert_eq!(records[0].sleep_disorder, "No Issue");
    }

    #[test]
    fn dashboard_metrics_follow_the_filter() {
        let records = population();
        let dashboard = build_dashboard(&records, &["Insomnia".to_string()]).unwrap();

        assert_eq!(dashboard.total_population, 5);
        assert_eq!(dashboard.rows.len(), 2);
        assert_eq!(dashboard.metrics[3].content, "2");
        assert_eq!(dashboard.charts.len(), 6);
        assert_eq!(dashboard.charts[0].title, "Gender Distribution");
        assert_eq!(dashboard.charts[0].series[0].total(), 2.0);
        // treemap counts the whole population
        assert_eq!(dashboard.charts[3].title, "Job Proportion");
        assert_eq!(dashboard.charts[3].series[0].total(), 5.0);
        assert_eq!(
            dashboard.charts[5].title,
            "Average Sleep Duration by Age Group"
        );
    }

    #[test]
    fn empty_population_cannot_average() {
        let err = build_dashboard(&[], &[]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyInput { .. }));
    }
}
