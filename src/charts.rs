use std::collections::BTreeMap;

use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    title_case, ChartKind, ChartSpec, Column, DataPoint, Series, SeriesStyle, SleepRecord, Value,
};

const COUNT_HOVER: &str = "<b>%{label}</b><br>Total: %{value} person.<extra></extra>";
const FUNNEL_HOVER: &str = "<b>%{y}</b><br>Total: %{x} person.<extra></extra>";
const AVERAGE_HOVER: &str = "%{y:.2f}<extra></extra>";

pub fn value_counts(records: &[SleepRecord], column: Column) -> BTreeMap<Value, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.value(column)).or_insert(0) += 1;
    }
    counts
}

fn counts_by_frequency(records: &[SleepRecord], column: Column, ascending: bool) -> Vec<DataPoint> {
    let mut counts: Vec<(Value, usize)> = value_counts(records, column).into_iter().collect();
    // sort_by is stable, so equal counts stay in ascending value order
    if ascending {
        counts.sort_by(|a, b| a.1.cmp(&b.1));
    } else {
        counts.sort_by(|a, b| b.1.cmp(&a.1));
    }
    counts
        .into_iter()
        .map(|(value, count)| DataPoint::new(value.to_string(), count as f64))
        .collect()
}

pub fn pie_chart(
    records: &[SleepRecord],
    column: Column,
    label: &str,
    hole: f64,
) -> DashboardResult<ChartSpec> {
    if !(0.0..1.0).contains(&hole) {
        return Err(DashboardError::InvalidOption(format!(
            "hole must be in [0, 1), got {hole}"
        )));
    }

    Ok(ChartSpec {
        title: format!("{label} Distribution"),
        kind: ChartKind::Pie { hole },
        series: vec![Series {
            name: label.to_string(),
            style: SeriesStyle::Slices,
            points: counts_by_frequency(records, column, false),
        }],
        hover: COUNT_HOVER.to_string(),
        x_axis_title: None,
        y_axis_title: None,
    })
}

pub fn treemap(records: &[SleepRecord], column: Column, label: &str) -> ChartSpec {
    ChartSpec {
        title: format!("{label} Proportion"),
        kind: ChartKind::Treemap,
        series: vec![Series {
            name: label.to_string(),
            style: SeriesStyle::Slices,
            points: counts_by_frequency(records, column, false),
        }],
        hover: COUNT_HOVER.to_string(),
        x_axis_title: None,
        y_axis_title: None,
    }
}

/// Funnel of `column` occurrences.
///
/// Without `color` this is a funnel area ordered from the smallest count to the
/// largest. With `color`, rows are counted per (`color`, `column`) pair and
/// each `color` value gets its own bar series.
pub fn funnel_chart(
    records: &[SleepRecord],
    column: Column,
    label: &str,
    color: Option<Column>,
) -> ChartSpec {
    let title = format!("{label} Proportion");

    let Some(color) = color else {
        return ChartSpec {
            title,
            kind: ChartKind::FunnelArea,
            series: vec![Series {
                name: label.to_string(),
                style: SeriesStyle::Slices,
                points: counts_by_frequency(records, column, true),
            }],
            hover: COUNT_HOVER.to_string(),
            x_axis_title: None,
            y_axis_title: None,
        };
    };

    let mut pairs: BTreeMap<Value, BTreeMap<Value, usize>> = BTreeMap::new();
    for record in records {
        *pairs
            .entry(record.value(color))
            .or_default()
            .entry(record.value(column))
            .or_insert(0) += 1;
    }

    let series = pairs
        .into_iter()
        .map(|(group, counts)| Series {
            name: group.to_string(),
            style: SeriesStyle::Bars,
            points: counts
                .into_iter()
                .map(|(value, count)| DataPoint::new(value.to_string(), count as f64))
                .collect(),
        })
        .collect();

    ChartSpec {
        title,
        kind: ChartKind::Funnel,
        series,
        hover: FUNNEL_HOVER.to_string(),
        x_axis_title: Some("Count".to_string()),
        y_axis_title: Some(label.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverages {
    pub groups: Vec<(Value, f64)>,
    pub overall_mean: f64,
}

/// Mean of `value` per distinct `group` (ascending by group) and across all rows.
pub fn group_averages(
    records: &[SleepRecord],
    group: Column,
    value: Column,
) -> DashboardResult<GroupAverages> {
    if !value.is_numeric() {
        return Err(DashboardError::TypeMismatch {
            column: value,
            expected: "numeric",
            found: "categorical",
        });
    }
    if records.is_empty() {
        return Err(DashboardError::EmptyInput { column: value });
    }

    let mut sums: BTreeMap<Value, (f64, usize)> = BTreeMap::new();
    let mut total = 0.0;
    for record in records {
        let v = record.value(value).as_number(value)?;
        let entry = sums.entry(record.value(group)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
        total += v;
    }

    let groups = sums
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect();

    Ok(GroupAverages {
        groups,
        overall_mean: total / records.len() as f64,
    })
}

pub fn default_average_title(group: Column, value: Column) -> String {
    format!("Average {} by {}", value.title(), group.title())
}

pub fn average_by_group(
    records: &[SleepRecord],
    group: Column,
    value: Column,
    title: Option<&str>,
) -> DashboardResult<ChartSpec> {
    let averages = group_averages(records, group, value)?;
    let value_title = title_case(value.name());

    let means = averages
        .groups
        .iter()
        .map(|(key, mean)| DataPoint {
            label: key.to_string(),
            value: *mean,
            text: Some(format!("{mean:.2}")),
        })
        .collect();
    let reference = averages
        .groups
        .iter()
        .map(|(key, _)| DataPoint::new(key.to_string(), averages.overall_mean))
        .collect();

    Ok(ChartSpec {
        title: title
            .map(str::to_string)
            .unwrap_or_else(|| default_average_title(group, value)),
        kind: ChartKind::Line,
        series: vec![
            Series {
                name: format!("Average {value_title}"),
                style: SeriesStyle::LinesMarkersText,
                points: means,
            },
            Series {
                name: "Overall Mean".to_string(),
                style: SeriesStyle::DashedReference,
                points: reference,
            },
        ],
        hover: AVERAGE_HOVER.to_string(),
        x_axis_title: Some(group.title()),
        y_axis_title: Some(format!("Average {value_title}")),
    })
}
