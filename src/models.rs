use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(default)]
    pub person_id: Option<i64>,
    pub gender: String,
    pub occupation: String,
    pub sleep_duration: f64,
    pub quality_of_sleep: f64,
    pub stress_level: f64,
    pub bmi_category: String,
    pub blood_pressure_category: String,
    pub daily_steps: f64,
    pub sleep_disorder: String,
    pub age_group: String,
}

impl SleepRecord {
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Gender => Value::Text(self.gender.clone()),
            Column::Occupation => Value::Text(self.occupation.clone()),
            Column::SleepDuration => Value::number(self.sleep_duration),
            Column::QualityOfSleep => Value::number(self.quality_of_sleep),
            Column::StressLevel => Value::number(self.stress_level),
            Column::BmiCategory => Value::Text(self.bmi_category.clone()),
            Column::BloodPressureCategory => Value::Text(self.blood_pressure_category.clone()),
            Column::DailySteps => Value::number(self.daily_steps),
            Column::SleepDisorder => Value::Text(self.sleep_disorder.clone()),
            Column::AgeGroup => Value::Text(self.age_group.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Gender,
    Occupation,
    SleepDuration,
    QualityOfSleep,
    StressLevel,
    BmiCategory,
    BloodPressureCategory,
    DailySteps,
    SleepDisorder,
    AgeGroup,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Gender,
        Column::Occupation,
        Column::SleepDuration,
        Column::QualityOfSleep,
        Column::StressLevel,
        Column::BmiCategory,
        Column::BloodPressureCategory,
        Column::DailySteps,
        Column::SleepDisorder,
        Column::AgeGroup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Gender => "gender",
            Column::Occupation => "occupation",
            Column::SleepDuration => "sleep_duration",
            Column::QualityOfSleep => "quality_of_sleep",
            Column::StressLevel => "stress_level",
            Column::BmiCategory => "bmi_category",
            Column::BloodPressureCategory => "blood_pressure_category",
            Column::DailySteps => "daily_steps",
            Column::SleepDisorder => "sleep_disorder",
            Column::AgeGroup => "age_group",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::SleepDuration
                | Column::QualityOfSleep
                | Column::StressLevel
                | Column::DailySteps
        )
    }

    pub fn title(self) -> String {
        title_case(self.name())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.name() == s)
            .ok_or_else(|| DashboardError::MissingColumn {
                column: s.to_string(),
            })
    }
}

pub fn title_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A single cell. Numbers sort before text.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    // -0.0 and 0.0 must land in the same group
    pub fn number(n: f64) -> Self {
        Value::Number(n + 0.0)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "numeric",
            Value::Text(_) => "categorical",
        }
    }

    pub fn as_number(&self, column: Column) -> DashboardResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(_) => Err(DashboardError::TypeMismatch {
                column,
                expected: "numeric",
                found: self.kind(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub content: String,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Pie { hole: f64 },
    Treemap,
    Funnel,
    FunnelArea,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Slices,
    Bars,
    LinesMarkersText,
    DashedReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub style: SeriesStyle,
    pub points: Vec<DataPoint>,
}

impl Series {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub series: Vec<Series>,
    pub hover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
}

impl ChartSpec {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}
