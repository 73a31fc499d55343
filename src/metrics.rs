use crate::models::{MetricCard, SleepRecord};

pub const NO_CHANGE: &str = "Same as last month";

pub const RECOMMENDED_SLEEP_HOURS: f64 = 7.0;
pub const HIGH_STRESS_LEVEL: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn glyph(self) -> char {
        match self {
            Direction::Down => '▼',
            Direction::Up => '▲',
        }
    }
}

/// There is no stored prior period: the delta is `count % modulus`.
pub fn trend(count: usize, modulus: usize, direction: Direction) -> String {
    match count % modulus {
        0 => NO_CHANGE.to_string(),
        delta => format!("{}{delta} from last month", direction.glyph()),
    }
}

fn card(title: &'static str, count: usize, modulus: usize, direction: Direction) -> MetricCard {
    MetricCard {
        title,
        content: count.to_string(),
        trend: trend(count, modulus, direction),
    }
}

pub fn compute_metrics(records: &[SleepRecord]) -> [MetricCard; 4] {
    let below_recommended = records
        .iter()
        .filter(|r| r.sleep_duration < RECOMMENDED_SLEEP_HOURS)
        .count();
    let high_blood_pressure = records
        .iter()
        .filter(|r| r.blood_pressure_category != "Normal")
        .count();
    let obese_people = records
        .iter()
        .filter(|r| r.bmi_category == "Obese")
        .count();
    let stressed_count = records
        .iter()
        .filter(|r| r.stress_level > HIGH_STRESS_LEVEL)
        .count();

    tracing::debug!(
        rows = records.len(),
        below_recommended,
        high_blood_pressure,
        obese_people,
        stressed_count,
        "computed metrics"
    );

    [
        card(
            "Total Individuals Below 7 Sleep Hours",
            below_recommended,
            4,
            Direction::Down,
        ),
        card(
            "Total Individuals with High Blood Pressure",
            high_blood_pressure,
            2,
            Direction::Down,
        ),
        card(
            "Total Individuals Classified as Obese",
            obese_people,
            5,
            Direction::Up,
        ),
        card(
            "Total Individuals Experiencing Stress",
            stressed_count,
            7,
            Direction::Up,
        ),
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_record(sleep_duration: f64, stress_level: f64) -> SleepRecord {
        SleepRecord {
            person_id: None,
            gender: "Female".to_string(),
            occupation: "Nurse".to_string(),
            sleep_duration,
            quality_of_sleep: 7.0,
            stress_level,
            bmi_category: "Normal".to_string(),
            blood_pressure_category: "Normal".to_string(),
            daily_steps: 6000.0,
            sleep_disorder: "No Issue".to_string(),
            age_group: "30-39".to_string(),
        }
    }

    #[test]
    fn empty_table_reports_no_change_everywhere() {
        let cards = compute_metrics(&[]);
        for card in cards.iter() {
            assert_eq!(card.content, "0");
            assert_eq!(card.trend, NO_CHANGE);
        }
    }

    #[test]
    fn cards_keep_fixed_order_and_titles() {
        let cards = compute_metrics(&[sample_record(8.0, 3.0)]);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec![
                "Total Individuals Below 7 Sleep Hours",
                "Total Individuals with High Blood Pressure",
                "Total Individuals Classified as Obese",
                "Total Individuals Experiencing Stress",
            ]
        );
    }

    #[test]
    fn four_short_sleepers_out_of_ten_is_no_change() {
        let mut records: Vec<SleepRecord> = (0..4).map(|_| sample_record(6.1, 3.0)).collect();
        records.extend((0..6).map(|_| sample_record(7.5, 3.0)));

        let cards = compute_metrics(&records);
        assert_eq!(cards[0].content, "4");
        assert_eq!(cards[0].trend, NO_CHANGE);
    }

    #[test]
    fn three_abnormal_blood_pressures_trend_down_one() {
        let mut records: Vec<SleepRecord> = (0..5).map(|_| sample_record(8.0, 3.0)).collect();
        for record in records.iter_mut().take(3) {
            record.blood_pressure_category = "Stage 1 Hypertension".to_string();
        }

        let cards = compute_metrics(&records);
        assert_eq!(cards[1].content, "3");
        assert_eq!(cards[1].trend, "▼1 from last month");
    }

    #[test]
    fn obesity_and_stress_trend_up() {
        let mut records: Vec<SleepRecord> = (0..8).map(|_| sample_record(8.0, 8.0)).collect();
        for record in records.iter_mut().take(6) {
            record.bmi_category = "Obese".to_string();
        }

        let cards = compute_metrics(&records);
        assert_eq!(cards[2].trend, "▲1 from last month");
        assert_eq!(cards[3].content, "8");
        assert_eq!(cards[3].trend, "▲1 from last month");
    }

    #[test]
    fn thresholds_are_strict() {
        let records = vec![sample_record(7.0, 7.0)];
        let cards = compute_metrics(&records);
        assert_eq!(cards[0].content, "0");
        assert_eq!(cards[3].content, "0");
    }

    #[test]
    fn trend_follows_modulus() {
        for count in 0..30 {
            let expected = if count % 5 == 0 {
                NO_CHANGE.to_string()
            } else {
                format!("▲{} from last month", count % 5)
            };
            assert_eq!(trend(count, 5, Direction::Up), expected);
        }
    }
}
