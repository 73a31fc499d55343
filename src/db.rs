use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::loader;
use crate::models::SleepRecord;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn fetch_records(pool: &PgPool) -> anyhow::Result<Vec<SleepRecord>> {
    let rows = sqlx::query(
        "SELECT person_id, gender, occupation, sleep_duration, quality_of_sleep, stress_level, \
         bmi_category, blood_pressure_category, daily_steps, sleep_disorder, age_group \
         FROM sleep_health.records \
         ORDER BY imported_at, row_number",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(SleepRecord {
            person_id: row.get("person_id"),
            gender: row.get("gender"),
            occupation: row.get("occupation"),
            sleep_duration: row.get("sleep_duration"),
            quality_of_sleep: row.get("quality_of_sleep"),
            stress_level: row.get("stress_level"),
            bmi_category: row.get("bmi_category"),
            blood_pressure_category: row.get("blood_pressure_category"),
            daily_steps: row.get("daily_steps"),
            sleep_disorder: row.get("sleep_disorder"),
            age_group: row.get("age_group"),
        });
    }

    tracing::debug!(rows = records.len(), "fetched records from postgres");
    Ok(records)
}

pub fn source_key(record: &SleepRecord) -> String {
    match record.person_id {
        Some(id) => format!("person-{id}"),
        None => format!("import-{}", Uuid::new_v4()),
    }
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let records = loader::load_csv(csv_path)?;
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for (index, record) in records.iter().enumerate() {
        let result = sqlx::query(
            r#"
            INSERT INTO sleep_health.records
            (id, source_key, person_id, row_number, gender, occupation, sleep_duration,
             quality_of_sleep, stress_level, bmi_category, blood_pressure_category,
             daily_steps, sleep_disorder, age_group)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(source_key(record))
        .bind(record.person_id)
        .bind(index as i64)
        .bind(&record.gender)
        .bind(&record.occupation)
        .bind(record.sleep_duration)
        .bind(record.quality_of_sleep)
        .bind(record.stress_level)
        .bind(&record.bmi_category)
        .bind(&record.blood_pressure_category)
        .bind(record.daily_steps)
        .bind(&record.sleep_disorder)
        .bind(&record.age_group)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(
        read = records.len(),
        inserted,
        path = %csv_path.display(),
        "imported records"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::sample_record;

    #[test]
    fn person_id_gives_a_stable_key() {
        let record = SleepRecord {
            person_id: Some(42),
            ..sample_record(7.0, 4.0)
        };
        assert_eq!(source_key(&record), "person-42");
        assert_eq!(source_key(&record), source_key(&record.clone()));
    }

    #[test]
    fn rows_without_person_id_get_fresh_keys() {
        let record = sample_record(7.0, 4.0);
        let first = source_key(&record);
        assert!(first.starts_with("import-"));
        assert_ne!(first, source_key(&record));
    }
}
