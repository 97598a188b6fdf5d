//! Record store adapter.
//!
//! A thin interface over the relational `hospital` table, exposing the
//! insert/select/update/delete primitives the handler layer composes. Every
//! statement is parameterized: values travel as bound arguments and column
//! names come from the closed [`RecordField`] enum, never from request data.
//!
//! Consistency is delegated to the store: each primitive is a single
//! auto-committed statement, and the pool returns connections on every exit
//! path.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::record::{NewRecord, PatientRecord, RecordField};
use crate::RecordResult;

const SELECT_COLUMNS: &str = "sno, patient_name, admission, treatments, discharge, \
     ordered_tests, test_results, prescription, payment_status";

/// Pooled adapter over the `hospital` table.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Wrap an existing pool. Tests inject a single-connection in-memory
    /// pool through this constructor.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the store at `database_url` with a small pool.
    pub async fn connect(database_url: &str) -> RecordResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `hospital` table if it does not exist yet.
    ///
    /// AUTOINCREMENT keeps serial numbers monotone so an id is never reused,
    /// even after rows are deleted.
    pub async fn init_schema(&self) -> RecordResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS hospital (
                sno INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_name TEXT NOT NULL,
                admission DATE NOT NULL,
                treatments TEXT,
                discharge DATE NOT NULL,
                ordered_tests TEXT,
                test_results TEXT,
                prescription TEXT,
                payment_status TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("hospital table ready");
        Ok(())
    }

    /// Insert one row. The store assigns the serial number; it is not
    /// reported back to the caller.
    pub async fn insert(&self, record: &NewRecord) -> RecordResult<()> {
        sqlx::query(
            "INSERT INTO hospital (patient_name, admission, treatments, discharge)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.patient_name)
        .bind(record.admission)
        .bind(&record.treatments)
        .bind(record.discharge)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every row, in natural store order.
    pub async fn select_all(&self) -> RecordResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM hospital"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn select_by_id(&self, sno: i64) -> RecordResult<Option<PatientRecord>> {
        let row = sqlx::query_as::<_, PatientRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM hospital WHERE sno = ?"
        ))
        .bind(sno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All rows whose name matches exactly. May be empty; multiple patients
    /// can share a name.
    pub async fn select_by_name(&self, name: &str) -> RecordResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM hospital WHERE patient_name = ?"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Overwrite a single column of one row. `None` overwrites with NULL.
    ///
    /// The column name is derived from [`RecordField`], keeping the SQL text
    /// free of request data.
    pub async fn update_field(
        &self,
        sno: i64,
        field: RecordField,
        value: Option<&str>,
    ) -> RecordResult<()> {
        let statement = format!("UPDATE hospital SET {} = ? WHERE sno = ?", field.column());
        sqlx::query(&statement)
            .bind(value)
            .bind(sno)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete one row. Deleting an absent serial number is not an error.
    pub async fn delete(&self, sno: i64) -> RecordResult<()> {
        sqlx::query("DELETE FROM hospital WHERE sno = ?")
            .bind(sno)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
