//! SQLite storage implementation

use super::records::{
    InitiativeRecord, NewInitiative, Page, PageRequest, RecordQuery, SchemeRecord, StateRecord,
};
use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mhrd_core::{slugify, Coordinates, Initiative, InitiativeFilter, Report, ReportStatus};
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{query::Query, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

/// Columns of the initiative/state/scheme join, aliased for [`SqliteStorage::record_from_row`]
const RECORD_COLUMNS: &str = r#"
    i.id, i.name, i.category, i.year, i.status, i.progress,
    i.schools_impacted, i.students_impacted, i.scholarships_awarded, i.budget_utilized,
    s.id AS state_id, s.name AS state_name, s.slug AS state_slug, s.lat AS state_lat, s.lng AS state_lng,
    c.id AS scheme_id, c.name AS scheme_name, c.slug AS scheme_slug
"#;

const RECORD_JOIN: &str = r#"
    FROM initiatives i
    JOIN states s ON s.id = i.state_id
    JOIN schemes c ON c.id = i.scheme_id
"#;

/// Bound as ?1..?6 by [`bind_record_query`]
const RECORD_WHERE: &str = r#"
    WHERE (?1 IS NULL OR i.year = ?1)
      AND (?2 IS NULL OR s.name = ?2 OR s.slug = ?3)
      AND (?4 IS NULL OR c.name = ?4 OR c.slug = ?5)
      AND (?6 IS NULL OR i.category = ?6)
"#;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_record_query<'q>(query: SqliteQuery<'q>, filter: &RecordQuery) -> SqliteQuery<'q> {
    query
        .bind(filter.year)
        .bind(filter.state.clone())
        .bind(filter.state_slug())
        .bind(filter.scheme.clone())
        .bind(filter.scheme_slug())
        .bind(filter.category.clone())
}

/// In-memory databases vanish with their last connection.
fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn pool_options(url: &str, max_connections: u32, connect_timeout_secs: u64) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(connect_timeout_secs));

    if is_in_memory(url) {
        options.idle_timeout(None).max_lifetime(None)
    } else {
        options
    }
}

/// SQLite-backed storage
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to SQLite and initialize schema
    pub async fn new(
        url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = pool_options(url, max_connections, connect_timeout_secs)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let storage = Self { pool };
        storage.initialize_schema().await?;
        Ok(storage)
    }

    /// Private in-memory database; one connection so every query sees the same data
    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::new("sqlite::memory:", 1, 5).await
    }

    async fn initialize_schema(&self) -> Result<(), StorageError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS states (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                lat REAL,
                lng REAL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS schemes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS initiatives (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                state_id INTEGER NOT NULL REFERENCES states(id) ON DELETE CASCADE,
                scheme_id INTEGER NOT NULL REFERENCES schemes(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                year INTEGER NOT NULL,
                status TEXT NOT NULL,
                progress REAL NOT NULL,
                schools_impacted INTEGER NOT NULL,
                students_impacted INTEGER NOT NULL,
                scholarships_awarded INTEGER NOT NULL,
                budget_utilized REAL NOT NULL,
                UNIQUE (name, state_id, scheme_id, year)
            );
            "#,
            r#"CREATE INDEX IF NOT EXISTS initiatives_year ON initiatives(year);"#,
            r#"CREATE INDEX IF NOT EXISTS initiatives_category ON initiatives(category);"#,
            r#"CREATE INDEX IF NOT EXISTS initiatives_status ON initiatives(status);"#,
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_id TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL DEFAULT 'queued',
                params TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
            r#"CREATE INDEX IF NOT EXISTS reports_created_at ON reports(created_at DESC);"#,
            r#"CREATE INDEX IF NOT EXISTS reports_status ON reports(status);"#,
        ];

        for stmt in statements {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::Query(e.to_string()))?;
        }

        Ok(())
    }

    fn state_from_row(row: &SqliteRow) -> Result<StateRecord, StorageError> {
        Ok(StateRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            lat: row.try_get("lat")?,
            lng: row.try_get("lng")?,
        })
    }

    fn scheme_from_row(row: &SqliteRow) -> Result<SchemeRecord, StorageError> {
        Ok(SchemeRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
        })
    }

    fn record_from_row(row: &SqliteRow) -> Result<InitiativeRecord, StorageError> {
        Ok(InitiativeRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            state: StateRecord {
                id: row.try_get("state_id")?,
                name: row.try_get("state_name")?,
                slug: row.try_get("state_slug")?,
                lat: row.try_get("state_lat")?,
                lng: row.try_get("state_lng")?,
            },
            scheme: SchemeRecord {
                id: row.try_get("scheme_id")?,
                name: row.try_get("scheme_name")?,
                slug: row.try_get("scheme_slug")?,
            },
            category: row.try_get("category")?,
            year: row.try_get("year")?,
            status: row.try_get("status")?,
            progress: row.try_get("progress")?,
            schools_impacted: row.try_get("schools_impacted")?,
            students_impacted: row.try_get("students_impacted")?,
            scholarships_awarded: row.try_get("scholarships_awarded")?,
            budget_utilized: row.try_get("budget_utilized")?,
        })
    }

    fn report_from_row(row: &SqliteRow) -> Result<Report, StorageError> {
        let status: String = row.try_get("status")?;
        let params: String = row.try_get("params")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        Ok(Report {
            report_id: row.try_get("report_id")?,
            status: status.parse().unwrap_or(ReportStatus::Unknown),
            params: Self::from_json(&params)?,
            created_at,
        })
    }

    fn from_json(raw: &str) -> Result<Value, StorageError> {
        serde_json::from_str(raw)
            .map_err(|e| StorageError::InvalidData(format!("json deserialize error: {}", e)))
    }

    async fn state_by_name(&self, name: &str) -> StorageResult<StateRecord> {
        let row = sqlx::query("SELECT id, name, slug, lat, lng FROM states WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Self::state_from_row(&row)
    }
}

#[async_trait]
impl CatalogStorage for SqliteStorage {
    async fn list_states(&self) -> StorageResult<Vec<StateRecord>> {
        let rows = sqlx::query("SELECT id, name, slug, lat, lng FROM states ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::state_from_row).collect()
    }

    async fn get_state(&self, id: i64) -> StorageResult<Option<StateRecord>> {
        let row = sqlx::query("SELECT id, name, slug, lat, lng FROM states WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::state_from_row).transpose()
    }

    async fn ensure_state(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
    ) -> StorageResult<StateRecord> {
        sqlx::query(
            r#"
            INSERT INTO states (name, slug, lat, lng)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(slugify(name))
        .bind(coordinates.map(|c| c.lat))
        .bind(coordinates.map(|c| c.lng))
        .execute(&self.pool)
        .await?;

        if let Some(coords) = coordinates {
            sqlx::query("UPDATE states SET lat = ?, lng = ? WHERE name = ? AND lat IS NULL")
                .bind(coords.lat)
                .bind(coords.lng)
                .bind(name)
                .execute(&self.pool)
                .await?;
        }

        self.state_by_name(name).await
    }

    async fn list_schemes(&self) -> StorageResult<Vec<SchemeRecord>> {
        let rows = sqlx::query("SELECT id, name, slug FROM schemes ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::scheme_from_row).collect()
    }

    async fn get_scheme(&self, id: i64) -> StorageResult<Option<SchemeRecord>> {
        let row = sqlx::query("SELECT id, name, slug FROM schemes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::scheme_from_row).transpose()
    }

    async fn ensure_scheme(&self, name: &str) -> StorageResult<SchemeRecord> {
        sqlx::query("INSERT INTO schemes (name, slug) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .bind(slugify(name))
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT id, name, slug FROM schemes WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Self::scheme_from_row(&row)
    }
}

#[async_trait]
impl InitiativeStorage for SqliteStorage {
    async fn find_initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            {RECORD_JOIN}
            WHERE (?1 IS NULL OR i.year = ?1)
              AND (?2 IS NULL OR s.name = ?2)
              AND (?3 IS NULL OR c.name = ?3)
              AND (?4 IS NULL OR i.category = ?4)
            ORDER BY i.id
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(filter.year)
            .bind(filter.state.as_deref())
            .bind(filter.scheme.as_deref())
            .bind(filter.category.as_deref())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Self::record_from_row(row).map(|r| r.flatten()))
            .collect()
    }

    async fn list_initiative_records(
        &self,
        query: &RecordQuery,
        page: PageRequest,
    ) -> StorageResult<Page<InitiativeRecord>> {
        let count_sql = format!("SELECT COUNT(*) AS count {RECORD_JOIN} {RECORD_WHERE}");
        let count: i64 = bind_record_query(sqlx::query(&count_sql), query)
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        let page_sql = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            {RECORD_JOIN}
            {RECORD_WHERE}
            ORDER BY i.year DESC, s.name ASC, i.id ASC
            LIMIT ?7 OFFSET ?8
            "#
        );
        let offset = i64::try_from(page.offset())
            .map_err(|_| StorageError::InvalidData("page offset out of range".to_string()))?;
        let rows = bind_record_query(sqlx::query(&page_sql), query)
            .bind(i64::from(page.page_size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let results = rows
            .iter()
            .map(Self::record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            count: count.max(0) as u64,
            page: page.page,
            page_size: page.page_size,
            results,
        })
    }

    async fn get_initiative_record(&self, id: i64) -> StorageResult<Option<InitiativeRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} {RECORD_JOIN} WHERE i.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn insert_initiative(&self, initiative: NewInitiative) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO initiatives (
                name, state_id, scheme_id, category, year, status, progress,
                schools_impacted, students_impacted, scholarships_awarded, budget_utilized
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name, state_id, scheme_id, year) DO NOTHING
            "#,
        )
        .bind(&initiative.name)
        .bind(initiative.state_id)
        .bind(initiative.scheme_id)
        .bind(&initiative.category)
        .bind(initiative.year)
        .bind(&initiative.status)
        .bind(initiative.progress)
        .bind(initiative.schools_impacted)
        .bind(initiative.students_impacted)
        .bind(initiative.scholarships_awarded)
        .bind(initiative.budget_utilized)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StorageError::InvalidData(e.to_string())
            }
            other => StorageError::from(other),
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_initiatives(&self) -> StorageResult<u64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM initiatives")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ReportStorage for SqliteStorage {
    async fn get_report(&self, report_id: &str) -> StorageResult<Option<Report>> {
        let row = sqlx::query(
            "SELECT report_id, status, params, created_at FROM reports WHERE report_id = ?",
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::report_from_row).transpose()
    }

    async fn upsert_report(
        &self,
        report_id: &str,
        status: ReportStatus,
        params: Value,
    ) -> StorageResult<Report> {
        sqlx::query(
            r#"
            INSERT INTO reports (report_id, status, params, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(report_id) DO UPDATE SET
                status = excluded.status,
                params = excluded.params
            "#,
        )
        .bind(report_id)
        .bind(status.as_str())
        .bind(params.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_report(report_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(report_id.to_string()))
    }

    async fn list_reports(&self, limit: usize) -> StorageResult<Vec<Report>> {
        let rows = sqlx::query(
            r#"
            SELECT report_id, status, params, created_at
            FROM reports
            ORDER BY created_at DESC, report_id ASC
            LIMIT ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::report_from_row).collect()
    }
}

impl Storage for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
