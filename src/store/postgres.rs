use super::{InitOutcome, PageStore};
use crate::config::Settings;
use crate::error::AppError;
use crate::model::{NewPage, Page, TABLE};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, Postgres};
use std::str::FromStr;

type PageRow = (i32, String, Option<String>);

pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from settings. Statement logging is only left on in debug mode.
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        let mut opts = PgConnectOptions::from_str(&settings.database_url)?;
        if !settings.debug {
            opts = opts.disable_statement_logging();
        }
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(opts)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn fetch_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Page>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let row: Option<PageRow> = sqlx::query_as(&format!(
        "SELECT id, name, title FROM {} WHERE name = $1",
        TABLE
    ))
    .bind(name)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Page::from))
}

fn unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL UNIQUE,
                title VARCHAR(255)
            )
            "#,
            TABLE
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS ix_{0}_id ON {0} (id)",
            TABLE
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Page>, AppError> {
        Ok(fetch_by_name(&self.pool, name).await?)
    }

    async fn list(&self) -> Result<Vec<Page>, AppError> {
        let rows: Vec<PageRow> = sqlx::query_as(&format!(
            "SELECT id, name, title FROM {} ORDER BY id",
            TABLE
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn insert(&self, page: &NewPage) -> Result<Page, AppError> {
        page.validate()?;
        let row: PageRow = sqlx::query_as(&format!(
            "INSERT INTO {} (name, title) VALUES ($1, $2) RETURNING id, name, title",
            TABLE
        ))
        .bind(&page.name)
        .bind(page.title.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                AppError::Conflict(format!("page '{}' already exists", page.name))
            } else {
                AppError::Db(e)
            }
        })?;
        Ok(Page::from(row))
    }

    async fn create_if_absent(&self, page: &NewPage) -> Result<InitOutcome, AppError> {
        page.validate()?;
        // Dropping `tx` without commit rolls back.
        let mut tx = self.pool.begin().await?;
        if let Some(existing) = fetch_by_name(&mut *tx, &page.name).await? {
            return Ok(InitOutcome::Existing(existing));
        }

        let created: Option<PageRow> = sqlx::query_as(&format!(
            "INSERT INTO {} (name, title) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING RETURNING id, name, title",
            TABLE
        ))
        .bind(&page.name)
        .bind(page.title.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        match created {
            Some(row) => {
                tx.commit().await?;
                Ok(InitOutcome::Created(Page::from(row)))
            }
            // Lost a race with a concurrent insert of the same name.
            None => match fetch_by_name(&mut *tx, &page.name).await? {
                Some(existing) => Ok(InitOutcome::Existing(existing)),
                None => Err(AppError::Conflict(format!(
                    "page '{}' was inserted concurrently",
                    page.name
                ))),
            },
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
