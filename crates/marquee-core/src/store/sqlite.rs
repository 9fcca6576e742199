use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_models::{ContentKind, ContentRecord, LocalizedText, NewContentRecord};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::debug;

use super::ContentStore;
use crate::error::StoreError;

/// Columns shared by both tables. The kind-specific column is appended per query.
const COMMON_COLUMNS: &str = r#"
    id, imdb_id, category_id, language_id,
    title_ar, title_en, description_ar, description_en,
    slug, year, rating, poster,
    director_ar, director_en, cast_members, genres,
    is_active, is_premium, is_featured, views_count, created_at
"#;

fn table(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Movie => "movies",
        ContentKind::Series => "series",
    }
}

fn select_sql(kind: ContentKind) -> String {
    let specific = match kind {
        ContentKind::Movie => "duration, NULL AS total_seasons",
        ContentKind::Series => "NULL AS duration, total_seasons",
    };
    format!("SELECT {}, {} FROM {}", COMMON_COLUMNS, specific, table(kind))
}

/// SQLite-backed catalog
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: SqlitePool,
}

impl SqliteContentStore {
    /// Open the pool and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, running migrations on it
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!("Catalog schema is up to date");
        Ok(Self { pool })
    }

    async fn get_by_id(&self, kind: ContentKind, id: i64) -> Result<Option<ContentRecord>, StoreError> {
        let query = format!("{} WHERE id = $1", select_sql(kind));
        let row = sqlx::query_as::<_, ContentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_record(kind)))
    }
}

/// Map a unique-constraint failure onto the column that caused it
fn conflict_from(error: sqlx::Error, record: &NewContentRecord) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            let message = db.message();
            return if message.contains(".slug") {
                StoreError::Conflict {
                    kind: record.kind,
                    field: "slug",
                    value: record.slug.clone(),
                }
            } else {
                StoreError::Conflict {
                    kind: record.kind,
                    field: "imdb_id",
                    value: record.imdb_id.clone().unwrap_or_default(),
                }
            };
        }
    }
    StoreError::Database(error)
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn find_by_external_id(
        &self,
        kind: ContentKind,
        imdb_id: &str,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let query = format!("{} WHERE imdb_id = $1", select_sql(kind));
        let row = sqlx::query_as::<_, ContentRow>(&query)
            .bind(imdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_record(kind)))
    }

    async fn create(&self, record: NewContentRecord) -> Result<ContentRecord, StoreError> {
        let kind = record.kind;
        let (specific_column, specific_value) = match kind {
            ContentKind::Movie => ("duration", record.duration),
            ContentKind::Series => ("total_seasons", Some(record.total_seasons.unwrap_or(0))),
        };
        let query = format!(
            r#"
            INSERT INTO {} (
                imdb_id, category_id, language_id,
                title_ar, title_en, description_ar, description_en,
                slug, year, rating, poster,
                director_ar, director_en, cast_members, genres,
                is_active, is_premium, is_featured, views_count, created_at,
                {}
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING id
            "#,
            table(kind),
            specific_column
        );

        let result = sqlx::query(&query)
            .bind(&record.imdb_id)
            .bind(record.category_id)
            .bind(record.language_id)
            .bind(&record.title.ar)
            .bind(&record.title.en)
            .bind(&record.description.ar)
            .bind(&record.description.en)
            .bind(&record.slug)
            .bind(record.year)
            .bind(record.rating)
            .bind(&record.poster)
            .bind(&record.director.ar)
            .bind(&record.director.en)
            .bind(&record.cast)
            .bind(&record.genres)
            .bind(record.is_active)
            .bind(record.is_premium)
            .bind(record.is_featured)
            .bind(record.views_count)
            .bind(Utc::now())
            .bind(specific_value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_from(e, &record))?;

        let id: i64 = sqlx::Row::get(&result, "id");
        self.get_by_id(kind, id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, StoreError> {
        let query = format!("{} ORDER BY id", select_sql(kind));
        let rows = sqlx::query_as::<_, ContentRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_record(kind)).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: i64,
    imdb_id: Option<String>,
    category_id: i64,
    language_id: i64,
    title_ar: String,
    title_en: String,
    description_ar: String,
    description_en: String,
    slug: String,
    year: Option<i32>,
    rating: f64,
    poster: Option<String>,
    director_ar: String,
    director_en: String,
    cast_members: String,
    genres: String,
    is_active: bool,
    is_premium: bool,
    is_featured: bool,
    views_count: i64,
    created_at: DateTime<Utc>,
    duration: Option<i32>,
    total_seasons: Option<i32>,
}

impl ContentRow {
    fn into_record(self, kind: ContentKind) -> ContentRecord {
        ContentRecord {
            id: self.id,
            created_at: self.created_at,
            fields: NewContentRecord {
                kind,
                imdb_id: self.imdb_id,
                category_id: self.category_id,
                language_id: self.language_id,
                title: LocalizedText::new(self.title_ar, self.title_en),
                description: LocalizedText::new(self.description_ar, self.description_en),
                slug: self.slug,
                year: self.year,
                duration: self.duration,
                rating: self.rating,
                poster: self.poster,
                director: LocalizedText::new(self.director_ar, self.director_en),
                cast: self.cast_members,
                genres: self.genres,
                total_seasons: self.total_seasons,
                is_active: self.is_active,
                is_premium: self.is_premium,
                is_featured: self.is_featured,
                views_count: self.views_count,
            },
        }
    }
}
