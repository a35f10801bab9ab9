//! Postgres-backed store. Selected when `DATABASE_URL` is configured.
//! Each statement runs in its own implicit transaction; atomicity of a
//! create/update/delete is delegated to the engine.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{MovieStore, StoreError, UserStore};
use crate::models::{Movie, MovieCreate, MovieUpdate, NewUser, User};
use crate::pagination::Window;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                overview TEXT NOT NULL,
                year INTEGER NOT NULL,
                rating REAL NOT NULL,
                category TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::info!("connected to postgres store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn list(&self, window: Option<Window>) -> Result<Vec<Movie>, StoreError> {
        let movies = match window {
            Some(w) => {
                sqlx::query_as::<_, Movie>(
                    "SELECT id, title, overview, year, rating, category \
                     FROM movies ORDER BY id LIMIT $1 OFFSET $2",
                )
                .bind(w.size)
                .bind(w.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Movie>(
                    "SELECT id, title, overview, year, rating, category \
                     FROM movies ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(movies)
    }

    async fn get(&self, id: i64) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(
            "SELECT id, title, overview, year, rating, category FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::movie_not_found(id))
    }

    async fn search(
        &self,
        category: Option<&str>,
        year: Option<i32>,
    ) -> Result<Vec<Movie>, StoreError> {
        let pattern = category.map(|c| format!("%{}%", c));
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, overview, year, rating, category FROM movies \
             WHERE ($1::TEXT IS NULL OR category ILIKE $1) \
               AND ($2::INTEGER IS NULL OR year = $2) \
             ORDER BY id",
        )
        .bind(pattern)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(movies)
    }

    async fn insert(&self, payload: MovieCreate) -> Result<Movie, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, overview, year, rating, category) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, overview, year, rating, category",
        )
        .bind(&payload.title)
        .bind(&payload.overview)
        .bind(payload.year)
        .bind(payload.rating)
        .bind(&payload.category)
        .fetch_one(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn update(&self, id: i64, patch: &MovieUpdate) -> Result<Movie, StoreError> {
        // COALESCE keeps the stored value wherever the patch left a field out.
        sqlx::query_as::<_, Movie>(
            "UPDATE movies SET \
                title = COALESCE($2, title), \
                overview = COALESCE($3, overview), \
                year = COALESCE($4, year), \
                rating = COALESCE($5, rating), \
                category = COALESCE($6, category) \
             WHERE id = $1 \
             RETURNING id, title, overview, year, rating, category",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.overview)
        .bind(patch.year)
        .bind(patch.rating)
        .bind(&patch.category)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::movie_not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::movie_not_found(id));
        }
        Ok(())
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, role",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
