//! In-memory store implementations backed by insertion-ordered vectors.
//! This is the default when no `DATABASE_URL` is configured.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MovieStore, StoreError, UserStore};
use crate::models::{Movie, MovieCreate, MovieUpdate, NewUser, User};
use crate::pagination::Window;

pub struct MemoryMovieStore {
    movies: RwLock<Vec<Movie>>,
    next_id: AtomicI64,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self {
            movies: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self, window: Option<Window>) -> Result<Vec<Movie>, StoreError> {
        let movies = self.movies.read().await;
        let result = match window {
            Some(w) => movies
                .iter()
                .skip(w.offset as usize)
                .take(w.size as usize)
                .cloned()
                .collect(),
            None => movies.clone(),
        };
        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Movie, StoreError> {
        let movies = self.movies.read().await;
        movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::movie_not_found(id))
    }

    async fn search(
        &self,
        category: Option<&str>,
        year: Option<i32>,
    ) -> Result<Vec<Movie>, StoreError> {
        let needle = category.map(|c| c.to_lowercase());
        let movies = self.movies.read().await;
        let results = movies
            .iter()
            .filter(|m| {
                let category_ok = needle
                    .as_deref()
                    .map_or(true, |n| m.category.to_lowercase().contains(n));
                let year_ok = year.map_or(true, |y| m.year == y);
                category_ok && year_ok
            })
            .cloned()
            .collect();
        Ok(results)
    }

    async fn insert(&self, payload: MovieCreate) -> Result<Movie, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let movie = Movie {
            id,
            title: payload.title,
            overview: payload.overview,
            year: payload.year,
            rating: payload.rating,
            category: payload.category,
        };
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, patch: &MovieUpdate) -> Result<Movie, StoreError> {
        let mut movies = self.movies.write().await;
        let movie = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::movie_not_found(id))?;
        patch.apply_to(movie);
        Ok(movie.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut movies = self.movies.write().await;
        let position = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::movie_not_found(id))?;
        // Remaining entries keep their ids; the counter never goes back.
        movies.remove(position);
        Ok(())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }
}
