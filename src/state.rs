use std::sync::Arc;

use crate::store::{MovieStore, UserStore};

/// Shared handler state. Stores are trait objects so the memory-backed
/// and Postgres-backed variants plug in interchangeably at startup.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserStore>,
}
