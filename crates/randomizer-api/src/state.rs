//! Application state shared across handlers

use std::sync::Arc;

use randomizer_db::Database;
use randomizer_identity::AuthStrategy;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connections
    pub db: Arc<Database>,
    /// Active identity strategy
    pub identity: Arc<AuthStrategy>,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: Arc<Database>, identity: Arc<AuthStrategy>) -> Self {
        Self { db, identity }
    }
}
