//! Interaction log.
//!
//! The pipeline only ever writes through [`InteractionStore`], fire and
//! forget; reads exist for the CLI history view.

pub mod sqlite;

pub use sqlite::SqliteInteractionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::affect::AffectScore;
use crate::error::StorageError;
use crate::feedback::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub emotion: AffectScore,
    pub recommendations: Vec<Recommendation>,
    /// User rating of the recommendations, 1 to 5.
    pub rating: Option<u8>,
}

impl InteractionRecord {
    pub fn new(
        text: impl Into<String>,
        emotion: AffectScore,
        recommendations: Vec<Recommendation>,
        rating: Option<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            text: text.into(),
            emotion,
            recommendations,
            rating,
        }
    }
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    fn name(&self) -> &str;

    async fn save_interaction(&self, record: &InteractionRecord) -> Result<(), StorageError>;

    /// Newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<InteractionRecord>, StorageError>;
}
