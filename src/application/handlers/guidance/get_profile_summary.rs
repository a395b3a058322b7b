//! GetProfileSummary - Query handler for a learner's profile aggregates.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::learner::ProfileSummary;
use crate::ports::{ProfileStore, StoreError};

/// Query to get a profile summary.
#[derive(Debug, Clone)]
pub struct GetProfileSummaryQuery {
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum GetProfileSummaryError {
    #[error("No profile for user {0}")]
    NotFound(UserId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GetProfileSummaryError> for DomainError {
    fn from(err: GetProfileSummaryError) -> Self {
        match err {
            GetProfileSummaryError::NotFound(user_id) => {
                DomainError::new(ErrorCode::ProfileNotFound, format!("No profile for user {}", user_id))
            }
            GetProfileSummaryError::Store(e) => e.into(),
        }
    }
}

/// Handler for getting profile summaries.
pub struct GetProfileSummaryHandler {
    store: Arc<dyn ProfileStore>,
}

impl GetProfileSummaryHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetProfileSummaryQuery) -> Result<ProfileSummary, GetProfileSummaryError> {
        self.store
            .load(&query.user_id)
            .await?
            .map(|profile| profile.summary())
            .ok_or(GetProfileSummaryError::NotFound(query.user_id))
    }
}
