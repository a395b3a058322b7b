//! ProcessRequest - Command handler for the single analysis entry point.
//!
//! Validates the request, serializes runs per user, loads the profile,
//! runs the guidance pipeline and saves the updated profile. Store
//! failures never fail the request; they surface as warnings.

use std::sync::Arc;
use thiserror::Error;

use crate::application::UserLocks;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};
use crate::domain::guidance::{AnalysisResult, GuidancePipeline};
use crate::domain::learner::UserProfile;
use crate::ports::ProfileStore;

/// Default maximum query length in characters.
pub const DEFAULT_MAX_QUERY_LEN: usize = 4000;

/// Command to analyse one learner request.
#[derive(Debug, Clone)]
pub struct ProcessRequestCommand {
    pub user_id: UserId,
    pub query: String,
    pub context: Option<String>,
}

impl ProcessRequestCommand {
    pub fn new(user_id: UserId, query: impl Into<String>) -> Self {
        Self {
            user_id,
            query: query.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Errors that stop a request before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessRequestError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
}

impl From<ProcessRequestError> for DomainError {
    fn from(err: ProcessRequestError) -> Self {
        match err {
            ProcessRequestError::Validation(e) => {
                let code = match e {
                    ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
                    ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
                    ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
                };
                DomainError::new(code, e.to_string()).with_detail("field", e.field())
            }
        }
    }
}

/// Handler for ProcessRequest commands.
pub struct ProcessRequestHandler {
    pipeline: Arc<GuidancePipeline>,
    store: Arc<dyn ProfileStore>,
    locks: UserLocks,
    max_query_len: usize,
}

impl ProcessRequestHandler {
    pub fn new(pipeline: Arc<GuidancePipeline>, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            pipeline,
            store,
            locks: UserLocks::new(),
            max_query_len: DEFAULT_MAX_QUERY_LEN,
        }
    }

    pub fn with_max_query_len(mut self, max_query_len: usize) -> Self {
        self.max_query_len = max_query_len;
        self
    }

    pub fn with_locks(mut self, locks: UserLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn pipeline(&self) -> &Arc<GuidancePipeline> {
        &self.pipeline
    }

    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    pub async fn handle(&self, cmd: ProcessRequestCommand) -> Result<AnalysisResult, ProcessRequestError> {
        // 1. Validate before touching any state
        self.validate(&cmd)?;

        // 2. Serialize with other runs for this user
        let _guard = self.locks.acquire(&cmd.user_id).await;

        // 3. Load, falling back to a fresh profile
        let mut warnings = Vec::new();
        let mut profile = match self.store.load(&cmd.user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::new(cmd.user_id.clone()),
            Err(err) => {
                tracing::warn!(user_id = %cmd.user_id, error = %err, "Profile load failed, starting fresh");
                warnings.push(format!("profile load failed, used a fresh profile: {}", err));
                UserProfile::new(cmd.user_id.clone())
            }
        };

        // 4. Run the pipeline
        let mut result = self
            .pipeline
            .run(&cmd.query, cmd.context.as_deref(), &mut profile)
            .await;

        // 5. Persist; the response stands even if this fails
        if let Err(err) = self.store.save(&cmd.user_id, &profile).await {
            tracing::warn!(user_id = %cmd.user_id, error = %err, "Profile save failed");
            warnings.push(format!("profile save failed: {}", err));
        }

        for warning in warnings {
            result = result.with_warning(warning);
        }
        Ok(result)
    }

    fn validate(&self, cmd: &ProcessRequestCommand) -> Result<(), ValidationError> {
        if cmd.query.trim().is_empty() {
            return Err(ValidationError::empty_field("query"));
        }
        check_length("query", &cmd.query, self.max_query_len)?;
        if let Some(context) = &cmd.context {
            check_length("context", context, self.max_query_len)?;
        }
        Ok(())
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::out_of_range(field, 1, max as i64, len as i64));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::guidance::{Decision, RuleBasedIntentInterpreter, Strategy};

    fn test_user_id() -> UserId {
        UserId::new("test-user-123").unwrap()
    }

    fn handler(store: &InMemoryProfileStore) -> ProcessRequestHandler {
        let pipeline = GuidancePipeline::with_interpreter(Arc::new(RuleBasedIntentInterpreter::new()));
        ProcessRequestHandler::new(Arc::new(pipeline), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn processes_and_saves_profile() {
        let store = InMemoryProfileStore::new();
        let handler = handler(&store);

        let result = handler
            .handle(ProcessRequestCommand::new(test_user_id(), "Write my essay for me"))
            .await
            .unwrap();

        assert_eq!(result.ethics.decision, Decision::Redirect);
        assert_eq!(result.strategy, Strategy::DeclineWithAlternative);
        assert!(!result.has_warnings());

        let saved = store.load(&test_user_id()).await.unwrap().unwrap();
        assert_eq!(saved.interaction_count(), 1);
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_side_effects() {
        let store = InMemoryProfileStore::new();
        let handler = handler(&store);

        let result = handler
            .handle(ProcessRequestCommand::new(test_user_id(), "   "))
            .await;

        assert_eq!(
            result,
            Err(ProcessRequestError::Validation(ValidationError::empty_field("query")))
        );
        assert_eq!(store.profile_count().await, 0);
    }

    #[tokio::test]
    async fn overlong_query_is_rejected() {
        let store = InMemoryProfileStore::new();
        let handler = handler(&store).with_max_query_len(10);

        let result = handler
            .handle(ProcessRequestCommand::new(test_user_id(), "explain this long thing"))
            .await;

        assert!(matches!(
            result,
            Err(ProcessRequestError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn overlong_context_is_rejected() {
        let store = InMemoryProfileStore::new();
        let handler = handler(&store).with_max_query_len(10);

        let cmd = ProcessRequestCommand::new(test_user_id(), "explain").with_context("x".repeat(11));
        let err = handler.handle(cmd).await.unwrap_err();

        let ProcessRequestError::Validation(inner) = err;
        assert_eq!(inner.field(), "context");
    }

    #[tokio::test]
    async fn load_failure_uses_fresh_profile_with_warning() {
        let store = InMemoryProfileStore::new();
        store.insert(UserProfile::seeded(test_user_id(), 90.0)).await;
        store.set_fail_loads(true);

        let result = handler(&store)
            .handle(ProcessRequestCommand::new(test_user_id(), "Explain recursion"))
            .await
            .unwrap();

        assert_eq!(result.profile.interaction_count, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("load failed"));
    }

    #[tokio::test]
    async fn save_failure_is_reported_as_warning() {
        let store = InMemoryProfileStore::new();
        store.set_fail_saves(true);

        let result = handler(&store)
            .handle(ProcessRequestCommand::new(test_user_id(), "Explain recursion"))
            .await
            .unwrap();

        assert!(result.has_warnings());
        assert!(result.warnings[0].contains("save failed"));
        assert_eq!(result.profile.interaction_count, 1);
    }

    #[tokio::test]
    async fn profile_accumulates_across_requests() {
        let store = InMemoryProfileStore::new();
        let handler = handler(&store);

        for _ in 0..3 {
            handler
                .handle(ProcessRequestCommand::new(test_user_id(), "Why does this proof work?"))
                .await
                .unwrap();
        }

        let saved = store.load(&test_user_id()).await.unwrap().unwrap();
        assert_eq!(saved.interaction_count(), 3);
        assert_eq!(handler.locks().active_users(), 0);
    }

    #[test]
    fn validation_error_maps_to_domain_error_code() {
        let err: DomainError = ProcessRequestError::Validation(ValidationError::empty_field("query")).into();
        assert_eq!(err.code, ErrorCode::EmptyField);
        assert_eq!(err.details.get("field").map(String::as_str), Some("query"));
    }
}
