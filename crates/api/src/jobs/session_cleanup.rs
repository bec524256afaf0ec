//! Background job that purges expired sessions.

use persistence::repositories::SessionRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobError, JobFrequency};

/// Deletes sessions whose expiry has passed.
///
/// Expired sessions are already rejected on lookup; this only keeps the
/// table small.
pub struct SessionCleanupJob {
    sessions: SessionRepository,
}

impl SessionCleanupJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), JobError> {
        let deleted = self.sessions.delete_expired().await?;
        if deleted > 0 {
            info!(deleted = deleted, "Expired sessions removed");
        }
        Ok(())
    }
}
