use crate::application::{AppResult, ChatClient, WatcherRepository};
use crate::domain::UserId;

/// Fetches display profiles for watchers that only have an id.
pub struct ResolveWatchersUseCase<'a> {
    pub registry: &'a dyn WatcherRepository,
    pub chat: &'a dyn ChatClient,
}

impl<'a> ResolveWatchersUseCase<'a> {
    /// Resolve every unresolved watcher; returns how many got a profile.
    ///
    /// Lookup failures are logged and the watcher stays registered, so the
    /// next pass retries it.
    pub async fn resolve_all(&self) -> AppResult<usize> {
        let pending: Vec<UserId> = self
            .registry
            .list()?
            .into_iter()
            .filter(|w| !w.resolved)
            .map(|w| w.id)
            .collect();

        let mut resolved = 0;
        for id in pending {
            if self.resolve_one(id).await? {
                resolved += 1;
            }
        }
        Ok(resolved)
    }

    pub async fn resolve_one(&self, id: UserId) -> AppResult<bool> {
        match self.chat.fetch_user(id).await {
            Ok(profile) => {
                tracing::debug!(user_id = %id, name = %profile.name, "acquired user details");
                self.registry.apply_profile(&profile)
            }
            Err(e) => {
                tracing::warn!(user_id = %id, "unable to acquire user details: {e}");
                Ok(false)
            }
        }
    }
}
