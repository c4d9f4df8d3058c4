use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, UserId};

/// Actor resolved from an incoming request, if any.
///
/// Mutating endpoints proceed without an actor; audit and notification side
/// effects are skipped in that case. Endpoints that return actor-scoped data
/// call [`ActorContext::require`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext(Option<UserId>);

impl ActorContext {
    /// Creates a context for an identified actor.
    #[must_use]
    pub fn identified(user_id: UserId) -> Self {
        Self(Some(user_id))
    }

    /// Creates a context for a request without a resolvable actor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Returns the actor id, if one was resolved.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.0
    }

    /// Returns the actor id or an unauthorized error.
    pub fn require(&self) -> AppResult<UserId> {
        self.0
            .ok_or_else(|| AppError::Unauthorized("actor identity required".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::ActorContext;
    use crate::{AppError, UserId};

    #[test]
    fn anonymous_context_fails_require() {
        let result = ActorContext::anonymous().require();
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn identified_context_returns_actor() {
        let user_id = UserId::new();
        let context = ActorContext::identified(user_id);
        assert_eq!(context.user_id(), Some(user_id));
    }
}
