use attest_types::{ItemId, Principal, RangeError, ReviewerId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("conflict: {0}")]
    Conflict(ConflictReason),

    #[error("insufficient quorum for {item}: have {have} reviews, need {need}")]
    InsufficientQuorum { item: ItemId, have: u32, need: u32 },

    #[error("snapshot rejected: {0}")]
    Snapshot(String),
}

/// Why a caller was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnauthorizedReason {
    #[error("caller {caller} is not the administrator")]
    NotAdministrator { caller: Principal },

    #[error("{0} is not registered")]
    UnknownReviewer(ReviewerId),

    #[error("{0} is not verified")]
    ReviewerNotVerified(ReviewerId),

    #[error("caller {caller} does not own {reviewer}")]
    WrongIdentity { reviewer: ReviewerId, caller: Principal },

    #[error("the null principal cannot act")]
    NullPrincipal,
}

/// The entity a lookup failed to find.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Entity {
    #[error("{0}")]
    Item(ItemId),

    #[error("{0}")]
    Reviewer(ReviewerId),
}

/// The uniqueness or one-way invariant an operation would have broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("{reviewer} already reviewed {item}")]
    AlreadyReviewed { item: ItemId, reviewer: ReviewerId },

    #[error("{0} is already finalized")]
    AlreadyFinalized(ItemId),
}

/// Flat error classification, independent of the carried details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRange,
    Unauthorized,
    NotFound,
    Conflict,
    InsufficientQuorum,
    Snapshot,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRange => "invalid_range",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InsufficientQuorum => "insufficient_quorum",
            Self::Snapshot => "snapshot",
        }
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange(_) => ErrorKind::InvalidRange,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InsufficientQuorum { .. } => ErrorKind::InsufficientQuorum,
            Self::Snapshot(_) => ErrorKind::Snapshot,
        }
    }

    /// Whether the same call can succeed later.
    ///
    /// Range errors succeed once the caller corrects its input; quorum errors
    /// succeed once more reviews accrue. Everything else needs a different
    /// caller or different arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidRange | ErrorKind::InsufficientQuorum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_retryability() {
        let range = RegistryError::from(RangeError {
            field: "condition",
            value: 101,
            min: 0,
            max: 100,
        });
        assert_eq!(range.kind(), ErrorKind::InvalidRange);
        assert!(range.is_retryable());

        let quorum = RegistryError::InsufficientQuorum {
            item: ItemId::new(1),
            have: 2,
            need: 3,
        };
        assert!(quorum.is_retryable());

        let conflict = RegistryError::Conflict(ConflictReason::AlreadyFinalized(ItemId::new(1)));
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert!(!conflict.is_retryable());

        let unauthorized =
            RegistryError::Unauthorized(UnauthorizedReason::ReviewerNotVerified(ReviewerId::new(2)));
        assert!(!unauthorized.is_retryable());
    }

    #[test]
    fn messages_name_the_entities() {
        let err = RegistryError::NotFound(Entity::Reviewer(ReviewerId::new(9)));
        assert_eq!(err.to_string(), "reviewer#9 not found");

        let err = RegistryError::Conflict(ConflictReason::AlreadyReviewed {
            item: ItemId::new(1),
            reviewer: ReviewerId::new(2),
        });
        assert_eq!(err.to_string(), "conflict: reviewer#2 already reviewed item#1");

        let err = RegistryError::Unauthorized(UnauthorizedReason::WrongIdentity {
            reviewer: ReviewerId::new(3),
            caller: Principal::new("mallory"),
        });
        assert_eq!(
            err.to_string(),
            "unauthorized: caller mallory does not own reviewer#3"
        );
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(ErrorKind::InsufficientQuorum.as_str(), "insufficient_quorum");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
