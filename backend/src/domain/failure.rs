//! Outcome taxonomy for catalogue, relationship and order operations.
//!
//! Every service in the domain reports a [`Failure`]. The boundary turns it
//! into an [`Error`] payload with [`From`].

use std::fmt;

use serde_json::json;

use super::ports::{BeerRepositoryError, OrderRepositoryError, UserRepositoryError};
use super::{BeerId, BeerIdParseError, Error, UserId, UserValidationError};

/// Entity kind named in a [`Failure::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Beer,
    User,
    Order,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Beer => "beer",
            Self::User => "user",
            Self::Order => "order",
        })
    }
}

/// Why a write was refused as a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The primary identifier is already taken.
    DuplicateId,
    /// A business-equal beer already exists.
    DuplicateBeer,
    /// The `userName` is held by another user.
    DuplicateUserName,
    /// The like edge is already present on at least one side.
    EdgeAlreadyExists,
    /// An update would make the record equal to a different stored beer.
    CollidesWithExisting,
}

/// Mirror that failed during a two-sided relationship write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorSide {
    /// `User::favorites`.
    Favorites,
    /// `Beer::liked_by`.
    LikedBy,
}

impl fmt::Display for MirrorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Favorites => "favorites",
            Self::LikedBy => "likedBy",
        })
    }
}

/// Domain failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// A referenced entity does not exist.
    #[error("{entity} {key} not found")]
    NotFound { entity: EntityKind, key: String },
    /// The write collides with stored state.
    #[error("{message}")]
    Conflict {
        reason: ConflictReason,
        message: String,
    },
    /// The request is malformed, for example a non-numeric id.
    #[error("{message}")]
    InvalidArgument { message: String },
    /// A business rule declined the request.
    #[error("{message}")]
    PolicyDenied { message: String },
    /// The first side of a like edge was persisted but the second was not.
    #[error("like between user {user} and beer {beer} is half written: {failed_side} write failed: {message}")]
    PartialRelationshipWrite {
        user: UserId,
        beer: BeerId,
        failed_side: MirrorSide,
        message: String,
    },
    /// The backing store is temporarily unreachable.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    /// The backing store failed.
    #[error("store failure: {message}")]
    Store { message: String },
}

impl Failure {
    /// A beer looked up by `key` is absent.
    pub fn beer_not_found(key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Beer,
            key: key.to_string(),
        }
    }

    /// A user looked up by `key` is absent.
    pub fn user_not_found(key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::User,
            key: key.to_string(),
        }
    }

    /// An order looked up by `key` is absent.
    pub fn order_not_found(key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Order,
            key: key.to_string(),
        }
    }

    /// Build a [`Failure::Conflict`].
    pub fn conflict(reason: ConflictReason, message: impl Into<String>) -> Self {
        Self::Conflict {
            reason,
            message: message.into(),
        }
    }

    /// Build a [`Failure::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build a [`Failure::PolicyDenied`].
    pub fn policy_denied(message: impl Into<String>) -> Self {
        Self::PolicyDenied {
            message: message.into(),
        }
    }

    /// Wrap a port error.
    pub fn store(err: impl fmt::Display) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }

    /// Whether this is a business-rule denial rather than a hard fault.
    pub fn is_soft_rejection(&self) -> bool {
        matches!(self, Self::PolicyDenied { .. })
    }

    /// Conflict reason, when this is a conflict.
    pub fn conflict_reason(&self) -> Option<ConflictReason> {
        match self {
            Self::Conflict { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        let message = failure.to_string();
        match failure {
            Failure::NotFound { entity, key } => Error::not_found(message)
                .with_details(json!({ "entity": entity.to_string(), "key": key })),
            Failure::Conflict { .. } => Error::conflict(message),
            Failure::InvalidArgument { .. } => Error::invalid_request(message),
            Failure::PolicyDenied { .. } => Error::policy_denied(message),
            Failure::PartialRelationshipWrite {
                user,
                beer,
                failed_side,
                ..
            } => Error::inconsistent_state(message).with_details(json!({
                "userId": user.as_str(),
                "beerId": beer.get(),
                "failedSide": failed_side.to_string(),
            })),
            Failure::Unavailable { .. } => Error::service_unavailable(message),
            Failure::Store { .. } => Error::internal(message),
        }
    }
}

impl From<BeerIdParseError> for Failure {
    fn from(err: BeerIdParseError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl From<UserValidationError> for Failure {
    fn from(err: UserValidationError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl From<BeerRepositoryError> for Failure {
    fn from(err: BeerRepositoryError) -> Self {
        match err {
            BeerRepositoryError::Connection { message } => Self::Unavailable { message },
            BeerRepositoryError::DuplicateKey { id } => Self::conflict(
                ConflictReason::DuplicateId,
                format!("beer id {id} is already used"),
            ),
            BeerRepositoryError::MissingRecord { id } => Self::beer_not_found(id),
            other @ BeerRepositoryError::Query { .. } => Self::store(other),
        }
    }
}

impl From<UserRepositoryError> for Failure {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Connection { message } => Self::Unavailable { message },
            UserRepositoryError::DuplicateKey { id } => Self::conflict(
                ConflictReason::DuplicateId,
                format!("user id {id} is already used"),
            ),
            UserRepositoryError::MissingRecord { id } => Self::user_not_found(id),
            other @ UserRepositoryError::Query { .. } => Self::store(other),
        }
    }
}

impl From<OrderRepositoryError> for Failure {
    fn from(err: OrderRepositoryError) -> Self {
        match err {
            OrderRepositoryError::Connection { message } => Self::Unavailable { message },
            OrderRepositoryError::MissingRecord { id } => Self::order_not_found(id),
            other @ OrderRepositoryError::Query { .. } => Self::store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Failure::beer_not_found(7), ErrorCode::NotFound)]
    #[case(Failure::conflict(ConflictReason::EdgeAlreadyExists, "already used"), ErrorCode::Conflict)]
    #[case(Failure::invalid_argument("bad id"), ErrorCode::InvalidRequest)]
    #[case(Failure::policy_denied("too small"), ErrorCode::PolicyDenied)]
    #[case(Failure::store("connection reset"), ErrorCode::InternalError)]
    #[case(Failure::from(BeerRepositoryError::connection("refused")), ErrorCode::ServiceUnavailable)]
    fn maps_to_error_code(#[case] failure: Failure, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(failure).code(), expected);
    }

    #[rstest]
    fn not_found_message_names_entity_and_key() {
        let err = Error::from(Failure::user_not_found("ada"));
        assert_eq!(err.message(), "user ada not found");
        let details = err.details().expect("details");
        assert_eq!(details["entity"], "user");
        assert_eq!(details["key"], "ada");
    }

    #[rstest]
    fn partial_write_is_reported_with_both_ids() {
        let failure = Failure::PartialRelationshipWrite {
            user: UserId::new("u-1").expect("valid id"),
            beer: BeerId::new(3),
            failed_side: MirrorSide::LikedBy,
            message: "timeout".to_owned(),
        };
        let err = Error::from(failure);
        assert_eq!(err.code(), ErrorCode::InconsistentState);
        let details = err.details().expect("details");
        assert_eq!(details["userId"], "u-1");
        assert_eq!(details["beerId"], 3);
        assert_eq!(details["failedSide"], "likedBy");
    }

    #[rstest]
    fn duplicate_keys_become_id_conflicts() {
        let failure = Failure::from(UserRepositoryError::duplicate_key("u-1"));
        assert_eq!(failure.conflict_reason(), Some(ConflictReason::DuplicateId));
        let failure = Failure::from(BeerRepositoryError::duplicate_key(5_u64));
        assert_eq!(failure.conflict_reason(), Some(ConflictReason::DuplicateId));
    }

    #[rstest]
    fn missing_records_become_not_found() {
        assert_eq!(
            Failure::from(OrderRepositoryError::missing_record("o-1")),
            Failure::order_not_found("o-1")
        );
    }

    #[rstest]
    fn only_policy_denial_is_soft() {
        assert!(Failure::policy_denied("min").is_soft_rejection());
        assert!(!Failure::beer_not_found(1).is_soft_rejection());
        assert!(!Failure::invalid_argument("x").is_soft_rejection());
    }
}
