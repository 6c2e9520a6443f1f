use log::{debug, error};
use mongodb::{bson::ser::Error as BsonSerError, error::Error as DbError};
use rocket::{
    http::{Status, StatusClass},
    response::{self, status, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Any error the engine can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// The rejection reason, if this is a rejection.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Store(_) => Status::InternalServerError,
            Self::Validation(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Unauthenticated(_) => Status::Unauthorized,
            Self::Rejected(rejection) => match rejection {
                Rejection::Closed | Rejection::AlreadyVoted | Rejection::AlreadyClosed => {
                    Status::Conflict
                }
                Rejection::TooYoung | Rejection::NotAuthorizedPrivate | Rejection::NotOwner => {
                    Status::Forbidden
                }
                Rejection::InvalidCandidate => Status::UnprocessableEntity,
            },
        }
    }
}

/// A failure of the backing store. The operation that hit it has been
/// abandoned without persisting anything; it is safe to retry as a whole.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Serialization(#[from] BsonSerError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

/// Malformed input, rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("election title must not be empty")]
    EmptyTitle,
    #[error("election description must not be empty")]
    EmptyDescription,
    #[error("minimum age must not be negative")]
    NegativeMinAge,
    #[error("minimum age {0} is out of range")]
    MinAgeOutOfRange(i64),
    #[error("end time must be in the future")]
    EndNotInFuture,
    #[error("an election needs at least one named candidate")]
    NoCandidates,
    #[error("access code must not be blank")]
    BlankAccessCode,
    #[error("voters must be at least {minimum} years old, got {age}")]
    AgeBelowMinimum { age: u32, minimum: u32 },
}

/// Why a vote or a state change was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Rejection {
    /// The election is not accepting votes.
    #[error("the election is closed")]
    Closed,
    /// The voter's age is unknown or below the election's minimum.
    #[error("the voter does not meet the minimum age")]
    TooYoung,
    /// Only the owner may vote in a private election.
    #[error("only the owner may vote in a private election")]
    NotAuthorizedPrivate,
    /// The chosen candidate does not exist.
    #[error("no such candidate")]
    InvalidCandidate,
    /// The voter already has a ballot in this election.
    #[error("the voter has already voted")]
    AlreadyVoted,
    /// Only the owner may close or reopen an election.
    #[error("only the owner may close or reopen the election")]
    NotOwner,
    /// The election is already closed.
    #[error("the election is already closed")]
    AlreadyClosed,
}

/// JSON body sent alongside an error status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<Rejection>,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        if status.class() == StatusClass::ServerError {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
            reason: self.rejection(),
        };
        status::Custom(status, Json(body)).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_client_errors() {
        let cases = [
            (Rejection::Closed, Status::Conflict),
            (Rejection::TooYoung, Status::Forbidden),
            (Rejection::NotAuthorizedPrivate, Status::Forbidden),
            (Rejection::InvalidCandidate, Status::UnprocessableEntity),
            (Rejection::AlreadyVoted, Status::Conflict),
            (Rejection::NotOwner, Status::Forbidden),
            (Rejection::AlreadyClosed, Status::Conflict),
        ];
        for (rejection, status) in cases {
            let err = Error::from(rejection);
            assert_eq!(err.status(), status);
            assert_eq!(err.rejection(), Some(rejection));
        }
    }

    #[test]
    fn store_errors_are_server_errors() {
        let err = Error::from(StoreError::Unavailable("offline".to_string()));
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.rejection(), None);
    }
}
