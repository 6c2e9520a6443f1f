use std::ops::Deref;

use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};

use crate::config::{Config, DEFAULT_IDENTITY_HEADER};
use crate::error::Error;
use crate::model::common::user::UserId;

/// The identity of the user making a request, asserted by a trusted upstream
/// in a request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl Deref for Caller {
    type Target = UserId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Caller {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let header = req
            .rocket()
            .state::<Config>()
            .map_or(DEFAULT_IDENTITY_HEADER, Config::identity_header);
        match req.headers().get_one(header).map(str::trim) {
            Some(id) if !id.is_empty() => Outcome::Success(Caller(UserId::from(id))),
            _ => Outcome::Failure((
                Status::Unauthorized,
                Error::Unauthenticated(format!("missing '{header}' header")),
            )),
        }
    }
}
