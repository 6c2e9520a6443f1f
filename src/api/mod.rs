use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::ErrorBody;

mod elections;
mod profile;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(elections::routes());
    routes.extend(voting::routes());
    routes.extend(profile::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Report errors raised outside our handlers (bad guards, bad bodies, unknown
/// routes) in the same JSON shape as handler errors.
#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let body = ErrorBody {
        error: status.reason_lossy().to_string(),
        reason: None,
    };
    (status, Json(body))
}
