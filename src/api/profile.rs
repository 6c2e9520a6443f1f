use rocket::{serde::json::Json, Route, State};

use crate::engine::Engine;
use crate::error::Result;
use crate::model::api::{
    caller::Caller,
    profile::{ProfileDescription, ProfileUpdate},
};

pub fn routes() -> Vec<Route> {
    routes![profile, update_profile]
}

#[get("/profile")]
async fn profile(caller: Caller, engine: &State<Engine>) -> Result<Json<ProfileDescription>> {
    Ok(Json(engine.profile(&caller).await?.into()))
}

#[put("/profile", data = "<update>", format = "json")]
async fn update_profile(
    caller: Caller,
    update: Json<ProfileUpdate>,
    engine: &State<Engine>,
) -> Result<Json<ProfileDescription>> {
    Ok(Json(engine.update_profile(&caller, update.age).await?.into()))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Header, Status},
        local::asynchronous::Client,
        serde::json::json,
    };

    use crate::model::common::user::UserId;

    use super::*;

    #[backend_test]
    async fn profile_round_trip(client: Client) {
        let response = client
            .get(uri!(profile))
            .header(Header::new("X-User-Id", "dave"))
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());

        let response = client
            .put(uri!(update_profile))
            .header(ContentType::JSON)
            .header(Header::new("X-User-Id", "dave"))
            .body(json!({ "age": 21 }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let response = client
            .get(uri!(profile))
            .header(Header::new("X-User-Id", "dave"))
            .dispatch()
            .await;
        let profile: ProfileDescription = response.into_json().await.unwrap();
        assert_eq!(profile.id, UserId::from("dave"));
        assert_eq!(profile.age, Some(21));
    }

    #[backend_test]
    async fn too_young_profile_is_rejected(client: Client) {
        let response = client
            .put(uri!(update_profile))
            .header(ContentType::JSON)
            .header(Header::new("X-User-Id", "kid"))
            .body(json!({ "age": 9 }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
    }
}
