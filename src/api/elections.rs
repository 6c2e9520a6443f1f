use rocket::{serde::json::Json, Route, State};

use crate::engine::Engine;
use crate::error::Result;
use crate::model::{
    api::{
        caller::Caller,
        election::{ElectionDescription, ElectionSpec, ElectionSummary},
    },
    common::election::ElectionId,
};

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        public_elections,
        my_elections,
        election,
        join_election,
        close_election,
        reopen_election,
    ]
}

#[post("/elections", data = "<spec>", format = "json")]
async fn create_election(
    caller: Caller,
    spec: Json<ElectionSpec>,
    engine: &State<Engine>,
) -> Result<Json<ElectionDescription>> {
    let election = engine.create_election(&caller, spec.into_inner()).await?;
    Ok(Json(ElectionDescription::for_viewer(election, Some(&caller))))
}

#[get("/elections")]
async fn public_elections(engine: &State<Engine>) -> Result<Json<Vec<ElectionSummary>>> {
    let elections = engine.list_public_elections().await?;
    Ok(Json(elections.into_iter().map(Into::into).collect()))
}

#[get("/elections/mine")]
async fn my_elections(
    caller: Caller,
    engine: &State<Engine>,
) -> Result<Json<Vec<ElectionDescription>>> {
    let elections = engine.get_my_elections(&caller).await?;
    Ok(Json(
        elections
            .into_iter()
            .map(|election| ElectionDescription::for_viewer(election, Some(&caller)))
            .collect(),
    ))
}

#[get("/elections/<election_id>")]
async fn election(
    election_id: ElectionId,
    caller: Option<Caller>,
    engine: &State<Engine>,
) -> Result<Json<ElectionDescription>> {
    let election = engine.get_election(election_id).await?;
    Ok(Json(ElectionDescription::for_viewer(
        election,
        caller.as_deref(),
    )))
}

/// Find an election by its access code. Anyone holding the code may see it.
#[get("/join/<code>")]
async fn join_election(code: &str, engine: &State<Engine>) -> Result<Json<ElectionDescription>> {
    let election = engine.find_by_access_code(code).await?;
    Ok(Json(ElectionDescription::for_code_holder(election)))
}

#[post("/elections/<election_id>/close")]
async fn close_election(
    election_id: ElectionId,
    caller: Caller,
    engine: &State<Engine>,
) -> Result<Json<ElectionDescription>> {
    let election = engine.close_election(election_id, &caller).await?;
    Ok(Json(ElectionDescription::for_viewer(election, Some(&caller))))
}

#[post("/elections/<election_id>/reopen")]
async fn reopen_election(
    election_id: ElectionId,
    caller: Caller,
    engine: &State<Engine>,
) -> Result<Json<ElectionDescription>> {
    let election = engine.reopen_election(election_id, &caller).await?;
    Ok(Json(ElectionDescription::for_viewer(election, Some(&caller))))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Header, Status},
        local::asynchronous::Client,
        serde::json::serde_json,
    };

    use crate::error::{ErrorBody, Rejection};
    use crate::model::{
        common::{election::Visibility, user::UserId},
        db::election::Election,
    };
    use crate::store::{MemoryStore, Store};

    use super::*;

    fn as_user(id: &str) -> Header<'static> {
        Header::new("X-User-Id", id.to_string())
    }

    async fn create(client: &Client, owner: &str, spec: ElectionSpec) -> ElectionDescription {
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .header(as_user(owner))
            .body(serde_json::to_string(&spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    #[backend_test]
    async fn create_then_fetch(client: Client) {
        let created = create(&client, "alice", ElectionSpec::public_example()).await;
        assert_eq!(created.id, 1);
        assert_eq!(created.owner_id, UserId::from("alice"));
        assert!(!created.is_closed);
        assert_eq!(created.result_summary, None);

        let response = client.get(uri!(election(created.id))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let fetched: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(fetched, created);
    }

    #[backend_test]
    async fn creating_requires_an_identity(client: Client) {
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&ElectionSpec::public_example()).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn invalid_spec_is_bad_request(client: Client, store: MemoryStore) {
        let mut spec = ElectionSpec::public_example();
        spec.min_age = -3;
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .header(as_user("alice"))
            .body(serde_json::to_string(&spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        assert!(store.elections(&crate::store::ElectionFilter::Public).await.unwrap().is_empty());
    }

    #[backend_test]
    async fn listing_shows_only_public_elections(client: Client) {
        create(&client, "alice", ElectionSpec::public_example()).await;
        create(&client, "alice", ElectionSpec::private_example()).await;
        create(&client, "bob", ElectionSpec::public_example()).await;

        let response = client.get(uri!(public_elections)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let listed: Vec<ElectionSummary> = response.into_json().await.unwrap();
        assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(listed.iter().all(|e| e.visibility == Visibility::Public));

        let response = client
            .get(uri!(my_elections))
            .header(as_user("alice"))
            .dispatch()
            .await;
        let mine: Vec<ElectionDescription> = response.into_json().await.unwrap();
        assert_eq!(mine.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
        // The owner always sees their own codes.
        assert!(mine.iter().all(|e| e.access_code.is_some()));
    }

    #[backend_test]
    async fn private_election_is_joined_by_code(client: Client) {
        let created = create(&client, "alice", ElectionSpec::private_example()).await;
        let code = created.access_code.clone().unwrap();

        // Fetching by ID does not leak the code to others.
        let response = client
            .get(uri!(election(created.id)))
            .header(as_user("bob"))
            .dispatch()
            .await;
        let seen: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(seen.access_code, None);

        let response = client
            .get(uri!(join_election(code.to_lowercase())))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let joined: ElectionDescription = response.into_json().await.unwrap();
        assert_eq!(joined.id, created.id);

        let response = client.get(uri!(join_election("NOPE00"))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn owner_closes_and_reopens(client: Client) {
        let created = create(&client, "alice", ElectionSpec::public_example()).await;

        let response = client
            .post(uri!(close_election(created.id)))
            .header(as_user("bob"))
            .dispatch()
            .await;
        assert_eq!(Status::Forbidden, response.status());
        let body: ErrorBody = response.into_json().await.unwrap();
        assert_eq!(body.reason, Some(Rejection::NotOwner));

        let response = client
            .post(uri!(close_election(created.id)))
            .header(as_user("alice"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let closed: ElectionDescription = response.into_json().await.unwrap();
        assert!(closed.is_closed);
        assert!(closed.ended_at.is_some());
        assert!(closed.result_summary.is_some());

        let response = client
            .post(uri!(close_election(created.id)))
            .header(as_user("alice"))
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());

        let response = client
            .post(uri!(reopen_election(created.id)))
            .header(as_user("alice"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let reopened: ElectionDescription = response.into_json().await.unwrap();
        assert!(!reopened.is_closed);
        assert_eq!(reopened.result_summary, closed.result_summary);
    }

    #[backend_test]
    async fn overdue_election_is_closed_when_read(client: Client, store: MemoryStore) {
        store
            .insert_election(&Election::overdue_example(1))
            .await
            .unwrap();

        let response = client.get(uri!(election(1))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let fetched: ElectionDescription = response.into_json().await.unwrap();
        assert!(fetched.is_closed);
        assert!(store.election(1).await.unwrap().unwrap().is_closed());
    }

    #[backend_test]
    async fn store_outage_is_a_server_error(client: Client, store: MemoryStore) {
        store.set_offline(true);
        let response = client.get(uri!(public_elections)).dispatch().await;
        assert_eq!(Status::InternalServerError, response.status());
    }

    #[backend_test]
    async fn unknown_election_is_not_found(client: Client) {
        let response = client.get(uri!(election(99))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
