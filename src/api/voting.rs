use rocket::{serde::json::Json, Route, State};

use crate::engine::Engine;
use crate::error::Result;
use crate::model::{
    api::{
        caller::Caller,
        tally::TallyDescription,
        vote::{VoteReceipt, VoteRequest},
    },
    common::election::ElectionId,
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, my_ballot, tally]
}

#[post("/elections/<election_id>/votes", data = "<vote>", format = "json")]
async fn cast_vote(
    election_id: ElectionId,
    caller: Caller,
    vote: Json<VoteRequest>,
    engine: &State<Engine>,
) -> Result<Json<VoteReceipt>> {
    let ballot = engine
        .cast_vote(election_id, &caller, vote.candidate_index)
        .await?;
    Ok(Json(ballot.into()))
}

/// The caller's own ballot. 404 if they have not voted.
#[get("/elections/<election_id>/votes/mine")]
async fn my_ballot(
    election_id: ElectionId,
    caller: Caller,
    engine: &State<Engine>,
) -> Result<Option<Json<VoteReceipt>>> {
    let ballot = engine.my_ballot(election_id, &caller).await?;
    Ok(ballot.map(|ballot| Json(ballot.into())))
}

#[get("/elections/<election_id>/tally")]
async fn tally(election_id: ElectionId, engine: &State<Engine>) -> Result<Json<TallyDescription>> {
    let standings = engine.get_tally(election_id).await?;
    Ok(Json(TallyDescription::new(election_id, standings)))
}
