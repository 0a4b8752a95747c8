use ::log::info;
use rocket::serde::json::{self, Json};
use rocket::*;

use super::*;

/// Stores a finished game and returns it with its assigned id.
/// Malformed payloads are rejected before anything reaches the store.
#[post("/api/scores", data = "<submission>")]
pub async fn add_score(
    submission: Result<Json<ScoreSubmission>, json::Error<'_>>,
    session: Result<StoreSession, StoreError>,
) -> RequestResult<Json<ScoreView>> {
    let submission = submission?.into_inner();
    let mut session = session?;

    let record = session.insert(submission).await?;
    info!(
        "saved score {}: {} solved {} disks in {} moves ({}s)",
        record.id, record.player_name, record.num_disks, record.moves, record.clear_time
    );

    Ok(Json(ScoreView::from(record)))
}

/// Fetches every stored score, oldest first.
#[get("/api/scores")]
pub async fn get_scores(
    session: Result<StoreSession, StoreError>,
) -> RequestResult<Json<Vec<ScoreView>>> {
    let records = session?.list_all().await?;
    Ok(Json(records.into_iter().map(ScoreView::from).collect()))
}

/// Fetches a single score by id.
#[get("/api/scores/<id>")]
pub async fn get_score(
    id: ScoreId,
    session: Result<StoreSession, StoreError>,
) -> RequestResult<Json<ScoreView>> {
    match session?.find(id).await? {
        Some(record) => Ok(Json(ScoreView::from(record))),
        None => Err(RequestError::NoSuchScore { id }),
    }
}
