//! Round recording, listing, and statistics handlers.
//!
//! All three endpoints require a session user. Rounds are recorded for the
//! session user, never for a caller-supplied player name.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{player_statistics, Error, Round, RoundSummary, HOLES};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body of the round listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoundsResponse {
    /// Every stored round, in append order, all players included.
    pub rounds: Vec<RoundSummary>,
}

/// Per-hole club breakdown as submitted by the client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailedScoreInput {
    /// Par for the hole.
    pub par: i32,
    /// Strokes played with the driver.
    pub driver: i32,
    /// Strokes played with woods or utility clubs.
    pub wood_util: i32,
    /// Strokes played with irons.
    pub iron: i32,
    /// Putts.
    pub putter: i32,
}

/// Round submission body. Hole totals are computed server-side from the club
/// counts; clients cannot submit a total directly.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRoundRequest {
    /// Course the round was played on.
    pub course_name: String,
    /// Exactly one entry per hole, holes 1 to 18 in order.
    pub detailed_scores: Vec<DetailedScoreInput>,
}

/// List every stored round.
#[utoipa::path(
    get,
    path = "/api/rounds",
    tags = ["rounds"],
    responses(
        (status = 200, description = "All stored rounds", body = RoundsResponse),
        (status = 401, description = "No session", body = Error)
    )
)]
#[get("/rounds")]
pub async fn list_rounds(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RoundsResponse>> {
    session.require_user()?;
    Ok(web::Json(RoundsResponse {
        rounds: state.rounds.load_all().await,
    }))
}

/// Record a round for the session user.
#[utoipa::path(
    post,
    path = "/api/rounds",
    request_body = CreateRoundRequest,
    tags = ["rounds"],
    responses(
        (status = 200, description = "Round recorded", body = Round),
        (status = 400, description = "Invalid submission", body = Error),
        (status = 401, description = "No session", body = Error)
    )
)]
#[post("/rounds")]
pub async fn create_round(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRoundRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;

    let course_name = payload.course_name.trim();
    if course_name.is_empty() {
        return Err(Error::invalid_request("course_name is required"));
    }
    if payload.detailed_scores.len() != HOLES {
        return Err(Error::invalid_request(format!(
            "expected {HOLES} detailed scores, got {}",
            payload.detailed_scores.len()
        )));
    }

    let mut round = Round::new(user.username, course_name, None);
    for (index, detail) in payload.detailed_scores.iter().enumerate() {
        round.set_detailed_score(
            index + 1,
            detail.par,
            detail.driver,
            detail.wood_util,
            detail.iron,
            detail.putter,
        );
    }
    round.compute_handicap();

    state.rounds.append(&round).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Round recorded",
        "round_data": round,
    })))
}

/// Statistics for the session user's rounds.
#[utoipa::path(
    get,
    path = "/api/statistics",
    tags = ["rounds"],
    responses(
        (status = 200, description = "Statistics, or a message when the player has no rounds"),
        (status = 401, description = "No session", body = Error)
    )
)]
#[get("/statistics")]
pub async fn statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let rounds = state.rounds.load_all().await;
    match player_statistics(&user.username, &rounds) {
        Some(stats) => Ok(HttpResponse::Ok().json(stats)),
        None => Ok(HttpResponse::Ok().json(json!({
            "message": format!("No rounds found for {}", user.username),
        }))),
    }
}
