// HTTP handler bindings for the snake endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Mapping outcomes and errors onto status codes

use log::warn;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use lee_snake::bot::{Bot, BotError, EndRequest, MoveRequest, StartRequest};
use lee_snake::engine::TickOutcome;

type ErrorResponse = (Status, Json<Value>);

fn error_response(err: BotError) -> ErrorResponse {
    let status = match err {
        BotError::UnknownArena(_) => Status::NotFound,
        BotError::Snapshot(_) | BotError::Map(_) => Status::BadRequest,
        BotError::Engine(_) => Status::InternalServerError,
    };
    warn!("Request failed ({}): {}", status, err);
    (status, Json(json!({ "error": err.to_string() })))
}

/// GET / endpoint
/// Returns bot metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Registers the static map for a snake
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<StartRequest>) -> Result<Status, ErrorResponse> {
    bot.start(&start_req).map_err(error_response)?;
    Ok(Status::Ok)
}

/// POST /move endpoint
/// Called each tick to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<MoveRequest>,
) -> Result<Json<Value>, ErrorResponse> {
    match bot.get_move(move_req.into_inner()).await {
        Ok(TickOutcome::Move(decision)) => Ok(Json(json!({ "move": decision.direction }))),
        Ok(TickOutcome::Dead) => Err((Status::Gone, Json(json!({ "status": "dead" })))),
        Err(err) => Err(error_response(err)),
    }
}

/// POST /end endpoint
/// Records the final length and forgets the snake's map
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<EndRequest>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
