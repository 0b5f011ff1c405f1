//! Routes for the player holding the bearer token.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::entities::kill_requests::KillRequestStatus;
use crate::error::AppError;
use crate::extractors::{BearerToken, JsonBody};
use crate::services::GameCommands;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct ClaimRequest {
    victim_id: i64,
}

#[derive(Debug, Serialize)]
struct ClaimResponse {
    request_id: i64,
    victim_id: i64,
    status: KillRequestStatus,
    created: bool,
}

/// GET /api/me
async fn dossier(
    app_state: web::Data<AppState>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let dossier = GameCommands::new(&app_state).dossier(token.as_str()).await?;
    Ok(HttpResponse::Ok().json(dossier))
}

/// POST /api/me/kills
///
/// `201` for a new claim, `200` when an identical claim is already pending.
async fn submit_claim(
    app_state: web::Data<AppState>,
    token: BearerToken,
    body: JsonBody<ClaimRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = GameCommands::new(&app_state)
        .submit_claim(token.as_str(), body.victim_id)
        .await?;

    let response = ClaimResponse {
        request_id: submission.request.id,
        victim_id: submission.request.victim_id,
        status: submission.request.status,
        created: submission.created,
    };
    if submission.created {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// POST /api/me/kills/{request_id}/confirm
async fn confirm(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let resolution = GameCommands::new(&app_state)
        .confirm_as_victim(token.as_str(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(resolution))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(dossier)))
        .service(web::resource("/kills").route(web::post().to(submit_claim)))
        .service(web::resource("/kills/{request_id}/confirm").route(web::post().to(confirm)));
}
