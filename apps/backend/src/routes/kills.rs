//! Admin resolution of kill claims.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::services::GameCommands;
use crate::state::app_state::AppState;

/// POST /api/kills/{request_id}/approve
///
/// `200` with the resolution even when another path got there first
/// (`already_resolved`) or the claim went stale.
async fn approve(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let resolution = GameCommands::new(&app_state)
        .approve(token.as_str(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(resolution))
}

/// POST /api/kills/{request_id}/reject
async fn reject(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let resolution = GameCommands::new(&app_state)
        .reject(token.as_str(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(resolution))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{request_id}/approve").route(web::post().to(approve)))
        .service(web::resource("/{request_id}/reject").route(web::post().to(reject)));
}
