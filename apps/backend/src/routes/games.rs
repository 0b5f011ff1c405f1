//! Game routes: creation, joining, tasks, start, scoreboard and the admin
//! view.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::extractors::{BearerToken, JsonBody};
use crate::services::GameCommands;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreateGameRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateGameResponse {
    game_id: String,
    admin_token: String,
}

#[derive(Debug, Deserialize)]
struct JoinRequest {
    name: String,
    contact: String,
}

#[derive(Debug, Serialize)]
struct JoinResponse {
    player_id: i64,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AddTaskRequest {
    description: String,
}

#[derive(Debug, Serialize)]
struct TaskResponse {
    task_id: i64,
    description: String,
}

#[derive(Debug, Serialize)]
struct StartResponse {
    game_id: String,
    status: GameStatus,
    version: i32,
}

/// POST /api/games
///
/// The admin credential is returned here and never again.
async fn create_game(
    app_state: web::Data<AppState>,
    body: JsonBody<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    let created = GameCommands::new(&app_state).create_game(&body.name).await?;
    Ok(HttpResponse::Created().json(CreateGameResponse {
        game_id: created.game.id,
        admin_token: created.admin_token,
    }))
}

/// GET /api/games/{game_id}
async fn admin_overview(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let overview = GameCommands::new(&app_state)
        .admin_overview(&path, token.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(overview))
}

/// POST /api/games/{game_id}/players
async fn join(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: JsonBody<JoinRequest>,
) -> Result<HttpResponse, AppError> {
    let joined = GameCommands::new(&app_state)
        .join(&path, &body.name, &body.contact)
        .await?;
    Ok(HttpResponse::Created().json(JoinResponse {
        player_id: joined.player.id,
        access_token: joined.access_token,
    }))
}

/// POST /api/games/{game_id}/tasks
async fn add_task(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    token: BearerToken,
    body: JsonBody<AddTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let task = GameCommands::new(&app_state)
        .add_task(&path, token.as_str(), &body.description)
        .await?;
    Ok(HttpResponse::Created().json(TaskResponse {
        task_id: task.id,
        description: task.description,
    }))
}

/// POST /api/games/{game_id}/start
async fn start(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    token: BearerToken,
) -> Result<HttpResponse, AppError> {
    let game = GameCommands::new(&app_state)
        .start(&path, token.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(StartResponse {
        game_id: game.id,
        status: game.status,
        version: game.version,
    }))
}

/// GET /api/games/{game_id}/scoreboard
async fn scoreboard(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let board = GameCommands::new(&app_state).scoreboard(&path).await?;
    Ok(HttpResponse::Ok().json(board))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_game)))
        .service(web::resource("/{game_id}").route(web::get().to(admin_overview)))
        .service(web::resource("/{game_id}/players").route(web::post().to(join)))
        .service(web::resource("/{game_id}/tasks").route(web::post().to(add_task)))
        .service(web::resource("/{game_id}/start").route(web::post().to(start)))
        .service(web::resource("/{game_id}/scoreboard").route(web::get().to(scoreboard)));
}
