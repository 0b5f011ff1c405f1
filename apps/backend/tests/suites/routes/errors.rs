use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use hitlist::AppError;
use serde_json::json;

use crate::support::factory::{seed_started_game, seed_waiting_game};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn missing_bearer_is_unauthorized() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::get().uri("/api/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED, None).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", "Basic Zm9vOmJhcg=="))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED, None).await;
    Ok(())
}

#[actix_web::test]
async fn unknown_token_is_forbidden() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", "Bearer nobody-has-this"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "NOT_AUTHORIZED", StatusCode::FORBIDDEN, None).await;
    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_bad_request() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({ "title": "wrong field" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;
    Ok(())
}

#[actix_web::test]
async fn unknown_game_is_not_found() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::get()
        .uri("/api/games/NOSUCHGAME/scoreboard")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "GAME_NOT_FOUND", StatusCode::NOT_FOUND, None).await;
    Ok(())
}

#[actix_web::test]
async fn starting_with_one_player_conflicts() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["Solo"], &[]).await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{}/start", seeded.game_id))
        .insert_header(("Authorization", format!("Bearer {}", seeded.admin_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        "INSUFFICIENT_PLAYERS",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn claiming_the_wrong_victim_is_rejected() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let names = ["A", "B", "C"];
    let seeded = seed_started_game(&env.state, &names, &[]).await?;
    crate::support::factory::force_ring(&env.state, &seeded, &names).await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::post()
        .uri("/api/me/kills")
        .insert_header((
            "Authorization",
            format!("Bearer {}", seeded.player("A").token),
        ))
        .set_json(json!({ "victim_id": seeded.player("C").id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem(resp, "TARGET_MISMATCH", StatusCode::FORBIDDEN, None).await;
    assert!(!problem.trace_id.is_empty());
    Ok(())
}
