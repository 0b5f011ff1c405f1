use actix_web::http::StatusCode;
use actix_web::test;
use hitlist::AppError;
use serde_json::{json, Value};

use crate::support::{build_test_state, create_test_app};

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Two players, one claim, one winner, all over HTTP.
#[actix_web::test]
async fn full_game_over_http() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({ "name": "Garden Party" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let game_id = created["game_id"].as_str().unwrap().to_string();
    let admin = created["admin_token"].as_str().unwrap().to_string();

    let mut players = Vec::new();
    for name in ["Ann", "Ben"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/games/{game_id}/players"))
            .set_json(json!({ "name": name, "contact": format!("{name}@garden.test") }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let joined: Value = test::read_body_json(resp).await;
        players.push((
            joined["player_id"].as_i64().unwrap(),
            joined["access_token"].as_str().unwrap().to_string(),
        ));
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/tasks"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "description": "compliment their shoes" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{game_id}/start"))
        .insert_header(bearer(&admin))
        .to_request();
    let started: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["status"], "active");

    let (ann_id, ann_token) = players[0].clone();
    let (ben_id, ben_token) = players[1].clone();

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(bearer(&ann_token))
        .to_request();
    let dossier: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dossier["target"]["id"], ben_id);
    assert_eq!(dossier["task"], "compliment their shoes");

    let claim = || {
        test::TestRequest::post()
            .uri("/api/me/kills")
            .insert_header(bearer(&ann_token))
            .set_json(json!({ "victim_id": ben_id }))
            .to_request()
    };
    let resp = test::call_service(&app, claim()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["status"], "pending");
    assert_eq!(first["created"], true);
    let request_id = first["request_id"].as_i64().unwrap();

    let resp = test::call_service(&app, claim()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let again: Value = test::read_body_json(resp).await;
    assert_eq!(again["request_id"], request_id);
    assert_eq!(again["created"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{game_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let overview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overview["pending_requests"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/me/kills/{request_id}/confirm"))
        .insert_header(bearer(&ben_token))
        .to_request();
    let resolution: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resolution["outcome"], "confirmed");
    assert_eq!(resolution["winner_id"], ann_id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/kills/{request_id}/approve"))
        .insert_header(bearer(&admin))
        .to_request();
    let late: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(late["outcome"], "already_resolved");

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{game_id}/scoreboard"))
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board["status"], "finished");
    assert_eq!(board["winner_id"], ann_id);
    assert_eq!(board["entries"][0]["name"], "Ann");
    assert_eq!(board["entries"][0]["kills"], 1);

    let events: Vec<&str> = env
        .notifier
        .deliveries()
        .iter()
        .map(|d| d.kind.event())
        .collect();
    assert_eq!(
        events,
        vec![
            "game_started",
            "game_started",
            "kill_claimed",
            "eliminated",
            "victory",
            "game_over",
        ]
    );
    Ok(())
}

#[actix_web::test]
async fn admin_can_reject_a_claim() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded =
        crate::support::factory::seed_started_game(&env.state, &["Ann", "Ben"], &[]).await?;
    let app = create_test_app(env.state.clone()).await;
    let (ann, ben) = (seeded.player("Ann"), seeded.player("Ben"));

    let req = test::TestRequest::post()
        .uri("/api/me/kills")
        .insert_header(bearer(&ann.token))
        .set_json(json!({ "victim_id": ben.id }))
        .to_request();
    let claim: Value = test::call_and_read_body_json(&app, req).await;
    let request_id = claim["request_id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/kills/{request_id}/reject"))
        .insert_header(bearer(&seeded.admin_token))
        .to_request();
    let resolution: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resolution["outcome"], "rejected");
    assert_eq!(resolution["request_id"], request_id);

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(bearer(&ben.token))
        .to_request();
    let dossier: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dossier["is_alive"], true);
    assert!(dossier["pending_claims"].as_array().unwrap().is_empty());
    Ok(())
}
