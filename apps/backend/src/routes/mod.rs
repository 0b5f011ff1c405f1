use actix_web::web;

pub mod games;
pub mod health;
pub mod kills;
pub mod players;

/// Register every route. `main.rs` and the route tests share this, so
/// tests exercise the same paths the server exposes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Games: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Admin kill resolution: /api/kills/**
    cfg.service(web::scope("/api/kills").configure(kills::configure_routes));

    // Current player: /api/me/**
    cfg.service(web::scope("/api/me").configure(players::configure_routes));
}
