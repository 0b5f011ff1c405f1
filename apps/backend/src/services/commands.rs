//! Command layer: token resolution, one transaction per command, then
//! notice dispatch after commit.

use std::sync::Arc;

use tracing::debug;

use crate::db::with_txn;
use crate::error::AppError;
use crate::notify::{dispatch, DispatchMode, Notice};
use crate::repos::games::Game;
use crate::repos::players;
use crate::repos::tasks::Task;
use crate::services::kill_requests::{self, Resolution, Submission};
use crate::services::lifecycle::{self, CreatedGame, JoinedPlayer};
use crate::services::views::{self, AdminOverview, Dossier, Scoreboard};
use crate::state::app_state::AppState;
use crate::trace_ctx;
use crate::utils::credentials::game_rng;

/// Entry point for every game command.
///
/// Each mutating call runs its service inside `with_txn`; notices are only
/// dispatched once that transaction has committed, and delivery failures
/// never surface to the caller. In `DispatchMode::Background` the caller
/// does not wait for delivery at all.
pub struct GameCommands<'a> {
    state: &'a AppState,
}

impl<'a> GameCommands<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn deliver(&self, notices: Vec<Notice>) {
        if notices.is_empty() {
            return;
        }
        debug!(count = notices.len(), mode = ?self.state.dispatch, "dispatching notices");
        match self.state.dispatch {
            DispatchMode::Inline => {
                dispatch(self.state.notifier.as_ref(), notices).await;
            }
            DispatchMode::Background => {
                let notifier = Arc::clone(&self.state.notifier);
                let trace_id = trace_ctx::trace_id();
                tokio::spawn(trace_ctx::with_trace_id(trace_id, async move {
                    dispatch(notifier.as_ref(), notices).await;
                }));
            }
        }
    }

    async fn player_id_for(&self, access_token: &str) -> Result<i64, AppError> {
        Ok(players::require_by_token(&self.state.db, access_token)
            .await?
            .id)
    }

    pub async fn create_game(&self, name: &str) -> Result<CreatedGame, AppError> {
        let name = name.to_string();
        with_txn(self.state, move |txn| {
            Box::pin(async move { lifecycle::create_game(txn, &name).await })
        })
        .await
    }

    pub async fn join(
        &self,
        game_id: &str,
        name: &str,
        contact: &str,
    ) -> Result<JoinedPlayer, AppError> {
        let (game_id, name, contact) = (game_id.to_string(), name.to_string(), contact.to_string());
        with_txn(self.state, move |txn| {
            Box::pin(async move { lifecycle::add_player(txn, &game_id, &name, &contact).await })
        })
        .await
    }

    pub async fn add_task(
        &self,
        game_id: &str,
        admin_token: &str,
        description: &str,
    ) -> Result<Task, AppError> {
        let (game_id, admin_token, description) = (
            game_id.to_string(),
            admin_token.to_string(),
            description.to_string(),
        );
        with_txn(self.state, move |txn| {
            Box::pin(async move {
                lifecycle::add_task(txn, &game_id, &admin_token, &description).await
            })
        })
        .await
    }

    pub async fn start(&self, game_id: &str, admin_token: &str) -> Result<Game, AppError> {
        let (game_id, admin_token) = (game_id.to_string(), admin_token.to_string());
        let mut rng = game_rng()?;
        let (game, notices) = with_txn(self.state, move |txn| {
            Box::pin(async move { lifecycle::start(txn, &game_id, &admin_token, &mut rng).await })
        })
        .await?;
        self.deliver(notices).await;
        Ok(game)
    }

    /// Claim a kill as the player holding `access_token`.
    pub async fn submit_claim(
        &self,
        access_token: &str,
        victim_id: i64,
    ) -> Result<Submission, AppError> {
        let killer_id = self.player_id_for(access_token).await?;
        let (submission, notices) = with_txn(self.state, move |txn| {
            Box::pin(async move { kill_requests::submit(txn, killer_id, victim_id).await })
        })
        .await?;
        self.deliver(notices).await;
        Ok(submission)
    }

    pub async fn confirm_as_victim(
        &self,
        access_token: &str,
        request_id: i64,
    ) -> Result<Resolution, AppError> {
        let caller_id = self.player_id_for(access_token).await?;
        let mut rng = game_rng()?;
        let (resolution, notices) = with_txn(self.state, move |txn| {
            Box::pin(async move {
                kill_requests::confirm_by_victim(txn, request_id, caller_id, &mut rng).await
            })
        })
        .await?;
        self.deliver(notices).await;
        Ok(resolution)
    }

    pub async fn approve(&self, admin_token: &str, request_id: i64) -> Result<Resolution, AppError> {
        let admin_token = admin_token.to_string();
        let mut rng = game_rng()?;
        let (resolution, notices) = with_txn(self.state, move |txn| {
            Box::pin(async move {
                kill_requests::confirm_by_admin(txn, request_id, &admin_token, &mut rng).await
            })
        })
        .await?;
        self.deliver(notices).await;
        Ok(resolution)
    }

    pub async fn reject(&self, admin_token: &str, request_id: i64) -> Result<Resolution, AppError> {
        let admin_token = admin_token.to_string();
        let (resolution, notices) = with_txn(self.state, move |txn| {
            Box::pin(async move { kill_requests::reject(txn, request_id, &admin_token).await })
        })
        .await?;
        self.deliver(notices).await;
        Ok(resolution)
    }

    pub async fn dossier(&self, access_token: &str) -> Result<Dossier, AppError> {
        let player_id = self.player_id_for(access_token).await?;
        views::dossier(&self.state.db, player_id).await
    }

    pub async fn scoreboard(&self, game_id: &str) -> Result<Scoreboard, AppError> {
        views::scoreboard(&self.state.db, game_id).await
    }

    pub async fn admin_overview(
        &self,
        game_id: &str,
        admin_token: &str,
    ) -> Result<AdminOverview, AppError> {
        views::admin_overview(&self.state.db, game_id, admin_token).await
    }
}
