//! The consumer task: ordered event processing and turn dispatch.
//!
//! Exactly one consumer runs per `connect` call. It is the only writer of
//! [`SessionState`], dequeues events strictly in arrival order, reconstructs
//! them, drives the engine callbacks, and submits resulting HTTP actions.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::client::session::SessionState;
use crate::client::stream::{ErrorSlot, EventKind, QueuedEvent};
use crate::client::variant::VariantAdapter;
use crate::client::ConnectCallbacks;
use crate::engine::ThinkingEngine;
use crate::error::ClientError;
use crate::game::{Move, Shot, Team};
use crate::protocol::{
    GameRuleType, StateUpdateEventData, StateUpdateFrame, reconstruct_state_update,
};

pub(crate) struct Consumer {
    session: SessionState,
    engine: Box<dyn ThinkingEngine>,
    adapter: VariantAdapter,
    rule_type: GameRuleType,
    max_end: u8,
    http: reqwest::Client,
    base_url: String,
    match_id: String,
    auth: (String, String),
    stop: watch::Sender<bool>,
    errors: ErrorSlot,
    callbacks: ConnectCallbacks,
}

impl Consumer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: SessionState,
        engine: Box<dyn ThinkingEngine>,
        adapter: VariantAdapter,
        rule_type: GameRuleType,
        max_end: u8,
        http: reqwest::Client,
        base_url: String,
        match_id: String,
        auth: (String, String),
        stop: watch::Sender<bool>,
        errors: ErrorSlot,
        callbacks: ConnectCallbacks,
    ) -> Self {
        Self {
            session,
            engine,
            adapter,
            rule_type,
            max_end,
            http,
            base_url,
            match_id,
            auth,
            stop,
            errors,
            callbacks,
        }
    }

    /// Hands the engine and adapter back after the stream closes.
    pub fn into_runtime(self) -> (Box<dyn ThinkingEngine>, VariantAdapter) {
        (self.engine, self.adapter)
    }

    /// Drains the queue until the producer drops its sender. Events already
    /// enqueued are always processed, even after a stop was requested.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<QueuedEvent>) -> Self {
        while let Some(event) = rx.recv().await {
            let label = match &event {
                QueuedEvent::Connected => "on_connected",
                QueuedEvent::Update { kind, .. } => kind.label(),
            };
            if let Err(err) = self.process(event).await {
                warn!(event = label, error = %err, "error while processing stream event");
                let recovered = self
                    .callbacks
                    .on_event_error
                    .as_mut()
                    .is_some_and(|hook| hook(&err));
                if recovered {
                    info!(event = label, "event error recovered by caller hook");
                } else {
                    self.errors.record(err);
                    let _ = self.stop.send(true);
                }
            }
        }
        self
    }

    async fn process(&mut self, event: QueuedEvent) -> Result<(), ClientError> {
        match event {
            QueuedEvent::Connected => {
                if let Some(hook) = &mut self.callbacks.on_connected {
                    hook();
                }
                Ok(())
            }
            QueuedEvent::Update { kind, data } => {
                let frame: StateUpdateFrame = serde_json::from_str(&data)?;
                let event = reconstruct_state_update(
                    &frame,
                    self.rule_type,
                    self.max_end,
                    &mut self.session.hammer,
                )?;
                match kind {
                    EventKind::Latest => {
                        self.dispatch_latest(&event).await?;
                        if let Some(hook) = &mut self.callbacks.on_latest_state_update {
                            hook(&event);
                        }
                        if event.game_state.is_game_over() {
                            // Terminal result: success, stop the stream.
                            let _ = self.stop.send(true);
                        }
                    }
                    EventKind::Informational => {
                        self.session
                            .record_prestart(event.game_state.clone(), event.last_shot);
                        if let Some(hook) = &mut self.callbacks.on_state_update {
                            hook(&event);
                        }
                    }
                }
                Ok(())
            }
        }
    }

    async fn dispatch_latest(&mut self, event: &StateUpdateEventData) -> Result<(), ClientError> {
        let state = &event.game_state;

        if state.is_game_over() {
            if self.session.mark_game_over() {
                info!("match is over");
                self.engine.on_game_over(state).await;
            }
            return Ok(());
        }

        if self.session.mark_first_update() {
            let history = self.session.take_prestart();
            debug!(history_len = history.len(), "first authoritative update");
            self.engine.on_game_start(self.session.team, history).await;
        }

        if event.total_shot_number == 0 {
            self.next_end(event).await?;
        }

        if event.next_shot_team == self.session.team {
            debug!(end = state.end, shot = state.shot, "taking turn");
            let player = self.adapter.player_for_shot(state.shot);
            match self
                .engine
                .on_my_turn(player, state, event.last_shot.as_ref())
                .await
            {
                Move::Shot(shot) => self.post_shot(shot).await?,
                // The protocol has no wire representation for concession.
                Move::Concede => debug!("engine conceded, not transmitted"),
            }
        } else {
            self.engine
                .on_opponent_turn(state, event.last_shot.as_ref())
                .await;
        }

        Ok(())
    }

    async fn next_end(&mut self, event: &StateUpdateEventData) -> Result<(), ClientError> {
        if self.rule_type == GameRuleType::MixedDoubles
            && event.next_shot_team == Team::Unassigned
        {
            // End-setup pseudo-event: only the hammer-holding team chooses,
            // and only before anything has been thrown.
            if event.game_state.hammer != self.session.team || event.last_shot.is_some() {
                return Ok(());
            }
            let choice = self.engine.decide_positioned_stone(&event.game_state).await;
            self.post_end_setup(choice.request_name()).await
        } else {
            self.engine.on_next_end(&event.game_state).await;
            Ok(())
        }
    }

    async fn post_shot(&mut self, shot: Shot) -> Result<(), ClientError> {
        let url = format!("{}/shots", self.base_url);
        // The wire spins the opposite way.
        let body = serde_json::json!({
            "translational_velocity": shot.translational_velocity,
            "angular_velocity": -shot.angular_velocity,
            "shot_angle": shot.release_angle,
        });

        debug!(
            velocity = shot.translational_velocity,
            angle = shot.release_angle,
            "posting shot"
        );
        let response = self
            .http
            .post(&url)
            .query(&[("match_id", self.match_id.as_str())])
            .basic_auth(&self.auth.0, Some(&self.auth.1))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ActionSubmission {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn post_end_setup(&mut self, request: &str) -> Result<(), ClientError> {
        let url = format!("{}/matches/{}/end-setup", self.base_url, self.match_id);

        info!(request, "posting end-setup choice");
        let response = self
            .http
            .post(&url)
            .query(&[("request", request)])
            .basic_auth(&self.auth.0, Some(&self.auth.1))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ActionSubmission {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
