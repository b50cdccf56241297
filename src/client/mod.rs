//! The match client: join/connect lifecycle, stream tasks, and dispatch.

mod consumer;
mod factory;
mod session;
mod stream;
mod variant;

pub use factory::ClientFactory;

use derive_getters::Getters;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument};

use crate::client::consumer::Consumer;
use crate::client::session::SessionState;
use crate::client::stream::{ErrorSlot, StreamSettings, Streamer};
use crate::client::variant::VariantAdapter;
use crate::engine::ThinkingEngine;
use crate::error::ClientError;
use crate::game::Team;
use crate::protocol::{MatchInfo, StateUpdateEventData};

/// Connect/read timeout for join, action, and descriptor requests. The
/// stream subscription only bounds its connection setup.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Observer hooks invoked from the consumer task during `connect`.
///
/// `on_event_error` may return `true` to keep the stream alive after a
/// per-event processing error; every other error is fatal.
#[derive(Default)]
pub struct ConnectCallbacks {
    /// Called when the stream subscription opens.
    pub on_connected: Option<Box<dyn FnMut() + Send>>,
    /// Called after each authoritative event is dispatched.
    pub on_latest_state_update: Option<Box<dyn FnMut(&StateUpdateEventData) + Send>>,
    /// Called after each informational event is recorded.
    pub on_state_update: Option<Box<dyn FnMut(&StateUpdateEventData) + Send>>,
    /// Inspects a per-event error; returning `true` continues processing.
    pub on_event_error: Option<Box<dyn FnMut(&ClientError) -> bool + Send>>,
}

/// Settings of one `connect` call.
pub struct ConnectSettings {
    /// Stream reconnect attempts before giving up.
    pub max_retry_count: u32,
    /// Fixed wait between reconnect attempts.
    pub retry_interval: Duration,
    /// Observer hooks.
    pub callbacks: ConnectCallbacks,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            max_retry_count: 5,
            retry_interval: Duration::from_secs(5),
            callbacks: ConnectCallbacks::default(),
        }
    }
}

struct EngineRuntime {
    engine: Box<dyn ThinkingEngine>,
    adapter: VariantAdapter,
}

/// A client bound to one match.
///
/// Built by [`ClientFactory`]; drive it with [`join`](GameClient::join) once,
/// then [`connect`](GameClient::connect).
#[derive(Getters)]
pub struct GameClient {
    /// Resolved base URL of the server.
    host: String,
    /// Match this client is bound to.
    match_id: String,
    /// The descriptor the client was built from.
    match_info: MatchInfo,
    /// Team assigned by `join`; `Unassigned` until then.
    team: Team,
    #[getter(skip)]
    http: reqwest::Client,
    #[getter(skip)]
    auth: Option<(String, String)>,
    #[getter(skip)]
    runtime: Option<EngineRuntime>,
}

impl GameClient {
    /// Client name reported to the server in the join payload.
    pub fn client_name() -> &'static str {
        env!("CARGO_PKG_NAME")
    }

    /// Client version.
    pub fn client_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub(crate) fn new(
        host: String,
        match_id: String,
        match_info: MatchInfo,
        engine: Box<dyn ThinkingEngine>,
        adapter: VariantAdapter,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            host,
            match_id,
            match_info,
            team: Team::Unassigned,
            http,
            auth: None,
            runtime: Some(EngineRuntime { engine, adapter }),
        })
    }

    /// Registers this client's team configuration with the server.
    ///
    /// Must be called exactly once, before [`connect`](GameClient::connect).
    /// Returns the team the server assigned.
    #[instrument(skip(self, auth_pw), fields(match_id = %self.match_id, team = %team))]
    pub async fn join(
        &mut self,
        team: Team,
        auth_id: &str,
        auth_pw: &str,
    ) -> Result<Team, ClientError> {
        if !team.is_assigned() {
            return Err(ClientError::config("join requires team0 or team1"));
        }
        if self.team.is_assigned() {
            return Err(ClientError::config("join may only be called once"));
        }
        let order = match &self.runtime {
            Some(runtime) => runtime.adapter.join_slot_order().to_vec(),
            None => return Err(ClientError::config("client is already connected")),
        };

        let payload = self.join_payload(&order)?;
        let url = format!("{}/store-team-config", self.host);
        let team_name = team.to_string();
        let response = self
            .http
            .post(&url)
            .query(&[
                ("match_id", self.match_id.as_str()),
                ("expected_match_team_name", team_name.as_str()),
            ])
            .basic_auth(auth_id, Some(auth_pw))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let assigned = parse_join_response(status, &body)?;

        info!(assigned = %assigned, "joined match");
        self.team = assigned;
        self.auth = Some((auth_id.to_string(), auth_pw.to_string()));
        // The per-slot configs were consumed by the payload above.
        self.match_info.players.clear();
        Ok(assigned)
    }

    fn join_payload(&self, order: &[u8]) -> Result<serde_json::Value, ClientError> {
        let mut payload = serde_json::json!({
            "use_default_config": true,
            "team_name": Self::client_name(),
        });
        for (position, &slot) in order.iter().enumerate() {
            let config = self
                .match_info
                .players
                .get(usize::from(slot))
                .ok_or_else(|| {
                    ClientError::config(format!("no configuration for roster slot {slot}"))
                })?;
            payload[format!("player{}", position + 1)] = serde_json::json!({
                "max_velocity": player_field(config, "max_speed")?,
                "shot_std_dev": player_field(config, "stddev_speed")?,
                "angle_std_dev": player_field(config, "stddev_angle")?,
                "player_name": format!("player{slot}"),
            });
        }
        Ok(payload)
    }

    /// Subscribes to the match event stream and blocks until it terminates.
    ///
    /// Spawns the single consumer task, runs the subscription on the calling
    /// task, drains and joins the consumer on termination, and re-raises any
    /// captured error. A terminal game result terminates successfully.
    #[instrument(skip(self, settings), fields(match_id = %self.match_id))]
    pub async fn connect(&mut self, settings: ConnectSettings) -> Result<(), ClientError> {
        if !self.team.is_assigned() {
            return Err(ClientError::config("connect requires a successful join"));
        }
        let auth = self
            .auth
            .clone()
            .ok_or_else(|| ClientError::config("connect requires a successful join"))?;

        // No whole-request timeout here: the subscription is long-lived.
        let stream_http = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .build()?;

        let runtime = self
            .runtime
            .take()
            .ok_or_else(|| ClientError::config("client is already connected"))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let errors = ErrorSlot::default();

        let consumer = Consumer::new(
            SessionState::new(self.team),
            runtime.engine,
            runtime.adapter,
            self.match_info.rule.rule_type,
            self.match_info.setting.max_end,
            self.http.clone(),
            self.host.clone(),
            self.match_id.clone(),
            auth.clone(),
            stop_tx,
            errors.clone(),
            settings.callbacks,
        );
        let consumer_task = tokio::spawn(consumer.run(rx));

        let streamer = Streamer::new(
            stream_http,
            format!("{}/matches/{}/stream", self.host, self.match_id),
            auth,
            StreamSettings {
                max_retry_count: settings.max_retry_count,
                retry_interval: settings.retry_interval,
            },
            tx,
            stop_rx,
            errors.clone(),
        );
        streamer.run().await;

        // The streamer dropped the sender; the consumer drains what is left.
        let consumer = consumer_task
            .await
            .map_err(|err| ClientError::config(format!("event consumer task failed: {err}")))?;
        let (engine, adapter) = consumer.into_runtime();
        self.runtime = Some(EngineRuntime { engine, adapter });

        match errors.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn player_field(config: &serde_json::Value, key: &str) -> Result<f64, ClientError> {
    config
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| ClientError::config(format!("player configuration is missing {key}")))
}

/// Interprets the team-registration response.
pub(crate) fn parse_join_response(status: u16, body: &str) -> Result<Team, ClientError> {
    match status {
        200 => match body {
            "\"team0\"" => Ok(Team::Team0),
            "\"team1\"" => Ok(Team::Team1),
            _ => Err(ClientError::unexpected(200, body)),
        },
        401 => Err(ClientError::Authentication),
        _ => Err(ClientError::unexpected(status, body)),
    }
}
