//! Client construction: scheme resolution, descriptor fetch, capability
//! check, and engine initialization.

use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::client::GameClient;
use crate::client::variant::VariantAdapter;
use crate::engine::{FactoryCreator, PlayerFactory, ThinkingEngine};
use crate::error::ClientError;
use crate::protocol::MatchInfo;

/// Connect timeout of the descriptor probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds a [`GameClient`] for a match.
pub struct ClientFactory;

impl ClientFactory {
    /// Fetches the match descriptor, verifies the engine can play the
    /// match's rule variant, initializes the engine, and returns the client.
    #[instrument(skip(engine, factories))]
    pub async fn create_client(
        host: &str,
        match_id: &str,
        mut engine: Box<dyn ThinkingEngine>,
        factories: Box<dyn FactoryCreator>,
    ) -> Result<GameClient, ClientError> {
        let probe = reqwest::Client::builder()
            .connect_timeout(PROBE_TIMEOUT)
            .build()?;

        let mut last_err: Option<ClientError> = None;
        let mut resolved = None;
        for base in candidate_urls(host)? {
            let url = format!("{base}/matches/{match_id}");
            match probe.get(&url).send().await {
                Ok(response) => {
                    resolved = Some((base, response));
                    break;
                }
                Err(err) => {
                    debug!(url = %url, error = %err, "descriptor probe failed");
                    last_err = Some(err.into());
                }
            }
        }
        let (base, response) = resolved.ok_or_else(|| {
            last_err.unwrap_or_else(|| ClientError::Transport {
                message: format!("no reachable scheme for host {host}"),
            })
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::unexpected(status.as_u16(), body));
        }
        let match_info = MatchInfo::from_json(&body)?;

        let rule_type = match_info.rule.rule_type;
        if !engine.supports(rule_type) {
            return Err(ClientError::CapabilityMismatch {
                expected: rule_type,
            });
        }

        let players: Vec<Box<dyn PlayerFactory>> = match_info
            .players
            .iter()
            .map(|config| factories.create_player_factory(config))
            .collect::<Result<_, _>>()?;
        let simulator = factories.create_simulator_factory(&match_info.simulator)?;

        let throw_order = engine.on_init(
            &match_info.rule,
            &match_info.setting,
            simulator,
            &players,
        )?;
        let adapter = VariantAdapter::new(rule_type, players, throw_order)?;

        info!(
            host = %base,
            match_name = %match_info.name,
            rule = %rule_type,
            engine = engine.name(),
            "client created"
        );
        GameClient::new(base, match_id.to_string(), match_info, engine, adapter)
    }
}

/// Base URLs to probe, in priority order.
fn candidate_urls(host: &str) -> Result<Vec<String>, ClientError> {
    let host = host.trim_end_matches('/');
    if let Some((scheme, _)) = host.split_once("://") {
        match scheme {
            "http" | "https" => Ok(vec![host.to_string()]),
            other => Err(ClientError::config(format!("invalid URL scheme: {other}"))),
        }
    } else {
        Ok(vec![format!("https://{host}"), format!("http://{host}")])
    }
}
