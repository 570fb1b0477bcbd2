//! Routing-number to bank-name lookup.
//!
//! Every edit of the routing-number field bumps a generation counter. A lookup
//! is only issued for a complete (9 character) value, and its response is only
//! applied while its generation is still the latest; a newer edit cancels the
//! in-flight request outright.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::forms::ROUTING_NUMBER_LEN;
use crate::http_client::ApiHttpClient;
use crate::util::Result;

pub const INVALID_ROUTING_NUMBER: &str = "Invalid routing number";
pub const ROUTING_LOOKUP_FAILED: &str = "Error checking routing number";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingNumberResponse {
    pub code: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct RoutingLookupClient {
    http: ApiHttpClient,
}

impl RoutingLookupClient {
    pub fn new(http: ApiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ApiHttpClient::new(
            &config.routing.base_url,
            config.api.request_timeout(),
            config.api.connect_timeout(),
        ))
    }

    pub async fn lookup(&self, routing_number: &str) -> Result<RoutingNumberResponse> {
        self.http
            .get_json("", &[("rn", routing_number.to_string())])
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    routing_number: String,
}

impl LookupTicket {
    pub fn routing_number(&self) -> &str {
        &self.routing_number
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Resolved { bank_name: String },
    Invalid,
    Failed,
    /// A newer edit arrived before this lookup finished; nothing to apply.
    Superseded,
}

impl LookupOutcome {
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            LookupOutcome::Invalid => Some(INVALID_ROUTING_NUMBER),
            LookupOutcome::Failed => Some(ROUTING_LOOKUP_FAILED),
            LookupOutcome::Resolved { .. } | LookupOutcome::Superseded => None,
        }
    }
}

#[derive(Clone)]
pub struct RoutingNumberLookup {
    client: RoutingLookupClient,
    generation: Arc<watch::Sender<u64>>,
}

impl RoutingNumberLookup {
    pub fn new(client: RoutingLookupClient) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            client,
            generation: Arc::new(generation),
        }
    }

    /// Record an edit of the routing-number field. Returns a ticket when the
    /// value is complete and should be looked up.
    pub fn observe(&self, value: &str) -> Option<LookupTicket> {
        self.generation.send_modify(|g| *g += 1);
        let generation = *self.generation.borrow();

        (value.chars().count() == ROUTING_NUMBER_LEN).then(|| LookupTicket {
            generation,
            routing_number: value.to_string(),
        })
    }

    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        *self.generation.borrow() == ticket.generation
    }

    pub async fn resolve(&self, ticket: &LookupTicket) -> LookupOutcome {
        let mut updates = self.generation.subscribe();
        if *updates.borrow_and_update() != ticket.generation {
            return LookupOutcome::Superseded;
        }

        log::debug!("looking up routing number {}", ticket.routing_number);
        let result = tokio::select! {
            result = self.client.lookup(&ticket.routing_number) => result,
            _ = wait_until_superseded(&mut updates, ticket.generation) => {
                log::debug!("routing lookup for {} cancelled by newer input", ticket.routing_number);
                return LookupOutcome::Superseded;
            }
        };

        if !self.is_current(ticket) {
            return LookupOutcome::Superseded;
        }

        match result {
            Ok(response) => classify(response),
            Err(e) => {
                log::warn!("routing lookup failed: {}", e);
                LookupOutcome::Failed
            }
        }
    }
}

fn classify(response: RoutingNumberResponse) -> LookupOutcome {
    match response.customer_name {
        Some(name) if response.code == 200 && !name.is_empty() => {
            LookupOutcome::Resolved { bank_name: name }
        }
        _ => LookupOutcome::Invalid,
    }
}

async fn wait_until_superseded(updates: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if updates.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        if *updates.borrow_and_update() != generation {
            return;
        }
    }
}
