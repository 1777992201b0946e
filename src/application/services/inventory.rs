//! CED inventory service
//!
//! Queries the inventory endpoint and unwraps the CED response envelope.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::application::services::type_tree::{type_tree_url, TypeTree};
use crate::application::{ApplicationError, ApplicationResult, InventoryQuery};
use crate::config::Settings;
use crate::infrastructure::traits::Fetcher;
use crate::infrastructure::InfraError;

/// Path of the inventory endpoint on the CED web server.
pub const INVENTORY_PATH: &str = "/inventory";

/// Status value of a successful CED response.
const STAT_OK: &str = "ok";

/// One inventory element as returned by the CED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Fields not modelled above (ids, dates, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    stat: String,
    #[serde(rename = "Inventory")]
    inventory: Option<Inventory>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Inventory {
    #[serde(default)]
    elements: Vec<Element>,
}

/// Client for one CED catalog and workspace.
pub struct CedClient {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    catalog: String,
    workspace: String,
    verify: bool,
}

impl CedClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &Settings) -> Self {
        Self {
            fetcher,
            base_url: settings.base_url(),
            catalog: settings.catalog.clone(),
            workspace: settings.workspace.clone(),
            verify: settings.verify,
        }
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn inventory_url(&self) -> String {
        format!("{}{}", self.base_url, INVENTORY_PATH)
    }

    /// Unpopulated type hierarchy on the same server.
    pub fn type_tree(&self) -> TypeTree {
        TypeTree::new(
            Arc::clone(&self.fetcher),
            type_tree_url(&self.base_url),
            self.verify,
        )
    }

    /// Run an inventory query and return the matching elements.
    ///
    /// A response whose `stat` is not `"ok"` fails with the server message.
    #[instrument(level = "debug", skip(self))]
    pub fn query_inventory(&self, query: &InventoryQuery) -> ApplicationResult<Vec<Element>> {
        let url = self.inventory_url();
        let params = query.to_params(&self.catalog, &self.workspace);
        debug!("query_inventory: {} params", params.len());

        let document = self
            .fetcher
            .get_json(&url, &params, self.verify)
            .inspect_err(|e| {
                if let InfraError::Decode { url, .. } = e {
                    warn!(
                        "Invalid JSON response. Check request parameters and try again. url: {}",
                        url
                    );
                }
            })?;

        let envelope: Envelope = serde_json::from_value(document).map_err(|source| {
            warn!("Unexpected CED response shape from {}", url);
            InfraError::Decode {
                url: url.clone(),
                source,
            }
        })?;

        if envelope.stat != STAT_OK {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("stat={}", envelope.stat));
            warn!("CED reported failure: {} (url: {})", message, url);
            return Err(ApplicationError::Service { message, url });
        }

        let elements = envelope
            .inventory
            .ok_or_else(|| ApplicationError::Service {
                message: "response has no Inventory section".into(),
                url: url.clone(),
            })?
            .elements;
        debug!("query_inventory: {} elements", elements.len());
        Ok(elements)
    }
}
