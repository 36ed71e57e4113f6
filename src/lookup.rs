//! HDI id to module id resolution.
//!
//! Gluing logs only carry HDI and BBM ids. The module id is scraped from the
//! HDI summary page of the production database. Any failure degrades to an
//! absent id; nothing is retried.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::LookupError;

/// Default HDI summary endpoint, queried with `?name=<hdi id>`
pub const DEFAULT_LOOKUP_URL: &str =
    "http://inky.physics.purdue.edu/cmsfpix//Submission_p/summary/hdi.php";

/// User agent for lookup requests
const USER_AGENT: &str = concat!("potlog/", env!("CARGO_PKG_VERSION"));

/// Resolves the module id an HDI has been assembled into
pub trait ModuleIdResolver {
    fn resolve(&self, hdi_id: &str) -> Option<String>;
}

/// Resolver that never finds an id, for offline runs
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLookup;

impl ModuleIdResolver for NoLookup {
    fn resolve(&self, _hdi_id: &str) -> Option<String> {
        None
    }
}

fn module_id_regex() -> &'static Regex {
    static MODULE_ID: OnceLock<Regex> = OnceLock::new();
    MODULE_ID.get_or_init(|| Regex::new(r"M-.-.-..?").expect("Failed to compile module id regex"))
}

/// First `M-x-x-xx` token in a page body
pub fn extract_module_id(body: &str) -> Option<String> {
    module_id_regex().find(body).map(|m| m.as_str().to_string())
}

/// HTTP resolver against the HDI summary page
#[derive(Clone, Debug)]
pub struct HdiLookup {
    base_url: String,
}

impl Default for HdiLookup {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

impl HdiLookup {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the summary page body for an HDI
    pub fn fetch_summary(&self, hdi_id: &str) -> Result<String, LookupError> {
        let mut response = ureq::get(&self.base_url)
            .query("name", hdi_id)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => LookupError::Status(status),
                _ => LookupError::Network(e.to_string()),
            })?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| LookupError::Body(e.to_string()))
    }

    pub fn lookup(&self, hdi_id: &str) -> Result<String, LookupError> {
        let body = self.fetch_summary(hdi_id)?;
        extract_module_id(&body).ok_or_else(|| LookupError::NoMatch(hdi_id.to_string()))
    }
}

impl ModuleIdResolver for HdiLookup {
    fn resolve(&self, hdi_id: &str) -> Option<String> {
        match self.lookup(hdi_id) {
            Ok(id) => {
                tracing::debug!("Resolved HDI {} to {}", hdi_id, id);
                Some(id)
            }
            Err(e @ LookupError::NoMatch(_)) => {
                tracing::debug!("{}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Module id lookup for HDI {} failed: {}", hdi_id, e);
                None
            }
        }
    }
}
