use std::collections::HashMap;
use std::ffi::OsString;

use crate::errors::{ApprovalError, Result};

pub const URL: &str = "URL";
pub const API_TOKEN: &str = "API_TOKEN";
pub const APPROVERS: &str = "APPROVERS";
pub const INSTRUCTIONS: &str = "INSTRUCTIONS";
pub const DISALLOW_LAUNCHED_BY_USER: &str = "DISALLOW_LAUNCHED_BY_USER";
pub const NOTIFY_ALL_ELIGIBLE_USERS: &str = "NOTIFY_ALL_ELIGIBLE_USERS";
pub const PAYLOAD: &str = "PAYLOAD";
pub const CANCELLATION_REASON: &str = "CANCELLATION_REASON";
pub const CLOUDBEES_STATUS: &str = "CLOUDBEES_STATUS";
pub const DEBUG: &str = "DEBUG";
pub const RUST_LOG: &str = "RUST_LOG";

/// Snapshot of the string environment a handler runs against.
///
/// Empty values are treated the same as unset ones, which is how the
/// pipeline passes "not configured" through.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Capture the process environment, after loading `.env` if one exists.
    pub fn from_process() -> Self {
        dotenvy::dotenv().ok();
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build a snapshot from raw OS pairs. Entries that are not valid
    /// Unicode are skipped; none of the variables the step reads can be one.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &'static str) -> Result<&str> {
        self.get(name).ok_or(ApprovalError::MissingEnv(name))
    }

    /// Optional boolean, `false` when unset. Anything other than
    /// `true`/`false` is an error.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            None => Ok(false),
            Some(raw) => raw.parse::<bool>().map_err(|e| {
                tracing::debug!(variable = name, value = raw, "invalid boolean value");
                ApprovalError::from(e)
            }),
        }
    }

    /// Comma-separated list; blank entries are dropped.
    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .get(name)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        (!items.is_empty()).then_some(items)
    }

    pub fn debug_enabled(&self) -> bool {
        self.get(DEBUG) == Some("true")
    }
}

/// Log filter for the binary: `RUST_LOG` if set, otherwise debug or info
/// depending on `DEBUG`.
pub fn default_filter(env: &Env) -> String {
    match env.get(RUST_LOG) {
        Some(filter) => filter.to_string(),
        None if env.debug_enabled() => "manual_approval=debug".to_string(),
        None => "manual_approval=info".to_string(),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Platform API coordinates, resolved right before a request is sent.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl ApiConfig {
    pub fn from_env(env: &Env) -> Result<Self> {
        tracing::debug!("Reading API configuration from the environment");
        let base_url = env.require(URL)?.to_string();
        let token = env.require(API_TOKEN)?.to_string();
        Ok(Self { base_url, token })
    }
}
