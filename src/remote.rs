// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote copy of the ledger, one document per user, last write wins.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::{RemoteConfig, Session};
use crate::models::Document;

const UA: &str = concat!("monthbook/", env!("CARGO_PKG_VERSION"));

pub trait RemoteStore: Send + Sync {
    /// The user's stored document, if one exists.
    fn fetch(&self, user_id: &str) -> Result<Option<Document>>;
    /// Inserts or replaces the user's document.
    fn upsert(&self, user_id: &str, doc: &Document) -> Result<()>;
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// A PostgREST table with `user_id` and `state` columns.
pub struct HttpRemoteStore {
    client: reqwest::blocking::Client,
    config: RemoteConfig,
    token: String,
}

#[derive(Debug, Deserialize)]
struct StateRow {
    #[serde(default)]
    state: Value,
}

impl HttpRemoteStore {
    pub fn new(config: RemoteConfig, session: &Session) -> Result<Self> {
        let token = if session.token.is_empty() {
            config.api_key.clone()
        } else {
            session.token.clone()
        };
        Ok(Self {
            client: http_client()?,
            config,
            token,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    fn authed(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .bearer_auth(&self.token)
    }
}

impl RemoteStore for HttpRemoteStore {
    fn fetch(&self, user_id: &str) -> Result<Option<Document>> {
        let filter = format!("eq.{}", user_id);
        let resp = self
            .authed(self.client.get(self.endpoint()))
            .query(&[("select", "state"), ("user_id", filter.as_str())])
            .send()
            .with_context(|| format!("Fetch ledger from {}", self.config.url))?
            .error_for_status()?;
        let rows: Vec<StateRow> = resp.json().context("Decode remote ledger")?;
        Ok(rows
            .into_iter()
            .next()
            .filter(|r| !r.state.is_null())
            .map(|r| Document::from_value(r.state)))
    }

    fn upsert(&self, user_id: &str, doc: &Document) -> Result<()> {
        let body = json!({
            "user_id": user_id,
            "state": doc,
            "updated_at": chrono::Utc::now().to_rfc3339(),
        });
        self.authed(self.client.post(self.endpoint()))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&body)
            .send()
            .with_context(|| format!("Upsert ledger to {}", self.config.url))?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_crate_and_version_only() {
        assert_eq!(UA, format!("monthbook/{}", env!("CARGO_PKG_VERSION")));
    }
}
