// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Policy text retrieval.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http;

/// Source of policy documents.
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// Fetch the policy text published at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches policies with a plain HTTP GET.
///
/// Loopback URLs go through a client that ignores proxy settings; every
/// other URL honours them.
#[derive(Debug, Clone)]
pub struct HttpPolicySource {
    proxied: reqwest::Client,
    direct: reqwest::Client,
}

impl HttpPolicySource {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            proxied: http::client(timeout, false)?,
            direct: http::client(timeout, true)?,
        })
    }

    fn client_for(&self, url: &str) -> &reqwest::Client {
        if http::is_loopback_url(url) {
            &self.direct
        } else {
            &self.proxied
        }
    }
}

#[async_trait]
impl PolicySource for HttpPolicySource {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("fetching policy from {}", url);
        let response = self.client_for(url).get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
