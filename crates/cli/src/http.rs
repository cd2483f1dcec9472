// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared HTTP client construction.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::Result;

/// Whether a URL's host is `localhost` or a loopback address.
///
/// Unparseable URLs are not loopback.
pub fn is_loopback_url(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

/// Build a client with an optional overall request timeout.
///
/// With `no_proxy`, proxies from the environment are bypassed.
pub fn client(timeout: Option<Duration>, no_proxy: bool) -> Result<Client> {
    let mut builder =
        Client::builder().user_agent(concat!("privacy-gate/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if no_proxy {
        builder = builder.no_proxy();
    }
    Ok(builder.build()?)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
