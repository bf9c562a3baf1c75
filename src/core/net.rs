// src/core/net.rs
// Blocking HTTPS GET for the results site.

use std::time::Duration;

use crate::config::consts::{ HTTP_TIMEOUT_SECS, USER_AGENT };
use crate::error::{ Result, SyncError };

pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
}

pub fn http_get(agent: &ureq::Agent, url: &str) -> Result<String> {
    logd!("GET {url}");
    let http_err = |message: String| SyncError::Http { url: s!(url), message };
    let response = agent.get(url).call().map_err(|e| http_err(e.to_string()))?;
    response.into_string().map_err(|e| http_err(e.to_string()))
}
