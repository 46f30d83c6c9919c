use crate::constants::*;

/// Runtime configuration for the visualizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// WebSocket endpoint the workflow events arrive on
    pub ws_url: String,
    /// Delay before reconnecting after the socket closed
    pub reconnect_delay_ms: u32,
    /// Delay before reopening after a user-triggered reconnect
    pub manual_reconnect_delay_ms: u32,
    /// Quiet period after the last resize signal before relayout
    pub resize_debounce_ms: u32,
    /// Per-index delay of the node entrance transition
    pub entrance_stagger_ms: u32,
    /// Delay before the workflow info panel fades in
    pub summary_reveal_delay_ms: u32,
}

impl Default for VisualizerConfig {
    /// Points at the local workflow server.  A build-time `WORKFLOW_WS_URL`
    /// replaces the endpoint for deployments that serve the socket elsewhere.
    fn default() -> Self {
        let ws_url = option_env!("WORKFLOW_WS_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());

        Self {
            ws_url,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            manual_reconnect_delay_ms: MANUAL_RECONNECT_DELAY_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            entrance_stagger_ms: ENTRANCE_STAGGER_MS,
            summary_reveal_delay_ms: SUMMARY_REVEAL_DELAY_MS,
        }
    }
}

impl VisualizerConfig {
    /// Default configuration with a different WebSocket endpoint.
    pub fn with_ws_url(url: &str) -> Self {
        Self {
            ws_url: url.trim().to_string(),
            ..Self::default()
        }
    }

    /// Apply overrides from a page query string (`?ws=...`).  The value is
    /// passed through `decode` so the browser can undo percent-encoding.
    pub fn apply_query<F>(&mut self, search: &str, decode: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = query_param(search, "ws") {
            match decode(raw) {
                Some(url) if url.starts_with("ws://") || url.starts_with("wss://") => {
                    self.ws_url = url;
                }
                Some(url) => {
                    crate::console_warn!("Ignoring ws override without ws:// or wss:// scheme: {}", url);
                }
                None => {
                    crate::console_warn!("Ignoring undecodable ws override: {}", raw);
                }
            }
        }
    }
}

/// Look up a single raw (still encoded) value in a `?a=1&b=2` query string.
pub fn query_param<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
