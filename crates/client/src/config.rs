/// Endpoints of the reference deployment.
pub const DEFAULT_API_BASE: &str = "https://trans.ella-peeters.me";
pub const DEFAULT_WS_URL: &str = "wss://trans.ella-peeters.me/ws";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub ws_url: String,
    /// Capacity of the bounded server-event channel between the transport
    /// task and the session driver.
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            ws_url: DEFAULT_WS_URL.to_owned(),
            event_channel_capacity: 256,
        }
    }
}
