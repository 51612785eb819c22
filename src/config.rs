use std::env;

/// Settings for the bridge and its development transport harness.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Address the dev harness listens on for frontend connections.
    pub bind_addr: String,
    /// Per-session message history cap; oldest entries are dropped first.
    pub history_cap: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9229".to_string(),
            history_cap: 1024,
        }
    }
}

impl BridgeConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = env::var("INSPECTOR_BRIDGE_ADDR") {
            config.bind_addr = addr;
        }
        config
    }
}
