//! Model parameters and environment-driven service settings.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for model requests.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier sent to the service.
    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

impl LlmConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

/// Service settings resolved from the process environment.
///
/// | Variable | Meaning | Default |
/// |----------|---------|---------|
/// | `ANTHROPIC_API_KEY` | service credential | none (calls fail fast) |
/// | `ANTHROPIC_BASE_URL` | service root URL | `https://api.anthropic.com` |
/// | `TRIP_PLANNER_MODEL` | model identifier | `claude-3-5-sonnet-latest` |
/// | `TRIP_PLANNER_TIMEOUT_SECS` | per-call deadline | `120` |
#[derive(Clone)]
pub struct PlannerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub llm: LlmConfig,
    pub timeout: Duration,
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut llm = LlmConfig::default();
        if let Some(model) = non_empty("TRIP_PLANNER_MODEL") {
            llm = llm.with_model(model);
        }

        let timeout = non_empty("TRIP_PLANNER_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            api_key: non_empty("ANTHROPIC_API_KEY"),
            base_url: non_empty("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm,
            timeout,
        }
    }
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("llm", &self.llm)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 4000);
    }

    #[test]
    fn test_llm_config_builder() {
        let config = LlmConfig::default()
            .with_model("claude-test")
            .with_temperature(0.2)
            .with_max_tokens(1024);
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = PlannerConfig::from_lookup(|_| None);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_BASE_URL", "http://localhost:9999"),
            ("TRIP_PLANNER_MODEL", "claude-other"),
            ("TRIP_PLANNER_TIMEOUT_SECS", "15"),
        ]);
        let config = PlannerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.llm.model, "claude-other");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_blank_key_treated_as_missing() {
        let config = PlannerConfig::from_lookup(|k| (k == "ANTHROPIC_API_KEY").then(|| "  ".to_string()));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_debug_hides_key() {
        let config = PlannerConfig::from_lookup(|k| (k == "ANTHROPIC_API_KEY").then(|| "sk-secret".to_string()));
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
