use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub environment: String,
    pub json_logs: bool,
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(
        default_service_name: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let service_name =
            lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| default_service_name.to_string());
        let environment = lookup("DEPLOYMENT_ENV").unwrap_or_else(|| "dev".into());
        let json_logs = lookup("LOG_FORMAT")
            .map(|v| !matches!(v.to_lowercase().as_str(), "text" | "pretty" | "plain"))
            .unwrap_or(true);
        let default_filter = lookup("LOG_LEVEL").unwrap_or_else(|| "info".into());

        Self {
            service_name,
            environment,
            json_logs,
            default_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_json_logs() {
        let cfg = TelemetryConfig::from_lookup("messenger-bot", |_| None);
        assert_eq!(cfg.service_name, "messenger-bot");
        assert_eq!(cfg.environment, "dev");
        assert!(cfg.json_logs);
        assert_eq!(cfg.default_filter, "info");
    }

    #[test]
    fn text_format_disables_json() {
        let vars: HashMap<&str, &str> = [("LOG_FORMAT", "Pretty"), ("OTEL_SERVICE_NAME", "bot")]
            .into_iter()
            .collect();
        let cfg = TelemetryConfig::from_lookup("messenger-bot", |k| {
            vars.get(k).map(|v| v.to_string())
        });
        assert!(!cfg.json_logs);
        assert_eq!(cfg.service_name, "bot");
    }
}
