use bloodbank_core::BackendSettings;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// Idle time after which the session cookie stops being honoured.
    #[serde(default = "default_inactivity_hours")]
    pub inactivity_hours: i64,
    #[serde(default)]
    pub secure_cookie: bool,
    /// Treat a JWT past its `exp` claim as signed out.
    #[serde(default = "default_enforce_token_expiry")]
    pub enforce_token_expiry: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inactivity_hours: default_inactivity_hours(),
            secure_cookie: false,
            enforce_token_expiry: default_enforce_token_expiry(),
        }
    }
}

fn default_inactivity_hours() -> i64 {
    24
}

fn default_enforce_token_expiry() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint, e.g. `http://tempo:4317`. Empty disables export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_service_name() -> String {
    "bloodbank-frontend".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No working directory: {}", e)))?;

    // Works from the workspace root and from inside the crate
    let configuration_directory = if base_path.ends_with("bloodbank-frontend") {
        base_path.join("config")
    } else {
        base_path.join("bloodbank-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
