use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub app: Option<AppConfig>,
    pub supabase: Option<SupabaseConfig>,
    pub railway: Option<RailwayConfig>,
    pub webhooks: Option<WebhooksConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            app: Some(AppConfig::default()),
            supabase: Some(SupabaseConfig::default()),
            railway: Some(RailwayConfig::default()),
            webhooks: Some(WebhooksConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Where the onboarding frontend lives; external redirects return there.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    /// Public anon key; row-level security limits what it can read.
    pub anon_key: Option<String>,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "https://zprsisdofgrlsgcmtlgj-rr-us-east-1-jkjqy.supabase.co".to_string(),
            anon_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RailwayConfig {
    pub cronofy_auth_base: String,
    pub linkedin_import_base: String,
}

impl Default for RailwayConfig {
    fn default() -> Self {
        Self {
            cronofy_auth_base:
                "https://boardy-server-v36-production.up.railway.app/api/cronofy/auth".to_string(),
            linkedin_import_base:
                "https://boardy-server-v36-production.up.railway.app/relationship/import/linkedin"
                    .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhooksConfig {
    pub team_lookup_url: String,
    pub team_join_url: String,
    pub pro_status_url: String,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            team_lookup_url: "https://hook.us1.make.com/g87troduox4zhgp2fu8x9envk628hpd6"
                .to_string(),
            team_join_url: "https://hook.us1.make.com/cpph5cd694479su4mdho8wju163tau6e"
                .to_string(),
            pro_status_url: "https://hook.us1.make.com/1hafbx8w1vqw5koxa6bslbsjw2sdadic"
                .to_string(),
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3000"]

[app]
# Origin of the onboarding frontend; calendar-auth redirects return here
base_url = "http://localhost:3000"

[supabase]
url = "https://zprsisdofgrlsgcmtlgj-rr-us-east-1-jkjqy.supabase.co"
# anon_key = "YOUR_PUBLIC_ANON_KEY"

[railway]
cronofy_auth_base = "https://boardy-server-v36-production.up.railway.app/api/cronofy/auth"
linkedin_import_base = "https://boardy-server-v36-production.up.railway.app/relationship/import/linkedin"

[webhooks]
team_lookup_url = "https://hook.us1.make.com/g87troduox4zhgp2fu8x9envk628hpd6"
team_join_url = "https://hook.us1.make.com/cpph5cd694479su4mdho8wju163tau6e"
pro_status_url = "https://hook.us1.make.com/1hafbx8w1vqw5koxa6bslbsjw2sdadic"
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("boardy").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
