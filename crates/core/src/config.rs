use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// gemini | openai | noop
    pub provider: String,
    pub name: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                provider: "gemini".to_string(),
                name: "gemini-2.5-flash".to_string(),
                base_url: None,
                api_key_env: "GEMINI_API_KEY".to_string(),
            },
        }
    }
}

/// Defaults, then `config/default` (or `path`), then `DOCQA__*` env vars.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();
    let mut settings = config::Config::builder()
        .set_default("model.provider", defaults.model.provider)?
        .set_default("model.name", defaults.model.name)?
        .set_default("model.api_key_env", defaults.model.api_key_env)?;
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("DOCQA").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
