use crate::config::{AppConfig, APP_CONFIG_FILE};
use crate::{log, log_warn};
use super::fetch_text;

/// Load `app-config.json` from `origin`, falling back to built-in defaults
pub async fn load_app_config(origin: &str) -> AppConfig {
    let url = AppConfig::default().with_origin(origin).data_url(APP_CONFIG_FILE);
    let config = match fetch_text(&url).await.and_then(|json| AppConfig::from_json(&json)) {
        Ok(config) => {
            log!("Loaded {APP_CONFIG_FILE}");
            config
        }
        Err(e) => {
            log_warn!("Using default app config: {e}");
            AppConfig::default()
        }
    };
    config.with_origin(origin)
}
