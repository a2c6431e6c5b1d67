use serde::{Deserialize, Serialize};

/// Optional runtime override file served next to the app
pub const APP_CONFIG_FILE: &str = "app-config.json";

const DEFAULT_ADMIN_PASSWORD: &str = match option_env!("MRT_ADMIN_PASSWORD") {
    Some(password) => password,
    None => "12345678",
};

const DEFAULT_GITHUB_OWNER: &str = match option_env!("MRT_GITHUB_OWNER") {
    Some(owner) => owner,
    None => "Owais5514",
};

const DEFAULT_GITHUB_REPO: &str = match option_env!("MRT_GITHUB_REPO") {
    Some(repo) => repo,
    None => "Dhaka-MRT-Timetable",
};

const DEFAULT_FEEDBACK_ENDPOINT: &str = match option_env!("MRT_FEEDBACK_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "https://send.pageclip.co/owais5514-dhaka-mrt-timetable/request-form",
};

/// Runtime settings for the viewer
///
/// Every field falls back to its compile-time default when absent from
/// `app-config.json`, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where timetables, the verification file and fallback holidays are
    /// served from; empty means the page's own origin
    pub data_base_url: String,
    /// Shared string unlocking the admin panel; not a security boundary
    pub admin_password: String,
    pub github_owner: String,
    pub github_repo: String,
    pub feedback_endpoint: String,
    pub holiday_api_base: String,
    pub holiday_country: String,
    /// Bundled holiday list, `{year}` is substituted
    pub fallback_holidays: String,
    pub verified_refresh_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_base_url: String::new(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            github_owner: DEFAULT_GITHUB_OWNER.to_string(),
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
            feedback_endpoint: DEFAULT_FEEDBACK_ENDPOINT.to_string(),
            holiday_api_base: "https://date.nager.at/api/v3/PublicHolidays".to_string(),
            holiday_country: "BD".to_string(),
            fallback_holidays: "holidays-{year}.json".to_string(),
            verified_refresh_interval_ms: 300_000,
        }
    }
}

impl AppConfig {
    /// Parse an override file on top of the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not a JSON object of known field types
    pub fn from_json(json: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse app config: {e}"))?;
        if !value.is_object() {
            return Err("Failed to parse app config: expected a JSON object".to_string());
        }
        serde_json::from_value(value).map_err(|e| format!("Failed to parse app config: {e}"))
    }

    /// Use `origin` for data when no base URL is configured
    #[must_use]
    pub fn with_origin(mut self, origin: &str) -> Self {
        if self.data_base_url.is_empty() {
            self.data_base_url = origin.to_string();
        }
        self
    }

    /// URL of a data file served with the app
    #[must_use]
    pub fn data_url(&self, file: &str) -> String {
        let base = self.data_base_url.trim_end_matches('/');
        if base.is_empty() {
            format!("/{file}")
        } else {
            format!("{base}/{file}")
        }
    }

    #[must_use]
    pub fn holiday_api_url(&self, year: i32) -> String {
        format!(
            "{}/{year}/{}",
            self.holiday_api_base.trim_end_matches('/'),
            self.holiday_country
        )
    }

    #[must_use]
    pub fn fallback_holidays_url(&self, year: i32) -> String {
        self.data_url(&self.fallback_holidays.replace("{year}", &year.to_string()))
    }

    /// Repository dispatch endpoint that updates the verification file
    #[must_use]
    pub fn dispatch_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/dispatches",
            self.github_owner, self.github_repo
        )
    }

    #[must_use]
    pub fn check_admin_password(&self, input: &str) -> bool {
        input == self.admin_password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"admin_password": "letmein", "holiday_country": "IN"}"#)
            .expect("valid config");
        assert_eq!(config.admin_password, "letmein");
        assert_eq!(config.holiday_country, "IN");
        assert_eq!(config.github_repo, AppConfig::default().github_repo);
        assert_eq!(config.verified_refresh_interval_ms, 300_000);
    }

    #[test]
    fn test_malformed_override_is_an_error() {
        assert!(AppConfig::from_json(r#"{"verified_refresh_interval_ms": "soon"}"#).is_err());
        assert!(AppConfig::from_json("[]").is_err());
        assert!(AppConfig::from_json("null").is_err());
        assert!(AppConfig::from_json("\"admin\"").is_err());
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        assert_eq!(AppConfig::from_json("{}").expect("valid config"), AppConfig::default());
    }

    #[test]
    fn test_urls() {
        let config = AppConfig::default().with_origin("https://mrt.example.com/");
        assert_eq!(config.data_url("mrt-6.json"), "https://mrt.example.com/mrt-6.json");
        assert_eq!(
            config.fallback_holidays_url(2025),
            "https://mrt.example.com/holidays-2025.json"
        );
        assert_eq!(
            config.holiday_api_url(2025),
            "https://date.nager.at/api/v3/PublicHolidays/2025/BD"
        );
        assert_eq!(
            config.dispatch_url(),
            format!("https://api.github.com/repos/{}/{}/dispatches", config.github_owner, config.github_repo)
        );
    }

    #[test]
    fn test_configured_base_wins_over_origin() {
        let config = AppConfig {
            data_base_url: "https://cdn.example.com/data".to_string(),
            ..AppConfig::default()
        }
        .with_origin("https://mrt.example.com");
        assert_eq!(config.data_url("verified-times.json"), "https://cdn.example.com/data/verified-times.json");
    }

    #[test]
    fn test_relative_data_url_without_origin() {
        assert_eq!(AppConfig::default().data_url("mrt-6-sat.json"), "/mrt-6-sat.json");
    }

    #[test]
    fn test_admin_password() {
        let config = AppConfig {
            admin_password: "12345678".to_string(),
            ..AppConfig::default()
        };
        assert!(config.check_admin_password("12345678"));
        assert!(!config.check_admin_password("1234567"));
    }
}
