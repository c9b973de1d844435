use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDB API key; movie search is unavailable without it
    pub omdb_api_key: Option<String>,

    /// OMDB API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Open Library API base URL
    #[serde(default = "default_open_library_url")]
    pub open_library_url: String,

    /// Supabase project URL; together with the key it switches the
    /// library store from local JSON files to the remote table
    pub supabase_url: Option<String>,

    /// Supabase service key
    pub supabase_key: Option<String>,

    /// Directory for the local JSON store (defaults to ~/.media-tracker)
    pub media_tracker_data_dir: Option<PathBuf>,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_open_library_url() -> String {
    "https://openlibrary.org".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Resolved data directory for the local JSON store
    pub fn data_dir(&self) -> PathBuf {
        self.media_tracker_data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".media-tracker")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> Config {
        Config {
            omdb_api_key: None,
            omdb_api_url: default_omdb_api_url(),
            open_library_url: default_open_library_url(),
            supabase_url: None,
            supabase_key: None,
            media_tracker_data_dir: None,
        }
    }

    #[test]
    fn test_default_data_dir_is_home_relative() {
        let config = empty_config();
        assert!(config.data_dir().ends_with(".media-tracker"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = empty_config();
        config.media_tracker_data_dir = Some(PathBuf::from("/tmp/media"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/media"));
    }
}
