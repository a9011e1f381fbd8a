use std::env;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub linkedin: LinkedInConfig,
}

#[derive(Debug, Clone)]
pub struct LinkedInConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    /// Base URL for browser-facing authorization and token endpoints.
    pub auth_base: String,
    /// Base URL for the profile/email REST API.
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/laddr.db".to_string()),
            port,
            linkedin: LinkedInConfig {
                client_id: env::var("LINKEDIN_CLIENT_ID").ok(),
                client_secret: env::var("LINKEDIN_CLIENT_SECRET").ok(),
                redirect_uri: env::var("LINKEDIN_REDIRECT_URI")
                    .unwrap_or_else(|_| "http://localhost:3000/auth/linkedin/callback".to_string()),
                auth_base: env::var("LINKEDIN_AUTH_BASE")
                    .unwrap_or_else(|_| "https://www.linkedin.com".to_string()),
                api_base: env::var("LINKEDIN_API_BASE")
                    .unwrap_or_else(|_| "https://api.linkedin.com".to_string()),
            },
        }
    }
}

impl LinkedInConfig {
    /// A configuration with no client credentials, for tests and local
    /// setups that only use email login.
    pub fn disabled() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: "http://localhost:3000/auth/linkedin/callback".to_string(),
            auth_base: "https://www.linkedin.com".to_string(),
            api_base: "https://api.linkedin.com".to_string(),
        }
    }
}
