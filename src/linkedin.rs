use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::LinkedInConfig;
use crate::error::ApiError;

const SCOPES: &str = "r_liteprofile r_emailaddress";

/// OAuth client for the LinkedIn authorization-code flow: build the
/// authorization redirect, exchange the code for a token, then fetch the
/// member's profile and email with it.
#[derive(Clone)]
pub struct LinkedInClient {
    http: reqwest::Client,
    config: LinkedInConfig,
}

/// Profile fields derived from the /v2/me and /v2/emailAddress responses.
#[derive(Debug, Clone)]
pub struct LinkedInProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture_url: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct MeResponse {
    id: String,
    #[serde(rename = "localizedFirstName", default)]
    localized_first_name: String,
    #[serde(rename = "localizedLastName", default)]
    localized_last_name: String,
    #[serde(rename = "profilePicture")]
    profile_picture: Option<serde_json::Value>,
}

/// Generate the opaque anti-forgery state token stored in the session
/// between redirect and callback.
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

impl LinkedInClient {
    pub fn new(config: LinkedInConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self { http, config }
    }

    fn client_id(&self) -> Result<&str, ApiError> {
        self.config
            .client_id
            .as_deref()
            .ok_or_else(|| ApiError::Config("LinkedIn OAuth is not configured".to_string()))
    }

    /// The authorization URL the browser is redirected to.
    pub fn authorize_url(&self, state: &str) -> Result<String, ApiError> {
        let client_id = self.client_id()?;
        let url = Url::parse_with_params(
            &format!("{}/oauth/v2/authorization", self.config.auth_base),
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", &self.config.redirect_uri),
                ("state", state),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| ApiError::Config(format!("Invalid LinkedIn authorization URL: {e}")))?;
        Ok(url.into())
    }

    /// Exchange the authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ApiError> {
        let client_id = self.client_id()?.to_string();
        let client_secret = self
            .config
            .client_secret
            .clone()
            .ok_or_else(|| ApiError::Config("LinkedIn OAuth is not configured".to_string()))?;

        let response = self
            .http
            .post(format!("{}/oauth/v2/accessToken", self.config.auth_base))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.config.redirect_uri),
                ("client_id", &client_id),
                ("client_secret", &client_secret),
            ])
            .send()
            .await
            .map_err(|e| ApiError::OAuthExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::OAuthExchange(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::OAuthExchange(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Fetch the member's profile and primary email with the access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<LinkedInProfile, ApiError> {
        let me: MeResponse = self
            .get_json(
                &format!(
                    "{}/v2/me?projection=(id,localizedFirstName,localizedLastName,profilePicture(displayImage~:playableStreams))",
                    self.config.api_base
                ),
                access_token,
            )
            .await?;

        let email_body: serde_json::Value = self
            .get_json(
                &format!(
                    "{}/v2/emailAddress?q=members&projection=(elements*(handle~))",
                    self.config.api_base
                ),
                access_token,
            )
            .await?;

        let email = email_body
            .pointer("/elements/0/handle~/emailAddress")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ApiError::OAuthExchange("email address missing from LinkedIn response".to_string())
            })?
            .to_string();

        let picture_url = me
            .profile_picture
            .as_ref()
            .and_then(extract_picture_url);

        Ok(LinkedInProfile {
            id: me.id,
            first_name: me.localized_first_name,
            last_name: me.localized_last_name,
            email,
            picture_url,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ApiError::OAuthExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::OAuthExchange(format!(
                "profile endpoint returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::OAuthExchange(e.to_string()))
    }
}

/// The display image arrives as nested projection elements; the last element
/// carries the largest rendition.
fn extract_picture_url(picture: &serde_json::Value) -> Option<String> {
    let elements = picture.pointer("/displayImage~/elements")?.as_array()?;
    elements
        .last()?
        .pointer("/identifiers/0/identifier")?
        .as_str()
        .map(str::to_string)
}
