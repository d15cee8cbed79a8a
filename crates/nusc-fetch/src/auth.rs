//! Authentication against the nuScenes identity service.
//!
//! A single Cognito `InitiateAuth` exchange (USER_PASSWORD_AUTH) turning
//! credentials into a short-lived identity token. Rejections are reported
//! and surface as an absent token; retry policy belongs to the caller.

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::Credentials;
use crate::error::Result;
use crate::http::HttpTransport;

/// The identity-provider endpoint.
pub const IDENTITY_ENDPOINT: &str = "https://cognito-idp.us-east-1.amazonaws.com/";

const CLIENT_ID: &str = "7fq5jvs5ffs1c50hd3toobb3b9";
const AMZ_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const AMZ_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

#[derive(Debug, Deserialize)]
struct InitiateAuthResponse {
    #[serde(rename = "AuthenticationResult")]
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
struct AuthenticationResult {
    #[serde(rename = "IdToken")]
    id_token: Option<String>,
}

/// Exchanges credentials for an identity token.
pub struct Authenticator {
    transport: Arc<dyn HttpTransport>,
}

impl Authenticator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Perform one USER_PASSWORD_AUTH exchange.
    ///
    /// Returns `Ok(None)` when the identity provider rejects the request
    /// (non-200 status, or a well-formed response without a token); the
    /// rejection detail is logged. Transport failures propagate as errors.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Option<String>> {
        log::info!("authenticating with the nuScenes identity service");

        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": CLIENT_ID,
            "AuthParameters": {
                "USERNAME": credentials.username,
                "PASSWORD": credentials.password,
            },
        })
        .to_string();

        let headers = [
            ("Content-Type", AMZ_CONTENT_TYPE),
            ("X-Amz-Target", AMZ_TARGET),
        ];
        let response = self.transport.post(IDENTITY_ENDPOINT, &headers, body).await?;

        if response.status != 200 {
            log::warn!(
                "authentication rejected (HTTP {}): {}",
                response.status,
                response.body
            );
            return Ok(None);
        }

        match serde_json::from_str::<InitiateAuthResponse>(&response.body) {
            Ok(parsed) => match parsed.authentication_result.and_then(|r| r.id_token) {
                Some(token) => Ok(Some(token)),
                None => {
                    log::warn!("authentication response did not contain an identity token");
                    Ok(None)
                }
            },
            Err(e) => {
                log::warn!("malformed authentication response: {}", e);
                Ok(None)
            }
        }
    }
}
