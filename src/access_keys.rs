// Copyright 2022 Mathew Odden <mathewrodden@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Listing R2 access keys through the Cloudflare v4 management API.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::value::Value;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.cloudflare.com/client/v4";

pub const API_TOKEN_VAR: &str = "R2_API_TOKEN";
pub const ACCOUNT_ID_VAR: &str = "CF_ACCOUNT_ID";

/// Management API credentials. Neither field is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub account_id: String,
}

impl Credentials {
    pub fn new(api_token: &str, account_id: &str) -> Self {
        Self {
            api_token: api_token.to_string(),
            account_id: account_id.to_string(),
        }
    }

    /// Reads `R2_API_TOKEN` and `CF_ACCOUNT_ID`. Unset variables become
    /// empty strings and will usually be rejected by the API.
    pub fn from_env() -> Self {
        Self {
            api_token: std::env::var(API_TOKEN_VAR).unwrap_or_default(),
            account_id: std::env::var(ACCOUNT_ID_VAR).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessKeyEntry {
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: Option<AccessKeysResult>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessKeysResult {
    /// Kept untyped; only the first entry is ever decoded.
    #[serde(default)]
    pub access_keys: Option<Vec<Value>>,
}

impl Envelope {
    /// Only the first listed key is ever returned; later ones are ignored.
    pub fn first_access_key(&self) -> Result<AccessKeyEntry> {
        let first = self
            .result
            .as_ref()
            .and_then(|r| r.access_keys.as_ref())
            .and_then(|keys| keys.first())
            .ok_or(Error::NotFound)?;

        Ok(serde_json::from_value(first.clone())?)
    }
}

/// Status and body of a response before either has been judged.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn into_envelope(self) -> Result<Envelope> {
        if !self.status.is_success() {
            return Err(Error::Status {
                status: self.status.as_u16(),
                body: self.body,
            });
        }

        Ok(serde_json::from_str::<Envelope>(&self.body)?)
    }
}

pub struct AccessKeysClient {
    endpoint: String,
    api_token: String,
    client: reqwest::blocking::Client,
}

impl AccessKeysClient {
    pub fn new(api_token: &str) -> Self {
        Self::with_endpoint(api_token, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_token: &str, endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn access_keys_url(&self, account_id: &str) -> String {
        format!("{}/accounts/{}/r2/access_keys", self.endpoint, account_id)
    }

    /// Issues the GET and hands back whatever came back, error statuses included.
    pub fn send(&self, account_id: &str) -> Result<RawResponse> {
        let url = self.access_keys_url(account_id);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        debug!("Response status: {}", status);

        Ok(RawResponse { status, body })
    }

    /// Returns the first access key listed for `account_id`.
    ///
    /// An empty or absent listing is `Error::NotFound`, which callers are
    /// expected to report rather than treat as fatal.
    pub fn fetch(&self, account_id: &str) -> Result<AccessKeyEntry> {
        self.send(account_id)?.into_envelope()?.first_access_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_access_keys_url() {
        let c = AccessKeysClient::new("token");
        assert_eq!(
            c.access_keys_url("abc123"),
            "https://api.cloudflare.com/client/v4/accounts/abc123/r2/access_keys"
        );
    }

    #[test]
    fn test_access_keys_url_trailing_slash() {
        let c = AccessKeysClient::with_endpoint("token", "http://127.0.0.1:1234/");
        assert_eq!(
            c.access_keys_url("acct"),
            "http://127.0.0.1:1234/accounts/acct/r2/access_keys"
        );
    }

    #[test]
    fn test_first_of_many() {
        let env = raw(
            200,
            r#"{"result":{"access_keys":[
                {"access_key_id":"AKID1","secret_access_key":"SECRET1"},
                {"access_key_id":"AKID2","secret_access_key":"SECRET2"}]}}"#,
        )
        .into_envelope()
        .unwrap();

        assert_eq!(
            env.first_access_key().unwrap(),
            AccessKeyEntry {
                access_key_id: "AKID1".into(),
                secret_access_key: "SECRET1".into(),
            }
        );
    }

    #[test]
    fn test_malformed_later_entry_ignored() {
        let env = raw(
            200,
            r#"{"result":{"access_keys":[
                {"access_key_id":"AKID1","secret_access_key":"SECRET1"},
                {"access_key_id":"AKID2"}]}}"#,
        )
        .into_envelope()
        .unwrap();

        assert_eq!(env.first_access_key().unwrap().access_key_id, "AKID1");
    }

    #[test]
    fn test_malformed_first_entry() {
        let env = raw(200, r#"{"result":{"access_keys":[{"access_key_id":"AKID1"}]}}"#)
            .into_envelope()
            .unwrap();

        assert!(matches!(env.first_access_key(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_keys_is_not_found() {
        for body in [
            r#"{"result":{"access_keys":[]}}"#,
            r#"{"result":{"access_keys":null}}"#,
            r#"{"result":{}}"#,
            r#"{"result":null,"success":false,"errors":[],"messages":[]}"#,
            r#"{}"#,
        ] {
            let env = raw(200, body).into_envelope().unwrap();
            assert!(env.first_access_key().unwrap_err().is_not_found(), "{}", body);
        }
    }

    #[test]
    fn test_error_status() {
        match raw(403, "forbidden").into_envelope() {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            raw(200, "<html>not json</html>").into_envelope(),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_credentials_from_env() {
        std::env::set_var(API_TOKEN_VAR, "tok");
        std::env::set_var(ACCOUNT_ID_VAR, "acct");
        assert_eq!(Credentials::from_env(), Credentials::new("tok", "acct"));

        // unset reads as empty
        std::env::remove_var(API_TOKEN_VAR);
        std::env::remove_var(ACCOUNT_ID_VAR);
        assert_eq!(Credentials::from_env(), Credentials::default());
    }
}
