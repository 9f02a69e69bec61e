//! Signed REST verbs against the vendor host.

use reqwest::Method;
use reqwest::header;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::response::ApiResponse;
use crate::signer::{Credentials, Signer};

/// Hostname, including protocol, of the production REST API.
pub const API_HOST: &str = "https://rws.netdna.com";

const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const USER_AGENT: &str =
    concat!("rust-maxcdn/", env!("CARGO_PKG_VERSION"));

/// Client for the MaxCDN REST API.
///
/// Cloning is cheap: the underlying `reqwest::Client` is ref-counted, so
/// clones share its connection pool. Batch purges rely on this to spawn a
/// task per item.
#[derive(Debug, Clone)]
pub struct MaxCdn {
    alias: String,
    signer: Signer,
    http: reqwest::Client,
    api_host: String,
}

impl MaxCdn {
    /// Set up a client for a company `alias` with consumer `token` and
    /// `secret`.
    pub fn new(
        alias: impl Into<String>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            signer: Signer::new(Credentials::new(token, secret)),
            http: reqwest::Client::new(),
            api_host: API_HOST.to_owned(),
        }
    }

    /// Point the client at a different API host (staging, tests).
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Swap in a preconfigured `reqwest::Client` (proxies, timeouts).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The company alias this client is bound to.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// OAuth signed GET. `params` become the query string and are part of
    /// the signature.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, Error> {
        self.request(Method::GET, endpoint, params).await
    }

    /// OAuth signed POST with a form-urlencoded body.
    pub async fn post(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, Error> {
        self.request(Method::POST, endpoint, form).await
    }

    /// OAuth signed PUT with a form-urlencoded body.
    pub async fn put(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, Error> {
        self.request(Method::PUT, endpoint, form).await
    }

    /// OAuth signed DELETE.
    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse, Error> {
        self.request(Method::DELETE, endpoint, &[]).await
    }

    /// OAuth signed DELETE carrying a form-urlencoded body (the purge
    /// endpoint selects single files this way).
    pub async fn delete_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, Error> {
        self.request(Method::DELETE, endpoint, form).await
    }

    /// The generic call every verb goes through. Public so callers can hit
    /// endpoints this crate has no helper for and map `data` onto their
    /// own structs.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, Error> {
        let base_url = self.endpoint_url(endpoint)?;

        // GET parameters travel in the URL and are signed. Of the
        // body-carrying verbs only POST signs its form; PUT/DELETE bodies
        // go over unsigned, matching the vendor's server-side validation.
        let signed: &[(&str, &str)] =
            if method == Method::GET || method == Method::POST {
                params
            } else {
                &[]
            };
        let authorization =
            self.signer
                .authorization_header(method.as_str(), &base_url, signed);

        let mut url = Url::parse(&base_url)?;
        let builder = if method == Method::GET {
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params);
            }
            self.http.get(url)
        } else {
            let body = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            self.http.request(method.clone(), url).body(body)
        };

        debug!(%method, endpoint, "sending signed request");
        let response = builder
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let raw = response.bytes().await?;

        let mut envelope = match ApiResponse::parse(&raw) {
            Ok(envelope) => envelope,
            // Proxies and load balancers answer errors with non-JSON
            // bodies; surface the HTTP status instead of a decode error.
            Err(_) if !status.is_success() => {
                return Err(Error::Api {
                    code: status.as_u16(),
                    kind: "http".to_owned(),
                    message: format!("request failed with status {status}"),
                });
            }
            Err(err) => return Err(err),
        };
        envelope.status = status.as_u16();

        if let Some(body) = &envelope.error {
            if !body.message.is_empty() || !body.kind.is_empty() {
                let code = if envelope.code != 0 {
                    envelope.code
                } else {
                    status.as_u16()
                };
                warn!(
                    code,
                    endpoint,
                    message = %body.message,
                    "API returned an error envelope"
                );
                return Err(Error::Api {
                    code,
                    kind: body.kind.clone(),
                    message: body.message.clone(),
                });
            }
        }

        Ok(envelope)
    }

    /// `{api_host}/{alias}/{endpoint}`, leading slash on the endpoint
    /// optional. Endpoints with a baked-in query string are rejected: the
    /// signer needs a bare URL with parameters passed separately.
    fn endpoint_url(&self, endpoint: &str) -> Result<String, Error> {
        if endpoint.contains('?') {
            return Err(Error::QueryInEndpoint);
        }
        Ok(format!(
            "{}/{}/{}",
            self.api_host.trim_end_matches('/'),
            self.alias,
            endpoint.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_trims_leading_slash() {
        let max = MaxCdn::new("acme", "token", "secret");
        let with = max.endpoint_url("/account.json").unwrap();
        let without = max.endpoint_url("account.json").unwrap();
        assert_eq!(with, "https://rws.netdna.com/acme/account.json");
        assert_eq!(with, without);
    }

    #[test]
    fn endpoint_url_respects_host_override() {
        let max = MaxCdn::new("acme", "token", "secret")
            .with_api_host("http://127.0.0.1:8080/");
        assert_eq!(
            max.endpoint_url("zones/pull.json").unwrap(),
            "http://127.0.0.1:8080/acme/zones/pull.json"
        );
    }

    #[test]
    fn endpoint_with_query_string_is_rejected() {
        let max = MaxCdn::new("acme", "token", "secret");
        assert!(matches!(
            max.endpoint_url("/reports/popularfiles.json?page=2"),
            Err(Error::QueryInEndpoint)
        ));
    }
}
