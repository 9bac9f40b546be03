//! HTTP clients for all SolPay APIs.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod admin;
mod merchant;
mod pay;

pub use admin::AdminClient;
pub use merchant::MerchantClient;
pub use pay::PayClient;

use reqwest::StatusCode;

use crate::objects::ErrorBody;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The structured error body of an API error, when the server sent one.
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            ClientError::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

async fn expect_success(resp: reqwest::Response) -> Result<(), ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = ClientError::Api {
            status: StatusCode::GONE,
            body: r#"{"error":"link_inactive","message":"This payment link is inactive"}"#
                .to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::GONE));
        let body = err.error_body().unwrap();
        assert_eq!(body.error, "link_inactive");
    }

    #[test]
    fn non_json_body_yields_none() {
        let err = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert!(err.error_body().is_none());
    }
}
