//! Solana JSON-RPC account fetcher

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::shared::errors::{DecodeError, FetchError};

/// Default per-call timeout for account fetches
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// Raw account as returned by `getAccountInfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcAccount {
    pub address: String,
    pub owner: String,
    pub data_base64: String,
}

impl RpcAccount {
    /// Decode the base64 payload into the account's bytes
    pub fn decode_data(&self) -> Result<Vec<u8>, DecodeError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data_base64.as_bytes())
            .map_err(|e| DecodeError::Base64(e.to_string()))
    }
}

/// Anything that can resolve an address to its raw account
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Fetch one account. Any error means the account is unavailable.
    async fn fetch_account(&self, address: &str) -> Result<RpcAccount, FetchError>;
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContextValue<T> {
    value: Option<T>,
}

/// Account data response from RPC
#[derive(Debug, Deserialize)]
struct AccountInfo {
    data: Vec<String>, // [payload, encoding]
    owner: String,
}

/// Extract the account from a `getAccountInfo` response body
pub fn parse_account_response(address: &str, body: Value) -> Result<RpcAccount, FetchError> {
    let response: RpcResponse<ContextValue<AccountInfo>> = serde_json::from_value(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(FetchError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let info = response
        .result
        .and_then(|result| result.value)
        .ok_or_else(|| FetchError::AccountMissing(address.to_string()))?;

    let data_base64 = info
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MalformedResponse("empty data tuple".to_string()))?;

    Ok(RpcAccount {
        address: address.to_string(),
        owner: info.owner,
        data_base64,
    })
}

/// Single-shot `getAccountInfo` client. No retries, no caching.
#[derive(Clone)]
pub struct RpcAccountFetcher {
    url: String,
    client: Client,
    timeout_ms: u64,
}

impl RpcAccountFetcher {
    /// Create new RPC fetcher
    pub fn new(url: String, timeout_ms: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            url,
            client,
            timeout_ms,
        })
    }

    async fn call(&self, address: &str) -> Result<Value, FetchError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [address, { "encoding": "base64" }]
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!("HTTP {}", status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout_ms)
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl AccountSource for RpcAccountFetcher {
    async fn fetch_account(&self, address: &str) -> Result<RpcAccount, FetchError> {
        debug!("getAccountInfo {}", address);

        let result = match self.call(address).await {
            Ok(body) => parse_account_response(address, body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(account) => debug!(
                "Fetched {} (owner {}, {} base64 chars)",
                address,
                account.owner,
                account.data_base64.len()
            ),
            Err(e) => warn!("Account {} unavailable: {}", address, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    const ADDRESS: &str = "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2";

    #[test]
    fn test_parse_account_response() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 123 },
                "value": {
                    "data": ["AAECAw==", "base64"],
                    "executable": false,
                    "lamports": 1_000_000,
                    "owner": "dbcij3LWUppWqq96dh6gJWwBifmcGfLSB5D4DuSMaqN",
                    "rentEpoch": 0
                }
            }
        });

        let account = parse_account_response(ADDRESS, body).unwrap();
        assert_eq!(account.address, ADDRESS);
        assert_eq!(account.owner, "dbcij3LWUppWqq96dh6gJWwBifmcGfLSB5D4DuSMaqN");
        assert_eq!(account.decode_data().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_null_value_is_missing_account() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 1 }, "value": null }
        });
        assert_eq!(
            parse_account_response(ADDRESS, body),
            Err(FetchError::AccountMissing(ADDRESS.to_string()))
        );
    }

    #[test]
    fn test_rpc_error_is_reported() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param: WrongSize" }
        });
        assert_eq!(
            parse_account_response(ADDRESS, body),
            Err(FetchError::Rpc {
                code: -32602,
                message: "Invalid param: WrongSize".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_response() {
        let body = json!({ "result": { "value": { "data": [], "owner": "x" } } });
        assert!(matches!(
            parse_account_response(ADDRESS, body),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_account_response(ADDRESS, json!("nope")),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invalid_base64_payload() {
        let account = RpcAccount {
            address: ADDRESS.to_string(),
            owner: "owner".to_string(),
            data_base64: "!!not base64!!".to_string(),
        };
        assert!(matches!(account.decode_data(), Err(DecodeError::Base64(_))));
    }

    /// Serve `app` on an ephemeral loopback port and return its URL
    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_sends_get_account_info() {
        let captured: Arc<Mutex<Option<Value>>> = Arc::default();
        let app = Router::new()
            .route(
                "/",
                post(
                    |State(captured): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *captured.lock().await = Some(body);
                        Json(json!({
                            "jsonrpc": "2.0",
                            "id": 1,
                            "result": {
                                "context": { "slot": 7 },
                                "value": {
                                    "data": ["CgsM", "base64"],
                                    "owner": "dbcij3LWUppWqq96dh6gJWwBifmcGfLSB5D4DuSMaqN"
                                }
                            }
                        }))
                    },
                ),
            )
            .with_state(captured.clone());

        let fetcher = RpcAccountFetcher::new(serve(app).await, 2_000).unwrap();
        let account = fetcher.fetch_account(ADDRESS).await.unwrap();
        assert_eq!(account.address, ADDRESS);
        assert_eq!(account.owner, "dbcij3LWUppWqq96dh6gJWwBifmcGfLSB5D4DuSMaqN");
        assert_eq!(account.decode_data().unwrap(), vec![10, 11, 12]);

        let body = captured.lock().await.take().unwrap();
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "getAccountInfo");
        assert_eq!(body["params"], json!([ADDRESS, { "encoding": "base64" }]));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let app = Router::new().route(
            "/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "node unavailable") }),
        );
        let fetcher = RpcAccountFetcher::new(serve(app).await, 2_000).unwrap();
        match fetcher.fetch_account(ADDRESS).await {
            Err(FetchError::Transport(message)) => assert!(message.contains("500")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_node_times_out() {
        let app = Router::new().route(
            "/",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "jsonrpc": "2.0", "id": 1, "result": { "value": null } }))
            }),
        );
        let fetcher = RpcAccountFetcher::new(serve(app).await, 100).unwrap();
        assert_eq!(
            fetcher.fetch_account(ADDRESS).await,
            Err(FetchError::Timeout(100))
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // Nothing listens on the discard port
        let fetcher = RpcAccountFetcher::new("http://127.0.0.1:9".to_string(), 500).unwrap();
        let result = fetcher.fetch_account(ADDRESS).await;
        assert!(matches!(
            result,
            Err(FetchError::Transport(_)) | Err(FetchError::Timeout(_))
        ));
    }
}
