use crate::contracts::getFarmListCall;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy_primitives::{Address, Bytes};
use anyhow::Result;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

/// Read-only chain access needed to map farms to their deployers.
pub trait ChainReader {
    /// Farm addresses registered with `factory`, in factory order.
    fn farm_list(&self, factory: Address) -> impl Future<Output = Result<Vec<Address>>> + Send;

    fn get_logs(&self, filter: &Filter) -> impl Future<Output = Result<Vec<Log>>> + Send;
}

#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct RpcClient {
    provider: RootProvider,
    /// Every spelling of the URL a transport error may echo back.
    secret_forms: Vec<String>,
    /// Scheme, host and port only. Hosted endpoints keep API keys in the path.
    endpoint: String,
    request_timeout: Duration,
}

impl RpcClient {
    pub fn new(rpc_url: &str, request_timeout: Duration) -> Result<Self> {
        let parsed_url: Url = rpc_url
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid RPC URL"))?;
        let endpoint = endpoint_label(&parsed_url);

        let mut secret_forms = vec![parsed_url.to_string(), rpc_url.to_string()];
        secret_forms.dedup();

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(parsed_url);

        Ok(RpcClient {
            provider,
            secret_forms,
            endpoint,
            request_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout_error(&self) -> anyhow::Error {
        anyhow::anyhow!(
            "Request timeout after {:?} on {}",
            self.request_timeout,
            self.endpoint
        )
    }

    /// Wraps a transport error with `what`, replacing the full URL by the endpoint label.
    fn rpc_error(&self, what: impl Display, err: impl Display) -> anyhow::Error {
        let mut message = err.to_string();
        for secret in &self.secret_forms {
            message = message.replace(secret.as_str(), &self.endpoint);
        }
        anyhow::anyhow!("{}: {}", what, message)
    }

    pub async fn get_latest_block(&self) -> Result<u64> {
        match timeout(self.request_timeout, self.provider.get_block_number()).await {
            Ok(Ok(block_number)) => Ok(block_number),
            Ok(Err(e)) => Err(self.rpc_error("eth_blockNumber failed", e)),
            Err(_) => Err(self.timeout_error()),
        }
    }

    /// Logs the current chain head. Failing to read it never fails the caller.
    pub async fn log_chain_head(&self) -> Option<u64> {
        match self.get_latest_block().await {
            Ok(head) => {
                info!("Chain head at block {}", head);
                Some(head)
            }
            Err(e) => {
                warn!("Could not read chain head: {:#}", e);
                None
            }
        }
    }

    pub async fn call_contract<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(call.abi_encode()).into());

        let output = match timeout(self.request_timeout, self.provider.call(tx)).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(self.rpc_error(format_args!("eth_call {} failed", C::SIGNATURE), e));
            }
            Err(_) => return Err(self.timeout_error()),
        };

        C::abi_decode_returns(&output).map_err(|e| {
            anyhow::anyhow!("Malformed {} response from {:?}: {}", C::SIGNATURE, to, e)
        })
    }

    pub async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        match timeout(self.request_timeout, self.provider.get_logs(filter)).await {
            Ok(Ok(logs)) => {
                debug!("eth_getLogs returned {} logs", logs.len());
                Ok(logs)
            }
            Ok(Err(e)) => Err(self.rpc_error("eth_getLogs failed", e)),
            Err(_) => Err(self.timeout_error()),
        }
    }
}

fn endpoint_label(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown-host");
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

impl ChainReader for RpcClient {
    async fn farm_list(&self, factory: Address) -> Result<Vec<Address>> {
        self.call_contract(factory, getFarmListCall {}).await
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        RpcClient::get_logs(self, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accepts connections and never answers them.
    async fn silent_node() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        format!("http://127.0.0.1:{port}/v3/0123456789abcdef")
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = RpcClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(!err.to_string().contains("not a url"));
    }

    #[test]
    fn test_endpoint_hides_path() {
        let client = RpcClient::new(
            "https://arbitrum-mainnet.infura.io/v3/0123456789abcdef",
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.endpoint(), "https://arbitrum-mainnet.infura.io");
    }

    #[test]
    fn test_endpoint_keeps_port() {
        let client = RpcClient::new("http://localhost:8545", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8545");
    }

    #[test]
    fn test_transport_error_is_redacted() {
        let url = "https://arbitrum-mainnet.infura.io/v3/0123456789abcdef";
        let client = RpcClient::new(url, Duration::from_secs(1)).unwrap();

        let err = client.rpc_error(
            "eth_getLogs failed",
            format!("error sending request for url ({url})"),
        );

        let message = err.to_string();
        assert!(message.starts_with("eth_getLogs failed"));
        assert!(message.contains("https://arbitrum-mainnet.infura.io"));
        assert!(!message.contains("0123456789abcdef"));
    }

    #[tokio::test]
    async fn test_get_logs_times_out() {
        let url = silent_node().await;
        let client = RpcClient::new(&url, Duration::from_millis(50)).unwrap();

        let err = client.get_logs(&Filter::new()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Request timeout"), "{message}");
        assert!(!message.contains("0123456789abcdef"));
    }

    #[tokio::test]
    async fn test_chain_head_failure_is_not_fatal() {
        let url = silent_node().await;
        let client = RpcClient::new(&url, Duration::from_millis(50)).unwrap();

        assert_eq!(client.log_chain_head().await, None);
    }

    #[tokio::test]
    async fn test_farm_list_times_out() {
        let url = silent_node().await;
        let client = RpcClient::new(&url, Duration::from_millis(50)).unwrap();

        let err = client.farm_list(Address::ZERO).await.unwrap_err();

        assert!(err.to_string().contains("Request timeout"));
    }
}
