use eip1559_gas_fees::blockchain::providers::ethers_provider::MiddlewareEvmBlockchainProvider;
use eip1559_gas_fees::blockchain::providers::json_rpc::JsonRpcEvmBlockchainProvider;
use ethers::providers::{Http, Provider};
use rstest::fixture;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const FEE_HISTORY: &str = "eth_feeHistory";

/// Fake EVM node answering JSON-RPC calls over HTTP.
pub struct RpcNodeFixture {
    pub server: MockServer,
}

#[fixture]
pub async fn rpc_node() -> RpcNodeFixture {
    RpcNodeFixture {
        server: MockServer::start().await,
    }
}

impl RpcNodeFixture {
    pub fn endpoint(&self) -> String {
        self.server.uri()
    }

    pub fn json_rpc_provider(&self) -> JsonRpcEvmBlockchainProvider {
        let http_client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        JsonRpcEvmBlockchainProvider::new(self.endpoint(), http_client)
    }

    pub fn ethers_provider(&self) -> MiddlewareEvmBlockchainProvider<Provider<Http>> {
        let provider = Provider::<Http>::try_from(self.endpoint()).unwrap();
        MiddlewareEvmBlockchainProvider::new(provider)
    }

    pub async fn mock_result(&self, rpc_method: &str, result: Value) {
        self.mock_response(
            rpc_method,
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": result,
            })),
        )
        .await;
    }

    pub async fn mock_error(&self, rpc_method: &str, code: i64, message: &str) {
        self.mock_response(
            rpc_method,
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": code, "message": message },
            })),
        )
        .await;
    }

    pub async fn mock_status(&self, rpc_method: &str, status: u16, body: &str) {
        self.mock_response(
            rpc_method,
            ResponseTemplate::new(status).set_body_string(body),
        )
        .await;
    }

    async fn mock_response(&self, rpc_method: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received so far, in arrival order.
    pub async fn received_calls(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.body_json::<Value>().unwrap())
            .collect()
    }

    pub async fn received_calls_to(&self, rpc_method: &str) -> Vec<Value> {
        self.received_calls()
            .await
            .into_iter()
            .filter(|call| call["method"] == rpc_method)
            .collect()
    }
}

/// Header of a post-London pending block as geth returns it.
pub fn pending_block(base_fee_per_gas: Option<u64>) -> Value {
    let mut block = json!({
        "number": "0x10d4f2a",
        "hash": null,
        "parentHash": "0x5c2fa5a94eb20b1c2cd2d3a0d0b1c9a9fbd6eaab1b5cb6c9ea5ae3c7b64dc43e",
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "miner": null,
        "stateRoot": "0x9a3c0ba7bce9a4c4b1f9ad27a5d8c1d5c2f4e0f4a6d1c2e9b8a7f6e5d4c3b2a1",
        "transactionsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
        "receiptsRoot": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "difficulty": "0x0",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0xe4e1c0",
        "timestamp": "0x65a1b2c3",
        "extraData": "0x",
        "nonce": null,
        "size": "0x220",
        "uncles": [],
        "transactions": [],
    });

    if let Some(base_fee_per_gas) = base_fee_per_gas {
        block["baseFeePerGas"] = json!(format!("{base_fee_per_gas:#x}"));
    }

    block
}

/// `eth_feeHistory` result with one reward row per block.
pub fn fee_history(oldest_block: u64, reward: &[&[u64]]) -> Value {
    let reward: Vec<Vec<String>> = reward
        .iter()
        .map(|row| row.iter().map(|tip| format!("{tip:#x}")).collect())
        .collect();
    let base_fee_per_gas: Vec<String> = (0..=reward.len()).map(|_| "0x64".to_owned()).collect();
    let gas_used_ratio: Vec<f64> = reward.iter().map(|_| 0.5).collect();

    json!({
        "oldestBlock": format!("{oldest_block:#x}"),
        "baseFeePerGas": base_fee_per_gas,
        "gasUsedRatio": gas_used_ratio,
        "reward": reward,
    })
}
