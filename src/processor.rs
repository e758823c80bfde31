//! Contract for snapshot processors and the collaborators they are handed.
//!
//! Only the shapes live here. Concrete processors, RPC helpers and content
//! readers are provided by the components that compute snapshots.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A block range of one epoch that a processor should compute a snapshot for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProcessMessage {
    /// First block of the epoch (inclusive).
    pub begin: u64,
    /// Last block of the epoch (inclusive).
    pub end: u64,
    pub epoch_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u64>,
}

/// ETH/USD price keyed by block number.
pub type EthPriceTable = BTreeMap<u64, f64>;

/// Issues JSON-RPC calls against a chain node.
#[async_trait]
pub trait RpcHelper: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}

/// Reads content-addressed data, e.g. from IPFS.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Returns the raw bytes stored under `cid`.
    async fn cat(&self, cid: &str) -> Result<Vec<u8>>;
}

/// Handle to the protocol state contract on the anchor chain.
pub trait ProtocolStateContract: Send + Sync {
    fn address(&self) -> &str;
}

/// Computes the snapshot for one [`SnapshotProcessMessage`].
///
/// Implementations may await any number of RPC or content reads while
/// computing; the caller supplies every collaborator per call.
#[async_trait]
pub trait GenericProcessor: Send + Sync {
    type Output: Send;

    async fn compute(
        &self,
        msg: &SnapshotProcessMessage,
        rpc_helper: &dyn RpcHelper,
        anchor_rpc_helper: &dyn RpcHelper,
        ipfs_reader: &dyn ContentReader,
        protocol_state: &dyn ProtocolStateContract,
        eth_price_dict: &EthPriceTable,
    ) -> Result<Self::Output>;
}
