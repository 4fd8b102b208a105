// src/launch/summary.rs
//! The launch summary artifact
//!
//! A successful launch produces one JSON document holding everything an
//! operator needs afterwards: addresses, allocations, transaction
//! signatures, pool parameters and explorer links. The document embeds a
//! SHA-256 fingerprint of the configuration that produced it, so any two
//! summaries can be checked for having used identical settings. Summary
//! files are write-once; an existing file is never overwritten.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::config::{LaunchConfig, TokenMetadata};
use crate::allocation::LaunchAllocation;
use crate::error::SummaryError;
use crate::pool::{PoolParams, PoolReceipt, PoolStatus};

/// One submitted transaction and the pipeline step it belonged to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Human-readable step label.
    pub step: String,

    /// Base-58 transaction signature.
    pub signature: String,
}

/// The token metadata as launched, with addresses flattened to base-58
/// strings for the JSON artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: String,
    pub uri: String,
    pub external_url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub website: Option<String>,
    pub creator_wallet: String,
}

impl From<&TokenMetadata> for MetadataSnapshot {
    fn from(metadata: &TokenMetadata) -> Self {
        MetadataSnapshot {
            name: metadata.name.clone(),
            symbol: metadata.symbol.clone(),
            description: metadata.description.clone(),
            image_url: metadata.image_url.clone(),
            uri: metadata.uri.clone(),
            external_url: metadata.external_url.clone(),
            twitter: metadata.twitter.clone(),
            telegram: metadata.telegram.clone(),
            discord: metadata.discord.clone(),
            website: metadata.website.clone(),
            creator_wallet: metadata.creator_wallet.to_string(),
        }
    }
}

/// Pool parameters and provisioning outcome, flattened for the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub amm_id: String,
    pub amm_authority: String,
    pub amm_authority_bump: u8,
    pub amm_open_orders: String,
    pub amm_target_orders: String,
    pub quote_mint: String,
    pub base_amount: u64,
    pub quote_amount: u64,
    pub min_base_amount: u64,
    pub min_quote_amount: u64,
    pub open_time: u64,
    pub initial_price: f64,
    pub status: PoolStatus,
    pub lp_mint: Option<String>,
    pub signature: Option<String>,
}

impl PoolSnapshot {
    /// Combines the assembled parameters with the provisioner's receipt.
    pub fn new(params: &PoolParams, receipt: &PoolReceipt) -> Self {
        PoolSnapshot {
            amm_id: params.amm_id.to_string(),
            amm_authority: params.amm_authority.address.to_string(),
            amm_authority_bump: params.amm_authority.bump,
            amm_open_orders: params.amm_open_orders.address.to_string(),
            amm_target_orders: params.amm_target_orders.address.to_string(),
            quote_mint: params.quote_mint.to_string(),
            base_amount: params.base_amount,
            quote_amount: params.quote_amount,
            min_base_amount: params.min_base_amount,
            min_quote_amount: params.min_quote_amount,
            open_time: params.open_time,
            initial_price: params.initial_price,
            status: receipt.status,
            lp_mint: receipt.lp_mint.map(|mint| mint.to_string()),
            signature: receipt.signature.clone(),
        }
    }
}

/// Block-explorer links for the launched token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerLinks {
    pub solscan: String,
    pub birdeye: String,
    pub dexscreener: String,
}

impl ExplorerLinks {
    /// Links for a mint address.
    pub fn for_mint(mint: &str) -> Self {
        ExplorerLinks {
            solscan: format!("https://solscan.io/token/{}", mint),
            birdeye: format!("https://birdeye.so/token/{}", mint),
            dexscreener: format!("https://dexscreener.com/solana/{}", mint),
        }
    }
}

/// The complete record of one launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSummary {
    /// Epoch seconds when the launch finished.
    pub timestamp: u64,

    /// Mint address.
    pub mint: String,

    /// Metaplex metadata account address.
    pub metadata_account: String,

    /// Token program owning the mint.
    pub token_program: String,

    /// Mint decimals.
    pub decimals: u8,

    /// Minted supply in base units.
    pub total_supply_base_units: u64,

    /// How the supply was split.
    pub allocation: LaunchAllocation,

    /// Supply remaining after the launch burn.
    pub circulating_supply: u64,

    /// Allocation bucket -> token account address.
    pub token_accounts: BTreeMap<String, String>,

    /// Fee recipient -> token account address; empty without a fee config.
    pub fee_accounts: BTreeMap<String, String>,

    /// Every submitted transaction, in order.
    pub transactions: Vec<TransactionRecord>,

    /// Pool parameters and status, when provisioning ran.
    pub pool: Option<PoolSnapshot>,

    /// Explorer links for the mint.
    pub explorer: ExplorerLinks,

    /// The metadata as launched.
    pub metadata: MetadataSnapshot,

    /// The configuration as launched.
    pub config: LaunchConfig,

    /// SHA-256 of the canonical JSON form of `config`.
    pub config_fingerprint: String,
}

impl LaunchSummary {
    /// Canonical artifact file name: `launch_<symbol>_<mint>.json`.
    pub fn file_name(&self) -> String {
        format!("launch_{}_{}.json", self.metadata.symbol, self.mint)
    }

    /// Pretty-printed JSON form of the summary.
    pub fn to_json_pretty(&self) -> Result<String, SummaryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the summary into `dir` and returns the path.
    ///
    /// Refuses to overwrite: launch records are write-once evidence of what
    /// happened.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, SummaryError> {
        let path = dir.join(self.file_name());
        if path.exists() {
            return Err(SummaryError::AlreadyExists(path));
        }
        fs::write(&path, self.to_json_pretty()?)?;
        info!("launch summary written to {}", path.display());
        Ok(path)
    }
}

/// Hex-encoded SHA-256 of the configuration's canonical JSON encoding.
///
/// Struct fields serialize in declaration order and the milestone map is
/// ordered, so equal configurations always fingerprint identically.
pub fn fingerprint_config(config: &LaunchConfig) -> Result<String, SummaryError> {
    let canonical = serde_json::to_vec(config)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}
