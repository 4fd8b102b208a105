// src/error.rs
//! Error types for the launchpad
//!
//! Every fallible layer of the crate has its own error enum so callers can
//! match on exactly what went wrong:
//! - `EncodingError` for instruction-data construction
//! - `AddressDerivationError` for program-derived addresses
//! - `AllocationError` for supply and fee arithmetic
//! - `ConfigError` for launch-configuration validation
//! - `ChainError` for the chain-client boundary
//! - `PoolError` for liquidity-pool provisioning
//! - `LaunchError` for the orchestrated launch pipeline as a whole

use std::fmt;
use std::path::PathBuf;

use solana_program::pubkey::Pubkey;
use thiserror::Error;

/// Errors raised while constructing raw instruction data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// A metadata string field exceeds the on-chain account layout.
    #[error("{field} is {actual} bytes, exceeding the {limit}-byte on-chain limit")]
    FieldTooLong {
        /// Which field was too long ("name", "symbol" or "uri").
        field: &'static str,

        /// Observed byte length of the value.
        actual: usize,

        /// Hard ceiling enforced by the on-chain program.
        limit: usize,
    },

    /// A transfer fee rate above 100%.
    #[error("transfer fee of {0} basis points exceeds the 10000 maximum")]
    FeeBasisPointsTooHigh(u16),

    /// Instruction data that could not be serialized or deserialized.
    #[error("invalid instruction data: {0}")]
    InvalidData(String),
}

/// Errors raised while deriving program addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressDerivationError {
    /// No bump seed in `255..=0` produced an off-curve address.
    #[error("no viable bump seed for program {program_id}")]
    NoViableBump {
        /// Program the derivation ran against.
        program_id: Pubkey,
    },
}

/// Errors raised by supply-split, fee-split and pool arithmetic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// A share carried a negative percentage.
    #[error("share '{label}' has negative percentage {percentage}")]
    NegativeShare {
        /// Label of the offending share.
        label: String,

        /// The rejected percentage value.
        percentage: f64,
    },

    /// A share carried a NaN or infinite percentage.
    #[error("share '{label}' has a non-finite percentage")]
    NonFiniteShare {
        /// Label of the offending share.
        label: String,
    },

    /// The share percentages add up to more than 100%.
    #[error("share percentages sum to {total_bps} basis points, exceeding 100%")]
    ShareSumExceedsTotal {
        /// Combined share total in basis points.
        total_bps: u64,
    },

    /// An empty share list was given to a splitter.
    #[error("no shares provided")]
    EmptyShares,

    /// Price-impact math requires both pool reserves to be non-zero.
    #[error("pool reserves must be non-zero to compute price impact")]
    EmptyPool,

    /// The configured supply does not fit into base units.
    #[error("total supply {supply} with {decimals} decimals overflows u64")]
    SupplyOverflow {
        /// Whole-token supply requested.
        supply: u64,

        /// Decimal places requested for the mint.
        decimals: u8,
    },
}

/// Errors raised while validating a launch configuration before any
/// transaction is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field fails the on-chain encoding rules.
    #[error("invalid field encoding: {0}")]
    Encoding(#[from] EncodingError),

    /// The allocation percentages are unusable.
    #[error("invalid allocation: {0}")]
    Allocation(#[from] AllocationError),

    /// Any other rejected configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by a [`ChainClient`](crate::chain::ChainClient)
/// implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The RPC endpoint could not be reached at all.
    #[error("connection error: {0}")]
    Connection(String),

    /// A transaction was rejected or failed to land.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Confirmation polling gave up on a signature.
    #[error("confirmation timed out for {0}")]
    Timeout(String),

    /// A queried account does not exist.
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    /// Any other RPC-level failure.
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl ChainError {
    /// Whether a retry against the same endpoint can plausibly succeed.
    ///
    /// Connection failures are treated as terminal since every retry would
    /// hit the same unreachable endpoint; everything else is transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ChainError::Connection(_))
    }
}

/// Errors raised while preparing or provisioning a liquidity pool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    /// The pool collaborator refused or failed the request.
    #[error("pool provisioning failed: {0}")]
    Provisioning(String),

    /// Pool amount arithmetic failed.
    #[error("pool allocation: {0}")]
    Allocation(#[from] AllocationError),

    /// A pool account address could not be derived.
    #[error("pool address derivation: {0}")]
    AddressDerivation(#[from] AddressDerivationError),
}

/// Errors raised while persisting a launch summary artifact.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The summary file already exists; launch records are write-once.
    #[error("summary already written at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The summary could not be serialized to JSON.
    #[error("summary serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The summary file could not be written to disk.
    #[error("summary write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The ordered stages of a token launch, used for progress reporting and
/// partial-completion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStep {
    /// Configuration validation and payer balance check.
    Preflight,

    /// Mint account creation and initialization.
    MintCreation,

    /// Metaplex metadata account creation.
    MetadataCreation,

    /// Minting the computed allocations and burning the burn share.
    SupplyDistribution,

    /// Creation of the fee-recipient token accounts.
    FeeAccountSetup,

    /// Liquidity-pool parameter assembly and hand-off.
    PoolProvisioning,

    /// Renouncing the mint authority and freezing the metadata.
    AuthorityRenounce,

    /// Post-launch on-chain state checks.
    Verification,
}

impl fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStep::Preflight => "preflight",
            LaunchStep::MintCreation => "mint creation",
            LaunchStep::MetadataCreation => "metadata creation",
            LaunchStep::SupplyDistribution => "supply distribution",
            LaunchStep::FeeAccountSetup => "fee account setup",
            LaunchStep::PoolProvisioning => "pool provisioning",
            LaunchStep::AuthorityRenounce => "authority renounce",
            LaunchStep::Verification => "verification",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised by the launch orchestrator.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The payer cannot cover rent plus the transaction-fee buffer. Raised
    /// before any transaction is submitted.
    #[error("insufficient balance: need at least {required} lamports, have {available}")]
    InsufficientBalance {
        /// Lamports the launch is estimated to need.
        required: u64,

        /// Lamports currently held by the payer.
        available: u64,
    },

    /// The launch configuration failed validation.
    #[error("invalid launch configuration: {0}")]
    Config(#[from] ConfigError),

    /// Instruction data could not be encoded.
    #[error("instruction encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// A program address could not be derived.
    #[error("address derivation failed: {0}")]
    AddressDerivation(#[from] AddressDerivationError),

    /// Supply or fee arithmetic failed.
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    /// The chain client reported a failure before any state was mutated.
    #[error("chain client error: {0}")]
    Chain(#[from] ChainError),

    /// The pool collaborator reported a failure.
    #[error("pool provisioning error: {0}")]
    Pool(#[from] PoolError),

    /// Post-launch verification found on-chain state that does not match
    /// what the pipeline submitted.
    #[error("on-chain verification failed: {0}")]
    Verification(String),

    /// The launch summary could not be produced.
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),

    /// A step failed after earlier steps already mutated chain state. The
    /// mutations are not rolled back; the error records exactly how far the
    /// launch got so an operator can resume or clean up manually.
    #[error("launch incomplete: {failed} failed after {completed:?}: {source}")]
    PartialCompletion {
        /// Steps that fully completed, in execution order.
        completed: Vec<LaunchStep>,

        /// The step that failed.
        failed: LaunchStep,

        /// The underlying failure.
        #[source]
        source: Box<LaunchError>,
    },
}
