// src/launch/config.rs
//! Launch configuration and participating keys

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::allocation::{percent_to_bps, FeeShares, LaunchAllocation, BPS_PER_100_PERCENT};
use crate::antibot::AntiBotConfig;
use crate::encoding::{
    validate_metadata_fields, MAX_TRANSFER_FEE_BASIS_POINTS, MINT_ACCOUNT_LEN,
    MINT_WITH_TRANSFER_FEE_LEN, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::error::{AllocationError, ConfigError, EncodingError};

/// Display and link metadata for the token being launched.
///
/// `name`, `symbol` and `uri` go on chain through the metadata account; the
/// rest lands in the off-chain JSON document and the launch summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    /// Token name, at most 32 bytes on chain.
    pub name: String,

    /// Ticker symbol, at most 10 bytes on chain.
    pub symbol: String,

    /// Free-form project description.
    pub description: String,

    /// Token image location.
    pub image_url: String,

    /// URI of the off-chain metadata JSON, at most 200 bytes on chain.
    pub uri: String,

    /// Project home page, if any.
    pub external_url: Option<String>,

    /// Twitter/X handle or link.
    pub twitter: Option<String>,

    /// Telegram group link.
    pub telegram: Option<String>,

    /// Discord invite link.
    pub discord: Option<String>,

    /// Additional website link.
    pub website: Option<String>,

    /// Wallet credited as the token's creator in the on-chain metadata and
    /// paid the creator share of transfer fees.
    pub creator_wallet: Pubkey,
}

impl TokenMetadata {
    /// Creates metadata with the required fields; the optional links start
    /// empty.
    pub fn new(name: &str, symbol: &str, uri: &str, creator_wallet: Pubkey) -> Self {
        TokenMetadata {
            name: name.to_string(),
            symbol: symbol.to_string(),
            description: String::new(),
            image_url: String::new(),
            uri: uri.to_string(),
            external_url: None,
            twitter: None,
            telegram: None,
            discord: None,
            website: None,
            creator_wallet,
        }
    }

    /// Checks the on-chain fields against the metadata program's limits.
    pub fn validate(&self) -> Result<(), EncodingError> {
        validate_metadata_fields(&self.name, &self.symbol, &self.uri)
    }
}

/// Creator fee configuration; present on a launch when the mint should carry
/// the Token-2022 transfer-fee extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorFeeConfig {
    /// Fee withheld from every transfer, in basis points.
    pub transfer_fee_basis_points: u16,

    /// Per-transfer fee cap, in base units.
    pub maximum_fee: u64,

    /// How swept fees are split between recipients.
    pub shares: FeeShares,

    /// Volume milestone schedule: cumulative volume -> one-time reward.
    pub volume_milestones: BTreeMap<u64, u64>,
}

impl Default for CreatorFeeConfig {
    /// 2% transfer fee capped at one million base units per transfer, the
    /// standard 40/30/20/10 split, and rewards at 1M/10M/100M volume.
    fn default() -> Self {
        let mut volume_milestones = BTreeMap::new();
        volume_milestones.insert(1_000_000, 10_000);
        volume_milestones.insert(10_000_000, 50_000);
        volume_milestones.insert(100_000_000, 200_000);

        CreatorFeeConfig {
            transfer_fee_basis_points: 200,
            maximum_fee: 1_000_000,
            shares: FeeShares::default(),
            volume_milestones,
        }
    }
}

impl CreatorFeeConfig {
    /// Validates the fee rate and the distribution shares.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transfer_fee_basis_points > MAX_TRANSFER_FEE_BASIS_POINTS {
            return Err(ConfigError::Encoding(EncodingError::FeeBasisPointsTooHigh(
                self.transfer_fee_basis_points,
            )));
        }
        self.shares.validate()?;
        Ok(())
    }
}

/// Everything configurable about a launch except the token's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Decimal places of the mint.
    pub decimals: u8,

    /// Total supply in whole tokens; converted to base units at launch.
    pub total_supply: u64,

    /// Dev wallet share of supply, in percent.
    pub dev_percentage: f64,

    /// Marketing wallet share of supply, in percent.
    pub marketing_percentage: f64,

    /// Share of supply burned at launch, in percent.
    pub burn_percentage: f64,

    /// SOL deposited into the liquidity pool.
    pub initial_liquidity_sol: f64,

    /// Target listing price, in SOL per million whole tokens.
    pub launch_price_per_million: f64,

    /// Slippage tolerance for the pool deposit, in percent.
    pub slippage_percent: f64,

    /// How long pool liquidity is meant to stay locked, in days.
    pub liquidity_lock_days: u32,

    /// Length of the launch window, in hours.
    pub launch_duration_hours: u32,

    /// Anti-bot cap on a single buy, in percent of supply.
    pub max_buy_percentage: f64,

    /// Anti-bot cooldown between buys per wallet, in seconds.
    pub purchase_cooldown_seconds: u64,

    /// Whether to renounce the mint authority and freeze the metadata at
    /// the end of the launch.
    pub renounce_authorities: bool,

    /// Creator fee settings; `None` launches a plain SPL token without the
    /// transfer-fee extension.
    pub fee_config: Option<CreatorFeeConfig>,
}

impl Default for LaunchConfig {
    /// One billion tokens at 9 decimals, 5% dev / 3% marketing / no burn,
    /// 10 SOL of initial liquidity with a one-year lock, and authorities
    /// renounced.
    fn default() -> Self {
        LaunchConfig {
            decimals: 9,
            total_supply: 1_000_000_000,
            dev_percentage: 5.0,
            marketing_percentage: 3.0,
            burn_percentage: 0.0,
            initial_liquidity_sol: 10.0,
            launch_price_per_million: 0.01,
            slippage_percent: 0.5,
            liquidity_lock_days: 365,
            launch_duration_hours: 24,
            max_buy_percentage: 1.0,
            purchase_cooldown_seconds: 60,
            renounce_authorities: true,
            fee_config: None,
        }
    }
}

impl LaunchConfig {
    /// Total supply in base units, i.e. `total_supply * 10^decimals`.
    pub fn supply_base_units(&self) -> Result<u64, AllocationError> {
        let overflow = AllocationError::SupplyOverflow {
            supply: self.total_supply,
            decimals: self.decimals,
        };

        let factor = 10u128
            .checked_pow(self.decimals as u32)
            .ok_or_else(|| overflow.clone())?;
        let base_units = (self.total_supply as u128)
            .checked_mul(factor)
            .ok_or_else(|| overflow.clone())?;
        u64::try_from(base_units).map_err(|_| overflow)
    }

    /// Validates every numeric field before any transaction is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_units = self.supply_base_units().map_err(ConfigError::Allocation)?;

        // Dry-run the allocation to surface bad percentages here instead of
        // halfway through a launch.
        LaunchAllocation::from_percentages(
            base_units,
            self.dev_percentage,
            self.marketing_percentage,
            self.burn_percentage,
        )
        .map_err(ConfigError::Allocation)?;

        if !self.initial_liquidity_sol.is_finite() || self.initial_liquidity_sol < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "initial liquidity of {} SOL is not a valid amount",
                self.initial_liquidity_sol
            )));
        }

        if !self.launch_price_per_million.is_finite() || self.launch_price_per_million < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "launch price of {} SOL per million tokens is not valid",
                self.launch_price_per_million
            )));
        }

        let slippage_bps =
            percent_to_bps("slippage", self.slippage_percent).map_err(ConfigError::Allocation)?;
        if slippage_bps > BPS_PER_100_PERCENT {
            return Err(ConfigError::Invalid(format!(
                "slippage tolerance of {}% exceeds 100%",
                self.slippage_percent
            )));
        }

        percent_to_bps("max_buy", self.max_buy_percentage).map_err(ConfigError::Allocation)?;

        if let Some(fee_config) = &self.fee_config {
            fee_config.validate()?;
        }
        Ok(())
    }

    /// Whether the mint carries the Token-2022 transfer-fee extension.
    pub fn uses_transfer_fee(&self) -> bool {
        self.fee_config.is_some()
    }

    /// The token program that will own the mint.
    pub fn token_program(&self) -> Pubkey {
        if self.uses_transfer_fee() {
            TOKEN_2022_PROGRAM_ID
        } else {
            TOKEN_PROGRAM_ID
        }
    }

    /// Byte size of the mint account, extension included when configured.
    pub fn mint_space(&self) -> usize {
        if self.uses_transfer_fee() {
            MINT_WITH_TRANSFER_FEE_LEN
        } else {
            MINT_ACCOUNT_LEN
        }
    }

    /// The anti-bot limiter settings this launch implies.
    pub fn antibot_config(&self) -> AntiBotConfig {
        AntiBotConfig {
            max_buy_percentage: self.max_buy_percentage,
            cooldown_seconds: self.purchase_cooldown_seconds,
        }
    }
}

/// The addresses participating in a launch.
///
/// Key custody stays with the chain client; the orchestrator only names
/// which of these must sign each transaction. The optional wallets default
/// to the payer when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchKeys {
    /// Funds rent and fees, signs everything, and holds the initial
    /// authorities until renounce.
    pub payer: Pubkey,

    /// The mint account to create; its keypair must be held by the chain
    /// client since account creation requires its signature.
    pub mint: Pubkey,

    /// Recipient of the dev allocation.
    pub dev_wallet: Option<Pubkey>,

    /// Recipient of the marketing allocation.
    pub marketing_wallet: Option<Pubkey>,

    /// Recipient of the treasury fee share.
    pub treasury: Option<Pubkey>,

    /// Recipient of the liquidity-rewards fee share.
    pub liquidity_rewards: Option<Pubkey>,

    /// Identity of the AMM pool account; `None` skips pool provisioning.
    pub amm_id: Option<Pubkey>,
}

impl LaunchKeys {
    /// Keys for a minimal launch: payer and mint only.
    pub fn new(payer: Pubkey, mint: Pubkey) -> Self {
        LaunchKeys {
            payer,
            mint,
            dev_wallet: None,
            marketing_wallet: None,
            treasury: None,
            liquidity_rewards: None,
            amm_id: None,
        }
    }

    /// Where the dev allocation goes.
    pub fn dev_recipient(&self) -> Pubkey {
        self.dev_wallet.unwrap_or(self.payer)
    }

    /// Where the marketing allocation goes.
    pub fn marketing_recipient(&self) -> Pubkey {
        self.marketing_wallet.unwrap_or(self.payer)
    }

    /// Where the treasury fee share goes.
    pub fn treasury_recipient(&self) -> Pubkey {
        self.treasury.unwrap_or(self.payer)
    }

    /// Where the liquidity-rewards fee share goes.
    pub fn liquidity_rewards_recipient(&self) -> Pubkey {
        self.liquidity_rewards.unwrap_or(self.payer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LaunchConfig::default();
        assert_eq!(config.decimals, 9);
        assert_eq!(config.total_supply, 1_000_000_000);
        assert_eq!(config.liquidity_lock_days, 365);
        assert_eq!(config.launch_duration_hours, 24);
        assert!(config.renounce_authorities);
        assert!(config.fee_config.is_none());
        assert!(config.validate().is_ok());

        // Without a fee config the launch targets the classic token program.
        assert_eq!(config.token_program(), TOKEN_PROGRAM_ID);
        assert_eq!(config.mint_space(), MINT_ACCOUNT_LEN);
    }

    #[test]
    fn test_default_fee_config_schedule() {
        let fee_config = CreatorFeeConfig::default();
        assert_eq!(fee_config.transfer_fee_basis_points, 200);
        assert_eq!(fee_config.maximum_fee, 1_000_000);
        assert!(fee_config.validate().is_ok());

        let thresholds: Vec<u64> = fee_config.volume_milestones.keys().copied().collect();
        assert_eq!(thresholds, vec![1_000_000, 10_000_000, 100_000_000]);
        assert_eq!(fee_config.volume_milestones[&100_000_000], 200_000);
    }

    #[test]
    fn test_fee_config_switches_token_program() {
        let config = LaunchConfig {
            fee_config: Some(CreatorFeeConfig::default()),
            ..LaunchConfig::default()
        };
        assert_eq!(config.token_program(), TOKEN_2022_PROGRAM_ID);
        assert_eq!(config.mint_space(), MINT_WITH_TRANSFER_FEE_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_supply_base_units() {
        let config = LaunchConfig::default();
        assert_eq!(config.supply_base_units().unwrap(), 1_000_000_000_000_000_000);

        // u64::MAX whole tokens at 9 decimals cannot fit.
        let too_big = LaunchConfig {
            total_supply: u64::MAX,
            ..LaunchConfig::default()
        };
        assert!(matches!(
            too_big.supply_base_units().unwrap_err(),
            AllocationError::SupplyOverflow { .. }
        ));

        // Absurd decimals overflow the power itself.
        let too_precise = LaunchConfig {
            decimals: 60,
            ..LaunchConfig::default()
        };
        assert!(too_precise.supply_base_units().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative_liquidity = LaunchConfig {
            initial_liquidity_sol: -1.0,
            ..LaunchConfig::default()
        };
        assert!(matches!(
            negative_liquidity.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));

        let over_allocated = LaunchConfig {
            dev_percentage: 70.0,
            marketing_percentage: 40.0,
            ..LaunchConfig::default()
        };
        assert!(matches!(
            over_allocated.validate().unwrap_err(),
            ConfigError::Allocation(AllocationError::ShareSumExceedsTotal { .. })
        ));

        let wild_slippage = LaunchConfig {
            slippage_percent: 150.0,
            ..LaunchConfig::default()
        };
        assert!(matches!(
            wild_slippage.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));

        let nan_price = LaunchConfig {
            launch_price_per_million: f64::NAN,
            ..LaunchConfig::default()
        };
        assert!(matches!(
            nan_price.validate().unwrap_err(),
            ConfigError::Invalid(_)
        ));

        let absurd_fee = LaunchConfig {
            fee_config: Some(CreatorFeeConfig {
                transfer_fee_basis_points: 10_001,
                ..CreatorFeeConfig::default()
            }),
            ..LaunchConfig::default()
        };
        assert!(matches!(
            absurd_fee.validate().unwrap_err(),
            ConfigError::Encoding(EncodingError::FeeBasisPointsTooHigh(10_001))
        ));
    }

    #[test]
    fn test_metadata_validation_delegates_to_encoding_limits() {
        let creator = Pubkey::new_unique();
        let ok = TokenMetadata::new("Moon Token", "MOON", "https://example.com/m.json", creator);
        assert!(ok.validate().is_ok());

        let long_symbol = TokenMetadata::new("Moon", "WAYTOOLONGSYM", "https://x", creator);
        assert!(matches!(
            long_symbol.validate().unwrap_err(),
            EncodingError::FieldTooLong { field: "symbol", .. }
        ));
    }

    #[test]
    fn test_optional_keys_fall_back_to_payer() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut keys = LaunchKeys::new(payer, mint);

        assert_eq!(keys.dev_recipient(), payer);
        assert_eq!(keys.marketing_recipient(), payer);
        assert_eq!(keys.treasury_recipient(), payer);
        assert_eq!(keys.liquidity_rewards_recipient(), payer);

        let dev = Pubkey::new_unique();
        keys.dev_wallet = Some(dev);
        assert_eq!(keys.dev_recipient(), dev);
        assert_eq!(keys.marketing_recipient(), payer);
    }

    #[test]
    fn test_antibot_config_mapping() {
        let config = LaunchConfig {
            max_buy_percentage: 2.5,
            purchase_cooldown_seconds: 120,
            ..LaunchConfig::default()
        };
        let antibot = config.antibot_config();
        assert_eq!(antibot.max_buy_percentage, 2.5);
        assert_eq!(antibot.cooldown_seconds, 120);
    }
}
