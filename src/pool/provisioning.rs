// src/pool/provisioning.rs
//! Pool parameter assembly and the provisioner trait

use log::{info, warn};
use solana_program::pubkey::Pubkey;

use crate::allocation::min_amounts_after_slippage;
use crate::encoding::{
    amm_authority, amm_open_orders, amm_target_orders, DerivedAddress, WSOL_MINT,
};
use crate::error::{AllocationError, PoolError};

/// Parameters of the OpenBook market backing a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParams {
    /// Smallest tradable base quantity.
    pub base_lot_size: u64,

    /// Smallest tradable quote quantity.
    pub quote_lot_size: u64,

    /// Taker fee, in basis points.
    pub fee_rate_bps: u16,

    /// Base-side crumbs below this are swept.
    pub base_dust_threshold: u64,

    /// Quote-side crumbs below this are swept.
    pub quote_dust_threshold: u64,
}

impl Default for MarketParams {
    fn default() -> Self {
        MarketParams {
            base_lot_size: 1,
            quote_lot_size: 1,
            fee_rate_bps: 0,
            base_dust_threshold: 100,
            quote_dust_threshold: 100,
        }
    }
}

/// Everything a pool collaborator needs to open a token/WSOL pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolParams {
    /// Identity of the AMM pool account.
    pub amm_id: Pubkey,

    /// The launched token.
    pub base_mint: Pubkey,

    /// The quote side; always wrapped SOL for launches.
    pub quote_mint: Pubkey,

    /// Base tokens deposited, in base units.
    pub base_amount: u64,

    /// Quote deposited, in lamports.
    pub quote_amount: u64,

    /// Slippage floor for the base deposit.
    pub min_base_amount: u64,

    /// Slippage floor for the quote deposit.
    pub min_quote_amount: u64,

    /// Epoch seconds at which trading opens.
    pub open_time: u64,

    /// Quote per whole base token implied by the deposits.
    pub initial_price: f64,

    /// Backing order-book parameters.
    pub market: MarketParams,

    /// Vault authority derived from the pool identity.
    pub amm_authority: DerivedAddress,

    /// Open-orders account derived from the pool identity.
    pub amm_open_orders: DerivedAddress,

    /// Target-orders account derived from the pool identity.
    pub amm_target_orders: DerivedAddress,
}

impl PoolParams {
    /// Assembles pool parameters for a token/WSOL pool.
    ///
    /// `base_amount` is the token deposit in base units, `quote_amount` the
    /// SOL deposit in lamports, and `slippage_percent` the tolerance applied
    /// to both slippage floors. Empty deposits are rejected; a pool cannot
    /// open without both reserves.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        amm_id: &Pubkey,
        base_mint: &Pubkey,
        base_amount: u64,
        quote_amount: u64,
        decimals: u8,
        slippage_percent: f64,
        open_time: u64,
        market: MarketParams,
    ) -> Result<Self, PoolError> {
        if base_amount == 0 || quote_amount == 0 {
            return Err(PoolError::Allocation(AllocationError::EmptyPool));
        }

        let (min_base_amount, min_quote_amount) =
            min_amounts_after_slippage(base_amount, quote_amount, slippage_percent)?;

        // Price in SOL per whole token, so the figure survives decimals.
        let whole_tokens = base_amount as f64 / 10f64.powi(decimals as i32);
        let sol = quote_amount as f64 / 1e9;
        let initial_price = sol / whole_tokens;

        Ok(PoolParams {
            amm_id: *amm_id,
            base_mint: *base_mint,
            quote_mint: WSOL_MINT,
            base_amount,
            quote_amount,
            min_base_amount,
            min_quote_amount,
            open_time,
            initial_price,
            market,
            amm_authority: amm_authority(amm_id)?,
            amm_open_orders: amm_open_orders(amm_id)?,
            amm_target_orders: amm_target_orders(amm_id)?,
        })
    }
}

/// How far a provisioner got with the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    /// The pool exists on chain and trading opens at `open_time`.
    Provisioned,

    /// Parameters were recorded but the pool must be created with the
    /// vendor SDK out of band.
    RequiresExternalSdk,
}

/// Receipt returned by a provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReceipt {
    /// The pool identity the parameters were bound to.
    pub amm_id: Pubkey,

    /// How far provisioning got.
    pub status: PoolStatus,

    /// LP token mint, once one exists.
    pub lp_mint: Option<Pubkey>,

    /// Transaction that created the pool, if one was submitted.
    pub signature: Option<String>,
}

/// The external collaborator that actually opens the pool.
pub trait PoolProvisioner {
    /// Provisions (or records) a pool for the given parameters.
    fn provision(&self, params: &PoolParams) -> Result<PoolReceipt, PoolError>;
}

/// Fallback provisioner used when no vendor SDK integration is wired up: it
/// logs the full parameter set for an operator to execute manually and
/// reports [`PoolStatus::RequiresExternalSdk`].
#[derive(Debug, Default)]
pub struct ManualPoolSetup;

impl PoolProvisioner for ManualPoolSetup {
    fn provision(&self, params: &PoolParams) -> Result<PoolReceipt, PoolError> {
        info!(
            "pool parameters for {}: {} base units + {} lamports, price {:.9} SOL, opens at {}",
            params.amm_id,
            params.base_amount,
            params.quote_amount,
            params.initial_price,
            params.open_time
        );
        info!(
            "derived accounts: authority {} (bump {}), open orders {}, target orders {}",
            params.amm_authority.address,
            params.amm_authority.bump,
            params.amm_open_orders.address,
            params.amm_target_orders.address
        );
        warn!("pool creation requires the vendor AMM SDK; recording parameters only");

        Ok(PoolReceipt {
            amm_id: params.amm_id,
            status: PoolStatus::RequiresExternalSdk,
            lp_mint: None,
            signature: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_computes_floors_and_price() {
        let amm_id = Pubkey::new_unique();
        let base_mint = Pubkey::new_unique();

        // 920M whole tokens (9 decimals) against 10 SOL, 0.5% slippage.
        let params = PoolParams::assemble(
            &amm_id,
            &base_mint,
            920_000_000_000_000_000,
            10_000_000_000,
            9,
            0.5,
            1_700_000_000,
            MarketParams::default(),
        )
        .unwrap();

        assert_eq!(params.quote_mint, WSOL_MINT);
        assert_eq!(params.min_base_amount, 915_400_000_000_000_000);
        assert_eq!(params.min_quote_amount, 9_950_000_000);

        // 10 SOL / 920M tokens.
        let expected_price = 10.0 / 920_000_000.0;
        assert!((params.initial_price - expected_price).abs() < 1e-15);
    }

    #[test]
    fn test_assemble_derives_amm_accounts() {
        let amm_id = Pubkey::new_unique();
        let params = PoolParams::assemble(
            &amm_id,
            &Pubkey::new_unique(),
            1_000,
            1_000,
            0,
            1.0,
            0,
            MarketParams::default(),
        )
        .unwrap();

        // Each derivation binds to the pool identity and they never collide.
        assert_eq!(
            params.amm_authority,
            crate::encoding::amm_authority(&amm_id).unwrap()
        );
        assert_ne!(params.amm_authority.address, params.amm_open_orders.address);
        assert_ne!(
            params.amm_open_orders.address,
            params.amm_target_orders.address
        );
    }

    #[test]
    fn test_assemble_rejects_empty_deposits() {
        let amm_id = Pubkey::new_unique();
        let base_mint = Pubkey::new_unique();

        for (base, quote) in [(0u64, 1_000u64), (1_000, 0)] {
            let err = PoolParams::assemble(
                &amm_id,
                &base_mint,
                base,
                quote,
                9,
                0.5,
                0,
                MarketParams::default(),
            )
            .unwrap_err();
            assert_eq!(err, PoolError::Allocation(AllocationError::EmptyPool));
        }
    }

    #[test]
    fn test_manual_setup_reports_external_sdk() {
        let amm_id = Pubkey::new_unique();
        let params = PoolParams::assemble(
            &amm_id,
            &Pubkey::new_unique(),
            1_000_000,
            5_000_000,
            6,
            0.5,
            42,
            MarketParams::default(),
        )
        .unwrap();

        let receipt = ManualPoolSetup.provision(&params).unwrap();
        assert_eq!(receipt.amm_id, amm_id);
        assert_eq!(receipt.status, PoolStatus::RequiresExternalSdk);
        assert_eq!(receipt.lp_mint, None);
        assert_eq!(receipt.signature, None);
    }
}
