// src/launch/orchestrator.rs
//! The launch pipeline
//!
//! Drives a complete token launch through an ordered sequence of steps:
//!
//! 1. Preflight: validate the configuration and metadata, compute the
//!    allocation, and check the payer can fund rent plus fees. Nothing is
//!    submitted until this passes.
//! 2. Mint creation: create and initialize the mint (with the transfer-fee
//!    extension first when configured; it only installs on an uninitialized
//!    mint).
//! 3. Metadata creation: attach the Metaplex metadata account.
//! 4. Supply distribution: mint each allocation to its token account and
//!    burn the burn share.
//! 5. Fee account setup: create the fee recipients' token accounts.
//! 6. Pool provisioning: assemble pool parameters and hand them to the
//!    collaborator.
//! 7. Authority renounce: drop the mint authority and freeze the metadata.
//! 8. Verification: read back the chain and compare supply and accounts.
//!
//! Chain state is never rolled back. A failure after the first mutating
//! step surfaces as [`LaunchError::PartialCompletion`] carrying the exact
//! list of completed steps, so an operator can resume or clean up by hand.

use std::collections::{BTreeMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use solana_program::{
    incinerator, instruction::Instruction, pubkey::Pubkey, system_instruction,
};

use super::config::{LaunchConfig, LaunchKeys, TokenMetadata};
use super::summary::{
    fingerprint_config, ExplorerLinks, LaunchSummary, MetadataSnapshot, PoolSnapshot,
    TransactionRecord,
};
use crate::allocation::{calculate_price_impact, LaunchAllocation};
use crate::antibot::{AntiBotConfig, AntiBotRateLimiter, PurchaseRejection};
use crate::chain::{submit_and_confirm, ChainClient, RetryPolicy, TxSignature};
use crate::encoding::{
    burn_checked, create_associated_token_account, create_metadata_account_v3, initialize_mint,
    initialize_transfer_fee_config, metadata_account, mint_to, set_authority,
    update_metadata_as_immutable, AuthorityType, Creator, DataV2, DerivedAddress,
    TransferFeeConfigInit,
};
use crate::error::{LaunchError, LaunchStep};
use crate::pool::{MarketParams, PoolParams, PoolProvisioner};
use crate::rewards::{MilestoneReward, VolumeMilestoneTracker};

/// Lamports reserved for transaction fees on top of the mint rent when the
/// payer balance is checked (0.1 SOL).
const FEE_BUFFER_LAMPORTS: u64 = 100_000_000;

/// Runs launches against a chain client and owns the per-launch trading
/// guards (anti-bot limiter, volume milestone tracker).
pub struct LaunchOrchestrator<C: ChainClient> {
    chain: C,
    retry_policy: RetryPolicy,
    rate_limiter: AntiBotRateLimiter,
    volume_tracker: VolumeMilestoneTracker,
}

struct Distribution {
    token_accounts: BTreeMap<String, String>,
    transactions: Vec<TransactionRecord>,
}

impl<C: ChainClient> LaunchOrchestrator<C> {
    /// Creates an orchestrator with default retry and anti-bot settings.
    pub fn new(chain: C) -> Self {
        Self::with_policies(chain, RetryPolicy::default(), AntiBotConfig::default())
    }

    /// Creates an orchestrator with explicit policies.
    pub fn with_policies(chain: C, retry_policy: RetryPolicy, antibot: AntiBotConfig) -> Self {
        LaunchOrchestrator {
            chain,
            retry_policy,
            rate_limiter: AntiBotRateLimiter::with_config(antibot),
            volume_tracker: VolumeMilestoneTracker::new(),
        }
    }

    /// The underlying chain client.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Consults the anti-bot limiter for a purchase attempt.
    pub fn check_purchase(
        &mut self,
        buyer: &Pubkey,
        amount: u64,
        total_supply: u64,
        timestamp: u64,
    ) -> Result<(), PurchaseRejection> {
        self.rate_limiter
            .check_purchase(buyer, amount, total_supply, timestamp)
    }

    /// Largest single buy the limiter currently allows.
    pub fn max_buy_amount(&self, total_supply: u64) -> u64 {
        self.rate_limiter.max_buy_amount(total_supply)
    }

    /// Feeds traded volume into the milestone tracker.
    pub fn record_trade_volume(
        &mut self,
        mint: &Pubkey,
        delta: u64,
        milestones: &BTreeMap<u64, u64>,
    ) -> Option<MilestoneReward> {
        self.volume_tracker.record_volume(mint, delta, milestones)
    }

    /// Cumulative volume recorded for a token.
    pub fn cumulative_volume(&self, mint: &Pubkey) -> u64 {
        self.volume_tracker.cumulative_volume(mint)
    }

    /// Runs the whole launch pipeline and returns the summary artifact.
    ///
    /// Also re-arms the anti-bot limiter with this launch's thresholds,
    /// dropping history from any previous launch.
    pub fn execute_launch<P: PoolProvisioner>(
        &mut self,
        keys: &LaunchKeys,
        metadata: &TokenMetadata,
        config: &LaunchConfig,
        pool: &P,
    ) -> Result<LaunchSummary, LaunchError> {
        info!(
            "launching {} ({}) with mint {}",
            metadata.name, metadata.symbol, keys.mint
        );

        // Preflight. Nothing is submitted until everything here passes.
        config.validate()?;
        metadata.validate()?;
        let base_units = config.supply_base_units()?;
        let allocation = LaunchAllocation::from_percentages(
            base_units,
            config.dev_percentage,
            config.marketing_percentage,
            config.burn_percentage,
        )?;
        let token_program = config.token_program();
        let metadata_pda = metadata_account(&keys.mint)?;

        let mint_rent = self
            .chain
            .minimum_balance_for_rent_exemption(config.mint_space())?;
        let required = mint_rent.saturating_add(FEE_BUFFER_LAMPORTS);
        let available = self.chain.get_balance(&keys.payer)?;
        if available < required {
            return Err(LaunchError::InsufficientBalance {
                required,
                available,
            });
        }
        info!(
            "{} passed: {} base units allocated as {:?}, balance {} of {} required",
            LaunchStep::Preflight,
            allocation.total,
            allocation,
            available,
            required
        );

        self.rate_limiter = AntiBotRateLimiter::with_config(config.antibot_config());

        let mut completed: Vec<LaunchStep> = Vec::new();
        let mut transactions: Vec<TransactionRecord> = Vec::new();

        let signature = self
            .create_mint(keys, config, &token_program, mint_rent)
            .map_err(|e| Self::partial(&completed, LaunchStep::MintCreation, e))?;
        transactions.push(TransactionRecord {
            step: LaunchStep::MintCreation.to_string(),
            signature: signature.to_string(),
        });
        completed.push(LaunchStep::MintCreation);

        let signature = self
            .create_metadata(keys, metadata, config, &metadata_pda)
            .map_err(|e| Self::partial(&completed, LaunchStep::MetadataCreation, e))?;
        transactions.push(TransactionRecord {
            step: LaunchStep::MetadataCreation.to_string(),
            signature: signature.to_string(),
        });
        completed.push(LaunchStep::MetadataCreation);

        let distribution = self
            .distribute_supply(keys, config, &allocation, &token_program)
            .map_err(|e| Self::partial(&completed, LaunchStep::SupplyDistribution, e))?;
        transactions.extend(distribution.transactions);
        completed.push(LaunchStep::SupplyDistribution);

        let mut fee_accounts = BTreeMap::new();
        if config.uses_transfer_fee() {
            let (accounts, record) = self
                .setup_fee_accounts(keys, &metadata.creator_wallet, &token_program)
                .map_err(|e| Self::partial(&completed, LaunchStep::FeeAccountSetup, e))?;
            fee_accounts = accounts;
            if let Some(record) = record {
                transactions.push(record);
            }
            completed.push(LaunchStep::FeeAccountSetup);
        }

        let pool_snapshot = match keys.amm_id {
            Some(amm_id) if config.initial_liquidity_sol > 0.0 => {
                let snapshot = self
                    .provision_pool(&amm_id, keys, config, &allocation, pool)
                    .map_err(|e| Self::partial(&completed, LaunchStep::PoolProvisioning, e))?;
                completed.push(LaunchStep::PoolProvisioning);
                Some(snapshot)
            }
            _ => {
                info!(
                    "no pool identity or no liquidity configured; skipping {}",
                    LaunchStep::PoolProvisioning
                );
                None
            }
        };

        if config.renounce_authorities {
            let signature = self
                .renounce_authorities(keys, &token_program, &metadata_pda)
                .map_err(|e| Self::partial(&completed, LaunchStep::AuthorityRenounce, e))?;
            transactions.push(TransactionRecord {
                step: LaunchStep::AuthorityRenounce.to_string(),
                signature: signature.to_string(),
            });
            completed.push(LaunchStep::AuthorityRenounce);
        } else {
            warn!(
                "authorities retained: {} keeps mint authority and metadata control",
                keys.payer
            );
        }

        self.verify_launch(keys, &metadata_pda, &allocation)
            .map_err(|e| Self::partial(&completed, LaunchStep::Verification, e))?;
        completed.push(LaunchStep::Verification);

        let summary = LaunchSummary {
            timestamp: now_epoch_seconds(),
            mint: keys.mint.to_string(),
            metadata_account: metadata_pda.address.to_string(),
            token_program: token_program.to_string(),
            decimals: config.decimals,
            total_supply_base_units: allocation.total,
            allocation,
            circulating_supply: allocation.circulating(),
            token_accounts: distribution.token_accounts,
            fee_accounts,
            transactions,
            pool: pool_snapshot,
            explorer: ExplorerLinks::for_mint(&keys.mint.to_string()),
            metadata: MetadataSnapshot::from(metadata),
            config: config.clone(),
            config_fingerprint: fingerprint_config(config)?,
        };
        info!(
            "launch of {} complete: {} transactions, config fingerprint {}",
            summary.mint,
            summary.transactions.len(),
            summary.config_fingerprint
        );
        Ok(summary)
    }

    /// Wraps a step failure into a partial-completion error once any
    /// mutating step has finished; before that the underlying error passes
    /// through untouched.
    fn partial(completed: &[LaunchStep], failed: LaunchStep, source: LaunchError) -> LaunchError {
        if completed.is_empty() {
            return source;
        }
        error!(
            "launch halted at '{}' after {:?}: {}",
            failed, completed, source
        );
        LaunchError::PartialCompletion {
            completed: completed.to_vec(),
            failed,
            source: Box::new(source),
        }
    }

    fn create_mint(
        &self,
        keys: &LaunchKeys,
        config: &LaunchConfig,
        token_program: &Pubkey,
        mint_rent: u64,
    ) -> Result<TxSignature, LaunchError> {
        let mut instructions = vec![system_instruction::create_account(
            &keys.payer,
            &keys.mint,
            mint_rent,
            config.mint_space() as u64,
            token_program,
        )];

        if let Some(fee_config) = &config.fee_config {
            let init_fee = initialize_transfer_fee_config(
                &keys.mint,
                &TransferFeeConfigInit {
                    transfer_fee_config_authority: Some(keys.payer),
                    withdraw_withheld_authority: Some(keys.treasury_recipient()),
                    transfer_fee_basis_points: fee_config.transfer_fee_basis_points,
                    maximum_fee: fee_config.maximum_fee,
                },
            )?;
            debug!("transfer fee config data: {}", hex::encode(&init_fee.data));
            instructions.push(init_fee);
        }

        instructions.push(initialize_mint(
            token_program,
            &keys.mint,
            config.decimals,
            &keys.payer,
            None,
        ));

        let signature = submit_and_confirm(
            &self.chain,
            &self.retry_policy,
            &instructions,
            &[keys.payer, keys.mint],
        )?;
        info!(
            "mint {} created with {} instructions: {}",
            keys.mint,
            instructions.len(),
            signature
        );
        Ok(signature)
    }

    fn create_metadata(
        &self,
        keys: &LaunchKeys,
        metadata: &TokenMetadata,
        config: &LaunchConfig,
        metadata_pda: &DerivedAddress,
    ) -> Result<TxSignature, LaunchError> {
        let data = DataV2 {
            name: metadata.name.clone(),
            symbol: metadata.symbol.clone(),
            uri: metadata.uri.clone(),
            seller_fee_basis_points: config
                .fee_config
                .as_ref()
                .map(|fee| fee.transfer_fee_basis_points)
                .unwrap_or(0),
            // The program only accepts a verified creator when that creator
            // signs, and the payer is the sole signer here.
            creators: Some(vec![Creator {
                address: metadata.creator_wallet,
                verified: metadata.creator_wallet == keys.payer,
                share: 100,
            }]),
            collection: None,
            uses: None,
        };

        let instruction = create_metadata_account_v3(
            &metadata_pda.address,
            &keys.mint,
            &keys.payer,
            &keys.payer,
            &keys.payer,
            &data,
            true,
        )?;
        debug!(
            "metadata instruction data: {}",
            hex::encode(&instruction.data)
        );

        let signature = submit_and_confirm(
            &self.chain,
            &self.retry_policy,
            &[instruction],
            &[keys.payer],
        )?;
        info!(
            "metadata account {} created: {}",
            metadata_pda.address, signature
        );
        Ok(signature)
    }

    fn distribute_supply(
        &self,
        keys: &LaunchKeys,
        config: &LaunchConfig,
        allocation: &LaunchAllocation,
        token_program: &Pubkey,
    ) -> Result<Distribution, LaunchError> {
        let buckets = [
            ("liquidity", keys.payer, allocation.liquidity),
            ("dev", keys.dev_recipient(), allocation.dev),
            ("marketing", keys.marketing_recipient(), allocation.marketing),
        ];

        let mut token_accounts = BTreeMap::new();
        let mut transactions = Vec::new();

        for (label, owner, amount) in buckets {
            if amount == 0 {
                debug!("skipping empty '{}' allocation", label);
                continue;
            }

            let (account, create_ix) =
                self.token_account_with_create(&keys.payer, &owner, &keys.mint, token_program)?;
            let mut instructions = Vec::new();
            if let Some(create) = create_ix {
                instructions.push(create);
            }
            instructions.push(mint_to(
                token_program,
                &keys.mint,
                &account.address,
                &keys.payer,
                amount,
            ));

            let signature = submit_and_confirm(
                &self.chain,
                &self.retry_policy,
                &instructions,
                &[keys.payer],
            )?;
            info!(
                "minted {} base units to '{}' account {}: {}",
                amount, label, account.address, signature
            );
            token_accounts.insert(label.to_string(), account.address.to_string());
            transactions.push(TransactionRecord {
                step: format!("{} ({})", LaunchStep::SupplyDistribution, label),
                signature: signature.to_string(),
            });
        }

        // The burn share is minted to the payer's own account and destroyed
        // in the same transaction, so it never sits spendable anywhere.
        if allocation.burn > 0 {
            let (account, create_ix) = self.token_account_with_create(
                &keys.payer,
                &keys.payer,
                &keys.mint,
                token_program,
            )?;
            let mut instructions = Vec::new();
            if let Some(create) = create_ix {
                instructions.push(create);
            }
            instructions.push(mint_to(
                token_program,
                &keys.mint,
                &account.address,
                &keys.payer,
                allocation.burn,
            ));
            instructions.push(burn_checked(
                token_program,
                &account.address,
                &keys.mint,
                &keys.payer,
                allocation.burn,
                config.decimals,
            ));

            let signature = submit_and_confirm(
                &self.chain,
                &self.retry_policy,
                &instructions,
                &[keys.payer],
            )?;
            info!(
                "burned {} base units at launch: {}",
                allocation.burn, signature
            );
            transactions.push(TransactionRecord {
                step: format!("{} (burn)", LaunchStep::SupplyDistribution),
                signature: signature.to_string(),
            });
        }

        Ok(Distribution {
            token_accounts,
            transactions,
        })
    }

    fn setup_fee_accounts(
        &self,
        keys: &LaunchKeys,
        creator_wallet: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<(BTreeMap<String, String>, Option<TransactionRecord>), LaunchError> {
        // The burn share of swept fees goes to the incinerator's token
        // account, the only address the runtime itself guarantees is a dead
        // end.
        let recipients = [
            ("creator", *creator_wallet),
            ("treasury", keys.treasury_recipient()),
            ("liquidity_rewards", keys.liquidity_rewards_recipient()),
            ("burn", incinerator::id()),
        ];

        let mut fee_accounts = BTreeMap::new();
        let mut instructions = Vec::new();
        let mut queued = HashSet::new();

        for (label, owner) in recipients {
            let (account, create_ix) =
                self.token_account_with_create(&keys.payer, &owner, &keys.mint, token_program)?;
            fee_accounts.insert(label.to_string(), account.address.to_string());

            // Recipients may share a wallet; create each account only once.
            if let Some(create) = create_ix {
                if queued.insert(account.address) {
                    instructions.push(create);
                }
            }
        }

        if instructions.is_empty() {
            debug!("all fee accounts already exist");
            return Ok((fee_accounts, None));
        }

        let signature = submit_and_confirm(
            &self.chain,
            &self.retry_policy,
            &instructions,
            &[keys.payer],
        )?;
        info!("created {} fee accounts: {}", instructions.len(), signature);
        Ok((
            fee_accounts,
            Some(TransactionRecord {
                step: LaunchStep::FeeAccountSetup.to_string(),
                signature: signature.to_string(),
            }),
        ))
    }

    fn provision_pool<P: PoolProvisioner>(
        &self,
        amm_id: &Pubkey,
        keys: &LaunchKeys,
        config: &LaunchConfig,
        allocation: &LaunchAllocation,
        pool: &P,
    ) -> Result<PoolSnapshot, LaunchError> {
        let params = PoolParams::assemble(
            amm_id,
            &keys.mint,
            allocation.liquidity,
            sol_to_lamports(config.initial_liquidity_sol),
            config.decimals,
            config.slippage_percent,
            now_epoch_seconds(),
            MarketParams::default(),
        )?;
        let whole_supply = allocation.total as f64 / 10f64.powi(config.decimals as i32);
        info!(
            "pool opens at {:.6} SOL per million tokens (target {:.6}); implied market cap {:.2} SOL, liquidity locked {} days",
            params.initial_price * 1e6,
            config.launch_price_per_million,
            whole_supply * params.initial_price,
            config.liquidity_lock_days
        );

        // Depth telemetry: how hard the largest permitted buy would move
        // the opening price.
        let max_buy = self.rate_limiter.max_buy_amount(allocation.total);
        if let Ok(impact) =
            calculate_price_impact(params.base_amount, params.quote_amount, max_buy, false)
        {
            info!(
                "pool depth: max allowed buy of {} base units moves price ~{:.2}%",
                max_buy, impact
            );
        }

        let receipt = pool.provision(&params)?;
        info!(
            "pool {} provisioning status: {:?}",
            params.amm_id, receipt.status
        );
        Ok(PoolSnapshot::new(&params, &receipt))
    }

    fn renounce_authorities(
        &self,
        keys: &LaunchKeys,
        token_program: &Pubkey,
        metadata_pda: &DerivedAddress,
    ) -> Result<TxSignature, LaunchError> {
        let instructions = vec![
            set_authority(
                token_program,
                &keys.mint,
                &keys.payer,
                AuthorityType::MintTokens,
                None,
            ),
            update_metadata_as_immutable(&metadata_pda.address, &keys.payer)?,
        ];

        let signature = submit_and_confirm(
            &self.chain,
            &self.retry_policy,
            &instructions,
            &[keys.payer],
        )?;
        info!(
            "mint authority renounced and metadata frozen: {}",
            signature
        );
        Ok(signature)
    }

    fn verify_launch(
        &self,
        keys: &LaunchKeys,
        metadata_pda: &DerivedAddress,
        allocation: &LaunchAllocation,
    ) -> Result<(), LaunchError> {
        if self.chain.get_account_info(&keys.mint)?.is_none() {
            return Err(LaunchError::Verification(format!(
                "mint account {} does not exist",
                keys.mint
            )));
        }
        if self.chain.get_account_info(&metadata_pda.address)?.is_none() {
            return Err(LaunchError::Verification(format!(
                "metadata account {} does not exist",
                metadata_pda.address
            )));
        }

        let supply = self.chain.get_token_supply(&keys.mint)?;
        let expected = allocation.circulating();
        if supply != expected {
            return Err(LaunchError::Verification(format!(
                "on-chain supply {} does not match expected {}",
                supply, expected
            )));
        }

        info!(
            "{} passed: supply {} matches, accounts exist",
            LaunchStep::Verification,
            supply
        );
        Ok(())
    }

    fn token_account_with_create(
        &self,
        payer: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<(DerivedAddress, Option<Instruction>), LaunchError> {
        let (create_ix, derived) =
            create_associated_token_account(payer, owner, mint, token_program)?;
        let existing = self.chain.get_account_info(&derived.address)?;
        Ok((derived, existing.is_none().then_some(create_ix)))
    }
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn sol_to_lamports(sol: f64) -> u64 {
    (sol * 1e9).round() as u64
}
