// src/encoding/mod.rs
//! Binary instruction encoding
//!
//! Builds the exact byte payloads and account lists the on-chain programs
//! expect, without linking any program SDK:
//! - `metadata`: Metaplex token-metadata instructions
//! - `token`: SPL Token / Token-2022 / associated-token-account instructions
//! - `address`: program-derived address helpers
//!
//! [`InstructionPayload`] is the single entry point that turns a logical
//! instruction description into wire bytes; the per-program modules also
//! expose full [`Instruction`](solana_program::instruction::Instruction)
//! builders that pair those bytes with the right account metas.

mod address;
mod metadata;
mod token;

pub use address::{
    amm_authority, amm_open_orders, amm_target_orders, associated_token_address, derive_address,
    metadata_account, DerivedAddress, METADATA_SEED, OPENBOOK_PROGRAM_ID, OPEN_ORDERS_SEED,
    RAYDIUM_AMM_PROGRAM_ID, TARGET_ORDERS_SEED, WSOL_MINT,
};
pub use metadata::{
    create_metadata_account_v3, decode_create_metadata_v3, encode_create_metadata_v3,
    encode_update_metadata_immutable, update_metadata_as_immutable, validate_metadata_fields,
    Collection, CollectionDetails, CreateMetadataAccountArgsV3, Creator, DataV2,
    UpdateMetadataAccountArgsV2, UseMethod, Uses, CREATE_METADATA_ACCOUNT_V3, MAX_NAME_LENGTH,
    MAX_SYMBOL_LENGTH, MAX_URI_LENGTH, TOKEN_METADATA_PROGRAM_ID, UPDATE_METADATA_ACCOUNT_V2,
};
pub use token::{
    burn_checked, create_associated_token_account, decode_initialize_transfer_fee_config,
    encode_burn_checked, encode_initialize_mint, encode_initialize_transfer_fee_config,
    encode_mint_to, encode_set_authority, initialize_mint, initialize_transfer_fee_config,
    mint_to, set_authority, AuthorityType, TransferFeeConfigInit, ASSOCIATED_TOKEN_PROGRAM_ID,
    MAX_TRANSFER_FEE_BASIS_POINTS, MINT_ACCOUNT_LEN, MINT_WITH_TRANSFER_FEE_LEN,
    TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

use solana_program::pubkey::Pubkey;

use crate::error::EncodingError;

/// A logical description of one launch-pipeline instruction, independent of
/// the accounts it will run against.
///
/// [`encode`](InstructionPayload::encode) turns the description into the
/// byte payload the owning program deserializes. Account assembly lives in
/// the per-program builder functions since account lists differ per call
/// site while the data layout does not.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionPayload {
    /// Metaplex `CreateMetadataAccountV3`.
    MetadataCreate {
        name: String,
        symbol: String,
        uri: String,
        seller_fee_basis_points: u16,
        creators: Option<Vec<Creator>>,
        is_mutable: bool,
    },

    /// Metaplex `UpdateMetadataAccountV2` clearing only the mutability flag.
    MetadataUpdateImmutable,

    /// SPL Token / Token-2022 `InitializeMint`.
    InitializeMint {
        decimals: u8,
        mint_authority: Pubkey,
        freeze_authority: Option<Pubkey>,
    },

    /// Token-2022 `InitializeTransferFeeConfig`.
    InitializeTransferFeeConfig(TransferFeeConfigInit),

    /// `MintTo` in base units.
    MintTo { amount: u64 },

    /// `BurnChecked` in base units.
    BurnChecked { amount: u64, decimals: u8 },

    /// `SetAuthority`; `None` renounces the authority.
    SetAuthority {
        authority_type: AuthorityType,
        new_authority: Option<Pubkey>,
    },

    /// Associated-token-account `Create`.
    CreateAssociatedTokenAccount,
}

impl InstructionPayload {
    /// Encodes the payload into the exact bytes the owning program expects.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            InstructionPayload::MetadataCreate {
                name,
                symbol,
                uri,
                seller_fee_basis_points,
                creators,
                is_mutable,
            } => {
                let data = DataV2 {
                    name: name.clone(),
                    symbol: symbol.clone(),
                    uri: uri.clone(),
                    seller_fee_basis_points: *seller_fee_basis_points,
                    creators: creators.clone(),
                    collection: None,
                    uses: None,
                };
                encode_create_metadata_v3(&data, *is_mutable)
            }
            InstructionPayload::MetadataUpdateImmutable => encode_update_metadata_immutable(),
            InstructionPayload::InitializeMint {
                decimals,
                mint_authority,
                freeze_authority,
            } => Ok(encode_initialize_mint(
                *decimals,
                mint_authority,
                freeze_authority.as_ref(),
            )),
            InstructionPayload::InitializeTransferFeeConfig(config) => {
                encode_initialize_transfer_fee_config(config)
            }
            InstructionPayload::MintTo { amount } => Ok(encode_mint_to(*amount)),
            InstructionPayload::BurnChecked { amount, decimals } => {
                Ok(encode_burn_checked(*amount, *decimals))
            }
            InstructionPayload::SetAuthority {
                authority_type,
                new_authority,
            } => Ok(encode_set_authority(
                *authority_type,
                new_authority.as_ref(),
            )),
            InstructionPayload::CreateAssociatedTokenAccount => Ok(vec![0]),
        }
    }
}
