use crate::errors::QuoteError;
use crate::state::pool::PoolSnapshot;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::spl_token_2022::extension::transfer_fee::{
    TransferFee as TransferFeeExtension, MAX_FEE_BASIS_POINTS,
};
use rust_decimal::Decimal;

/// Token program that owns a mint
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenProgramKind {
    Token,
    Token2022,
}

impl Default for TokenProgramKind {
    fn default() -> Self {
        TokenProgramKind::Token
    }
}

impl TokenProgramKind {
    /// Recognise the SPL Token and Token-2022 program ids
    pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
        if *program_id == anchor_spl::token::ID {
            Some(TokenProgramKind::Token)
        } else if *program_id == anchor_spl::token_2022::ID {
            Some(TokenProgramKind::Token2022)
        } else {
            None
        }
    }

    pub fn program_id(&self) -> Pubkey {
        match self {
            TokenProgramKind::Token => anchor_spl::token::ID,
            TokenProgramKind::Token2022 => anchor_spl::token_2022::ID,
        }
    }

    /// Only Token-2022 mints carry extensions
    pub fn supports_extensions(&self) -> bool {
        matches!(self, TokenProgramKind::Token2022)
    }
}

/// Proportional transfer fee with a per-transfer cap
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferFee {
    /// Fee in basis points of the transferred amount
    pub fee_bps: u16,
    /// Maximum fee charged on a single transfer
    pub max_fee: u64,
}

impl TransferFee {
    pub fn new(fee_bps: u16, max_fee: u64) -> Self {
        Self { fee_bps, max_fee }
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.fee_bps <= MAX_FEE_BASIS_POINTS, QuoteError::InvalidTransferFee);
        Ok(())
    }

    /// Token-2022 extension state charging this fee in the current epoch
    pub fn as_extension(&self) -> TransferFeeExtension {
        TransferFeeExtension {
            epoch: 0u64.into(),
            maximum_fee: self.max_fee.into(),
            transfer_fee_basis_points: self.fee_bps.into(),
        }
    }
}

impl From<TransferFeeExtension> for TransferFee {
    fn from(extension: TransferFeeExtension) -> Self {
        Self {
            fee_bps: u16::from(extension.transfer_fee_basis_points),
            max_fee: u64::from(extension.maximum_fee),
        }
    }
}

/// What the engine needs to know about a mint
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintMeta {
    pub mint: Pubkey,
    pub decimals: u8,
    pub transfer_fee: Option<TransferFee>,
    /// Display multiplier of a scaled-UI-amount mint
    pub scaled_ui_multiplier: Option<Decimal>,
    pub is_non_transferable: bool,
    pub has_transfer_hook: bool,
    pub token_program: TokenProgramKind,
}

impl MintMeta {
    pub fn new(mint: Pubkey, decimals: u8) -> Self {
        Self {
            mint,
            decimals,
            ..Default::default()
        }
    }

    pub fn with_transfer_fee(mut self, fee_bps: u16, max_fee: u64) -> Self {
        self.transfer_fee = Some(TransferFee::new(fee_bps, max_fee));
        self.token_program = TokenProgramKind::Token2022;
        self
    }

    pub fn with_scaled_ui_multiplier(mut self, multiplier: Decimal) -> Self {
        self.scaled_ui_multiplier = Some(multiplier);
        self.token_program = TokenProgramKind::Token2022;
        self
    }

    pub fn with_non_transferable(mut self) -> Self {
        self.is_non_transferable = true;
        self.token_program = TokenProgramKind::Token2022;
        self
    }

    pub fn with_transfer_hook(mut self) -> Self {
        self.has_transfer_hook = true;
        self.token_program = TokenProgramKind::Token2022;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(transfer_fee) = self.transfer_fee {
            transfer_fee.validate()?;
        }
        if let Some(multiplier) = self.scaled_ui_multiplier {
            require!(
                multiplier.is_sign_positive() && !multiplier.is_zero(),
                QuoteError::InvalidUiMultiplier
            );
        }
        Ok(())
    }
}

/// Refuse operations that would move tokens of a non-transferable mint
pub fn ensure_transferable(meta: &MintMeta) -> Result<()> {
    require!(!meta.is_non_transferable, QuoteError::NonTransferableMint);
    Ok(())
}

/// Refuse mints whose transfers run a hook program the engine cannot simulate
pub fn ensure_no_transfer_hook(meta: &MintMeta) -> Result<()> {
    require!(!meta.has_transfer_hook, QuoteError::TransferHookMint);
    Ok(())
}

/// A quoted amount of this mint can move exactly as computed
pub fn ensure_settleable(meta: &MintMeta) -> Result<()> {
    ensure_transferable(meta)?;
    ensure_no_transfer_hook(meta)
}

/// Whether a position NFT of this mint may be handed to another owner
pub fn check_position_transferable(position_mint: &MintMeta) -> Result<()> {
    ensure_transferable(position_mint)
}

/// Metadata for both tokens of a pool
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintPair {
    pub mint_a: MintMeta,
    pub mint_b: MintMeta,
}

impl MintPair {
    pub fn new(mint_a: MintMeta, mint_b: MintMeta) -> Self {
        Self { mint_a, mint_b }
    }

    /// Both mints must be the pool's, well formed and settleable
    pub fn validate_for_pool(&self, pool: &PoolSnapshot) -> Result<()> {
        require_keys_eq!(self.mint_a.mint, pool.token_mint_a, QuoteError::MintMismatch);
        require_keys_eq!(self.mint_b.mint, pool.token_mint_b, QuoteError::MintMismatch);
        self.mint_a.validate()?;
        self.mint_b.validate()?;
        ensure_settleable(&self.mint_a)?;
        ensure_settleable(&self.mint_b)?;
        Ok(())
    }

    pub fn transfer_fee_a(&self) -> Option<TransferFee> {
        self.mint_a.transfer_fee
    }

    pub fn transfer_fee_b(&self) -> Option<TransferFee> {
        self.mint_b.transfer_fee
    }
}

/// Transfer fees of both tokens when metadata was supplied, after checking it
pub fn pool_transfer_fees(
    pool: &PoolSnapshot,
    mints: Option<&MintPair>,
) -> Result<(Option<TransferFee>, Option<TransferFee>)> {
    match mints {
        Some(mints) => {
            mints.validate_for_pool(pool)?;
            Ok((mints.transfer_fee_a(), mints.transfer_fee_b()))
        }
        None => Ok((None, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_kind_from_id() {
        assert_eq!(
            TokenProgramKind::from_program_id(&anchor_spl::token::ID),
            Some(TokenProgramKind::Token)
        );
        assert_eq!(
            TokenProgramKind::from_program_id(&anchor_spl::token_2022::ID),
            Some(TokenProgramKind::Token2022)
        );
        assert_eq!(TokenProgramKind::from_program_id(&Pubkey::new_unique()), None);
        assert_eq!(
            TokenProgramKind::Token2022.program_id(),
            anchor_spl::token_2022::ID
        );
        assert!(!TokenProgramKind::Token.supports_extensions());
    }

    #[test]
    fn test_transfer_fee_validation() {
        let meta = MintMeta::new(Pubkey::new_unique(), 6).with_transfer_fee(10_001, 0);
        assert_eq!(meta.validate().unwrap_err(), QuoteError::InvalidTransferFee.into());

        let meta = MintMeta::new(Pubkey::new_unique(), 6).with_transfer_fee(100, 5_000);
        assert!(meta.validate().is_ok());
        assert_eq!(meta.token_program, TokenProgramKind::Token2022);
    }

    #[test]
    fn test_transfer_fee_extension_conversion() {
        let fee = TransferFee::new(250, 9_000);
        let extension = fee.as_extension();
        assert_eq!(u16::from(extension.transfer_fee_basis_points), 250);
        assert_eq!(u64::from(extension.maximum_fee), 9_000);
        assert_eq!(TransferFee::from(extension), fee);
    }

    #[test]
    fn test_zero_ui_multiplier_rejected() {
        let meta = MintMeta::new(Pubkey::new_unique(), 6).with_scaled_ui_multiplier(Decimal::ZERO);
        assert_eq!(meta.validate().unwrap_err(), QuoteError::InvalidUiMultiplier.into());

        let meta = MintMeta::new(Pubkey::new_unique(), 6).with_scaled_ui_multiplier(-Decimal::ONE);
        assert_eq!(meta.validate().unwrap_err(), QuoteError::InvalidUiMultiplier.into());
    }

    #[test]
    fn test_transfer_hook_flagged() {
        let meta = MintMeta::new(Pubkey::new_unique(), 6).with_transfer_hook();
        assert!(ensure_transferable(&meta).is_ok());
        assert_eq!(
            ensure_settleable(&meta).unwrap_err(),
            QuoteError::TransferHookMint.into()
        );

        let pool = PoolSnapshot {
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: meta.mint,
            ..Default::default()
        };
        let mints = MintPair::new(MintMeta::new(pool.token_mint_a, 9), meta);
        assert_eq!(
            pool_transfer_fees(&pool, Some(&mints)).unwrap_err(),
            QuoteError::TransferHookMint.into()
        );
    }

    #[test]
    fn test_non_transferable_flagged() {
        let meta = MintMeta::new(Pubkey::new_unique(), 0).with_non_transferable();
        assert_eq!(
            ensure_transferable(&meta).unwrap_err(),
            QuoteError::NonTransferableMint.into()
        );
        assert_eq!(
            check_position_transferable(&meta).unwrap_err(),
            QuoteError::NonTransferableMint.into()
        );
    }

    #[test]
    fn test_mint_pair_must_match_pool() {
        let pool = PoolSnapshot {
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            ..Default::default()
        };
        let good = MintPair::new(
            MintMeta::new(pool.token_mint_a, 6),
            MintMeta::new(pool.token_mint_b, 9).with_transfer_fee(50, 1_000),
        );
        let (fee_a, fee_b) = pool_transfer_fees(&pool, Some(&good)).unwrap();
        assert_eq!(fee_a, None);
        assert_eq!(fee_b, Some(TransferFee::new(50, 1_000)));

        let swapped = MintPair::new(good.mint_b.clone(), good.mint_a.clone());
        assert_eq!(
            pool_transfer_fees(&pool, Some(&swapped)).unwrap_err(),
            QuoteError::MintMismatch.into()
        );
        assert_eq!(pool_transfer_fees(&pool, None).unwrap(), (None, None));
    }
}
