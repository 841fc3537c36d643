use crate::constants::POOL_SEED;
use crate::errors::AmmError;
use crate::math::{self, DepositAmounts, Fee, SwapQuote, WithdrawAmounts};
use anchor_lang::prelude::*;

/// Stores the state of a liquidity pool
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Pool {
    /// Signer that paid for and created the pool
    pub authority: Pubkey,

    /// Traded mints, canonical order (a < b)
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,

    /// Custody accounts, token authority is this pool
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,

    /// LP share mint, mint authority is this pool
    pub lp_token_mint: Pubkey,

    /// Reserves the pool has accounted for
    pub reserve_a: u64,
    pub reserve_b: u64,

    /// Total LP tokens minted to all liquidity providers
    pub total_lp_supply: u64,

    pub bump: u8,
    pub vault_a_bump: u8,
    pub vault_b_bump: u8,
    pub lp_mint_bump: u8,
}

/// Side of the pair being sold
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    AToB,
    BToA,
}

impl Pool {
    /// 8 bytes discriminator + fields
    pub const ACCOUNT_SIZE: usize = 8 + Pool::INIT_SPACE;

    pub fn signer_seeds(&self) -> [&[u8]; 4] {
        [
            POOL_SEED,
            self.token_mint_a.as_ref(),
            self.token_mint_b.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }

    pub fn is_funded(&self) -> bool {
        self.total_lp_supply > 0
    }

    /// (reserve_in, reserve_out) for a swap in `direction`
    pub fn reserves(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        }
    }

    /// Funded and unfunded states must be consistent across all three counters
    pub fn validate(&self) -> Result<()> {
        let unfunded = self.reserve_a == 0 && self.reserve_b == 0 && self.total_lp_supply == 0;
        let funded = self.reserve_a > 0 && self.reserve_b > 0 && self.total_lp_supply > 0;
        require!(unfunded || funded, AmmError::InvariantViolation);
        Ok(())
    }

    pub fn quote_deposit(
        &self,
        max_amount_a: u64,
        max_amount_b: u64,
        min_lp_out: u64,
    ) -> Result<DepositAmounts> {
        let deposit = math::deposit_amounts(
            self.reserve_a,
            self.reserve_b,
            self.total_lp_supply,
            max_amount_a,
            max_amount_b,
        )?;

        require!(deposit.lp_amount > 0, AmmError::InvalidLpTokenAmount);
        require_gte!(deposit.lp_amount, min_lp_out, AmmError::SlippageExceeded);

        Ok(deposit)
    }

    pub fn quote_withdrawal(
        &self,
        lp_amount: u64,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<WithdrawAmounts> {
        let withdrawal = math::withdraw_amounts(
            self.reserve_a,
            self.reserve_b,
            self.total_lp_supply,
            lp_amount,
        )?;

        require_gte!(withdrawal.amount_a, min_amount_a, AmmError::SlippageExceeded);
        require_gte!(withdrawal.amount_b, min_amount_b, AmmError::SlippageExceeded);

        Ok(withdrawal)
    }

    pub fn quote_swap(
        &self,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<SwapQuote> {
        let (reserve_in, reserve_out) = self.reserves(direction);
        let quote = math::swap_quote(reserve_in, reserve_out, amount_in, Fee::STANDARD)?;

        require_gte!(quote.amount_out, min_amount_out, AmmError::SlippageExceeded);

        Ok(quote)
    }

    pub fn apply_deposit(&mut self, deposit: &DepositAmounts) -> Result<()> {
        let reserve_a = self
            .reserve_a
            .checked_add(deposit.amount_a)
            .ok_or(AmmError::Overflow)?;
        let reserve_b = self
            .reserve_b
            .checked_add(deposit.amount_b)
            .ok_or(AmmError::Overflow)?;
        let total_lp_supply = self
            .total_lp_supply
            .checked_add(deposit.lp_amount)
            .ok_or(AmmError::Overflow)?;

        self.commit(reserve_a, reserve_b, total_lp_supply)
    }

    pub fn apply_withdrawal(&mut self, withdrawal: &WithdrawAmounts) -> Result<()> {
        let reserve_a = self
            .reserve_a
            .checked_sub(withdrawal.amount_a)
            .ok_or(AmmError::Underflow)?;
        let reserve_b = self
            .reserve_b
            .checked_sub(withdrawal.amount_b)
            .ok_or(AmmError::Underflow)?;
        let total_lp_supply = self
            .total_lp_supply
            .checked_sub(withdrawal.lp_amount)
            .ok_or(AmmError::Underflow)?;

        self.commit(reserve_a, reserve_b, total_lp_supply)
    }

    pub fn apply_swap(&mut self, direction: SwapDirection, quote: &SwapQuote) -> Result<()> {
        let (reserve_in, reserve_out) = self.reserves(direction);

        let new_reserve_in = reserve_in
            .checked_add(quote.amount_in)
            .ok_or(AmmError::Overflow)?;
        let new_reserve_out = reserve_out
            .checked_sub(quote.amount_out)
            .ok_or(AmmError::Underflow)?;

        math::check_invariant(reserve_in, reserve_out, new_reserve_in, new_reserve_out)?;

        let (reserve_a, reserve_b) = match direction {
            SwapDirection::AToB => (new_reserve_in, new_reserve_out),
            SwapDirection::BToA => (new_reserve_out, new_reserve_in),
        };

        self.commit(reserve_a, reserve_b, self.total_lp_supply)
    }

    // Nothing is written unless the resulting state is valid
    fn commit(&mut self, reserve_a: u64, reserve_b: u64, total_lp_supply: u64) -> Result<()> {
        let next = Pool {
            reserve_a,
            reserve_b,
            total_lp_supply,
            ..self.clone()
        };
        next.validate()?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_lp_supply = total_lp_supply;
        Ok(())
    }
}
