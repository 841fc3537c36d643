//! Constant product curve (x * y = k) with a fee taken on the input side.

use crate::constants::{FEE_DENOMINATOR, FEE_NUMERATOR};
use crate::errors::AmmError;
use anchor_lang::prelude::*;

/// Proportional swap fee, retained in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fee {
    pub numerator: u64,
    pub denominator: u64,
}

impl Fee {
    pub const STANDARD: Fee = Fee {
        numerator: FEE_NUMERATOR,
        denominator: FEE_DENOMINATOR,
    };

    /// Portion of `amount` kept by the pool, rounded up
    pub fn fee_amount(&self, amount: u64) -> Result<u64> {
        let fee = (amount as u128)
            .checked_mul(self.numerator as u128)
            .and_then(|v| v.checked_add(self.denominator as u128 - 1))
            .and_then(|v| v.checked_div(self.denominator as u128))
            .ok_or(AmmError::Overflow)?;
        u64::try_from(fee).map_err(|_| error!(AmmError::Overflow))
    }
}

/// Outcome of a swap against a pair of reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee: u64,
    pub new_reserve_in: u64,
    pub new_reserve_out: u64,
}

/// Price an exact-input swap.
///
/// dy = reserve_out * dx' / (reserve_in + dx'), where dx' = dx * (1 - fee).
/// Both sides are scaled by the fee denominator so that dx' is never rounded
/// on its own; the single floor division rounds in the pool's favor.
pub fn swap_quote(reserve_in: u64, reserve_out: u64, amount_in: u64, fee: Fee) -> Result<SwapQuote> {
    require!(amount_in > 0, AmmError::ZeroInput);
    require!(
        reserve_in > 0 && reserve_out > 0,
        AmmError::InsufficientLiquidity
    );

    let net_factor = fee
        .denominator
        .checked_sub(fee.numerator)
        .ok_or(AmmError::Underflow)?;

    let amount_in_with_fee = (amount_in as u128)
        .checked_mul(net_factor as u128)
        .ok_or(AmmError::Overflow)?;

    let numerator = amount_in_with_fee
        .checked_mul(reserve_out as u128)
        .ok_or(AmmError::Overflow)?;

    let denominator = (reserve_in as u128)
        .checked_mul(fee.denominator as u128)
        .and_then(|v| v.checked_add(amount_in_with_fee))
        .ok_or(AmmError::Overflow)?;

    let amount_out = numerator
        .checked_div(denominator)
        .ok_or(AmmError::Overflow)?;
    let amount_out = u64::try_from(amount_out).map_err(|_| error!(AmmError::Overflow))?;

    require!(amount_out > 0, AmmError::ZeroOutput);

    let new_reserve_in = reserve_in
        .checked_add(amount_in)
        .ok_or(AmmError::Overflow)?;
    let new_reserve_out = reserve_out
        .checked_sub(amount_out)
        .ok_or(AmmError::Underflow)?;

    check_invariant(reserve_in, reserve_out, new_reserve_in, new_reserve_out)?;

    Ok(SwapQuote {
        amount_in,
        amount_out,
        fee: fee.fee_amount(amount_in)?,
        new_reserve_in,
        new_reserve_out,
    })
}

/// Fails unless new_in * new_out >= old_in * old_out
pub fn check_invariant(old_in: u64, old_out: u64, new_in: u64, new_out: u64) -> Result<()> {
    let k_before = (old_in as u128)
        .checked_mul(old_out as u128)
        .ok_or(AmmError::Overflow)?;
    let k_after = (new_in as u128)
        .checked_mul(new_out as u128)
        .ok_or(AmmError::Overflow)?;

    require!(k_after >= k_before, AmmError::InvariantViolation);
    Ok(())
}
