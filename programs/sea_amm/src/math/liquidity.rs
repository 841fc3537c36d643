//! LP share accounting for deposits and withdrawals.

use crate::constants::INITIAL_LP_MULTIPLIER;
use crate::errors::AmmError;
use anchor_lang::prelude::*;
use integer_sqrt::IntegerSquareRoot;

/// Token amounts actually pulled from the depositor and LP shares minted for them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositAmounts {
    pub amount_a: u64,
    pub amount_b: u64,
    pub lp_amount: u64,
}

/// Token amounts paid out for burning `lp_amount` shares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawAmounts {
    pub amount_a: u64,
    pub amount_b: u64,
    pub lp_amount: u64,
}

/// floor(a * b / c)
pub fn mul_div_floor(a: u64, b: u64, c: u64) -> Result<u64> {
    let value = (a as u128)
        .checked_mul(b as u128)
        .and_then(|v| v.checked_div(c as u128))
        .ok_or(AmmError::Overflow)?;
    u64::try_from(value).map_err(|_| error!(AmmError::Overflow))
}

/// ceil(a * b / c)
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> Result<u64> {
    require!(c > 0, AmmError::Overflow);
    let product = (a as u128)
        .checked_mul(b as u128)
        .ok_or(AmmError::Overflow)?;
    let value = product
        .checked_add(c as u128 - 1)
        .map(|v| v / c as u128)
        .ok_or(AmmError::Overflow)?;
    u64::try_from(value).map_err(|_| error!(AmmError::Overflow))
}

/// Shares minted by the first deposit into an empty pool: geometric mean of
/// the two amounts, scaled by INITIAL_LP_MULTIPLIER
pub fn initial_lp_amount(amount_a: u64, amount_b: u64) -> Result<u64> {
    let product = (amount_a as u128)
        .checked_mul(amount_b as u128)
        .ok_or(AmmError::Overflow)?;
    let root = u64::try_from(product.integer_sqrt()).map_err(|_| error!(AmmError::Overflow))?;

    root.checked_mul(INITIAL_LP_MULTIPLIER)
        .ok_or(error!(AmmError::Overflow))
}

/// Work out how much of each token to pull and how many shares to mint.
///
/// On a funded pool the side with the smaller share of its reserve limits the
/// shares, rounded down. Each side then pulls only what those shares are
/// worth at the current ratio, rounded up, so the depositor never pays for a
/// fraction of a share they did not receive.
pub fn deposit_amounts(
    reserve_a: u64,
    reserve_b: u64,
    total_lp_supply: u64,
    max_amount_a: u64,
    max_amount_b: u64,
) -> Result<DepositAmounts> {
    require!(max_amount_a > 0 && max_amount_b > 0, AmmError::ZeroInput);

    if total_lp_supply == 0 {
        return Ok(DepositAmounts {
            amount_a: max_amount_a,
            amount_b: max_amount_b,
            lp_amount: initial_lp_amount(max_amount_a, max_amount_b)?,
        });
    }

    require!(
        reserve_a > 0 && reserve_b > 0,
        AmmError::InsufficientLiquidity
    );

    let lp_amount = std::cmp::min(
        mul_div_floor(max_amount_a, total_lp_supply, reserve_a)?,
        mul_div_floor(max_amount_b, total_lp_supply, reserve_b)?,
    );

    // ceil(lp * reserve / supply) <= max since lp <= max * supply / reserve
    Ok(DepositAmounts {
        amount_a: mul_div_ceil(lp_amount, reserve_a, total_lp_supply)?,
        amount_b: mul_div_ceil(lp_amount, reserve_b, total_lp_supply)?,
        lp_amount,
    })
}

/// Pro-rata payout for burning `lp_amount` shares, rounded down on both sides
pub fn withdraw_amounts(
    reserve_a: u64,
    reserve_b: u64,
    total_lp_supply: u64,
    lp_amount: u64,
) -> Result<WithdrawAmounts> {
    require!(lp_amount > 0, AmmError::ZeroInput);
    require_gte!(
        total_lp_supply,
        lp_amount,
        AmmError::ExcessiveBurnAmount
    );

    Ok(WithdrawAmounts {
        amount_a: mul_div_floor(reserve_a, lp_amount, total_lp_supply)?,
        amount_b: mul_div_floor(reserve_b, lp_amount, total_lp_supply)?,
        lp_amount,
    })
}
