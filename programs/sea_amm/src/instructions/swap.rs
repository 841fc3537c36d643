use crate::constants::*;
use crate::errors::AmmError;
use crate::events::Swapped;
use crate::helpers::{transfer_from_vault, transfer_to_vault};
use crate::state::{Pool, SwapDirection};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Swap an exact input amount along the constant product curve (x * y = k)
pub fn handler(
    ctx: Context<Swap>,
    direction: SwapDirection,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<()> {
    let quote = ctx
        .accounts
        .pool
        .quote_swap(direction, amount_in, min_amount_out)?;

    msg!(
        "Swap details - Direction: {:?}, Input: {}, Fee: {}, Output: {}",
        direction,
        quote.amount_in,
        quote.fee,
        quote.amount_out
    );

    let accounts = &ctx.accounts;
    let (
        user_input_account,
        input_vault,
        input_mint,
        user_output_account,
        output_vault,
        output_mint,
    ) = match direction {
        SwapDirection::AToB => (
            &accounts.user_token_account_a,
            &accounts.token_vault_a,
            &accounts.token_mint_a,
            &accounts.user_token_account_b,
            &accounts.token_vault_b,
            &accounts.token_mint_b,
        ),
        SwapDirection::BToA => (
            &accounts.user_token_account_b,
            &accounts.token_vault_b,
            &accounts.token_mint_b,
            &accounts.user_token_account_a,
            &accounts.token_vault_a,
            &accounts.token_mint_a,
        ),
    };

    // Verify user has sufficient input tokens
    require_gte!(
        user_input_account.amount,
        quote.amount_in,
        AmmError::InsufficientBalance
    );

    // Transfer input tokens from user to vault (including fee)
    transfer_to_vault(
        &accounts.user,
        user_input_account,
        input_vault,
        input_mint,
        &accounts.token_program,
        quote.amount_in,
    )?;

    // Transfer output tokens from vault to user
    transfer_from_vault(
        &accounts.pool,
        output_vault,
        user_output_account,
        output_mint,
        &accounts.token_program,
        quote.amount_out,
    )?;

    let pool_key = ctx.accounts.pool.key();
    let user_key = ctx.accounts.user.key();
    ctx.accounts.pool.apply_swap(direction, &quote)?;

    msg!(
        "Swap completed - reserves A: {}, B: {}",
        ctx.accounts.pool.reserve_a,
        ctx.accounts.pool.reserve_b
    );

    emit!(Swapped {
        pool: pool_key,
        user: user_key,
        direction,
        amount_in: quote.amount_in,
        amount_out: quote.amount_out,
        fee: quote.fee,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Swap<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.token_mint_a.as_ref(), pool.token_mint_b.as_ref()],
        bump = pool.bump,
        has_one = token_mint_a,
        has_one = token_mint_b,
        has_one = token_vault_a,
        has_one = token_vault_b,
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub token_mint_a: Box<InterfaceAccount<'info, Mint>>,
    pub token_mint_b: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [VAULT_A_SEED, pool.token_mint_a.as_ref(), pool.token_mint_b.as_ref()],
        bump = pool.vault_a_bump,
        constraint = token_vault_a.amount >= pool.reserve_a @ AmmError::VaultUnderfunded,
    )]
    pub token_vault_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [VAULT_B_SEED, pool.token_mint_a.as_ref(), pool.token_mint_b.as_ref()],
        bump = pool.vault_b_bump,
        constraint = token_vault_b.amount >= pool.reserve_b @ AmmError::VaultUnderfunded,
    )]
    pub token_vault_b: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_mint_a,
        token::authority = user,
    )]
    pub user_token_account_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_mint_b,
        token::authority = user,
    )]
    pub user_token_account_b: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}
