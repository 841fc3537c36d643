use crate::constants::*;
use crate::errors::AmmError;
use crate::events::LiquidityRemoved;
use crate::helpers::{burn_lp_tokens, transfer_from_vault};
use crate::state::Pool;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Remove liquidity from the pool by burning LP tokens
pub fn handler(
    ctx: Context<RemoveLiquidity>,
    lp_amount: u64,
    min_amount_a: u64,
    min_amount_b: u64,
) -> Result<()> {
    require!(lp_amount > 0, AmmError::ZeroInput);

    // Verify user has sufficient LP tokens
    require_gte!(
        ctx.accounts.user_lp_token_account.amount,
        lp_amount,
        AmmError::InsufficientBalance
    );

    let withdrawal = ctx
        .accounts
        .pool
        .quote_withdrawal(lp_amount, min_amount_a, min_amount_b)?;

    msg!(
        "Withdrawal - LP tokens: {} of {}, Token A: {}, Token B: {}",
        lp_amount,
        ctx.accounts.pool.total_lp_supply,
        withdrawal.amount_a,
        withdrawal.amount_b
    );

    let accounts = &ctx.accounts;
    burn_lp_tokens(
        &accounts.user,
        &accounts.user_lp_token_account,
        &accounts.lp_token_mint,
        &accounts.token_program,
        withdrawal.lp_amount,
    )?;
    transfer_from_vault(
        &accounts.pool,
        &accounts.token_vault_a,
        &accounts.user_token_account_a,
        &accounts.token_mint_a,
        &accounts.token_program,
        withdrawal.amount_a,
    )?;
    transfer_from_vault(
        &accounts.pool,
        &accounts.token_vault_b,
        &accounts.user_token_account_b,
        &accounts.token_mint_b,
        &accounts.token_program,
        withdrawal.amount_b,
    )?;

    let pool_key = ctx.accounts.pool.key();
    let user_key = ctx.accounts.user.key();
    ctx.accounts.pool.apply_withdrawal(&withdrawal)?;

    if !ctx.accounts.pool.is_funded() {
        msg!("Pool drained, next deposit bootstraps LP supply");
    }

    emit!(LiquidityRemoved {
        pool: pool_key,
        user: user_key,
        amount_a: withdrawal.amount_a,
        amount_b: withdrawal.amount_b,
        lp_amount: withdrawal.lp_amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.token_mint_a.as_ref(), pool.token_mint_b.as_ref()],
        bump = pool.bump,
        has_one = token_mint_a,
        has_one = token_mint_b,
        has_one = token_vault_a,
        has_one = token_vault_b,
        has_one = lp_token_mint,
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
        seeds = [LP_MINT_SEED, pool.token_mint_a.as_ref(), pool.token_mint_b.as_ref()],
        bump = pool.lp_mint_bump,
        constraint = lp_token_mint.supply == pool.total_lp_supply @ AmmError::LpSupplyMismatch,
    )]
    pub lp_token_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, token::mint = token_mint_a)]
    pub user_token_account_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, token::mint = token_mint_b)]
    pub user_token_account_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Any LP account the user controls, not only the derived one
    #[account(
        mut,
        token::mint = lp_token_mint,
        token::authority = user,
    )]
    pub user_lp_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}
