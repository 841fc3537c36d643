use crate::constants::*;
use crate::errors::AmmError;
use crate::events::LiquidityAdded;
use crate::helpers::{mint_lp_tokens, transfer_to_vault};
use crate::state::Pool;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Add liquidity to the pool and receive LP tokens
pub fn handler(
    ctx: Context<AddLiquidity>,
    amount_a: u64,
    amount_b: u64,
    min_lp_out: u64,
) -> Result<()> {
    msg!(
        "Current reserves - Token A: {}, Token B: {}, LP supply: {}",
        ctx.accounts.pool.reserve_a,
        ctx.accounts.pool.reserve_b,
        ctx.accounts.pool.total_lp_supply
    );

    let deposit = ctx
        .accounts
        .pool
        .quote_deposit(amount_a, amount_b, min_lp_out)?;

    msg!(
        "Deposit - Token A: {} of {}, Token B: {} of {}, LP tokens: {}",
        deposit.amount_a,
        amount_a,
        deposit.amount_b,
        amount_b,
        deposit.lp_amount
    );

    // Verify user has sufficient balance
    require_gte!(
        ctx.accounts.user_token_account_a.amount,
        deposit.amount_a,
        AmmError::InsufficientBalance
    );
    require_gte!(
        ctx.accounts.user_token_account_b.amount,
        deposit.amount_b,
        AmmError::InsufficientBalance
    );

    let accounts = &ctx.accounts;
    transfer_to_vault(
        &accounts.user,
        &accounts.user_token_account_a,
        &accounts.token_vault_a,
        &accounts.token_mint_a,
        &accounts.token_program,
        deposit.amount_a,
    )?;
    transfer_to_vault(
        &accounts.user,
        &accounts.user_token_account_b,
        &accounts.token_vault_b,
        &accounts.token_mint_b,
        &accounts.token_program,
        deposit.amount_b,
    )?;
    mint_lp_tokens(
        &accounts.pool,
        &accounts.lp_token_mint,
        &accounts.user_lp_token_account,
        &accounts.token_program,
        deposit.lp_amount,
    )?;

    let pool_key = ctx.accounts.pool.key();
    let user_key = ctx.accounts.user.key();
    ctx.accounts.pool.apply_deposit(&deposit)?;

    emit!(LiquidityAdded {
        pool: pool_key,
        user: user_key,
        amount_a: deposit.amount_a,
        amount_b: deposit.amount_b,
        lp_amount: deposit.lp_amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    /// Liquidity provider, pays for their LP account on first deposit
    #[account(mut)]
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

    #[account(
        init_if_needed,
        payer = user,
        seeds = [USER_LP_SEED, lp_token_mint.key().as_ref(), user.key().as_ref()],
        bump,
        token::mint = lp_token_mint,
        token::authority = user,
        token::token_program = token_program,
    )]
    pub user_lp_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}
