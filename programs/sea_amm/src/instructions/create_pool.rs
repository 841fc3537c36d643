use crate::constants::*;
use crate::errors::AmmError;
use crate::events::PoolCreated;
use crate::helpers::{create_pda_account, ensure_uninitialized, rent_shortfall};
use crate::state::Pool;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_spl::token::spl_token::state::{Account as SplTokenAccount, Mint as SplMint};
use anchor_spl::token_interface::{
    self, InitializeAccount3, InitializeMint2, Mint, TokenInterface,
};

/// Create a pool for a mint pair with empty vaults and an LP mint at zero supply
pub fn handler(ctx: Context<CreatePool>) -> Result<()> {
    let token_mint_a = ctx.accounts.token_mint_a.key();
    let token_mint_b = ctx.accounts.token_mint_b.key();

    require_keys_neq!(token_mint_a, token_mint_b, AmmError::InvalidMintPair);
    require!(token_mint_a < token_mint_b, AmmError::InvalidMintOrder);
    ensure_uninitialized(&ctx.accounts.pool)?;

    // Pre-funded PDAs only need a top-up
    let rent = Rent::get()?;
    let allocation_cost = [
        rent_shortfall(&rent, &ctx.accounts.pool, Pool::ACCOUNT_SIZE),
        rent_shortfall(&rent, &ctx.accounts.token_vault_a, SplTokenAccount::LEN),
        rent_shortfall(&rent, &ctx.accounts.token_vault_b, SplTokenAccount::LEN),
        rent_shortfall(&rent, &ctx.accounts.lp_token_mint, SplMint::LEN),
    ]
    .iter()
    .try_fold(0u64, |total, cost| total.checked_add(*cost))
    .ok_or(AmmError::Overflow)?;

    msg!(
        "Creating pool - authority lamports: {}, allocation cost: {}",
        ctx.accounts.authority.lamports(),
        allocation_cost
    );
    require_gte!(
        ctx.accounts.authority.lamports(),
        allocation_cost,
        AmmError::InsufficientFunds
    );

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();
    let pool_info = ctx.accounts.pool.to_account_info();
    let bumps = &ctx.bumps;

    // Pool record
    create_pda_account(
        &payer,
        &pool_info,
        &system_program,
        Pool::ACCOUNT_SIZE,
        ctx.program_id,
        &[
            POOL_SEED,
            token_mint_a.as_ref(),
            token_mint_b.as_ref(),
            &[bumps.pool],
        ],
    )?;

    // Vaults, token authority = pool
    for (vault, mint, seed, bump) in [
        (
            ctx.accounts.token_vault_a.to_account_info(),
            ctx.accounts.token_mint_a.to_account_info(),
            VAULT_A_SEED,
            bumps.token_vault_a,
        ),
        (
            ctx.accounts.token_vault_b.to_account_info(),
            ctx.accounts.token_mint_b.to_account_info(),
            VAULT_B_SEED,
            bumps.token_vault_b,
        ),
    ] {
        create_pda_account(
            &payer,
            &vault,
            &system_program,
            SplTokenAccount::LEN,
            token_program.key,
            &[seed, token_mint_a.as_ref(), token_mint_b.as_ref(), &[bump]],
        )?;

        token_interface::initialize_account3(CpiContext::new(
            token_program.clone(),
            InitializeAccount3 {
                account: vault,
                mint,
                authority: pool_info.clone(),
            },
        ))?;
    }

    // LP mint, mint authority = pool, no freeze authority
    let lp_mint_info = ctx.accounts.lp_token_mint.to_account_info();
    create_pda_account(
        &payer,
        &lp_mint_info,
        &system_program,
        SplMint::LEN,
        token_program.key,
        &[
            LP_MINT_SEED,
            token_mint_a.as_ref(),
            token_mint_b.as_ref(),
            &[bumps.lp_token_mint],
        ],
    )?;

    token_interface::initialize_mint2(
        CpiContext::new(
            token_program.clone(),
            InitializeMint2 {
                mint: lp_mint_info.clone(),
            },
        ),
        LP_DECIMALS,
        pool_info.key,
        None,
    )?;

    let pool = Pool {
        authority: ctx.accounts.authority.key(),
        token_mint_a,
        token_mint_b,
        token_vault_a: ctx.accounts.token_vault_a.key(),
        token_vault_b: ctx.accounts.token_vault_b.key(),
        lp_token_mint: lp_mint_info.key(),
        reserve_a: 0,
        reserve_b: 0,
        total_lp_supply: 0,
        bump: bumps.pool,
        vault_a_bump: bumps.token_vault_a,
        vault_b_bump: bumps.token_vault_b,
        lp_mint_bump: bumps.lp_token_mint,
    };
    pool.validate()?;

    {
        let mut data = pool_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data;
        pool.try_serialize(&mut writer)?;
    }

    msg!(
        "Pool initialized - mint A: {}, mint B: {}, LP mint: {}",
        token_mint_a,
        token_mint_b,
        pool.lp_token_mint
    );

    emit!(PoolCreated {
        pool: pool_info.key(),
        authority: pool.authority,
        token_mint_a,
        token_mint_b,
        lp_token_mint: pool.lp_token_mint,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreatePool<'info> {
    /// Pays for every account created here
    #[account(mut)]
    pub authority: Signer<'info>,

    /// First token mint in the trading pair (sorts first)
    #[account(mint::token_program = token_program)]
    pub token_mint_a: Box<InterfaceAccount<'info, Mint>>,

    /// Second token mint in the trading pair
    #[account(mint::token_program = token_program)]
    pub token_mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: allocated by the handler once it is known to be uninitialized
    #[account(
        mut,
        seeds = [POOL_SEED, token_mint_a.key().as_ref(), token_mint_b.key().as_ref()],
        bump,
    )]
    pub pool: UncheckedAccount<'info>,

    /// CHECK: allocated and initialized as a token account by the handler
    #[account(
        mut,
        seeds = [VAULT_A_SEED, token_mint_a.key().as_ref(), token_mint_b.key().as_ref()],
        bump,
    )]
    pub token_vault_a: UncheckedAccount<'info>,

    /// CHECK: allocated and initialized as a token account by the handler
    #[account(
        mut,
        seeds = [VAULT_B_SEED, token_mint_a.key().as_ref(), token_mint_b.key().as_ref()],
        bump,
    )]
    pub token_vault_b: UncheckedAccount<'info>,

    /// CHECK: allocated and initialized as a mint by the handler
    #[account(
        mut,
        seeds = [LP_MINT_SEED, token_mint_a.key().as_ref(), token_mint_b.key().as_ref()],
        bump,
    )]
    pub lp_token_mint: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}
