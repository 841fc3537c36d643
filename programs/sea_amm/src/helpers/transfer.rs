use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, Burn, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::Pool;

/// Move tokens from a user's account into a pool vault, signed by the user
pub fn transfer_to_vault<'info>(
    user: &Signer<'info>,
    user_token_account: &InterfaceAccount<'info, TokenAccount>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    token_mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    token_interface::transfer_checked(
        CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: user_token_account.to_account_info(),
                mint: token_mint.to_account_info(),
                to: vault.to_account_info(),
                authority: user.to_account_info(),
            },
        ),
        amount,
        token_mint.decimals,
    )
}

/// Move tokens out of a pool vault, signed by the pool PDA
pub fn transfer_from_vault<'info>(
    pool: &Account<'info, Pool>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    user_token_account: &InterfaceAccount<'info, TokenAccount>,
    token_mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    let seeds = pool.signer_seeds();

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault.to_account_info(),
                mint: token_mint.to_account_info(),
                to: user_token_account.to_account_info(),
                authority: pool.to_account_info(),
            },
            &[&seeds[..]],
        ),
        amount,
        token_mint.decimals,
    )
}

pub fn mint_lp_tokens<'info>(
    pool: &Account<'info, Pool>,
    lp_token_mint: &InterfaceAccount<'info, Mint>,
    user_lp_token_account: &InterfaceAccount<'info, TokenAccount>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    let seeds = pool.signer_seeds();

    token_interface::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: lp_token_mint.to_account_info(),
                to: user_lp_token_account.to_account_info(),
                authority: pool.to_account_info(),
            },
            &[&seeds[..]],
        ),
        amount,
    )
}

/// Burn LP tokens held by the user; the holder signs
pub fn burn_lp_tokens<'info>(
    user: &Signer<'info>,
    user_lp_token_account: &InterfaceAccount<'info, TokenAccount>,
    lp_token_mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    token_interface::burn(
        CpiContext::new(
            token_program.to_account_info(),
            Burn {
                mint: lp_token_mint.to_account_info(),
                from: user_lp_token_account.to_account_info(),
                authority: user.to_account_info(),
            },
        ),
        amount,
    )
}
