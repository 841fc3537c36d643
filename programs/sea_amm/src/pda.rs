//! Program derived addresses for a pool and its accounts.
//!
//! Pool-level addresses are keyed by the mint pair in canonical order
//! (mint A sorts before mint B), so a pair maps to exactly one pool.

use crate::constants::*;
use crate::errors::AmmError;
use anchor_lang::prelude::*;

/// Every pool-level address with the bump that makes it a PDA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAddresses {
    pub pool: Pubkey,
    pub pool_bump: u8,
    pub lp_token_mint: Pubkey,
    pub lp_mint_bump: u8,
    pub token_vault_a: Pubkey,
    pub vault_a_bump: u8,
    pub token_vault_b: Pubkey,
    pub vault_b_bump: u8,
}

impl PoolAddresses {
    pub fn derive(program_id: &Pubkey, token_mint_a: &Pubkey, token_mint_b: &Pubkey) -> Result<Self> {
        require_keys_neq!(*token_mint_a, *token_mint_b, AmmError::InvalidMintPair);
        require!(token_mint_a < token_mint_b, AmmError::InvalidMintOrder);

        let (pool, pool_bump) = find_pool_address(program_id, token_mint_a, token_mint_b)?;
        let (lp_token_mint, lp_mint_bump) =
            find_lp_mint_address(program_id, token_mint_a, token_mint_b)?;
        let (token_vault_a, vault_a_bump) =
            find_vault_a_address(program_id, token_mint_a, token_mint_b)?;
        let (token_vault_b, vault_b_bump) =
            find_vault_b_address(program_id, token_mint_a, token_mint_b)?;

        Ok(Self {
            pool,
            pool_bump,
            lp_token_mint,
            lp_mint_bump,
            token_vault_a,
            vault_a_bump,
            token_vault_b,
            vault_b_bump,
        })
    }
}

/// Sort a mint pair into canonical (A, B) order
pub fn canonical_mints(first: Pubkey, second: Pubkey) -> Result<(Pubkey, Pubkey)> {
    require_keys_neq!(first, second, AmmError::InvalidMintPair);

    if first < second {
        Ok((first, second))
    } else {
        Ok((second, first))
    }
}

fn find_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(error!(AmmError::BumpNotFound))
}

pub fn find_pool_address(
    program_id: &Pubkey,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_address(
        &[POOL_SEED, token_mint_a.as_ref(), token_mint_b.as_ref()],
        program_id,
    )
}

pub fn find_lp_mint_address(
    program_id: &Pubkey,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_address(
        &[LP_MINT_SEED, token_mint_a.as_ref(), token_mint_b.as_ref()],
        program_id,
    )
}

pub fn find_vault_a_address(
    program_id: &Pubkey,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_address(
        &[VAULT_A_SEED, token_mint_a.as_ref(), token_mint_b.as_ref()],
        program_id,
    )
}

pub fn find_vault_b_address(
    program_id: &Pubkey,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_address(
        &[VAULT_B_SEED, token_mint_a.as_ref(), token_mint_b.as_ref()],
        program_id,
    )
}

/// A user's LP holding account, keyed by the LP mint rather than the mint pair
pub fn find_user_lp_address(
    program_id: &Pubkey,
    lp_token_mint: &Pubkey,
    user: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_address(
        &[USER_LP_SEED, lp_token_mint.as_ref(), user.as_ref()],
        program_id,
    )
}
