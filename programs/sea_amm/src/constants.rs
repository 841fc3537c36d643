use anchor_lang::prelude::*;

// PDA seeds
#[constant]
pub const POOL_SEED: &[u8] = b"pool";

#[constant]
pub const LP_MINT_SEED: &[u8] = b"lp-token-mint";

#[constant]
pub const VAULT_A_SEED: &[u8] = b"token-vault-a";

#[constant]
pub const VAULT_B_SEED: &[u8] = b"token-vault-b";

#[constant]
pub const USER_LP_SEED: &[u8] = b"lp-token-account";

/// Swap fee numerator (3 / 1000 = 0.3%)
#[constant]
pub const FEE_NUMERATOR: u64 = 3;

/// Swap fee denominator
#[constant]
pub const FEE_DENOMINATOR: u64 = 1000;

/// Decimals of the LP share mint
#[constant]
pub const LP_DECIMALS: u8 = 6;

/// Scale applied to sqrt(amount_a * amount_b) on the first deposit
#[constant]
pub const INITIAL_LP_MULTIPLIER: u64 = 1;
