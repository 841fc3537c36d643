use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Pool for this mint pair is already initialized")]
    AlreadyExists,

    #[msg("Token mints of a pool must be different")]
    InvalidMintPair,

    #[msg("Token mint A must sort before token mint B")]
    InvalidMintOrder,

    #[msg("Amount must be greater than zero")]
    ZeroInput,

    #[msg("No valid bump found for the derived address")]
    BumpNotFound,

    #[msg("Output amount is less than the specified minimum")]
    SlippageExceeded,

    #[msg("Pool has no liquidity on one or both sides")]
    InsufficientLiquidity,

    #[msg("Swap would return zero output tokens")]
    ZeroOutput,

    #[msg("Calculated LP token mint amount is zero")]
    InvalidLpTokenAmount,

    #[msg("Arithmetic overflow")]
    Overflow,

    #[msg("Arithmetic underflow")]
    Underflow,

    #[msg("Constant product decreased after swap")]
    InvariantViolation,

    #[msg("Authority cannot pay for pool account allocation")]
    InsufficientFunds,

    #[msg("Insufficient balance in user's account for this operation")]
    InsufficientBalance,

    #[msg("Attempting to burn more LP tokens than outstanding")]
    ExcessiveBurnAmount,

    #[msg("LP mint supply does not match pool record")]
    LpSupplyMismatch,

    #[msg("Vault balance is below the pool's recorded reserve")]
    VaultUnderfunded,
}
