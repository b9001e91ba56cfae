use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Cannot create a pair of two identical tokens")]
    InvalidPair,
    #[msg("Zero Address tokenA")]
    ZeroAddressA,
    #[msg("Zero Address tokenB")]
    ZeroAddressB,
    #[msg("PID does not exist")]
    UnknownPool,
    #[msg("Token is not part of this pool")]
    WrongToken,
    #[msg("No pool shares to withdraw")]
    NoPosition,
    #[msg("No shares found for the user")]
    NoFeesToClaim,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Pool has insufficient liquidity")]
    InsufficientLiquidity,
    #[msg("Fee rate must be below 100%")]
    InvalidFeeRate,
    #[msg("Amplification factor cannot exceed the scale")]
    InvalidAmplification,
    #[msg("Swap would violate the curve invariant")]
    InvariantViolation,
    #[msg("Caller is not the configured admin")]
    AdminOnly,
    #[msg("Math overflow")]
    MathOverflow,
}
