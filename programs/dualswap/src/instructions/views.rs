use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::AmmError;
use crate::state::{Amm, Pool};

/// Instantaneous spot price of the *other* token in units of `token`,
/// SCALE-scaled, recomputed from current reserves on every call. Not a
/// time-weighted oracle.
pub fn exchange_rate(ctx: Context<PoolQuery>, token: Pubkey) -> Result<u128> {
    let pool = &ctx.accounts.pool;
    require!(pool.is_pool_token(token), AmmError::WrongToken);

    let (this_reserve, other_reserve) = if token == pool.token_a_mint {
        (pool.reserve_a, pool.reserve_b)
    } else {
        (pool.reserve_b, pool.reserve_a)
    };
    require!(this_reserve > 0, AmmError::InsufficientLiquidity);

    Ok((other_reserve as u128)
        .checked_mul(SCALE)
        .ok_or(AmmError::MathOverflow)?
        / this_reserve as u128)
}

/// Current reserve of `token` in the pool.
pub fn total_value_locked(ctx: Context<PoolQuery>, token: Pubkey) -> Result<u64> {
    let pool = &ctx.accounts.pool;
    require!(pool.is_pool_token(token), AmmError::WrongToken);

    Ok(if token == pool.token_a_mint {
        pool.reserve_a
    } else {
        pool.reserve_b
    })
}

#[derive(Accounts)]
pub struct PoolQuery<'info> {
    #[account(seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    #[account(
        constraint = pool.pool_id >= 1 && pool.pool_id <= amm.pool_count @ AmmError::UnknownPool,
    )]
    pub pool: Account<'info, Pool>,
}
