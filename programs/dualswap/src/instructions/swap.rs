use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AmmError;
use crate::state::{Amm, Pool};

use super::swap_math;

/// Trade `amount_in` of `token_in` against the pool's curve.
///
/// Split on every swap:
///   - pair fee (`pool.fee_rate` of the input): credited to the input side's
///     fee accumulator, never to the curve math;
///   - net input: priced against the pre-trade reserves.
/// The full input lands in the input vault, so the reserve counters keep
/// mirroring custody; the output leaves the other vault PDA-signed.
pub fn handler(ctx: Context<Swap>, token_in: Pubkey, amount_in: u64) -> Result<u64> {
    require!(amount_in > 0, AmmError::ZeroAmount);

    let pool = &ctx.accounts.pool;
    require!(pool.is_pool_token(token_in), AmmError::WrongToken);
    let a_to_b = token_in == pool.token_a_mint;
    let token_out = if a_to_b {
        pool.token_b_mint
    } else {
        pool.token_a_mint
    };
    require!(
        ctx.accounts.trader_token_in.mint == token_in,
        AmmError::WrongToken
    );
    require!(
        ctx.accounts.trader_token_out.mint == token_out,
        AmmError::WrongToken
    );

    let (reserve_in, reserve_out) = if a_to_b {
        (pool.reserve_a, pool.reserve_b)
    } else {
        (pool.reserve_b, pool.reserve_a)
    };
    require!(
        reserve_in > 0 && reserve_out > 0,
        AmmError::InsufficientLiquidity
    );

    let split = swap_math::split_fee(amount_in, pool.fee_rate)?;
    let total_weight_in = if a_to_b {
        pool.total_weight_a
    } else {
        pool.total_weight_b
    };
    let growth = swap_math::fee_per_weight_delta(split.fee, total_weight_in)?;

    let curve = pool.curve(ctx.accounts.amm.amplification);
    let amount_out = curve.quote(reserve_in, reserve_out, split.net_in)?;
    require!(amount_out > 0, AmmError::ZeroAmount);
    require!(amount_out < reserve_out, AmmError::InsufficientLiquidity);
    require!(
        curve.holds_after(reserve_in, reserve_out, split.net_in, amount_out),
        AmmError::InvariantViolation
    );

    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;

    let pool = &mut ctx.accounts.pool;
    if a_to_b {
        pool.fee_per_weight_a = pool
            .fee_per_weight_a
            .checked_add(growth)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_a = pool
            .reserve_a
            .checked_add(amount_in)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_b = pool
            .reserve_b
            .checked_sub(amount_out)
            .ok_or(AmmError::MathOverflow)?;
    } else {
        pool.fee_per_weight_b = pool
            .fee_per_weight_b
            .checked_add(growth)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_b = pool
            .reserve_b
            .checked_add(amount_in)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_a = pool
            .reserve_a
            .checked_sub(amount_out)
            .ok_or(AmmError::MathOverflow)?;
    }

    let (vault_in, vault_out) = if a_to_b {
        (
            ctx.accounts.token_a_vault.to_account_info(),
            ctx.accounts.token_b_vault.to_account_info(),
        )
    } else {
        (
            ctx.accounts.token_b_vault.to_account_info(),
            ctx.accounts.token_a_vault.to_account_info(),
        )
    };

    // 1. Full input: trader -> input vault
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.trader_token_in.to_account_info(),
                to: vault_in,
                authority: ctx.accounts.trader.to_account_info(),
            },
        ),
        amount_in,
    )?;

    // 2. Output: output vault -> trader (PDA-signed)
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: vault_out,
                to: ctx.accounts.trader_token_out.to_account_info(),
                authority: ctx.accounts.pool_authority.to_account_info(),
            },
            signer,
        ),
        amount_out,
    )?;

    msg!(
        "Swap: pool={} in={} fee={} out={} a_to_b={}",
        ctx.accounts.pool.pool_id,
        amount_in,
        split.fee,
        amount_out,
        a_to_b
    );
    Ok(amount_out)
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        constraint = pool.pool_id >= 1 && pool.pool_id <= amm.pool_count @ AmmError::UnknownPool,
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA vault authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = token_a_vault.key() == pool.token_a_vault @ AmmError::WrongToken,
    )]
    pub token_a_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = token_b_vault.key() == pool.token_b_vault @ AmmError::WrongToken,
    )]
    pub token_b_vault: Box<Account<'info, TokenAccount>>,

    /// Token account the trader is selling from
    #[account(
        mut,
        constraint = trader_token_in.owner == trader.key(),
    )]
    pub trader_token_in: Box<Account<'info, TokenAccount>>,

    /// Token account the trader is receiving into
    #[account(
        mut,
        constraint = trader_token_out.owner == trader.key(),
    )]
    pub trader_token_out: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
