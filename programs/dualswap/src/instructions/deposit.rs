use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AmmError;
use crate::state::{Amm, Pool, Position};

use super::swap_math;

// ─── Fee settlement ────────────────────────────────────────────────────────
// Call before any change to the position's weights: banks the entitlement
// accrued since the last snapshot into fees_owed and rolls the snapshots
// forward, so newly added principal cannot claim fees from before it existed.
pub fn settle_position(
    position: &mut Position,
    fee_per_weight_a: u128,
    fee_per_weight_b: u128,
) -> Result<()> {
    let pending_a =
        swap_math::pending_fees(position.weight_a, fee_per_weight_a, position.fee_checkpoint_a)?;
    let pending_b =
        swap_math::pending_fees(position.weight_b, fee_per_weight_b, position.fee_checkpoint_b)?;

    position.fees_owed_a = position
        .fees_owed_a
        .checked_add(pending_a)
        .ok_or(AmmError::MathOverflow)?;
    position.fees_owed_b = position
        .fees_owed_b
        .checked_add(pending_b)
        .ok_or(AmmError::MathOverflow)?;
    position.fee_checkpoint_a = fee_per_weight_a;
    position.fee_checkpoint_b = fee_per_weight_b;
    Ok(())
}

// ─── Handler ───────────────────────────────────────────────────────────────
/// Add principal to a pool. Asymmetric amounts are allowed — each side simply
/// dilutes or concentrates the depositor's share of that side independently.
/// Either transfer failing aborts the whole instruction.
pub fn handler(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
    require!(amount_a > 0 || amount_b > 0, AmmError::ZeroAmount);

    let fee_per_weight_a = ctx.accounts.pool.fee_per_weight_a;
    let fee_per_weight_b = ctx.accounts.pool.fee_per_weight_b;

    {
        let position = &mut ctx.accounts.position;
        position.owner = ctx.accounts.depositor.key();
        position.pool = ctx.accounts.pool.key();
        position.bump = ctx.bumps.position;
        settle_position(position, fee_per_weight_a, fee_per_weight_b)?;
        position.weight_a = position
            .weight_a
            .checked_add(amount_a)
            .ok_or(AmmError::MathOverflow)?;
        position.weight_b = position
            .weight_b
            .checked_add(amount_b)
            .ok_or(AmmError::MathOverflow)?;
    }

    let pool = &mut ctx.accounts.pool;
    pool.total_weight_a = pool
        .total_weight_a
        .checked_add(amount_a)
        .ok_or(AmmError::MathOverflow)?;
    pool.total_weight_b = pool
        .total_weight_b
        .checked_add(amount_b)
        .ok_or(AmmError::MathOverflow)?;
    pool.reserve_a = pool
        .reserve_a
        .checked_add(amount_a)
        .ok_or(AmmError::MathOverflow)?;
    pool.reserve_b = pool
        .reserve_b
        .checked_add(amount_b)
        .ok_or(AmmError::MathOverflow)?;

    if amount_a > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor_token_a.to_account_info(),
                    to: ctx.accounts.token_a_vault.to_account_info(),
                    authority: ctx.accounts.depositor.to_account_info(),
                },
            ),
            amount_a,
        )?;
    }
    if amount_b > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor_token_b.to_account_info(),
                    to: ctx.accounts.token_b_vault.to_account_info(),
                    authority: ctx.accounts.depositor.to_account_info(),
                },
            ),
            amount_b,
        )?;
    }

    msg!(
        "Deposit: pool={} a={} b={}",
        ctx.accounts.pool.pool_id,
        amount_a,
        amount_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    #[account(
        mut,
        constraint = pool.pool_id >= 1 && pool.pool_id <= amm.pool_count @ AmmError::UnknownPool,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = Position::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), depositor.key().as_ref()],
        bump,
    )]
    pub position: Account<'info, Position>,

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

    #[account(
        mut,
        constraint = depositor_token_a.mint == pool.token_a_mint @ AmmError::WrongToken,
        constraint = depositor_token_a.owner == depositor.key(),
    )]
    pub depositor_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = depositor_token_b.mint == pool.token_b_mint @ AmmError::WrongToken,
        constraint = depositor_token_b.owner == depositor.key(),
    )]
    pub depositor_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
