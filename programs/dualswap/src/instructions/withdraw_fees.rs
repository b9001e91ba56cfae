use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AmmError;
use crate::state::{Amm, Pool, Position};

use super::deposit::settle_position;
use super::swap_math;

/// Claim the caller's accrued trading fees on both sides. Fails with
/// `NoFeesToClaim` when nothing is claimable, so an immediate second call
/// fails; a zero side with a nonzero sibling is simply skipped. Claimed
/// amounts leave both the vaults and the reserve counters, keeping the
/// custody mirror intact.
pub fn handler(ctx: Context<WithdrawFees>) -> Result<()> {
    require!(!ctx.accounts.position.is_empty(), AmmError::NoPosition);

    let fee_per_weight_a = ctx.accounts.pool.fee_per_weight_a;
    let fee_per_weight_b = ctx.accounts.pool.fee_per_weight_b;
    settle_position(&mut ctx.accounts.position, fee_per_weight_a, fee_per_weight_b)?;

    let owed_a = ctx.accounts.position.fees_owed_a;
    let owed_b = ctx.accounts.position.fees_owed_b;
    require!(owed_a > 0 || owed_b > 0, AmmError::NoFeesToClaim);

    ctx.accounts.position.fees_owed_a = 0;
    ctx.accounts.position.fees_owed_b = 0;

    {
        let pool = &mut ctx.accounts.pool;
        pool.reserve_a = pool
            .reserve_a
            .checked_sub(owed_a)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_b = pool
            .reserve_b
            .checked_sub(owed_b)
            .ok_or(AmmError::MathOverflow)?;
    }

    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    if owed_a > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_a_vault.to_account_info(),
                    to: ctx.accounts.claimer_token_a.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            owed_a,
        )?;
    }
    if owed_b > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_b_vault.to_account_info(),
                    to: ctx.accounts.claimer_token_b.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            owed_b,
        )?;
    }

    msg!(
        "Fees claimed: pool={} a={} b={}",
        ctx.accounts.pool.pool_id,
        owed_a,
        owed_b
    );
    Ok(())
}

/// Banked plus pending fee entitlement on the queried side. Requires nonzero
/// weight on that side; the value itself may be zero.
pub fn view_earned_fees(ctx: Context<ViewEarnedFees>, token: Pubkey) -> Result<u64> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    require!(pool.is_pool_token(token), AmmError::WrongToken);

    let (weight, owed, accumulator, checkpoint) = if token == pool.token_a_mint {
        (
            position.weight_a,
            position.fees_owed_a,
            pool.fee_per_weight_a,
            position.fee_checkpoint_a,
        )
    } else {
        (
            position.weight_b,
            position.fees_owed_b,
            pool.fee_per_weight_b,
            position.fee_checkpoint_b,
        )
    };
    require!(weight > 0, AmmError::NoFeesToClaim);

    owed.checked_add(swap_math::pending_fees(weight, accumulator, checkpoint)?)
        .ok_or(error!(AmmError::MathOverflow))
}

#[derive(Accounts)]
pub struct WithdrawFees<'info> {
    #[account(mut)]
    pub claimer: Signer<'info>,

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
        seeds = [POSITION_SEED, pool.key().as_ref(), claimer.key().as_ref()],
        bump = position.bump,
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
        constraint = claimer_token_a.mint == pool.token_a_mint @ AmmError::WrongToken,
        constraint = claimer_token_a.owner == claimer.key(),
    )]
    pub claimer_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = claimer_token_b.mint == pool.token_b_mint @ AmmError::WrongToken,
        constraint = claimer_token_b.owner == claimer.key(),
    )]
    pub claimer_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct ViewEarnedFees<'info> {
    pub claimer: Signer<'info>,

    #[account(seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    #[account(
        constraint = pool.pool_id >= 1 && pool.pool_id <= amm.pool_count @ AmmError::UnknownPool,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        seeds = [POSITION_SEED, pool.key().as_ref(), claimer.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,
}
