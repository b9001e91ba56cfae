use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::AmmError;
use crate::state::{Amm, Pool, Position};

use super::swap_math::{self, WithdrawSide};

/// Net-of-protocol-fee amounts a withdrawal would pay out. Returned from
/// `withdraw_preview` via Anchor return data.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawQuote {
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Both sides of a withdrawal, computed from the same state preview and
/// execution both read.
pub fn breakdown(
    pool: &Pool,
    position: &Position,
    protocol_fee_rate: u64,
) -> Result<(WithdrawSide, WithdrawSide)> {
    let earned_a = position
        .fees_owed_a
        .checked_add(swap_math::pending_fees(
            position.weight_a,
            pool.fee_per_weight_a,
            position.fee_checkpoint_a,
        )?)
        .ok_or(AmmError::MathOverflow)?;
    let earned_b = position
        .fees_owed_b
        .checked_add(swap_math::pending_fees(
            position.weight_b,
            pool.fee_per_weight_b,
            position.fee_checkpoint_b,
        )?)
        .ok_or(AmmError::MathOverflow)?;

    let side_a = swap_math::withdraw_side(
        pool.reserve_a,
        pool.total_weight_a,
        position.weight_a,
        earned_a,
        protocol_fee_rate,
    )?;
    let side_b = swap_math::withdraw_side(
        pool.reserve_b,
        pool.total_weight_b,
        position.weight_b,
        earned_b,
        protocol_fee_rate,
    )?;
    Ok((side_a, side_b))
}

/// Read-only preview of `withdraw`: the same computation, no mutation.
pub fn preview_handler(ctx: Context<WithdrawPreview>) -> Result<WithdrawQuote> {
    require!(!ctx.accounts.position.is_empty(), AmmError::NoPosition);
    let (side_a, side_b) = breakdown(
        &ctx.accounts.pool,
        &ctx.accounts.position,
        ctx.accounts.amm.protocol_fee_rate,
    )?;
    Ok(WithdrawQuote {
        amount_a: side_a.payout,
        amount_b: side_b.payout,
    })
}

/// Withdraw the caller's full proportional share of both reserves, net of
/// the unclaimed fee entitlement and the protocol skim. The skim is routed
/// to the fee distributor; the position is zeroed — there is no partial
/// withdrawal, and a second call fails with `NoPosition`.
pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    require!(!ctx.accounts.position.is_empty(), AmmError::NoPosition);

    let (side_a, side_b) = breakdown(
        &ctx.accounts.pool,
        &ctx.accounts.position,
        ctx.accounts.amm.protocol_fee_rate,
    )?;

    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;

    // The gross share (fee entitlement included) leaves the accounting even
    // though only payout + skim leave the vault; the difference stays behind
    // as unclaimed-fee dust, so custody never falls below the counters.
    {
        let pool = &mut ctx.accounts.pool;
        let position = &ctx.accounts.position;
        pool.reserve_a = pool
            .reserve_a
            .checked_sub(side_a.gross)
            .ok_or(AmmError::MathOverflow)?;
        pool.reserve_b = pool
            .reserve_b
            .checked_sub(side_b.gross)
            .ok_or(AmmError::MathOverflow)?;
        pool.total_weight_a = pool
            .total_weight_a
            .checked_sub(position.weight_a)
            .ok_or(AmmError::MathOverflow)?;
        pool.total_weight_b = pool
            .total_weight_b
            .checked_sub(position.weight_b)
            .ok_or(AmmError::MathOverflow)?;
    }

    {
        let position = &mut ctx.accounts.position;
        position.weight_a = 0;
        position.weight_b = 0;
        position.fees_owed_a = 0;
        position.fees_owed_b = 0;
        position.fee_checkpoint_a = ctx.accounts.pool.fee_per_weight_a;
        position.fee_checkpoint_b = ctx.accounts.pool.fee_per_weight_b;
    }

    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    if side_a.payout > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_a_vault.to_account_info(),
                    to: ctx.accounts.withdrawer_token_a.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            side_a.payout,
        )?;
    }
    if side_b.payout > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_b_vault.to_account_info(),
                    to: ctx.accounts.withdrawer_token_b.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            side_b.payout,
        )?;
    }

    // Protocol skim -> fee-distribution collaborator
    if side_a.protocol_fee > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_a_vault.to_account_info(),
                    to: ctx.accounts.distributor_token_a.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            side_a.protocol_fee,
        )?;
    }
    if side_b.protocol_fee > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_b_vault.to_account_info(),
                    to: ctx.accounts.distributor_token_b.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            side_b.protocol_fee,
        )?;
    }

    msg!(
        "Withdraw: pool={} a={} b={} skim_a={} skim_b={}",
        ctx.accounts.pool.pool_id,
        side_a.payout,
        side_b.payout,
        side_a.protocol_fee,
        side_b.protocol_fee
    );
    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawPreview<'info> {
    pub withdrawer: Signer<'info>,

    #[account(seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    #[account(
        constraint = pool.pool_id >= 1 && pool.pool_id <= amm.pool_count @ AmmError::UnknownPool,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        seeds = [POSITION_SEED, pool.key().as_ref(), withdrawer.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub withdrawer: Signer<'info>,

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
        seeds = [POSITION_SEED, pool.key().as_ref(), withdrawer.key().as_ref()],
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
        constraint = withdrawer_token_a.mint == pool.token_a_mint @ AmmError::WrongToken,
        constraint = withdrawer_token_a.owner == withdrawer.key(),
    )]
    pub withdrawer_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = withdrawer_token_b.mint == pool.token_b_mint @ AmmError::WrongToken,
        constraint = withdrawer_token_b.owner == withdrawer.key(),
    )]
    pub withdrawer_token_b: Box<Account<'info, TokenAccount>>,

    /// Fee-distribution collaborator's account for token A
    #[account(
        mut,
        constraint = distributor_token_a.owner == amm.fee_distributor @ AmmError::WrongToken,
        constraint = distributor_token_a.mint == pool.token_a_mint @ AmmError::WrongToken,
    )]
    pub distributor_token_a: Box<Account<'info, TokenAccount>>,

    /// Fee-distribution collaborator's account for token B
    #[account(
        mut,
        constraint = distributor_token_b.owner == amm.fee_distributor @ AmmError::WrongToken,
        constraint = distributor_token_b.mint == pool.token_b_mint @ AmmError::WrongToken,
    )]
    pub distributor_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
