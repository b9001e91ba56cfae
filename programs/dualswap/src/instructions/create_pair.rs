use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::AmmError;
use crate::events::PairCreated;
use crate::state::{Amm, Pool};

/// Register a new pool and allocate the next sequential PID.
/// The pool PDA is seeded by the canonically ordered mint pair, so creating
/// the same pair again — in either argument order — fails when the account
/// already exists. The PDA authority owns both vaults; no human key controls
/// the custody.
pub fn handler(ctx: Context<CreatePair>, fee_rate: u64, stable: bool) -> Result<u64> {
    let mint_a = ctx.accounts.token_a_mint.key();
    let mint_b = ctx.accounts.token_b_mint.key();
    require_keys_neq!(mint_a, mint_b, AmmError::InvalidPair);
    require_keys_neq!(mint_a, Pubkey::default(), AmmError::ZeroAddressA);
    require_keys_neq!(mint_b, Pubkey::default(), AmmError::ZeroAddressB);
    require!((fee_rate as u128) < SCALE, AmmError::InvalidFeeRate);

    let amm = &mut ctx.accounts.amm;
    amm.pool_count = amm
        .pool_count
        .checked_add(1)
        .ok_or(AmmError::MathOverflow)?;
    let pool_id = amm.pool_count;

    let pool = &mut ctx.accounts.pool;
    pool.pool_id = pool_id;
    pool.authority = ctx.accounts.pool_authority.key();
    pool.authority_bump = ctx.bumps.pool_authority;
    pool.token_a_mint = mint_a;
    pool.token_b_mint = mint_b;
    pool.token_a_vault = ctx.accounts.token_a_vault.key();
    pool.token_b_vault = ctx.accounts.token_b_vault.key();
    pool.fee_rate = fee_rate;
    pool.stable = stable;
    pool.reserve_a = 0;
    pool.reserve_b = 0;
    pool.total_weight_a = 0;
    pool.total_weight_b = 0;
    pool.fee_per_weight_a = 0;
    pool.fee_per_weight_b = 0;
    pool.bump = ctx.bumps.pool;

    emit!(PairCreated {
        pool_id,
        pool: pool.key(),
        token_a: mint_a,
        token_b: mint_b,
        fee_rate,
        stable,
    });
    msg!(
        "Pair created: id={} {}/{} fee={} stable={}",
        pool_id,
        mint_a,
        mint_b,
        fee_rate,
        stable
    );
    Ok(pool_id)
}

#[derive(Accounts)]
pub struct CreatePair<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(mut, seeds = [AMM_SEED], bump = amm.bump)]
    pub amm: Account<'info, Amm>,

    pub token_a_mint: Account<'info, Mint>,
    pub token_b_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = creator,
        space = Pool::LEN,
        seeds = [
            POOL_SEED,
            token_a_mint.key().min(token_b_mint.key()).as_ref(),
            token_a_mint.key().max(token_b_mint.key()).as_ref(),
        ],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA vault authority — owns both vaults, holds no data
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = creator,
        token::mint = token_a_mint,
        token::authority = pool_authority,
    )]
    pub token_a_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = creator,
        token::mint = token_b_mint,
        token::authority = pool_authority,
    )]
    pub token_b_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
