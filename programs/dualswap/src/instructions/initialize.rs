use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::Amm;

/// Create the global registry/config account. The signer becomes admin and
/// the initial fee distributor; both rates start at zero until the admin sets
/// them.
pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let amm = &mut ctx.accounts.amm;
    amm.admin = ctx.accounts.admin.key();
    amm.fee_distributor = ctx.accounts.admin.key();
    amm.protocol_fee_rate = 0;
    amm.amplification = 0;
    amm.pool_count = 0;
    amm.bump = ctx.bumps.amm;

    msg!("Amm initialized: admin={}", amm.admin);
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = Amm::LEN,
        seeds = [AMM_SEED],
        bump,
    )]
    pub amm: Account<'info, Amm>,

    pub system_program: Program<'info, System>,
}
