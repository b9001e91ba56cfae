use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::AmmError;
use crate::state::Amm;

/// Set the protocol skim taken from every net withdrawal, as a fraction of
/// SCALE.
pub fn set_protocol_fee_rate(ctx: Context<AdminUpdate>, rate: u64) -> Result<()> {
    require!((rate as u128) < SCALE, AmmError::InvalidFeeRate);
    ctx.accounts.amm.protocol_fee_rate = rate;
    msg!("Protocol fee rate set: {}", rate);
    Ok(())
}

/// Set the amplification factor applied to every stabilized pool, as a
/// fraction of SCALE. SCALE itself is allowed (pure constant-sum).
pub fn set_amplification(ctx: Context<AdminUpdate>, amplification: u64) -> Result<()> {
    require!(
        (amplification as u128) <= SCALE,
        AmmError::InvalidAmplification
    );
    ctx.accounts.amm.amplification = amplification;
    msg!("Amplification factor set: {}", amplification);
    Ok(())
}

/// Point the protocol skim at a new fee-distribution collaborator. The
/// engine never inspects how the distributor splits what it receives.
pub fn set_fee_distributor(ctx: Context<AdminUpdate>, fee_distributor: Pubkey) -> Result<()> {
    require_keys_neq!(fee_distributor, Pubkey::default(), AmmError::ZeroAddressA);
    ctx.accounts.amm.fee_distributor = fee_distributor;
    msg!("Fee distributor set: {}", fee_distributor);
    Ok(())
}

#[derive(Accounts)]
pub struct AdminUpdate<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [AMM_SEED],
        bump = amm.bump,
        has_one = admin @ AmmError::AdminOnly,
    )]
    pub amm: Account<'info, Amm>,
}
