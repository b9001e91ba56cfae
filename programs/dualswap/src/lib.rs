/// Dualswap — pool accounting and swap-curve engine.
///
/// Parties deposit pairs of SPL tokens into sequentially numbered pools,
/// trade against one of two pricing curves (constant-product or stabilized),
/// and withdraw their proportional holdings plus accrued trading fees, net
/// of a protocol skim routed to an external fee distributor.
///
/// 13 instructions:
///   initialize            — create the global registry/config PDA
///   set_protocol_fee_rate — admin: skim taken from net withdrawals
///   set_amplification     — admin: stabilized-curve flattening factor
///   set_fee_distributor   — admin: where the skim is routed
///   create_pair           — register a pool, allocate the next PID
///   deposit               — add principal on either or both sides
///   swap                  — trade input for output against the pool curve
///   withdraw              — pull the full proportional share, pay the skim
///   withdraw_preview      — read-only withdraw amounts
///   withdraw_fees         — claim accrued trading fees
///   view_earned_fees      — read-only per-side fee entitlement
///   exchange_rate         — spot price from current reserves
///   total_value_locked    — current reserve of one token

// ─── Security contact ─────────────────────────────────────────────────────────

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name:             "Dualswap",
    project_url:      "https://github.com/dualswap/dualswap",
    contacts:         "email:security@dualswap.dev",
    policy:           "Please report security vulnerabilities by email. \
                       We aim to respond within 48 hours.",
    source_code:      "https://github.com/dualswap/dualswap",
    preferred_languages: "en"
}

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("DQePbc5QQWg5AQKTSKSgvcUwoF5APynv75jdGhAh394G");

#[program]
pub mod dualswap {
    use super::*;

    /// Create the global registry and configuration account.
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        initialize::handler(ctx)
    }

    /// Admin: set the protocol-fee rate (fraction of SCALE).
    pub fn set_protocol_fee_rate(ctx: Context<AdminUpdate>, rate: u64) -> Result<()> {
        admin::set_protocol_fee_rate(ctx, rate)
    }

    /// Admin: set the stabilized-curve amplification factor (fraction of SCALE).
    pub fn set_amplification(ctx: Context<AdminUpdate>, amplification: u64) -> Result<()> {
        admin::set_amplification(ctx, amplification)
    }

    /// Admin: set the fee-distribution collaborator.
    pub fn set_fee_distributor(ctx: Context<AdminUpdate>, fee_distributor: Pubkey) -> Result<()> {
        admin::set_fee_distributor(ctx, fee_distributor)
    }

    /// Register a pool for a token pair; returns the new 1-based PID.
    pub fn create_pair(ctx: Context<CreatePair>, fee_rate: u64, stable: bool) -> Result<u64> {
        create_pair::handler(ctx, fee_rate, stable)
    }

    /// Add principal to a pool; asymmetric amounts allowed.
    pub fn deposit(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
        deposit::handler(ctx, amount_a, amount_b)
    }

    /// Trade `amount_in` of `token_in` against the pool curve; returns the
    /// output amount.
    pub fn swap(ctx: Context<Swap>, token_in: Pubkey, amount_in: u64) -> Result<u64> {
        swap::handler(ctx, token_in, amount_in)
    }

    /// Withdraw the caller's full share of both reserves.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        withdraw::handler(ctx)
    }

    /// Read-only: amounts `withdraw` would pay out right now.
    pub fn withdraw_preview(ctx: Context<WithdrawPreview>) -> Result<WithdrawQuote> {
        withdraw::preview_handler(ctx)
    }

    /// Claim accrued trading fees on both sides.
    pub fn withdraw_fees(ctx: Context<WithdrawFees>) -> Result<()> {
        withdraw_fees::handler(ctx)
    }

    /// Read-only: fee entitlement on the side of `token`.
    pub fn view_earned_fees(ctx: Context<ViewEarnedFees>, token: Pubkey) -> Result<u64> {
        withdraw_fees::view_earned_fees(ctx, token)
    }

    /// Read-only: spot price of the other token in units of `token`.
    pub fn exchange_rate(ctx: Context<PoolQuery>, token: Pubkey) -> Result<u128> {
        views::exchange_rate(ctx, token)
    }

    /// Read-only: current reserve of `token`.
    pub fn total_value_locked(ctx: Context<PoolQuery>, token: Pubkey) -> Result<u64> {
        views::total_value_locked(ctx, token)
    }
}
