use anchor_lang::prelude::*;

use crate::instructions::curve::Curve;

// ─── Amm ───────────────────────────────────────────────────────────────────
// Global registry and configuration. Single PDA; the admin key gates the
// protocol-fee rate, the stabilized-curve amplification factor and the
// fee-distributor address. pool_count doubles as the highest issued PID.
#[account]
pub struct Amm {
    pub admin: Pubkey,              // 32
    /// Owner of the token accounts that receive the protocol skim
    pub fee_distributor: Pubkey,    // 32
    /// Fraction of SCALE taken from each net withdrawal
    pub protocol_fee_rate: u64,     // 8
    /// Fraction of SCALE applied to every stabilized pool
    pub amplification: u64,         // 8
    /// Number of pools created; PIDs are 1..=pool_count
    pub pool_count: u64,            // 8
    pub bump: u8,                   // 1
}

impl Amm {
    // 8 discriminator + 32+32+8+8+8+1 = 97
    pub const LEN: usize = 97;
}

// ─── Pool ──────────────────────────────────────────────────────────────────
// One trading pair. Reserves mirror the custody held in the two PDA-owned
// vaults; total weights are the sum of all depositors' principal per side.
// The PDA is seeded by the canonically ordered mint pair, so a pair can only
// be registered once regardless of argument order; token_a/token_b keep the
// creator's order.
#[account]
pub struct Pool {
    /// 1-based sequential identifier; 0 is never issued
    pub pool_id: u64,               // 8
    /// PDA that owns token_a_vault and token_b_vault
    pub authority: Pubkey,          // 32
    pub authority_bump: u8,         // 1
    pub token_a_mint: Pubkey,       // 32
    pub token_b_mint: Pubkey,       // 32
    pub token_a_vault: Pubkey,      // 32
    pub token_b_vault: Pubkey,      // 32
    /// Pair fee as a fraction of SCALE, taken from every swap input
    pub fee_rate: u64,              // 8
    /// Curve kind: stabilized (amplified) or constant-product
    pub stable: bool,               // 1
    pub reserve_a: u64,             // 8
    pub reserve_b: u64,             // 8
    pub total_weight_a: u64,        // 8
    pub total_weight_b: u64,        // 8
    /// Cumulative fee per unit of principal weight, SCALE-scaled, per side
    pub fee_per_weight_a: u128,     // 16
    pub fee_per_weight_b: u128,     // 16
    pub bump: u8,                   // 1
}

impl Pool {
    // 8 discriminator + 8+32+1+32+32+32+32+8+1+8+8+8+8+16+16+1 = 251
    pub const LEN: usize = 251;

    pub fn curve(&self, amplification: u64) -> Curve {
        if self.stable {
            Curve::Stabilized { amplification }
        } else {
            Curve::ConstantProduct
        }
    }

    pub fn is_pool_token(&self, mint: Pubkey) -> bool {
        mint == self.token_a_mint || mint == self.token_b_mint
    }
}

// ─── Position ──────────────────────────────────────────────────────────────
// One depositor's principal in a single pool. Weights grow on deposit and are
// zeroed entirely on withdrawal; a position with zero weight on both sides is
// treated as nonexistent. fees_owed_* bank entitlements settled when the
// snapshots roll forward, so later deposits never dilute earlier fees.
#[account]
pub struct Position {
    pub owner: Pubkey,              // 32
    pub pool: Pubkey,               // 32
    pub weight_a: u64,              // 8
    pub weight_b: u64,              // 8
    /// Accumulator snapshots taken at last deposit or claim
    pub fee_checkpoint_a: u128,     // 16
    pub fee_checkpoint_b: u128,     // 16
    /// Settled but unclaimed fee tokens
    pub fees_owed_a: u64,           // 8
    pub fees_owed_b: u64,           // 8
    pub bump: u8,                   // 1
}

impl Position {
    // 8 discriminator + 32+32+8+8+16+16+8+8+1 = 137
    pub const LEN: usize = 137;

    pub fn is_empty(&self) -> bool {
        self.weight_a == 0 && self.weight_b == 0
    }
}
