//! Public parameter and result types.
//!
//! Everything here is `serde`-serializable so callers can pass results
//! around as JSON without extra glue.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

// ─── create_pair ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePairParams {
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Pair fee as a fraction of 1e18 (0.3% = 3_000_000_000_000_000).
    pub fee_rate: u64,
    /// Price with the stabilized (amplified) curve instead of constant-product.
    pub stable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePairResult {
    pub signature: String,
    pub pool: Pubkey,
    pub pool_authority: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub fee_rate: u64,
    pub stable: bool,
}

// ─── deposit ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositParams {
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Amount of `mint_a`; zero is allowed when `amount_b` is nonzero.
    pub amount_a: u64,
    /// Amount of `mint_b`; zero is allowed when `amount_a` is nonzero.
    pub amount_b: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositResult {
    pub signature: String,
    pub pool: Pubkey,
    pub position: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
}

// ─── swap ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapParams {
    pub mint_in: Pubkey,
    pub mint_out: Pubkey,
    pub amount_in: u64,
    /// Client-side guard: abort before submitting when the simulated output
    /// falls more than this many basis points below the spot projection.
    /// `0` disables the guard.
    pub max_slippage_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResult {
    pub signature: String,
    pub pool: Pubkey,
    pub amount_in: u64,
    pub estimated_out: u64,
    pub a_to_b: bool,
}

// ─── simulate ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateParams {
    pub mint_in: Pubkey,
    pub mint_out: Pubkey,
    pub amount_in: u64,
}

/// Off-chain swap breakdown; every integer matches what the program would do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResult {
    pub pool: Pubkey,
    pub a_to_b: bool,
    pub amount_in: u64,
    /// Pair fee credited to the input side's fee accumulator.
    pub pair_fee: u64,
    /// Portion of the input priced by the curve.
    pub net_in: u64,
    pub estimated_out: u64,
    /// `estimated_out / amount_in`.
    pub effective_rate: f64,
    /// Percent lost versus the pre-trade spot rate (fee included).
    pub price_impact_pct: f64,
    pub fee_rate: u64,
    pub stable: bool,
    pub reserve_in: u64,
    pub reserve_out: u64,
}

// ─── withdraw / fees ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub signature: String,
    pub pool: Pubkey,
    /// Net payout of token A (share minus fee entitlement minus skim).
    pub amount_a: u64,
    /// Net payout of token B.
    pub amount_b: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimFeesResult {
    pub signature: String,
    pub pool: Pubkey,
    pub fees_a: u64,
    pub fees_b: u64,
}

// ─── queries ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    pub pool: Pubkey,
    pub pool_id: u64,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_weight_a: u64,
    pub total_weight_b: u64,
    pub fee_rate: u64,
    pub stable: bool,
    /// `reserve_b / reserve_a`; 0 when reserve A is empty.
    pub spot_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    pub address: Pubkey,
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub weight_a: u64,
    pub weight_b: u64,
    pub fees_owed_a: u64,
    pub fees_owed_b: u64,
    pub pending_fees_a: u64,
    pub pending_fees_b: u64,
    /// `fees_owed + pending`, the claimable total per side.
    pub total_fees_a: u64,
    pub total_fees_b: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSummary {
    pub positions: Vec<PositionInfo>,
    pub total_fees_a: u64,
    pub total_fees_b: u64,
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_params_json_roundtrip() {
        let params = SwapParams {
            mint_in: Pubkey::new_unique(),
            mint_out: Pubkey::new_unique(),
            amount_in: 1_000_000_000,
            max_slippage_bps: 50,
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: SwapParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mint_in, params.mint_in);
        assert_eq!(back.mint_out, params.mint_out);
        assert_eq!(back.amount_in, params.amount_in);
        assert_eq!(back.max_slippage_bps, params.max_slippage_bps);
    }

    #[test]
    fn simulate_result_json_roundtrip() {
        let sim = SimulateResult {
            pool: Pubkey::new_unique(),
            a_to_b: true,
            amount_in: 50_000,
            pair_fee: 150,
            net_in: 49_850,
            estimated_out: 33_266,
            effective_rate: 0.66532,
            price_impact_pct: 33.468,
            fee_rate: 3_000_000_000_000_000,
            stable: false,
            reserve_in: 100_000,
            reserve_out: 100_000,
        };
        let json = serde_json::to_string(&sim).unwrap();
        let back: SimulateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pool, sim.pool);
        assert_eq!(back.estimated_out, 33_266);
        assert_eq!(back.pair_fee, 150);
        assert_eq!(back.fee_rate, sim.fee_rate);
    }
}
