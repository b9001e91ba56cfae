//! Fee constants and simulation math.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain estimates match
//! on-chain results: same fixed-point scale, same truncation direction,
//! same bisection for the stabilized curve.

use primitive_types::U256;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};
use crate::state::{PoolState, PositionState};
use crate::types::SimulateResult;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Fixed-point scale shared with the on-chain program (1e18). Fee rates and
/// the amplification factor are fractions of this.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

// ─── Swap math ────────────────────────────────────────────────────────────────

/// Split a swap input into `(pair_fee, net_in)`. Truncates the fee down, so
/// the dust stays with the trader's curve input.
pub fn split_fee(amount_in: u64, fee_rate: u64) -> Result<(u64, u64)> {
    let fee = ((amount_in as u128)
        .checked_mul(fee_rate as u128)
        .ok_or(Error::MathOverflow)?
        / SCALE) as u64;
    Ok((fee, amount_in - fee))
}

/// Constant-product quote: `out = reserve_out * net_in / (reserve_in + net_in)`.
pub fn constant_product_out(reserve_in: u64, reserve_out: u64, net_in: u64) -> Result<u64> {
    let num = (reserve_out as u128)
        .checked_mul(net_in as u128)
        .ok_or(Error::MathOverflow)?;
    let den = (reserve_in as u128)
        .checked_add(net_in as u128)
        .ok_or(Error::MathOverflow)?;
    Ok((num / den) as u64)
}

// Stabilized invariant: F(x, y) = (SCALE - amp)*x*y + amp*(x + y)*size,
// with `size` fixed at the pre-trade reserve sum.
fn stable_value(x: u64, y: u64, amp: u64, size: u128) -> U256 {
    let cp = U256::from(SCALE - amp as u128) * U256::from(x) * U256::from(y);
    let cs = U256::from(amp) * (U256::from(x) + U256::from(y)) * U256::from(size);
    cp + cs
}

/// Stabilized quote: largest output keeping the invariant at or above its
/// pre-trade value, found by bisection (same solve as on-chain).
pub fn stabilized_out(reserve_in: u64, reserve_out: u64, net_in: u64, amp: u64) -> Result<u64> {
    if amp as u128 > SCALE {
        return Err(Error::InvalidArgument(format!(
            "amplification {amp} exceeds SCALE"
        )));
    }
    if amp == 0 {
        return constant_product_out(reserve_in, reserve_out, net_in);
    }

    let size = reserve_in as u128 + reserve_out as u128;
    let before = stable_value(reserve_in, reserve_out, amp, size);
    let x1 = reserve_in
        .checked_add(net_in)
        .ok_or(Error::MathOverflow)?;

    let mut lo: u64 = 0;
    let mut hi: u64 = reserve_out;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if stable_value(x1, reserve_out - mid, amp, size) >= before {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// Quote against the right curve for the pool.
pub fn quote(pool: &PoolState, amplification: u64, reserve_in: u64, reserve_out: u64, net_in: u64) -> Result<u64> {
    if pool.stable {
        stabilized_out(reserve_in, reserve_out, net_in, amplification)
    } else {
        constant_product_out(reserve_in, reserve_out, net_in)
    }
}

// ─── Simulation ───────────────────────────────────────────────────────────────

/// Full fee and slippage breakdown for a hypothetical swap.
///
/// All inputs are pre-fetched on-chain values; no RPC calls are made here.
pub fn simulate_detailed(
    pool_addr:     Pubkey,
    pool:          &PoolState,
    amplification: u64,
    reserve_in:    u64,
    reserve_out:   u64,
    amount_in:     u64,
    a_to_b:        bool,
) -> Result<SimulateResult> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(Error::NoLiquidity);
    }

    let (pair_fee, net_in) = split_fee(amount_in, pool.fee_rate)?;
    let estimated_out = quote(pool, amplification, reserve_in, reserve_out, net_in)?;

    let effective_rate = if amount_in == 0 {
        0.0
    } else {
        estimated_out as f64 / amount_in as f64
    };
    let spot_rate = reserve_out as f64 / reserve_in as f64;
    let price_impact_pct = if spot_rate == 0.0 {
        0.0
    } else {
        (1.0 - effective_rate / spot_rate) * 100.0
    };

    Ok(SimulateResult {
        pool: pool_addr,
        a_to_b,
        amount_in,
        pair_fee,
        net_in,
        estimated_out,
        effective_rate,
        price_impact_pct,
        fee_rate: pool.fee_rate,
        stable: pool.stable,
        reserve_in,
        reserve_out,
    })
}

/// Minimum acceptable output for a slippage tolerance in basis points,
/// measured from the spot projection of the full input. Tolerances above
/// 100% clamp to a floor of zero instead of underflowing.
pub fn slippage_floor(spot_out: u128, max_slippage_bps: u16) -> u64 {
    let bps = (max_slippage_bps as u128).min(10_000);
    // Divide-first keeps the product inside u128 for u128-scale spot values.
    let cut = spot_out / 10_000 * bps + spot_out % 10_000 * bps / 10_000;
    let floor = spot_out - cut;
    floor.min(u64::MAX as u128) as u64
}

// ─── Pending fees ─────────────────────────────────────────────────────────────

/// Fee entitlement accrued since a checkpoint:
/// `weight * (accumulator - checkpoint) / SCALE`, rounded down.
pub fn pending_fees(weight: u64, accumulator: u128, checkpoint: u128) -> u64 {
    let delta = accumulator.saturating_sub(checkpoint);
    let owed = (weight as u128).saturating_mul(delta) / SCALE;
    owed.min(u64::MAX as u128) as u64
}

/// Compute `(pending_a, pending_b)` accrued since the position was last synced.
pub fn pending_fees_for_position(pos: &PositionState, pool: &PoolState) -> (u64, u64) {
    (
        pending_fees(pos.weight_a, pool.fee_per_weight_a, pos.fee_checkpoint_a),
        pending_fees(pos.weight_b, pool.fee_per_weight_b, pos.fee_checkpoint_b),
    )
}

// ─── Withdrawal preview ───────────────────────────────────────────────────────

/// Net payout for one side of a full withdrawal:
/// proportional reserve share, minus the unclaimed fee entitlement, minus
/// the protocol skim on the remainder. Mirrors the on-chain breakdown.
pub fn withdraw_payout(
    reserve: u64,
    total_weight: u64,
    weight: u64,
    fee_entitlement: u64,
    protocol_fee_rate: u64,
) -> u64 {
    if weight == 0 || total_weight == 0 {
        return 0;
    }
    let gross = ((reserve as u128).saturating_mul(weight as u128) / total_weight as u128) as u64;
    let net = gross - fee_entitlement.min(gross);
    let skim = ((net as u128).saturating_mul(protocol_fee_rate as u128) / SCALE) as u64;
    net - skim
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FEE_0_3_PCT: u64 = 3_000_000_000_000_000;
    const PROTOCOL_1_PCT: u64 = 10_000_000_000_000_000;

    #[test]
    fn split_matches_program() {
        assert_eq!(split_fee(50_000, FEE_0_3_PCT).unwrap(), (150, 49_850));
        assert_eq!(split_fee(333, FEE_0_3_PCT).unwrap(), (0, 333));
    }

    #[test]
    fn quote_matches_program() {
        assert_eq!(constant_product_out(100_000, 100_000, 49_850).unwrap(), 33_266);
        let amp = 25_000_000_000_000_000;
        let st = stabilized_out(100_000, 100_000, 49_850, amp).unwrap();
        assert!(st >= 33_266 && st <= 49_850);
    }

    #[test]
    fn pending_fee_roundtrip() {
        let acc = 150u128 * SCALE / 100_000;
        assert_eq!(pending_fees(100_000, acc, 0), 150);
    }

    #[test]
    fn withdraw_payout_concrete() {
        let p = withdraw_payout(150_000, 100_000, 100_000, 150, PROTOCOL_1_PCT);
        assert_eq!(p, 148_352);
    }

    #[test]
    fn slippage_floor_shrinks_with_tolerance() {
        assert_eq!(slippage_floor(1_000_000, 0), 1_000_000);
        assert_eq!(slippage_floor(1_000_000, 50), 995_000);
        assert_eq!(slippage_floor(1_000_000, 10_000), 0);
    }

    #[test]
    fn slippage_floor_clamps_oversized_tolerance() {
        // Tolerances the u16 admits beyond 100% must not underflow.
        assert_eq!(slippage_floor(1_000_000, 20_000), 0);
        assert_eq!(slippage_floor(u128::MAX, u16::MAX), 0);
        assert_eq!(slippage_floor(0, u16::MAX), 0);
    }

    #[test]
    fn price_impact_positive_and_bounded() {
        let pool = crate::state::PoolState {
            pool_id: 1,
            authority: Pubkey::new_unique(),
            token_a_mint: Pubkey::new_unique(),
            token_b_mint: Pubkey::new_unique(),
            token_a_vault: Pubkey::new_unique(),
            token_b_vault: Pubkey::new_unique(),
            fee_rate: FEE_0_3_PCT,
            stable: false,
            reserve_a: 100_000,
            reserve_b: 100_000,
            total_weight_a: 100_000,
            total_weight_b: 100_000,
            fee_per_weight_a: 0,
            fee_per_weight_b: 0,
        };
        let sim =
            simulate_detailed(Pubkey::new_unique(), &pool, 0, 100_000, 100_000, 50_000, true)
                .unwrap();
        assert_eq!(sim.estimated_out, 33_266);
        assert!(sim.price_impact_pct > 0.0 && sim.price_impact_pct < 100.0);
    }
}
