use anchor_lang::prelude::*;

use crate::constants::SCALE;
use crate::error::AmmError;

/// Input split shared by `swap` and the off-chain preview path.
pub struct SwapSplit {
    /// Pair fee, credited to the input side's accumulator.
    pub fee: u64,
    /// Portion that participates in the curve math.
    pub net_in: u64,
}

/// Split a swap input into pair fee and net curve input.
/// `fee_rate` is a fraction of SCALE and is validated `< SCALE` at pool
/// creation, so `fee < amount_in` always.
pub fn split_fee(amount_in: u64, fee_rate: u64) -> Result<SwapSplit> {
    let fee = (amount_in as u128)
        .checked_mul(fee_rate as u128)
        .ok_or(AmmError::MathOverflow)?
        / SCALE;
    let fee = fee as u64;
    Ok(SwapSplit {
        fee,
        net_in: amount_in - fee,
    })
}

/// Accumulator delta for a collected fee: `fee * SCALE / total_weight`,
/// divide-first so the intermediate product stays inside u128.
pub fn fee_per_weight_delta(fee: u64, total_weight: u64) -> Result<u128> {
    if fee == 0 || total_weight == 0 {
        return Ok(0);
    }
    let w = total_weight as u128;
    let q = fee as u128 / w;
    let r = fee as u128 % w;
    q.checked_mul(SCALE)
        .ok_or(AmmError::MathOverflow)?
        .checked_add(r * SCALE / w)
        .ok_or(error!(AmmError::MathOverflow))
}

/// Fee entitlement accrued since the holder's snapshot:
/// `weight * (accumulator - checkpoint) / SCALE`, rounded down.
pub fn pending_fees(weight: u64, accumulator: u128, checkpoint: u128) -> Result<u64> {
    let delta = accumulator.saturating_sub(checkpoint);
    let owed = (weight as u128)
        .checked_mul(delta)
        .ok_or(AmmError::MathOverflow)?
        / SCALE;
    u64::try_from(owed).map_err(|_| error!(AmmError::MathOverflow))
}

/// One side of a withdrawal, gross to net.
pub struct WithdrawSide {
    /// Proportional reserve share removed from the pool.
    pub gross: u64,
    /// Unclaimed fee entitlement subtracted so it is not paid twice.
    pub fee_entitlement: u64,
    /// Protocol skim routed to the fee distributor.
    pub protocol_fee: u64,
    /// Amount transferred to the withdrawer.
    pub payout: u64,
}

/// Withdrawal breakdown for one side:
/// `gross = reserve * weight / total_weight`, minus the holder's unclaimed
/// fee entitlement, minus the protocol-fee rate applied to that net amount.
/// Every step truncates toward zero in the pool's favor.
pub fn withdraw_side(
    reserve: u64,
    total_weight: u64,
    weight: u64,
    fee_entitlement: u64,
    protocol_fee_rate: u64,
) -> Result<WithdrawSide> {
    if weight == 0 || total_weight == 0 {
        return Ok(WithdrawSide {
            gross: 0,
            fee_entitlement: 0,
            protocol_fee: 0,
            payout: 0,
        });
    }
    let gross = (reserve as u128)
        .checked_mul(weight as u128)
        .ok_or(AmmError::MathOverflow)?
        / total_weight as u128;
    let gross = gross as u64;

    let entitlement = fee_entitlement.min(gross);
    let net = gross - entitlement;
    let protocol_fee = ((net as u128)
        .checked_mul(protocol_fee_rate as u128)
        .ok_or(AmmError::MathOverflow)?
        / SCALE) as u64;

    Ok(WithdrawSide {
        gross,
        fee_entitlement: entitlement,
        protocol_fee,
        payout: net - protocol_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE_0_3_PCT: u64 = 3_000_000_000_000_000; // 0.003 * SCALE
    const PROTOCOL_1_PCT: u64 = 10_000_000_000_000_000; // 0.01 * SCALE

    #[test]
    fn split_fee_concrete() {
        let split = split_fee(50_000, FEE_0_3_PCT).unwrap();
        assert_eq!(split.fee, 150);
        assert_eq!(split.net_in, 49_850);
    }

    #[test]
    fn split_fee_zero_rate() {
        let split = split_fee(50_000, 0).unwrap();
        assert_eq!(split.fee, 0);
        assert_eq!(split.net_in, 50_000);
    }

    #[test]
    fn split_fee_rounds_down() {
        // 0.3% of 333 = 0.999 -> 0; the dust stays with the trader's input,
        // never with the fee.
        let split = split_fee(333, FEE_0_3_PCT).unwrap();
        assert_eq!(split.fee, 0);
        assert_eq!(split.net_in, 333);
    }

    #[test]
    fn accumulator_roundtrip_exact() {
        // A sole depositor recovers the entire fee.
        let delta = fee_per_weight_delta(150, 100_000).unwrap();
        assert_eq!(delta, 150 * SCALE / 100_000);
        assert_eq!(pending_fees(100_000, delta, 0).unwrap(), 150);
    }

    #[test]
    fn accumulator_divide_first_matches_u128_wide() {
        // Large fee and tiny weight: q * SCALE dominates.
        let delta = fee_per_weight_delta(u64::MAX, 3).unwrap();
        let expected = (u64::MAX as u128 / 3) * SCALE + (u64::MAX as u128 % 3) * SCALE / 3;
        assert_eq!(delta, expected);
    }

    #[test]
    fn accumulator_results_compose_with_question_mark() {
        // Delta and pending share the handler error type, so a handler can
        // chain both with `?`.
        fn credit_and_claim(fee: u64, weight: u64) -> Result<u64> {
            let delta = fee_per_weight_delta(fee, weight)?;
            pending_fees(weight, delta, 0)
        }
        assert_eq!(credit_and_claim(150, 100_000).unwrap(), 150);
        assert_eq!(credit_and_claim(u64::MAX, 1).unwrap(), u64::MAX);
    }

    #[test]
    fn accumulator_zero_weight_is_noop() {
        assert_eq!(fee_per_weight_delta(1_000, 0).unwrap(), 0);
    }

    #[test]
    fn fees_prorated_by_weight() {
        // Two depositors at weights 100 and 300 split a fee 1:3.
        let total = 400u64;
        let delta = fee_per_weight_delta(1_000, total).unwrap();
        let a = pending_fees(100, delta, 0).unwrap();
        let b = pending_fees(300, delta, 0).unwrap();
        assert_eq!(a, 250);
        assert_eq!(b, 750);
        assert!(a + b <= 1_000);
    }

    #[test]
    fn fees_prorated_independent_of_order() {
        // A fee accrued after the second deposit pays both positions from
        // their own snapshots.
        let mut acc = fee_per_weight_delta(900, 300).unwrap(); // only w1=300 present
        let checkpoint_w2 = acc; // w2 joins here
        acc += fee_per_weight_delta(800, 400).unwrap(); // w1=300, w2=100
        let w1 = pending_fees(300, acc, 0).unwrap();
        let w2 = pending_fees(100, acc, checkpoint_w2).unwrap();
        assert_eq!(w1, 900 + 600);
        assert_eq!(w2, 200);
    }

    #[test]
    fn pending_rounds_down() {
        let delta = fee_per_weight_delta(100, 3).unwrap();
        // each unit of weight gets 33.33..; total claimed never exceeds fee
        let each = pending_fees(1, delta, 0).unwrap();
        assert_eq!(each, 33);
        assert!(3 * each <= 100);
    }

    #[test]
    fn withdraw_side_concrete_scenario() {
        // Single-LP pool: reserve 150_000, weight == total weight,
        // entitlement 150, 1% protocol fee.
        let side = withdraw_side(150_000, 100_000, 100_000, 150, PROTOCOL_1_PCT).unwrap();
        assert_eq!(side.gross, 150_000);
        assert_eq!(side.fee_entitlement, 150);
        assert_eq!(side.protocol_fee, 1_498); // 1% of 149_850, truncated
        assert_eq!(side.payout, 148_352);
    }

    #[test]
    fn withdraw_side_partial_share() {
        let side = withdraw_side(90_000, 300, 100, 0, 0).unwrap();
        assert_eq!(side.gross, 30_000);
        assert_eq!(side.payout, 30_000);
    }

    #[test]
    fn withdraw_side_zero_weight() {
        let side = withdraw_side(90_000, 300, 0, 0, PROTOCOL_1_PCT).unwrap();
        assert_eq!(side.gross, 0);
        assert_eq!(side.payout, 0);
    }

    #[test]
    fn withdraw_side_entitlement_capped_at_gross() {
        let side = withdraw_side(100, 10, 1, 50, 0).unwrap();
        assert_eq!(side.gross, 10);
        assert_eq!(side.fee_entitlement, 10);
        assert_eq!(side.payout, 0);
    }
}
