//! State-transition sequences over the pure engine math: deposits, swaps,
//! fee claims and withdrawals applied to in-memory `Pool`/`Position` state
//! exactly the way the instruction handlers apply them.

use anchor_lang::prelude::Pubkey;

use dualswap::instructions::curve::Curve;
use dualswap::instructions::deposit::settle_position;
use dualswap::instructions::swap_math;
use dualswap::instructions::withdraw::breakdown;
use dualswap::state::{Pool, Position};

const SCALE: u128 = dualswap::constants::SCALE;
const FEE_0_3_PCT: u64 = 3_000_000_000_000_000; // 0.003 * SCALE
const PROTOCOL_1_PCT: u64 = 10_000_000_000_000_000; // 0.01 * SCALE
const AMP: u64 = 25_000_000_000_000_000; // 0.025 * SCALE

fn new_pool(fee_rate: u64, stable: bool) -> Pool {
    Pool {
        pool_id: 1,
        authority: Pubkey::new_unique(),
        authority_bump: 255,
        token_a_mint: Pubkey::new_unique(),
        token_b_mint: Pubkey::new_unique(),
        token_a_vault: Pubkey::new_unique(),
        token_b_vault: Pubkey::new_unique(),
        fee_rate,
        stable,
        reserve_a: 0,
        reserve_b: 0,
        total_weight_a: 0,
        total_weight_b: 0,
        fee_per_weight_a: 0,
        fee_per_weight_b: 0,
        bump: 255,
    }
}

fn new_position(pool: &Pool) -> Position {
    Position {
        owner: Pubkey::new_unique(),
        pool: Pubkey::new_unique(),
        weight_a: 0,
        weight_b: 0,
        fee_checkpoint_a: pool.fee_per_weight_a,
        fee_checkpoint_b: pool.fee_per_weight_b,
        fees_owed_a: 0,
        fees_owed_b: 0,
        bump: 255,
    }
}

// Mirrors deposit::handler's state mutations.
fn deposit(pool: &mut Pool, position: &mut Position, amount_a: u64, amount_b: u64) {
    settle_position(position, pool.fee_per_weight_a, pool.fee_per_weight_b).unwrap();
    position.weight_a += amount_a;
    position.weight_b += amount_b;
    pool.total_weight_a += amount_a;
    pool.total_weight_b += amount_b;
    pool.reserve_a += amount_a;
    pool.reserve_b += amount_b;
}

// Mirrors swap::handler's state mutations; returns the output amount.
fn swap_a_for_b(pool: &mut Pool, amplification: u64, amount_in: u64) -> u64 {
    let split = swap_math::split_fee(amount_in, pool.fee_rate).unwrap();
    let growth = swap_math::fee_per_weight_delta(split.fee, pool.total_weight_a).unwrap();
    let curve = pool.curve(amplification);
    let out = curve
        .quote(pool.reserve_a, pool.reserve_b, split.net_in)
        .unwrap();
    assert!(out > 0 && out < pool.reserve_b);
    assert!(curve.holds_after(pool.reserve_a, pool.reserve_b, split.net_in, out));
    pool.fee_per_weight_a += growth;
    pool.reserve_a += amount_in;
    pool.reserve_b -= out;
    out
}

// Mirrors withdraw::handler's state mutations; returns (payout, skim) pairs.
fn withdraw(pool: &mut Pool, position: &mut Position, protocol_rate: u64) -> ((u64, u64), (u64, u64)) {
    assert!(!position.is_empty(), "handler guard: NoPosition");
    let (side_a, side_b) = breakdown(pool, position, protocol_rate).unwrap();
    pool.reserve_a -= side_a.gross;
    pool.reserve_b -= side_b.gross;
    pool.total_weight_a -= position.weight_a;
    pool.total_weight_b -= position.weight_b;
    position.weight_a = 0;
    position.weight_b = 0;
    position.fees_owed_a = 0;
    position.fees_owed_b = 0;
    position.fee_checkpoint_a = pool.fee_per_weight_a;
    position.fee_checkpoint_b = pool.fee_per_weight_b;
    (
        (side_a.payout, side_a.protocol_fee),
        (side_b.payout, side_b.protocol_fee),
    )
}

// Mirrors withdraw_fees::handler's state mutations; returns claimed amounts.
fn claim_fees(pool: &mut Pool, position: &mut Position) -> Option<(u64, u64)> {
    assert!(!position.is_empty(), "handler guard: NoPosition");
    settle_position(position, pool.fee_per_weight_a, pool.fee_per_weight_b).unwrap();
    let (owed_a, owed_b) = (position.fees_owed_a, position.fees_owed_b);
    if owed_a == 0 && owed_b == 0 {
        return None; // handler guard: NoFeesToClaim
    }
    position.fees_owed_a = 0;
    position.fees_owed_b = 0;
    pool.reserve_a -= owed_a;
    pool.reserve_b -= owed_b;
    Some((owed_a, owed_b))
}

#[test]
fn concrete_constant_product_scenario() {
    // 0.3% pair fee, 100k/100k single depositor, 50k A swapped in,
    // 1% protocol skim at withdrawal.
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 100_000, 100_000);

    let out = swap_a_for_b(&mut pool, 0, 50_000);
    assert_eq!(out, 33_266); // 100_000 * 49_850 / 149_850, truncated
    assert!(out < 50_000 * 100_000 / 150_000 + 1); // below naive pro-rata
    assert_eq!(pool.reserve_a, 150_000);
    assert_eq!(pool.reserve_b, 100_000 - 33_266);

    // Accrued A-side fee: exactly 0.3% of 50_000.
    let earned = swap_math::pending_fees(lp.weight_a, pool.fee_per_weight_a, lp.fee_checkpoint_a)
        .unwrap();
    assert_eq!(earned, 150);

    let ((payout_a, skim_a), (payout_b, skim_b)) = withdraw(&mut pool, &mut lp, PROTOCOL_1_PCT);
    // (150_000 - 150) minus 1% of the remainder
    assert_eq!(payout_a, 149_850 - 1_498);
    assert_eq!(skim_a, 1_498);
    assert_eq!(payout_b, 66_734 - 667);
    assert_eq!(skim_b, 667);

    // Second withdrawal hits the entitlement guard.
    assert!(lp.is_empty());
    assert_eq!(pool.total_weight_a, 0);
    assert_eq!(pool.total_weight_b, 0);
}

#[test]
fn preview_matches_withdraw() {
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 80_000, 120_000);
    swap_a_for_b(&mut pool, 0, 7_500);

    let (side_a, side_b) = breakdown(&pool, &lp, PROTOCOL_1_PCT).unwrap();
    let ((payout_a, _), (payout_b, _)) = withdraw(&mut pool, &mut lp, PROTOCOL_1_PCT);
    assert_eq!(side_a.payout, payout_a);
    assert_eq!(side_b.payout, payout_b);
}

#[test]
fn conservation_across_sequence() {
    // After any sequence, each reserve covers every depositor's withdrawable
    // amount plus all accrued-but-unclaimed fees on that side.
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp1 = new_position(&pool);
    let mut lp2 = new_position(&pool);

    deposit(&mut pool, &mut lp1, 100_000, 50_000);
    swap_a_for_b(&mut pool, 0, 10_000);
    deposit(&mut pool, &mut lp2, 30_000, 90_000);
    swap_a_for_b(&mut pool, 0, 25_000);
    deposit(&mut pool, &mut lp1, 0, 40_000); // asymmetric top-up

    let mut claimed_a = 0u128;
    let mut claimed_b = 0u128;
    for lp in [&lp1, &lp2] {
        let (side_a, side_b) = breakdown(&pool, lp, 0).unwrap();
        claimed_a += side_a.payout as u128 + side_a.fee_entitlement as u128;
        claimed_b += side_b.payout as u128 + side_b.fee_entitlement as u128;
    }
    assert!(claimed_a <= pool.reserve_a as u128);
    assert!(claimed_b <= pool.reserve_b as u128);
}

#[test]
fn no_double_payment_single_depositor() {
    // Principal + generated fees bound everything a sole depositor can ever
    // extract via claims plus withdrawal.
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 200_000, 200_000);

    let mut fees_generated = 0u64;
    for amount in [5_000u64, 12_000, 40_000] {
        fees_generated += swap_math::split_fee(amount, pool.fee_rate).unwrap().fee;
        swap_a_for_b(&mut pool, 0, amount);
    }

    let (claim_a, claim_b) = claim_fees(&mut pool, &mut lp).unwrap();
    assert!(claim_a <= fees_generated);
    assert_eq!(claim_b, 0);

    let ((payout_a, _), _) = withdraw(&mut pool, &mut lp, 0);
    let total_in_a = 200_000 + 5_000 + 12_000 + 40_000;
    assert!(payout_a as u128 + claim_a as u128 <= total_in_a as u128);
}

#[test]
fn fees_prorated_across_depositors() {
    // lp1 and lp2 hold A-side weights 1:3; a fee accrued while both are in
    // the pool splits 1:3 regardless of deposit order.
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp1 = new_position(&pool);
    let mut lp2 = new_position(&pool);
    deposit(&mut pool, &mut lp1, 50_000, 50_000);
    deposit(&mut pool, &mut lp2, 150_000, 150_000);

    swap_a_for_b(&mut pool, 0, 100_000); // fee 300 on side A

    let e1 = swap_math::pending_fees(lp1.weight_a, pool.fee_per_weight_a, lp1.fee_checkpoint_a)
        .unwrap();
    let e2 = swap_math::pending_fees(lp2.weight_a, pool.fee_per_weight_a, lp2.fee_checkpoint_a)
        .unwrap();
    assert_eq!(e1, 75);
    assert_eq!(e2, 225);
}

#[test]
fn late_depositor_earns_nothing_retroactively() {
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut early = new_position(&pool);
    deposit(&mut pool, &mut early, 100_000, 100_000);
    swap_a_for_b(&mut pool, 0, 60_000); // fee accrues to `early` alone

    let mut late = new_position(&pool);
    deposit(&mut pool, &mut late, 100_000, 100_000);
    let e_late = swap_math::pending_fees(late.weight_a, pool.fee_per_weight_a, late.fee_checkpoint_a)
        .unwrap();
    assert_eq!(e_late, 0);

    let e_early =
        early.fees_owed_a
            + swap_math::pending_fees(early.weight_a, pool.fee_per_weight_a, early.fee_checkpoint_a)
                .unwrap();
    assert_eq!(e_early, 180); // 0.3% of 60_000
}

#[test]
fn claim_is_idempotent_to_zero_state() {
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 100_000, 100_000);
    swap_a_for_b(&mut pool, 0, 50_000);

    let reserve_a_before = pool.reserve_a;
    let (claim_a, claim_b) = claim_fees(&mut pool, &mut lp).unwrap();
    assert_eq!((claim_a, claim_b), (150, 0));
    assert_eq!(pool.reserve_a, reserve_a_before - 150);

    // Nothing left: the second claim trips the NoFeesToClaim guard.
    assert!(claim_fees(&mut pool, &mut lp).is_none());
}

#[test]
fn withdraw_zeroes_position() {
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 10_000, 10_000);
    withdraw(&mut pool, &mut lp, PROTOCOL_1_PCT);
    // A second withdraw trips the NoPosition guard.
    assert!(lp.is_empty());
}

#[test]
fn stabilized_pool_sequence() {
    let mut pool = new_pool(FEE_0_3_PCT, true);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 100_000, 100_000);

    let out = swap_a_for_b(&mut pool, AMP, 50_000);
    let cp_out = Curve::ConstantProduct
        .quote(100_000, 100_000, 49_850)
        .unwrap();
    assert!(out >= cp_out, "stabilized pays at least constant-product");
    assert!(out <= 49_850, "but never better than parity");
    assert_eq!(pool.reserve_a, 150_000);

    // Fee accounting is curve-independent.
    let earned = swap_math::pending_fees(lp.weight_a, pool.fee_per_weight_a, lp.fee_checkpoint_a)
        .unwrap();
    assert_eq!(earned, 150);

    let ((payout_a, _), (payout_b, _)) = withdraw(&mut pool, &mut lp, 0);
    assert_eq!(payout_a, 150_000 - 150);
    assert_eq!(payout_b, 100_000 - out);
    // Sole depositor drains the pool entirely.
    assert_eq!(pool.reserve_a, 0);
    assert_eq!(pool.reserve_b, 0);
}

#[test]
fn exchange_rate_moves_against_input_side() {
    // Spot rate of A (in B per A, SCALE-scaled) must fall after selling A.
    let mut pool = new_pool(FEE_0_3_PCT, false);
    let mut lp = new_position(&pool);
    deposit(&mut pool, &mut lp, 100_000, 100_000);

    let rate_before = pool.reserve_b as u128 * SCALE / pool.reserve_a as u128;
    swap_a_for_b(&mut pool, 0, 20_000);
    let rate_after = pool.reserve_b as u128 * SCALE / pool.reserve_a as u128;
    assert!(rate_after < rate_before);
}
