use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::constants::SCALE;
use crate::error::AmmError;

/// Pricing curve of a pool. One tagged variant consumed by a single quote
/// function; the amplification factor comes from the global `Amm` config at
/// call time, never from per-pool state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    ConstantProduct,
    Stabilized { amplification: u64 },
}

impl Curve {
    /// Output for `net_in` (input already net of the pair fee) against the
    /// pre-trade reserves. Truncates toward zero, so the trader never
    /// receives more than the exact curve amount.
    pub fn quote(self, reserve_in: u64, reserve_out: u64, net_in: u64) -> Result<u64> {
        match self {
            Curve::ConstantProduct => constant_product_out(reserve_in, reserve_out, net_in),
            Curve::Stabilized { amplification } => {
                stabilized_out(reserve_in, reserve_out, net_in, amplification)
            }
        }
    }

    /// True when the post-trade reserves keep the curve value at or above its
    /// pre-trade value. Checked before any tokens leave the pool.
    pub fn holds_after(self, reserve_in: u64, reserve_out: u64, net_in: u64, out: u64) -> bool {
        if out > reserve_out {
            return false;
        }
        let x1 = match reserve_in.checked_add(net_in) {
            Some(v) => v,
            None => return false,
        };
        match self {
            Curve::ConstantProduct => {
                let before = U256::from(reserve_in) * U256::from(reserve_out);
                let after = U256::from(x1) * U256::from(reserve_out - out);
                after >= before
            }
            Curve::Stabilized { amplification } => {
                let size = reserve_in as u128 + reserve_out as u128;
                stable_value(x1, reserve_out - out, amplification, size)
                    >= stable_value(reserve_in, reserve_out, amplification, size)
            }
        }
    }
}

/// Constant-product quote: `out = y * dx / (x + dx)`, algebraically equal to
/// `y - x*y/(x + dx)` but with the truncation falling on the output.
pub fn constant_product_out(reserve_in: u64, reserve_out: u64, net_in: u64) -> Result<u64> {
    let num = (reserve_out as u128)
        .checked_mul(net_in as u128)
        .ok_or(AmmError::MathOverflow)?;
    let den = (reserve_in as u128)
        .checked_add(net_in as u128)
        .ok_or(AmmError::MathOverflow)?;
    Ok((num / den) as u64)
}

// Stabilized invariant, evaluated in U256:
//
//   F(x, y) = (SCALE - amp) * x * y + amp * (x + y) * size
//
// where `size` is the pre-trade reserve sum, fixed for one solve. amp = 0 is
// the constant-product curve, amp = SCALE the constant-sum curve; in between
// the level set flattens toward 1:1 near parity. Monotone increasing in both
// reserves, so the post-trade output side can be solved by bisection.
fn stable_value(x: u64, y: u64, amp: u64, size: u128) -> U256 {
    let cp = U256::from(SCALE - amp as u128) * U256::from(x) * U256::from(y);
    let cs = U256::from(amp) * (U256::from(x) + U256::from(y)) * U256::from(size);
    cp + cs
}

/// Stabilized quote: the largest output that keeps
/// `F(x + net_in, y - out) >= F(x, y)`, i.e. the smallest remaining `y` that
/// still satisfies the invariant within one unit.
pub fn stabilized_out(reserve_in: u64, reserve_out: u64, net_in: u64, amp: u64) -> Result<u64> {
    require!((amp as u128) <= SCALE, AmmError::InvalidAmplification);
    if amp == 0 {
        return constant_product_out(reserve_in, reserve_out, net_in);
    }

    let size = reserve_in as u128 + reserve_out as u128;
    let before = stable_value(reserve_in, reserve_out, amp, size);
    let x1 = reserve_in
        .checked_add(net_in)
        .ok_or(AmmError::MathOverflow)?;

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
