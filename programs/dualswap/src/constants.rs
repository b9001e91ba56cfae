/// PDA seeds
pub const AMM_SEED: &[u8] = b"amm";
pub const POOL_SEED: &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";

/// Implementation-wide fixed-point scale (1e18).
/// Pair-fee rates, the protocol-fee rate and the amplification factor are all
/// fractions of SCALE (0.003 * SCALE = 0.3%); the per-weight fee accumulators
/// are SCALE-scaled as well.
pub const SCALE: u128 = 1_000_000_000_000_000_000;
