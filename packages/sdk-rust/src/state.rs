//! On-chain account deserialization.
//!
//! Parses raw account bytes for `Amm` (97 bytes), `Pool` (251 bytes) and
//! `Position` (137 bytes). Byte offsets mirror the Anchor `#[account]`
//! layout exactly.

use crate::error::{Error, Result};
use solana_sdk::pubkey::Pubkey;

// ─── Amm ──────────────────────────────────────────────────────────────────────

/// Deserialized global `Amm` registry/config account.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// admin(32)  fee_distributor(32)  protocol_fee_rate(8)
/// amplification(8)  pool_count(8)  bump(1)  = 97 bytes
/// ```
#[derive(Debug, Clone)]
pub struct AmmState {
    pub admin:             Pubkey,
    pub fee_distributor:   Pubkey,
    /// Protocol skim on net withdrawals, as a fraction of 1e18.
    pub protocol_fee_rate: u64,
    /// Stabilized-curve amplification factor, as a fraction of 1e18.
    pub amplification:     u64,
    /// Pool IDs issued so far; valid PIDs are `1..=pool_count`.
    pub pool_count:        u64,
}

/// Deserialize an `Amm` account from raw bytes.
pub fn parse_amm(data: &[u8]) -> Result<AmmState> {
    const EXPECTED: usize = 97;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Amm account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(AmmState {
        admin:             read_pubkey(data, 8)?,
        fee_distributor:   read_pubkey(data, 40)?,
        protocol_fee_rate: read_u64(data, 72)?,
        amplification:     read_u64(data, 80)?,
        pool_count:        read_u64(data, 88)?,
    })
}

// ─── Pool ─────────────────────────────────────────────────────────────────────

/// Deserialized `Pool` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// pool_id(8)  authority(32)  authority_bump(1)
/// token_a_mint(32)  token_b_mint(32)  token_a_vault(32)  token_b_vault(32)
/// fee_rate(8)  stable(1)  reserve_a(8)  reserve_b(8)
/// total_weight_a(8)  total_weight_b(8)
/// fee_per_weight_a(16)  fee_per_weight_b(16)  bump(1)  = 251 bytes
/// ```
#[derive(Debug, Clone)]
pub struct PoolState {
    pub pool_id:          u64,
    pub authority:        Pubkey,
    pub token_a_mint:     Pubkey,
    pub token_b_mint:     Pubkey,
    pub token_a_vault:    Pubkey,
    pub token_b_vault:    Pubkey,
    /// Pair fee taken from each swap input, as a fraction of 1e18.
    pub fee_rate:         u64,
    /// True for the stabilized (amplified) curve, false for constant-product.
    pub stable:           bool,
    pub reserve_a:        u64,
    pub reserve_b:        u64,
    pub total_weight_a:   u64,
    pub total_weight_b:   u64,
    /// Cumulative fee per unit of principal weight, 1e18-scaled.
    pub fee_per_weight_a: u128,
    /// Cumulative fee per unit of principal weight, 1e18-scaled.
    pub fee_per_weight_b: u128,
}

impl PoolState {
    pub fn is_pool_token(&self, mint: &Pubkey) -> bool {
        *mint == self.token_a_mint || *mint == self.token_b_mint
    }
}

/// Deserialize a `Pool` account from raw bytes.
pub fn parse_pool(data: &[u8]) -> Result<PoolState> {
    const EXPECTED: usize = 251;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Pool account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(PoolState {
        pool_id:          read_u64(data, 8)?,
        authority:        read_pubkey(data, 16)?,
        token_a_mint:     read_pubkey(data, 49)?,
        token_b_mint:     read_pubkey(data, 81)?,
        token_a_vault:    read_pubkey(data, 113)?,
        token_b_vault:    read_pubkey(data, 145)?,
        fee_rate:         read_u64(data, 177)?,
        stable:           data[185] != 0,
        reserve_a:        read_u64(data, 186)?,
        reserve_b:        read_u64(data, 194)?,
        total_weight_a:   read_u64(data, 202)?,
        total_weight_b:   read_u64(data, 210)?,
        fee_per_weight_a: read_u128(data, 218)?,
        fee_per_weight_b: read_u128(data, 234)?,
    })
}

// ─── Position ─────────────────────────────────────────────────────────────────

/// Deserialized `Position` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  pool(32)  weight_a(8)  weight_b(8)
/// fee_checkpoint_a(16)  fee_checkpoint_b(16)
/// fees_owed_a(8)  fees_owed_b(8)  bump(1)  = 137 bytes
/// ```
#[derive(Debug, Clone)]
pub struct PositionState {
    pub owner:            Pubkey,
    pub pool:             Pubkey,
    pub weight_a:         u64,
    pub weight_b:         u64,
    /// Accumulator snapshot at last deposit or claim (for pending-fee calc).
    pub fee_checkpoint_a: u128,
    /// Accumulator snapshot at last deposit or claim (for pending-fee calc).
    pub fee_checkpoint_b: u128,
    /// Fees already settled on-chain but not yet transferred.
    pub fees_owed_a:      u64,
    /// Fees already settled on-chain but not yet transferred.
    pub fees_owed_b:      u64,
}

/// Deserialize a `Position` account from raw bytes.
pub fn parse_position(data: &[u8]) -> Result<PositionState> {
    const EXPECTED: usize = 137;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Position account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(PositionState {
        owner:            read_pubkey(data, 8)?,
        pool:             read_pubkey(data, 40)?,
        weight_a:         read_u64(data, 72)?,
        weight_b:         read_u64(data, 80)?,
        fee_checkpoint_a: read_u128(data, 88)?,
        fee_checkpoint_b: read_u128(data, 104)?,
        fees_owed_a:      read_u64(data, 120)?,
        fees_owed_b:      read_u64(data, 128)?,
    })
}

// ─── SPL token account ────────────────────────────────────────────────────────

/// Read the `amount` field from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_amount(data: &[u8]) -> Result<u64> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    read_u64(data, 64)
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let b: [u8; 32] = data[offset..offset + 32]
        .try_into()
        .map_err(|_| Error::ParseError {
            offset,
            reason: "slice too short for Pubkey (32 bytes)".into(),
        })?;
    Ok(Pubkey::from(b))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u64".into() })?;
    Ok(u64::from_le_bytes(b))
}

pub(crate) fn read_u128(data: &[u8], offset: usize) -> Result<u128> {
    let b: [u8; 16] = data[offset..offset + 16]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u128".into() })?;
    Ok(u128::from_le_bytes(b))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_bytes() -> Vec<u8> {
        let mut d = vec![0u8; 251];
        d[8..16].copy_from_slice(&7u64.to_le_bytes()); // pool_id
        d[16..48].copy_from_slice(Pubkey::new_unique().as_ref()); // authority
        d[48] = 254; // authority_bump
        d[177..185].copy_from_slice(&3_000_000_000_000_000u64.to_le_bytes()); // fee_rate
        d[185] = 1; // stable
        d[186..194].copy_from_slice(&150_000u64.to_le_bytes()); // reserve_a
        d[194..202].copy_from_slice(&66_734u64.to_le_bytes()); // reserve_b
        d[202..210].copy_from_slice(&100_000u64.to_le_bytes()); // total_weight_a
        d[210..218].copy_from_slice(&100_000u64.to_le_bytes()); // total_weight_b
        d[218..234].copy_from_slice(&1_500_000_000_000_000u128.to_le_bytes()); // fpw_a
        d[250] = 255; // bump
        d
    }

    #[test]
    fn parse_pool_roundtrip() {
        let pool = parse_pool(&pool_bytes()).unwrap();
        assert_eq!(pool.pool_id, 7);
        assert_eq!(pool.fee_rate, 3_000_000_000_000_000);
        assert!(pool.stable);
        assert_eq!(pool.reserve_a, 150_000);
        assert_eq!(pool.reserve_b, 66_734);
        assert_eq!(pool.total_weight_a, 100_000);
        assert_eq!(pool.fee_per_weight_a, 1_500_000_000_000_000);
        assert_eq!(pool.fee_per_weight_b, 0);
    }

    #[test]
    fn parse_pool_rejects_short_data() {
        assert!(parse_pool(&[0u8; 100]).is_err());
    }

    #[test]
    fn parse_position_roundtrip() {
        let owner = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mut d = vec![0u8; 137];
        d[8..40].copy_from_slice(owner.as_ref());
        d[40..72].copy_from_slice(pool.as_ref());
        d[72..80].copy_from_slice(&100_000u64.to_le_bytes()); // weight_a
        d[88..104].copy_from_slice(&42u128.to_le_bytes()); // checkpoint_a
        d[120..128].copy_from_slice(&150u64.to_le_bytes()); // fees_owed_a

        let pos = parse_position(&d).unwrap();
        assert_eq!(pos.owner, owner);
        assert_eq!(pos.pool, pool);
        assert_eq!(pos.weight_a, 100_000);
        assert_eq!(pos.weight_b, 0);
        assert_eq!(pos.fee_checkpoint_a, 42);
        assert_eq!(pos.fees_owed_a, 150);
    }

    #[test]
    fn parse_amm_roundtrip() {
        let admin = Pubkey::new_unique();
        let mut d = vec![0u8; 97];
        d[8..40].copy_from_slice(admin.as_ref());
        d[40..72].copy_from_slice(admin.as_ref());
        d[72..80].copy_from_slice(&10_000_000_000_000_000u64.to_le_bytes());
        d[88..96].copy_from_slice(&3u64.to_le_bytes());

        let amm = parse_amm(&d).unwrap();
        assert_eq!(amm.admin, admin);
        assert_eq!(amm.protocol_fee_rate, 10_000_000_000_000_000);
        assert_eq!(amm.pool_count, 3);
    }

    #[test]
    fn parse_token_amount_reads_offset_64() {
        let mut d = vec![0u8; 165];
        d[64..72].copy_from_slice(&123_456u64.to_le_bytes());
        assert_eq!(parse_token_amount(&d).unwrap(), 123_456);
    }
}
