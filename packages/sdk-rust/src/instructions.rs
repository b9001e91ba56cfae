//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.
//! Anchor account discriminators:    `sha256("account:{TypeName}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};
use std::str::FromStr;

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub(crate) fn spl_token_id() -> Pubkey {
    Pubkey::from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap()
}

pub(crate) fn ata_program_id() -> Pubkey {
    Pubkey::from_str("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL").unwrap()
}

// ─── PDA seeds (mirrors programs/dualswap/src/constants.rs) ──────────────────

pub const AMM_SEED:            &[u8] = b"amm";
pub const POOL_SEED:           &[u8] = b"pool";
pub const POSITION_SEED:       &[u8] = b"position";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the global `Amm` registry PDA.
pub fn derive_amm(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[AMM_SEED], program_id)
}

/// Derive the pool PDA for a mint pair.
///
/// Seeds use the canonically ordered pair (min, max), so both argument
/// orders resolve to the same address.
pub fn derive_pool(mint_a: &Pubkey, mint_b: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    let (lo, hi) = if mint_a <= mint_b { (mint_a, mint_b) } else { (mint_b, mint_a) };
    Pubkey::find_program_address(&[POOL_SEED, lo.as_ref(), hi.as_ref()], program_id)
}

/// Derive the pool-authority PDA that signs for vault transfers.
pub fn derive_pool_authority(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_AUTHORITY_SEED, pool.as_ref()], program_id)
}

/// Derive the per-depositor position PDA for a pool.
pub fn derive_position(pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the Associated Token Account for a wallet + mint.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    let token_prog = spl_token_id();
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_prog.as_ref(), mint.as_ref()],
        &ata_program_id(),
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}

// ─── initialize ───────────────────────────────────────────────────────────────

/// Build the `initialize` instruction. The signer becomes admin and the
/// initial fee distributor.
pub fn initialize_ix(program_id: &Pubkey, admin: &Pubkey) -> Instruction {
    let (amm, _) = derive_amm(program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(amm, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: disc("initialize").to_vec(),
    }
}

// ─── admin knobs ──────────────────────────────────────────────────────────────

fn admin_update_ix(program_id: &Pubkey, admin: &Pubkey, data: Vec<u8>) -> Instruction {
    let (amm, _) = derive_amm(program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(amm, false),
        ],
        data,
    }
}

/// Build `set_protocol_fee_rate`. `rate` is a fraction of 1e18.
pub fn set_protocol_fee_rate_ix(program_id: &Pubkey, admin: &Pubkey, rate: u64) -> Instruction {
    let mut data = disc("set_protocol_fee_rate").to_vec();
    data.extend_from_slice(&rate.to_le_bytes());
    admin_update_ix(program_id, admin, data)
}

/// Build `set_amplification`. `amplification` is a fraction of 1e18.
pub fn set_amplification_ix(program_id: &Pubkey, admin: &Pubkey, amplification: u64) -> Instruction {
    let mut data = disc("set_amplification").to_vec();
    data.extend_from_slice(&amplification.to_le_bytes());
    admin_update_ix(program_id, admin, data)
}

/// Build `set_fee_distributor`.
pub fn set_fee_distributor_ix(
    program_id: &Pubkey,
    admin: &Pubkey,
    fee_distributor: &Pubkey,
) -> Instruction {
    let mut data = disc("set_fee_distributor").to_vec();
    data.extend_from_slice(fee_distributor.as_ref());
    admin_update_ix(program_id, admin, data)
}

// ─── create_pair ──────────────────────────────────────────────────────────────

/// Build the `create_pair` instruction.
///
/// `vault_a` and `vault_b` must be fresh keypairs — they will be initialised
/// as SPL token accounts owned by the pool authority.  Both must be included
/// as additional signers when the transaction is submitted.
#[allow(clippy::too_many_arguments)]
pub fn create_pair_ix(
    program_id: &Pubkey,
    creator:    &Pubkey,
    mint_a:     &Pubkey,
    mint_b:     &Pubkey,
    vault_a:    &Pubkey,
    vault_b:    &Pubkey,
    fee_rate:   u64,
    stable:     bool,
) -> Instruction {
    let (amm, _)            = derive_amm(program_id);
    let (pool, _)           = derive_pool(mint_a, mint_b, program_id);
    let (pool_authority, _) = derive_pool_authority(&pool, program_id);

    let mut data = disc("create_pair").to_vec();
    data.extend_from_slice(&fee_rate.to_le_bytes());
    data.push(stable as u8);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator,                true),   // mut + signer
            AccountMeta::new(amm,                     false),  // mut (pool_count)
            AccountMeta::new_readonly(*mint_a,        false),
            AccountMeta::new_readonly(*mint_b,        false),
            AccountMeta::new(pool,                    false),  // mut PDA (init)
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(*vault_a,                true),   // mut + signer (init)
            AccountMeta::new(*vault_b,                true),   // mut + signer (init)
            AccountMeta::new_readonly(spl_token_id(), false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data,
    }
}

// ─── deposit ──────────────────────────────────────────────────────────────────

/// Build the `deposit` instruction.
///
/// `vault_a` / `vault_b` must be the pool's `token_a_vault` / `token_b_vault`;
/// `depositor_token_a` / `depositor_token_b` must hold the pool's mints in
/// pool order and be owned by `depositor`.
#[allow(clippy::too_many_arguments)]
pub fn deposit_ix(
    program_id:        &Pubkey,
    depositor:         &Pubkey,
    pool:              &Pubkey,
    vault_a:           &Pubkey,
    vault_b:           &Pubkey,
    depositor_token_a: &Pubkey,
    depositor_token_b: &Pubkey,
    amount_a:          u64,
    amount_b:          u64,
) -> Instruction {
    let (amm, _)      = derive_amm(program_id);
    let (position, _) = derive_position(pool, depositor, program_id);

    let mut data = disc("deposit").to_vec();
    data.extend_from_slice(&amount_a.to_le_bytes());
    data.extend_from_slice(&amount_b.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*depositor,         true),   // mut + signer
            AccountMeta::new_readonly(amm,       false),
            AccountMeta::new(*pool,              false),  // mut
            AccountMeta::new(position,           false),  // mut PDA (init_if_needed)
            AccountMeta::new(*vault_a,           false),  // mut
            AccountMeta::new(*vault_b,           false),  // mut
            AccountMeta::new(*depositor_token_a, false),  // mut
            AccountMeta::new(*depositor_token_b, false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data,
    }
}

// ─── swap ─────────────────────────────────────────────────────────────────────

/// Build the `swap` instruction.
///
/// Pass `pool.token_a_vault` and `pool.token_b_vault` regardless of swap
/// direction — the program reads `token_in` to determine which transfers to
/// make.
#[allow(clippy::too_many_arguments)]
pub fn swap_ix(
    program_id:       &Pubkey,
    trader:           &Pubkey,
    pool:             &Pubkey,
    vault_a:          &Pubkey,
    vault_b:          &Pubkey,
    trader_token_in:  &Pubkey,
    trader_token_out: &Pubkey,
    token_in:         &Pubkey,
    amount_in:        u64,
) -> Instruction {
    let (amm, _)            = derive_amm(program_id);
    let (pool_authority, _) = derive_pool_authority(pool, program_id);

    let mut data = disc("swap").to_vec();
    data.extend_from_slice(token_in.as_ref());
    data.extend_from_slice(&amount_in.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*trader,                 true),   // mut + signer
            AccountMeta::new_readonly(amm,            false),
            AccountMeta::new(*pool,                   false),  // mut
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(*vault_a,                false),  // mut
            AccountMeta::new(*vault_b,                false),  // mut
            AccountMeta::new(*trader_token_in,        false),  // mut
            AccountMeta::new(*trader_token_out,       false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
        ],
        data,
    }
}

// ─── withdraw ─────────────────────────────────────────────────────────────────

/// Build the `withdraw` instruction.
///
/// `distributor_token_a` / `distributor_token_b` must be owned by the
/// registry's fee distributor and hold the pool's mints.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_ix(
    program_id:          &Pubkey,
    withdrawer:          &Pubkey,
    pool:                &Pubkey,
    vault_a:             &Pubkey,
    vault_b:             &Pubkey,
    withdrawer_token_a:  &Pubkey,
    withdrawer_token_b:  &Pubkey,
    distributor_token_a: &Pubkey,
    distributor_token_b: &Pubkey,
) -> Instruction {
    let (amm, _)            = derive_amm(program_id);
    let (pool_authority, _) = derive_pool_authority(pool, program_id);
    let (position, _)       = derive_position(pool, withdrawer, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*withdrawer,             true),   // mut + signer
            AccountMeta::new_readonly(amm,            false),
            AccountMeta::new(*pool,                   false),  // mut
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position,                false),  // mut
            AccountMeta::new(*vault_a,                false),  // mut
            AccountMeta::new(*vault_b,                false),  // mut
            AccountMeta::new(*withdrawer_token_a,     false),  // mut
            AccountMeta::new(*withdrawer_token_b,     false),  // mut
            AccountMeta::new(*distributor_token_a,    false),  // mut
            AccountMeta::new(*distributor_token_b,    false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
        ],
        data: disc("withdraw").to_vec(),
    }
}

/// Build the read-only `withdraw_preview` instruction (for simulation RPC).
pub fn withdraw_preview_ix(program_id: &Pubkey, withdrawer: &Pubkey, pool: &Pubkey) -> Instruction {
    let (amm, _)      = derive_amm(program_id);
    let (position, _) = derive_position(pool, withdrawer, program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*withdrawer, true),
            AccountMeta::new_readonly(amm,         false),
            AccountMeta::new_readonly(*pool,       false),
            AccountMeta::new_readonly(position,    false),
        ],
        data: disc("withdraw_preview").to_vec(),
    }
}

// ─── withdraw_fees ────────────────────────────────────────────────────────────

/// Build the `withdraw_fees` instruction.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_fees_ix(
    program_id:      &Pubkey,
    claimer:         &Pubkey,
    pool:            &Pubkey,
    vault_a:         &Pubkey,
    vault_b:         &Pubkey,
    claimer_token_a: &Pubkey,
    claimer_token_b: &Pubkey,
) -> Instruction {
    let (amm, _)            = derive_amm(program_id);
    let (pool_authority, _) = derive_pool_authority(pool, program_id);
    let (position, _)       = derive_position(pool, claimer, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*claimer,                true),   // mut + signer
            AccountMeta::new_readonly(amm,            false),
            AccountMeta::new(*pool,                   false),  // mut
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position,                false),  // mut
            AccountMeta::new(*vault_a,                false),  // mut
            AccountMeta::new(*vault_b,                false),  // mut
            AccountMeta::new(*claimer_token_a,        false),  // mut
            AccountMeta::new(*claimer_token_b,        false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
        ],
        data: disc("withdraw_fees").to_vec(),
    }
}

/// Build the read-only `view_earned_fees` instruction.
pub fn view_earned_fees_ix(
    program_id: &Pubkey,
    claimer:    &Pubkey,
    pool:       &Pubkey,
    token:      &Pubkey,
) -> Instruction {
    let (amm, _)      = derive_amm(program_id);
    let (position, _) = derive_position(pool, claimer, program_id);

    let mut data = disc("view_earned_fees").to_vec();
    data.extend_from_slice(token.as_ref());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*claimer, true),
            AccountMeta::new_readonly(amm,      false),
            AccountMeta::new_readonly(*pool,    false),
            AccountMeta::new_readonly(position, false),
        ],
        data,
    }
}

// ─── pool queries ─────────────────────────────────────────────────────────────

fn pool_query_ix(program_id: &Pubkey, pool: &Pubkey, data: Vec<u8>) -> Instruction {
    let (amm, _) = derive_amm(program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(amm,   false),
            AccountMeta::new_readonly(*pool, false),
        ],
        data,
    }
}

/// Build the read-only `exchange_rate` instruction.
pub fn exchange_rate_ix(program_id: &Pubkey, pool: &Pubkey, token: &Pubkey) -> Instruction {
    let mut data = disc("exchange_rate").to_vec();
    data.extend_from_slice(token.as_ref());
    pool_query_ix(program_id, pool, data)
}

/// Build the read-only `total_value_locked` instruction.
pub fn total_value_locked_ix(program_id: &Pubkey, pool: &Pubkey, token: &Pubkey) -> Instruction {
    let mut data = disc("total_value_locked").to_vec();
    data.extend_from_slice(token.as_ref());
    pool_query_ix(program_id, pool, data)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_pda_is_order_independent() {
        let program = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_eq!(derive_pool(&a, &b, &program), derive_pool(&b, &a, &program));
    }

    #[test]
    fn swap_data_layout() {
        let program = Pubkey::new_unique();
        let token_in = Pubkey::new_unique();
        let ix = swap_ix(
            &program,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &token_in,
            50_000,
        );
        assert_eq!(ix.data.len(), 8 + 32 + 8);
        assert_eq!(&ix.data[8..40], token_in.as_ref());
        assert_eq!(&ix.data[40..48], &50_000u64.to_le_bytes());
        assert_eq!(ix.accounts.len(), 9);
    }

    #[test]
    fn create_pair_data_layout() {
        let program = Pubkey::new_unique();
        let ix = create_pair_ix(
            &program,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            3_000_000_000_000_000,
            true,
        );
        assert_eq!(ix.data.len(), 8 + 8 + 1);
        assert_eq!(ix.data[16], 1);
        // Both vault accounts must be signers for the `init` constraints.
        assert!(ix.accounts[6].is_signer && ix.accounts[7].is_signer);
    }
}
