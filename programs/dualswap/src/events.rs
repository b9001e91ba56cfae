use anchor_lang::prelude::*;

/// Emitted once per `create_pair`; collaborators index pools from this.
#[event]
pub struct PairCreated {
    pub pool_id: u64,
    pub pool: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub fee_rate: u64,
    pub stable: bool,
}
