//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Dualswap SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Pool discovery ───────────────────────────────────────────────────────
    /// No pool exists for the given mint pair.
    #[error("Pool not found for mints {0} / {1}")]
    PoolNotFound(Pubkey, Pubkey),

    /// The pool exists but one or both reserves are empty.
    #[error("Pool has no liquidity — seed it with deposit first")]
    NoLiquidity,

    /// The queried mint is not one of the pool's two tokens.
    #[error("Mint {0} is not part of this pool")]
    WrongToken(Pubkey),

    // ── Swap slippage ────────────────────────────────────────────────────────
    /// The simulated output would fall below the caller's tolerance.
    #[error("Slippage guard triggered: estimated_out={estimated}, min_amount_out={min}")]
    SlippageExceeded { estimated: u64, min: u64 },

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in fee / swap math")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
