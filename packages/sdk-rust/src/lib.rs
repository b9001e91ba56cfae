//! Dualswap Rust SDK
//!
//! Dual-curve AMM client for Solana. Any Rust program can swap, deposit
//! liquidity, and query pool state with zero boilerplate — no Anchor
//! dependency required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dualswap_sdk::{DualswapClient, SimulateParams, SwapParams};
//! use solana_sdk::{pubkey::Pubkey, signature::Keypair};
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DualswapClient::devnet();
//!     let keypair = Keypair::new(); // use your funded keypair
//!
//!     let sol  = Pubkey::from_str("So11111111111111111111111111111111111111112")?;
//!     let usdc = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")?;
//!
//!     // 1. Simulate first to check the trade
//!     let sim = client.simulate(SimulateParams {
//!         mint_in: sol, mint_out: usdc, amount_in: 1_000_000_000,
//!     }).await?;
//!     println!("Estimated out: {}  price_impact: {:.2}%", sim.estimated_out, sim.price_impact_pct);
//!
//!     // 2. Execute with 0.5% max slippage
//!     let result = client.convert(&keypair, SwapParams {
//!         mint_in:          sol,
//!         mint_out:         usdc,
//!         amount_in:        1_000_000_000,
//!         max_slippage_bps: 50,
//!     }).await?;
//!     println!("Swapped! tx: {}", result.signature);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`DualswapClient::create_pair`] | Register a pool for a mint pair |
//! | [`DualswapClient::deposit`] | Add principal, possibly one-sided |
//! | [`DualswapClient::convert`] | Atomic token swap (either curve) |
//! | [`DualswapClient::simulate`] | Off-chain fee + slippage breakdown |
//! | [`DualswapClient::withdraw`] | Pull the full proportional share |
//! | [`DualswapClient::claim_fees`] | Claim accrued trading fees |
//! | [`DualswapClient::pool_info`] | Pool reserves, price, fee rate |
//! | [`DualswapClient::my_positions`] | All positions for an owner |
//! | [`DualswapClient::my_fees`] | Aggregated claimable fees |

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;
pub mod types;

pub use client::DualswapClient;
pub use error::{Error, Result};
pub use types::*;
