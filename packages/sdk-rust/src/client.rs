//! [`DualswapClient`] — the main entry point for off-chain integrations.

use std::collections::HashMap;
use std::str::FromStr;

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::{
    error::{Error, Result},
    instructions::{
        create_pair_ix, deposit_ix, derive_amm, derive_ata, derive_pool, derive_pool_authority,
        derive_position, initialize_ix, swap_ix, withdraw_fees_ix, withdraw_ix,
    },
    math::{pending_fees_for_position, simulate_detailed, slippage_floor, withdraw_payout},
    state::{parse_amm, parse_pool, parse_position, AmmState, PoolState, PositionState},
    types::{
        ClaimFeesResult, CreatePairParams, CreatePairResult, DepositParams, DepositResult,
        FeeSummary, PoolInfo, PositionInfo, SimulateParams, SimulateResult, SwapParams,
        SwapResult, WithdrawResult,
    },
};

// ─── Constants ────────────────────────────────────────────────────────────────

const DEFAULT_PROGRAM_ID: &str = "DQePbc5QQWg5AQKTSKSgvcUwoF5APynv75jdGhAh394G";
const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async Dualswap client for Solana.
///
/// ```rust,no_run
/// # use dualswap_sdk::{DualswapClient, SimulateParams};
/// # use solana_sdk::pubkey::Pubkey;
/// # use std::str::FromStr;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DualswapClient::devnet();
/// let sol  = Pubkey::from_str("So11111111111111111111111111111111111111112")?;
/// let usdc = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")?;
/// let sim  = client.simulate(SimulateParams {
///     mint_in: sol, mint_out: usdc, amount_in: 1_000_000_000,
/// }).await?;
/// println!("Estimated out: {}", sim.estimated_out);
/// # Ok(())
/// # }
/// ```
pub struct DualswapClient {
    rpc_url:    String,
    program_id: Pubkey,
}

impl DualswapClient {
    /// Create a client pointing at any RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url:    rpc_url.into(),
            program_id: Pubkey::from_str(DEFAULT_PROGRAM_ID).unwrap(),
        }
    }

    /// Pre-configured client for Solana devnet.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    /// Pre-configured client for Solana mainnet-beta.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (useful for locally deployed programs in tests).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Create the global registry account. One-time setup; the payer becomes
    /// admin and initial fee distributor.
    pub async fn initialize(&self, payer: &Keypair) -> Result<Signature> {
        let rpc = self.rpc();
        let ix = initialize_ix(&self.program_id, &payer.pubkey());
        self.sign_and_send(&rpc, &[ix], payer, &[]).await
    }

    /// Register a new pool for a mint pair.
    ///
    /// Fresh keypairs for `vault_a` and `vault_b` are generated internally and
    /// returned in the result — no need to provide them.
    pub async fn create_pair(
        &self,
        payer:  &Keypair,
        params: CreatePairParams,
    ) -> Result<CreatePairResult> {
        let rpc = self.rpc();

        let vault_a = Keypair::new();
        let vault_b = Keypair::new();
        let (pool, _)           = derive_pool(&params.mint_a, &params.mint_b, &self.program_id);
        let (pool_authority, _) = derive_pool_authority(&pool, &self.program_id);

        let ix = create_pair_ix(
            &self.program_id,
            &payer.pubkey(),
            &params.mint_a,
            &params.mint_b,
            &vault_a.pubkey(),
            &vault_b.pubkey(),
            params.fee_rate,
            params.stable,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[&vault_a, &vault_b]).await?;

        Ok(CreatePairResult {
            signature:      sig.to_string(),
            pool,
            pool_authority,
            vault_a:        vault_a.pubkey(),
            vault_b:        vault_b.pubkey(),
            mint_a:         params.mint_a,
            mint_b:         params.mint_b,
            fee_rate:       params.fee_rate,
            stable:         params.stable,
        })
    }

    /// Deposit principal into a pool. Asymmetric deposits are allowed — one
    /// of the two amounts may be zero.
    pub async fn deposit(&self, payer: &Keypair, params: DepositParams) -> Result<DepositResult> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) =
            self.find_pool_inner(&rpc, &params.mint_a, &params.mint_b).await?;
        let (position, _) = derive_position(&pool_addr, &payer.pubkey(), &self.program_id);

        // Map user mint ordering → pool ordering.
        let (amount_a, amount_b) = if params.mint_a == pool_state.token_a_mint {
            (params.amount_a, params.amount_b)
        } else {
            (params.amount_b, params.amount_a)
        };

        let ix = deposit_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool_addr,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &derive_ata(&payer.pubkey(), &pool_state.token_a_mint),
            &derive_ata(&payer.pubkey(), &pool_state.token_b_mint),
            amount_a,
            amount_b,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(DepositResult {
            signature: sig.to_string(),
            pool:      pool_addr,
            position,
            amount_a,
            amount_b,
        })
    }

    /// Swap one token for another.
    ///
    /// The swap is simulated first; if the simulated output falls more than
    /// `max_slippage_bps` below the spot projection the transaction is never
    /// submitted. Pass `max_slippage_bps = 0` to disable the guard.
    pub async fn convert(&self, payer: &Keypair, params: SwapParams) -> Result<SwapResult> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) =
            self.find_pool_inner(&rpc, &params.mint_in, &params.mint_out).await?;
        let amm = self.fetch_amm(&rpc).await?;

        let a_to_b = params.mint_in == pool_state.token_a_mint;
        let (reserve_in, reserve_out) = if a_to_b {
            (pool_state.reserve_a, pool_state.reserve_b)
        } else {
            (pool_state.reserve_b, pool_state.reserve_a)
        };

        let sim = simulate_detailed(
            pool_addr, &pool_state, amm.amplification,
            reserve_in, reserve_out, params.amount_in, a_to_b,
        )?;

        if params.max_slippage_bps > 0 {
            // Spot projection of the full input, shrunk by the tolerance.
            let spot_out = (reserve_out as u128)
                .saturating_mul(params.amount_in as u128)
                / (reserve_in as u128).max(1);
            let min = slippage_floor(spot_out, params.max_slippage_bps);
            if sim.estimated_out < min {
                return Err(Error::SlippageExceeded {
                    estimated: sim.estimated_out,
                    min,
                });
            }
        }

        let ix = swap_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool_addr,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &derive_ata(&payer.pubkey(), &params.mint_in),
            &derive_ata(&payer.pubkey(), &params.mint_out),
            &params.mint_in,
            params.amount_in,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(SwapResult {
            signature:     sig.to_string(),
            pool:          pool_addr,
            amount_in:     params.amount_in,
            estimated_out: sim.estimated_out,
            a_to_b,
        })
    }

    /// Withdraw the caller's full share of both reserves. Reported amounts
    /// are previews computed from the pre-transaction state.
    pub async fn withdraw(
        &self,
        payer:  &Keypair,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
    ) -> Result<WithdrawResult> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) = self.find_pool_inner(&rpc, mint_a, mint_b).await?;
        let amm = self.fetch_amm(&rpc).await?;
        let (position_addr, _) = derive_position(&pool_addr, &payer.pubkey(), &self.program_id);
        let position = parse_position(&rpc.get_account_data(&position_addr).await?)?;

        let (pending_a, pending_b) = pending_fees_for_position(&position, &pool_state);
        let amount_a = withdraw_payout(
            pool_state.reserve_a,
            pool_state.total_weight_a,
            position.weight_a,
            position.fees_owed_a.saturating_add(pending_a),
            amm.protocol_fee_rate,
        );
        let amount_b = withdraw_payout(
            pool_state.reserve_b,
            pool_state.total_weight_b,
            position.weight_b,
            position.fees_owed_b.saturating_add(pending_b),
            amm.protocol_fee_rate,
        );

        let ix = withdraw_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool_addr,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &derive_ata(&payer.pubkey(), &pool_state.token_a_mint),
            &derive_ata(&payer.pubkey(), &pool_state.token_b_mint),
            &derive_ata(&amm.fee_distributor, &pool_state.token_a_mint),
            &derive_ata(&amm.fee_distributor, &pool_state.token_b_mint),
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(WithdrawResult {
            signature: sig.to_string(),
            pool:      pool_addr,
            amount_a,
            amount_b,
        })
    }

    /// Claim all accrued trading fees for the caller's position.
    pub async fn claim_fees(
        &self,
        payer:  &Keypair,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
    ) -> Result<ClaimFeesResult> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) = self.find_pool_inner(&rpc, mint_a, mint_b).await?;
        let (position_addr, _) = derive_position(&pool_addr, &payer.pubkey(), &self.program_id);
        let position = parse_position(&rpc.get_account_data(&position_addr).await?)?;
        let (pending_a, pending_b) = pending_fees_for_position(&position, &pool_state);

        let ix = withdraw_fees_ix(
            &self.program_id,
            &payer.pubkey(),
            &pool_addr,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &derive_ata(&payer.pubkey(), &pool_state.token_a_mint),
            &derive_ata(&payer.pubkey(), &pool_state.token_b_mint),
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(ClaimFeesResult {
            signature: sig.to_string(),
            pool:      pool_addr,
            fees_a:    position.fees_owed_a.saturating_add(pending_a),
            fees_b:    position.fees_owed_b.saturating_add(pending_b),
        })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Simulate a swap without submitting a transaction.
    ///
    /// Returns a full fee and slippage breakdown including `pair_fee`,
    /// `estimated_out` and `price_impact_pct`.
    pub async fn simulate(&self, params: SimulateParams) -> Result<SimulateResult> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) =
            self.find_pool_inner(&rpc, &params.mint_in, &params.mint_out).await?;
        let amm = self.fetch_amm(&rpc).await?;

        let a_to_b = params.mint_in == pool_state.token_a_mint;
        let (reserve_in, reserve_out) = if a_to_b {
            (pool_state.reserve_a, pool_state.reserve_b)
        } else {
            (pool_state.reserve_b, pool_state.reserve_a)
        };

        simulate_detailed(
            pool_addr, &pool_state, amm.amplification,
            reserve_in, reserve_out, params.amount_in, a_to_b,
        )
    }

    /// Fetch pool state plus spot price.
    pub async fn pool_info(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Result<PoolInfo> {
        let rpc = self.rpc();

        let (pool_addr, pool_state) = self.find_pool_inner(&rpc, mint_a, mint_b).await?;

        let spot_price = if pool_state.reserve_a == 0 {
            0.0
        } else {
            pool_state.reserve_b as f64 / pool_state.reserve_a as f64
        };

        Ok(PoolInfo {
            pool:           pool_addr,
            pool_id:        pool_state.pool_id,
            mint_a:         pool_state.token_a_mint,
            mint_b:         pool_state.token_b_mint,
            vault_a:        pool_state.token_a_vault,
            vault_b:        pool_state.token_b_vault,
            reserve_a:      pool_state.reserve_a,
            reserve_b:      pool_state.reserve_b,
            total_weight_a: pool_state.total_weight_a,
            total_weight_b: pool_state.total_weight_b,
            fee_rate:       pool_state.fee_rate,
            stable:         pool_state.stable,
            spot_price,
        })
    }

    /// Fetch the global registry state.
    pub async fn amm_info(&self) -> Result<AmmState> {
        let rpc = self.rpc();
        self.fetch_amm(&rpc).await
    }

    /// Fetch all positions owned by `owner` with pending fee calculations.
    pub async fn my_positions(&self, owner: &Pubkey) -> Result<Vec<PositionInfo>> {
        let rpc = self.rpc();
        let positions = self.fetch_positions(&rpc, owner).await?;

        // Batch-fetch unique pool accounts in one RPC call.
        let pool_keys: Vec<Pubkey> = {
            let mut v: Vec<Pubkey> = positions.iter().map(|(_, p)| p.pool).collect();
            v.sort();
            v.dedup();
            v
        };
        let pool_accounts = rpc.get_multiple_accounts(&pool_keys).await?;
        let pools: HashMap<Pubkey, PoolState> = pool_keys
            .iter()
            .zip(pool_accounts.iter())
            .filter_map(|(k, maybe)| {
                let acc = maybe.as_ref()?;
                parse_pool(&acc.data).ok().map(|p| (*k, p))
            })
            .collect();

        Ok(positions
            .into_iter()
            .map(|(addr, pos)| {
                let (pending_a, pending_b) = pools
                    .get(&pos.pool)
                    .map(|pool| pending_fees_for_position(&pos, pool))
                    .unwrap_or((0, 0));
                PositionInfo {
                    address:        addr,
                    pool:           pos.pool,
                    owner:          pos.owner,
                    weight_a:       pos.weight_a,
                    weight_b:       pos.weight_b,
                    fees_owed_a:    pos.fees_owed_a,
                    fees_owed_b:    pos.fees_owed_b,
                    pending_fees_a: pending_a,
                    pending_fees_b: pending_b,
                    total_fees_a:   pos.fees_owed_a.saturating_add(pending_a),
                    total_fees_b:   pos.fees_owed_b.saturating_add(pending_b),
                }
            })
            .collect())
    }

    /// Aggregate fee totals across all positions owned by `owner`.
    pub async fn my_fees(&self, owner: &Pubkey) -> Result<FeeSummary> {
        let positions = self.my_positions(owner).await?;
        let total_a = positions.iter().map(|p| p.total_fees_a).sum();
        let total_b = positions.iter().map(|p| p.total_fees_b).sum();
        Ok(FeeSummary { positions, total_fees_a: total_a, total_fees_b: total_b })
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    async fn sign_and_send(
        &self,
        rpc:          &RpcClient,
        instructions: &[Instruction],
        payer:        &Keypair,
        extra:        &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = rpc.get_latest_blockhash().await?;
        let mut signers: Vec<&dyn Signer> = vec![payer];
        signers.extend(extra.iter().map(|k| k as &dyn Signer));
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &signers,
            blockhash,
        );
        Ok(rpc.send_and_confirm_transaction(&tx).await?)
    }

    async fn fetch_amm(&self, rpc: &RpcClient) -> Result<AmmState> {
        let (amm_addr, _) = derive_amm(&self.program_id);
        parse_amm(&rpc.get_account_data(&amm_addr).await?)
    }

    /// Resolve the pool for a mint pair. The pool PDA is seeded by the
    /// canonically ordered pair, so a single derivation covers both orders.
    async fn find_pool_inner(
        &self,
        rpc:    &RpcClient,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
    ) -> Result<(Pubkey, PoolState)> {
        let (pool_addr, _) = derive_pool(mint_a, mint_b, &self.program_id);
        let data = rpc
            .get_account_data(&pool_addr)
            .await
            .map_err(|_| Error::PoolNotFound(*mint_a, *mint_b))?;
        let state = parse_pool(&data).map_err(|_| Error::PoolNotFound(*mint_a, *mint_b))?;
        Ok((pool_addr, state))
    }

    /// Fetch all `Position` accounts owned by `owner` via `getProgramAccounts`.
    async fn fetch_positions(
        &self,
        rpc:   &RpcClient,
        owner: &Pubkey,
    ) -> Result<Vec<(Pubkey, PositionState)>> {
        let disc = account_disc("Position");

        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::DataSize(137),
                RpcFilterType::Memcmp(Memcmp::new(
                    0,
                    MemcmpEncodedBytes::Bytes(disc.to_vec()),
                )),
                RpcFilterType::Memcmp(Memcmp::new(
                    8,
                    MemcmpEncodedBytes::Bytes(owner.to_bytes().to_vec()),
                )),
            ]),
            account_config: RpcAccountInfoConfig { ..Default::default() },
            ..Default::default()
        };

        let raw = rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|(pk, acc)| parse_position(&acc.data).ok().map(|p| (pk, p)))
            .collect())
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

/// Anchor account discriminator: `sha256("account:{TypeName}")[..8]`.
fn account_disc(type_name: &str) -> [u8; 8] {
    let h = hash(format!("account:{type_name}").as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}
