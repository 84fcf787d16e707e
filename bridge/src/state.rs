//! State definitions for the token bridge contract
//!
//! All per-instance state lives in this contract's storage. Configuration
//! (registry, limits, roles) is long-lived; the deposit ledger and the
//! processed-request set are append-only and keyed by request id.

use bridge_common::AssetInfo;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use crate::auth::AuthorizationScheme;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address (singleton role)
    pub admin: Addr,
    /// Chain id of the chain this instance is deployed on
    pub chain_id: u64,
    /// Whether deposits and withdrawals are currently rejected
    pub paused: bool,
    /// Native denom the flat bridge fee is paid in
    pub fee_denom: String,
    /// Flat fee charged per deposit (zero disables the fee)
    pub bridge_fee: Uint128,
    /// Receiver of collected fees
    pub fee_collector: Addr,
    /// Minimum seconds between a deposit and its withdrawal (zero disables)
    pub withdrawal_timeout: u64,
    /// How withdrawal claims are authorized beyond the relayer role
    pub authorization: AuthorizationScheme,
}

/// Pending admin handover
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time of the proposal
    pub proposed_at: Timestamp,
}

/// Aggregate bridge counters
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    /// Accepted deposits
    pub total_deposits: u64,
    /// Processed withdrawals
    pub total_withdrawals: u64,
    /// Admin emergency withdrawals (tracked apart from normal withdrawals)
    pub total_emergency_withdrawals: u64,
    /// Total fees forwarded to the collector (in `fee_denom`)
    pub total_fees_collected: Uint128,
}

// ============================================================================
// Token Registry
// ============================================================================

/// Symbol + chain → token address mapping
#[cw_serde]
pub struct TokenMapping {
    pub symbol: String,
    pub chain_id: u64,
    /// Token address on `chain_id` (denom, contract address or foreign address)
    pub address: String,
    pub decimals: u8,
    pub active: bool,
}

/// A token this instance can hold in custody
#[cw_serde]
pub struct TokenInfo {
    pub asset: AssetInfo,
    pub symbol: String,
    pub decimals: u8,
    /// Globally supported for deposits and withdrawals on this instance
    pub supported: bool,
}

// ============================================================================
// Rate Limiting
// ============================================================================

/// Per-token transfer limits (smallest unit)
#[cw_serde]
pub struct TokenLimits {
    pub min_amount: Uint128,
    pub max_amount: Uint128,
    pub daily_limit: Uint128,
}

/// Live counters for the current 24h window
#[cw_serde]
pub struct RateWindow {
    pub daily_used: Uint128,
    pub window_start: Timestamp,
}

// ============================================================================
// Ledger
// ============================================================================

/// Deposit accepted by this instance
#[cw_serde]
pub struct DepositRecord {
    pub request_id: [u8; 32],
    pub sender: Addr,
    /// Recipient on the destination chain (opaque to this instance)
    pub recipient: String,
    pub token: String,
    pub amount: Uint128,
    pub dest_chain_id: u64,
    pub nonce: u64,
    pub source_chain_id: u64,
    pub timestamp: Timestamp,
    pub processed: bool,
}

/// Withdrawal released by this instance
#[cw_serde]
pub struct WithdrawalRecord {
    pub request_id: [u8; 32],
    pub recipient: Addr,
    pub token: String,
    pub amount: Uint128,
    pub relayer: Addr,
    pub processed_at: Timestamp,
}

/// Per-token custody flows
#[cw_serde]
#[derive(Default)]
pub struct TokenTotals {
    pub deposited: Uint128,
    pub withdrawn: Uint128,
    pub emergency_withdrawn: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:token-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "1.0.0";

/// Rate limit window in seconds (24 hours)
pub const RATE_LIMIT_PERIOD: u64 = 86_400;

/// Upper bound for the withdrawal timeout (7 days)
pub const MAX_WITHDRAWAL_TIMEOUT: u64 = 604_800;

// ============================================================================
// Core State Storage
// ============================================================================

pub const CONFIG: Item<Config> = Item::new("config");

pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

pub const STATS: Item<Stats> = Item::new("stats");

/// Chains this instance routes to/from
/// Key: chain id, Value: supported
pub const SUPPORTED_CHAINS: Map<u64, bool> = Map::new("supported_chains");

// ============================================================================
// Registry Storage
// ============================================================================

/// Key: local token identifier (denom or CW20 address)
pub const TOKENS: Map<&str, TokenInfo> = Map::new("tokens");

/// Key: (symbol, chain id)
pub const TOKEN_MAPPINGS: Map<(&str, u64), TokenMapping> = Map::new("token_mappings");

/// Key: local token identifier
pub const TOKEN_LIMITS: Map<&str, TokenLimits> = Map::new("token_limits");

/// Key: local token identifier
pub const RATE_WINDOWS: Map<&str, RateWindow> = Map::new("rate_windows");

// ============================================================================
// Ledger Storage
// ============================================================================

/// Last nonce issued per destination chain
/// Key: destination chain id, Value: nonce (starts at 1)
pub const CHAIN_NONCES: Map<u64, u64> = Map::new("chain_nonces");

/// Key: 32-byte request id
pub const DEPOSITS: Map<&[u8], DepositRecord> = Map::new("deposits");

/// Key: (destination chain id, nonce), Value: request id
pub const DEPOSIT_BY_NONCE: Map<(u64, u64), [u8; 32]> = Map::new("deposit_by_nonce");

/// Request ids withdrawn on this instance
/// Key: 32-byte request id
pub const PROCESSED_REQUESTS: Map<&[u8], WithdrawalRecord> = Map::new("processed_requests");

/// Key: local token identifier
pub const TOKEN_TOTALS: Map<&str, TokenTotals> = Map::new("token_totals");

// ============================================================================
// Roles
// ============================================================================

/// Key: operator address, Value: whether active
pub const OPERATORS: Map<&Addr, bool> = Map::new("operators");

/// Key: relayer address, Value: whether active
pub const RELAYERS: Map<&Addr, bool> = Map::new("relayers");
