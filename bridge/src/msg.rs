//! Message types for the token bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use bridge_common::AssetInfo;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

use crate::auth::{AuthorizationScheme, Role};
use crate::state::{TokenLimits, TokenMapping};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address (defaults to the instantiating sender)
    pub admin: Option<String>,
    /// Chain id of the chain this instance is deployed on (must be non-zero)
    pub chain_id: u64,
    /// Native denom the flat bridge fee is paid in
    pub fee_denom: String,
    /// Flat fee per deposit (defaults to zero)
    pub bridge_fee: Option<Uint128>,
    /// Fee collector (defaults to admin)
    pub fee_collector: Option<String>,
    /// Minimum seconds between deposit and withdrawal (defaults to zero)
    pub withdrawal_timeout: Option<u64>,
    /// Initial operator addresses
    #[serde(default)]
    pub operators: Vec<String>,
    /// Initial relayer addresses
    #[serde(default)]
    pub relayers: Vec<String>,
    /// Withdrawal authorization scheme (defaults to role-only)
    pub authorization: Option<AuthorizationScheme>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Transfers
    // ========================================================================
    /// Lock tokens in custody for release on `dest_chain_id`.
    ///
    /// Native tokens are attached as funds. CW20 tokens are pulled with
    /// `TransferFrom`, so the caller must have granted an allowance first.
    /// The flat bridge fee is attached in `fee_denom`.
    Deposit {
        token: String,
        amount: Uint128,
        /// Recipient on the destination chain (opaque string)
        recipient: String,
        dest_chain_id: u64,
    },

    /// Deposit CW20 tokens via `Cw20ExecuteMsg::Send`
    Receive(cw20::Cw20ReceiveMsg),

    /// Release tokens for a deposit observed on another chain.
    ///
    /// Authorization: Relayer only, plus whatever the configured
    /// `AuthorizationScheme` requires in `authorization`.
    Withdraw {
        recipient: String,
        token: String,
        amount: Uint128,
        /// 32-byte request id from the source-chain deposit
        request_id: Binary,
        /// Source-chain deposit time; required while a timeout is configured
        deposited_at: Option<Timestamp>,
        authorization: Option<Binary>,
    },

    // ========================================================================
    // Token Registry
    // ========================================================================
    /// Map (symbol, chain_id) to `token` and mark `token` supported locally.
    ///
    /// Authorization: Operator only
    AddToken {
        token: String,
        symbol: String,
        chain_id: u64,
        decimals: u8,
    },

    /// Overwrite an existing mapping.
    ///
    /// Authorization: Operator only
    UpdateToken {
        token: String,
        symbol: String,
        chain_id: u64,
        decimals: u8,
    },

    /// Withdraw global support for a local token and deactivate its mappings.
    ///
    /// Authorization: Operator only
    RemoveToken { token: String },

    /// Deactivate a single mapping.
    ///
    /// Authorization: Operator only
    DeactivateMapping { symbol: String, chain_id: u64 },

    /// Set transfer limits for a local token.
    ///
    /// Authorization: Operator only
    SetTokenLimits {
        token: String,
        min_amount: Uint128,
        max_amount: Uint128,
        daily_limit: Uint128,
    },

    // ========================================================================
    // Chain Registry
    // ========================================================================
    /// Authorization: Admin only
    SetChainSupport { chain_id: u64, supported: bool },

    // ========================================================================
    // Roles
    // ========================================================================
    /// Authorization: Admin only
    GrantRole { role: Role, address: String },

    /// Authorization: Admin only
    RevokeRole { role: Role, address: String },

    /// Start a two-step admin handover
    ///
    /// Authorization: Admin only
    ProposeAdmin { new_admin: String },

    /// Complete the handover
    ///
    /// Authorization: Pending admin only
    AcceptAdmin {},

    /// Authorization: Admin only
    CancelAdminProposal {},

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Reject deposits and withdrawals
    Pause {},

    Unpause {},

    /// Update the flat bridge fee (and optionally its denom and collector)
    SetBridgeFee {
        amount: Uint128,
        denom: Option<String>,
        collector: Option<String>,
    },

    /// Set the minimum delay between deposit and withdrawal (0 disables)
    SetWithdrawalTimeout { seconds: u64 },

    /// Swap the withdrawal authorization scheme
    SetAuthorizationScheme { scheme: AuthorizationScheme },

    /// Move custody funds out directly. Works while paused and never touches
    /// the deposit ledger.
    ///
    /// Authorization: Admin only
    EmergencyWithdraw {
        asset: AssetInfo,
        to: String,
        amount: Uint128,
    },
}

/// CW20 receive hook payload
#[cw_serde]
pub enum ReceiveMsg {
    Deposit {
        recipient: String,
        dest_chain_id: u64,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    #[returns(ConfigResponse)]
    Config {},

    /// Aggregate counters plus current fee, timeout and pause state
    #[returns(StatsResponse)]
    Stats {},

    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    // ========================================================================
    // Registry Queries
    // ========================================================================
    /// Active address for (symbol, chain_id); errors when not mapped
    #[returns(ResolveTokenResponse)]
    ResolveToken { symbol: String, chain_id: u64 },

    #[returns(TokenMappingsResponse)]
    TokenMappings {
        start_after: Option<(String, u64)>,
        limit: Option<u32>,
    },

    #[returns(Option<TokenResponse>)]
    Token { token: String },

    /// Limits, live window and remaining daily allowance
    #[returns(RateLimitResponse)]
    RateLimit { token: String },

    #[returns(ChainsResponse)]
    Chains {},

    // ========================================================================
    // Ledger Queries
    // ========================================================================
    #[returns(IsProcessedResponse)]
    IsProcessed { request_id: Binary },

    #[returns(Option<WithdrawalResponse>)]
    Withdrawal { request_id: Binary },

    #[returns(Option<DepositResponse>)]
    Deposit { request_id: Binary },

    #[returns(Option<DepositResponse>)]
    DepositByNonce { dest_chain_id: u64, nonce: u64 },

    /// Last nonce issued for a destination chain (0 before any deposit)
    #[returns(ChainNonceResponse)]
    ChainNonce { chain_id: u64 },

    #[returns(TokenTotalsResponse)]
    TokenTotals { token: String },

    // ========================================================================
    // Role Queries
    // ========================================================================
    #[returns(HasRoleResponse)]
    HasRole { role: Role, address: String },

    #[returns(RoleMembersResponse)]
    RoleMembers { role: Role },

    // ========================================================================
    // Hash Helpers
    // ========================================================================
    /// Compute a request id without touching state
    #[returns(RequestIdResponse)]
    ComputeRequestId {
        sender: String,
        recipient: String,
        amount: Uint128,
        dest_chain_id: u64,
        nonce: u64,
        source_chain_id: u64,
    },

    /// Digest a relayer signs under `SignatureOverTuple`
    #[returns(ClaimDigestResponse)]
    ClaimDigest {
        recipient: String,
        token: String,
        amount: Uint128,
        request_id: Binary,
    },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub chain_id: u64,
    pub paused: bool,
    pub fee_denom: String,
    pub bridge_fee: Uint128,
    pub fee_collector: Addr,
    pub withdrawal_timeout: u64,
    pub authorization: AuthorizationScheme,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_deposits: u64,
    pub total_withdrawals: u64,
    pub total_emergency_withdrawals: u64,
    pub total_fees_collected: Uint128,
    pub bridge_fee: Uint128,
    pub fee_denom: String,
    pub withdrawal_timeout: u64,
    pub paused: bool,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub proposed_at: Timestamp,
}

#[cw_serde]
pub struct ResolveTokenResponse {
    pub symbol: String,
    pub chain_id: u64,
    pub address: String,
    pub decimals: u8,
}

#[cw_serde]
pub struct TokenMappingsResponse {
    pub mappings: Vec<TokenMapping>,
}

#[cw_serde]
pub struct TokenResponse {
    pub token: String,
    pub asset: AssetInfo,
    pub symbol: String,
    pub decimals: u8,
    pub supported: bool,
}

#[cw_serde]
pub struct RateLimitResponse {
    pub token: String,
    /// None when no limits are configured
    pub limits: Option<TokenLimits>,
    pub daily_used: Uint128,
    pub window_start: Timestamp,
    pub window_ends_at: Timestamp,
    pub remaining: Uint128,
}

#[cw_serde]
pub struct ChainsResponse {
    pub chains: Vec<u64>,
}

#[cw_serde]
pub struct IsProcessedResponse {
    pub request_id: Binary,
    pub processed: bool,
}

#[cw_serde]
pub struct WithdrawalResponse {
    pub request_id: Binary,
    pub recipient: Addr,
    pub token: String,
    pub amount: Uint128,
    pub relayer: Addr,
    pub processed_at: Timestamp,
}

#[cw_serde]
pub struct DepositResponse {
    pub request_id: Binary,
    pub sender: Addr,
    pub recipient: String,
    pub token: String,
    pub amount: Uint128,
    pub dest_chain_id: u64,
    pub nonce: u64,
    pub source_chain_id: u64,
    pub timestamp: Timestamp,
    pub processed: bool,
}

#[cw_serde]
pub struct ChainNonceResponse {
    pub chain_id: u64,
    pub nonce: u64,
}

#[cw_serde]
pub struct TokenTotalsResponse {
    pub token: String,
    pub deposited: Uint128,
    pub withdrawn: Uint128,
    pub emergency_withdrawn: Uint128,
}

#[cw_serde]
pub struct HasRoleResponse {
    pub has_role: bool,
}

#[cw_serde]
pub struct RoleMembersResponse {
    pub role: Role,
    pub members: Vec<Addr>,
}

#[cw_serde]
pub struct RequestIdResponse {
    pub request_id: Binary,
    /// 0x-prefixed hex rendering, as emitted in deposit attributes
    pub hex: String,
}

#[cw_serde]
pub struct ClaimDigestResponse {
    pub digest: Binary,
}
