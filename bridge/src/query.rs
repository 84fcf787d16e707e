//! Query handlers for the token bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::Bound;

use crate::auth::{has_role, role_members, Role};
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_claim_digest, compute_request_id, parse_request_id};
use crate::msg::{
    ChainNonceResponse, ChainsResponse, ClaimDigestResponse, ConfigResponse, DepositResponse,
    HasRoleResponse, IsProcessedResponse, PendingAdminResponse, RateLimitResponse,
    RequestIdResponse, ResolveTokenResponse, RoleMembersResponse, StatsResponse,
    TokenMappingsResponse, TokenResponse, TokenTotalsResponse, WithdrawalResponse,
};
use crate::rate_limit::{current_window, remaining_allowance};
use crate::state::{
    DepositRecord, TokenMapping, CHAIN_NONCES, CONFIG, DEPOSITS, DEPOSIT_BY_NONCE, PENDING_ADMIN,
    PROCESSED_REQUESTS, RATE_LIMIT_PERIOD, STATS, SUPPORTED_CHAINS, TOKENS, TOKEN_LIMITS,
    TOKEN_MAPPINGS, TOKEN_TOTALS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        chain_id: config.chain_id,
        paused: config.paused,
        fee_denom: config.fee_denom,
        bridge_fee: config.bridge_fee,
        fee_collector: config.fee_collector,
        withdrawal_timeout: config.withdrawal_timeout,
        authorization: config.authorization,
    })
}

/// Aggregate counters together with the live fee, timeout and pause state.
pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let config = CONFIG.load(deps.storage)?;
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        total_deposits: stats.total_deposits,
        total_withdrawals: stats.total_withdrawals,
        total_emergency_withdrawals: stats.total_emergency_withdrawals,
        total_fees_collected: stats.total_fees_collected,
        bridge_fee: config.bridge_fee,
        fee_denom: config.fee_denom,
        withdrawal_timeout: config.withdrawal_timeout,
        paused: config.paused,
    })
}

pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    Ok(PENDING_ADMIN
        .may_load(deps.storage)?
        .map(|pending| PendingAdminResponse {
            new_address: pending.new_address,
            proposed_at: pending.proposed_at,
        }))
}

// ============================================================================
// Registry Queries
// ============================================================================

/// Active mapping for (symbol, chain_id).
pub fn resolve_token(
    storage: &dyn Storage,
    symbol: &str,
    chain_id: u64,
) -> Result<TokenMapping, ContractError> {
    match TOKEN_MAPPINGS.may_load(storage, (symbol, chain_id))? {
        Some(mapping) if mapping.active => Ok(mapping),
        _ => Err(ContractError::NotMapped {
            symbol: symbol.to_string(),
            chain_id,
        }),
    }
}

pub fn query_resolve_token(
    deps: Deps,
    symbol: String,
    chain_id: u64,
) -> StdResult<ResolveTokenResponse> {
    let mapping = resolve_token(deps.storage, &symbol, chain_id)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    Ok(ResolveTokenResponse {
        symbol: mapping.symbol,
        chain_id: mapping.chain_id,
        address: mapping.address,
        decimals: mapping.decimals,
    })
}

/// All mappings (active and inactive), ordered by (symbol, chain_id).
pub fn query_token_mappings(
    deps: Deps,
    start_after: Option<(String, u64)>,
    limit: Option<u32>,
) -> StdResult<TokenMappingsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .as_ref()
        .map(|(symbol, chain_id)| Bound::exclusive((symbol.as_str(), *chain_id)));

    let mappings = TOKEN_MAPPINGS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, mapping)| mapping))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokenMappingsResponse { mappings })
}

pub fn query_token(deps: Deps, token: String) -> StdResult<Option<TokenResponse>> {
    Ok(TOKENS
        .may_load(deps.storage, &token)?
        .map(|info| TokenResponse {
            token,
            asset: info.asset,
            symbol: info.symbol,
            decimals: info.decimals,
            supported: info.supported,
        }))
}

/// Limits plus the window as it would look to a deposit made right now.
pub fn query_rate_limit(deps: Deps, env: Env, token: String) -> StdResult<RateLimitResponse> {
    let limits = TOKEN_LIMITS.may_load(deps.storage, &token)?;
    let window = current_window(deps.storage, env.block.time, &token)
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    let remaining = limits
        .as_ref()
        .map(|l| remaining_allowance(l, &window))
        .unwrap_or_else(Uint128::zero);

    Ok(RateLimitResponse {
        token,
        limits,
        daily_used: window.daily_used,
        window_start: window.window_start,
        window_ends_at: window.window_start.plus_seconds(RATE_LIMIT_PERIOD),
        remaining,
    })
}

pub fn query_chains(deps: Deps) -> StdResult<ChainsResponse> {
    let chains = SUPPORTED_CHAINS
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((chain_id, true)) => Some(Ok(chain_id)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(ChainsResponse { chains })
}

// ============================================================================
// Ledger Queries
// ============================================================================

pub fn query_is_processed(deps: Deps, request_id: Binary) -> StdResult<IsProcessedResponse> {
    let id = to_request_id(&request_id)?;
    Ok(IsProcessedResponse {
        request_id,
        processed: PROCESSED_REQUESTS.has(deps.storage, &id),
    })
}

pub fn query_withdrawal(deps: Deps, request_id: Binary) -> StdResult<Option<WithdrawalResponse>> {
    let id = to_request_id(&request_id)?;
    Ok(PROCESSED_REQUESTS
        .may_load(deps.storage, &id)?
        .map(|record| WithdrawalResponse {
            request_id,
            recipient: record.recipient,
            token: record.token,
            amount: record.amount,
            relayer: record.relayer,
            processed_at: record.processed_at,
        }))
}

pub fn query_deposit(deps: Deps, request_id: Binary) -> StdResult<Option<DepositResponse>> {
    let id = to_request_id(&request_id)?;
    Ok(DEPOSITS.may_load(deps.storage, &id)?.map(deposit_response))
}

pub fn query_deposit_by_nonce(
    deps: Deps,
    dest_chain_id: u64,
    nonce: u64,
) -> StdResult<Option<DepositResponse>> {
    let Some(id) = DEPOSIT_BY_NONCE.may_load(deps.storage, (dest_chain_id, nonce))? else {
        return Ok(None);
    };
    Ok(DEPOSITS.may_load(deps.storage, &id)?.map(deposit_response))
}

pub fn query_chain_nonce(deps: Deps, chain_id: u64) -> StdResult<ChainNonceResponse> {
    Ok(ChainNonceResponse {
        chain_id,
        nonce: CHAIN_NONCES.may_load(deps.storage, chain_id)?.unwrap_or(0),
    })
}

pub fn query_token_totals(deps: Deps, token: String) -> StdResult<TokenTotalsResponse> {
    let totals = TOKEN_TOTALS
        .may_load(deps.storage, &token)?
        .unwrap_or_default();
    Ok(TokenTotalsResponse {
        token,
        deposited: totals.deposited,
        withdrawn: totals.withdrawn,
        emergency_withdrawn: totals.emergency_withdrawn,
    })
}

fn deposit_response(record: DepositRecord) -> DepositResponse {
    DepositResponse {
        request_id: Binary::from(record.request_id.to_vec()),
        sender: record.sender,
        recipient: record.recipient,
        token: record.token,
        amount: record.amount,
        dest_chain_id: record.dest_chain_id,
        nonce: record.nonce,
        source_chain_id: record.source_chain_id,
        timestamp: record.timestamp,
        processed: record.processed,
    }
}

fn to_request_id(request_id: &Binary) -> StdResult<[u8; 32]> {
    parse_request_id(request_id).map_err(|e| StdError::generic_err(e.to_string()))
}

// ============================================================================
// Role Queries
// ============================================================================

pub fn query_has_role(deps: Deps, role: Role, address: String) -> StdResult<HasRoleResponse> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(HasRoleResponse {
        has_role: has_role(deps.storage, role, &addr)?,
    })
}

pub fn query_role_members(deps: Deps, role: Role) -> StdResult<RoleMembersResponse> {
    Ok(RoleMembersResponse {
        role,
        members: role_members(deps.storage, role)?,
    })
}

// ============================================================================
// Hash Helpers
// ============================================================================

pub fn query_compute_request_id(
    sender: String,
    recipient: String,
    amount: Uint128,
    dest_chain_id: u64,
    nonce: u64,
    source_chain_id: u64,
) -> StdResult<RequestIdResponse> {
    let id = compute_request_id(
        &sender,
        &recipient,
        amount.u128(),
        dest_chain_id,
        nonce,
        source_chain_id,
    );
    Ok(RequestIdResponse {
        request_id: Binary::from(id.to_vec()),
        hex: bytes32_to_hex(&id),
    })
}

pub fn query_claim_digest(
    recipient: String,
    token: String,
    amount: Uint128,
    request_id: Binary,
) -> StdResult<ClaimDigestResponse> {
    let id = to_request_id(&request_id)?;
    let digest = compute_claim_digest(&recipient, &token, amount.u128(), &id);
    Ok(ClaimDigestResponse {
        digest: Binary::from(digest.to_vec()),
    })
}
