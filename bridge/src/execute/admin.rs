//! Admin operations handlers.
//!
//! This module handles:
//! - Role grants and revocations
//! - Admin handover (propose/accept/cancel)
//! - Pause/unpause
//! - Fee, withdrawal timeout and authorization scheme updates
//! - Emergency withdrawal of custody funds

use bridge_common::AssetInfo;
use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};

use crate::auth::{ensure_admin, grant_role, revoke_role, AuthorizationScheme, Role};
use crate::error::ContractError;
use crate::state::{
    PendingAdmin, CONFIG, MAX_WITHDRAWAL_TIMEOUT, PENDING_ADMIN, STATS, TOKEN_TOTALS,
};

// ============================================================================
// Roles
// ============================================================================

pub fn execute_grant_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let addr = deps.api.addr_validate(&address)?;
    grant_role(deps.storage, role, &addr)?;

    Ok(Response::new()
        .add_attribute("action", "grant_role")
        .add_attribute("role", role.as_str())
        .add_attribute("address", addr))
}

pub fn execute_revoke_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let addr = deps.api.addr_validate(&address)?;
    revoke_role(deps.storage, role, &addr);

    Ok(Response::new()
        .add_attribute("action", "revoke_role")
        .add_attribute("role", role.as_str())
        .add_attribute("address", addr))
}

// ============================================================================
// Admin Handover
// ============================================================================

/// Propose a new admin. The current admin keeps full control until the
/// proposal is accepted.
pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let new_admin_addr = deps.api.addr_validate(&new_admin)?;
    PENDING_ADMIN.save(
        deps.storage,
        &PendingAdmin {
            new_address: new_admin_addr.clone(),
            proposed_at: env.block.time,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "propose_admin")
        .add_attribute("new_admin", new_admin_addr))
}

pub fn execute_accept_admin(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    let mut config = CONFIG.load(deps.storage)?;
    let previous = std::mem::replace(&mut config.admin, pending.new_address.clone());
    CONFIG.save(deps.storage, &config)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "accept_admin")
        .add_attribute("previous_admin", previous)
        .add_attribute("new_admin", pending.new_address))
}

pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if PENDING_ADMIN.may_load(deps.storage)?.is_none() {
        return Err(ContractError::NoPendingAdmin);
    }
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("action", "cancel_admin_proposal"))
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the bridge (rejects deposits and withdrawals).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, true)
}

/// Unpause the bridge.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, false)
}

fn set_paused(deps: DepsMut, info: MessageInfo, paused: bool) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", if paused { "pause" } else { "unpause" }))
}

// ============================================================================
// Bridge Parameters
// ============================================================================

pub fn execute_set_bridge_fee(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
    denom: Option<String>,
    collector: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if let Some(denom) = denom {
        if denom.trim().is_empty() {
            return Err(ContractError::InvalidAddress {
                reason: "fee denom must not be empty".to_string(),
            });
        }
        config.fee_denom = denom;
    }
    if let Some(collector) = collector {
        config.fee_collector = deps.api.addr_validate(&collector)?;
    }
    config.bridge_fee = amount;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_bridge_fee")
        .add_attribute("amount", amount.to_string())
        .add_attribute("denom", config.fee_denom)
        .add_attribute("collector", config.fee_collector))
}

pub fn execute_set_withdrawal_timeout(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if seconds > MAX_WITHDRAWAL_TIMEOUT {
        return Err(ContractError::InvalidWithdrawalTimeout {
            max: MAX_WITHDRAWAL_TIMEOUT,
        });
    }
    config.withdrawal_timeout = seconds;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_withdrawal_timeout")
        .add_attribute("seconds", seconds.to_string()))
}

pub fn execute_set_authorization_scheme(
    deps: DepsMut,
    info: MessageInfo,
    scheme: AuthorizationScheme,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    scheme.validate()?;
    let name = scheme.name();
    config.authorization = scheme;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_authorization_scheme")
        .add_attribute("scheme", name))
}

// ============================================================================
// Emergency Withdrawal
// ============================================================================

/// Move custody funds directly to `to`.
///
/// Allowed whether or not the bridge is paused. The deposit ledger, nonces
/// and processed set are left as they are; the movement is tracked in its own
/// counters so it never reads as a normal withdrawal.
pub fn execute_emergency_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    asset: AssetInfo,
    to: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    let to_addr = deps.api.addr_validate(&to)?;

    let available = asset.query_balance(&deps.querier, &env.contract.address)?;
    if available < amount {
        return Err(ContractError::InsufficientLiquidity {
            available,
            requested: amount,
        });
    }

    let token = asset.identifier();
    let mut totals = TOKEN_TOTALS
        .may_load(deps.storage, &token)?
        .unwrap_or_default();
    totals.emergency_withdrawn += amount;
    TOKEN_TOTALS.save(deps.storage, &token, &totals)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_emergency_withdrawals += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_message(asset.transfer_msg(&to_addr, amount)?)
        .add_attribute("action", "emergency_withdraw")
        .add_attribute("asset", asset.to_string())
        .add_attribute("to", to_addr)
        .add_attribute("amount", amount.to_string())
        .add_attribute("paused", config.paused.to_string()))
}
