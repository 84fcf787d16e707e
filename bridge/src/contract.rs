//! Token Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw2::set_contract_version;

use crate::auth::{grant_role, AuthorizationScheme, Role};
use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_add_token, execute_cancel_admin_proposal,
    execute_deactivate_mapping, execute_deposit, execute_emergency_withdraw, execute_grant_role,
    execute_pause, execute_propose_admin, execute_receive, execute_remove_token,
    execute_revoke_role, execute_set_authorization_scheme, execute_set_bridge_fee,
    execute_set_chain_support, execute_set_token_limits, execute_set_withdrawal_timeout,
    execute_unpause, execute_update_token, execute_withdraw,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_chain_nonce, query_chains, query_claim_digest, query_compute_request_id, query_config,
    query_deposit, query_deposit_by_nonce, query_has_role, query_is_processed,
    query_pending_admin, query_rate_limit, query_resolve_token, query_role_members, query_stats,
    query_token, query_token_mappings, query_token_totals, query_withdrawal,
};
use crate::state::{
    Config, Stats, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MAX_WITHDRAWAL_TIMEOUT, STATS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.chain_id == 0 {
        return Err(ContractError::InvalidChainId {
            chain_id: msg.chain_id,
        });
    }
    if msg.fee_denom.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "fee denom must not be empty".to_string(),
        });
    }

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender,
    };
    let fee_collector = match msg.fee_collector {
        Some(collector) => deps.api.addr_validate(&collector)?,
        None => admin.clone(),
    };

    let withdrawal_timeout = msg.withdrawal_timeout.unwrap_or(0);
    if withdrawal_timeout > MAX_WITHDRAWAL_TIMEOUT {
        return Err(ContractError::InvalidWithdrawalTimeout {
            max: MAX_WITHDRAWAL_TIMEOUT,
        });
    }

    let authorization = msg.authorization.unwrap_or(AuthorizationScheme::RoleOnly);
    authorization.validate()?;

    let config = Config {
        admin,
        chain_id: msg.chain_id,
        paused: false,
        fee_denom: msg.fee_denom,
        bridge_fee: msg.bridge_fee.unwrap_or_else(Uint128::zero),
        fee_collector,
        withdrawal_timeout,
        authorization,
    };
    CONFIG.save(deps.storage, &config)?;

    for operator in &msg.operators {
        let addr = deps.api.addr_validate(operator)?;
        grant_role(deps.storage, Role::Operator, &addr)?;
    }
    for relayer in &msg.relayers {
        let addr = deps.api.addr_validate(relayer)?;
        grant_role(deps.storage, Role::Relayer, &addr)?;
    }

    STATS.save(deps.storage, &Stats::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("operator_count", msg.operators.len().to_string())
        .add_attribute("relayer_count", msg.relayers.len().to_string())
        .add_attribute("authorization", config.authorization.name()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Transfers
        ExecuteMsg::Deposit {
            token,
            amount,
            recipient,
            dest_chain_id,
        } => execute_deposit(deps, env, info, token, amount, recipient, dest_chain_id),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),
        ExecuteMsg::Withdraw {
            recipient,
            token,
            amount,
            request_id,
            deposited_at,
            authorization,
        } => execute_withdraw(
            deps,
            env,
            info,
            recipient,
            token,
            amount,
            request_id,
            deposited_at,
            authorization,
        ),

        // Token registry
        ExecuteMsg::AddToken {
            token,
            symbol,
            chain_id,
            decimals,
        } => execute_add_token(deps, info, token, symbol, chain_id, decimals),
        ExecuteMsg::UpdateToken {
            token,
            symbol,
            chain_id,
            decimals,
        } => execute_update_token(deps, info, token, symbol, chain_id, decimals),
        ExecuteMsg::RemoveToken { token } => execute_remove_token(deps, info, token),
        ExecuteMsg::DeactivateMapping { symbol, chain_id } => {
            execute_deactivate_mapping(deps, info, symbol, chain_id)
        }
        ExecuteMsg::SetTokenLimits {
            token,
            min_amount,
            max_amount,
            daily_limit,
        } => execute_set_token_limits(deps, info, token, min_amount, max_amount, daily_limit),

        // Chain registry
        ExecuteMsg::SetChainSupport {
            chain_id,
            supported,
        } => execute_set_chain_support(deps, info, chain_id, supported),

        // Roles
        ExecuteMsg::GrantRole { role, address } => execute_grant_role(deps, info, role, address),
        ExecuteMsg::RevokeRole { role, address } => {
            execute_revoke_role(deps, info, role, address)
        }
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),

        // Admin operations
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::SetBridgeFee {
            amount,
            denom,
            collector,
        } => execute_set_bridge_fee(deps, info, amount, denom, collector),
        ExecuteMsg::SetWithdrawalTimeout { seconds } => {
            execute_set_withdrawal_timeout(deps, info, seconds)
        }
        ExecuteMsg::SetAuthorizationScheme { scheme } => {
            execute_set_authorization_scheme(deps, info, scheme)
        }
        ExecuteMsg::EmergencyWithdraw { asset, to, amount } => {
            execute_emergency_withdraw(deps, env, info, asset, to, amount)
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),

        // Registry queries
        QueryMsg::ResolveToken { symbol, chain_id } => {
            to_json_binary(&query_resolve_token(deps, symbol, chain_id)?)
        }
        QueryMsg::TokenMappings { start_after, limit } => {
            to_json_binary(&query_token_mappings(deps, start_after, limit)?)
        }
        QueryMsg::Token { token } => to_json_binary(&query_token(deps, token)?),
        QueryMsg::RateLimit { token } => to_json_binary(&query_rate_limit(deps, env, token)?),
        QueryMsg::Chains {} => to_json_binary(&query_chains(deps)?),

        // Ledger queries
        QueryMsg::IsProcessed { request_id } => {
            to_json_binary(&query_is_processed(deps, request_id)?)
        }
        QueryMsg::Withdrawal { request_id } => to_json_binary(&query_withdrawal(deps, request_id)?),
        QueryMsg::Deposit { request_id } => to_json_binary(&query_deposit(deps, request_id)?),
        QueryMsg::DepositByNonce {
            dest_chain_id,
            nonce,
        } => to_json_binary(&query_deposit_by_nonce(deps, dest_chain_id, nonce)?),
        QueryMsg::ChainNonce { chain_id } => to_json_binary(&query_chain_nonce(deps, chain_id)?),
        QueryMsg::TokenTotals { token } => to_json_binary(&query_token_totals(deps, token)?),

        // Role queries
        QueryMsg::HasRole { role, address } => {
            to_json_binary(&query_has_role(deps, role, address)?)
        }
        QueryMsg::RoleMembers { role } => to_json_binary(&query_role_members(deps, role)?),

        // Hash helpers
        QueryMsg::ComputeRequestId {
            sender,
            recipient,
            amount,
            dest_chain_id,
            nonce,
            source_chain_id,
        } => to_json_binary(&query_compute_request_id(
            sender,
            recipient,
            amount,
            dest_chain_id,
            nonce,
            source_chain_id,
        )?),
        QueryMsg::ClaimDigest {
            recipient,
            token,
            amount,
            request_id,
        } => to_json_binary(&query_claim_digest(recipient, token, amount, request_id)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // Stats were introduced after the first deployments
    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
