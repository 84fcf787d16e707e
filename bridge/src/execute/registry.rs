//! Token and chain registry handlers.
//!
//! This module handles:
//! - Token mappings (add/update/remove/deactivate), operator only
//! - Per-token transfer limits, operator only
//! - Chain support, admin only

use bridge_common::AssetInfo;
use cosmwasm_std::{Deps, DepsMut, MessageInfo, Order, Response, StdResult, Storage, Uint128};

use crate::auth::{ensure_admin, ensure_operator};
use crate::error::ContractError;
use crate::rate_limit::validate_limits;
use crate::state::{
    TokenInfo, TokenLimits, TokenMapping, CONFIG, SUPPORTED_CHAINS, TOKENS, TOKEN_LIMITS,
    TOKEN_MAPPINGS,
};

// ============================================================================
// Token Mappings
// ============================================================================

/// Map (symbol, chain_id) to `token` and mark `token` supported on this
/// instance.
pub fn execute_add_token(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    symbol: String,
    chain_id: u64,
    decimals: u8,
) -> Result<Response, ContractError> {
    ensure_operator(deps.storage, &info.sender)?;
    validate_token_input(&token, &symbol)?;

    // An active mapping only changes through UpdateToken; re-adding the
    // identical mapping is a no-op.
    if let Some(existing) = TOKEN_MAPPINGS.may_load(deps.storage, (&symbol, chain_id))? {
        if existing.active {
            if existing.address != token || existing.decimals != decimals {
                return Err(ContractError::AlreadyMapped {
                    symbol,
                    chain_id,
                    existing: existing.address,
                });
            }
            return Ok(Response::new()
                .add_attribute("action", "add_token")
                .add_attribute("token", token)
                .add_attribute("symbol", symbol)
                .add_attribute("chain_id", chain_id.to_string())
                .add_attribute("unchanged", "true"));
        }
    }

    save_mapping(deps, &token, &symbol, chain_id, decimals)?;

    Ok(Response::new()
        .add_attribute("action", "add_token")
        .add_attribute("token", token)
        .add_attribute("symbol", symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("decimals", decimals.to_string()))
}

/// Explicitly overwrite an existing mapping.
pub fn execute_update_token(
    mut deps: DepsMut,
    info: MessageInfo,
    token: String,
    symbol: String,
    chain_id: u64,
    decimals: u8,
) -> Result<Response, ContractError> {
    ensure_operator(deps.storage, &info.sender)?;
    validate_token_input(&token, &symbol)?;

    let previous = TOKEN_MAPPINGS
        .may_load(deps.storage, (&symbol, chain_id))?
        .ok_or_else(|| ContractError::NotMapped {
            symbol: symbol.clone(),
            chain_id,
        })?;

    save_mapping(deps.branch(), &token, &symbol, chain_id, decimals)?;

    let previous_supported = if previous.address != token {
        release_unmapped_token(deps.storage, &previous.address)?
    } else {
        true
    };

    Ok(Response::new()
        .add_attribute("action", "update_token")
        .add_attribute("token", token)
        .add_attribute("previous_token", previous.address)
        .add_attribute("previous_supported", previous_supported.to_string())
        .add_attribute("symbol", symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("decimals", decimals.to_string()))
}

/// Withdraw global support for `token` and deactivate every mapping that
/// points at it. Deposit records are left untouched.
pub fn execute_remove_token(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    ensure_operator(deps.storage, &info.sender)?;

    let mut token_info = TOKENS
        .may_load(deps.storage, &token)?
        .ok_or_else(|| ContractError::TokenNotSupported {
            token: token.clone(),
        })?;
    token_info.supported = false;
    TOKENS.save(deps.storage, &token, &token_info)?;

    let pointing = active_mappings_for(deps.storage, &token)?;

    for mapping in &pointing {
        let deactivated = TokenMapping {
            active: false,
            ..mapping.clone()
        };
        TOKEN_MAPPINGS.save(
            deps.storage,
            (&mapping.symbol, mapping.chain_id),
            &deactivated,
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "remove_token")
        .add_attribute("token", token)
        .add_attribute("deactivated_mappings", pointing.len().to_string()))
}

pub fn execute_deactivate_mapping(
    deps: DepsMut,
    info: MessageInfo,
    symbol: String,
    chain_id: u64,
) -> Result<Response, ContractError> {
    ensure_operator(deps.storage, &info.sender)?;

    let mut mapping = TOKEN_MAPPINGS
        .may_load(deps.storage, (&symbol, chain_id))?
        .ok_or_else(|| ContractError::NotMapped {
            symbol: symbol.clone(),
            chain_id,
        })?;
    mapping.active = false;
    TOKEN_MAPPINGS.save(deps.storage, (&symbol, chain_id), &mapping)?;
    let token_supported = release_unmapped_token(deps.storage, &mapping.address)?;

    Ok(Response::new()
        .add_attribute("action", "deactivate_mapping")
        .add_attribute("symbol", symbol)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("token", mapping.address)
        .add_attribute("token_supported", token_supported.to_string()))
}

/// Active mappings whose address is `token`.
fn active_mappings_for(storage: &dyn Storage, token: &str) -> StdResult<Vec<TokenMapping>> {
    Ok(TOKEN_MAPPINGS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, mapping)| mapping))
        .collect::<StdResult<Vec<_>>>()?
        .into_iter()
        .filter(|mapping| mapping.active && mapping.address == token)
        .collect())
}

/// Withdraw support for `token` once no active mapping points at it.
/// Returns whether the token is still supported.
fn release_unmapped_token(storage: &mut dyn Storage, token: &str) -> Result<bool, ContractError> {
    let Some(mut info) = TOKENS.may_load(storage, token)? else {
        return Ok(false);
    };
    if info.supported && active_mappings_for(storage, token)?.is_empty() {
        info.supported = false;
        TOKENS.save(storage, token, &info)?;
    }
    Ok(info.supported)
}

fn validate_token_input(token: &str, symbol: &str) -> Result<(), ContractError> {
    if token.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "token address must not be empty".to_string(),
        });
    }
    if symbol.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "token symbol must not be empty".to_string(),
        });
    }
    Ok(())
}

fn save_mapping(
    deps: DepsMut,
    token: &str,
    symbol: &str,
    chain_id: u64,
    decimals: u8,
) -> Result<(), ContractError> {
    TOKEN_MAPPINGS.save(
        deps.storage,
        (symbol, chain_id),
        &TokenMapping {
            symbol: symbol.to_string(),
            chain_id,
            address: token.to_string(),
            decimals,
            active: true,
        },
    )?;

    let asset = detect_asset(deps.as_ref(), token)?;
    TOKENS.save(
        deps.storage,
        token,
        &TokenInfo {
            asset,
            symbol: symbol.to_string(),
            decimals,
            supported: true,
        },
    )?;
    Ok(())
}

/// A token address that resolves to a contract is a CW20; anything else is
/// treated as a bank denom.
fn detect_asset(deps: Deps, token: &str) -> Result<AssetInfo, ContractError> {
    if deps.querier.query_wasm_contract_info(token).is_ok() {
        Ok(AssetInfo::Cw20 {
            contract_addr: deps.api.addr_validate(token)?,
        })
    } else {
        Ok(AssetInfo::Native {
            denom: token.to_string(),
        })
    }
}

// ============================================================================
// Token Limits
// ============================================================================

pub fn execute_set_token_limits(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    min_amount: Uint128,
    max_amount: Uint128,
    daily_limit: Uint128,
) -> Result<Response, ContractError> {
    ensure_operator(deps.storage, &info.sender)?;

    if !TOKENS.has(deps.storage, &token) {
        return Err(ContractError::TokenNotSupported { token });
    }

    let limits = TokenLimits {
        min_amount,
        max_amount,
        daily_limit,
    };
    validate_limits(&limits)?;
    TOKEN_LIMITS.save(deps.storage, &token, &limits)?;

    Ok(Response::new()
        .add_attribute("action", "set_token_limits")
        .add_attribute("token", token)
        .add_attribute("min_amount", min_amount.to_string())
        .add_attribute("max_amount", max_amount.to_string())
        .add_attribute("daily_limit", daily_limit.to_string()))
}

// ============================================================================
// Chain Registry
// ============================================================================

pub fn execute_set_chain_support(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    supported: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if chain_id == 0 {
        return Err(ContractError::InvalidChainId { chain_id });
    }

    if supported {
        SUPPORTED_CHAINS.save(deps.storage, chain_id, &true)?;
    } else {
        SUPPORTED_CHAINS.remove(deps.storage, chain_id);
    }

    Ok(Response::new()
        .add_attribute("action", "set_chain_support")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("supported", supported.to_string()))
}
