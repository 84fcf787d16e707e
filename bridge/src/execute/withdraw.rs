//! Relayer-gated withdrawal handler.
//!
//! A request id moves `Unknown -> Processed` exactly once per instance. The
//! processed set is checked and written inside the same call that releases
//! the funds, so a replay can never observe a half-processed request.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Timestamp, Uint128};

use crate::auth::{ensure_relayer, WithdrawClaim};
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, parse_request_id};
use crate::state::{
    WithdrawalRecord, CONFIG, DEPOSITS, PROCESSED_REQUESTS, STATS, TOKENS, TOKEN_TOTALS,
};

/// Release `amount` of `token` to `recipient` for a deposit made on another
/// chain.
///
/// Authorization: Relayer only. The configured authorization scheme then
/// decides whether `authorization` must carry a signature over the claim.
#[allow(clippy::too_many_arguments)]
pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    token: String,
    amount: Uint128,
    request_id: Binary,
    deposited_at: Option<Timestamp>,
    authorization: Option<Binary>,
) -> Result<Response, ContractError> {
    ensure_relayer(deps.storage, &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let request_id = parse_request_id(&request_id)?;
    if PROCESSED_REQUESTS.has(deps.storage, &request_id) {
        return Err(ContractError::AlreadyProcessed {
            request_id: bytes32_to_hex(&request_id),
        });
    }

    let token_info = match TOKENS.may_load(deps.storage, &token)? {
        Some(t) if t.supported => t,
        _ => return Err(ContractError::TokenNotSupported { token }),
    };

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }

    let recipient = deps
        .api
        .addr_validate(&recipient)
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })?;

    if config.withdrawal_timeout > 0 {
        let deposited_at = deposited_at.ok_or(ContractError::MissingDepositTimestamp)?;
        let ready_at = deposited_at.plus_seconds(config.withdrawal_timeout);
        if env.block.time < ready_at {
            return Err(ContractError::TooEarly {
                remaining_seconds: ready_at.seconds() - env.block.time.seconds(),
            });
        }
    }

    let available = token_info
        .asset
        .query_balance(&deps.querier, &env.contract.address)?;
    if available < amount {
        return Err(ContractError::InsufficientLiquidity {
            available,
            requested: amount,
        });
    }

    let claim = WithdrawClaim {
        recipient: &recipient,
        token: &token,
        amount,
        request_id: &request_id,
    };
    config
        .authorization
        .verifier()
        .verify(deps.api, &claim, authorization.as_ref())?;

    PROCESSED_REQUESTS.save(
        deps.storage,
        &request_id,
        &WithdrawalRecord {
            request_id,
            recipient: recipient.clone(),
            token: token.clone(),
            amount,
            relayer: info.sender.clone(),
            processed_at: env.block.time,
        },
    )?;

    // Loopback deposits (same instance) carry their own record
    if let Some(mut deposit) = DEPOSITS.may_load(deps.storage, &request_id)? {
        deposit.processed = true;
        DEPOSITS.save(deps.storage, &request_id, &deposit)?;
    }

    let mut totals = TOKEN_TOTALS
        .may_load(deps.storage, &token)?
        .unwrap_or_default();
    totals.withdrawn += amount;
    TOKEN_TOTALS.save(deps.storage, &token, &totals)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_withdrawals += 1;
    STATS.save(deps.storage, &stats)?;

    let transfer = token_info.asset.transfer_msg(&recipient, amount)?;

    Ok(Response::new()
        .add_message(transfer)
        .add_attribute("action", "withdraw")
        .add_attribute("request_id", bytes32_to_hex(&request_id))
        .add_attribute("recipient", recipient)
        .add_attribute("token", token)
        .add_attribute("amount", amount.to_string())
        .add_attribute("relayer", info.sender)
        .add_attribute("timestamp", env.block.time.seconds().to_string()))
}
