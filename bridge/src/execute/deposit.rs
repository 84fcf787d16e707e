//! Deposit handlers (native funds, CW20 allowance, CW20 send hook).
//!
//! All three entry paths collect the tokens and the fee differently and then
//! share `process_deposit`, which records the deposit in the ledger.

use bridge_common::AssetInfo;
use cosmwasm_std::{
    coin, from_json, to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env,
    MessageInfo, Response, Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};

use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_request_id};
use crate::msg::ReceiveMsg;
use crate::query::resolve_token;
use crate::rate_limit::check_and_consume;
use crate::state::{
    DepositRecord, CHAIN_NONCES, CONFIG, DEPOSITS, DEPOSIT_BY_NONCE, STATS, SUPPORTED_CHAINS,
    TOKENS, TOKEN_TOTALS,
};

/// Deposit entered through `ExecuteMsg::Deposit`.
///
/// Native tokens must be attached as funds. CW20 tokens are pulled from the
/// caller's allowance with `TransferFrom`.
pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    amount: Uint128,
    recipient: String,
    dest_chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let asset = TOKENS.may_load(deps.storage, &token)?.map(|t| t.asset);

    let (fee_paid, pull_msg) = match asset {
        Some(AssetInfo::Cw20 { contract_addr }) => {
            reject_unexpected_funds(&info.funds, &[&config.fee_denom])?;
            let pull = CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                    owner: info.sender.to_string(),
                    recipient: env.contract.address.to_string(),
                    amount,
                })?,
                funds: vec![],
            });
            (sent_amount(&info.funds, &config.fee_denom), Some(pull))
        }
        // Unknown tokens take the native path and are rejected by
        // `process_deposit` once pause and chain checks have run.
        _ => {
            reject_unexpected_funds(&info.funds, &[&token, &config.fee_denom])?;
            let sent = sent_amount(&info.funds, &token);
            let fee_paid = if token == config.fee_denom {
                sent.checked_sub(amount)
                    .map_err(|_| ContractError::InvalidAmount {
                        reason: format!("sent {} {}, deposit requires {}", sent, token, amount),
                    })?
            } else {
                if sent != amount {
                    return Err(ContractError::InvalidAmount {
                        reason: format!("sent {} {}, deposit requires {}", sent, token, amount),
                    });
                }
                sent_amount(&info.funds, &config.fee_denom)
            };
            (fee_paid, None)
        }
    };

    let response = process_deposit(
        deps,
        &env,
        info.sender,
        token,
        amount,
        recipient,
        dest_chain_id,
        fee_paid,
    )?;

    Ok(match pull_msg {
        Some(msg) => response.add_message(msg),
        None => response,
    })
}

/// CW20 send hook. The token contract is `info.sender` and the depositor is
/// `cw20_msg.sender`. No native fee can accompany a CW20 send.
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let token = info.sender.to_string();
    match TOKENS.may_load(deps.storage, &token)? {
        Some(t) if !t.asset.is_native() => {}
        _ => return Err(ContractError::TokenNotSupported { token }),
    }

    let sender = deps.api.addr_validate(&cw20_msg.sender)?;
    let ReceiveMsg::Deposit {
        recipient,
        dest_chain_id,
    } = from_json(&cw20_msg.msg)?;

    process_deposit(
        deps,
        &env,
        sender,
        token,
        cw20_msg.amount,
        recipient,
        dest_chain_id,
        Uint128::zero(),
    )
}

/// Validate and record a deposit whose tokens are already (or about to be)
/// in custody. Forwards `fee_paid` to the fee collector.
#[allow(clippy::too_many_arguments)]
pub(crate) fn process_deposit(
    deps: DepsMut,
    env: &Env,
    sender: Addr,
    token: String,
    amount: Uint128,
    recipient: String,
    dest_chain_id: u64,
    fee_paid: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    if recipient.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "recipient must not be empty".to_string(),
        });
    }

    if !SUPPORTED_CHAINS
        .may_load(deps.storage, dest_chain_id)?
        .unwrap_or(false)
    {
        return Err(ContractError::UnsupportedChain {
            chain_id: dest_chain_id,
        });
    }

    let token_info = match TOKENS.may_load(deps.storage, &token)? {
        Some(info) if info.supported => info,
        _ => return Err(ContractError::TokenNotSupported { token }),
    };

    // the route itself must be mapped and active
    let route = resolve_token(deps.storage, &token_info.symbol, dest_chain_id)?;
    if route.address != token {
        return Err(ContractError::NotMapped {
            symbol: token_info.symbol,
            chain_id: dest_chain_id,
        });
    }

    check_and_consume(deps.storage, env.block.time, &token, amount)?;

    if fee_paid < config.bridge_fee {
        return Err(ContractError::InsufficientFee {
            expected: config.bridge_fee,
            got: fee_paid,
        });
    }

    let nonce = CHAIN_NONCES
        .may_load(deps.storage, dest_chain_id)?
        .unwrap_or(0)
        + 1;
    CHAIN_NONCES.save(deps.storage, dest_chain_id, &nonce)?;

    let request_id = compute_request_id(
        sender.as_str(),
        &recipient,
        amount.u128(),
        dest_chain_id,
        nonce,
        config.chain_id,
    );

    let record = DepositRecord {
        request_id,
        sender: sender.clone(),
        recipient: recipient.clone(),
        token: token.clone(),
        amount,
        dest_chain_id,
        nonce,
        source_chain_id: config.chain_id,
        timestamp: env.block.time,
        processed: false,
    };
    DEPOSITS.save(deps.storage, &request_id, &record)?;
    DEPOSIT_BY_NONCE.save(deps.storage, (dest_chain_id, nonce), &request_id)?;

    let mut totals = TOKEN_TOTALS
        .may_load(deps.storage, &token)?
        .unwrap_or_default();
    totals.deposited += amount;
    TOKEN_TOTALS.save(deps.storage, &token, &totals)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_deposits += 1;
    stats.total_fees_collected += fee_paid;
    STATS.save(deps.storage, &stats)?;

    let mut response = Response::new();
    if !fee_paid.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: vec![coin(fee_paid.u128(), &config.fee_denom)],
        });
    }

    Ok(response
        .set_data(Binary::from(request_id.to_vec()))
        .add_attribute("action", "deposit")
        .add_attribute("request_id", bytes32_to_hex(&request_id))
        .add_attribute("sender", sender)
        .add_attribute("recipient", recipient)
        .add_attribute("token", token)
        .add_attribute("amount", amount.to_string())
        .add_attribute("dest_chain_id", dest_chain_id.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("source_chain_id", config.chain_id.to_string())
        .add_attribute("timestamp", env.block.time.seconds().to_string())
        .add_attribute("fee", fee_paid.to_string()))
}

fn sent_amount(funds: &[Coin], denom: &str) -> Uint128 {
    funds
        .iter()
        .filter(|c| c.denom == denom)
        .fold(Uint128::zero(), |acc, c| acc + c.amount)
}

fn reject_unexpected_funds(funds: &[Coin], allowed: &[&str]) -> Result<(), ContractError> {
    match funds
        .iter()
        .find(|c| !c.amount.is_zero() && !allowed.contains(&c.denom.as_str()))
    {
        Some(c) => Err(ContractError::InvalidAmount {
            reason: format!("unexpected funds: {}", c),
        }),
        None => Ok(()),
    }
}
