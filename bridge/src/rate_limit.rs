//! Per-token rate limiting with a lazily reset 24-hour window.
//!
//! Limits are enforced when a transfer is initiated (deposit side) and are
//! shared by every destination chain of a token. There is no background
//! timer: an expired window is reset by the next read.

use cosmwasm_std::{Storage, Timestamp, Uint128};

use crate::error::ContractError;
use crate::state::{RateWindow, TokenLimits, RATE_LIMIT_PERIOD, RATE_WINDOWS, TOKEN_LIMITS};

/// Check `min <= max <= daily` and that transfers are possible at all.
pub fn validate_limits(limits: &TokenLimits) -> Result<(), ContractError> {
    if limits.max_amount.is_zero() {
        return Err(ContractError::InvalidLimits {
            reason: "max_amount must be greater than zero".to_string(),
        });
    }
    if limits.min_amount > limits.max_amount {
        return Err(ContractError::InvalidLimits {
            reason: format!(
                "min_amount {} exceeds max_amount {}",
                limits.min_amount, limits.max_amount
            ),
        });
    }
    if limits.max_amount > limits.daily_limit {
        return Err(ContractError::InvalidLimits {
            reason: format!(
                "max_amount {} exceeds daily_limit {}",
                limits.max_amount, limits.daily_limit
            ),
        });
    }
    Ok(())
}

/// The window as it stands at `now`, with an expired or missing window
/// replaced by a fresh one. Nothing is written.
pub fn current_window(
    storage: &dyn Storage,
    now: Timestamp,
    token: &str,
) -> Result<RateWindow, ContractError> {
    let window = RATE_WINDOWS.may_load(storage, token)?;
    Ok(match window {
        Some(w) if now.seconds() < w.window_start.seconds() + RATE_LIMIT_PERIOD => w,
        _ => RateWindow {
            daily_used: Uint128::zero(),
            window_start: now,
        },
    })
}

/// Allowance left in `window` under `limits`.
pub fn remaining_allowance(limits: &TokenLimits, window: &RateWindow) -> Uint128 {
    limits.daily_limit.saturating_sub(window.daily_used)
}

/// Validate `amount` against the token's limits and consume it from the
/// current window. On error nothing is written.
pub fn check_and_consume(
    storage: &mut dyn Storage,
    now: Timestamp,
    token: &str,
    amount: Uint128,
) -> Result<RateWindow, ContractError> {
    let limits = TOKEN_LIMITS
        .may_load(storage, token)?
        .ok_or_else(|| ContractError::LimitsNotConfigured {
            token: token.to_string(),
        })?;

    let mut window = current_window(storage, now, token)?;

    if amount < limits.min_amount {
        return Err(ContractError::BelowMinimum {
            min_amount: limits.min_amount,
            amount,
        });
    }
    if amount > limits.max_amount {
        return Err(ContractError::AboveMaximum {
            max_amount: limits.max_amount,
            amount,
        });
    }

    let new_used = window.daily_used.checked_add(amount).map_err(|_| {
        ContractError::DailyLimitExceeded {
            daily_limit: limits.daily_limit,
            daily_used: window.daily_used,
            requested: amount,
        }
    })?;
    if new_used > limits.daily_limit {
        return Err(ContractError::DailyLimitExceeded {
            daily_limit: limits.daily_limit,
            daily_used: window.daily_used,
            requested: amount,
        });
    }

    window.daily_used = new_used;
    RATE_WINDOWS.save(storage, token, &window)?;

    Ok(window)
}
