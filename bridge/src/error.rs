//! Error types for the token bridge contract
//!
//! Every failure aborts the whole call. `ContractError::kind` classifies each
//! variant so operational tooling can tell a rejected limit apart from a
//! missing permission or an already-processed request.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

/// Coarse classification of a `ContractError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the role or proof required for the action
    Authorization,
    /// Registry or chain configuration does not allow the action
    Configuration,
    /// Input values were rejected (limits, fees, malformed data)
    Validation,
    /// Bridge or request state forbids the action right now
    State,
    /// Custody does not hold enough funds
    Resource,
    /// Storage, serialization or host failures
    Internal,
}

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only operator can perform this action")]
    UnauthorizedOperator,

    #[error("Unauthorized: only relayer can perform this action")]
    UnauthorizedRelayer,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("Invalid authorization: {reason}")]
    InvalidAuthorization { reason: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Token not mapped: {symbol} on chain {chain_id}")]
    NotMapped { symbol: String, chain_id: u64 },

    #[error("Unsupported chain: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Token already mapped: {symbol} on chain {chain_id} points to {existing}")]
    AlreadyMapped {
        symbol: String,
        chain_id: u64,
        existing: String,
    },

    #[error("Token not supported: {token}")]
    TokenNotSupported { token: String },

    #[error("Rate limits not configured for token: {token}")]
    LimitsNotConfigured { token: String },

    #[error("Invalid limits: {reason}")]
    InvalidLimits { reason: String },

    #[error("Invalid chain ID: {chain_id}")]
    InvalidChainId { chain_id: u64 },

    #[error("Invalid public key length: expected 33 or 65 bytes, got {got}")]
    InvalidPublicKey { got: usize },

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Invalid withdrawal timeout: must be at most {max} seconds")]
    InvalidWithdrawalTimeout { max: u64 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Amount {amount} is below the minimum of {min_amount}")]
    BelowMinimum {
        min_amount: Uint128,
        amount: Uint128,
    },

    #[error("Amount {amount} is above the maximum of {max_amount}")]
    AboveMaximum {
        max_amount: Uint128,
        amount: Uint128,
    },

    #[error("Daily limit exceeded: limit {daily_limit}, used {daily_used}, requested {requested}")]
    DailyLimitExceeded {
        daily_limit: Uint128,
        daily_used: Uint128,
        requested: Uint128,
    },

    #[error("Insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid request id length: expected 32 bytes, got {got}")]
    InvalidRequestId { got: usize },

    #[error("Deposit timestamp required while a withdrawal timeout is configured")]
    MissingDepositTimestamp,

    // ========================================================================
    // State Errors
    // ========================================================================

    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Request already processed: {request_id}")]
    AlreadyProcessed { request_id: String },

    #[error("Withdrawal too early: {remaining_seconds} seconds remaining")]
    TooEarly { remaining_seconds: u64 },

    // ========================================================================
    // Resource Errors
    // ========================================================================

    #[error("Insufficient bridge liquidity: available {available}, requested {requested}")]
    InsufficientLiquidity {
        available: Uint128,
        requested: Uint128,
    },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Std(_) => ErrorKind::Internal,

            ContractError::Unauthorized
            | ContractError::UnauthorizedOperator
            | ContractError::UnauthorizedRelayer
            | ContractError::UnauthorizedPendingAdmin
            | ContractError::InvalidAuthorization { .. } => ErrorKind::Authorization,

            ContractError::NotMapped { .. }
            | ContractError::UnsupportedChain { .. }
            | ContractError::InvalidAddress { .. }
            | ContractError::AlreadyMapped { .. }
            | ContractError::TokenNotSupported { .. }
            | ContractError::LimitsNotConfigured { .. }
            | ContractError::InvalidLimits { .. }
            | ContractError::InvalidChainId { .. }
            | ContractError::InvalidPublicKey { .. }
            | ContractError::NoPendingAdmin
            | ContractError::InvalidWithdrawalTimeout { .. } => ErrorKind::Configuration,

            ContractError::BelowMinimum { .. }
            | ContractError::AboveMaximum { .. }
            | ContractError::DailyLimitExceeded { .. }
            | ContractError::InsufficientFee { .. }
            | ContractError::InvalidAmount { .. }
            | ContractError::InvalidRequestId { .. }
            | ContractError::MissingDepositTimestamp => ErrorKind::Validation,

            ContractError::BridgePaused
            | ContractError::AlreadyProcessed { .. }
            | ContractError::TooEarly { .. } => ErrorKind::State,

            ContractError::InsufficientLiquidity { .. } => ErrorKind::Resource,
        }
    }
}
