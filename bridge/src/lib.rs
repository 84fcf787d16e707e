//! Token Bridge Contract - Multi-chain deposit ledger and relayer-gated withdrawals
//!
//! One instance is deployed per chain. Instances share no state; an off-chain
//! relayer carries deposits from one instance to another.
//!
//! # Outgoing Flow (Deposit)
//! 1. User locks native or CW20 tokens in custody, paying the flat bridge fee
//! 2. The per-token rate limiter validates and consumes the amount
//! 3. The destination chain's nonce is incremented and a request id derived
//! 4. The deposit is recorded and emitted as `action=deposit` attributes
//!
//! # Incoming Flow (Withdraw)
//! 1. A relayer observes the deposit on the source chain
//! 2. The relayer calls `Withdraw` here with the same request id
//! 3. Replay, liquidity, timeout and authorization checks run
//! 4. The request id is marked processed and funds are released
//!
//! # Security
//! - Exactly-once release per request id
//! - Per-token rate limiting (lazy 24h window)
//! - Role-based access (admin, operator, relayer) with two-step admin handover
//! - Pluggable withdrawal authorization (role only, or signed claim)
//! - Emergency pause and admin emergency withdrawal

pub mod auth;
pub mod contract;
pub mod error;
mod execute;
pub mod hash;
pub mod msg;
pub mod query;
pub mod rate_limit;
pub mod state;

pub use crate::auth::{AuthorizationScheme, AuthorizationVerifier, Role};
pub use crate::error::{ContractError, ErrorKind};
pub use crate::hash::{compute_claim_digest, compute_request_id, keccak256};
pub use bridge_common::AssetInfo;
