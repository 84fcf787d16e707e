//! Execute handlers for the token bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `deposit` - Native, CW20 allowance and CW20 send-hook deposits
//! - `withdraw` - Relayer-gated withdrawal
//! - `registry` - Token mappings, token limits and chain support
//! - `admin` - Roles, admin handover, pause, bridge parameters, emergency withdraw

mod admin;
mod deposit;
mod registry;
mod withdraw;

pub use admin::*;
pub use deposit::*;
pub use registry::*;
pub use withdraw::*;
