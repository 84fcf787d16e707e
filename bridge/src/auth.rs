//! Roles and withdrawal authorization.
//!
//! The admin is a singleton stored in `Config`; operators and relayers are
//! additive sets. Withdrawals are always gated on the relayer role, and the
//! configured `AuthorizationScheme` decides what else a claim must carry.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, Binary, Order, StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::hash::compute_claim_digest;
use crate::state::{Config, OPERATORS, RELAYERS};

// ============================================================================
// Roles
// ============================================================================

/// Grantable roles. The admin role is only transferable via handover.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    Operator,
    Relayer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Relayer => "relayer",
        }
    }
}

pub fn has_role(storage: &dyn Storage, role: Role, addr: &Addr) -> StdResult<bool> {
    let active = match role {
        Role::Operator => OPERATORS.may_load(storage, addr)?,
        Role::Relayer => RELAYERS.may_load(storage, addr)?,
    };
    Ok(active.unwrap_or(false))
}

pub fn grant_role(storage: &mut dyn Storage, role: Role, addr: &Addr) -> StdResult<()> {
    match role {
        Role::Operator => OPERATORS.save(storage, addr, &true),
        Role::Relayer => RELAYERS.save(storage, addr, &true),
    }
}

pub fn revoke_role(storage: &mut dyn Storage, role: Role, addr: &Addr) {
    match role {
        Role::Operator => OPERATORS.remove(storage, addr),
        Role::Relayer => RELAYERS.remove(storage, addr),
    }
}

pub fn role_members(storage: &dyn Storage, role: Role) -> StdResult<Vec<Addr>> {
    let entries = match role {
        Role::Operator => OPERATORS
            .range(storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?,
        Role::Relayer => RELAYERS
            .range(storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?,
    };
    Ok(entries
        .into_iter()
        .filter_map(|(addr, active)| active.then_some(addr))
        .collect())
}

pub fn ensure_admin(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn ensure_operator(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if !has_role(storage, Role::Operator, sender)? {
        return Err(ContractError::UnauthorizedOperator);
    }
    Ok(())
}

pub fn ensure_relayer(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if !has_role(storage, Role::Relayer, sender)? {
        return Err(ContractError::UnauthorizedRelayer);
    }
    Ok(())
}

// ============================================================================
// Withdrawal authorization
// ============================================================================

/// How a withdrawal claim is authorized on top of the relayer role.
#[cw_serde]
pub enum AuthorizationScheme {
    /// Relayer role membership is the whole trust boundary
    RoleOnly,
    /// The claim must carry a secp256k1 signature by `public_key` over
    /// `compute_claim_digest(recipient, token, amount, request_id)`
    SignatureOverTuple { public_key: Binary },
}

impl AuthorizationScheme {
    pub fn validate(&self) -> Result<(), ContractError> {
        match self {
            AuthorizationScheme::RoleOnly => Ok(()),
            AuthorizationScheme::SignatureOverTuple { public_key } => match public_key.len() {
                33 | 65 => Ok(()),
                got => Err(ContractError::InvalidPublicKey { got }),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthorizationScheme::RoleOnly => "role_only",
            AuthorizationScheme::SignatureOverTuple { .. } => "signature_over_tuple",
        }
    }

    pub fn verifier(&self) -> Box<dyn AuthorizationVerifier + '_> {
        match self {
            AuthorizationScheme::RoleOnly => Box::new(RoleOnly),
            AuthorizationScheme::SignatureOverTuple { public_key } => {
                Box::new(SignatureOverTuple {
                    public_key: public_key.as_slice(),
                })
            }
        }
    }
}

/// The tuple a withdrawal authorization covers.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawClaim<'a> {
    pub recipient: &'a Addr,
    pub token: &'a str,
    pub amount: Uint128,
    pub request_id: &'a [u8; 32],
}

impl WithdrawClaim<'_> {
    pub fn digest(&self) -> [u8; 32] {
        compute_claim_digest(
            self.recipient.as_str(),
            self.token,
            self.amount.u128(),
            self.request_id,
        )
    }
}

pub trait AuthorizationVerifier {
    fn verify(
        &self,
        api: &dyn Api,
        claim: &WithdrawClaim,
        authorization: Option<&Binary>,
    ) -> Result<(), ContractError>;
}

/// Accepts every claim; the caller's relayer role is checked before this.
pub struct RoleOnly;

impl AuthorizationVerifier for RoleOnly {
    fn verify(
        &self,
        _api: &dyn Api,
        _claim: &WithdrawClaim,
        _authorization: Option<&Binary>,
    ) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Requires a 64-byte (r || s) secp256k1 signature over the claim digest.
pub struct SignatureOverTuple<'a> {
    pub public_key: &'a [u8],
}

impl AuthorizationVerifier for SignatureOverTuple<'_> {
    fn verify(
        &self,
        api: &dyn Api,
        claim: &WithdrawClaim,
        authorization: Option<&Binary>,
    ) -> Result<(), ContractError> {
        let signature = authorization.ok_or_else(|| ContractError::InvalidAuthorization {
            reason: "missing signature".to_string(),
        })?;
        if signature.len() != 64 {
            return Err(ContractError::InvalidAuthorization {
                reason: format!("signature must be 64 bytes, got {}", signature.len()),
            });
        }

        let digest = claim.digest();
        match api.secp256k1_verify(&digest, signature.as_slice(), self.public_key) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ContractError::InvalidAuthorization {
                reason: "signature does not match claim".to_string(),
            }),
            Err(e) => Err(ContractError::InvalidAuthorization {
                reason: e.to_string(),
            }),
        }
    }
}
