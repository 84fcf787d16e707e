//! Relayer-gated withdrawals: replay protection, liquidity, timeout and
//! signed claims.

mod common;

use common::*;
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use token_bridge::msg::{
    ClaimDigestResponse, DepositResponse, ExecuteMsg, IsProcessedResponse, QueryMsg,
    StatsResponse, TokenTotalsResponse, WithdrawalResponse,
};
use token_bridge::{compute_claim_digest, AuthorizationScheme, ContractError, ErrorKind};

const AMOUNT: u128 = 1_000_000_000;

fn request_id(seed: u8) -> Binary {
    Binary::from(vec![seed; 32])
}

fn is_processed(suite: &Suite, request_id: &Binary) -> bool {
    let res: IsProcessedResponse = suite.query(&QueryMsg::IsProcessed {
        request_id: request_id.clone(),
    });
    res.processed
}

fn withdraw_msg(
    amount: u128,
    request_id: &Binary,
    deposited_at: Option<Timestamp>,
    authorization: Option<Binary>,
) -> ExecuteMsg {
    ExecuteMsg::Withdraw {
        recipient: RECIPIENT.to_string(),
        token: USDC.to_string(),
        amount: Uint128::new(amount),
        request_id: request_id.clone(),
        deposited_at,
        authorization,
    }
}

#[test]
fn test_withdraw_releases_exactly_once() {
    let mut suite = Suite::new(0);
    suite.fund_bridge(USDC, 10 * AMOUNT);
    let id = request_id(1);

    assert!(!is_processed(&suite, &id));
    let res = suite.withdraw(RELAYER, USDC, AMOUNT, &id).unwrap();
    assert_eq!(wasm_attr(&res, "action").unwrap(), "withdraw");
    assert_eq!(wasm_attr(&res, "relayer").unwrap(), RELAYER);
    assert_eq!(suite.balance(RECIPIENT, USDC), AMOUNT);
    assert!(is_processed(&suite, &id));

    // replaying the same request id is refused and pays nothing
    let err = suite.withdraw(RELAYER, USDC, AMOUNT, &id).unwrap_err();
    let err_str = err.root_cause().to_string();
    assert!(
        err_str.contains("Request already processed: 0x0101"),
        "Expected AlreadyProcessed, got: {}",
        err_str
    );
    let kind = err
        .root_cause()
        .downcast_ref::<ContractError>()
        .map(ContractError::kind);
    assert_eq!(kind, Some(ErrorKind::State));
    assert_eq!(suite.balance(RECIPIENT, USDC), AMOUNT);
    assert_eq!(suite.bridge_balance(USDC), 9 * AMOUNT);

    let record: Option<WithdrawalResponse> = suite.query(&QueryMsg::Withdrawal {
        request_id: id.clone(),
    });
    let record = record.unwrap();
    assert_eq!(record.recipient, Addr::unchecked(RECIPIENT));
    assert_eq!(record.amount, Uint128::new(AMOUNT));
    assert_eq!(record.relayer, Addr::unchecked(RELAYER));
    assert_eq!(record.processed_at, suite.app.block_info().time);

    let stats: StatsResponse = suite.query(&QueryMsg::Stats {});
    assert_eq!(stats.total_withdrawals, 1);
    let totals: TokenTotalsResponse = suite.query(&QueryMsg::TokenTotals {
        token: USDC.to_string(),
    });
    assert_eq!(totals.withdrawn, Uint128::new(AMOUNT));
}

#[test]
fn test_withdraw_requires_relayer_role() {
    let mut suite = Suite::new(0);
    suite.fund_bridge(USDC, 10 * AMOUNT);
    let id = request_id(2);

    // neither the admin nor an operator is implicitly a relayer
    for sender in [USER, ADMIN, OPERATOR] {
        let res = suite.withdraw(sender, USDC, AMOUNT, &id);
        let err_str = res.unwrap_err().root_cause().to_string();
        assert!(err_str.contains("only relayer"), "got: {}", err_str);
    }
    assert!(!is_processed(&suite, &id));

    suite
        .execute(
            ADMIN,
            &ExecuteMsg::RevokeRole {
                role: token_bridge::Role::Relayer,
                address: RELAYER.to_string(),
            },
            &[],
        )
        .unwrap();
    assert!(suite.withdraw(RELAYER, USDC, AMOUNT, &id).is_err());
}

#[test]
fn test_withdraw_preconditions() {
    let mut suite = Suite::new(0);
    let id = request_id(3);

    let res = suite.withdraw(RELAYER, USDC, AMOUNT, &id);
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(
        err_str.contains("Insufficient bridge liquidity: available 0"),
        "got: {}",
        err_str
    );

    suite.fund_bridge(USDC, AMOUNT);

    let res = suite.withdraw(RELAYER, "uother", AMOUNT, &id);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Token not supported: uother"));

    let res = suite.withdraw(RELAYER, USDC, 0, &id);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid amount"));

    let short = Binary::from(vec![1u8; 31]);
    let res = suite.withdraw(RELAYER, USDC, AMOUNT, &short);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid request id length: expected 32 bytes, got 31"));

    let res = suite.execute(
        RELAYER,
        &ExecuteMsg::Withdraw {
            recipient: String::new(),
            token: USDC.to_string(),
            amount: Uint128::new(AMOUNT),
            request_id: id.clone(),
            deposited_at: None,
            authorization: None,
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid address"));

    // failures leave the request claimable
    assert!(!is_processed(&suite, &id));
    suite.withdraw(RELAYER, USDC, AMOUNT, &id).unwrap();
}

#[test]
fn test_withdrawal_timeout() {
    let mut suite = Suite::new(0);
    suite.fund_bridge(USDC, 10 * AMOUNT);
    suite
        .execute(ADMIN, &ExecuteMsg::SetWithdrawalTimeout { seconds: 3_600 }, &[])
        .unwrap();
    let id = request_id(4);
    let deposited_at = suite.app.block_info().time;

    let res = suite.withdraw(RELAYER, USDC, AMOUNT, &id);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Deposit timestamp required"));

    suite.advance_seconds(600);
    let res = suite.execute(
        RELAYER,
        &withdraw_msg(AMOUNT, &id, Some(deposited_at), None),
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(
        err_str.contains("Withdrawal too early: 3000 seconds remaining"),
        "got: {}",
        err_str
    );

    suite.advance_seconds(3_000);
    suite
        .execute(
            RELAYER,
            &withdraw_msg(AMOUNT, &id, Some(deposited_at), None),
            &[],
        )
        .unwrap();
    assert!(is_processed(&suite, &id));

    let res = suite.execute(ADMIN, &ExecuteMsg::SetWithdrawalTimeout { seconds: 604_801 }, &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid withdrawal timeout"));
}

#[test]
fn test_loopback_withdraw_marks_deposit_processed() {
    let mut suite = Suite::new(0);
    suite.support_chain(1);
    suite.add_token(USDC, "USDC", 1, 6);

    let res = suite.deposit(USER, USDC, AMOUNT, 1, 0).unwrap();
    let id = request_id_of(&res);

    suite.withdraw(RELAYER, USDC, AMOUNT, &id).unwrap();

    let record: Option<DepositResponse> = suite.query(&QueryMsg::Deposit {
        request_id: id.clone(),
    });
    assert!(record.unwrap().processed);
    assert_eq!(suite.bridge_balance(USDC), 0);
    assert_eq!(suite.balance(RECIPIENT, USDC), AMOUNT);
}

#[test]
fn test_signed_claims() {
    let mut suite = Suite::new(0);
    suite.fund_bridge(USDC, 10 * AMOUNT);

    let key = SigningKey::from_slice(&[42u8; 32]).unwrap();
    let public_key = Binary::from(key.verifying_key().to_encoded_point(true).as_bytes());
    suite
        .execute(
            ADMIN,
            &ExecuteMsg::SetAuthorizationScheme {
                scheme: AuthorizationScheme::SignatureOverTuple { public_key },
            },
            &[],
        )
        .unwrap();

    let id = request_id(5);
    let mut id_bytes = [0u8; 32];
    id_bytes.copy_from_slice(id.as_slice());

    // the query exposes the exact digest a signer must cover
    let digest: ClaimDigestResponse = suite.query(&QueryMsg::ClaimDigest {
        recipient: RECIPIENT.to_string(),
        token: USDC.to_string(),
        amount: Uint128::new(AMOUNT),
        request_id: id.clone(),
    });
    let expected = compute_claim_digest(RECIPIENT, USDC, AMOUNT, &id_bytes);
    assert_eq!(digest.digest.as_slice(), expected.as_slice());

    let sign = |digest: &[u8; 32]| -> Binary {
        let signature: Signature = key.sign_prehash(digest).unwrap();
        Binary::from(signature.to_bytes().as_slice())
    };

    let res = suite.execute(RELAYER, &withdraw_msg(AMOUNT, &id, None, None), &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("missing signature"));

    // signature over a different amount
    let other = compute_claim_digest(RECIPIENT, USDC, 2 * AMOUNT, &id_bytes);
    let res = suite.execute(
        RELAYER,
        &withdraw_msg(AMOUNT, &id, None, Some(sign(&other))),
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("signature does not match claim"));
    assert!(!is_processed(&suite, &id));

    suite
        .execute(
            RELAYER,
            &withdraw_msg(AMOUNT, &id, None, Some(sign(&expected))),
            &[],
        )
        .unwrap();
    assert!(is_processed(&suite, &id));
    assert_eq!(suite.balance(RECIPIENT, USDC), AMOUNT);

    // the signature check never replaces the relayer role
    let id = request_id(6);
    id_bytes.copy_from_slice(id.as_slice());
    let signature = sign(&compute_claim_digest(RECIPIENT, USDC, AMOUNT, &id_bytes));
    let res = suite.execute(USER, &withdraw_msg(AMOUNT, &id, None, Some(signature)), &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("only relayer"));
}

#[test]
fn test_invalid_public_key_rejected() {
    let mut suite = Suite::new(0);
    let res = suite.execute(
        ADMIN,
        &ExecuteMsg::SetAuthorizationScheme {
            scheme: AuthorizationScheme::SignatureOverTuple {
                public_key: Binary::from(vec![2u8; 20]),
            },
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid public key length: expected 33 or 65 bytes, got 20"));

    let res = suite.execute(
        OPERATOR,
        &ExecuteMsg::SetAuthorizationScheme {
            scheme: AuthorizationScheme::RoleOnly,
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("only admin"));
}
