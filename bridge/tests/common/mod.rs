//! Shared cw-multi-test setup for the bridge integration tests.

#![allow(dead_code)]

use cosmwasm_std::{coin, to_json_binary, Addr, Binary, Coin, Empty, Uint128};
use cw20::{Cw20Coin, Cw20ExecuteMsg};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use serde::de::DeserializeOwned;

use token_bridge::msg::{ExecuteMsg, InstantiateMsg, QueryMsg, ReceiveMsg};

pub type AppResult = anyhow::Result<AppResponse>;

pub const ADMIN: &str = "terra1admin";
pub const OPERATOR: &str = "terra1operator";
pub const RELAYER: &str = "terra1relayer";
pub const USER: &str = "terra1user";
pub const RECIPIENT: &str = "terra1recipient";
pub const COLLECTOR: &str = "terra1collector";

pub const FEE_DENOM: &str = "uluna";
pub const USDC: &str = "uusdc";

/// USDC limits in 6-decimal units: 1 .. 100_000 per transfer, 1_000_000 per day
pub const USDC_MIN: u128 = 1_000_000;
pub const USDC_MAX: u128 = 100_000_000_000;
pub const USDC_DAILY: u128 = 1_000_000_000_000;

pub const INITIAL_BALANCE: u128 = 100_000_000_000_000;

pub fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        token_bridge::contract::execute,
        token_bridge::contract::instantiate,
        token_bridge::contract::query,
    )
    .with_migrate(token_bridge::contract::migrate);
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

/// App with every test account funded in the fee denom and USDC.
pub fn mock_app() -> App {
    let mut app = App::default();
    app.init_modules(|router, _, storage| {
        for account in [ADMIN, OPERATOR, RELAYER, USER] {
            router
                .bank
                .init_balance(
                    storage,
                    &Addr::unchecked(account),
                    vec![
                        coin(INITIAL_BALANCE, FEE_DENOM),
                        coin(INITIAL_BALANCE, USDC),
                    ],
                )
                .unwrap();
        }
    });
    app
}

pub fn default_instantiate_msg(chain_id: u64, bridge_fee: u128) -> InstantiateMsg {
    InstantiateMsg {
        admin: None,
        chain_id,
        fee_denom: FEE_DENOM.to_string(),
        bridge_fee: Some(Uint128::new(bridge_fee)),
        fee_collector: Some(COLLECTOR.to_string()),
        withdrawal_timeout: None,
        operators: vec![OPERATOR.to_string()],
        relayers: vec![RELAYER.to_string()],
        authorization: None,
    }
}

pub fn instantiate_bridge(app: &mut App, code_id: u64, chain_id: u64, bridge_fee: u128) -> Addr {
    app.instantiate_contract(
        code_id,
        Addr::unchecked(ADMIN),
        &default_instantiate_msg(chain_id, bridge_fee),
        &[],
        format!("bridge-{}", chain_id),
        Some(ADMIN.to_string()),
    )
    .unwrap()
}

/// A single bridge on chain 1 with USDC routed to chain 5003.
pub struct Suite {
    pub app: App,
    pub bridge: Addr,
}

impl Suite {
    pub fn new(bridge_fee: u128) -> Self {
        let mut app = mock_app();
        let code_id = app.store_code(contract_bridge());
        let bridge = instantiate_bridge(&mut app, code_id, 1, bridge_fee);
        let mut suite = Suite { app, bridge };
        suite.support_chain(5003);
        suite.add_token(USDC, "USDC", 5003, 6);
        suite.set_limits(USDC, USDC_MIN, USDC_MAX, USDC_DAILY);
        suite
    }

    pub fn admin(&self) -> Addr {
        Addr::unchecked(ADMIN)
    }

    pub fn execute(&mut self, sender: &str, msg: &ExecuteMsg, funds: &[Coin]) -> AppResult {
        self.app
            .execute_contract(Addr::unchecked(sender), self.bridge.clone(), msg, funds)
    }

    pub fn support_chain(&mut self, chain_id: u64) {
        self.execute(
            ADMIN,
            &ExecuteMsg::SetChainSupport {
                chain_id,
                supported: true,
            },
            &[],
        )
        .unwrap();
    }

    pub fn add_token(&mut self, token: &str, symbol: &str, chain_id: u64, decimals: u8) {
        self.execute(
            OPERATOR,
            &ExecuteMsg::AddToken {
                token: token.to_string(),
                symbol: symbol.to_string(),
                chain_id,
                decimals,
            },
            &[],
        )
        .unwrap();
    }

    pub fn set_limits(&mut self, token: &str, min: u128, max: u128, daily: u128) {
        self.execute(
            OPERATOR,
            &ExecuteMsg::SetTokenLimits {
                token: token.to_string(),
                min_amount: Uint128::new(min),
                max_amount: Uint128::new(max),
                daily_limit: Uint128::new(daily),
            },
            &[],
        )
        .unwrap();
    }

    /// Native deposit with `fee` attached in the fee denom.
    pub fn deposit(
        &mut self,
        sender: &str,
        token: &str,
        amount: u128,
        dest_chain_id: u64,
        fee: u128,
    ) -> AppResult {
        let funds = native_funds(token, amount, fee);
        self.execute(
            sender,
            &ExecuteMsg::Deposit {
                token: token.to_string(),
                amount: Uint128::new(amount),
                recipient: "0xrecipient".to_string(),
                dest_chain_id,
            },
            &funds,
        )
    }

    pub fn withdraw(
        &mut self,
        sender: &str,
        token: &str,
        amount: u128,
        request_id: &Binary,
    ) -> AppResult {
        self.execute(
            sender,
            &ExecuteMsg::Withdraw {
                recipient: RECIPIENT.to_string(),
                token: token.to_string(),
                amount: Uint128::new(amount),
                request_id: request_id.clone(),
                deposited_at: None,
                authorization: None,
            },
            &[],
        )
    }

    pub fn query<T: DeserializeOwned>(&self, msg: &QueryMsg) -> T {
        self.app.wrap().query_wasm_smart(&self.bridge, msg).unwrap()
    }

    pub fn balance(&self, addr: &str, denom: &str) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, denom)
            .unwrap()
            .amount
            .u128()
    }

    pub fn bridge_balance(&self, denom: &str) -> u128 {
        self.balance(self.bridge.as_str(), denom)
    }

    /// Move USDC into the bridge from outside the ledger (destination-side
    /// liquidity).
    pub fn fund_bridge(&mut self, denom: &str, amount: u128) {
        self.app
            .send_tokens(
                Addr::unchecked(ADMIN),
                self.bridge.clone(),
                &[coin(amount, denom)],
            )
            .unwrap();
    }

    pub fn advance_seconds(&mut self, seconds: u64) {
        self.app.update_block(|block| {
            block.time = block.time.plus_seconds(seconds);
            block.height += seconds / 5;
        });
    }

    /// Instantiate a cw20-base token holding `balance` for USER.
    pub fn create_cw20(&mut self, symbol: &str, balance: u128) -> Addr {
        let code_id = self.app.store_code(contract_cw20());
        self.app
            .instantiate_contract(
                code_id,
                Addr::unchecked(ADMIN),
                &cw20_base::msg::InstantiateMsg {
                    name: format!("{} Token", symbol),
                    symbol: symbol.to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: USER.to_string(),
                        amount: Uint128::new(balance),
                    }],
                    mint: None,
                    marketing: None,
                },
                &[],
                "cw20-test",
                None,
            )
            .unwrap()
    }

    /// Deposit a CW20 via `Send` (receive hook).
    pub fn send_cw20(
        &mut self,
        cw20: &Addr,
        amount: u128,
        dest_chain_id: u64,
    ) -> AppResult {
        self.app.execute_contract(
            Addr::unchecked(USER),
            cw20.clone(),
            &Cw20ExecuteMsg::Send {
                contract: self.bridge.to_string(),
                amount: Uint128::new(amount),
                msg: to_json_binary(&ReceiveMsg::Deposit {
                    recipient: "0xrecipient".to_string(),
                    dest_chain_id,
                })
                .unwrap(),
            },
            &[],
        )
    }

    pub fn cw20_balance(&self, cw20: &Addr, addr: &str) -> u128 {
        let res: cw20::BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                cw20,
                &cw20::Cw20QueryMsg::Balance {
                    address: addr.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }
}

pub fn native_funds(token: &str, amount: u128, fee: u128) -> Vec<Coin> {
    let mut funds = if token == FEE_DENOM {
        vec![coin(amount + fee, FEE_DENOM)]
    } else {
        let mut funds = vec![coin(amount, token)];
        if fee > 0 {
            funds.push(coin(fee, FEE_DENOM));
        }
        funds
    };
    funds.sort_by(|a, b| a.denom.cmp(&b.denom));
    funds
}

/// Request id returned in the deposit response data.
pub fn request_id_of(res: &AppResponse) -> Binary {
    res.data.clone().expect("deposit returns the request id")
}

/// Value of a wasm attribute emitted by the bridge.
pub fn wasm_attr(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .filter(|e| e.ty == "wasm")
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}
