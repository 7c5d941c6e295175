#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_pool::{RewardPool, RewardPoolClient, DEFAULT_REWARDS_DURATION};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, amount: u64 },
    Withdraw { user: u8, amount: u64 },
    Claim { user: u8 },
    Exit { user: u8 },
    Drip { amount: u64 },
    Warp { secs: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let pool = env.register(RewardPool, ());
    let client = RewardPoolClient::new(&env, &pool);
    client.initialize(&stake_token, &reward_token, &DEFAULT_REWARDS_DURATION);

    let users: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let stake_admin = StellarAssetClient::new(&env, &stake_token);
    let reward_admin = StellarAssetClient::new(&env, &reward_token);
    let rewards = TokenClient::new(&env, &reward_token);
    let stakes = TokenClient::new(&env, &stake_token);

    let mut funded: i128 = 0;
    let mut paid: i128 = 0;

    // Arbitrary amounts and gaps hunt for overflow panics; the
    // accounting assertions below catch silent value creation.
    for action in actions {
        match action {
            FuzzAction::Stake { user, amount } => {
                let who = &users[user as usize % users.len()];
                let amt = i128::from(amount) + 1;
                stake_admin.mint(who, &amt);
                let _ = client.try_stake(who, &amt);
            }
            FuzzAction::Withdraw { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_withdraw(who, &i128::from(amount));
            }
            FuzzAction::Claim { user } => {
                let who = &users[user as usize % users.len()];
                if let Ok(Ok(amount)) = client.try_claim(who) {
                    paid += amount;
                }
            }
            FuzzAction::Exit { user } => {
                let who = &users[user as usize % users.len()];
                if let Ok(Ok(amount)) = client.try_exit(who) {
                    paid += amount;
                }
            }
            FuzzAction::Drip { amount } => {
                let amt = i128::from(amount);
                if amt > 0 {
                    reward_admin.mint(&pool, &amt);
                    funded += amt;
                }
            }
            FuzzAction::Warp { secs } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(secs as u64));
            }
        }

        let state = client.pool_state();
        let balances: i128 = users.iter().map(|u| client.balance_of(u)).sum();
        assert_eq!(state.total_staked, balances);
        assert!(paid <= funded);
        assert!(state.accounted_reward_balance <= rewards.balance(&pool));
    }

    // Whatever happened, every staker gets the full stake back.
    for who in &users {
        let balance = client.balance_of(who);
        let before = stakes.balance(who);
        if balance > 0 {
            assert!(client.try_withdraw(who, &balance).is_ok());
        }
        assert_eq!(stakes.balance(who), before + balance);
        paid += client.claim(who);
    }
    assert_eq!(stakes.balance(&pool), 0);
    assert!(paid <= funded);
});
