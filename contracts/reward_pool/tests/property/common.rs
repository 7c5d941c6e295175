use reward_pool::{RewardPool, RewardPoolClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

pub const DURATION: u64 = 3_600;

pub struct TestContext {
    pub env: Env,
    pub client: RewardPoolClient<'static>,
    pub pool: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    /// Every reward unit ever sent to the pool.
    pub funded: i128,
}

/// Creates a mocked Soroban environment with two SAC tokens and an
/// initialized pool. Nothing is funded yet.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let pool = env.register(RewardPool, ());
    let client = RewardPoolClient::new(&env, &pool);
    client.initialize(&stake_token.address(), &reward_token.address(), &DURATION);

    TestContext {
        env,
        client,
        pool,
        stake_token: stake_token.address(),
        reward_token: reward_token.address(),
        funded: 0,
    }
}

impl TestContext {
    /// Transfer-style funding: mint straight into the pool's custody.
    pub fn drip(&mut self, amount: i128) {
        StellarAssetClient::new(&self.env, &self.reward_token).mint(&self.pool, &amount);
        self.funded += amount;
    }

    pub fn new_account(&self) -> Address {
        Address::generate(&self.env)
    }

    pub fn new_staker(&self, amount: i128) -> Address {
        let who = self.new_account();
        self.mint_stake(&who, amount);
        who
    }

    pub fn mint_stake(&self, who: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.stake_token).mint(who, &amount);
    }

    pub fn warp_by(&self, secs: u64) {
        let now = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(now + secs);
    }

    pub fn reward_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.reward_token).balance(who)
    }

    pub fn stake_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.stake_token).balance(who)
    }

    pub fn stake_custody(&self) -> i128 {
        TokenClient::new(&self.env, &self.stake_token).balance(&self.pool)
    }
}
