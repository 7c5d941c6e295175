use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const POOL: Symbol = symbol_short!("POOL");

// Per-account persistent storage uses tuple keys:  (prefix, account_address)
const ACCOUNT: Symbol = symbol_short!("ACCT");

const DAY_IN_LEDGERS: u32 = 17_280;
const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
const TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;

/// Deployment-time parameters. Written once by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub stake_token: Address,
    pub reward_token: Address,
    /// Length in seconds of every distribution window opened by a drip.
    pub rewards_duration: u64,
}

/// Global accounting of the pool.
///
/// Loaded once per invocation, mutated in memory by the engine and written
/// back with [`save_pool`] after every validation has passed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolState {
    pub total_staked: i128,
    /// Reward units emitted per second inside the current window.
    pub reward_rate: i128,
    pub period_finish: u64,
    pub last_update_time: u64,
    /// Cumulative reward per staked unit, scaled by `rewards::SCALE`.
    pub reward_per_token_stored: i128,
    /// Reward-token custody already folded into windows and not yet paid out.
    pub accounted_reward_balance: i128,
    /// Folded value that never became claimable: renewal rounding dust and
    /// emissions of intervals with nothing staked. Re-enters the next window.
    pub undistributed: i128,
}

/// Per-staker record. Exists only while it holds stake or owed rewards.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub balance: i128,
    pub reward_per_token_paid: i128,
    pub rewards_owed: i128,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub fn load_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&CONFIG, config);
    extend_ttl_instance(env);
}

pub fn load_pool(env: &Env) -> PoolState {
    env.storage().instance().get(&POOL).unwrap_or_default()
}

pub fn save_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&POOL, pool);
    extend_ttl_instance(env);
}

pub fn load_account(env: &Env, owner: &Address) -> Account {
    env.storage()
        .persistent()
        .get(&(ACCOUNT, owner.clone()))
        .unwrap_or_default()
}

/// Persist `account`, or drop its record once nothing is staked or owed.
///
/// With a zero balance the accumulator snapshot carries no entitlement, so
/// an empty record and a missing one read back the same.
pub fn save_account(env: &Env, owner: &Address, account: &Account) {
    let key = (ACCOUNT, owner.clone());
    if account.balance == 0 && account.rewards_owed == 0 {
        if env.storage().persistent().has(&key) {
            env.storage().persistent().remove(&key);
        }
        return;
    }
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn has_account(env: &Env, owner: &Address) -> bool {
    env.storage().persistent().has(&(ACCOUNT, owner.clone()))
}

/// Instance storage TTL covers the config and the pool state together.
fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
