#![no_std]

pub mod accrual;
pub mod drip;
pub mod events;
pub mod ledger;
pub mod rewards;
pub mod state;

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

use state::{Account, Config, PoolState};

/// One week, the customary length of a distribution window.
pub const DEFAULT_REWARDS_DURATION: u64 = 7 * 24 * 60 * 60;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    ArithmeticOverflow = 4,
    InsufficientCustodialFunds = 5,
    TokensIdentical = 6,
    InvalidDuration = 7,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of an account returned by `get_account`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountInfo {
    pub staked: i128,
    pub reward_per_token_paid: i128,
    pub rewards_owed: i128,
    /// `rewards_owed` plus what a settlement right now would add.
    pub earned: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardPool;

#[contractimpl]
impl RewardPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `stake_token`      – token users deposit.
    /// * `reward_token`     – token distributed as rewards; funded by plain
    ///   transfers to the pool address.
    /// * `rewards_duration` – seconds each drip is spread over.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
        rewards_duration: u64,
    ) -> Result<(), ContractError> {
        if state::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if rewards_duration == 0 {
            return Err(ContractError::InvalidDuration);
        }

        state::save_config(
            &env,
            &Config {
                stake_token: stake_token.clone(),
                reward_token: reward_token.clone(),
                rewards_duration,
            },
        );
        state::save_pool(&env, &PoolState::default());

        events::publish_initialized(&env, stake_token, reward_token, rewards_duration);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// Settlement runs first so the new tokens never earn rewards for time
    /// that already passed.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let config = state::load_config(&env)?;

        let (mut pool, mut account, _) = Self::settle(&env, &config, Some(&staker))?;
        ledger::credit(&mut pool, &mut account, amount)?;

        state::save_pool(&env, &pool);
        state::save_account(&env, &staker, &account);

        token::Client::new(&env, &config.stake_token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_staked(&env, staker, amount, pool.total_staked);

        Ok(())
    }

    /// Return `amount` stake tokens to `staker`.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let config = state::load_config(&env)?;

        Self::withdraw_stake(&env, &config, &staker, amount)
    }

    /// Pay out everything `staker` has earned. Returns the amount paid;
    /// an empty claim pays nothing and succeeds.
    pub fn claim(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        let config = state::load_config(&env)?;

        Self::pay_rewards(&env, &config, &staker)
    }

    /// Withdraw the whole stake, then claim. Returns the claimed reward.
    pub fn exit(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        let config = state::load_config(&env)?;

        let balance = state::load_account(&env, &staker).balance;
        if balance > 0 {
            Self::withdraw_stake(&env, &config, &staker, balance)?;
        }
        Self::pay_rewards(&env, &config, &staker)
    }

    /// Settle the pool without touching any account.
    ///
    /// Lets anyone start a window for rewards that were just transferred in.
    pub fn sync(env: Env) -> Result<(), ContractError> {
        let config = state::load_config(&env)?;
        let (pool, _, _) = Self::settle(&env, &config, None)?;
        state::save_pool(&env, &pool);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward per staked unit as of the current ledger time, scaled by
    /// `rewards::SCALE`.
    pub fn reward_per_token(env: Env) -> Result<i128, ContractError> {
        let pool = state::load_pool(&env);
        accrual::reward_per_token(&env, &pool, env.ledger().timestamp())
    }

    /// Real-time claimable rewards for `staker`, without mutating state.
    pub fn earned(env: Env, staker: Address) -> Result<i128, ContractError> {
        let pool = state::load_pool(&env);
        let account = state::load_account(&env, &staker);
        accrual::earned(&env, &pool, &account, env.ledger().timestamp())
    }

    /// Return the full position of `staker` with a live `earned` figure.
    pub fn get_account(env: Env, staker: Address) -> Result<AccountInfo, ContractError> {
        let pool = state::load_pool(&env);
        let account = state::load_account(&env, &staker);
        let earned = accrual::earned(&env, &pool, &account, env.ledger().timestamp())?;

        Ok(AccountInfo {
            staked: account.balance,
            reward_per_token_paid: account.reward_per_token_paid,
            rewards_owed: account.rewards_owed,
            earned,
        })
    }

    pub fn balance_of(env: Env, staker: Address) -> i128 {
        state::load_account(&env, &staker).balance
    }

    pub fn total_staked(env: Env) -> i128 {
        state::load_pool(&env).total_staked
    }

    pub fn reward_rate(env: Env) -> i128 {
        state::load_pool(&env).reward_rate
    }

    pub fn period_finish(env: Env) -> u64 {
        state::load_pool(&env).period_finish
    }

    pub fn last_update_time(env: Env) -> u64 {
        state::load_pool(&env).last_update_time
    }

    pub fn reward_per_token_stored(env: Env) -> i128 {
        state::load_pool(&env).reward_per_token_stored
    }

    /// Return the stored pool accounting as of the last settlement.
    pub fn pool_state(env: Env) -> PoolState {
        state::load_pool(&env)
    }

    pub fn rewards_duration(env: Env) -> Result<u64, ContractError> {
        Ok(state::load_config(&env)?.rewards_duration)
    }

    pub fn stake_token(env: Env) -> Result<Address, ContractError> {
        Ok(state::load_config(&env)?.stake_token)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(state::load_config(&env)?.reward_token)
    }

    pub fn is_initialized(env: Env) -> bool {
        state::is_initialized(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Bring the pool, and optionally one account, up to the current ledger
    /// time.
    ///
    /// 1. Checkpoint the accumulator at the current rate.
    /// 2. Fold any reward custody surplus into a new window.
    /// 3. Snapshot the account's entitlement.
    ///
    /// Nothing is written; callers persist the returned values once their own
    /// checks pass. Also returns the observed reward custody.
    fn settle(
        env: &Env,
        config: &Config,
        staker: Option<&Address>,
    ) -> Result<(PoolState, Account, i128), ContractError> {
        let now = env.ledger().timestamp();
        let mut pool = state::load_pool(env);

        let custodial = drip::run(env, config, &mut pool, now)?;

        let mut account = match staker {
            Some(staker) => state::load_account(env, staker),
            None => Account::default(),
        };
        if staker.is_some() {
            accrual::settle_account(env, &pool, &mut account)?;
        }

        Ok((pool, account, custodial))
    }

    fn withdraw_stake(
        env: &Env,
        config: &Config,
        staker: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let (mut pool, mut account, _) = Self::settle(env, config, Some(staker))?;
        ledger::debit(&mut pool, &mut account, amount)?;

        let stake_client = token::Client::new(env, &config.stake_token);
        if stake_client.balance(&env.current_contract_address()) < amount {
            return Err(ContractError::InsufficientCustodialFunds);
        }

        // Effects before interaction.
        state::save_pool(env, &pool);
        state::save_account(env, staker, &account);

        stake_client.transfer(&env.current_contract_address(), staker, &amount);

        events::publish_withdrawn(env, staker.clone(), amount, pool.total_staked);

        Ok(())
    }

    fn pay_rewards(env: &Env, config: &Config, staker: &Address) -> Result<i128, ContractError> {
        let (mut pool, mut account, custodial) = Self::settle(env, config, Some(staker))?;

        let owed = account.rewards_owed;
        if owed <= 0 {
            // Nothing to claim: keep the pool settlement, pay nothing.
            state::save_pool(env, &pool);
            state::save_account(env, staker, &account);
            return Ok(0);
        }
        if custodial < owed {
            return Err(ContractError::InsufficientCustodialFunds);
        }

        account.rewards_owed = 0;
        pool.accounted_reward_balance = pool
            .accounted_reward_balance
            .checked_sub(owed)
            .ok_or(ContractError::ArithmeticOverflow)?;

        state::save_pool(env, &pool);
        state::save_account(env, staker, &account);

        token::Client::new(env, &config.reward_token).transfer(
            &env.current_contract_address(),
            staker,
            &owed,
        );

        events::publish_reward_paid(env, staker.clone(), owed);

        Ok(owed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
