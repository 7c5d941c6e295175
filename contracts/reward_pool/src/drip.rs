//! Reward funding by plain transfer.
//!
//! Nobody calls "fund": reward tokens are simply sent to the pool. On every
//! settlement the custodial balance is compared with what the schedule has
//! already absorbed, and any surplus opens a new window of
//! `rewards_duration` seconds that also carries the unreleased remainder of
//! the previous one.

use soroban_sdk::{log, token, Env};

use crate::state::{Config, PoolState};
use crate::{accrual, events, rewards, ContractError};

/// A window renewal triggered by newly observed custody.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Injection {
    pub amount: i128,
    pub leftover: i128,
    pub reward_rate: i128,
    pub period_finish: u64,
}

/// Fold any custody surplus into the schedule.
///
/// Expects the accumulator to be checkpointed at `now` already, so time
/// before the injection was credited at the old rate.
pub fn fold_injection(
    pool: &mut PoolState,
    custodial: i128,
    now: u64,
    duration: u64,
) -> Result<Option<Injection>, ContractError> {
    let injected = custodial
        .checked_sub(pool.accounted_reward_balance)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if injected < 0 {
        return Err(ContractError::InsufficientCustodialFunds);
    }
    if injected == 0 {
        return Ok(None);
    }

    let leftover = if now < pool.period_finish {
        rewards::emission(pool.reward_rate, pool.period_finish - now)?
    } else {
        0
    };
    let amount = injected
        .checked_add(leftover)
        .and_then(|a| a.checked_add(pool.undistributed))
        .ok_or(ContractError::ArithmeticOverflow)?;

    let window = rewards::open_window(amount, duration, custodial)?;
    let period_finish = now
        .checked_add(duration)
        .ok_or(ContractError::ArithmeticOverflow)?;

    pool.reward_rate = window.reward_rate;
    pool.period_finish = period_finish;
    pool.last_update_time = now;
    pool.accounted_reward_balance = custodial;
    pool.undistributed = window.remainder;

    Ok(Some(Injection {
        amount: injected,
        leftover,
        reward_rate: window.reward_rate,
        period_finish,
    }))
}

/// Checkpoint the accumulator, then read the pool's reward custody and fold
/// any surplus into the schedule.
///
/// Returns the custodial reward balance that was observed.
pub fn run(env: &Env, config: &Config, pool: &mut PoolState, now: u64) -> Result<i128, ContractError> {
    accrual::checkpoint(env, pool, now)?;

    let custodial =
        token::Client::new(env, &config.reward_token).balance(&env.current_contract_address());

    if let Some(injection) = fold_injection(pool, custodial, now, config.rewards_duration)? {
        log!(
            env,
            "drip folded (injected, leftover, rate)",
            injection.amount,
            injection.leftover,
            injection.reward_rate
        );
        events::publish_reward_added(
            env,
            injection.amount,
            injection.leftover,
            injection.reward_rate,
            injection.period_finish,
        );
    }

    Ok(custodial)
}
