//! Lazy reward accounting over a [`PoolState`].
//!
//! Every function here is O(1): the pool never walks its stakers. Accrual for
//! an arbitrary idle interval is reconstructed in one step from the stored
//! accumulator and the active window.

use soroban_sdk::Env;

use crate::rewards;
use crate::state::{Account, PoolState};
use crate::ContractError;

/// `min(now, period_finish)`: the last instant the current rate applies to.
pub fn last_time_reward_applicable(pool: &PoolState, now: u64) -> u64 {
    now.min(pool.period_finish)
}

/// Accumulator value after crediting `elapsed` seconds at the current rate.
///
/// `None` when the interval cannot be credited to anyone: nothing is staked,
/// or the accumulator would leave `i128`.
fn advance(env: &Env, pool: &PoolState, elapsed: u64) -> Result<Option<i128>, ContractError> {
    if pool.total_staked == 0 {
        return Ok(None);
    }
    match rewards::compute_reward_per_token(
        env,
        pool.reward_per_token_stored,
        pool.reward_rate,
        elapsed,
        pool.total_staked,
    ) {
        Ok(rpt) => Ok(Some(rpt)),
        Err(ContractError::ArithmeticOverflow) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reward per staked unit as of `now`, without writing anything.
pub fn reward_per_token(env: &Env, pool: &PoolState, now: u64) -> Result<i128, ContractError> {
    let elapsed = last_time_reward_applicable(pool, now).saturating_sub(pool.last_update_time);
    Ok(advance(env, pool, elapsed)?.unwrap_or(pool.reward_per_token_stored))
}

/// Advance the global accumulator to `min(now, period_finish)` at the
/// current rate.
///
/// Emission that cannot be credited is not lost: it moves to
/// `undistributed` and is folded into the next window. That covers
/// intervals with nothing staked and intervals that would push the
/// accumulator out of range, so stake stays withdrawable either way.
pub fn checkpoint(env: &Env, pool: &mut PoolState, now: u64) -> Result<(), ContractError> {
    let applicable = last_time_reward_applicable(pool, now);
    let elapsed = applicable.saturating_sub(pool.last_update_time);

    match advance(env, pool, elapsed)? {
        Some(rpt) => pool.reward_per_token_stored = rpt,
        None => {
            let idle = rewards::emission(pool.reward_rate, elapsed)?;
            pool.undistributed = pool
                .undistributed
                .checked_add(idle)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
    }

    if applicable > pool.last_update_time {
        pool.last_update_time = applicable;
    }
    Ok(())
}

/// Freeze everything `account` earned since its last snapshot.
///
/// Must run after [`checkpoint`] so the snapshot is taken at "now".
pub fn settle_account(
    env: &Env,
    pool: &PoolState,
    account: &mut Account,
) -> Result<(), ContractError> {
    account.rewards_owed = rewards::earned(
        env,
        account.balance,
        pool.reward_per_token_stored,
        account.reward_per_token_paid,
        account.rewards_owed,
    )?;
    account.reward_per_token_paid = pool.reward_per_token_stored;
    Ok(())
}

/// Owed plus not-yet-settled rewards of `account` as of `now`.
pub fn earned(env: &Env, pool: &PoolState, account: &Account, now: u64) -> Result<i128, ContractError> {
    rewards::earned(
        env,
        account.balance,
        reward_per_token(env, pool, now)?,
        account.reward_per_token_paid,
        account.rewards_owed,
    )
}
