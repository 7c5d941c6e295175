use soroban_sdk::{Env, I256};

use crate::ContractError;

/// Fixed-point scaling factor.
///
/// All reward-per-token values are multiplied by this constant before storage
/// to preserve sub-unit precision without floating-point arithmetic.
/// Products against it can exceed `i128`, so they go through
/// [`mul_div_floor`].
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// `floor(x × y / denominator)` for non-negative operands.
///
/// The product is taken in `i128` when it fits and in a 256-bit host integer
/// otherwise; only a quotient that does not fit `i128` is an error.
pub fn mul_div_floor(env: &Env, x: i128, y: i128, denominator: i128) -> Result<i128, ContractError> {
    if x < 0 || y < 0 || denominator <= 0 {
        return Err(ContractError::ArithmeticOverflow);
    }
    if let Some(product) = x.checked_mul(y) {
        return Ok(product / denominator);
    }

    I256::from_i128(env, x)
        .mul(&I256::from_i128(env, y))
        .div(&I256::from_i128(env, denominator))
        .to_i128()
        .ok_or(ContractError::ArithmeticOverflow)
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Recompute the global `reward_per_token_stored` value.
///
/// This is the fundamental O(1) accumulation step:
///
/// ```text
/// Δrpt = reward_rate × elapsed_seconds × SCALE / total_staked
/// new_rpt = stored_rpt + Δrpt
/// ```
///
/// When `total_staked` is zero we return `stored` unchanged: no stakers
/// means no distribution. Division floors, so the pool never promises more
/// than it emitted.
///
/// # Arguments
/// * `stored`       – current `reward_per_token_stored` (scaled by SCALE)
/// * `reward_rate`  – tokens emitted per second across *all* stakers
/// * `elapsed`      – seconds since the last update
/// * `total_staked` – sum of all active stakes
pub fn compute_reward_per_token(
    env: &Env,
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> Result<i128, ContractError> {
    if total_staked <= 0 {
        return Ok(stored);
    }

    let delta = mul_div_floor(env, emission(reward_rate, elapsed)?, SCALE, total_staked)?;

    stored
        .checked_add(delta)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Calculate the total rewards earned by a single staker.
///
/// ```text
/// earned = staked × (current_rpt − user_rpt_paid) / SCALE + user_earned
/// ```
///
/// The subtraction `current_rpt − user_rpt_paid` isolates only the
/// accumulation that happened *since the user's last snapshot*, so prior
/// claims/snapshots are never double-counted.
pub fn earned(
    env: &Env,
    staked: i128,
    current_rpt: i128,
    user_rpt_paid: i128,
    user_earned: i128,
) -> Result<i128, ContractError> {
    let delta = current_rpt
        .checked_sub(user_rpt_paid)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let new_rewards = mul_div_floor(env, staked, delta, SCALE)?;

    user_earned
        .checked_add(new_rewards)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Reward units released by `reward_rate` over `elapsed` seconds.
pub fn emission(reward_rate: i128, elapsed: u64) -> Result<i128, ContractError> {
    reward_rate
        .checked_mul(i128::from(elapsed))
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Rate and rounding remainder of a freshly opened window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    pub reward_rate: i128,
    /// `amount − reward_rate × duration`, carried to the next renewal.
    pub remainder: i128,
}

/// Spread `amount` evenly over `duration` seconds.
///
/// The rate is floored, and additionally capped so that
/// `reward_rate × duration ≤ custodial`: a window never promises more than
/// the pool holds.
pub fn open_window(amount: i128, duration: u64, custodial: i128) -> Result<Window, ContractError> {
    if duration == 0 {
        return Err(ContractError::InvalidDuration);
    }
    let duration = i128::from(duration);

    let mut reward_rate = amount / duration;
    let cap = custodial / duration;
    if reward_rate > cap {
        reward_rate = cap;
    }
    let reward_rate = reward_rate.max(0);

    let scheduled = reward_rate
        .checked_mul(duration)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let remainder = amount
        .checked_sub(scheduled)
        .ok_or(ContractError::ArithmeticOverflow)?;

    Ok(Window {
        reward_rate,
        remainder,
    })
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// These are pure-math tests with no Soroban environment dependency.
