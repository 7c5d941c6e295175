//! Stake bookkeeping. Token movement stays in the contract entry points.

use crate::state::{Account, PoolState};
use crate::ContractError;

/// Reject zero and negative amounts.
fn require_positive(amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(())
}

/// Add `amount` to the account and to the pool total.
pub fn credit(pool: &mut PoolState, account: &mut Account, amount: i128) -> Result<(), ContractError> {
    require_positive(amount)?;

    let balance = account
        .balance
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let total = pool
        .total_staked
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    account.balance = balance;
    pool.total_staked = total;
    Ok(())
}

/// Remove `amount` from the account and from the pool total.
///
/// Nothing is written unless both subtractions succeed.
pub fn debit(pool: &mut PoolState, account: &mut Account, amount: i128) -> Result<(), ContractError> {
    require_positive(amount)?;
    if amount > account.balance {
        return Err(ContractError::InvalidAmount);
    }

    let balance = account
        .balance
        .checked_sub(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let total = pool
        .total_staked
        .checked_sub(amount)
        .filter(|t| *t >= 0)
        .ok_or(ContractError::ArithmeticOverflow)?;

    account.balance = balance;
    pool.total_staked = total;
    Ok(())
}
