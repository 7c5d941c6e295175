#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for how rewards are shared.
//!
//! Invariants tested:
//! - Equal stakes over the same interval earn equal rewards
//! - Claim order changes payouts by at most one unit of rounding dust
//! - Nothing accrues while nothing is staked, whatever gets dripped
//! - Read-only queries are stable at a fixed timestamp
//! - A stake made after a drop never earns the time before it

use proptest::prelude::*;

use crate::common::{setup_test_env, DURATION};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_equal_stakes_earn_equally(
        fund in 1i128..=1_000_000_000,
        stake in 1i128..=1_000_000,
        elapsed in 0u64..=2 * DURATION,
    ) {
        let mut ctx = setup_test_env();
        ctx.drip(fund);
        let alice = ctx.new_staker(stake);
        let bob = ctx.new_staker(stake);

        ctx.client.stake(&alice, &stake);
        ctx.client.stake(&bob, &stake);
        ctx.warp_by(elapsed);

        prop_assert_eq!(ctx.client.earned(&alice), ctx.client.earned(&bob));
    }

    #[test]
    fn prop_claim_order_moves_at_most_dust(
        fund in 1i128..=1_000_000_000,
        stake in 1i128..=1_000_000,
        elapsed in 1u64..=DURATION,
    ) {
        let mut ctx = setup_test_env();
        ctx.drip(fund);
        let alice = ctx.new_staker(stake);
        let bob = ctx.new_staker(stake);

        ctx.client.stake(&alice, &stake);
        ctx.client.stake(&bob, &stake);
        ctx.warp_by(elapsed);

        let first = ctx.client.claim(&alice);
        let second = ctx.client.claim(&bob);
        prop_assert!((first - second).abs() <= 1);

        let rate = ctx.client.reward_rate();
        prop_assert!(first + second <= rate * i128::from(elapsed));
    }

    #[test]
    fn prop_no_accrual_without_stake(
        drops in proptest::collection::vec((1i128..=10_000_000, 0u64..=DURATION), 1..8)
    ) {
        let mut ctx = setup_test_env();
        for (amount, gap) in drops {
            ctx.drip(amount);
            ctx.client.sync();
            ctx.warp_by(gap);
            ctx.client.sync();
            prop_assert_eq!(ctx.client.reward_per_token_stored(), 0);
            prop_assert_eq!(ctx.client.reward_per_token(), 0);
        }
    }

    #[test]
    fn prop_queries_stable_at_fixed_time(
        fund in 1i128..=1_000_000_000,
        stake in 1i128..=1_000_000,
        elapsed in 0u64..=3 * DURATION,
    ) {
        let mut ctx = setup_test_env();
        ctx.drip(fund);
        let alice = ctx.new_staker(stake);
        ctx.client.stake(&alice, &stake);
        ctx.warp_by(elapsed);

        prop_assert_eq!(ctx.client.reward_per_token(), ctx.client.reward_per_token());
        prop_assert_eq!(ctx.client.get_account(&alice), ctx.client.get_account(&alice));
        prop_assert_eq!(ctx.client.pool_state(), ctx.client.pool_state());
    }

    #[test]
    fn prop_late_staker_gets_no_backpay(
        fund in 3_600i128..=1_000_000_000,
        head_start in 1u64..DURATION,
    ) {
        let mut ctx = setup_test_env();
        ctx.drip(fund);
        let alice = ctx.new_staker(100);
        let bob = ctx.new_staker(100);

        ctx.client.stake(&alice, &100);
        ctx.warp_by(head_start);
        ctx.client.stake(&bob, &100);

        prop_assert_eq!(ctx.client.earned(&bob), 0);
        prop_assert_eq!(ctx.client.exit(&bob), 0);
    }
}
