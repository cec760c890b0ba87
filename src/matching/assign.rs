//! Exact minimum-cost assignment of roster entries to screen rows.
//!
//! Bitmask dynamic programming over subsets of used rows. Entries are
//! placed in index order, so the entry being decided for a subset is its
//! popcount and each DP state is just "which rows are taken". 2^n states
//! with n transitions each: exact and instant for the fixed n=12 of a
//! results screen, usable up to n of about 20.

/// Returns, for each entry index, the row index that minimizes the summed
/// cost over all one-to-one pairings.
///
/// `cost` must be square: `cost[i][j]` prices pairing entry `i` with row
/// `j`. The matrix is complete, so a full assignment always exists and
/// there is no error path. An empty matrix yields an empty assignment.
pub fn solve_assignment(cost: &[Vec<u32>]) -> Vec<usize> {
    let n = cost.len();
    debug_assert!(n <= 20, "bitmask DP table grows as 2^n");
    if n == 0 {
        return Vec::new();
    }

    let size = 1usize << n;
    // dp[mask] = cheapest way to pair entries 0..popcount(mask) with the
    // rows in mask; choice[mask] = the row given to the last entry placed.
    let mut dp = vec![u64::MAX; size];
    let mut choice = vec![0usize; size];
    dp[0] = 0;

    for mask in 0..size {
        if dp[mask] == u64::MAX {
            continue;
        }
        let entry = mask.count_ones() as usize;
        if entry >= n {
            continue;
        }
        for (row, &cell) in cost[entry].iter().enumerate() {
            if mask & (1 << row) != 0 {
                continue;
            }
            let next = mask | (1 << row);
            let total = dp[mask] + cell as u64;
            if total < dp[next] {
                dp[next] = total;
                choice[next] = row;
            }
        }
    }

    // Walk back from the full mask, peeling off the chosen row each step.
    let mut assignment = vec![0usize; n];
    let mut mask = size - 1;
    for entry in (0..n).rev() {
        let row = choice[mask];
        assignment[entry] = row;
        mask &= !(1 << row);
    }
    assignment
}
