// Joining profile rows with account info for the `list` action

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::models::{Account, Profile, UserSummary};

/// Join profiles with their accounts and order newest account first.
///
/// The listing is driven by profiles: an account without a profile is not
/// listed. A profile whose account is gone keeps its denormalized email,
/// has no `created_at`, and sorts after every dated row. Ties keep the
/// order in which the profiles were supplied.
pub fn join_profiles_with_accounts(profiles: Vec<Profile>, accounts: &[Account]) -> Vec<UserSummary> {
    let by_id: HashMap<&str, &Account> = accounts.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut users: Vec<UserSummary> = profiles
        .into_iter()
        .map(|profile| {
            let account = by_id.get(profile.id.as_str());
            UserSummary {
                email: account.and_then(|a| a.email.clone()).or(profile.email),
                created_at: account.and_then(|a| a.created_at),
                id: profile.id,
                full_name: profile.full_name,
                role: profile.role,
                updated_at: profile.updated_at,
            }
        })
        .collect();

    sort_newest_first(&mut users);
    users
}

/// Order by `created_at` descending, undated rows last
fn sort_newest_first(users: &mut [UserSummary]) {
    users.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
