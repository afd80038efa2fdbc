//! Group-by aggregations over listing records.

use crate::data::Listing;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean of one attribute within a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub count: usize,
    pub mean: f64,
}

/// Mean of `value` per distinct `key`, in alphabetical key order.
pub fn mean_by<K, V>(listings: &[Listing], key: K, value: V) -> Vec<GroupMean>
where
    K: Fn(&Listing) -> &str,
    V: Fn(&Listing) -> f64,
{
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for listing in listings {
        groups.entry(key(listing)).or_default().push(value(listing));
    }

    groups
        .into_iter()
        .map(|(group, values)| GroupMean {
            group: group.to_string(),
            count: values.len(),
            mean: values.iter().mean(),
        })
        .collect()
}

/// Listings per distinct `key`, most frequent first. Equal counts stay alphabetical.
pub fn value_counts<K>(listings: &[Listing], key: K) -> Vec<(String, usize)>
where
    K: Fn(&Listing) -> &str,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for listing in listings {
        *counts.entry(key(listing)).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(group, n)| (group.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` groups with the largest mean, descending.
///
/// The sort is stable, so groups with equal means keep their input
/// (alphabetical) order.
pub fn largest(groups: &[GroupMean], n: usize) -> Vec<GroupMean> {
    ranked(groups, n, |a, b| b.mean.total_cmp(&a.mean))
}

/// The `n` groups with the smallest mean, ascending. Ties as in [`largest`].
pub fn smallest(groups: &[GroupMean], n: usize) -> Vec<GroupMean> {
    ranked(groups, n, |a, b| a.mean.total_cmp(&b.mean))
}

fn ranked<F>(groups: &[GroupMean], n: usize, order: F) -> Vec<GroupMean>
where
    F: Fn(&GroupMean, &GroupMean) -> Ordering,
{
    let mut sorted: Vec<GroupMean> = groups.iter().filter(|g| !g.mean.is_nan()).cloned().collect();
    sorted.sort_by(order);
    sorted.truncate(n);
    sorted
}
