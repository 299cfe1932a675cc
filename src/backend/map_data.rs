//! Turns approved submissions into the `{country -> policy count}` map the
//! map page renders, and buckets counts into fill colors.

use std::collections::HashMap;

use crate::backend::policy::CountrySubmission;

/// Fill colors per count bucket, darkest for the busiest countries.
const FILL_NONE: &str = "#e5e7eb";
const FILL_LOW: &str = "#93c5fd";
const FILL_MID: &str = "#3b82f6";
const FILL_HIGH: &str = "#1d4ed8";

#[derive(Debug, Clone, PartialEq)]
pub struct MapRegion {
    pub country: String,
    pub count: usize,
    pub fill: &'static str,
    pub label: String,
}

/// Count present policies per country across fetched submissions.
pub fn policy_counts(submissions: &[CountrySubmission]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for submission in submissions {
        let present = submission.present_count();
        if present > 0 {
            *counts.entry(submission.country.clone()).or_insert(0) += present;
        }
    }
    counts
}

/// Convert a count map into render-ready regions, sorted by descending
/// count then name so the list view is stable.
pub fn regions(counts: &HashMap<String, usize>) -> Vec<MapRegion> {
    let mut regions: Vec<MapRegion> = counts
        .iter()
        .map(|(country, &count)| MapRegion {
            country: country.clone(),
            count,
            fill: fill_for(count),
            label: match count {
                1 => format!("{country}: 1 policy"),
                n => format!("{country}: {n} policies"),
            },
        })
        .collect();
    regions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    regions
}

pub fn fill_for(count: usize) -> &'static str {
    match count {
        0 => FILL_NONE,
        1..=2 => FILL_LOW,
        3..=5 => FILL_MID,
        _ => FILL_HIGH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::policy::CountrySubmission;

    fn submission(country: &str, policy_names: &[&str]) -> CountrySubmission {
        let mut s = CountrySubmission::empty();
        s.country = country.to_string();
        for (i, name) in policy_names.iter().enumerate() {
            s.policy_initiatives[i].policy_name = name.to_string();
        }
        s
    }

    #[test]
    fn test_counts_skip_blank_slots_and_empty_countries() {
        let submissions = vec![
            submission("France", &["AI Act", "Compute Fund"]),
            submission("Japan", &[]),
        ];
        let counts = policy_counts(&submissions);
        assert_eq!(counts.get("France"), Some(&2));
        assert!(!counts.contains_key("Japan"));
    }

    #[test]
    fn test_counts_accumulate_across_fetched_pages() {
        let submissions = vec![
            submission("France", &["AI Act"]),
            submission("France", &["Skills Programme"]),
        ];
        assert_eq!(policy_counts(&submissions).get("France"), Some(&2));
    }

    #[test]
    fn test_fill_buckets() {
        assert_eq!(fill_for(0), FILL_NONE);
        assert_eq!(fill_for(2), FILL_LOW);
        assert_eq!(fill_for(5), FILL_MID);
        assert_eq!(fill_for(6), FILL_HIGH);
    }

    #[test]
    fn test_regions_sorted_and_labelled() {
        let mut counts = HashMap::new();
        counts.insert("France".to_string(), 1);
        counts.insert("Japan".to_string(), 4);
        let regions = regions(&counts);
        assert_eq!(regions[0].country, "Japan");
        assert_eq!(regions[0].label, "Japan: 4 policies");
        assert_eq!(regions[1].label, "France: 1 policy");
        assert_eq!(regions[1].fill, FILL_LOW);
    }
}
