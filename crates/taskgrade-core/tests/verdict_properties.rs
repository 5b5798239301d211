//! Property tests for verdict normalisation.

#![allow(clippy::unwrap_used, clippy::panic)]

use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::{json, Value};
use taskgrade_core::{
    extract_review, Recommendation, ReviewResult, TaskType, KNOWN_PROBLEMS, SCORE_BANDS,
};

fn decode(value: Value, task_type: TaskType) -> ReviewResult {
    match value {
        Value::Object(map) => ReviewResult::from_value(&map, task_type),
        other => panic!("not an object: {other}"),
    }
}

fn task_type() -> impl Strategy<Value = TaskType> {
    prop_oneof![
        Just(TaskType::Backend),
        Just(TaskType::Frontend),
        Just(TaskType::Fullstack),
    ]
}

fn slug() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..KNOWN_PROBLEMS.len()).prop_map(|i| KNOWN_PROBLEMS[i].slug.to_string()),
        "[a-z_]{1,16}",
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn score_and_bands_stay_in_range(
        score in any::<i64>(),
        bands in proptest::collection::vec(any::<i64>(), 4),
        task in task_type(),
    ) {
        let result = decode(
            json!({
                "score": score,
                "breakdown": {
                    "problems": bands[0],
                    "fixes": bands[1],
                    "review": bands[2],
                    "tests": bands[3],
                }
            }),
            task,
        );

        prop_assert!(result.score <= 100);
        for ((name, points), band) in result.breakdown.entries().iter().zip(SCORE_BANDS.iter()) {
            prop_assert_eq!(*name, band.name);
            prop_assert!(*points <= band.max);
        }
        prop_assert!(result.breakdown.total() <= 100);
    }

    #[test]
    fn derived_recommendation_matches_thresholds(score in 0u32..=100) {
        let result = decode(json!({ "score": score }), TaskType::Fullstack);
        let expected = if score >= 60 {
            Recommendation::Pass
        } else if score >= 40 {
            Recommendation::Review
        } else {
            Recommendation::Reject
        };
        prop_assert_eq!(result.recommendation, expected);
    }

    #[test]
    fn reported_slugs_are_known_unique_and_consistent(
        found in proptest::collection::vec(slug(), 0..12),
        fixed in proptest::collection::vec(slug(), 0..12),
        task in task_type(),
    ) {
        let result = decode(
            json!({ "problems_found": found, "problems_fixed": fixed }),
            task,
        );

        for slug in result.problems_found.iter().chain(result.problems_fixed.iter()) {
            prop_assert!(task.has_problem(slug));
        }
        let mut deduped = result.problems_found.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), result.problems_found.len());
        for slug in &result.problems_fixed {
            prop_assert!(result.problems_found.contains(slug));
        }
    }

    #[test]
    fn verdict_survives_prose_around_json(prefix in "[A-Za-z .:]{0,40}", score in 0u32..=100) {
        let body = json!({ "score": score }).to_string();
        let envelope = json!({ "result": format!("{prefix}\n{body}\nDone.") }).to_string();

        let map = extract_review(&envelope).unwrap();
        let result = ReviewResult::from_value(&map, TaskType::Fullstack);
        prop_assert_eq!(result.score, score);
    }
}
