use serde_json::json;
use sporlproxy::spotify::collection::{CONTAINS_BATCH_SIZE, batch_groups, mark_collected};
use sporlproxy::utils::*;
use std::collections::BTreeSet;

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("track{i}")).collect()
}

#[test]
fn test_generate_random_string() {
    let state = generate_random_string(48);

    // Should be exactly the requested length
    assert_eq!(state.len(), 48);

    // Should contain only alphanumeric characters
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated strings should be different
    assert_ne!(state, generate_random_string(48));

    assert!(generate_random_string(0).is_empty());
}

#[test]
fn test_generate_random_numbers_count_and_uniqueness() {
    for _ in 0..50 {
        let numbers = generate_random_numbers(3, 20, 0);

        // total + 1 values
        assert_eq!(numbers.len(), 4);

        let unique: BTreeSet<_> = numbers.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        assert!(numbers.iter().all(|n| *n < 20));
    }
}

#[test]
fn test_generate_random_numbers_respects_min() {
    let numbers = generate_random_numbers(2, 10, 5);
    assert_eq!(numbers.len(), 3);
    assert!(numbers.iter().all(|n| (5..10).contains(n)));
}

#[test]
fn test_generate_random_numbers_uses_whole_range() {
    // total + 1 == max - min, so every value in range is picked
    let numbers: BTreeSet<_> = generate_random_numbers(4, 5, 0).into_iter().collect();
    assert_eq!(numbers, (0..5).collect());
}

#[test]
fn test_generate_random_numbers_impossible_ranges() {
    assert!(generate_random_numbers(5, 5, 0).is_empty());
    assert!(generate_random_numbers(10, 5, 0).is_empty());
    assert!(generate_random_numbers(0, 3, 3).is_empty());
    assert!(generate_random_numbers(0, 2, 7).is_empty());
}

#[test]
fn test_random_color_comes_from_palette() {
    for _ in 0..20 {
        assert!(COLOR_LIST.contains(&random_color()));
    }
}

#[test]
fn test_batch_groups_sizes() {
    for (n, expected_groups) in [(0, 0), (1, 1), (10, 1), (11, 2), (25, 3), (30, 3)] {
        let groups = batch_groups(&ids(n));

        assert_eq!(groups.len(), expected_groups, "for {n} ids");
        assert!(groups.iter().all(|g| !g.is_empty() && g.len() <= CONTAINS_BATCH_SIZE));
    }
}

#[test]
fn test_batch_groups_restore_order() {
    let input = ids(23);
    let groups = batch_groups(&input);

    assert_eq!(groups[0].len(), 10);
    assert_eq!(groups[2].len(), 3);

    let restored: Vec<String> = groups.into_iter().flatten().collect();
    assert_eq!(restored, input);
}

#[test]
fn test_mark_collected_aligns_flags() {
    let mut tracks = vec![json!({"id": "a"}), json!({"id": "b"}), json!("not a track")];
    mark_collected(&mut tracks, &[false, true, true]);

    assert_eq!(tracks[0]["is_collected"], json!(false));
    assert_eq!(tracks[1]["is_collected"], json!(true));
    assert_eq!(tracks[2], json!("not a track"));
}
