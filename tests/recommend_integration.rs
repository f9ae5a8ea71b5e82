//! Integration tests for the recommendation flow.

mod common;

use common::fixtures::{
    DEFAULT_USER_ID, ProfileBuilder, caller_profile, create_candidates, disliked, ids_of, liked,
    open_file_engine,
};
use cofound::NEUTRAL_SCORE;
use cofound::model::UserId;
use futures::future::join_all;
use std::collections::HashSet;
use tempfile::TempDir;

#[tokio::test]
async fn test_cold_start_five_candidates_returns_three() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());

    let ranked = engine
        .recommend(
            DEFAULT_USER_ID,
            &caller_profile(),
            create_candidates(&["a", "b", "c", "d", "e"]),
            &[],
            10,
        )
        .await
        .unwrap();

    assert_eq!(ranked.len(), 3);
    assert!(ranked.iter().all(|r| r.score == NEUTRAL_SCORE));
}

#[tokio::test]
async fn test_swiped_and_self_never_returned() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());

    engine.record_swipe(DEFAULT_USER_ID, "a").await.unwrap();
    engine.record_swipe(DEFAULT_USER_ID, "b").await.unwrap();

    let history = vec![liked(ProfileBuilder::new("c").skills(&["rust"]).build())];
    let ranked = engine
        .recommend(
            DEFAULT_USER_ID,
            &caller_profile(),
            create_candidates(&["a", "b", "c", DEFAULT_USER_ID, "d", "e"]),
            &history,
            10,
        )
        .await
        .unwrap();

    let returned: HashSet<String> = ids_of(&ranked).into_iter().collect();
    let expected: HashSet<String> = ["d", "e"].iter().map(|s| s.to_string()).collect();
    assert_eq!(returned, expected);
}

#[tokio::test]
async fn test_liked_skills_rank_similar_candidate_first() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());

    let c = ProfileBuilder::new("c")
        .skills(&["rust", "backend", "distributed", "systems"])
        .role("CTO")
        .build();
    let d = ProfileBuilder::new("d")
        .skills(&["rust", "backend", "distributed", "systems"])
        .role("CTO")
        .build();
    let e = ProfileBuilder::new("e")
        .skills(&["fashion", "retail", "branding"])
        .role("CMO")
        .build();

    let ranked = engine
        .recommend(DEFAULT_USER_ID, &caller_profile(), vec![e, d], &[liked(c)], 3)
        .await
        .unwrap();

    assert_eq!(ids_of(&ranked), vec!["d".to_string(), "e".to_string()]);
    assert!(ranked[0].score > ranked[1].score);

    let weights = engine.field_weights(DEFAULT_USER_ID).await.unwrap();
    assert!(weights.validate().is_ok());
    assert!((weights.sum() - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_mixed_history_keeps_weights_in_bounds() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());

    let history: Vec<_> = (0..20)
        .map(|i| {
            let profile = ProfileBuilder::new(&format!("h{i}"))
                .skills(&["rust"])
                .startup_idea(&format!("idea number {i}"))
                .build();
            if i % 3 == 0 { disliked(profile) } else { liked(profile) }
        })
        .collect();

    for _ in 0..5 {
        engine
            .recommend(
                DEFAULT_USER_ID,
                &caller_profile(),
                create_candidates(&["x", "y"]),
                &history,
                3,
            )
            .await
            .unwrap();
    }

    let weights = engine.field_weights(DEFAULT_USER_ID).await.unwrap();
    for (field, w) in weights.iter() {
        assert!(
            (cofound::MIN_FIELD_WEIGHT - 1e-5..=cofound::MAX_FIELD_WEIGHT + 1e-5).contains(&w),
            "{field} weight {w} out of bounds"
        );
    }
    assert!((weights.sum() - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_repeat_swipes_grow_cache_by_at_most_one() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());
    let before = engine.swiped_ids(DEFAULT_USER_ID).await.unwrap().len();

    for _ in 0..5 {
        engine.record_swipe(DEFAULT_USER_ID, "t").await.unwrap();
    }

    let history = vec![
        liked(ProfileBuilder::new("t").build()),
        liked(ProfileBuilder::new("t").build()),
    ];
    engine
        .recommend(
            DEFAULT_USER_ID,
            &caller_profile(),
            create_candidates(&["a"]),
            &history,
            3,
        )
        .await
        .unwrap();

    let after = engine.swiped_ids(DEFAULT_USER_ID).await.unwrap();
    assert_eq!(after.len(), before + 1);
    assert!(after.contains(&UserId::parse("t").unwrap()));
}

#[tokio::test]
async fn test_concurrent_requests_same_user() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());
    let me = caller_profile();

    let histories: Vec<Vec<_>> = (0..6)
        .map(|i| vec![liked(ProfileBuilder::new(&format!("seen{i}")).skills(&["go"]).build())])
        .collect();

    let requests = histories.iter().map(|history| {
        engine.recommend(
            DEFAULT_USER_ID,
            &me,
            create_candidates(&["a", "b", "c"]),
            history,
            3,
        )
    });

    let results = join_all(requests).await;
    assert!(results.iter().all(|r| r.as_ref().is_ok_and(|ranked| ranked.len() == 3)));

    let swiped = engine.swiped_ids(DEFAULT_USER_ID).await.unwrap();
    assert_eq!(swiped.len(), 6);
    assert!(engine.field_weights(DEFAULT_USER_ID).await.unwrap().validate().is_ok());
}

#[tokio::test]
async fn test_concurrent_requests_different_users() {
    let dir = TempDir::new().unwrap();
    let engine = open_file_engine(dir.path());
    let me = caller_profile();

    let users: Vec<String> = (0..8).map(|i| format!("user-{i}")).collect();
    let requests = users.iter().map(|user| {
        let engine = &engine;
        let me = &me;
        async move {
            engine.record_swipe(user, "shared").await.unwrap();
            engine
                .recommend(user, me, create_candidates(&["shared", "other"]), &[], 3)
                .await
        }
    });

    for ranked in join_all(requests).await {
        assert_eq!(ids_of(&ranked.unwrap()), vec!["other".to_string()]);
    }
}
