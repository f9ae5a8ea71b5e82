use super::*;
use serde_json::json;

#[test]
fn test_user_id_parse_trims() {
    let id = UserId::parse("  abc123 ").unwrap();
    assert_eq!(id.as_str(), "abc123");
}

#[test]
fn test_user_id_blank_is_none() {
    assert!(UserId::parse("").is_none());
    assert!(UserId::parse("   ").is_none());
}

#[test]
fn test_user_id_representations_collapse() {
    let from_string = UserId::from_value(&json!("42")).unwrap();
    let from_int = UserId::from_value(&json!(42)).unwrap();
    let from_padded = UserId::from_value(&json!(" 42 ")).unwrap();

    assert_eq!(from_string, from_int);
    assert_eq!(from_string, from_padded);
}

#[test]
fn test_user_id_object_id_document() {
    let id = UserId::from_value(&json!({"$oid": "64f1c0ffee0000000000beef"})).unwrap();
    assert_eq!(id.as_str(), "64f1c0ffee0000000000beef");
}

#[test]
fn test_user_id_unsupported_forms() {
    assert!(UserId::from_value(&json!(null)).is_none());
    assert!(UserId::from_value(&json!(true)).is_none());
    assert!(UserId::from_value(&json!(["a"])).is_none());
    assert!(UserId::from_value(&json!({"id": "a"})).is_none());
}

#[test]
fn test_user_id_serde() {
    let id: UserId = serde_json::from_value(json!(7)).unwrap();
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("7"));

    let err = serde_json::from_value::<UserId>(json!("  "));
    assert!(err.is_err());
}

#[test]
fn test_profile_full_document() {
    let profile = Profile::from_value(json!({
        "id": "u1",
        "name": "Ada",
        "skills": ["Rust", "Distributed Systems"],
        "startupIdea": "Developer tooling for data pipelines",
        "role": "CTO",
        "location": {"city": "Austin", "state": "TX"},
        "experience": [{"title": "Staff Engineer", "description": "Storage"}],
        "education": [{"degree": "BS CS", "school": "UT"}],
        "projects": [{"name": "kv", "description": "LSM store"}],
        "bio": [{"name": "Speaker", "description": "RustConf"}],
        "looking_for": "Business co-founder",
        "avatar_url": "https://example.com/a.png"
    }));

    assert_eq!(profile.id().map(UserId::as_str), Some("u1"));
    assert_eq!(profile.name(), Some("Ada"));
    assert_eq!(profile.skills(), ["Rust", "Distributed Systems"]);
    assert_eq!(
        profile.startup_idea(),
        Some("Developer tooling for data pipelines")
    );
    assert_eq!(profile.role(), Some("CTO"));
    assert_eq!(profile.location().map(Location::text).as_deref(), Some("Austin, TX"));
    assert_eq!(profile.experience().text(), "Staff Engineer Storage");
    assert_eq!(profile.education().text(), "BS CS UT");
    assert_eq!(profile.projects().text(), "kv LSM store");
    assert_eq!(profile.bio().text(), "Speaker RustConf");
    assert_eq!(profile.looking_for(), Some("Business co-founder"));
}

#[test]
fn test_profile_round_trips_unchanged() {
    let raw = json!({
        "_id": {"$oid": "abc"},
        "full_name": "Grace",
        "custom": {"nested": [1, 2, 3]},
        "skills": "not a list"
    });

    let profile: Profile = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
    assert_eq!(profile.id().map(UserId::as_str), Some("abc"));
    assert_eq!(profile.name(), Some("Grace"));
}

#[test]
fn test_profile_id_lookup_order() {
    let profile = Profile::from_value(json!({
        "userId": "fourth",
        "user_id": "third",
        "_id": "second",
        "id": "first"
    }));
    assert_eq!(profile.id().map(UserId::as_str), Some("first"));

    let profile = Profile::from_value(json!({"id": "  ", "user_id": 9}));
    assert_eq!(profile.id().map(UserId::as_str), Some("9"));
}

#[test]
fn test_profile_key_aliases() {
    let profile = Profile::from_value(json!({
        "startup_idea": "Climate fintech",
        "accomplishments": [{"name": "YC", "description": "W21"}],
        "what I'm looking for": "Technical partner"
    }));

    assert_eq!(profile.startup_idea(), Some("Climate fintech"));
    assert_eq!(profile.bio().text(), "YC W21");
    assert_eq!(profile.looking_for(), Some("Technical partner"));

    let profile = Profile::from_value(json!({"what_im_looking_for": "Designer"}));
    assert_eq!(profile.looking_for(), Some("Designer"));
}

#[test]
fn test_profile_bio_preferred_over_accomplishments() {
    let profile = Profile::from_value(json!({
        "bio": [{"name": "bio", "description": "wins"}],
        "accomplishments": [{"name": "legacy", "description": "loses"}]
    }));
    assert_eq!(profile.bio().text(), "bio wins");
}

#[test]
fn test_profile_malformed_lists_degrade_to_text() {
    let profile = Profile::from_value(json!({
        "skills": {"primary": "Go"},
        "experience": "ten years of backend work",
        "education": [{"degree": "MBA"}, "self-taught"],
        "projects": 12
    }));

    assert_eq!(profile.skills(), [r#"{"primary":"Go"}"#]);
    assert_eq!(profile.experience().text(), "ten years of backend work");
    assert_eq!(
        profile.education().text(),
        r#"[{"degree":"MBA"},"self-taught"]"#
    );
    assert_eq!(profile.projects().text(), "12");
}

#[test]
fn test_profile_entry_missing_fields_default_empty() {
    let profile = Profile::from_value(json!({
        "experience": [{"title": "Founder"}, {"description": 3}]
    }));
    assert_eq!(profile.experience().text(), "Founder   3");
}

#[test]
fn test_profile_location_text_and_partial_place() {
    let profile = Profile::from_value(json!({"location": "Remote"}));
    assert_eq!(profile.location().map(Location::text).as_deref(), Some("Remote"));

    let profile = Profile::from_value(json!({"location": {"city": "Berlin"}}));
    assert_eq!(profile.location().map(Location::text).as_deref(), Some("Berlin, "));

    let profile = Profile::from_value(json!({"location": null}));
    assert!(profile.location().is_none());
}

#[test]
fn test_profile_non_object_is_empty() {
    let profile = Profile::from_value(json!("just a string"));
    assert!(profile.id().is_none());
    assert!(profile.skills().is_empty());
    assert_eq!(profile.as_value(), &json!("just a string"));
}

#[test]
fn test_swipe_decision_from_int() {
    assert_eq!(SwipeDecision::from(0), SwipeDecision::Dislike);
    assert_eq!(SwipeDecision::from(1), SwipeDecision::Like);
    assert_eq!(SwipeDecision::from(2), SwipeDecision::Superlike);
    assert_eq!(SwipeDecision::from(7), SwipeDecision::Dislike);
    assert_eq!(SwipeDecision::from(-1), SwipeDecision::Dislike);
}

#[test]
fn test_swipe_decision_lenient_deserialize() {
    let decode = |raw: serde_json::Value| serde_json::from_value::<SwipeDecision>(raw).unwrap();

    assert_eq!(decode(json!(1)), SwipeDecision::Like);
    assert_eq!(decode(json!(2.0)), SwipeDecision::Superlike);
    assert_eq!(decode(json!(1.0)), SwipeDecision::Like);
    assert_eq!(decode(json!(1.5)), SwipeDecision::Dislike);
    assert_eq!(decode(json!("1")), SwipeDecision::Dislike);
    assert_eq!(decode(json!(null)), SwipeDecision::Dislike);
    assert_eq!(decode(json!({"v": 1})), SwipeDecision::Dislike);
    assert_eq!(decode(json!(u64::MAX)), SwipeDecision::Dislike);

    let event: SwipeEvent =
        serde_json::from_value(json!({"target_id": "a", "decision": "2"})).unwrap();
    assert_eq!(event.decision, SwipeDecision::Dislike);
}

#[test]
fn test_profile_is_empty() {
    assert!(Profile::from_value(json!({})).is_empty());
    assert!(Profile::from_value(json!(null)).is_empty());
    assert!(Profile::from_value(json!("text")).is_empty());
    assert!(Profile::default().is_empty());
    assert!(!Profile::from_value(json!({"name": ""})).is_empty());
}

#[test]
fn test_swipe_decision_weights() {
    assert_eq!(SwipeDecision::Like.signed_weight(), 1.0);
    assert_eq!(SwipeDecision::Superlike.signed_weight(), 2.0);
    assert_eq!(SwipeDecision::Dislike.signed_weight(), -0.5);
    assert!(SwipeDecision::Superlike.is_positive());
    assert!(!SwipeDecision::Dislike.is_positive());
}

#[test]
fn test_swipe_event_deserialize() {
    let event: SwipeEvent = serde_json::from_value(json!({
        "target_user_id": 17,
        "profile": {"id": "17", "skills": ["sales"]},
        "decision": 2,
        "timestamp": "2024-03-01T12:00:00Z"
    }))
    .unwrap();

    assert_eq!(event.target_id.as_ref().map(UserId::as_str), Some("17"));
    assert_eq!(event.decision, SwipeDecision::Superlike);
    assert!(event.timestamp.is_some());
}

#[test]
fn test_swipe_event_defaults_and_target_fallback() {
    let event: SwipeEvent = serde_json::from_value(json!({
        "profile": {"_id": "p-9"}
    }))
    .unwrap();

    assert!(event.target_id.is_none());
    assert_eq!(event.decision, SwipeDecision::Dislike);
    assert_eq!(event.target_key().map(UserId::as_str), Some("p-9"));

    let event: SwipeEvent = serde_json::from_value(json!({"target_id": "  "})).unwrap();
    assert!(event.target_key().is_none());
}

#[test]
fn test_swipe_record_serde() {
    let record = SwipeRecord::now(
        UserId::parse("a").unwrap(),
        UserId::parse("b").unwrap(),
        SwipeDecision::Like,
    );
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["decision"], json!(1));

    let back: SwipeRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}
