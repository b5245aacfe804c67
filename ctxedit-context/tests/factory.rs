//! Integration tests for strategy construction and sequencing.

use ctxedit_context::{
    EditDefaults, Strategy, StrategyKind, StrategyTier, build_strategy, sequence_configs, tier_of,
};
use ctxedit_types::{EditError, EditStrategy, StrategyConfig};
use serde_json::json;

#[test]
fn every_kind_round_trips_through_its_name() {
    for kind in StrategyKind::ALL {
        assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn unknown_type_names_the_type() {
    let err = build_strategy(&StrategyConfig::bare("summarize"), &EditDefaults::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown strategy type: summarize");
}

#[test]
fn type_names_are_case_sensitive() {
    assert!(matches!(
        "Token_Limit".parse::<StrategyKind>(),
        Err(EditError::UnknownStrategy(_))
    ));
}

#[test]
fn builds_each_kind() {
    let defaults = EditDefaults::default();
    let cases = [
        (StrategyConfig::bare("remove_tool_result"), StrategyKind::RemoveToolResult),
        (StrategyConfig::bare("remove_tool_call_params"), StrategyKind::RemoveToolCallParams),
        (StrategyConfig::new("token_limit", json!({"limit_tokens": 10})), StrategyKind::TokenLimit),
        (
            StrategyConfig::new("middle_out", json!({"token_reduce_to": 10})),
            StrategyKind::MiddleOut,
        ),
    ];
    for (config, kind) in cases {
        let strategy = build_strategy(&config, &defaults).unwrap();
        assert_eq!(strategy.kind(), kind);
        assert_eq!(strategy.name(), kind.as_str());
    }
}

#[test]
fn typed_params_are_carried_into_the_strategy() {
    let config = StrategyConfig::new("token_limit", json!({"limit_tokens": 2048.0}));
    let Strategy::TokenLimit(strategy) = build_strategy(&config, &EditDefaults::default()).unwrap()
    else {
        panic!("expected a token_limit strategy");
    };
    assert_eq!(strategy.limit_tokens(), 2048);
}

#[test]
fn wrong_shapes_are_rejected_not_coerced() {
    let defaults = EditDefaults::default();
    let bad = [
        StrategyConfig::new("remove_tool_result", json!({"keep_tools": "read_file"})),
        StrategyConfig::new("remove_tool_result", json!({"tool_result_placeholder": ["a"]})),
        StrategyConfig::new("remove_tool_result", json!({"keep_recent_n_tool_results": 2.5})),
        StrategyConfig::new("remove_tool_call_params", json!({"gt_token": "10"})),
        StrategyConfig::new("token_limit", json!({"limit_tokens": true})),
        StrategyConfig::new("middle_out", json!("not an object")),
    ];
    for config in bad {
        let err = build_strategy(&config, &defaults).unwrap_err();
        assert!(err.is_configuration(), "{config:?}");
        assert!(err.to_string().contains(&config.kind), "{err}");
    }
}

#[test]
fn sequencer_is_stable_within_tiers() {
    let configs = vec![
        StrategyConfig::new("token_limit", json!({"limit_tokens": 1})),
        StrategyConfig::bare("custom_a"),
        StrategyConfig::bare("remove_tool_result"),
        StrategyConfig::bare("custom_b"),
        StrategyConfig::new("token_limit", json!({"limit_tokens": 2})),
        StrategyConfig::bare("remove_tool_call_params"),
    ];

    let ordered = sequence_configs(&configs);

    let kinds: Vec<&str> = ordered.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "remove_tool_result",
            "remove_tool_call_params",
            "custom_a",
            "custom_b",
            "token_limit",
            "token_limit"
        ]
    );
    assert_eq!(ordered[4].params["limit_tokens"], 1);
    assert_eq!(ordered[5].params["limit_tokens"], 2);
}

#[test]
fn tiers_are_ordered() {
    assert!(StrategyTier::Redaction < StrategyTier::Custom);
    assert!(StrategyTier::Custom < StrategyTier::Budget);
    assert_eq!(tier_of("token_limit"), StrategyTier::Budget);
}
