//! Integration tests for TokenLimitStrategy.

use ctxedit_context::{EditDefaults, TokenCounter, TokenLimitStrategy, build_strategy};
use ctxedit_types::{
    EditStrategy, Message, Part, Role, StrategyConfig, Tokenizer, TokenizerError,
};
use serde_json::json;

struct FailingTokenizer;

impl Tokenizer for FailingTokenizer {
    fn count_tokens(&self, _text: &str) -> Result<usize, TokenizerError> {
        Err(TokenizerError::Encoding("boom".into()))
    }

    fn count_message_tokens(&self, _message: &Message) -> Result<usize, TokenizerError> {
        Err(TokenizerError::Encoding("boom".into()))
    }
}

/// 40 chars → 10 tokens + 4 overhead = 14 tokens.
fn text_msg(id: &str) -> Message {
    Message::user(id, format!("{id:<40}"))
}

fn call_msg(id: &str, call_id: &str) -> Message {
    Message::new(id, Role::Assistant, vec![Part::tool_call(call_id, "search", json!({}))])
}

fn result_msg(id: &str, call_id: &str) -> Message {
    Message::new(id, Role::User, vec![Part::tool_result(call_id, format!("{call_id:<40}"))])
}

fn ids(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

fn total(messages: &[Message]) -> usize {
    TokenCounter::new().estimate_messages(messages)
}

#[test]
fn scenario_drops_exactly_the_oldest_message() {
    let counter = TokenCounter::new();
    let messages = vec![
        Message::user("m0", "the very first message in this conversation"),
        Message::assistant("m1", "second"),
        Message::user("m2", "third message"),
        Message::assistant("m3", "fourth and last"),
    ];
    let limit = total(&messages) - counter.estimate_message(&messages[0]);
    let config = StrategyConfig::new("token_limit", json!({"limit_tokens": limit}));
    let strategy = build_strategy(&config, &EditDefaults::default()).unwrap();

    let result = strategy.apply(messages.clone(), &counter).unwrap();

    assert_eq!(result, messages[1..].to_vec());
}

#[test]
fn under_limit_is_a_no_op() {
    let messages = vec![text_msg("a"), text_msg("b"), text_msg("c")];
    let strategy = TokenLimitStrategy::new(total(&messages)).unwrap();
    let result = strategy.apply(messages.clone(), &TokenCounter::new()).unwrap();
    assert_eq!(result, messages);
}

#[test]
fn dropping_a_call_cascades_to_its_later_result() {
    let messages = vec![
        text_msg("m0"),
        call_msg("m1", "c1"),
        text_msg("m2"),
        result_msg("m3", "c1"),
        text_msg("m4"),
    ];
    // 63 tokens: removing m0 leaves 49, removing m1 (and m3 with it) leaves 28.
    assert_eq!(total(&messages), 63);
    let strategy = TokenLimitStrategy::new(40).unwrap();

    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();

    assert_eq!(ids(&result), vec!["m2", "m4"]);
    assert!(total(&result) <= 40);
}

#[test]
fn dropping_a_result_takes_its_call_along() {
    // A result stored ahead of its call still pairs with it.
    let messages =
        vec![result_msg("m0", "c9"), text_msg("m1"), call_msg("m2", "c9"), text_msg("m3")];
    let strategy = TokenLimitStrategy::new(30).unwrap();

    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();

    assert_eq!(ids(&result), vec!["m1", "m3"]);
}

#[test]
fn orphaned_results_get_no_protection() {
    let messages = vec![result_msg("m0", "ghost"), text_msg("m1"), text_msg("m2")];
    let strategy = TokenLimitStrategy::new(28).unwrap();
    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();
    assert_eq!(ids(&result), vec!["m1", "m2"]);
}

#[test]
fn oversized_final_message_is_kept_whole() {
    let big = Message::user("big", "x".repeat(400));
    let messages = vec![text_msg("m0"), big.clone()];
    let strategy = TokenLimitStrategy::new(50).unwrap();

    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();

    assert_eq!(result, vec![big]);
}

#[test]
fn newest_result_goes_with_its_dropped_call() {
    // The newest message is never picked directly, but it is a result whose
    // call must go to meet the budget, so the cascade takes it too.
    let result_text = "r".repeat(200);
    let messages = vec![
        call_msg("m0", "c1"),
        Message::new("m1", Role::User, vec![Part::tool_result("c1", &result_text)]),
    ];
    let strategy = TokenLimitStrategy::new(1).unwrap();

    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();

    assert!(result.is_empty());
}

#[test]
fn survivors_keep_relative_order() {
    let messages: Vec<Message> = (0..8).map(|i| text_msg(&format!("m{i}"))).collect();
    let strategy = TokenLimitStrategy::new(14 * 3).unwrap();
    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();
    assert_eq!(ids(&result), vec!["m5", "m6", "m7"]);
}

#[test]
fn multiple_calls_in_one_message_cascade_to_every_result() {
    let messages = vec![
        Message::new(
            "calls",
            Role::Assistant,
            vec![Part::tool_call("a", "t", json!({})), Part::tool_call("b", "t", json!({}))],
        ),
        text_msg("m1"),
        result_msg("ra", "a"),
        result_msg("rb", "b"),
        text_msg("m4"),
    ];
    let strategy = TokenLimitStrategy::new(40).unwrap();
    let result = strategy.apply(messages, &TokenCounter::new()).unwrap();
    assert_eq!(ids(&result), vec!["m1", "m4"]);
}

#[test]
fn limit_must_be_positive() {
    for limit in [json!(0), json!(-10), json!(0.0)] {
        let config = StrategyConfig::new("token_limit", json!({"limit_tokens": limit}));
        let err = build_strategy(&config, &EditDefaults::default()).unwrap_err();
        assert!(err.is_configuration(), "{limit} should be rejected");
    }
}

#[test]
fn limit_is_required() {
    let err = build_strategy(&StrategyConfig::bare("token_limit"), &EditDefaults::default())
        .unwrap_err();
    assert!(err.to_string().contains("limit_tokens is required"));
}

#[test]
fn tokenizer_failure_is_wrapped_and_propagated() {
    let strategy = TokenLimitStrategy::new(10).unwrap();
    let err = strategy.apply(vec![text_msg("m0")], &FailingTokenizer).unwrap_err();
    assert!(!err.is_configuration());
    assert!(err.to_string().contains("token_limit"));
    assert!(err.to_string().contains("boom"));
}
