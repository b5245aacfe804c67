//! Example: edit a tool-heavy conversation down to a token budget.
//!
//! Run with: `RUST_LOG=debug cargo run --example edit_pipeline -p ctxedit-context`

use ctxedit_context::{ContextEditor, TokenCounter};
use ctxedit_types::{EditRequest, Message, Part, Role};
use tracing_subscriber::EnvFilter;

fn tool_exchange(n: usize, path: &str, output: &str) -> [Message; 2] {
    let call_id = format!("call-{n}");
    [
        Message::new(
            format!("a{n}"),
            Role::Assistant,
            vec![Part::tool_call(&call_id, "read_file", serde_json::json!({"path": path}))],
        ),
        Message::new(format!("r{n}"), Role::User, vec![Part::tool_result(&call_id, output)]),
    ]
}

fn describe(message: &Message) -> String {
    message
        .parts
        .iter()
        .map(|part| match part {
            Part::Text { text } => text.clone(),
            Part::ToolCall { name, arguments, .. } => format!("{name}({arguments})"),
            Part::ToolResult { text, .. } => format!("=> {}", text.lines().next().unwrap_or("")),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // 1. Build a conversation with several large tool results
    let mut messages = vec![
        Message::system("s0", "You are a helpful coding assistant."),
        Message::user("u0", "Why does the build fail on the CI runner?"),
    ];
    let listing = "pub fn handler() -> Result<()> {\n    todo!()\n}\n".repeat(40);
    messages.extend(tool_exchange(1, "src/lib.rs", &listing));
    messages.extend(tool_exchange(2, "src/main.rs", &listing));
    messages.extend(tool_exchange(3, "Cargo.toml", "[package]\nname = \"demo\"\n"));
    messages.push(Message::assistant("a4", "The handler in src/lib.rs is unimplemented."));
    messages.push(Message::user("u5", "Can you fix it?"));

    // 2. Decode the request the way a service would receive it
    let request: EditRequest = serde_json::from_str(
        r#"{
            "strategies": [
                {"type": "token_limit", "params": {"limit_tokens": 400}},
                {"type": "remove_tool_result", "params": {"keep_recent_n_tool_results": 1}}
            ],
            "pin_at_message_id": "a4"
        }"#,
    )?;

    // 3. Edit and show before/after
    let counter = TokenCounter::new();
    let before = counter.estimate_messages(&messages);
    let result = ContextEditor::new().edit_request(messages, &request)?;
    let after = counter.estimate_messages(&result.messages);

    println!("Tokens: {before} -> {after}");
    println!("Stable up to: {}", result.edit_boundary_message_id);
    for msg in &result.messages {
        let role = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        };
        println!("  [{}] [{role}] {}", msg.id, preview(&describe(msg), 60));
    }
    Ok(())
}
