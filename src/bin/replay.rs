//! chatgate-replay - offline driver for recorded gateway traffic
//!
//! ```text
//! chatgate-replay events [--track RUN_ID] [FILE]   replay chat events (JSON lines)
//! chatgate-replay sanitize [FILE]                  sanitize a tool parameter schema
//! chatgate-replay convert [FILE]                   convert a message array to Gemini contents
//! ```
//!
//! Input is read from FILE or stdin.

use chatgate::chat::{handle_chat_event, ChatEventOutcome, ChatState};
use chatgate::llm::{convert_messages, sanitize_schema, Context, Message};
use chatgate::runtime::{Runtime, TracingRuntime};
use chatgate::{ChatEventPayload, ClientConfig};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let config = ClientConfig::from_env();
    init_tracing(&config);

    let runtime = TracingRuntime;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.split_first() {
        Some((command, rest)) if command == "events" => replay_events(&config, rest, &runtime),
        Some((command, rest)) if command == "sanitize" => sanitize(rest, &runtime),
        Some((command, rest)) if command == "convert" => convert(&config, rest, &runtime),
        _ => Err("usage: chatgate-replay <events|sanitize|convert> [FILE]".to_string()),
    };

    if let Err(message) = result {
        runtime.error(&message);
        runtime.exit(2);
    }
}

fn init_tracing(config: &ClientConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chatgate=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays machine-readable
    if config.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_input(path: Option<&String>) -> Result<String, String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}")),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(input)
        }
    }
}

fn replay_events(
    config: &ClientConfig,
    args: &[String],
    runtime: &dyn Runtime,
) -> Result<(), String> {
    let mut state = ChatState::new(config.session_key.clone());
    let mut path = None;
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--track" {
            let run_id = args.next().ok_or("--track needs a run id")?;
            state.chat_run_id = Some(run_id.clone());
            state.chat_stream = Some(String::new());
            state.chat_stream_started_at = Some(chrono::Utc::now().timestamp_millis());
        } else {
            path = Some(arg);
        }
    }

    let input = read_input(path)?;
    for (line_no, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let payload: ChatEventPayload = serde_json::from_str(line)
            .map_err(|e| format!("line {}: invalid chat event: {e}", line_no + 1))?;

        let outcome = handle_chat_event(&mut state, Some(&payload));
        let token = outcome.as_token().unwrap_or("ignored");
        if let ChatEventOutcome::Final {
            message: Some(message),
            ..
        } = outcome
        {
            state.chat_messages.push(message);
        }

        runtime.log(&format!(
            "{token} run={} tracked={} stream={:?}",
            payload.run_id,
            state.chat_run_id.as_deref().unwrap_or("-"),
            state.chat_stream.as_deref().unwrap_or_default(),
        ));
    }

    runtime.log(&format!(
        "messages={} last_error={}",
        state.chat_messages.len(),
        state.last_error.as_deref().unwrap_or("-")
    ));
    Ok(())
}

fn sanitize(args: &[String], runtime: &dyn Runtime) -> Result<(), String> {
    let input = read_input(args.first())?;
    let schema: serde_json::Value =
        serde_json::from_str(&input).map_err(|e| format!("invalid schema JSON: {e}"))?;
    let output = serde_json::to_string_pretty(&sanitize_schema(&schema))
        .map_err(|e| format!("failed to encode schema: {e}"))?;
    runtime.log(&output);
    Ok(())
}

fn convert(config: &ClientConfig, args: &[String], runtime: &dyn Runtime) -> Result<(), String> {
    let input = read_input(args.first())?;
    let messages: Vec<Message> =
        serde_json::from_str(&input).map_err(|e| format!("invalid message array: {e}"))?;
    let contents = convert_messages(&config.model(), &Context::new(messages));
    let output = serde_json::to_string_pretty(&contents)
        .map_err(|e| format!("failed to encode contents: {e}"))?;
    runtime.log(&output);
    Ok(())
}
