//! Runtime surface for CLI flows
//!
//! CLI-adjacent flows report through [`Runtime`] instead of printing or
//! exiting directly, so they can be driven by tests.

mod credentials;


pub use credentials::{
    add_credential, AuthMethod, AuthProviderOption, NewCredential, PromptResult, Prompter,
};

/// Output and process control available to a flow
pub trait Runtime {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
    fn exit(&self, code: i32);
}

/// Runtime that writes to stdout/stderr and mirrors messages to tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRuntime;

impl Runtime for TracingRuntime {
    fn log(&self, message: &str) {
        tracing::info!(%message, "runtime log");
        println!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(%message, "runtime error");
        eprintln!("{message}");
    }

    fn exit(&self, code: i32) {
        tracing::info!(code, "Exiting");
        std::process::exit(code);
    }
}
