use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A person running the tool against a local checkout.
    LocalDev,
    /// Continuous integration, where stdout reports are the only console output wanted.
    Ci,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should be disabled.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Ci)
    }
}

/// Derive the active execution context from the `CI` environment variable.
pub fn detect_context() -> ExecutionContext {
    if ci_enabled() {
        ExecutionContext::Ci
    } else {
        ExecutionContext::LocalDev
    }
}

fn ci_enabled() -> bool {
    env::var("CI")
        .map(|value| {
            let value = value.trim();
            !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
        })
        .unwrap_or(false)
}
