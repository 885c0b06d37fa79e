//! Diagnostic error types for taxotrace.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Path queries themselves
//! never error: unknown nodes, disconnected graphs, and empty fact stores
//! all resolve to a not-found result. Errors only arise at the edges —
//! symbol allocation, registry bookkeeping, and configuration.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the taxotrace engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TraceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Symbol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SymbolError {
    #[error("symbol allocator exhausted: cannot allocate more than u64::MAX symbols")]
    #[diagnostic(
        code(taxotrace::symbol::exhausted),
        help(
            "The symbol ID space is exhausted. This is extremely unlikely \
             in practice (requires 2^64 allocations). If you see this error, \
             something is very wrong — check for ID allocation loops."
        )
    )]
    AllocatorExhausted,

    #[error("duplicate label \"{label}\" (already registered as symbol {existing_id})")]
    #[diagnostic(
        code(taxotrace::symbol::duplicate_label),
        help(
            "Every label maps to exactly one symbol. Use the engine's \
             `resolve_or_create_*` methods instead of registering the same \
             label twice."
        )
    )]
    DuplicateLabel { label: String, existing_id: u64 },

    #[error("unknown symbol: \"{name}\"")]
    #[diagnostic(
        code(taxotrace::symbol::unknown),
        help(
            "No symbol with this label or numeric ID is registered. \
             Labels are matched exactly (no case folding). \
             List known symbols with `taxotrace export symbols`."
        )
    )]
    UnknownSymbol { name: String },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(taxotrace::engine::invalid_config),
        help("Check the FinderConfig fields. {message}")
    )]
    InvalidConfig { message: String },
}

/// Convenience alias for functions returning taxotrace results.
pub type TraceResult<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_error_converts_to_trace_error() {
        let err = SymbolError::UnknownSymbol {
            name: "Mermaid".into(),
        };
        let trace: TraceError = err.into();
        assert!(matches!(
            trace,
            TraceError::Symbol(SymbolError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn engine_error_converts_to_trace_error() {
        let err = EngineError::InvalidConfig {
            message: "empty relation label".into(),
        };
        let trace: TraceError = err.into();
        assert!(matches!(trace, TraceError::Engine(_)));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = SymbolError::DuplicateLabel {
            label: "Тигр".into(),
            existing_id: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Тигр"));
        assert!(msg.contains('7'));
    }
}
