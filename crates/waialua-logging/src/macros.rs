//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging adapters and sinks."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Level-specific macros that stamp every event with the mission context.

/// Shared expansion for the level-specific macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __node_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            node = ctx.node.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with mission context.
#[macro_export]
macro_rules! node_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with mission context.
#[macro_export]
macro_rules! node_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with mission context.
#[macro_export]
macro_rules! node_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__node_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}
