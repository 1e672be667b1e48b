//! Logging abstraction layer.
//!
//! The router never talks to a logger directly; it goes through these macros,
//! which forward to either [`log`](https://docs.rs/log) or
//! [`tracing`](https://docs.rs/tracing) depending on the enabled feature.
//! Enable at most one of the two.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Level conventions used throughout the crate:
//!
//! - `trace_log!`: resolution decisions and per-step details.
//! - `debug_log!`: redirects, skipped and superseded navigations.
//! - `info_log!`: navigation start and completion.
//! - `warn_log!`: duplicate routes, failed history writes.
//! - `error_log!`: disposal, load, subscriber and fatal failures.
//!
//! ```ignore
//! use spa_navigator::{debug_log, error_log};
//!
//! debug_log!("Redirecting from '{}' to '{}'", from, to);
//! error_log!("Failed to load view for '{}': {}", path, err);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __navigator_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Emit a **trace**-level message through the active backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level message through the active backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(debug, $($arg)*)
    };
}

/// Emit an **info**-level message through the active backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(info, $($arg)*)
    };
}

/// Emit a **warn**-level message through the active backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(warn, $($arg)*)
    };
}

/// Emit an **error**-level message through the active backend.
///
/// Used for every failure the router absorbs instead of returning: view
/// disposal, view loading, subscriber callbacks and the hard-error surface.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(error, $($arg)*)
    };
}
