// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by every crate in the site workspace.
//!
//! Output goes to stderr through `emit_term`. The level comes from the
//! `SITE_LOG` environment variable:
//! - `SITE_LOG=off` (default) - no logs
//! - `SITE_LOG=info` - commits, loads, inbox changes
//! - `SITE_LOG=debug` - per-attempt detail, version tokens, request URLs
//!
//! Crates pull the macros in with `use diagnostics::*;` and log with named
//! properties: `info!("committed {attempts} attempts", attempts: n)`.

use std::str::FromStr;
use std::sync::Once;

// Re-export emit so the macros resolve in downstream crates
pub use emit;

/// Environment variable consulted by [`init_diagnostics`].
pub const LOG_ENV: &str = "SITE_LOG";

static INIT: Once = Once::new();

/// Minimum level that reaches the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn min_level(self) -> Option<emit::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(emit::Level::Error),
            LogLevel::Warn => Some(emit::Level::Warn),
            LogLevel::Info => Some(emit::Level::Info),
            LogLevel::Debug => Some(emit::Level::Debug),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize logging from `SITE_LOG`.
///
/// Call once at startup; repeated calls (and calls after
/// [`init_with_level`]) are ignored.
pub fn init_diagnostics() {
    match std::env::var(LOG_ENV) {
        Err(_) => init_with_level(LogLevel::Off),
        Ok(value) => match value.parse::<LogLevel>() {
            Ok(level) => init_with_level(level),
            Err(reason) => {
                init_with_level(LogLevel::Info);
                emit::warn!("ignoring {var}: {reason}, using info", var: LOG_ENV);
            }
        },
    }
}

/// Initialize logging at an explicit level, e.g. from a `--verbose` flag.
pub fn init_with_level(level: LogLevel) {
    INIT.call_once(|| {
        let Some(min) = level.min_level() else {
            return;
        };
        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();
        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Routine operations: loads, commits, lead submissions.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Step-by-step detail: attempts, tokens, request URLs.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable trouble: retries, fallbacks, missing optional config.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures surfaced to the user.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" warn ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert!("chatty".parse::<LogLevel>().is_err());
    }

    #[test]
    fn init_is_idempotent() {
        init_with_level(LogLevel::Off);
        init_diagnostics();
        init_with_level(LogLevel::Debug);
    }

    #[test]
    fn macros_accept_named_properties() {
        info!("committed {attempts} attempts", attempts: 2);
        debug!("version {sha}", sha: "abc123");
        warn!("retrying");
        error!("failed {reason}", reason: "offline");
    }
}
