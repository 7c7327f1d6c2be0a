//! Simple logging module with macros.
//!
//! Messages go to stderr so they never mix with a program trace on stdout.
//! `REGVM_LOG` (`info`, `warn`, `error`, `off`) sets the minimum level and
//! `REGVM_LOG_TIMESTAMP=0` hides timestamps; see [`init_from_env`].

use std::env;
use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Log level for filtering messages.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    /// Parses a level name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }

    /// Colour used for the whole line at this level.
    fn color_spec(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Level::Info => {}
            Level::Warn => {
                spec.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Level::Error => {
                spec.set_fg(Some(Color::Red)).set_bold(true);
            }
        }
        spec
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => f.pad("INFO"),
            Level::Warn => f.pad("WARN"),
            Level::Error => f.pad("ERROR"),
        }
    }
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: u64) -> (u32, u32, u32) {
    // Algorithm based on Howard Hinnant's date algorithms
    let z = days as i64 + 719468;
    let era = z.div_euclid(146097);
    let doe = z.rem_euclid(146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as u32, m, d)
}

pub static SHOW_TIMESTAMP: AtomicBool = AtomicBool::new(true);
pub static SHOW_TYPE: AtomicBool = AtomicBool::new(true);

/// Messages below this level are dropped. Above `Error` silences everything.
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
const LEVEL_OFF: u8 = Level::Error as u8 + 1;

pub const LOG_LEVEL_ENV: &str = "REGVM_LOG";
pub const LOG_TIMESTAMP_ENV: &str = "REGVM_LOG_TIMESTAMP";

/// Sets the minimum level that gets written.
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Drops every message.
pub fn disable() {
    MIN_LEVEL.store(LEVEL_OFF, Ordering::Relaxed);
}

pub fn enabled(level: Level) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Applies `REGVM_LOG` and `REGVM_LOG_TIMESTAMP`.
///
/// Unknown level names are ignored.
pub fn init_from_env() {
    if let Ok(value) = env::var(LOG_LEVEL_ENV) {
        if value.trim().eq_ignore_ascii_case("off") {
            disable();
        } else if let Some(level) = Level::parse(&value) {
            set_min_level(level);
        }
    }
    if let Ok(value) = env::var(LOG_TIMESTAMP_ENV) {
        let value = value.trim();
        let show = !(value == "0" || value.eq_ignore_ascii_case("false"));
        SHOW_TIMESTAMP.store(show, Ordering::Relaxed);
    }
}

/// Renders `YYYY-MM-DD HH:MM:SS.mmm` (UTC) for a duration since the Unix epoch.
fn format_timestamp(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs();
    let (year, month, day) = days_to_date(secs / 86400);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}.{:03}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        since_epoch.subsec_millis()
    )
}

/// Builds the line prefix according to `SHOW_TIMESTAMP` and `SHOW_TYPE`.
fn prefix(level: Level, since_epoch: Duration) -> String {
    let mut out = String::new();
    if SHOW_TIMESTAMP.load(Ordering::Relaxed) {
        out.push_str(&format_timestamp(since_epoch));
        out.push(' ');
    }
    if SHOW_TYPE.load(Ordering::Relaxed) {
        out.push_str(&format!("[{level:5}] "));
    }
    out
}

/// Internal logging function. Use the `info!`, `warn!`, or `error!` macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(&level.color_spec());
    let _ = writeln!(stderr, "{}{message}", prefix(level, since_epoch));
    let _ = stderr.reset();
}

/// Logs at the given [`Level`] variant; shared by `info!`, `warn!` and `error!`.
///
/// Compiled out of test builds.
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:ident, $($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::$level, &format!($($arg)*));
        }
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_at!(Info, $($arg)*) };
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_at!(Warn, $($arg)*) };
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_at!(Error, $($arg)*) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn level_display() {
        assert_eq!(format!("{}", Level::Info), "INFO");
        assert_eq!(format!("{}", Level::Warn), "WARN");
        assert_eq!(format!("{}", Level::Error), "ERROR");
        assert_eq!(format!("[{:5}]", Level::Info), "[INFO ]");
    }

    #[test]
    fn level_parse() {
        assert_eq!(Level::parse("INFO"), Some(Level::Info));
        assert_eq!(Level::parse(" warning "), Some(Level::Warn));
        assert_eq!(Level::parse("error"), Some(Level::Error));
        assert_eq!(Level::parse("debug"), None);
    }

    #[test]
    fn min_level_filters() {
        set_min_level(Level::Warn);
        assert!(!enabled(Level::Info));
        assert!(enabled(Level::Warn));
        assert!(enabled(Level::Error));
        disable();
        assert!(!enabled(Level::Error));
        set_min_level(Level::Info);
        assert!(enabled(Level::Info));
    }

    #[test]
    fn timestamp_format() {
        // 2024-02-29 13:05:09.042 UTC
        let since_epoch = Duration::from_millis((19782 * 86400 + 13 * 3600 + 5 * 60 + 9) * 1000 + 42);
        assert_eq!(format_timestamp(since_epoch), "2024-02-29 13:05:09.042");
        assert_eq!(format_timestamp(Duration::ZERO), "1970-01-01 00:00:00.000");
    }

    #[test]
    fn level_colors() {
        assert_eq!(Level::Info.color_spec(), ColorSpec::new());
        assert_eq!(Level::Error.color_spec().fg(), Some(&Color::Red));
        assert!(Level::Warn.color_spec().bold());
    }

    #[test]
    fn days_to_date_epoch() {
        // Unix epoch is January 1, 1970
        let (year, month, day) = days_to_date(0);
        assert_eq!(year, 1970);
        assert_eq!(month, 1);
        assert_eq!(day, 1);
    }

    #[test]
    fn days_to_date_known_date() {
        // 2024-01-01 is 19723 days after epoch
        let (year, month, day) = days_to_date(19723);
        assert_eq!(year, 2024);
        assert_eq!(month, 1);
        assert_eq!(day, 1);
    }

    #[test]
    fn days_to_date_leap_year() {
        // 2024-02-29 (leap day) is 19782 days after epoch
        let (year, month, day) = days_to_date(19782);
        assert_eq!(year, 2024);
        assert_eq!(month, 2);
        assert_eq!(day, 29);
    }
}
