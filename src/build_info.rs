//! Build stamp
//!
//! `build.rs` bumps `build_number.txt` and passes the number and a UTC
//! timestamp in as `MACROTALLY_BUILD_*` env vars. They show up in the
//! `-v` banner and in the `build` object of every JSON report.

use serde::Serialize;

/// Value of `build_number.txt` when this binary was compiled; 0 outside cargo
pub const BUILD_NUMBER: u64 = match option_env!("MACROTALLY_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

pub const BUILD_TIMESTAMP: &str = match option_env!("MACROTALLY_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

// `str::parse` is not const
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Which macrotally build produced a report
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// Same text as `--version`, e.g. `0.1.0 (build 42, 2026-10-19T08:00:00Z)`
    pub fn version_line(&self) -> String {
        format!(
            "{} (build {}, {})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Shown on stderr with `-v`, before any lookup runs
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("macrotally {}", info.version_line());
    eprintln!("FoodData Central macronutrient tally");
}
