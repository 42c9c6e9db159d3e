//! Early scan of the global flags.
//!
//! The engine mode decides which commands exist, so it has to be known
//! before the command tree is built and clap can parse anything. This scan
//! picks the global flags out of raw argv; the full parse later accepts the
//! same flags again.
//!
//! Values of command flags (`login -p --remote`) are skipped when the caller
//! names the flags that take them; an unknown flag is treated as a switch.

use libvessel::engine::parse_switch;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub remote: Option<bool>,
    pub url: Option<String>,
    pub config: Option<PathBuf>,
    pub color: Option<String>,
    pub verbose: u8,
}

impl GlobalFlags {
    /// Scans `argv`, binary name first. Scanning stops at `--`.
    ///
    /// The word after any flag in `value_flags` is consumed unread.
    pub fn scan<I, S>(argv: I, value_flags: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let argv: Vec<String> = argv
            .into_iter()
            .skip(1)
            .map(|arg| arg.as_ref().to_string())
            .collect();

        let mut flags = Self::default();
        let mut rest = argv.iter();

        while let Some(arg) = rest.next() {
            let (name, inline) = match arg.split_once('=') {
                Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };

            match name {
                "--" => break,
                "--remote" | "-r" => {
                    flags.remote = match inline {
                        Some(value) => parse_switch(&value).or(flags.remote),
                        None => Some(true),
                    };
                }
                "--url" => flags.url = inline.or_else(|| rest.next().cloned()),
                "--config" => {
                    flags.config = inline.or_else(|| rest.next().cloned()).map(PathBuf::from)
                }
                "--color" => flags.color = inline.or_else(|| rest.next().cloned()),
                "--verbose" => flags.verbose = flags.verbose.saturating_add(1),
                short if is_verbose_cluster(short) => {
                    let count = u8::try_from(short.len() - 1).unwrap_or(u8::MAX);
                    flags.verbose = flags.verbose.saturating_add(count);
                }
                other if inline.is_none() && value_flags.contains(other) => {
                    rest.next();
                }
                _ => {}
            }
        }

        flags
    }
}

/// `-v`, `-vv`, `-vvv`, ...
fn is_verbose_cluster(arg: &str) -> bool {
    arg.len() > 1
        && arg.starts_with('-')
        && !arg.starts_with("--")
        && arg[1..].chars().all(|c| c == 'v')
}

#[cfg(test)]
#[path = "globals_tests.rs"]
mod tests;
