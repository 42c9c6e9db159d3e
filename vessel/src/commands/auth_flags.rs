//! Credential flags reused by the registry commands.
//!
//! The sets bind straight into the authenticator's option types; a command
//! lifts them onto its own options and composes them with its local flags.

use crate::cli::FlagSet;
use clap::Arg;
use libvessel::auth::{LoginOptions, LogoutOptions};

fn authfile() -> Arg {
    Arg::new("authfile")
        .long("authfile")
        .value_name("PATH")
        .env("REGISTRY_AUTH_FILE")
        .help("Path of the authentication file")
}

/// `--authfile`, `--cert-dir`, `--username`, `--password`, `--password-stdin`
pub fn login_flags() -> FlagSet<LoginOptions> {
    FlagSet::<LoginOptions>::new()
        .path_flag(authfile(), |o| &mut o.auth_file)
        .path_flag(
            Arg::new("cert-dir")
                .long("cert-dir")
                .value_name("DIR")
                .help("Use certificates at the specified path to access the registry"),
            |o| &mut o.cert_dir,
        )
        .string_flag(
            Arg::new("username")
                .long("username")
                .short('u')
                .value_name("USERNAME")
                .help("Username for registry"),
            |o| &mut o.username,
        )
        .string_flag(
            Arg::new("password")
                .long("password")
                .short('p')
                .value_name("PASSWORD")
                .help("Password for registry"),
            |o| &mut o.password,
        )
        .bool_flag(
            Arg::new("password-stdin")
                .long("password-stdin")
                .help("Take the password from stdin"),
            |o| &mut o.password_stdin,
        )
}

/// `--authfile`, `--all`
pub fn logout_flags() -> FlagSet<LogoutOptions> {
    FlagSet::<LogoutOptions>::new()
        .path_flag(authfile(), |o| &mut o.auth_file)
        .bool_flag(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Remove the cached credentials for all registries in the auth file"),
            |o| &mut o.all,
        )
}
