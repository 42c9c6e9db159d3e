use super::*;

fn scan(argv: &[&str]) -> GlobalFlags {
    scan_with(argv, &[])
}

fn scan_with(argv: &[&str], value_flags: &[&str]) -> GlobalFlags {
    let value_flags: HashSet<String> = value_flags.iter().map(|f| f.to_string()).collect();
    GlobalFlags::scan(
        std::iter::once("vessel").chain(argv.iter().copied()),
        &value_flags,
    )
}

#[test]
fn test_no_globals() {
    assert_eq!(scan(&["images"]), GlobalFlags::default());
}

#[test]
fn test_remote_forms() {
    assert_eq!(scan(&["--remote", "images"]).remote, Some(true));
    assert_eq!(scan(&["-r", "images"]).remote, Some(true));
    assert_eq!(scan(&["--remote=false", "images"]).remote, Some(false));
    assert_eq!(scan(&["images", "--remote=true"]).remote, Some(true));
}

#[test]
fn test_value_flags() {
    let flags = scan(&[
        "--url",
        "http://engine:8080",
        "--config=/etc/vessel.toml",
        "--color",
        "never",
        "images",
    ]);
    assert_eq!(flags.url.as_deref(), Some("http://engine:8080"));
    assert_eq!(flags.config, Some(PathBuf::from("/etc/vessel.toml")));
    assert_eq!(flags.color.as_deref(), Some("never"));
}

#[test]
fn test_verbose_counts() {
    assert_eq!(scan(&["-v", "images"]).verbose, 1);
    assert_eq!(scan(&["-vvv", "images"]).verbose, 3);
    assert_eq!(scan(&["--verbose", "-vv", "images"]).verbose, 3);
}

#[test]
fn test_scan_stops_at_double_dash() {
    let flags = scan(&["login", "--", "--remote"]);
    assert_eq!(flags.remote, None);
}

#[test]
fn test_other_short_flags_are_ignored() {
    let flags = scan(&["image", "list", "-a", "-q"]);
    assert_eq!(flags, GlobalFlags::default());
}

#[test]
fn test_command_flag_values_are_skipped() {
    let value_flags = ["-p", "--password"];

    let flags = scan_with(&["login", "-p", "--remote", "quay.io"], &value_flags);
    assert_eq!(flags.remote, None);

    let flags = scan_with(&["login", "--password", "-v", "quay.io"], &value_flags);
    assert_eq!(flags.verbose, 0);

    let flags = scan_with(&["login", "--password=x", "--remote", "quay.io"], &value_flags);
    assert_eq!(flags.remote, Some(true));
}

#[test]
fn test_globals_after_command_flag_values() {
    let flags = scan_with(
        &["login", "-u", "alice", "--remote=true", "quay.io"],
        &["-u", "--username"],
    );
    assert_eq!(flags.remote, Some(true));
}
