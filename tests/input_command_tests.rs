use std::path::PathBuf;

use golden_zone_scanner::input::{parse_args, Command};

#[test]
fn defaults_to_scan() {
    let args = parse_args(Vec::<String>::new()).unwrap();
    assert_eq!(args.command, Command::Scan);
    assert!(!args.json);
    assert_eq!(args.config_path, PathBuf::from("config/default.toml"));
}

#[test]
fn parses_detail_with_flags() {
    let args = parse_args(["detail", "ethusdt", "--json", "--config", "alt.toml"]).unwrap();
    assert_eq!(args.command, Command::Detail("ETHUSDT".to_string()));
    assert!(args.json);
    assert_eq!(args.config_path, PathBuf::from("alt.toml"));
}

#[test]
fn flags_may_precede_the_command() {
    let args = parse_args(["--json", "scan"]).unwrap();
    assert_eq!(args.command, Command::Scan);
    assert!(args.json);
}

#[test]
fn rejects_bad_input() {
    assert!(parse_args(["detail"]).is_err());
    assert!(parse_args(["detail", "--json"]).is_err());
    assert!(parse_args(["--config"]).is_err());
    assert!(parse_args(["scan", "extra"]).is_err());
    assert!(parse_args(["bogus"]).is_err());
}
