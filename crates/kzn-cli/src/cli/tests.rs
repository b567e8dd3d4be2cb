use super::Cli;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_uri_only() {
    let cli = Cli::try_parse_from(["kzn", "http://example.com/a.iso"]).unwrap();
    assert_eq!(cli.uri, "http://example.com/a.iso");
    assert!(cli.output.is_none());
}

#[test]
fn parses_uri_and_output() {
    let cli = Cli::try_parse_from(["kzn", "http://example.com/a.iso", "out.iso"]).unwrap();
    let request = cli.into_request();
    assert_eq!(request.uri, "http://example.com/a.iso");
    assert_eq!(request.output, Some(PathBuf::from("out.iso")));
}

#[test]
fn magnet_is_accepted_verbatim() {
    let uri = "magnet:?xt=urn:btih:0123456789abcdef&dn=x";
    let cli = Cli::try_parse_from(["kzn", uri]).unwrap();
    assert_eq!(cli.uri, uri);
}

#[test]
fn missing_uri_is_usage_error() {
    let err = Cli::try_parse_from(["kzn"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn extra_positional_is_rejected() {
    assert!(Cli::try_parse_from(["kzn", "a", "b", "c"]).is_err());
}
