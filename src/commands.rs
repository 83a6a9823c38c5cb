// ABOUTME: Handlers for the non-interactive ls, search and rm commands
// ABOUTME: Validates host patterns and writes user-facing output to a caller-supplied writer

use anyhow::{Context, Result};
use std::io::Write;
use thiserror::Error;

use crate::matcher;
use crate::ssh::KnownHostsFile;
use crate::table;

pub const MAX_HOST_LEN: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host cannot be empty")]
    Empty,

    #[error("host cannot contain line breaks")]
    LineBreak,

    #[error("host is too long ({len} characters, at most {MAX_HOST_LEN} allowed)")]
    TooLong { len: usize },
}

pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() {
        return Err(ValidationError::Empty);
    }
    if host.contains(['\r', '\n']) {
        return Err(ValidationError::LineBreak);
    }

    let len = host.chars().count();
    if len > MAX_HOST_LEN {
        return Err(ValidationError::TooLong { len });
    }

    Ok(())
}

pub fn list_hosts(out: &mut impl Write, hosts: &[String]) -> Result<()> {
    let output = table::build(hosts);

    writeln!(out, "Current known hosts:")?;
    writeln!(out, "{}", output.table)?;
    for (line, error) in &output.skipped {
        writeln!(out, "Skipped {line:?}: {error}")?;
    }

    Ok(())
}

pub fn search_hosts(out: &mut impl Write, hosts: &[String], pattern: &str) -> Result<()> {
    validate_host(pattern)?;
    let found = matcher::search(hosts, pattern);
    tracing::debug!("{} of {} lines match {pattern:?}", found.len(), hosts.len());
    list_hosts(out, &found)
}

/// Removes every line matching `pattern` and writes the rest back. Returns
/// the number of lines removed.
pub fn delete_hosts(
    out: &mut impl Write,
    store: &KnownHostsFile,
    hosts: &[String],
    pattern: &str,
) -> Result<usize> {
    validate_host(pattern)?;
    writeln!(out, "Removing host: {pattern}")?;

    let remaining = matcher::delete(hosts, pattern);
    let removed = hosts.len() - remaining.len();

    store
        .save(&remaining)
        .context("Failed to save known_hosts")?;
    tracing::info!("Removed {removed} lines from {}", store.path().display());

    writeln!(out, "Removed {removed} entries")?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_validate_host() {
        let cases: [(&str, String, bool); 11] = [
            ("valid hostname", "github.com".into(), true),
            ("valid IP", "192.168.1.1".into(), true),
            ("valid IPv6", "2001:db8::1".into(), true),
            ("valid host with port", "example.com:22".into(), true),
            ("empty string", "".into(), false),
            ("contains newline", "github.com\n".into(), false),
            ("contains carriage return", "github.com\r".into(), false),
            ("too long", "a".repeat(1025), false),
            ("exactly 1024", "a".repeat(1024), true),
            ("contains space", "github com".into(), true),
            ("special characters", "my-server_01.example.com".into(), true),
        ];

        for (name, host, valid) in cases {
            assert_eq!(validate_host(&host).is_ok(), valid, "{name}");
        }
    }

    #[test]
    fn test_validate_host_errors() {
        assert_eq!(validate_host(""), Err(ValidationError::Empty));
        assert_eq!(validate_host("a\nb"), Err(ValidationError::LineBreak));

        let err = validate_host(&"a".repeat(1025)).unwrap_err();
        assert_eq!(err, ValidationError::TooLong { len: 1025 });
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_validate_counts_characters() {
        assert!(validate_host(&"é".repeat(1024)).is_ok());
    }

    #[test]
    fn test_list_hosts() {
        let output = output_of(|out| {
            list_hosts(
                out,
                &lines(&[
                    "github.com ssh-rsa key1",
                    "myserver,192.168.1.1 ssh-rsa key2",
                    "invalid-host",
                    "",
                ]),
            )
        });

        assert!(output.contains("Current known hosts:"));
        assert!(output.contains("github.com"));
        assert!(output.contains("myserver"));
        assert!(output.contains("192.168.1.1"));
        assert!(output.contains("Skipped \"invalid-host\""));
    }

    #[test]
    fn test_list_empty() {
        let output = output_of(|out| list_hosts(out, &[]));
        assert!(output.contains("Current known hosts:"));
    }

    #[test]
    fn test_search_hosts() {
        let hosts = lines(&["github.com ssh-rsa key1", "gitlab.com ssh-rsa key2"]);

        let output = output_of(|out| search_hosts(out, &hosts, "github"));
        assert!(output.contains("github.com"));
        assert!(!output.contains("gitlab.com"));

        let output = output_of(|out| search_hosts(out, &hosts, "git"));
        assert!(output.contains("github.com"));
        assert!(output.contains("gitlab.com"));

        let output = output_of(|out| search_hosts(out, &hosts, "bitbucket"));
        assert!(output.contains("Current known hosts:"));
        assert!(!output.contains("git"));
    }

    #[test]
    fn test_search_rejects_invalid_pattern() {
        let mut buf = Vec::new();
        assert!(search_hosts(&mut buf, &lines(&["a rsa k"]), "").is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_delete_hosts_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = KnownHostsFile::new(temp_dir.path().join("known_hosts"));
        let hosts = lines(&[
            "github.com ssh-rsa key1",
            "gitlab.com ssh-rsa key2",
            "192.168.1.1 ssh-rsa key3",
        ]);
        store.save(&hosts).unwrap();

        let mut buf = Vec::new();
        let removed = delete_hosts(&mut buf, &store, &hosts, "gitlab.com").unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert_eq!(removed, 1);
        assert!(output.contains("Removing host: gitlab.com"));
        assert_eq!(
            store.load().unwrap(),
            lines(&["github.com ssh-rsa key1", "192.168.1.1 ssh-rsa key3"])
        );
    }

    #[test]
    fn test_delete_hosts_fuzzy() {
        let temp_dir = TempDir::new().unwrap();
        let store = KnownHostsFile::new(temp_dir.path().join("known_hosts"));
        let hosts = lines(&[
            "github.com ssh-rsa key1",
            "gitlab.com ssh-rsa key2",
            "other ssh-rsa key3",
        ]);

        let removed = delete_hosts(&mut Vec::new(), &store, &hosts, "git").unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.load().unwrap(), lines(&["other ssh-rsa key3"]));
    }

    #[test]
    fn test_delete_hosts_save_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = KnownHostsFile::new(temp_dir.path().join("missing").join("known_hosts"));

        let result = delete_hosts(&mut Vec::new(), &store, &lines(&["a rsa k"]), "a");

        assert!(result.is_err());
        assert!(!temp_dir.path().join("missing").exists());
    }

    #[test]
    fn test_delete_rejects_invalid_pattern_without_saving() {
        let temp_dir = TempDir::new().unwrap();
        let store = KnownHostsFile::new(temp_dir.path().join("known_hosts"));

        assert!(delete_hosts(&mut Vec::new(), &store, &lines(&["a rsa k"]), "a\r").is_err());
        assert!(!store.exists());
    }
}
