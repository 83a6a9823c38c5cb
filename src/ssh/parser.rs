// ABOUTME: Record parser turning one known_hosts line into name, address, key type and key blob
// ABOUTME: Key material is carried verbatim and never validated

use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid input string: expected 3 fields, found {fields}")]
    InvalidFormat { fields: usize },

    #[error("invalid input string: no host name or address")]
    EmptyIdentifier,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostRecord {
    pub name: String,
    pub address: String,
    pub key_type: String,
    pub public_key: String,
}

impl HostRecord {
    /// Parses `[name][,address] keytype publickey`, fields separated by
    /// single spaces.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(' ').collect();
        let [identifier, key_type, public_key] = fields.as_slice() else {
            return Err(ParseError::InvalidFormat {
                fields: fields.len(),
            });
        };

        let (name, address) = split_identifier(identifier)?;

        Ok(Self {
            name,
            address,
            key_type: key_type.to_string(),
            public_key: public_key.to_string(),
        })
    }

    /// `name, address`, or whichever of the two is present.
    pub fn display_name(&self) -> String {
        match (self.name.is_empty(), self.address.is_empty()) {
            (false, false) => format!("{}, {}", self.name, self.address),
            (false, true) => self.name.clone(),
            _ => self.address.clone(),
        }
    }
}

fn split_identifier(identifier: &str) -> Result<(String, String), ParseError> {
    let parts: Vec<&str> = identifier.split(',').collect();

    let (name, address) = match parts.as_slice() {
        [single] if single.parse::<IpAddr>().is_ok() => (String::new(), single.to_string()),
        [single] => (single.to_string(), String::new()),
        // The second part is taken as the address without checking it.
        [name, address] => (name.to_string(), address.to_string()),
        _ => return Err(ParseError::EmptyIdentifier),
    };

    if name.is_empty() && address.is_empty() {
        return Err(ParseError::EmptyIdentifier);
    }

    Ok((name, address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let record = HostRecord::parse("github.com rsa key1").unwrap();

        assert_eq!(record.name, "github.com");
        assert_eq!(record.address, "");
        assert_eq!(record.key_type, "rsa");
        assert_eq!(record.public_key, "key1");
    }

    #[test]
    fn test_parse_ipv4_only() {
        let record = HostRecord::parse("192.168.1.1 rsa key1").unwrap();

        assert_eq!(record.name, "");
        assert_eq!(record.address, "192.168.1.1");
    }

    #[test]
    fn test_parse_ipv6_only() {
        let record = HostRecord::parse("2001:db8::1 ssh-ed25519 AAAAC3Nza").unwrap();

        assert_eq!(record.name, "");
        assert_eq!(record.address, "2001:db8::1");
        assert_eq!(record.key_type, "ssh-ed25519");
    }

    #[test]
    fn test_parse_name_and_address() {
        let record = HostRecord::parse("myserver,192.168.1.1 ssh-rsa AAAAB3Nza").unwrap();

        assert_eq!(record.name, "myserver");
        assert_eq!(record.address, "192.168.1.1");
    }

    #[test]
    fn test_second_part_is_not_validated_as_ip() {
        let record = HostRecord::parse("myserver,alias.local ssh-rsa k").unwrap();

        assert_eq!(record.name, "myserver");
        assert_eq!(record.address, "alias.local");
    }

    #[test]
    fn test_bracketed_port_is_a_name() {
        let record = HostRecord::parse("[example.com]:2222 ssh-rsa k").unwrap();

        assert_eq!(record.name, "[example.com]:2222");
        assert!(record.address.is_empty());
    }

    #[test]
    fn test_too_many_comma_parts_is_rejected() {
        assert_eq!(
            HostRecord::parse("a,b,c,1.2.3.4 rsa key"),
            Err(ParseError::EmptyIdentifier)
        );
    }

    #[test]
    fn test_bare_comma_is_rejected() {
        assert_eq!(
            HostRecord::parse(", rsa key"),
            Err(ParseError::EmptyIdentifier)
        );
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(
            HostRecord::parse("rsa key"),
            Err(ParseError::InvalidFormat { fields: 2 })
        );
        assert_eq!(
            HostRecord::parse("host rsa key comment"),
            Err(ParseError::InvalidFormat { fields: 4 })
        );
        assert_eq!(
            HostRecord::parse("invalid-host"),
            Err(ParseError::InvalidFormat { fields: 1 })
        );
    }

    #[test]
    fn test_double_space_counts_as_extra_field() {
        assert!(HostRecord::parse("host  rsa key").is_err());
    }

    #[test]
    fn test_display_name() {
        let both = HostRecord::parse("myserver,192.168.1.1 rsa k").unwrap();
        let name = HostRecord::parse("github.com rsa k").unwrap();
        let address = HostRecord::parse("10.0.0.1 rsa k").unwrap();

        assert_eq!(both.display_name(), "myserver, 192.168.1.1");
        assert_eq!(name.display_name(), "github.com");
        assert_eq!(address.display_name(), "10.0.0.1");
    }
}
