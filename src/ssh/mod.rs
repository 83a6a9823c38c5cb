// ABOUTME: known_hosts file handling: raw line storage and per-line record parsing
// ABOUTME: The rest of the crate works on the ordered line sequence these produce

pub mod parser;
pub mod store;

pub use parser::{HostRecord, ParseError};
pub use store::{KnownHostsFile, StoreError};
