//! ## varinterval-core::bittorrent
//! **Tracker exchange types**
//!
//! Request/response pairs for the three exchange kinds a tracker serves:
//! announce, scrape and admin queries. Only the fields the hooks read or
//! write are modelled; encoding belongs to the transport layer.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 20-byte torrent info hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InfoHash(pub [u8; 20]);

impl InfoHash {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for InfoHash {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// 20-byte peer id chosen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub [u8; 20]);

impl PeerId {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for PeerId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A swarm member as seen by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub id: PeerId,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnounceEvent {
    #[default]
    None,
    Started,
    Stopped,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceRequest {
    pub info_hash: InfoHash,
    pub peer: Peer,
    pub event: AnnounceEvent,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub num_want: u32,
    pub compact: bool,
}

/// Tracker answer to an announce.
///
/// `interval` is how long the client should wait before announcing again;
/// `min_interval` is the stricter lower bound some clients also honour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceResponse {
    pub interval: Duration,
    pub min_interval: Duration,
    pub complete: u32,
    pub incomplete: u32,
    pub ipv4_peers: Vec<Peer>,
    pub ipv6_peers: Vec<Peer>,
}

impl AnnounceResponse {
    pub fn with_intervals(interval: Duration, min_interval: Duration) -> Self {
        Self {
            interval,
            min_interval,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub info_hashes: Vec<InfoHash>,
}

/// Swarm statistics for one torrent in a scrape answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scrape {
    pub info_hash: InfoHash,
    pub complete: u32,
    pub incomplete: u32,
    pub snatches: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub files: Vec<Scrape>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRequest {
    pub info_hash: InfoHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub info_hash: InfoHash,
    pub seeders: u32,
    pub leechers: u32,
}
