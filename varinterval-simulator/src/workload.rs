//! Synthetic announce workload.
//!
//! A seeded population of torrents and peers. The same seed always yields the
//! same request list, so a simulation run can be replayed bit for bit.

use std::net::{Ipv4Addr, SocketAddr};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use varinterval_core::bittorrent::{AnnounceEvent, AnnounceRequest, InfoHash, Peer, PeerId};

/// Peers per torrent in the generated swarm population.
const PEERS_PER_TORRENT: usize = 8;

/// Generates `count` announce requests from `seed`.
///
/// Requests are spread over `count / 8` torrents (at least one); every request
/// carries its own random peer id.
pub fn generate_requests(seed: u64, count: usize) -> Vec<AnnounceRequest> {
    let mut rng = StdRng::seed_from_u64(seed);

    let torrents: Vec<InfoHash> = (0..(count / PEERS_PER_TORRENT).max(1))
        .map(|_| {
            let mut bytes = [0u8; 20];
            rng.fill(&mut bytes);
            InfoHash(bytes)
        })
        .collect();

    (0..count)
        .map(|_| {
            let info_hash = torrents[rng.random_range(0..torrents.len())];
            let mut peer_id = [0u8; 20];
            rng.fill(&mut peer_id);
            let ip = Ipv4Addr::from(rng.random::<u32>());
            let port = rng.random_range(1024..=u16::MAX);
            let left = if rng.random_bool(0.3) {
                0
            } else {
                rng.random_range(1..1 << 32)
            };
            let event = match rng.random_range(0..10) {
                0 => AnnounceEvent::Started,
                1 => AnnounceEvent::Completed,
                2 => AnnounceEvent::Stopped,
                _ => AnnounceEvent::None,
            };

            AnnounceRequest {
                info_hash,
                peer: Peer {
                    id: PeerId(peer_id),
                    addr: SocketAddr::from((ip, port)),
                },
                event,
                uploaded: rng.random_range(0..1 << 34),
                downloaded: rng.random_range(0..1 << 34),
                left,
                num_want: 50,
                compact: true,
            }
        })
        .collect()
}
