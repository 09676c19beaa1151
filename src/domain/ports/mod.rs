mod peer_directory_port;

#[cfg(test)]
pub use peer_directory_port::MockPeerDirectory;
pub use peer_directory_port::PeerDirectory;
