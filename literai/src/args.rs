use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// LiterAI story and narration gateway
#[derive(Debug, Parser)]
#[command(name = "literai", about = "Backend for AI-written, AI-narrated short stories")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "literai.toml", env = "LITERAI_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "LITERAI_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the listen port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Listen address after applying the command-line overrides
    pub fn listen_address(&self, configured: SocketAddr) -> SocketAddr {
        let mut address = self.listen.unwrap_or(configured);
        if let Some(port) = self.port {
            address.set_port(port);
        }
        address
    }
}
