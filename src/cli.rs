use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, IpVersion};

/// Key-value server speaking a minimal HTTP dialect.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ServerCli {
    /// YAML file to read settings from before applying flags.
    #[arg(short = 'c', long, env = "BEACON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short = 'v', long, env = "BEACON_VERBOSE")]
    pub verbose: bool,

    /// Host name or address to bind.
    #[arg(short = 'H', long, env = "BEACON_HOST")]
    pub host: Option<String>,

    /// Address family to bind with: IPv4 or IPv6.
    #[arg(short = 'i', long = "ip", env = "BEACON_IP")]
    pub ip_version: Option<IpVersion>,

    /// Port to listen on.
    #[arg(short = 'p', long, env = "BEACON_PORT")]
    pub port: Option<u16>,

    /// Set SO_REUSEADDR on the listening socket.
    #[arg(short = 'f', long = "force", env = "BEACON_REUSE_ADDRESS")]
    pub reuse_address: bool,

    /// Path of the key-value store file.
    #[arg(short = 'd', long, env = "BEACON_DB_LOCATION")]
    pub db_location: Option<PathBuf>,
}

impl ServerCli {
    /// Loads the config file (if any) and lays the flags over it.
    pub fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;

        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(ip_version) = self.ip_version {
            cfg.ip_version = ip_version;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(db_location) = self.db_location {
            cfg.db_location = db_location;
        }
        cfg.verbose |= self.verbose;
        cfg.reuse_address |= self.reuse_address;

        cfg.validate()?;
        Ok(cfg)
    }
}

/// Command-line client for a running beacon server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ClientCli {
    /// Base URL of the server.
    #[arg(long, env = "BEACON_SERVER", default_value = "http://localhost:8080")]
    pub server: String,

    /// Log at debug level.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List every stored pair.
    All,
    /// Fetch the value stored under a key.
    Get(KeyArgs),
    /// Store a value under a key.
    Put(PutArgs),
    /// Fetch the index page.
    Index,
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args, Debug, Clone)]
pub struct PutArgs {
    pub key: String,
    pub value: String,
}
