use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use kanban_db::DbConfig;

#[derive(Debug, Parser)]
#[command(name = "kanban-server", about = "Kanban board REST API")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "KANBAN_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "KANBAN_PORT", default_value = "2000")]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long = "db", env = "KANBAN_DB")]
    pub db_path: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            sqlite_path: self.db_path.clone(),
        }
    }
}
