use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use sea_orm::ConnectOptions;
use tracing::info;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub midtrans_server_key: String,
    pub midtrans_is_production: bool,

    pub mail_relay_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_sender: Option<String>,

    pub frontend_url: String,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: load_database_opt().into(),
        jwt_key: load_jwt_key(),
        midtrans_server_key: load_midtrans_server_key(),
        midtrans_is_production: load_midtrans_is_production(),
        mail_relay_url: load_optional("MAIL_RELAY_URL"),
        mail_api_key: load_optional("MAIL_API_KEY"),
        mail_sender: load_optional("MAIL_SENDER"),
        frontend_url: load_frontend_url(),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn load_database_opt() -> impl Into<ConnectOptions> {
    info!("Loading environment `DATABASE_URL`");

    let var = env::var("DATABASE_URL").expect("Environment `DATABASE_URL` is required to be set");

    var
}

fn load_jwt_key() -> String {
    info!("Loading environment `JWT_SECRET`");

    let var = env::var("JWT_SECRET").expect("Environment `JWT_SECRET` is required to be set");

    var
}

fn load_midtrans_server_key() -> String {
    info!("Loading environment `MIDTRANS_SERVER_KEY`");

    let var = env::var("MIDTRANS_SERVER_KEY").expect("Environment `MIDTRANS_SERVER_KEY` is required to be set");

    var
}

fn load_midtrans_is_production() -> bool {
    info!("Loading environment `MIDTRANS_IS_PRODUCTION`");

    env::var("MIDTRANS_IS_PRODUCTION").map(|var| var == "true").unwrap_or(false)
}

fn load_frontend_url() -> String {
    info!("Loading environment `FRONTEND_URL`");

    env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string())
}

fn load_optional(name: &str) -> Option<String> {
    info!("Loading environment `{name}`");

    env::var(name).ok().filter(|var| !var.is_empty())
}
