//! stupidwm :: a stupidly simple tiling window manager
//!
//! There is no runtime configuration: colors, the bar font and the binding
//! table are compiled in. Change `config.rs` / `bindings.rs` and rebuild.
use std::process;
use stupidwm::{
    bindings::default_bindings,
    spawn::{install_sigchld_reaper, DetachedSpawner},
    xlib::XlibConn,
    Config, Result, WindowManager,
};
use tracing_subscriber::{self, prelude::*};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .finish()
        .init();

    // any error that escapes the event loop is fatal
    if let Err(e) = run() {
        println!("stupid: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    install_sigchld_reaper()?;

    let config = Config::default();
    let conn = XlibConn::connect(&config.font)?;
    let spawner = DetachedSpawner::new(Some(conn.connection_fd()));

    let mut wm = WindowManager::new(conn, config, default_bindings(), Box::new(spawner))?;

    wm.run()
}
