//! Startup banner and URL display

use super::config::StoreBackend;
use super::constants::APP_NAME;

/// Use localhost for display when binding to all interfaces
fn display_host(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" | "[::]" => "localhost",
        _ => host,
    }
}

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, store: StoreBackend, rows: Option<usize>) {
    let base = format!("http://{}:{}", display_host(host), port);

    // Label width: "Incidents:" plus padding for alignment
    const W: usize = 12;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/api/incidents",
        "Incidents:", base
    );
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/api/metrics",
        "Metrics:", base
    );
    println!(
        "  \x1b[35m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/api/docs",
        "Docs:", base
    );

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    }

    match rows {
        Some(n) => println!("  \x1b[90m➜  {:<W$} {} ({} incidents)\x1b[0m", "Store:", store, n),
        None => println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Store:", store),
    }
    println!();
}
