//! Startup banner and URL display

use super::constants::{API_PREFIX, APP_NAME};

/// Host to show in URLs; wildcard binds are shown as localhost
fn display_host(host: &str) -> &str {
    if matches!(host, "0.0.0.0" | "::" | "[::]") {
        "localhost"
    } else {
        host
    }
}

fn base_url(host: &str, port: u16) -> String {
    format!("http://{}:{}{}", display_host(host), port, API_PREFIX)
}

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, database_path: &str) {
    let api_url = base_url(host, port);
    const W: usize = 10;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}", "API:", api_url);
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}/openapi.json",
        "OpenAPI:", api_url
    );
    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    }
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Database:", database_path);
    println!();
}
