use std::io::{self, Read};

use clap::Parser;
use wmbus_rs::{init_logger, log_info, log_warn, Config};

#[derive(Parser)]
#[command(name = "wmbus-cli")]
#[command(about = "Decode a wireless M-Bus telegram from a hex string")]
struct Cli {
    /// Hex-encoded telegram bytes. Reads from stdin if omitted.
    telegram: Option<String>,

    /// Use the built-in demo key table instead of an empty one
    #[arg(long)]
    demo_keys: bool,
}

fn main() {
    init_logger();

    let cli = Cli::parse();
    let config = if cli.demo_keys {
        Config::with_demo_keys()
    } else {
        Config::default()
    };

    let telegram = match cli.telegram {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut buf) {
                eprintln!("failed to read telegram from stdin: {err}");
                std::process::exit(1);
            }
            buf
        }
    };

    match wmbus_rs::interpret_hex(telegram.trim(), &config) {
        Ok(output) => {
            log_info(&format!(
                "decoded telegram: manufacturer={}, serial={}",
                output.manufacturer, output.serial
            ));
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(err) => log_warn(&format!("failed to serialize output: {err}")),
            }
        }
        Err(err) => {
            eprintln!("failed to decode telegram: {err}");
            std::process::exit(1);
        }
    }
}
