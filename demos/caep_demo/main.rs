//! # caep demo application
//!
//! A sample CLI tool that shows how to wire [caep](https://docs.rs/caep) into
//! a program's entry point. It exists to manually verify source precedence.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example caep_demo -- --str-arg hello
//! STR_ARG=hello cargo run --example caep_demo -- config list
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature              | How to exercise it                                                        |
//! |----------------------|---------------------------------------------------------------------------|
//! | Declared defaults    | `cargo run --example caep_demo -- --str-arg x`                            |
//! | Missing required     | `cargo run --example caep_demo` (prints report, exits 1)                  |
//! | Env var              | `NUMBER=4 ENABLED=yes cargo run --example caep_demo -- --str-arg x`       |
//! | Config file          | `cargo run --example caep_demo -- --config demo.ini`                      |
//! | Config env var       | `CAEP_DEMO_CONFIG=demo.ini cargo run --example caep_demo`                 |
//! | Escaped lists        | `cargo run --example caep_demo -- --str-arg x --strlist 'a\,b,c'`         |
//! | `config gen`         | `cargo run --example caep_demo -- config gen`                             |
//! | `config get`         | `cargo run --example caep_demo -- config get number`                      |
//! | `config list`        | `STR_ARG=x cargo run --example caep_demo -- config list`                   |
//! | Debug logging        | `RUST_LOG=caep=debug cargo run --example caep_demo -- --str-arg x`        |

mod config;

use std::ffi::OsString;

use caep::{Caep, CaepBuilder, ConfigArgs, SearchPath};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

/// `config` subcommands. Values come from the environment and config file.
#[derive(Parser, Debug)]
#[command(name = "caep-demo config")]
struct ConfigCli {
    #[command(flatten)]
    config: ConfigArgs,
}

fn make_builder() -> CaepBuilder<DemoConfig> {
    Caep::builder()
        .config_id("caep_demo")
        .description("caep demo: resolves settings from flags, env and INI")
        .search_paths(vec![
            SearchPath::Path("/etc".into()),
            SearchPath::Platform,
            SearchPath::Cwd,
        ])
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args_os().skip(1).peekable();
    if args.peek().is_some_and(|a| a == "config") {
        let cli = ConfigCli::parse_from(args);
        let builder = make_builder().opts(Vec::<OsString>::new());
        builder
            .handle_and_print(&cli.config.into_action())
            .unwrap_or_else(|e| {
                eprintln!("Config error:\n{e}");
                std::process::exit(1);
            });
        return;
    }

    let config = make_builder().load().unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });
    println!("{config:#?}");
}
