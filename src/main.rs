use std::io::{self, IsTerminal};

use artfind::app::{run_find, run_highlight};
use artfind::cli::{Cli, Commands};
use artfind::config::build_config;
use artfind::highlight::HighlightStyle;
use artfind::logging;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log = logging::init(cli.verbose);
    let app_config = build_config(&cli);
    log.set_verbose(app_config.verbose);

    tracing::debug!(config = ?app_config, "effective config");

    let stdout = io::stdout();
    let is_tty = stdout.is_terminal();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Find(ref args) => run_find(args, &app_config, &mut out),
        Commands::Highlight(ref args) => {
            let style = if is_tty {
                HighlightStyle::for_tty(&app_config.theme)
            } else {
                HighlightStyle::for_pipe()
            };
            run_highlight(args, &app_config, style, &mut out).await
        }
    };

    if let Err(e) = result {
        eprintln!("artfind: {}", e);
        std::process::exit(1);
    }
}
