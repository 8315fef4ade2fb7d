//! `sprig` binary entry point.

use clap::Parser;
use miette::Result;
use sprig_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let config = args.config.as_deref();
    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args, config).await,
        cli::Command::Start(start_args) => commands::start_execute(start_args, config).await,
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args, config).await,
        cli::Command::New(new_args) => commands::new_execute(new_args, config).await,
    };

    result.map_err(error::cli_error_to_miette)
}
