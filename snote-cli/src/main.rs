use std::process;

use snote_cli::cli::Cli;
use snote_cli::error::handle_cli_result;
use snote_cli::logging;

fn main() {
    let cli = Cli::parse_args();

    let level = logging::log_level(
        cli.quiet,
        cli.debug,
        cli.verbose,
        logging::debug_env_enabled(),
    );

    let exit_code = tracing::subscriber::with_default(logging::subscriber(level), || {
        tracing::debug!("snote {} starting", snote::VERSION);
        handle_cli_result(snote_cli::note::run(&cli))
    });

    process::exit(exit_code);
}
