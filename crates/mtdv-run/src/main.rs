use clap::Parser;

fn main() -> miette::Result<()> {
    let cli = mtdv_run::Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    log::debug!("cli: {cli:?}");

    cli.run()
}
