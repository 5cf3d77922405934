use clap::Parser;

#[cfg(feature = "pdf")]
use trialbal::cli::export;
use trialbal::cli::{self, Cli, Commands, ReportCommands};
use trialbal::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            data_dir,
            company,
            period,
        } => cli::init::run(data_dir, company, period),
        Commands::Parse { file, json } => cli::parse::run(&file, json),
        Commands::Import { file } => cli::import::run(&file),
        Commands::Cleanup { file, output } => cli::cleanup::run(&file, output),
        Commands::Report { command } => match command {
            ReportCommands::Pnl => cli::report::pnl(),
            ReportCommands::Balance => cli::report::balance(),
            ReportCommands::Ratios => cli::report::ratios(),
        },
        #[cfg(feature = "pdf")]
        Commands::Export { command } => export::dispatch(command).map(|_| ()),
        Commands::Sample { output } => cli::sample::run(&output),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
