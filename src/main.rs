use clap::Parser;
use covid_recon::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(covid_recon::Error::processing_interrupted(
                    "Import interrupted by user",
                ))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("covid_recon - COVID-19 place reconciliation");
    println!("===========================================");
    println!();
    println!("Merge the Johns Hopkins CSSE daily reports with population and");
    println!("intervention tables into one time series per place.");
    println!();
    println!("USAGE:");
    println!("    covid_recon <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Download, reconcile and write the snapshot (main command)");
    println!("    places      List the places in a saved snapshot");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Import everything up to today:");
    println!("    covid_recon import");
    println!();
    println!("    # Import March 2020 and also write the legacy CSV files:");
    println!("    covid_recon import --start 2020-03-01 --last 2020-03-31 --csv-dir ./csv");
    println!();
    println!("    # Ten places with the most confirmed cases:");
    println!("    covid_recon places --top 10");
    println!();
    println!("For detailed help on any command, use:");
    println!("    covid_recon <COMMAND> --help");
}
