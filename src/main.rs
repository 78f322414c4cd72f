use anyhow::Result;
use clap::Parser;
use studioplan::cli::{Cli, Commands};
use studioplan::commands::{self, ReportConfig};
use studioplan::observability;

fn main() -> Result<()> {
    observability::install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            data,
            period,
            client,
            brand,
            collaborator,
            status,
            priority,
            content_type,
            section,
            format,
            output,
            config,
            now,
            no_color,
            verbosity,
        } => {
            observability::init_tracing(verbosity);
            commands::handle_report(ReportConfig {
                data,
                period,
                client,
                brand,
                collaborator,
                status,
                priority,
                content_type,
                section,
                format,
                output,
                config,
                now,
                no_color,
            })
        }
        Commands::Init { force } => {
            observability::init_tracing(0);
            commands::init_config(force)
        }
    }
}
