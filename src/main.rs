use clap::Parser;
use itemvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => itemvault::cli::commands::list::execute(&cli),
        Commands::Show { ref id, reveal } => {
            itemvault::cli::commands::show::execute(&cli, id, reveal)
        }
        Commands::Edit { ref id } => itemvault::cli::commands::edit::execute(&cli, id),
        Commands::Delete { ref id, force } => {
            itemvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Attach { ref id, ref file } => {
            itemvault::cli::commands::attach::execute(&cli, id, file)
        }
        Commands::Generate { length } => itemvault::cli::commands::generate::execute(length),
        Commands::Completions { shell } => itemvault::cli::commands::completions::execute(shell),
        Commands::Audit {
            last,
            ref since,
            ref item,
        } => itemvault::cli::commands::audit_cmd::execute(
            &cli,
            last,
            since.as_deref(),
            item.as_deref(),
        ),
    };

    if let Err(e) = result {
        itemvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
