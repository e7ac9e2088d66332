use clap::Parser;
use pwvault::cli::commands::{add::AddArgs, edit::EditArgs, show::Selector};
use pwvault::cli::{Cli, Commands};
use pwvault::password::PasswordOptions;

fn main() {
    // Logs go to stderr so they never mix with passwords printed on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PWVAULT_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => pwvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref title,
            ref username,
            ref password,
            generate,
            ref url,
            ref notes,
        } => pwvault::cli::commands::add::execute(
            &cli,
            AddArgs {
                title,
                username: username.as_deref(),
                password: password.as_deref(),
                generate,
                url: url.as_deref(),
                notes: notes.as_deref(),
            },
        ),
        Commands::List => pwvault::cli::commands::list::execute(&cli),
        Commands::Search { ref query } => pwvault::cli::commands::search::execute(&cli, query),
        Commands::Show {
            ref id,
            ref title,
            copy,
        } => {
            let selector = match (id, title) {
                (Some(id), _) => Selector::Id(id),
                (None, Some(title)) => Selector::Title(title),
                // clap enforces one of the two.
                (None, None) => Selector::Title(""),
            };
            pwvault::cli::commands::show::execute(&cli, selector, copy)
        }
        Commands::Edit {
            ref id,
            ref title,
            ref username,
            ref password,
            generate,
            ref url,
            ref notes,
        } => pwvault::cli::commands::edit::execute(
            &cli,
            EditArgs {
                id,
                title: title.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                generate,
                url: url.as_deref(),
                notes: notes.as_deref(),
            },
        ),
        Commands::Delete { ref id, force } => {
            pwvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Passwd => pwvault::cli::commands::passwd::execute(&cli),
        Commands::Generate {
            length,
            no_upper,
            no_lower,
            no_digits,
            no_symbols,
            exclude_similar,
            exclude_ambiguous,
        } => pwvault::cli::commands::generate::execute(
            length,
            PasswordOptions {
                length: 0,
                include_upper: !no_upper,
                include_lower: !no_lower,
                include_digits: !no_digits,
                include_symbols: !no_symbols,
                exclude_similar,
                exclude_ambiguous,
            },
        ),
        Commands::Strength { ref password } => {
            pwvault::cli::commands::strength::execute(password.as_deref())
        }
        Commands::Completions { shell } => pwvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        pwvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
