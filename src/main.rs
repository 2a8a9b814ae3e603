use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

mod commands;

/// wharf - dependency resolution for version-controlled package remotes
#[derive(Parser)]
#[command(name = "wharf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve wharf.toml's dependencies and write wharf.lock
    Resolve {
        /// Project directory (defaults to the current directory)
        path: Option<String>,

        /// Print each candidate version as the engine tries it
        #[arg(long)]
        verbose: bool,

        /// Resolve against a JSON fixture instead of git remotes
        #[arg(long)]
        fixture: Option<String>,
    },

    /// Print the resolved dependency tree
    Tree {
        path: Option<String>,

        #[arg(long)]
        fixture: Option<String>,
    },

    /// Explain why a package is in the resolved set
    Why {
        /// Package identifier
        package: String,

        path: Option<String>,

        #[arg(long)]
        fixture: Option<String>,
    },

    /// Run a JSON test fixture and report whether the result matches
    Fixture {
        /// Path to a fixture JSON file
        path: String,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            path,
            verbose,
            fixture,
        } => commands::resolve::run(path, verbose, fixture),
        Commands::Tree { path, fixture } => commands::tree::run(path, fixture),
        Commands::Why {
            package,
            path,
            fixture,
        } => commands::why::run(package, path, fixture),
        Commands::Fixture { path } => commands::fixture::run(path),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "wharf", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
