use anyhow::Context;
use bibimamba::{
    config::{self, Config},
    controller::Session,
    creator::{self, EnvironmentCreator, Outcome},
    env_spec::EnvironmentSpec,
    gui, logging, worker, CreateError,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Generator, Shell};
use std::{io, path::PathBuf, process, sync::mpsc};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Creates a Python environment without opening the window
    Create {
        /// Installation root
        #[arg(short, long)]
        root: String,
        /// Python version, e.g. 3.10.3
        #[arg(short, long, default_value = "")]
        python: String,
        /// Directory to search for micromamba
        #[arg(long)]
        micromamba_dir: Option<PathBuf>,
    },
    /// Prints the names and paths derived for a request
    Show {
        /// Installation root
        #[arg(short, long)]
        root: PathBuf,
        /// Python version, e.g. 3.10.3
        #[arg(short, long, default_value = "")]
        python: String,
    },
    /// Lists the selectable Python versions
    Versions,
    /// Generate shell completion script
    Completion {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = config::init(Config::load(cli.config.as_deref())?)?;

    match cli.command {
        Some(Commands::Create {
            root,
            python,
            micromamba_dir,
        }) => create(config, &root, &python, micromamba_dir),
        Some(Commands::Show { root, python }) => {
            let spec =
                EnvironmentSpec::derive_with_fallback(&root, &python, &config.fallback_version);
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(())
        }
        Some(Commands::Versions) => {
            for version in &config.python_versions {
                println!("{version}");
            }
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            generate_completion_script(shell);
            Ok(())
        }
        None => gui::run(config),
    }
}

fn create(
    config: &'static Config,
    root: &str,
    python: &str,
    micromamba_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    let spec = match session.begin(root, python, &config.fallback_version) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("{}: {err}", err.title());
            process::exit(2);
        }
    };

    let source = config
        .executable_source(micromamba_dir.as_deref())
        .context("locate micromamba directory")?;
    let creator = EnvironmentCreator::new(source, config.channel.clone());

    let (tx, rx) = mpsc::channel();
    worker::spawn(creator, spec, move |done| {
        let _ = tx.send(done);
    })
    .context("start worker thread")?;
    let done = rx.recv().context("worker exited without reporting")?;

    let (spec, result) = session.finish(done);
    match result {
        Ok(outcome) => {
            if let Some(python) = creator::resulting_interpreter(&spec, &outcome) {
                println!("{}", python.display());
            } else if let Outcome::NoExecutable { location } = outcome {
                eprintln!("NO micromamba under [{location}]");
            }
            Ok(())
        }
        Err(CreateError::ProcessFailed {
            code,
            stdout,
            stderr,
        }) => {
            print!("{stdout}");
            eprintln!("micromamba exited with code {code}");
            eprint!("{stderr}");
            process::exit(code);
        }
        Err(err) => Err(err.into()),
    }
}

fn generate_completion_script<G: Generator>(gen: G) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(gen, &mut cmd, name, &mut io::stdout());
}
