use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "NerveModel CLI - builds nerve-cuff simulation models from project templates and sample fascicle geometry.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the model described by a project's master configuration and save it.
    Build(BuildArgs),
    /// Show what each cuff preset would create, without building anything.
    Plan(PlanArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project root containing `.templates/`, `.config/` and `data/`.
    #[arg(required = true, value_name = "PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Path to a settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where to save the model, relative to the project root unless absolute.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Geometry feature to build through before saving.
    #[arg(long, value_name = "TAG")]
    pub finalize_tag: Option<String>,

    /// Current applied to every point current source, in amperes.
    #[arg(long, value_name = "AMPS")]
    pub current: Option<f64>,

    /// Run the fascicle pass a second time after the first.
    #[arg(long)]
    pub rescan_fascicles: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S build.current-amplitude=0.002
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Project root containing `.templates/` and `.config/`.
    #[arg(required = true, value_name = "PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Path to a settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_arguments_parse() {
        let cli = Cli::parse_from([
            "nervemodel",
            "-vv",
            "build",
            "/proj",
            "-o",
            "out.mph",
            "--rescan-fascicles",
            "-S",
            "build.finalize-tag=fin",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.project_root, PathBuf::from("/proj"));
        assert_eq!(args.output, Some(PathBuf::from("out.mph")));
        assert!(args.rescan_fascicles);
        assert_eq!(args.set_values, ["build.finalize-tag=fin"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["nervemodel", "-q", "-v", "plan", "/proj"]).is_err());
    }
}
