//! jscg CLI - Command-line interface for the jscg call graph builder
//!
//! Builds demand-driven call graphs for JavaScript and TypeScript projects.

mod commands;
mod files;
mod logging;
mod output;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "jscg",
    author,
    version,
    about = "Demand-driven call graphs for JavaScript and TypeScript",
    long_about = "jscg builds a call graph for JavaScript and TypeScript programs.\n\n\
                  Interprocedural value flow is only tracked where it can change\n\
                  which function a call site invokes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_enum, default_value = "warn", help = "Set the log level")]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Build(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use jscg_core::Strategy;

    #[test]
    fn cli_parses_build_command() {
        let cli = Cli::try_parse_from(["jscg", "build", "./src", "lib/a.js"]).unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.paths.len(), 2);
                assert_eq!(args.paths[0].to_str().unwrap(), "./src");
                assert!(args.strategy.is_none());
                assert!(!args.cg);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn build_requires_a_path() {
        assert!(Cli::try_parse_from(["jscg", "build"]).is_err());
    }

    #[test]
    fn cli_parses_build_flags() {
        let cli = Cli::try_parse_from([
            "jscg",
            "build",
            "src",
            "--strategy",
            "FULL",
            "--cg",
            "--fg",
            "--time",
            "--count-cb",
            "--req-js",
            "--output",
            "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.strategy, Some(Strategy::Full));
                assert!(args.cg && args.fg && args.time);
                assert!(args.count_cb && args.req_js);
                assert_eq!(args.output.unwrap().to_str().unwrap(), "out");
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["jscg", "build", "src", "--strategy", "oneshot"]).is_err());
    }

    #[test]
    fn cli_accepts_hyphenated_filters() {
        let cli = Cli::try_parse_from([
            "jscg", "build", "src", "--filter", "-test", "--filter", "+keep",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => assert_eq!(args.filters, vec!["-test", "+keep"]),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn cli_parses_global_log_options() {
        let cli =
            Cli::try_parse_from(["jscg", "build", "src", "--log-level", "debug", "--log-json"])
                .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.log_json);
    }

    #[test]
    fn log_level_defaults_to_warn() {
        let cli = Cli::try_parse_from(["jscg", "init"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.log_json);
    }

    #[test]
    fn cli_parses_init_with_force() {
        let cli = Cli::try_parse_from(["jscg", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn cli_version_is_set() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some("0.1.0"));
    }

    #[test]
    fn build_help_shows_options() {
        let mut cmd = Cli::command();
        let build_cmd = cmd
            .get_subcommands_mut()
            .find(|c| c.get_name() == "build")
            .unwrap();
        let help = build_cmd.render_help().to_string();
        assert!(help.contains("PATH"));
        assert!(help.contains("--filter"));
        assert!(help.contains("--strategy"));
    }
}
