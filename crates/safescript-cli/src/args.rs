use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use safescript_compiler::ModuleKind;

/// CLI arguments for the safescript binary.
#[derive(Parser, Debug)]
#[command(
    name = "safescript",
    version,
    about = "Rewrite JavaScript and TypeScript operators into checked SafeScript runtime calls",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Source root to transform.
    #[arg(short = 's', long, required = true)]
    pub src: Option<PathBuf>,

    /// Destination root. Defaults to the source root (in-place).
    #[arg(short = 'd', long)]
    pub dest: Option<PathBuf>,

    /// Emit `.map` files next to the outputs.
    #[arg(long = "src-map")]
    pub src_map: bool,

    /// Transform `.ts`/`.tsx` files as well as `.js`/`.jsx`.
    #[arg(long = "allow-ts", action = ArgAction::Set, default_value_t = true)]
    pub allow_ts: bool,

    /// Keep transformed TypeScript as TypeScript instead of compiling it to
    /// JavaScript.
    #[arg(long = "allow-angular")]
    pub allow_angular: bool,

    /// Module style of the runtime import for files that show none.
    #[arg(short = 'm', long, value_enum, ignore_case = true, default_value_t = Module::Es)]
    pub module: Module,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compose two source maps: FIRST maps an intermediate file to the
    /// original, SECOND maps the final output to the intermediate.
    Compose {
        first: PathBuf,
        second: PathBuf,
        /// Write the composed map here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
    Es,
    #[value(name = "commonjs", alias = "common-js")]
    CommonJs,
}

impl From<Module> for ModuleKind {
    fn from(module: Module) -> Self {
        match module {
            Module::Es => ModuleKind::Es,
            Module::CommonJs => ModuleKind::CommonJs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parses_defaults() {
        let args = CliArgs::try_parse_from(["safescript", "--src", "app"]).unwrap();
        assert_eq!(args.src.as_deref(), Some(Path::new("app")));
        assert!(args.dest.is_none());
        assert!(!args.src_map);
        assert!(args.allow_ts);
        assert!(!args.allow_angular);
        assert_eq!(args.module, Module::Es);
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from([
            "safescript",
            "-s",
            "app",
            "-d",
            "dist",
            "--src-map",
            "--allow-ts",
            "false",
            "--allow-angular",
            "--module",
            "commonjs",
        ])
        .unwrap();
        assert_eq!(args.dest.as_deref(), Some(Path::new("dist")));
        assert!(args.src_map);
        assert!(!args.allow_ts);
        assert!(args.allow_angular);
        assert_eq!(ModuleKind::from(args.module), ModuleKind::CommonJs);
    }

    #[test]
    fn requires_src_without_subcommand() {
        assert!(CliArgs::try_parse_from(["safescript"]).is_err());
    }

    #[test]
    fn parses_compose() {
        let args =
            CliArgs::try_parse_from(["safescript", "compose", "a.map", "b.map", "-o", "c.map"])
                .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Compose {
                first: PathBuf::from("a.map"),
                second: PathBuf::from("b.map"),
                out: Some(PathBuf::from("c.map")),
            })
        );
    }
}
