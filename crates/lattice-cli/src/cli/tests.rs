#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use crate::cli::{Cli, Command, Format};

    #[test]
    fn test_check_with_defaults() {
        let cli = Cli::try_parse_from(["lattice", "check", "-i", "deps.json"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.input.inputs, vec![PathBuf::from("deps.json")]);
        assert_eq!(args.input.config, None);
        assert_eq!(args.format, None);
        assert!(!args.show_allowed);
    }

    #[test]
    fn test_check_with_everything() {
        let cli = Cli::try_parse_from([
            "lattice",
            "--no-color",
            "check",
            "--input",
            "a.json",
            "-i",
            "b.json",
            "--config",
            "policy/lattice.toml",
            "--format",
            "json",
            "--show-allowed",
            "--no-outputs",
        ])
        .unwrap();
        assert!(cli.no_color);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.input.inputs.len(), 2);
        assert_eq!(args.input.config, Some(PathBuf::from("policy/lattice.toml")));
        assert_eq!(args.format, Some(Format::Json));
        assert!(args.show_allowed && args.no_outputs);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["lattice", "check"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["lattice", "-v", "-q", "arch", "-i", "deps.json"]).is_err());
    }

    #[test]
    fn test_path_positionals() {
        let cli = Cli::try_parse_from(["lattice", "path", "-i", "deps.json", "Web", "Data"]).unwrap();
        let Command::Path(args) = cli.command else {
            panic!("expected path");
        };
        assert_eq!((args.from.as_str(), args.to.as_str()), ("Web", "Data"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["lattice", "arch", "-i", "d.json", "-f", "yaml"]).is_err());
    }
}
