//! sqgen command line.
//!
//! Generates C++ field type sources, or renders any catalog template, from a
//! JSON schema document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sqgen_codegen::driver::DEFAULT_SCHEMA_PATH;
use sqgen_codegen::{ArtifactSpec, CodegenError, GenerationConfig, GenerationDriver};
use tracing_subscriber::EnvFilter;

/// Schema-driven C++ field type generator
#[derive(Parser, Debug)]
#[command(name = "sqgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema document to generate from
    #[arg(short, long, default_value = DEFAULT_SCHEMA_PATH)]
    schema: PathBuf,

    /// Directory of additional `*.hbs` templates
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Namespace of the generated classes
    #[arg(long)]
    namespace: Option<String>,

    /// Include directory prefix of generated headers
    #[arg(long)]
    include_prefix: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write headers and sources for every type
    Sources {
        /// Directory receiving `<Type>.gen.h` and `<Type>.gen.inl.h`
        header_dir: PathBuf,
        /// Directory receiving `<Type>.gen.cpp`
        source_dir: PathBuf,
    },
    /// Render one template for every type, or once for the whole schema
    Template {
        /// Catalog template name
        name: String,
        /// Output path; `%s` is replaced by the type name, `%%` is a literal `%`
        output_format: String,
    },
}

impl Cli {
    fn into_config(self) -> Result<GenerationConfig, CodegenError> {
        let mut builder = GenerationConfig::builder(self.schema);
        builder = match self.command {
            Command::Sources {
                header_dir,
                source_dir,
            } => builder.sources(&header_dir, &source_dir),
            Command::Template {
                name,
                output_format,
            } => builder.artifact(ArtifactSpec::templated(name, output_format)),
        };
        if let Some(dir) = self.template_dir {
            builder = builder.template_dir(dir);
        }
        if let Some(namespace) = self.namespace {
            builder = builder.namespace(namespace);
        }
        if let Some(prefix) = self.include_prefix {
            builder = builder.include_prefix(prefix);
        }
        builder.build()
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = cli
        .into_config()
        .and_then(|config| GenerationDriver::new().run(&config));

    match result {
        Ok(report) => {
            tracing::info!("Wrote {} files", report.written.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("sqgen: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::Path;

    #[test]
    fn test_sources_command() {
        let cli = Cli::try_parse_from(["sqgen", "sources", "inc", "src"]).unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.schema_path(), Path::new("schema.json"));
        let templates: Vec<_> = config.artifacts().iter().map(|a| a.template.as_str()).collect();
        assert_eq!(templates, vec!["header", "inline_header", "source"]);
        assert_eq!(
            config.artifacts()[2].resolve_path(Some("SqInt")),
            Path::new("src/SqInt.gen.cpp")
        );
    }

    #[test]
    fn test_template_command_with_options() {
        let cli = Cli::try_parse_from([
            "sqgen",
            "-s",
            "query/schema.json",
            "--template-dir",
            "templates",
            "--namespace",
            "app::fields",
            "-vv",
            "template",
            "doc",
            "docs/%s.md",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let config = cli.into_config().unwrap();

        assert_eq!(config.schema_path(), Path::new("query/schema.json"));
        assert_eq!(config.template_dir(), Some(Path::new("templates")));
        assert_eq!(config.options().namespace, "app::fields");
        assert_eq!(
            config.artifacts(),
            &[ArtifactSpec::templated("doc", "docs/%s.md")]
        );
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["sqgen"]).is_err());
        assert!(Cli::try_parse_from(["sqgen", "template", "doc"]).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(5), "trace");
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        std::fs::write(
            &schema,
            r#"{"primitive_types": [{"name": "PrimitiveBool"}],
                "types": [{"name": "SqBool", "fields": [{"name": "value", "return_type": "PrimitiveBool"}]}],
                "root_type": "SqBool"}"#,
        )
        .unwrap();
        let out = dir.path().join("out");
        let args: Vec<OsString> = vec![
            "sqgen".into(),
            "--schema".into(),
            schema.into_os_string(),
            "sources".into(),
            out.clone().into_os_string(),
            out.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let report = GenerationDriver::new()
            .run(&cli.into_config().unwrap())
            .unwrap();
        assert_eq!(report.written.len(), 3);
        assert!(out.join("SqBool.gen.cpp").is_file());
    }
}
