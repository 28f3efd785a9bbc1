pub mod toml_config;

pub use toml_config::ProjectConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::ProjectConfig;
    use crate::core::loader::LoadOptions;
    use crate::core::normalize::WhitespacePolicy;
    use crate::core::render::OutputFormat;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "cffcite")]
    #[command(about = "Validate and render CITATION.cff metadata")]
    pub struct CliConfig {
        /// Path to the CFF file (default: CITATION.cff, or loader.path from the config)
        #[arg(short, long)]
        pub file: Option<String>,

        /// Path to a cffcite.toml configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// How to treat leading/trailing whitespace in scalar fields
        #[arg(long, value_enum)]
        pub whitespace: Option<WhitespacePolicy>,

        /// Fail when the file has no preferred-citation
        #[arg(long)]
        pub require_preferred_citation: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Check the file against the CFF schema rules
        Validate,
        /// Render the citation
        Cite {
            #[arg(long, value_enum)]
            format: Option<OutputFormat>,

            /// Write to this file instead of stdout
            #[arg(short, long)]
            output: Option<String>,
        },
        /// Print a short summary of the metadata
        Show,
    }

    impl CliConfig {
        pub fn project_config(&self) -> Result<ProjectConfig> {
            match &self.config {
                Some(path) => ProjectConfig::from_file(path),
                None => ProjectConfig::discover(),
            }
        }

        /// 命令列參數優先於設定檔
        pub fn citation_path(&self, project: &ProjectConfig) -> String {
            self.file
                .clone()
                .unwrap_or_else(|| project.citation_path().to_string())
        }

        pub fn load_options(&self, project: &ProjectConfig) -> LoadOptions {
            let defaults = project.load_options();
            LoadOptions {
                whitespace: self.whitespace.unwrap_or(defaults.whitespace),
                require_preferred_citation: self.require_preferred_citation
                    || defaults.require_preferred_citation,
            }
        }

        pub fn output_format(
            &self,
            requested: Option<OutputFormat>,
            project: &ProjectConfig,
        ) -> Result<OutputFormat> {
            match requested {
                Some(format) => Ok(format),
                None => project.output_format(),
            }
        }

        pub fn output_path(&self, requested: Option<&str>, project: &ProjectConfig) -> Option<String> {
            requested
                .map(str::to_string)
                .or_else(|| project.render.output_path.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_overrides_project_config() {
            let project = ProjectConfig::from_toml_str(
                "[loader]\npath = \"meta.cff\"\nwhitespace = \"trim\"\n[render]\nformat = \"json\"\n",
            )
            .unwrap();

            let cli = CliConfig::parse_from(["cffcite", "--whitespace", "reject", "cite"]);
            assert_eq!(cli.citation_path(&project), "meta.cff");
            assert_eq!(cli.load_options(&project).whitespace, WhitespacePolicy::Reject);
            assert_eq!(cli.output_format(None, &project).unwrap(), OutputFormat::Json);
            assert_eq!(
                cli.output_format(Some(OutputFormat::Apa), &project).unwrap(),
                OutputFormat::Apa
            );

            let cli = CliConfig::parse_from(["cffcite", "-f", "other.cff", "validate"]);
            assert_eq!(cli.citation_path(&project), "other.cff");
            assert_eq!(cli.load_options(&project).whitespace, WhitespacePolicy::Trim);
        }

        #[test]
        fn test_cite_subcommand_arguments() {
            let cli = CliConfig::parse_from(["cffcite", "cite", "--format", "bibtex", "-o", "ref.bib"]);
            match cli.command {
                Command::Cite { format, output } => {
                    assert_eq!(format, Some(OutputFormat::Bibtex));
                    assert_eq!(output.as_deref(), Some("ref.bib"));
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }
}
