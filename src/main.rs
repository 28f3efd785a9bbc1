use clap::Parser;
use cffcite::config::{CliConfig, Command};
use cffcite::utils::{logger, validation::Validate};
use cffcite::{CffError, CitationLoader, CitationRecord, LoadReport};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli) {
        // 記錄詳細錯誤信息
        tracing::error!("❌ {} (exit code {})", e, e.exit_code());
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        // 輸出用戶友好的錯誤信息
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &CliConfig) -> Result<(), CffError> {
    // 載入並驗證設定檔
    let project = cli.project_config()?;
    project.validate()?;

    let path = cli.citation_path(&project);
    let loader = CitationLoader::new(cli.load_options(&project));
    let report = loader.load_file(&path)?;

    match &cli.command {
        Command::Validate => {
            print_warnings(&report);
            println!(
                "✅ {} is valid (CFF {})",
                path,
                report.record.cff_version()
            );
        }
        Command::Cite { format, output } => {
            print_warnings(&report);
            let format = cli.output_format(*format, &project)?;
            let rendered = format.render(&report.record)?;

            match cli.output_path(output.as_deref(), &project) {
                Some(output_path) => {
                    std::fs::write(&output_path, &rendered).map_err(|source| {
                        CffError::IoError {
                            path: output_path.clone(),
                            source,
                        }
                    })?;
                    tracing::info!("📁 {} citation written to {}", format, output_path);
                }
                None => {
                    print!("{}", rendered);
                    if !rendered.ends_with('\n') {
                        println!();
                    }
                }
            }
        }
        Command::Show => {
            print_warnings(&report);
            display_summary(&report.record);
        }
    }

    Ok(())
}

fn print_warnings(report: &LoadReport) {
    for warning in &report.warnings {
        eprintln!("⚠️  {}", warning);
    }
}

fn display_summary(record: &CitationRecord) {
    println!("📋 Citation Summary:");
    println!("  Title: {}", record.title());
    println!("  CFF Version: {}", record.cff_version());
    if let Some(version) = record.version() {
        println!("  Software Version: {}", version);
    }
    if let Some(license) = record.license() {
        println!("  License: {}", license);
    }
    if let Some(repository) = record.repository_code() {
        println!("  Repository: {}", repository);
    }
    println!("  Authors ({}):", record.authors().len());
    for author in record.authors() {
        match author.orcid() {
            Some(orcid) => println!("    - {} <{}>", author, orcid),
            None => println!("    - {}", author),
        }
    }

    if let Some(citation) = record.preferred_citation() {
        println!("  Preferred Citation ({}):", citation.citation_type());
        println!("    Title: {}", citation.title());
        println!("    Authors: {}", citation.authors().len());
        if let Some(journal) = citation.journal() {
            println!("    Journal: {}", journal);
        }
        println!("    Year: {}", citation.year());
        println!("    DOI: {}", citation.doi());
    }
}
