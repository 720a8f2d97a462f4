use colored::Colorize;

use crate::wire::RunReport;

pub fn print_run_dashboard(report: &RunReport) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━ Service Created ━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!("  {}: {}", "Entity".bold(), report.entity_name);
    println!("  {}: {}", "Class".green().bold(), report.class_name);
    println!("  {}: {}", "Project".bold(), report.project_dir.display());
    if report.installed.is_empty() {
        println!("  {}: (none)", "Installed".cyan().bold());
    } else {
        println!(
            "  {}: {}",
            "Installed".cyan().bold(),
            report.installed.join(", ")
        );
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

pub fn print_failure(entity_name: &str, err: &anyhow::Error) {
    eprintln!(
        "\n{} {} — {}",
        "[FAILED]".red().bold(),
        entity_name,
        err
    );
}
