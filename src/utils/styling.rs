//! Terminal styling utilities for step-by-step pipeline output

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::filter::{FilterState, PredicateSelection};
use crate::pipeline::PreprocessConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");
pub static FUNNEL: Emoji<'_, '_> = Emoji("🔎 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("LoanLens").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Loan application data preparation & exploration").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, output: Option<&Path>, config: &PreprocessConfig) {
    let line = "─".repeat(54);

    println!("    ┌{}┐", line);
    println!("    │ {}", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {}Input:  {}", FOLDER, truncate_path(input, 38));
    if let Some(output) = output {
        println!("    │  {}Output: {}", SAVE, truncate_path(output, 38));
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {}Missing threshold:   {}",
        CHART,
        style(format!("{:.1}%", config.missing_threshold * 100.0)).yellow()
    );
    println!(
        "    │  {}Rare level cutoff:   {}",
        CHART,
        style(format!("{:.1}%", config.rare_category_threshold * 100.0)).yellow()
    );
    println!(
        "    │  {}Winsorization:       {}",
        SCISSORS,
        style(format!(
            "P{:.0}–P{:.0}",
            config.winsor_lower * 100.0,
            config.winsor_upper * 100.0
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print the active filter selections
pub fn print_filters(selection: &PredicateSelection, state: &FilterState) {
    println!();
    println!(
        "    {}{}",
        FUNNEL,
        style("Active Filters").white().bold()
    );
    for (col, values) in selection.categorical() {
        println!("      {:<22} {}", col.as_str(), describe_set(values.iter()));
    }
    println!("      {:<22} {}", "AGE_YEARS", state.age_range());
    println!(
        "      {:<22} {}",
        "FIXED_INCOME_BRACKET",
        describe_set(state.income_brackets().iter())
    );
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      {} {}", style(count).yellow().bold(), description);
    }
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!("    {}{}", ROCKET, style("LoanLens run complete!").green().bold());
    println!();
}

fn describe_set<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = values.map(String::as_str).collect();
    if joined.is_empty() {
        style("(any)").dim().to_string()
    } else {
        joined.join(", ")
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate_string("data.csv", 38), "data.csv");
    }

    #[test]
    fn test_truncate_keeps_tail() {
        let out = truncate_string("/very/long/path/to/application_train.csv", 20);
        assert_eq!(out.chars().count(), 20);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("train.csv"));
    }
}
