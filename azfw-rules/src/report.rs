use colored::Colorize;

/// Colorize rendered validation output for terminal display.
pub fn colorize_validate_text(text: &str) -> String {
    let mut out = Vec::new();

    for line in text.lines() {
        let colored = if line.starts_with("- [error]") {
            line.red().to_string()
        } else if line.starts_with("- [warning]") {
            line.yellow().to_string()
        } else if line.starts_with("- [info]") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}
