//! Terminal formatting for command summaries

use colored::*;

pub fn section_header_with_line(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Tree structure item
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

/// Tree section with nested items
pub fn tree_section(title: &str, items: &[(&str, String)], is_last: bool) {
    tree_item(is_last, title, None);
    let continuation = if is_last { "   " } else { "│  " };

    for (i, (label, value)) in items.iter().enumerate() {
        let prefix = if i == items.len() - 1 { "└─" } else { "├─" };
        println!("{}{} {}: {}", continuation.dimmed(), prefix.dimmed(), label, value);
    }
}

/// List written files under a header
pub fn written_files(files: &[std::path::PathBuf]) {
    for (i, file) in files.iter().enumerate() {
        tree_item(i == files.len() - 1, "wrote", Some(&file.display().to_string()));
    }
}

/// Format a number with thousands separator
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
