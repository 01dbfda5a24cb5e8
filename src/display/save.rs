//! Save display formatting

use super::format::{format_size, format_timestamp};
use crate::models::Save;

/// Header row for a save table
pub fn format_save_header(verbose: bool) -> String {
    if verbose {
        format!("{:>3} {:>24} {:>8} {}", "ID", "Last backup", "Size", "Note")
    } else {
        format!("{:>3} {:>24} {}", "ID", "Last backup", "Note")
    }
}

/// One save row; `id` is the 1-based position
pub fn format_save_row(id: usize, save: &Save, verbose: bool) -> String {
    let stamp = format_timestamp(&save.timestamp);
    if verbose {
        format!(
            "{:>3} {:>24} {:>8} {}",
            id,
            stamp,
            format_size(save.size),
            save.note
        )
    } else {
        format!("{:>3} {:>24} {}", id, stamp, save.note)
    }
}

/// Format a game's whole history, oldest first
pub fn format_save_list(saves: &[Save], verbose: bool) -> String {
    let mut output = String::new();
    output.push_str(&format_save_header(verbose));
    output.push('\n');
    for (i, save) in saves.iter().enumerate() {
        output.push_str(&format_save_row(i + 1, save, verbose));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn test_verbose_adds_size_column() {
        let save = Save::new(Utc::now(), PathBuf::from("/b/x"), 2048).with_note("boss");

        let short = format_save_row(1, &save, false);
        let long = format_save_row(1, &save, true);

        assert!(short.ends_with(" boss"));
        assert!(!short.contains("2K"));
        assert!(long.contains("      2K boss"));
        assert!(format_save_header(true).contains("Size"));
        assert!(!format_save_header(false).contains("Size"));
    }

    #[test]
    fn test_save_list_numbers_from_one() {
        let saves = vec![
            Save::new(Utc::now(), PathBuf::from("/b/1"), 1),
            Save::new(Utc::now(), PathBuf::from("/b/2"), 1),
        ];

        let output = format_save_list(&saves, false);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  1 "));
        assert!(lines[2].starts_with("  2 "));
    }
}
