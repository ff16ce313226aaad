use crate::job::RenamedItem;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use nu_ansi_term::Color as AnsiColor;
use std::io::{self, IsTerminal};
use std::path::Path;

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => is_terminal(),
    }
}

pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

/// Render planned renames as a `#`, `Source`, `Target` table.
pub fn render_table(items: &[RenamedItem], use_color: bool) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Source").fg(Color::Cyan),
            Cell::new("Target").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["#", "Source", "Target"]);
    }

    for (offset, item) in items.iter().enumerate() {
        let target = item.target.display().to_string();
        table.add_row(vec![
            Cell::new(offset + 1),
            Cell::new(item.source.display()),
            if use_color {
                Cell::new(target).fg(Color::Green)
            } else {
                Cell::new(target)
            },
        ]);
    }

    table.to_string()
}

/// Percentage of the batch done, rounded down.
pub fn percent_complete(completed: usize, total: usize) -> usize {
    if total == 0 {
        100
    } else {
        completed * 100 / total
    }
}

/// One progress line, e.g. `[ 50%] renamed -> /tmp/P1.jpg`.
pub fn render_progress_line(completed: usize, total: usize, target: &Path, use_color: bool) -> String {
    let percent = format!("[{:>3}%]", percent_complete(completed, total));
    let target = target.display().to_string();
    if use_color {
        format!(
            "{} renamed -> {}",
            AnsiColor::Cyan.paint(percent),
            AnsiColor::Green.paint(target)
        )
    } else {
        format!("{} renamed -> {}", percent, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_should_use_color_prefers_explicit_choice() {
        assert!(should_use_color_with_detector(Some(true), || false));
        assert!(!should_use_color_with_detector(Some(false), || true));
        assert!(should_use_color_with_detector(None, || true));
    }

    #[test]
    fn test_table_lists_every_item() {
        let items = vec![
            RenamedItem {
                source: PathBuf::from("a.jpg"),
                target: PathBuf::from("Trip1.jpg"),
            },
            RenamedItem {
                source: PathBuf::from("b.jpg"),
                target: PathBuf::from("Trip2.jpg"),
            },
        ];
        let table = render_table(&items, false);
        assert!(table.contains("Source"));
        assert!(table.contains("a.jpg"));
        assert!(table.contains("Trip2.jpg"));
        assert!(!table.contains("\u{1b}["));
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(3, 3), 100);
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn test_progress_line_plain() {
        assert_eq!(
            render_progress_line(1, 2, Path::new("/tmp/P1.jpg"), false),
            "[ 50%] renamed -> /tmp/P1.jpg"
        );
    }
}
