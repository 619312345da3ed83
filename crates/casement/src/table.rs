use casement_core::WindowSummary;

pub struct WindowTable {
    id_width: usize,
    title_width: usize,
    flag_width: usize,
}

impl WindowTable {
    pub fn new(windows: &[WindowSummary]) -> Self {
        let id_width = windows
            .iter()
            .map(|w| w.id.chars().count())
            .max()
            .unwrap_or(4)
            .clamp(4, 32);
        let title_width = windows
            .iter()
            .map(|w| w.title.chars().count())
            .max()
            .unwrap_or(5)
            .clamp(5, 40);

        Self {
            id_width,
            title_width,
            flag_width: 9, // "Maximized"
        }
    }

    pub fn print_table(&self, windows: &[WindowSummary]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.header_row());
        println!("{}", self.border('├', '┼', '┤'));
        for window in windows {
            println!("{}", self.row(window));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row(&self, window: &WindowSummary) -> String {
        format!(
            "│ {} │ {} │ {:<width_flag$} │ {:<width_flag$} │ {:<width_flag$} │",
            truncate(&window.id, self.id_width),
            truncate(&window.title, self.title_width),
            yes_no(window.visible),
            yes_no(window.maximized),
            yes_no(window.minimized),
            width_flag = self.flag_width,
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_title$} │ {:<width_flag$} │ {:<width_flag$} │ {:<width_flag$} │",
            "Id",
            "Title",
            "Visible",
            "Maximized",
            "Minimized",
            width_id = self.id_width,
            width_title = self.title_width,
            width_flag = self.flag_width,
        )
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let columns = [
            self.id_width,
            self.title_width,
            self.flag_width,
            self.flag_width,
            self.flag_width,
        ];
        let segments: Vec<String> = columns.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, title: &str) -> WindowSummary {
        WindowSummary {
            id: id.to_string(),
            title: title.to_string(),
            visible: true,
            maximized: false,
            minimized: false,
        }
    }

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("main", 6), "main  ");
    }

    #[test]
    fn test_truncate_long_strings() {
        assert_eq!(truncate("child-settings", 8), "child...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Ünïcödé title", 7), "Ünïc...");
    }

    #[test]
    fn test_column_widths_follow_content() {
        let windows = vec![summary("main", "Notes"), summary("child-1a2b3c4d", "Settings")];
        let table = WindowTable::new(&windows);
        assert_eq!(table.id_width, 14);
        assert_eq!(table.title_width, 8);
    }

    #[test]
    fn test_rows_align_with_borders() {
        let windows = vec![summary("main", "Notes")];
        let table = WindowTable::new(&windows);
        let border = table.border('┌', '┬', '┐');
        let row = table.row(&windows[0]);
        assert_eq!(border.chars().count(), row.chars().count());
        assert_eq!(table.header_row().chars().count(), row.chars().count());
    }
}
