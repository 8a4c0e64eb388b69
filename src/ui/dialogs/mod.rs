mod help;
mod image;
mod load;
mod save;

pub use help::HelpDialog;
pub use image::{discover_images, ImageDialog, ImageDialogFocus, ImageDialogResult};
pub use load::LoadDialog;
pub use save::SaveDialog;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Helper to create a centered rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Move a list selection one row, wrapping at both ends
pub(crate) fn wrap_selection(current: Option<usize>, len: usize, down: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, down) {
        (Some(i), true) if i + 1 < len => i + 1,
        (_, true) => 0,
        (Some(i), false) if i > 0 => i - 1,
        (_, false) => len - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_selection() {
        assert_eq!(wrap_selection(None, 0, true), None);
        assert_eq!(wrap_selection(Some(0), 3, true), Some(1));
        assert_eq!(wrap_selection(Some(2), 3, true), Some(0));
        assert_eq!(wrap_selection(Some(0), 3, false), Some(2));
        assert_eq!(wrap_selection(None, 3, false), Some(2));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
    }
}
