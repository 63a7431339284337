pub mod help;
pub mod selector;

use ratatui::layout::Rect;

/// Compute a centered popup area within the given area.
pub fn centered_popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = (area.width * width_percent) / 100;
    let height = (area.height * height_percent) / 100;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_area() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_popup_area(area, 40, 70), Rect::new(30, 7, 40, 35));
    }
}
