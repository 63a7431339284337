use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::settings::CfgDefaultKeymaps;

pub struct HelpWindow;

impl HelpWindow {
    pub fn help_lines(keymap: &CfgDefaultKeymaps) -> Vec<String> {
        vec![
            " Navigation:".to_string(),
            format!("   {:<18}Next Ayah", format!("{} / Right", keymap.next_verse)),
            format!("   {:<18}Previous Ayah", format!("{} / Left", keymap.prev_verse)),
            format!("   {:<18}Play Current Ayah", format!("{} / Space", keymap.play)),
            String::new(),
            " Selection:".to_string(),
            format!("   {:<18}Select Surah", keymap.select_surah),
            format!("   {:<18}Select Ayah", keymap.select_verse),
            "   j / k             Move In List".to_string(),
            "   Enter             Confirm".to_string(),
            String::new(),
            " Other:".to_string(),
            format!("   {:<18}Open Image", keymap.open_image),
            format!("   {:<18}Help", keymap.help),
            format!("   {:<18}Quit / Close Window", keymap.quit),
        ]
    }

    pub fn render(frame: &mut Frame, area: Rect, keymap: &CfgDefaultKeymaps) {
        let help_content: Vec<Line> = Self::help_lines(keymap)
            .into_iter()
            .map(Line::from)
            .collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph =
            Paragraph::new(help_content).block(Block::default().title("Help").borders(Borders::ALL));

        frame.render_widget(help_paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lines_follow_keymap() {
        let mut keymap = CfgDefaultKeymaps::default();
        keymap.next_verse = "n".to_string();
        let lines = HelpWindow::help_lines(&keymap);
        assert!(lines.iter().any(|l| l.contains("n / Right") && l.ends_with("Next Ayah")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with('q') && l.contains("Quit")));
    }
}
