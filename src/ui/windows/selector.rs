use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

/// Popup list used for both the surah and the verse selector.
pub struct SelectorWindow;

impl SelectorWindow {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        entries: &[String],
        selected_index: usize,
    ) {
        let popup_area = super::centered_popup_area(area, 40, 70);

        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| ListItem::new(Line::from(entry.as_str())))
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(selected_index.min(entries.len() - 1)));
        }

        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
