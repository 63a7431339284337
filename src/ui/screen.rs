use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::models::VerseRecord;
use crate::navigation::View;

/// What the viewer draws: the last record pushed by the navigator plus the
/// selector values.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub status: String,
    pub image_path: Option<PathBuf>,
    pub audio_path: Option<PathBuf>,
    pub selected_surah: String,
    pub selected_verse: u32,
    pub verse_range: Option<RangeInclusive<u32>>,
}

impl Screen {
    pub fn verse_choices(&self) -> Vec<u32> {
        self.verse_range.clone().map(|r| r.collect()).unwrap_or_default()
    }

    pub fn selector_text(&self) -> String {
        match &self.verse_range {
            Some(range) => format!(
                "Surah: {}    Ayah: {} (of {})",
                self.selected_surah,
                self.selected_verse,
                range.end()
            ),
            None => format!(
                "Surah: {}    Ayah: {}",
                self.selected_surah, self.selected_verse
            ),
        }
    }
}

impl View for Screen {
    fn refresh(&mut self, record: &VerseRecord) {
        self.status = record.status_text();
        self.image_path = Some(record.image_path.clone());
        self.audio_path = Some(record.audio_path.clone());
        self.selected_surah = record.surah_name.clone();
        self.selected_verse = record.verse_number;
    }

    fn set_verse_range(&mut self, verses: RangeInclusive<u32>) {
        self.verse_range = Some(verses);
    }

    fn select_verse(&mut self, verse_number: u32) {
        self.selected_verse = verse_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_copies_record() {
        let record = VerseRecord {
            id: 9,
            audio_path: PathBuf::from("q_files/9.mp3"),
            image_path: PathBuf::from("q_files/9.png"),
            surah_number: 2,
            surah_name: "Al-Baqara".to_string(),
            verse_number: 2,
            verse_suffix: None,
        };
        let mut screen = Screen::default();
        screen.set_verse_range(1..=286);
        screen.refresh(&record);

        assert_eq!(screen.status, "Surah Al-Baqara - Ayah 2");
        assert_eq!(screen.image_path, Some(PathBuf::from("q_files/9.png")));
        assert_eq!(screen.selector_text(), "Surah: Al-Baqara    Ayah: 2 (of 286)");
        assert_eq!(screen.verse_choices().len(), 286);
    }

    #[test]
    fn test_verse_choices_without_range() {
        assert!(Screen::default().verse_choices().is_empty());
    }
}
