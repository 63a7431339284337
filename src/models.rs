use std::path::PathBuf;

/// Position written on first read when nothing has been stored yet.
pub const DEFAULT_POSITION: i64 = 1;

/// One row of the verse catalog with its media paths resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct VerseRecord {
    pub id: i64,
    pub audio_path: PathBuf,
    pub image_path: PathBuf,
    pub surah_number: u32,
    pub surah_name: String,
    pub verse_number: u32,
    pub verse_suffix: Option<u32>,
}

impl VerseRecord {
    /// Status line shown above the selectors, e.g. `Surah Al-Fatiha - Ayah 3 - 2`.
    pub fn status_text(&self) -> String {
        match self.verse_suffix {
            Some(suffix) => format!(
                "Surah {} - Ayah {} - {}",
                self.surah_name, self.verse_number, suffix
            ),
            None => format!("Surah {} - Ayah {}", self.surah_name, self.verse_number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurahGroup {
    pub first_index: usize,
    pub last_verse: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowType {
    Viewer,
    Help,
    SurahList,
    VerseList,
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(suffix: Option<u32>) -> VerseRecord {
        VerseRecord {
            id: 7,
            audio_path: PathBuf::from("q_files/007.mp3"),
            image_path: PathBuf::from("q_files/007.png"),
            surah_number: 1,
            surah_name: "Al-Fatiha".to_string(),
            verse_number: 7,
            verse_suffix: suffix,
        }
    }

    #[test]
    fn test_status_text_without_suffix() {
        assert_eq!(record(None).status_text(), "Surah Al-Fatiha - Ayah 7");
    }

    #[test]
    fn test_status_text_with_suffix() {
        assert_eq!(record(Some(2)).status_text(), "Surah Al-Fatiha - Ayah 7 - 2");
    }

    #[test]
    fn test_window_type_default() {
        assert_eq!(WindowType::default(), WindowType::Viewer);
    }
}
