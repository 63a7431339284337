use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::index::{build_surah_groups, find_index};
use crate::logging;
use crate::models::{SurahGroup, VerseRecord};
use crate::state::State;

/// Join a stored media filename onto the media root.
pub fn resolve_media_path(media_root: &Path, filename: &str) -> PathBuf {
    media_root.join(filename)
}

/// The verse records ordered by id, together with their surah grouping.
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<VerseRecord>,
    groups: BTreeMap<String, SurahGroup>,
}

impl Catalog {
    pub fn load(state: &State, media_root: &Path) -> Result<Self> {
        let records = state.load_verses(media_root)?;
        let catalog = Self::from_records(records)?;
        logging::info(format!(
            "catalog loaded: {} verses in {} surahs",
            catalog.len(),
            catalog.groups.len()
        ));
        Ok(catalog)
    }

    pub fn from_records(mut records: Vec<VerseRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::data_unavailable("no verse data found in database"));
        }
        records.sort_by_key(|record| record.id);
        let groups = build_surah_groups(&records);
        Ok(Self { records, groups })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VerseRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[VerseRecord] {
        &self.records
    }

    pub fn index_of_id(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn find_index(&self, surah_name: &str, verse_number: u32) -> Option<usize> {
        find_index(&self.records, surah_name, verse_number)
    }

    pub fn surah_group(&self, surah_name: &str) -> Option<&SurahGroup> {
        self.groups.get(surah_name)
    }

    /// Surah names in alphabetical order, as offered by the surah selector.
    pub fn surah_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Verse numbers offered for a surah. Assumes verse numbers are dense;
    /// a gap still shows up in the range.
    pub fn verse_range(&self, surah_name: &str) -> Option<RangeInclusive<u32>> {
        self.groups
            .get(surah_name)
            .map(|group| 1..=group.last_verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(id: i64, surah: &str, verse_number: u32) -> VerseRecord {
        VerseRecord {
            id,
            audio_path: resolve_media_path(Path::new("q_files"), &format!("{id}.mp3")),
            image_path: resolve_media_path(Path::new("q_files"), &format!("{id}.png")),
            surah_number: 0,
            surah_name: surah.to_string(),
            verse_number,
            verse_suffix: None,
        }
    }

    #[test]
    fn test_resolve_media_path() {
        assert_eq!(
            resolve_media_path(Path::new("/srv/q_files"), "001001.mp3"),
            PathBuf::from("/srv/q_files/001001.mp3")
        );
    }

    #[test]
    fn test_empty_catalog_is_unavailable() {
        let result = Catalog::from_records(Vec::new());
        assert!(matches!(result, Err(Error::DataUnavailable { .. })));
    }

    #[test]
    fn test_records_sorted_by_id() {
        let catalog =
            Catalog::from_records(vec![verse(3, "B", 1), verse(1, "A", 1), verse(2, "A", 2)])
                .unwrap();
        let ids: Vec<i64> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.surah_group("B").unwrap().first_index, 2);
    }

    #[test]
    fn test_lookups() {
        let catalog =
            Catalog::from_records(vec![verse(1, "Zumar", 1), verse(2, "Zumar", 2), verse(3, "Baqara", 1)])
                .unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.index_of_id(3), Some(2));
        assert_eq!(catalog.index_of_id(99), None);
        assert_eq!(catalog.find_index("Zumar", 2), Some(1));
        assert_eq!(catalog.surah_names(), vec!["Baqara", "Zumar"]);
        assert_eq!(catalog.verse_range("Zumar"), Some(1..=2));
        assert_eq!(catalog.verse_range("Missing"), None);
        assert_eq!(catalog.get(5), None);
    }

    #[test]
    fn test_verse_range_keeps_gaps() {
        let catalog = Catalog::from_records(vec![verse(1, "A", 1), verse(2, "A", 4)]).unwrap();
        assert_eq!(catalog.verse_range("A"), Some(1..=4));
        assert_eq!(catalog.find_index("A", 2), None);
    }
}
