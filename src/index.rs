//! Lookups from (surah name, verse number) to catalog positions.

use std::collections::BTreeMap;

use crate::models::{SurahGroup, VerseRecord};

/// Group the catalog by surah name, remembering where each surah starts and
/// its highest verse number.
pub fn build_surah_groups(records: &[VerseRecord]) -> BTreeMap<String, SurahGroup> {
    let mut groups = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        if groups.contains_key(&record.surah_name) {
            continue;
        }
        let last_verse = records
            .iter()
            .filter(|other| other.surah_name == record.surah_name)
            .map(|other| other.verse_number)
            .max()
            .unwrap_or(record.verse_number);
        groups.insert(
            record.surah_name.clone(),
            SurahGroup {
                first_index: index,
                last_verse,
            },
        );
    }
    groups
}

/// Position of the first record matching both the surah name and the verse
/// number exactly.
pub fn find_index(records: &[VerseRecord], surah_name: &str, verse_number: u32) -> Option<usize> {
    records
        .iter()
        .position(|record| record.surah_name == surah_name && record.verse_number == verse_number)
}
