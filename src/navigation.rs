//! The navigation state machine.
//!
//! [`Navigator`] owns the index of the verse currently on display and is the
//! only thing allowed to move it. Every move is written to the
//! [`PositionStore`] first; the view and the media player are refreshed only
//! once that write has committed, so the stored position never disagrees with
//! what is on screen.

use std::ops::RangeInclusive;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::logging;
use crate::models::VerseRecord;

/// Persisted id of the most recently displayed verse.
pub trait PositionStore {
    /// Stored id, materializing the default when nothing is stored yet.
    fn read_position(&self) -> Result<i64>;
    /// Replace the stored id. Either the new value commits or the old one stays.
    fn write_position(&self, verse_id: i64) -> Result<()>;
}

/// Audio output commanded by the navigator.
pub trait MediaPlayer {
    fn set_source(&mut self, path: &Path);
    fn play(&mut self) -> Result<()>;
}

/// Whatever displays the current verse and the selectors.
pub trait View {
    fn refresh(&mut self, record: &VerseRecord);
    fn set_verse_range(&mut self, verses: RangeInclusive<u32>);
    fn select_verse(&mut self, verse_number: u32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Next,
    Previous,
    JumpTo { surah_name: String, verse_number: u32 },
    PlaybackCompleted,
    PlayRequested,
    SurahSelectionChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Unchanged,
}

pub struct Navigator<S, P, V> {
    catalog: Catalog,
    current_index: usize,
    store: S,
    player: P,
    view: V,
}

impl<S: PositionStore, P: MediaPlayer, V: View> Navigator<S, P, V> {
    /// Seed the current index from the stored position and push the initial
    /// verse to the view and player. Nothing is written back.
    pub fn new(catalog: Catalog, store: S, player: P, view: V) -> Result<Self> {
        let stored_id = store.read_position()?;
        let current_index = match catalog.index_of_id(stored_id) {
            Some(index) => index,
            None => {
                logging::warn(format!(
                    "stored position {stored_id} is not in the catalog, starting at the first verse"
                ));
                0
            }
        };

        let mut navigator = Self {
            catalog,
            current_index,
            store,
            player,
            view,
        };
        navigator.refresh_dependents(None);
        logging::debug(format!(
            "navigator ready at index {} (id {stored_id})",
            navigator.current_index
        ));
        Ok(navigator)
    }

    pub fn dispatch(&mut self, event: NavEvent) -> Result<Transition> {
        logging::debug(format!("dispatch {event:?} at index {}", self.current_index));
        match event {
            NavEvent::Next => self.next(),
            NavEvent::Previous => self.previous(),
            NavEvent::JumpTo {
                surah_name,
                verse_number,
            } => self.jump_to(&surah_name, verse_number),
            NavEvent::PlaybackCompleted => self.playback_completed(),
            NavEvent::PlayRequested => {
                self.play()?;
                Ok(Transition::Unchanged)
            }
            NavEvent::SurahSelectionChanged(surah_name) => self.surah_selection_changed(&surah_name),
        }
    }

    pub fn next(&mut self) -> Result<Transition> {
        let target = (self.current_index + 1) % self.catalog.len();
        self.move_to(target)
    }

    pub fn previous(&mut self) -> Result<Transition> {
        let len = self.catalog.len();
        let target = (self.current_index + len - 1) % len;
        self.move_to(target)
    }

    /// Jump to a verse by surah name and number. An unknown pair leaves
    /// everything as it was.
    pub fn jump_to(&mut self, surah_name: &str, verse_number: u32) -> Result<Transition> {
        match self.catalog.find_index(surah_name, verse_number) {
            Some(target) => self.move_to(target),
            None => {
                logging::info(format!(
                    "no verse {verse_number} in surah {surah_name:?}, staying at index {}",
                    self.current_index
                ));
                Ok(Transition::Unchanged)
            }
        }
    }

    /// Auto-advance: the clip finished, move on and keep playing.
    pub fn playback_completed(&mut self) -> Result<Transition> {
        let transition = self.next()?;
        self.play()?;
        Ok(transition)
    }

    pub fn play(&mut self) -> Result<()> {
        self.player.play()
    }

    /// Land on verse 1 of `surah_name`. The selector range and verse are
    /// only reset once the move has been stored.
    pub fn surah_selection_changed(&mut self, surah_name: &str) -> Result<Transition> {
        let Some(target) = self.catalog.find_index(surah_name, 1) else {
            logging::info(format!(
                "surah {surah_name:?} has no verse 1, staying at index {}",
                self.current_index
            ));
            return Ok(Transition::Unchanged);
        };

        let transition = self.move_to(target)?;
        if let Some(verses) = self.catalog.verse_range(surah_name) {
            self.view.set_verse_range(verses);
        }
        self.view.select_verse(1);
        Ok(transition)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &VerseRecord {
        &self.catalog.records()[self.current_index]
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn move_to(&mut self, target: usize) -> Result<Transition> {
        let from = self.current_index;
        let verse_id = self.catalog.records()[target].id;

        if let Err(err) = self.store.write_position(verse_id) {
            logging::error(format!(
                "could not store position {verse_id}, staying at index {from}: {err}"
            ));
            return Err(err);
        }

        self.current_index = target;
        self.refresh_dependents(Some(from));
        logging::debug(format!("moved from index {from} to {target} (id {verse_id})"));
        Ok(Transition::Moved { from, to: target })
    }

    fn refresh_dependents(&mut self, previous: Option<usize>) {
        let record = &self.catalog.records()[self.current_index];

        let surah_changed = match previous {
            Some(index) => self.catalog.records()[index].surah_name != record.surah_name,
            None => true,
        };
        if surah_changed {
            if let Some(verses) = self.catalog.verse_range(&record.surah_name) {
                self.view.set_verse_range(verses);
            }
        }

        self.view.refresh(record);
        self.player.set_source(&record.audio_path);
    }
}
