use serde::{Deserialize, Serialize};

pub const VIEWER_PRESET_LIST: &[&str] = &["feh", "imv", "xdg-open", "open"];

/// Players tried in order when `audio_player` is `"auto"`.
pub const AUDIO_PLAYER_PRESET_LIST: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("paplay", &[]),
    ("afplay", &[]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: String,
    pub media_root: String,
    pub audio_player: String,
    pub default_viewer: String,
    pub autoplay_on_start: bool,
}

impl Settings {
    pub fn merge(&mut self, other: Self) {
        self.database = other.database;
        self.media_root = other.media_root;
        self.audio_player = other.audio_player;
        self.default_viewer = other.default_viewer;
        self.autoplay_on_start = other.autoplay_on_start;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: "aya.db".to_string(),
            media_root: "q_files".to_string(),
            audio_player: "auto".to_string(),
            default_viewer: "auto".to_string(),
            autoplay_on_start: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub next_verse: String,
    pub prev_verse: String,
    pub play: String,
    pub select_surah: String,
    pub select_verse: String,
    pub open_image: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            next_verse: "l".to_string(),
            prev_verse: "h".to_string(),
            play: "p".to_string(),
            select_surah: "s".to_string(),
            select_verse: "a".to_string(),
            open_image: "o".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl CfgDefaultKeymaps {
    pub fn merge(&mut self, other: Self) {
        self.next_verse = other.next_verse;
        self.prev_verse = other.prev_verse;
        self.play = other.play;
        self.select_surah = other.select_surah;
        self.select_verse = other.select_verse;
        self.open_image = other.open_image;
        self.help = other.help;
        self.quit = other.quit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.database, "aya.db");
        assert_eq!(settings.media_root, "q_files");
        assert_eq!(settings.audio_player, "auto");
        assert_eq!(settings.default_viewer, "auto");
        assert!(!settings.autoplay_on_start);
    }

    #[test]
    fn test_settings_partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"media_root": "/srv/quran"}"#).unwrap();
        assert_eq!(settings.media_root, "/srv/quran");
        assert_eq!(settings.database, "aya.db");
        assert_eq!(settings.audio_player, "auto");
    }

    #[test]
    fn test_settings_merge_overrides_all_fields() {
        let mut base = Settings::default();
        let other = Settings {
            database: "other.db".to_string(),
            media_root: "media".to_string(),
            audio_player: "mpv {}".to_string(),
            default_viewer: "imv".to_string(),
            autoplay_on_start: true,
        };
        base.merge(other.clone());
        assert_eq!(base, other);
    }

    #[test]
    fn test_cfg_default_keymaps_default() {
        let keymaps = CfgDefaultKeymaps::default();
        assert_eq!(keymaps.next_verse, "l");
        assert_eq!(keymaps.prev_verse, "h");
        assert_eq!(keymaps.play, "p");
        assert_eq!(keymaps.select_surah, "s");
        assert_eq!(keymaps.select_verse, "a");
        assert_eq!(keymaps.open_image, "o");
        assert_eq!(keymaps.help, "?");
        assert_eq!(keymaps.quit, "q");
    }

    #[test]
    fn test_cfg_default_keymaps_merge() {
        let mut base = CfgDefaultKeymaps::default();
        let mut other = CfgDefaultKeymaps::default();
        other.next_verse = "n".to_string();
        other.quit = "Ctrl+q".to_string();
        base.merge(other);
        assert_eq!(base.next_verse, "n");
        assert_eq!(base.quit, "Ctrl+q");
        assert_eq!(base.prev_verse, "h");
    }

    #[test]
    fn test_preset_lists() {
        assert!(VIEWER_PRESET_LIST.contains(&"feh"));
        assert!(AUDIO_PLAYER_PRESET_LIST.iter().any(|(name, _)| *name == "mpv"));
    }
}
