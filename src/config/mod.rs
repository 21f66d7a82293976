// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file, stored with
//! `confy` in the platform's configuration directory. A missing file is
//! created with the defaults on first load.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "tunedeck";

/// Royalty-free tracks played for remote songs that carry no audio.
const SAMPLE_MUSIC_URLS: &[&str] = &[
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-5.mp3",
];

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    pub store: StoreConfig,
    pub embed_audio: bool,
    pub fallback_urls: Vec<String>,
    pub log_level: String,
    pub log_file: PathBuf,
}

/// Where the playlist lives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    Memory,
    Local { database: PathBuf },
    Remote { base_url: String, timeout_secs: u64 },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local {
            database: PathBuf::from("tunedeck.db"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            store: StoreConfig::default(),
            embed_audio: false,
            fallback_urls: SAMPLE_MUSIC_URLS.iter().map(|url| url.to_string()).collect(),
            log_level: "info".to_string(),
            log_file: PathBuf::from("tunedeck.log"),
        }
    }
}

impl AppConfig {
    /// Whether added files are embedded as data URLs.
    ///
    /// Always true for the remote store, which keeps the audio itself.
    pub fn embeds_audio(&self) -> bool {
        self.embed_audio || matches!(self.store, StoreConfig::Remote { .. })
    }
}

impl StoreConfig {
    pub fn remote(base_url: impl Into<String>) -> Self {
        StoreConfig::Remote {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
