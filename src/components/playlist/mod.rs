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

//! Playlist table state.
//!
//! The view keeps the projected rows and the table cursor. Rows are rebuilt
//! by [`PlaylistView::refresh`] whenever the playlist or the current song
//! changes; the view never holds songs of its own.

mod event;
mod render;

use ratatui::widgets::TableState;

use tunedeck::{
    Song, SongId,
    view::{self, PlaylistRow, PlaylistSummary},
};

pub(crate) struct PlaylistView {
    pub(crate) rows: Vec<PlaylistRow>,
    pub(crate) summary: PlaylistSummary,
    pub(crate) table_state: TableState,
}

impl PlaylistView {
    pub(crate) fn new() -> Self {
        Self {
            rows: vec![],
            summary: view::summarize(&[]),
            table_state: TableState::new(),
        }
    }

    pub(crate) fn refresh(&mut self, songs: &[Song], current: Option<SongId>) {
        self.rows = view::project(songs, current);
        self.summary = view::summarize(songs);

        let len = self.rows.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    /// Moves the cursor onto the given song, if it is listed.
    pub(crate) fn reveal(&mut self, id: SongId) {
        if let Some(i) = self.rows.iter().position(|row| row.id == id) {
            self.table_state.select(Some(i));
        }
    }

    pub(crate) fn selected_id(&self) -> Option<SongId> {
        self.table_state.selected().and_then(|i| self.rows.get(i)).map(|row| row.id)
    }

    fn goto_next(&mut self) {
        let len = self.rows.len();
        if len == 0 { return; }
        let i = match self.table_state.selected() {
            Some(i) => if i >= len - 1 { 0 } else { i + 1 },
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.rows.len();
        if len == 0 { return; }
        let i = match self.table_state.selected() {
            Some(i) => if i == 0 { len - 1 } else { i - 1 },
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.rows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }
}
