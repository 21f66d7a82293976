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

//! Render the music player interface.
//!
//! This module renders the current song, the playback state, the progress
//! bar and the most recent status message.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use tunedeck::{PlaybackStatus, view};

use crate::{
    App,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_SHUFFLE, ICON_STOP},
};

const KEY_HINTS: &str = "space play/pause  n next  p previous  s shuffle  d remove  : command  q quit";

/// Renders the main player widget including song info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(22)])
        .split(chunks[0]);

    let state = app.player.state();
    let icon = match state.status() {
        PlaybackStatus::Playing => ICON_PLAY,
        PlaybackStatus::Loaded => ICON_PAUSE,
        PlaybackStatus::Idle => ICON_STOP,
    };

    let (title, artist) = view::now_playing(app.player.songs(), state.current_song_id);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut song_line = vec![
        Span::styled(format!(" {} ", icon), bold).fg(Color::White),
        Span::styled(title, bold).fg(app.theme.accent_colour),
    ];
    if !artist.is_empty() {
        song_line.push(Span::raw(" by "));
        song_line.push(Span::styled(artist, bold).fg(app.theme.accent_colour));
    }
    f.render_widget(Paragraph::new(Line::from(song_line)), info_chunks[0]);

    let progress = app.player.progress();
    if state.current_song_id.is_some() {
        let time_line = Line::from(vec![
            Span::styled(progress.elapsed_label(), bold).fg(app.theme.accent_colour),
            Span::styled(" / ", bold).fg(Color::White),
            Span::styled(progress.total_label(), bold).fg(app.theme.accent_colour),
            Span::styled(format!(" {:>3.0}%", progress.percent()), bold).fg(Color::White),
        ]);
        f.render_widget(Paragraph::new(time_line).alignment(Alignment::Right), info_chunks[1]);
    }

    let status_line = match &app.status {
        Some(status) if status.is_error => Line::from(status.text.as_str()).fg(app.theme.error_fg),
        Some(status) => Line::from(status.text.as_str()).fg(app.theme.status_fg),
        None => Line::from(format!("{ICON_SHUFFLE} {KEY_HINTS}")).fg(app.theme.border_colour),
    };
    f.render_widget(Paragraph::new(status_line), chunks[2]);

    let position_gauge = Gauge::default()
        .gauge_style(Style::default()
            .fg(app.theme.accent_colour)
            .bg(app.theme.gauge_track_colour)
        )
        .ratio(progress.percent() / 100.0)
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[4]);
}
