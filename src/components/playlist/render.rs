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

//! UI rendering logic for the playlist view.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table},
};

use crate::{components::PlaylistView, render::icons::ICON_PLAY, theme::Theme};

impl PlaylistView {
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let header_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border_colour))
            .padding(Padding::horizontal(1));

        let header_text = format!(
            "Playlist | {} songs | {}",
            self.summary.total_songs, self.summary.total_duration
        );

        f.render_widget(Paragraph::new(header_text).block(header_block), chunks[0]);

        if self.rows.is_empty() {
            let empty = Paragraph::new("No songs yet, add one with :add")
                .alignment(Alignment::Center)
                .fg(theme.table_index_fg);
            f.render_widget(empty, chunks[1]);
            return;
        }

        let rows = self.rows.iter().map(|row| {
            let (indicator, title_style) = if row.active {
                (
                    Line::from(ICON_PLAY).style(Style::default().fg(theme.accent_colour)),
                    Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
                )
            } else {
                (Line::from(""), Style::default().fg(theme.table_title_fg))
            };

            Row::new(vec![
                Cell::from(indicator),
                Cell::from(Line::from(row.index.to_string()).style(Style::default().fg(theme.table_index_fg)).alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from(Line::from(row.title.as_str()).style(title_style)),
                Cell::from(Line::from(row.artist.as_str()).style(Style::default().fg(theme.table_artist_fg))),
                Cell::from(Line::from(row.duration.as_str()).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Percentage(55),
                Constraint::Percentage(35),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("#").alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from("Title"),
                Cell::from("Artist"),
                Cell::from(Line::from("Time").alignment(Alignment::Right)),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.highlight_bg).fg(theme.highlight_fg))
        .block(Block::default().padding(Padding::horizontal(1)));

        f.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }
}
