// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dashpro_app::{ListBody, PageControl, PaginationControls, list_body};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::palette::{Palette, Tone};
use crate::pages::{ListPage, TableCell, TableRow};
use crate::widgets::{ButtonVariant, button, loader_line};

/// Table plus pagination footer for one list page.
pub(crate) fn render_list<R: TableRow>(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<R>,
    palette: &Palette,
    spinner: usize,
) {
    let view = page.container.view();
    let controls = PaginationControls::for_view(&view);
    let footer_height = if controls.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(footer_height)])
        .split(area);

    match list_body(&view, page.container.is_loading(), R::EMPTY_MESSAGE) {
        ListBody::Loading => {
            let loader = Paragraph::new(loader_line(spinner, Some("Loading..."), palette))
                .alignment(Alignment::Center);
            frame.render_widget(loader, centered_line(chunks[0]));
        }
        ListBody::Empty(message) => {
            let empty = Paragraph::new(Line::from(Span::styled(
                message,
                palette.tone(Tone::Muted),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(empty, centered_line(chunks[0]));
        }
        ListBody::Rows(records) => {
            let header = Row::new(
                R::HEADERS
                    .iter()
                    .map(|title| Cell::from(title.to_uppercase()))
                    .collect::<Vec<_>>(),
            )
            .style(palette.tone(Tone::Muted).add_modifier(Modifier::BOLD));

            let rows = records.iter().enumerate().map(|(index, record)| {
                let cells = record.cells();
                let height = if cells.iter().any(|cell| cell.detail.is_some()) {
                    2
                } else {
                    1
                };
                let row = Row::new(cells.iter().map(|cell| table_cell(cell, palette)))
                    .height(height);
                if index == page.selected {
                    row.style(Style::default().bg(palette.selection))
                } else {
                    row
                }
            });

            let table = Table::new(rows, R::widths())
                .header(header)
                .column_spacing(2)
                .style(palette.surface_style());
            frame.render_widget(table, chunks[0]);
        }
    }

    if let Some(controls) = controls {
        frame.render_widget(Paragraph::new(pagination_line(&controls, palette)), chunks[1]);
    }
}

fn table_cell<'a>(cell: &TableCell, palette: &Palette) -> Cell<'a> {
    let mut lines = vec![Line::from(Span::styled(
        cell.text.clone(),
        palette.tone(cell.tone),
    ))];
    if let Some(detail) = &cell.detail {
        lines.push(Line::from(Span::styled(
            detail.clone(),
            palette.tone(Tone::Muted),
        )));
    }
    Cell::from(Text::from(lines))
}

pub(crate) fn pagination_line(controls: &PaginationControls, palette: &Palette) -> Line<'static> {
    let mut spans = vec![
        Span::styled(controls.summary.clone(), palette.tone(Tone::Muted)),
        Span::raw("   "),
    ];
    for control in PageControl::ALL {
        spans.push(button(
            control.label(),
            ButtonVariant::Ghost,
            !controls.enabled(control),
            palette,
        ));
        if control == PageControl::Prev {
            spans.push(Span::styled(
                format!(" {} ", controls.label()),
                palette.tone(Tone::Plain),
            ));
        }
    }
    Line::from(spans)
}

fn centered_line(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, area.height.min(1))
}
