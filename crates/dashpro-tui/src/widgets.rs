// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Small presentational pieces shared by every page.

use dashpro_app::{SearchInput, Trend};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding};

use crate::palette::{Palette, Tone};

pub(crate) const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ButtonVariant {
    Primary,
    Secondary,
    Ghost,
    Danger,
}

pub(crate) fn button(
    label: &str,
    variant: ButtonVariant,
    disabled: bool,
    palette: &Palette,
) -> Span<'static> {
    let text = match variant {
        ButtonVariant::Ghost => format!(" {label} "),
        _ => format!("[ {label} ]"),
    };
    if disabled {
        return Span::styled(
            text,
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::DIM),
        );
    }

    let style = match variant {
        ButtonVariant::Primary => Style::default()
            .fg(palette.background)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD),
        ButtonVariant::Secondary => Style::default().fg(palette.text).bg(palette.border),
        ButtonVariant::Ghost => Style::default().fg(palette.accent),
        ButtonVariant::Danger => Style::default()
            .fg(palette.background)
            .bg(palette.danger)
            .add_modifier(Modifier::BOLD),
    };
    Span::styled(text, style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardPadding {
    None,
    Small,
    Medium,
}

/// Bordered surface. Titles are optional; padding is inside the border.
pub(crate) fn card<'a>(
    title: Option<&'a str>,
    padding: CardPadding,
    palette: &Palette,
) -> Block<'a> {
    let padding = match padding {
        CardPadding::None => Padding::ZERO,
        CardPadding::Small => Padding::horizontal(1),
        CardPadding::Medium => Padding::new(2, 2, 1, 1),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_style())
        .style(palette.surface_style())
        .padding(padding);
    match title {
        Some(title) => block.title(Span::styled(format!(" {title} "), palette.heading())),
        None => block,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatCardModel {
    pub title: String,
    pub value: String,
    pub change: String,
    pub positive: bool,
    pub trend: Option<Trend>,
    pub description: Option<String>,
}

pub(crate) fn stat_card_lines(model: &StatCardModel, palette: &Palette) -> Vec<Line<'static>> {
    let tone = if model.positive {
        Tone::Success
    } else {
        Tone::Danger
    };
    let mut change = Vec::new();
    if let Some(trend) = model.trend {
        let arrow = match trend {
            Trend::Up => "↑ ",
            Trend::Down => "↓ ",
        };
        change.push(Span::styled(arrow, palette.tone(tone)));
    }
    change.push(Span::styled(model.change.clone(), palette.tone(tone)));
    if let Some(description) = &model.description {
        change.push(Span::styled(
            format!(" {description}"),
            palette.tone(Tone::Muted),
        ));
    }

    vec![
        Line::from(Span::styled(model.title.clone(), palette.tone(Tone::Muted))),
        Line::from(Span::styled(model.value.clone(), palette.heading())),
        Line::from(change),
    ]
}

/// Signed percentage with one decimal, dropping a trailing ".0".
pub(crate) fn format_change_percent(change: f64) -> String {
    if change.fract() == 0.0 {
        format!("{change:+.0}%")
    } else {
        format!("{change:+.1}%")
    }
}

pub(crate) fn loader_line(frame: usize, text: Option<&str>, palette: &Palette) -> Line<'static> {
    let spinner = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
    let mut spans = vec![Span::styled(spinner, palette.tone(Tone::Accent))];
    if let Some(text) = text {
        spans.push(Span::styled(format!(" {text}"), palette.tone(Tone::Muted)));
    }
    Line::from(spans)
}

pub(crate) fn search_input_line(
    search: &SearchInput,
    focused: bool,
    palette: &Palette,
) -> Line<'static> {
    let mut spans = vec![Span::styled("⌕ ", palette.tone(Tone::Muted))];
    if search.text().is_empty() && !focused {
        spans.push(Span::styled(
            search.placeholder(),
            palette.tone(Tone::Muted),
        ));
    } else {
        spans.push(Span::styled(search.text().to_owned(), palette.tone(Tone::Plain)));
    }
    if focused {
        spans.push(Span::styled("▏", palette.tone(Tone::Accent)));
    }
    if search.can_clear() {
        spans.push(Span::styled("  ✕ ctrl+u", palette.tone(Tone::Muted)));
    }
    Line::from(spans)
}

#[cfg(test)]
pub(crate) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}
