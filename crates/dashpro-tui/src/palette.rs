// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use ratatui::style::{Color, Modifier, Style};

/// Colours the whole frame is painted with. The theme preference picks one
/// of the two palettes; nothing else looks at the preference directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub selection: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Muted,
    Accent,
    Success,
    Warning,
    Danger,
}

const DARK: Palette = Palette {
    background: Color::Rgb(17, 24, 39),
    surface: Color::Rgb(31, 41, 55),
    border: Color::Rgb(55, 65, 81),
    text: Color::Rgb(243, 244, 246),
    muted: Color::Rgb(156, 163, 175),
    accent: Color::Rgb(96, 165, 250),
    success: Color::Rgb(74, 222, 128),
    warning: Color::Rgb(250, 204, 21),
    danger: Color::Rgb(248, 113, 113),
    selection: Color::Rgb(30, 58, 138),
};

const LIGHT: Palette = Palette {
    background: Color::Rgb(249, 250, 251),
    surface: Color::Rgb(255, 255, 255),
    border: Color::Rgb(209, 213, 219),
    text: Color::Rgb(17, 24, 39),
    muted: Color::Rgb(75, 85, 99),
    accent: Color::Rgb(37, 99, 235),
    success: Color::Rgb(22, 163, 74),
    warning: Color::Rgb(202, 138, 4),
    danger: Color::Rgb(220, 38, 38),
    selection: Color::Rgb(219, 234, 254),
};

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        if dark { DARK } else { LIGHT }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn tone(&self, tone: Tone) -> Style {
        let fg = match tone {
            Tone::Plain => self.text,
            Tone::Muted => self.muted,
            Tone::Accent => self.accent,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Danger => self.danger,
        };
        Style::default().fg(fg)
    }
}
