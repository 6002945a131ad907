// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::layout::{SidebarPresentation, SidebarState};
use crate::{NavItem, PageKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Nav,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_page: PageKind,
    pub sidebar: SidebarState,
    pub desktop: bool,
    pub dark_mode: bool,
    pub focus: Focus,
    pub overlay: Overlay,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_page: PageKind::Dashboard,
            sidebar: SidebarState::default(),
            desktop: true,
            dark_mode: false,
            focus: Focus::Nav,
            overlay: Overlay::None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(NavItem),
    NextPage,
    PrevPage,
    ToggleSidebar,
    CloseSidebar,
    SetDesktop(bool),
    SetDarkMode(bool),
    FocusSearch,
    BlurSearch,
    ToggleHelp,
    ToggleNotifications,
    CloseOverlay,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PageChanged(PageKind),
    SidebarChanged(SidebarState),
    BreakpointChanged(bool),
    ThemeChanged(bool),
    FocusChanged(Focus),
    OverlayChanged(Overlay),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn sidebar_presentation(&self) -> SidebarPresentation {
        self.sidebar.presentation(self.desktop)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(item) => self.navigate(item),
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::ToggleSidebar => {
                self.sidebar.toggle(self.desktop);
                tracing::debug!(desktop = self.desktop, sidebar = ?self.sidebar, "sidebar toggled");
                vec![AppEvent::SidebarChanged(self.sidebar)]
            }
            AppCommand::CloseSidebar => self.close_sidebar(),
            AppCommand::SetDesktop(desktop) => {
                if self.desktop == desktop {
                    return Vec::new();
                }
                self.desktop = desktop;
                tracing::debug!(desktop, "breakpoint changed");
                vec![AppEvent::BreakpointChanged(desktop)]
            }
            AppCommand::SetDarkMode(dark) => {
                if self.dark_mode == dark {
                    return Vec::new();
                }
                self.dark_mode = dark;
                vec![AppEvent::ThemeChanged(dark)]
            }
            AppCommand::FocusSearch => self.set_focus(Focus::Search),
            AppCommand::BlurSearch => self.set_focus(Focus::Nav),
            AppCommand::ToggleHelp => self.toggle_overlay(Overlay::Help),
            AppCommand::ToggleNotifications => self.toggle_overlay(Overlay::Notifications),
            AppCommand::CloseOverlay => {
                if self.overlay == Overlay::None {
                    return Vec::new();
                }
                self.overlay = Overlay::None;
                vec![AppEvent::OverlayChanged(self.overlay)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Choosing a sidebar entry always closes the mobile overlay, whether or
    /// not the entry has a page behind it.
    fn navigate(&mut self, item: NavItem) -> Vec<AppEvent> {
        let mut events = self.close_sidebar();
        match item.page() {
            Some(page) if page != self.active_page => {
                events.extend(self.switch_page(page));
            }
            Some(_) => {}
            None => {
                let message = format!("{} is not available yet", item.label());
                events.push(self.set_status(&message));
            }
        }
        events
    }

    fn close_sidebar(&mut self) -> Vec<AppEvent> {
        if self.sidebar.close(self.desktop) {
            tracing::debug!("mobile sidebar closed");
            vec![AppEvent::SidebarChanged(self.sidebar)]
        } else {
            Vec::new()
        }
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let pages = PageKind::ALL;
        let current = pages
            .iter()
            .position(|page| *page == self.active_page)
            .unwrap_or(0) as isize;
        let len = pages.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.switch_page(pages[next])
    }

    fn switch_page(&mut self, page: PageKind) -> Vec<AppEvent> {
        self.active_page = page;
        self.focus = Focus::Nav;
        tracing::debug!(page = page.route(), "page changed");
        vec![AppEvent::PageChanged(page)]
    }

    fn set_focus(&mut self, focus: Focus) -> Vec<AppEvent> {
        if self.focus == focus {
            return Vec::new();
        }
        self.focus = focus;
        vec![AppEvent::FocusChanged(focus)]
    }

    fn toggle_overlay(&mut self, overlay: Overlay) -> Vec<AppEvent> {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
        vec![AppEvent::OverlayChanged(self.overlay)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
