// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Sidebar visibility for both breakpoints.
///
/// Only one flag is live at a time: `desktop_collapsed` above the desktop
/// breakpoint, `mobile_open` below it. The other keeps its value so a resize
/// mid-interaction does not lose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarState {
    pub mobile_open: bool,
    pub desktop_collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarPresentation {
    DesktopExpanded,
    DesktopCollapsed,
    MobileHidden,
    MobileOverlay,
}

impl SidebarState {
    pub fn toggle(&mut self, desktop: bool) {
        if desktop {
            self.desktop_collapsed = !self.desktop_collapsed;
        } else {
            self.mobile_open = !self.mobile_open;
        }
    }

    /// Close the mobile overlay. Desktop collapses instead of closing, so this
    /// does nothing there.
    pub fn close(&mut self, desktop: bool) -> bool {
        if desktop || !self.mobile_open {
            return false;
        }
        self.mobile_open = false;
        true
    }

    pub fn presentation(self, desktop: bool) -> SidebarPresentation {
        match (desktop, self.desktop_collapsed, self.mobile_open) {
            (true, false, _) => SidebarPresentation::DesktopExpanded,
            (true, true, _) => SidebarPresentation::DesktopCollapsed,
            (false, _, false) => SidebarPresentation::MobileHidden,
            (false, _, true) => SidebarPresentation::MobileOverlay,
        }
    }

    pub fn backdrop_visible(self, desktop: bool) -> bool {
        self.presentation(desktop) == SidebarPresentation::MobileOverlay
    }
}
