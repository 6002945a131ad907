// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod list_view;
mod pages;
mod palette;
mod widgets;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use dashpro_app::{
    ActivityKind, AppCommand, AppEvent, AppState, DEFAULT_SEARCH_DEBOUNCE, DashboardSnapshot,
    Focus, MediaQuery, MediaQueryObserver, NavItem, Notification, Overlay, PageControl, PageKind,
    PreferenceStore, Product, ScheduledTask, SidebarPresentation, ThemePreference, Trend, User,
    Viewport, ViewportSignals, earliest, prefers_dark_from_colorfgbg, unread_count,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::env;
use std::io;
use std::time::{Duration, Instant};

use crate::list_view::render_list;
use crate::pages::{DashboardPage, ListPage, MountedPage, TableRow};
use crate::palette::{Palette, Tone};
use crate::widgets::{
    ButtonVariant, CardPadding, StatCardModel, button, card, format_change_percent, loader_line,
    search_input_line, stat_card_lines,
};

pub const DEFAULT_DESKTOP_BREAKPOINT: u16 = 100;
pub const DEFAULT_PAGE_SIZE: usize = 8;

const TICK: Duration = Duration::from_millis(120);
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const SIDEBAR_EXPANDED_WIDTH: u16 = 24;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 7;
// Border, brand, spacer.
const NAV_FIRST_ROW: u16 = 3;
const METRIC_BAR_WIDTH: usize = 20;
const BRAND: &str = "DashPro";
const BRAND_SHORT: &str = "DP";
const PROFILE_NAME: &str = "Demo User";
const PROFILE_EMAIL: &str = "admin@example.com";

/// Everything the UI needs from the outside world.
pub trait AppRuntime {
    fn load_dashboard(&mut self) -> Result<DashboardSnapshot>;
    fn load_products(&mut self) -> Result<Vec<Product>>;
    fn load_users(&mut self) -> Result<Vec<User>>;
    fn load_notifications(&mut self) -> Result<Vec<Notification>>;
    fn preferences(&mut self) -> &mut PreferenceStore;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub desktop_breakpoint: u16,
    pub page_size: usize,
    pub search_debounce: Duration,
    pub simulate_latency: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            desktop_breakpoint: DEFAULT_DESKTOP_BREAKPOINT,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            simulate_latency: true,
        }
    }
}

impl UiOptions {
    pub fn load_delay(&self, simulated: Duration) -> Duration {
        if self.simulate_latency {
            simulated
        } else {
            Duration::ZERO
        }
    }
}

struct ViewData {
    options: UiOptions,
    page: MountedPage,
    notifications: Vec<Notification>,
    theme: ThemePreference,
    theme_persisted: bool,
    viewport: Viewport,
    desktop_query: MediaQueryObserver,
    status_clear: ScheduledTask,
    nav_cursor: usize,
    spinner: usize,
}

impl ViewData {
    fn new<R: AppRuntime>(
        state: &mut AppState,
        runtime: &mut R,
        options: UiOptions,
        signals: ViewportSignals,
        now: Instant,
    ) -> Result<Self> {
        let viewport = Viewport::new(signals);
        let desktop_query = viewport.observe(MediaQuery::MinWidth(options.desktop_breakpoint));
        let os_prefers_dark = viewport.observe(MediaQuery::PrefersDark).matches();
        let theme = ThemePreference::load(runtime.preferences(), os_prefers_dark);

        state.dispatch(AppCommand::SetDesktop(desktop_query.matches()));
        state.dispatch(AppCommand::SetDarkMode(theme.is_dark()));

        let notifications = match runtime.load_notifications() {
            Ok(notifications) => notifications,
            Err(error) => {
                let error = format!("{error:#}");
                tracing::warn!(%error, "notifications unavailable");
                Vec::new()
            }
        };
        let page = MountedPage::mount(state.active_page, &options, now)?;

        Ok(Self {
            options,
            page,
            notifications,
            theme,
            theme_persisted: false,
            viewport,
            desktop_query,
            status_clear: ScheduledTask::default(),
            nav_cursor: nav_index(state.active_page),
            spinner: 0,
        })
    }

    fn screen(&self) -> Rect {
        let signals = self.viewport.signals();
        Rect::new(0, 0, signals.width, signals.height)
    }

    fn next_deadline(&self) -> Option<Instant> {
        earliest([self.page.next_deadline(), self.status_clear.due()])
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    let (width, height) = terminal::size().context("read terminal size")?;
    let colorfgbg = env::var("COLORFGBG").ok();
    let signals = ViewportSignals {
        width,
        height,
        prefers_dark: prefers_dark_from_colorfgbg(colorfgbg.as_deref()),
    };
    let mut view_data = ViewData::new(state, runtime, options, signals, Instant::now())?;
    tracing::info!(
        width,
        height,
        desktop = state.desktop,
        dark = state.dark_mode,
        "starting ui"
    );

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(());
    loop {
        tick(state, runtime, &mut view_data, Instant::now());

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }
        if !view_data.theme_persisted {
            persist_theme(state, runtime, &mut view_data, Instant::now());
        }

        let now = Instant::now();
        let timeout = view_data
            .next_deadline()
            .map_or(TICK, |deadline| deadline.saturating_duration_since(now).min(TICK));
        let next = match event::poll(timeout) {
            Ok(true) => event::read().map(Some).context("read event"),
            Ok(false) => Ok(None),
            Err(error) => Err(error).context("poll event"),
        };
        match next {
            Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                if handle_key_event(state, runtime, &mut view_data, key, Instant::now()) {
                    break;
                }
            }
            Ok(Some(Event::Mouse(mouse))) => {
                handle_mouse_event(state, &mut view_data, mouse, Instant::now());
            }
            Ok(Some(Event::Resize(width, height))) => view_data.viewport.resize(width, height),
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen)
        .context("leave alternate screen")?;
    result
}

/// Advance everything that runs on a clock: breakpoint changes, theme writes
/// from elsewhere, page loads, the search debounce, and the status timeout.
fn tick<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    view_data.spinner = view_data.spinner.wrapping_add(1);

    if let Some(desktop) = view_data.desktop_query.poll_change() {
        dispatch(state, view_data, AppCommand::SetDesktop(desktop), now);
    }
    if view_data.theme.sync() {
        let dark = view_data.theme.is_dark();
        dispatch(state, view_data, AppCommand::SetDarkMode(dark), now);
    }

    let loaded = match &mut view_data.page {
        MountedPage::Dashboard(page) => page.poll(now, || runtime.load_dashboard()),
        MountedPage::Products(page) => page.poll(now, || runtime.load_products()),
        MountedPage::Users(page) => page.poll(now, || runtime.load_users()),
    };
    if let Err(error) = loaded {
        let error = format!("{error:#}");
        tracing::error!(%error, "page load failed");
        emit_status(state, view_data, format!("load failed: {error}"), now);
    }

    if view_data.status_clear.fire(now) {
        state.dispatch(AppCommand::ClearStatus);
    }
}

fn dispatch(state: &mut AppState, view_data: &mut ViewData, command: AppCommand, now: Instant) {
    for event in state.dispatch(command) {
        match event {
            AppEvent::PageChanged(page) => remount(state, view_data, page, now),
            AppEvent::SidebarChanged(sidebar) if sidebar.mobile_open => {
                view_data.nav_cursor = nav_index(state.active_page);
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_clear = ScheduledTask::after(now, STATUS_CLEAR_DELAY);
            }
            _ => {}
        }
    }
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    message: impl Into<String>,
    now: Instant,
) {
    dispatch(state, view_data, AppCommand::SetStatus(message.into()), now);
}

fn remount(state: &mut AppState, view_data: &mut ViewData, page: PageKind, now: Instant) {
    match MountedPage::mount(page, &view_data.options, now) {
        Ok(mounted) => view_data.page = mounted,
        Err(error) => {
            let error = format!("{error:#}");
            tracing::error!(%error, page = page.route(), "page mount failed");
            emit_status(
                state,
                view_data,
                format!("cannot open {}: {error}", page.label()),
                now,
            );
        }
    }
}

fn nav_index(page: PageKind) -> usize {
    NavItem::ALL
        .iter()
        .position(|item| item.page() == Some(page))
        .unwrap_or(0)
}

/// Store the theme once the first frame is up, so an OS-derived choice sticks.
fn persist_theme<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    view_data.theme_persisted = true;
    if let Err(error) = view_data.theme.persist(runtime.preferences()) {
        let error = format!("{error:#}");
        tracing::error!(%error, "theme preference not saved");
        emit_status(state, view_data, format!("theme not saved: {error}"), now);
    }
}

fn toggle_theme<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let saved = view_data.theme.toggle(runtime.preferences());
    let dark = view_data.theme.is_dark();
    dispatch(state, view_data, AppCommand::SetDarkMode(dark), now);
    if let Err(error) = saved {
        let error = format!("{error:#}");
        tracing::error!(%error, dark, "theme preference not saved");
        emit_status(state, view_data, format!("theme not saved: {error}"), now);
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
    now: Instant,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('q') {
        return true;
    }

    let confirming = view_data
        .page
        .list()
        .is_some_and(|list| list.confirming().is_some());
    if confirming {
        handle_confirm_key(state, view_data, key, now);
        return false;
    }

    if state.overlay != Overlay::None {
        match key.code {
            KeyCode::Esc => dispatch(state, view_data, AppCommand::CloseOverlay, now),
            KeyCode::Char('?') => dispatch(state, view_data, AppCommand::ToggleHelp, now),
            KeyCode::Char('n') => dispatch(state, view_data, AppCommand::ToggleNotifications, now),
            _ => {}
        }
        return false;
    }

    if state.focus == Focus::Search {
        handle_search_key(state, view_data, key, now);
        return false;
    }

    if ctrl {
        if key.code == KeyCode::Char('b') {
            dispatch(state, view_data, AppCommand::ToggleSidebar, now);
        }
        return false;
    }

    let mobile_nav = state.sidebar_presentation() == SidebarPresentation::MobileOverlay;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => dispatch(state, view_data, AppCommand::CloseSidebar, now),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            if let Some(item) = NavItem::ALL.get(index).copied() {
                dispatch(state, view_data, AppCommand::Navigate(item), now);
            }
        }
        KeyCode::Tab => dispatch(state, view_data, AppCommand::NextPage, now),
        KeyCode::BackTab => dispatch(state, view_data, AppCommand::PrevPage, now),
        KeyCode::Char('/') if view_data.page.list().is_some() => {
            dispatch(state, view_data, AppCommand::FocusSearch, now);
        }
        KeyCode::Char('t') => toggle_theme(state, runtime, view_data, now),
        KeyCode::Char('n') => dispatch(state, view_data, AppCommand::ToggleNotifications, now),
        KeyCode::Char('?') => dispatch(state, view_data, AppCommand::ToggleHelp, now),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(view_data, mobile_nav, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(view_data, mobile_nav, -1),
        KeyCode::Enter if mobile_nav => {
            if let Some(item) = NavItem::ALL.get(view_data.nav_cursor).copied() {
                dispatch(state, view_data, AppCommand::Navigate(item), now);
            }
        }
        KeyCode::Left | KeyCode::Char('[') => go_to_page(view_data, PageControl::Prev),
        KeyCode::Right | KeyCode::Char(']') => go_to_page(view_data, PageControl::Next),
        KeyCode::Char('{') => go_to_page(view_data, PageControl::First),
        KeyCode::Char('}') => go_to_page(view_data, PageControl::Last),
        KeyCode::Char('d') => {
            if let Some(list) = view_data.page.list_mut() {
                list.request_delete();
            }
        }
        KeyCode::Char('r') => {
            let message = match &mut view_data.page {
                MountedPage::Users(page) => page.cycle_role(),
                _ => None,
            };
            if let Some(message) = message {
                emit_status(state, view_data, message, now);
            }
        }
        _ => {}
    }
    false
}

fn handle_confirm_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent, now: Instant) {
    let message = match key.code {
        KeyCode::Char('y') | KeyCode::Enter => view_data
            .page
            .list_mut()
            .and_then(|list| list.confirm_delete()),
        KeyCode::Char('n') | KeyCode::Esc => {
            if let Some(list) = view_data.page.list_mut() {
                list.cancel_delete();
            }
            None
        }
        _ => None,
    };
    if let Some(message) = message {
        emit_status(state, view_data, message, now);
    }
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent, now: Instant) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(list) = view_data.page.list_mut() else {
        dispatch(state, view_data, AppCommand::BlurSearch, now);
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            dispatch(state, view_data, AppCommand::BlurSearch, now);
        }
        KeyCode::Char('u') if ctrl => list.clear_search(),
        KeyCode::Backspace => list.backspace(now),
        KeyCode::Char(ch) if !ctrl => list.type_char(ch, now),
        _ => {}
    }
}

fn move_cursor(view_data: &mut ViewData, mobile_nav: bool, delta: isize) {
    if mobile_nav {
        let last = NavItem::ALL.len() as isize - 1;
        view_data.nav_cursor = (view_data.nav_cursor as isize + delta).clamp(0, last) as usize;
    } else if let Some(list) = view_data.page.list_mut() {
        list.move_selection(delta);
    }
}

fn go_to_page(view_data: &mut ViewData, control: PageControl) {
    if let Some(list) = view_data.page.list_mut() {
        list.go_to(control);
    }
}

fn handle_mouse_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    mouse: MouseEvent,
    now: Instant,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    // The delete prompt is modal; it only answers to y/n.
    if view_data
        .page
        .list()
        .is_some_and(|list| list.confirming().is_some())
    {
        return;
    }
    let shell = shell_areas(view_data.screen(), state.sidebar_presentation());
    if let Some(sidebar) = shell.sidebar
        && sidebar.contains(Position::new(mouse.column, mouse.row))
    {
        if let Some(item) = nav_item_at(sidebar, mouse.row) {
            dispatch(state, view_data, AppCommand::Navigate(item), now);
        }
        return;
    }
    if state.sidebar.backdrop_visible(state.desktop) {
        dispatch(state, view_data, AppCommand::CloseSidebar, now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShellAreas {
    sidebar: Option<Rect>,
    main: Rect,
    backdrop: bool,
}

fn shell_areas(area: Rect, presentation: SidebarPresentation) -> ShellAreas {
    let docked_width = match presentation {
        SidebarPresentation::DesktopExpanded => SIDEBAR_EXPANDED_WIDTH,
        SidebarPresentation::DesktopCollapsed => SIDEBAR_COLLAPSED_WIDTH,
        SidebarPresentation::MobileHidden => {
            return ShellAreas {
                sidebar: None,
                main: area,
                backdrop: false,
            };
        }
        SidebarPresentation::MobileOverlay => {
            return ShellAreas {
                sidebar: Some(Rect {
                    width: SIDEBAR_EXPANDED_WIDTH.min(area.width),
                    ..area
                }),
                main: area,
                backdrop: true,
            };
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(docked_width), Constraint::Min(1)])
        .split(area);
    ShellAreas {
        sidebar: Some(chunks[0]),
        main: chunks[1],
        backdrop: false,
    }
}

fn nav_item_at(sidebar: Rect, row: u16) -> Option<NavItem> {
    let index = row.checked_sub(sidebar.y + NAV_FIRST_ROW)?;
    NavItem::ALL.get(usize::from(index)).copied()
}

fn render(frame: &mut Frame<'_>, state: &AppState, view_data: &ViewData) {
    let palette = Palette::for_theme(state.dark_mode);
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let presentation = state.sidebar_presentation();
    let shell = shell_areas(area, presentation);
    render_main(frame, shell.main, state, view_data, &palette);

    if let Some(sidebar) = shell.sidebar {
        if shell.backdrop {
            frame
                .buffer_mut()
                .set_style(shell.main, Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(Clear, sidebar);
        }
        render_sidebar(frame, sidebar, state, view_data, presentation, &palette);
    }

    match state.overlay {
        Overlay::Help => {
            let popup = centered_rect(70, 70, area);
            frame.render_widget(Clear, popup);
            let help = Paragraph::new(help_overlay_text())
                .style(palette.surface_style())
                .block(card(Some("help"), CardPadding::Small, &palette));
            frame.render_widget(help, popup);
        }
        Overlay::Notifications => render_notifications(frame, area, view_data, &palette),
        Overlay::None => {}
    }

    if let Some(prompt) = view_data.page.list().and_then(|list| list.confirming()) {
        render_confirm(frame, area, prompt, &palette);
    }
}

fn render_main(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    palette: &Palette,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let topbar = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.border_style())
        .style(palette.surface_style());
    let topbar_inner = topbar.inner(layout[0]);
    frame.render_widget(topbar, layout[0]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("≡ ", palette.tone(Tone::Accent)),
            Span::styled(state.active_page.label(), palette.heading()),
        ])),
        topbar_inner,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            topbar_right_text(state, view_data),
            palette.tone(Tone::Muted),
        )))
        .alignment(Alignment::Right),
        topbar_inner,
    );

    let body = Rect {
        x: layout[1].x + 1,
        width: layout[1].width.saturating_sub(2),
        ..layout[1]
    };
    let search_focused = state.focus == Focus::Search;
    match &view_data.page {
        MountedPage::Dashboard(page) => {
            render_dashboard(frame, body, page, palette, view_data.spinner);
        }
        MountedPage::Products(page) => {
            render_products(frame, body, page, search_focused, palette, view_data.spinner);
        }
        MountedPage::Users(page) => {
            render_users(frame, body, page, search_focused, palette, view_data.spinner);
        }
    }

    let status_style = if state.status_line.is_some() {
        palette.tone(Tone::Warning)
    } else {
        palette.tone(Tone::Muted)
    };
    frame.render_widget(
        Paragraph::new(status_text(state, view_data)).style(status_style),
        layout[2],
    );
}

fn render_sidebar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    presentation: SidebarPresentation,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_style())
        .style(palette.surface_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(sidebar_lines(state, view_data.nav_cursor, presentation, palette)),
        inner,
    );

    let nav_rows = NAV_FIRST_ROW - 1 + NavItem::ALL.len() as u16;
    if presentation != SidebarPresentation::DesktopCollapsed && inner.height >= nav_rows + 3 {
        let footer = Rect {
            y: inner.bottom() - 2,
            height: 2,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(PROFILE_NAME, palette.heading())),
                Line::from(Span::styled(PROFILE_EMAIL, palette.tone(Tone::Muted))),
            ]),
            footer,
        );
    }
}

fn sidebar_lines(
    state: &AppState,
    nav_cursor: usize,
    presentation: SidebarPresentation,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let collapsed = presentation == SidebarPresentation::DesktopCollapsed;
    let brand = if collapsed { BRAND_SHORT } else { BRAND };
    let mut lines = vec![
        Line::from(Span::styled(
            brand,
            palette.tone(Tone::Accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    for (index, item) in NavItem::ALL.iter().enumerate() {
        let text = if collapsed {
            format!(" {} ", item.glyph())
        } else {
            format!(" {} {} {}", index + 1, item.glyph(), item.label())
        };
        let mut style = if item.page() == Some(state.active_page) {
            Style::default()
                .fg(palette.background)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            palette.tone(Tone::Plain)
        };
        if presentation == SidebarPresentation::MobileOverlay && index == nav_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines
}

fn topbar_right_text(state: &AppState, view_data: &ViewData) -> String {
    let theme = if state.dark_mode { "☾ dark" } else { "☀ light" };
    let unread = unread_count(&view_data.notifications);
    format!("{theme}   ✉ {unread}   {PROFILE_NAME} ")
}

fn page_header<'a>(title: &'a str, subtitle: &'a str, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(title, palette.heading())),
        Line::from(Span::styled(subtitle, palette.tone(Tone::Muted))),
    ])
}

fn render_dashboard(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &DashboardPage,
    palette: &Palette,
    spinner: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);
    frame.render_widget(
        page_header(
            "Dashboard Overview",
            "Welcome back! Here's what's happening with your business today.",
            palette,
        ),
        chunks[0],
    );

    let Some(snapshot) = page.snapshot.as_ref() else {
        let loader = Paragraph::new(loader_line(spinner, Some("Loading dashboard..."), palette))
            .alignment(Alignment::Center);
        frame.render_widget(loader, chunks[2]);
        return;
    };

    render_stat_row(
        frame,
        chunks[1],
        snapshot
            .stats
            .iter()
            .map(|stat| StatCardModel {
                title: stat.label.clone(),
                value: stat.value.clone(),
                change: format_change_percent(stat.change_percent),
                positive: stat.positive,
                trend: Some(stat.trend),
                description: Some(stat.description.clone()),
            })
            .collect(),
        palette,
    );

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    let activity = snapshot
        .activity
        .iter()
        .flat_map(|entry| {
            let tone = match entry.kind {
                ActivityKind::Order => Tone::Accent,
                ActivityKind::Payment => Tone::Success,
                ActivityKind::User => Tone::Warning,
            };
            [
                Line::from(vec![
                    Span::styled("● ", palette.tone(tone)),
                    Span::styled(entry.title.clone(), palette.tone(Tone::Plain)),
                    Span::styled(format!("  {}", entry.time_label), palette.tone(Tone::Muted)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", entry.description),
                    palette.tone(Tone::Muted),
                )),
            ]
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(activity).block(card(
            Some("Recent Activity"),
            CardPadding::Small,
            palette,
        )),
        middle[0],
    );

    let metrics = snapshot
        .metrics
        .iter()
        .flat_map(|metric| {
            let tone = if metric.positive {
                Tone::Success
            } else {
                Tone::Danger
            };
            [
                Line::from(vec![
                    Span::styled(metric.label.clone(), palette.tone(Tone::Muted)),
                    Span::styled(format!("  {}", metric.value), palette.heading()),
                    Span::styled(format!("  {}", metric.change), palette.tone(tone)),
                ]),
                Line::from(Span::styled(
                    metric_bar(metric.bar_percent()),
                    palette.tone(Tone::Accent),
                )),
            ]
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(metrics).block(card(
            Some("Performance Metrics"),
            CardPadding::Small,
            palette,
        )),
        middle[1],
    );

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, snapshot.tiles.len().max(1) as u32);
            snapshot.tiles.len()
        ])
        .split(chunks[3]);
    for (tile, area) in snapshot.tiles.iter().zip(tiles.iter()) {
        let line = Line::from(vec![
            Span::styled(tile.value.clone(), palette.heading()),
            Span::styled(format!("  {}", tile.label), palette.tone(Tone::Muted)),
        ]);
        frame.render_widget(
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .block(card(None, CardPadding::None, palette)),
            *area,
        );
    }
}

fn metric_bar(percent: u16) -> String {
    let filled = usize::from(percent.min(100)) * METRIC_BAR_WIDTH / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(METRIC_BAR_WIDTH - filled)
    )
}

fn render_stat_row(
    frame: &mut Frame<'_>,
    area: Rect,
    cards: Vec<StatCardModel>,
    palette: &Palette,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, cards.len().max(1) as u32);
            cards.len()
        ])
        .split(area);
    for (model, area) in cards.iter().zip(columns.iter()) {
        frame.render_widget(
            Paragraph::new(stat_card_lines(model, palette))
                .block(card(None, CardPadding::Small, palette)),
            *area,
        );
    }
}

fn render_search<R: TableRow>(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<R>,
    focused: bool,
    palette: &Palette,
) {
    let block = card(None, CardPadding::Small, palette).border_style(if focused {
        palette.tone(Tone::Accent)
    } else {
        palette.border_style()
    });
    frame.render_widget(
        Paragraph::new(search_input_line(&page.search, focused, palette)).block(block),
        area,
    );
}

fn render_list_card<R: TableRow>(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<R>,
    palette: &Palette,
    spinner: usize,
) {
    let block = card(None, CardPadding::Small, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_list(frame, inner, page, palette, spinner);
}

fn render_products(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<Product>,
    search_focused: bool,
    palette: &Palette,
    spinner: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);
    render_header_with_action(
        frame,
        chunks[0],
        "Product Management",
        "Manage your products, inventory, and pricing",
        "Add Product",
        palette,
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(chunks[1]);
    let total = if page.container.is_loading() {
        loader_line(spinner, None, palette)
    } else {
        Line::from(Span::styled(
            page.container.records().len().to_string(),
            palette.heading(),
        ))
    };
    frame.render_widget(
        Paragraph::new(total).block(card(Some("Total Products"), CardPadding::Small, palette)),
        cards[0],
    );
    for ((title, description), area) in QUICK_ACTIONS.iter().zip(cards.iter().skip(1)) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                *description,
                palette.tone(Tone::Muted),
            )))
            .block(card(Some(*title), CardPadding::Small, palette)),
            *area,
        );
    }

    render_search(frame, chunks[2], page, search_focused, palette);
    render_list_card(frame, chunks[3], page, palette, spinner);
}

const QUICK_ACTIONS: [(&str, &str); 4] = [
    ("Import Products", "Bulk import from CSV"),
    ("Sales Report", "View sales analytics"),
    ("Categories", "Manage categories"),
    ("More Actions", "Additional options"),
];

fn render_users(
    frame: &mut Frame<'_>,
    area: Rect,
    page: &ListPage<User>,
    search_focused: bool,
    palette: &Palette,
    spinner: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);
    render_header_with_action(
        frame,
        chunks[0],
        "User Management",
        "Manage user accounts, roles, and permissions",
        "Add User",
        palette,
    );

    let counts = page.role_counts();
    let stat = |title: &str, value: usize, change: &str| StatCardModel {
        title: title.to_owned(),
        value: if page.container.is_loading() {
            "…".to_owned()
        } else {
            value.to_string()
        },
        change: change.to_owned(),
        positive: true,
        trend: Some(Trend::Up),
        description: None,
    };
    render_stat_row(
        frame,
        chunks[1],
        vec![
            stat("Total Users", counts.total, "+12%"),
            stat("Active Now", counts.active, "+8%"),
            stat("Admins", counts.admins, "+2"),
        ],
        palette,
    );

    render_search(frame, chunks[2], page, search_focused, palette);
    render_list_card(frame, chunks[3], page, palette, spinner);
}

fn render_header_with_action(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    subtitle: &str,
    action: &str,
    palette: &Palette,
) {
    frame.render_widget(page_header(title, subtitle, palette), area);
    frame.render_widget(
        Paragraph::new(Line::from(button(
            action,
            ButtonVariant::Primary,
            false,
            palette,
        )))
        .alignment(Alignment::Right),
        area,
    );
}

fn render_notifications(
    frame: &mut Frame<'_>,
    area: Rect,
    view_data: &ViewData,
    palette: &Palette,
) {
    let width = 44.min(area.width);
    let height = (view_data.notifications.len() as u16 * 2 + 2).max(3).min(area.height);
    let popup = Rect::new(area.right().saturating_sub(width), area.y + 2, width, height)
        .intersection(area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(notification_lines(&view_data.notifications, palette))
            .block(card(Some("Notifications"), CardPadding::Small, palette)),
        popup,
    );
}

fn notification_lines(notifications: &[Notification], palette: &Palette) -> Vec<Line<'static>> {
    if notifications.is_empty() {
        return vec![Line::from(Span::styled(
            "No notifications",
            palette.tone(Tone::Muted),
        ))];
    }
    notifications
        .iter()
        .flat_map(|notification| {
            let (marker, style) = if notification.read {
                ("  ", palette.tone(Tone::Muted))
            } else {
                ("● ", palette.tone(Tone::Plain).add_modifier(Modifier::BOLD))
            };
            [
                Line::from(vec![
                    Span::styled(marker, palette.tone(Tone::Accent)),
                    Span::styled(notification.text.clone(), style),
                ]),
                Line::from(Span::styled(
                    format!("  {}", notification.time_label),
                    palette.tone(Tone::Muted),
                )),
            ]
        })
        .collect()
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, prompt: &str, palette: &Palette) {
    let popup = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup);
    let lines = vec![
        Line::from(Span::styled(prompt.to_owned(), palette.tone(Tone::Plain))),
        Line::default(),
        Line::from(vec![
            button("Delete (y)", ButtonVariant::Danger, false, palette),
            Span::raw("  "),
            button("Cancel (n)", ButtonVariant::Secondary, false, palette),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(card(Some("Confirm"), CardPadding::Medium, palette)),
        popup,
    );
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view_data
        .page
        .list()
        .is_some_and(|list| list.confirming().is_some())
    {
        return "y/enter delete | n/esc keep".to_owned();
    }
    if state.focus == Focus::Search {
        return "type to search | ctrl+u clear | enter/esc done".to_owned();
    }
    match view_data.page.kind() {
        PageKind::Dashboard => {
            "1-6 go | tab next | ctrl+b sidebar | t theme | n notifications | ? help | q quit"
                .to_owned()
        }
        PageKind::Products => {
            "/ search | j/k row | [/] page | d delete | t theme | ? help | q quit".to_owned()
        }
        PageKind::Users => {
            "/ search | j/k row | [/] page | r role | d delete | t theme | ? help | q quit"
                .to_owned()
        }
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | q quit (outside search) | ? help | esc close\n\
shell: ctrl+b sidebar | 1-6 sidebar entry | tab/shift+tab next/prev page\n\
shell: j/k + enter pick entry while the mobile sidebar is open | click backdrop to close\n\
view: t theme | n notifications\n\
list: / search | ctrl+u clear search | j/k row | [/] or left/right page | {/} first/last\n\
list: d delete (y confirm, n cancel) | r cycle user role"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, ShellAreas, UiOptions, ViewData, handle_key_event, handle_mouse_event,
        help_overlay_text, metric_bar, nav_item_at, notification_lines, persist_theme, render,
        shell_areas, status_text, tick, topbar_right_text,
    };
    use crate::pages::{ListControls, MountedPage};
    use crate::palette::Palette;
    use crate::widgets::line_text;
    use anyhow::{Result, anyhow};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use dashpro_app::{
        AppState, DashboardSnapshot, Focus, NavItem, Notification, Overlay, PageKind,
        PreferenceMedium, PreferenceStore, Product, SidebarPresentation, THEME_KEY, User,
        ViewportSignals,
    };
    use dashpro_testkit::{DashboardFaker, dashboard_snapshot, notifications};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    struct TestRuntime {
        prefs: PreferenceStore,
        faker: DashboardFaker,
        fail_loads: bool,
    }

    impl TestRuntime {
        fn new() -> Self {
            Self::with_preferences(PreferenceStore::in_memory())
        }

        fn with_preferences(prefs: PreferenceStore) -> Self {
            Self {
                prefs,
                faker: DashboardFaker::new(11),
                fail_loads: false,
            }
        }
    }

    /// Key/value medium whose raw strings stay visible to the test.
    #[derive(Clone, Default)]
    struct SharedMedium(Rc<RefCell<BTreeMap<String, String>>>);

    impl SharedMedium {
        fn raw(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
    }

    impl PreferenceMedium for SharedMedium {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Ok(self.raw(key))
        }

        fn write(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.0.borrow_mut().remove(key);
            Ok(())
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_dashboard(&mut self) -> Result<DashboardSnapshot> {
            if self.fail_loads {
                return Err(anyhow!("dashboard source offline"));
            }
            Ok(dashboard_snapshot())
        }

        fn load_products(&mut self) -> Result<Vec<Product>> {
            if self.fail_loads {
                return Err(anyhow!("product source offline"));
            }
            Ok(self.faker.products())
        }

        fn load_users(&mut self) -> Result<Vec<User>> {
            if self.fail_loads {
                return Err(anyhow!("user source offline"));
            }
            Ok(self.faker.users())
        }

        fn load_notifications(&mut self) -> Result<Vec<Notification>> {
            Ok(notifications())
        }

        fn preferences(&mut self) -> &mut PreferenceStore {
            &mut self.prefs
        }
    }

    fn instant_options() -> UiOptions {
        UiOptions {
            simulate_latency: false,
            ..UiOptions::default()
        }
    }

    fn setup(width: u16, runtime: &mut TestRuntime) -> Result<(AppState, ViewData, Instant)> {
        let mut state = AppState::default();
        let now = Instant::now();
        let view_data = ViewData::new(
            &mut state,
            runtime,
            instant_options(),
            ViewportSignals {
                width,
                height: 40,
                prefers_dark: false,
            },
            now,
        )?;
        Ok((state, view_data, now))
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        code: KeyCode,
        now: Instant,
    ) -> bool {
        handle_key_event(
            state,
            runtime,
            view_data,
            KeyEvent::new(code, KeyModifiers::NONE),
            now,
        )
    }

    fn click(state: &mut AppState, view_data: &mut ViewData, column: u16, row: u16, now: Instant) {
        handle_mouse_event(
            state,
            view_data,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
            now,
        );
    }

    fn user_page(view_data: &ViewData) -> Result<&crate::pages::ListPage<User>> {
        match &view_data.page {
            MountedPage::Users(page) => Ok(page),
            other => Err(anyhow!("expected users page, got {:?}", other.kind())),
        }
    }

    fn screen_text(state: &AppState, view_data: &ViewData) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40))?;
        terminal.draw(|frame| render(frame, state, view_data))?;
        Ok(terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect())
    }

    #[test]
    fn ctrl_q_and_q_quit() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        assert!(handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            now,
        ));
        assert!(press(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyCode::Char('q'),
            now
        ));
        Ok(())
    }

    #[test]
    fn number_keys_remount_the_chosen_page() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        assert_eq!(view_data.page.kind(), PageKind::Dashboard);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('3'), now);
        assert_eq!(state.active_page, PageKind::Users);
        assert!(user_page(&view_data)?.container.is_loading());

        tick(&mut state, &mut runtime, &mut view_data, now);
        assert_eq!(user_page(&view_data)?.container.records().len(), 32);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab, now);
        assert_eq!(view_data.page.kind(), PageKind::Dashboard);
        Ok(())
    }

    #[test]
    fn mobile_navigation_closes_the_overlay() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(80, &mut runtime)?;
        assert!(!state.desktop);
        assert_eq!(state.sidebar_presentation(), SidebarPresentation::MobileHidden);

        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL),
            now,
        );
        assert_eq!(state.sidebar_presentation(), SidebarPresentation::MobileOverlay);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('j'), now);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter, now);
        assert_eq!(state.active_page, PageKind::Products);
        assert!(!state.sidebar.mobile_open);
        Ok(())
    }

    #[test]
    fn backdrop_click_closes_and_sidebar_click_navigates() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(80, &mut runtime)?;
        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL),
            now,
        );
        click(&mut state, &mut view_data, 60, 10, now);
        assert!(!state.sidebar.mobile_open);

        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL),
            now,
        );
        // Third nav row is Users.
        click(&mut state, &mut view_data, 5, 5, now);
        assert_eq!(state.active_page, PageKind::Users);
        assert!(!state.sidebar.mobile_open);
        Ok(())
    }

    #[test]
    fn resize_across_breakpoint_switches_layout() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        assert!(state.desktop);

        view_data.viewport.resize(90, 40);
        tick(&mut state, &mut runtime, &mut view_data, now);
        assert!(!state.desktop);

        view_data.viewport.resize(100, 40);
        tick(&mut state, &mut runtime, &mut view_data, now);
        assert!(state.desktop);
        Ok(())
    }

    #[test]
    fn search_is_debounced_and_escape_leaves_focus() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('3'), now);
        tick(&mut state, &mut runtime, &mut view_data, now);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('/'), now);
        assert_eq!(state.focus, Focus::Search);
        for ch in "quinn".chars() {
            // q types here instead of quitting.
            assert!(!press(
                &mut state,
                &mut runtime,
                &mut view_data,
                KeyCode::Char(ch),
                now
            ));
        }
        tick(&mut state, &mut runtime, &mut view_data, now);
        assert_eq!(user_page(&view_data)?.container.query(), "");

        tick(
            &mut state,
            &mut runtime,
            &mut view_data,
            now + Duration::from_millis(300),
        );
        assert_eq!(user_page(&view_data)?.container.query(), "quinn");
        assert_eq!(user_page(&view_data)?.container.filtered_count(), 4);

        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            now,
        );
        assert_eq!(user_page(&view_data)?.container.query(), "");

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc, now);
        assert_eq!(state.focus, Focus::Nav);
        Ok(())
    }

    #[test]
    fn theme_toggle_persists_immediately() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        assert!(!state.dark_mode);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('t'), now);
        assert!(state.dark_mode);
        assert!(runtime.prefs.get(THEME_KEY, false));
        assert!(topbar_right_text(&state, &view_data).starts_with("☾ dark"));
        Ok(())
    }

    #[test]
    fn os_preference_is_stored_after_first_frame() -> Result<()> {
        let medium = SharedMedium::default();
        let mut runtime = TestRuntime::with_preferences(PreferenceStore::new(medium.clone()));
        let mut state = AppState::default();
        let now = Instant::now();
        let mut view_data = ViewData::new(
            &mut state,
            &mut runtime,
            instant_options(),
            ViewportSignals {
                width: 120,
                height: 40,
                prefers_dark: true,
            },
            now,
        )?;
        assert!(state.dark_mode);
        assert_eq!(medium.raw(THEME_KEY), None);

        persist_theme(&mut state, &mut runtime, &mut view_data, now);
        assert_eq!(medium.raw(THEME_KEY).as_deref(), Some("true"));
        Ok(())
    }

    #[test]
    fn delete_asks_before_removing() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('3'), now);
        tick(&mut state, &mut runtime, &mut view_data, now);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('d'), now);
        assert_eq!(status_text(&state, &view_data), "y/enter delete | n/esc keep");
        // Page keys are swallowed while the prompt is up.
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('1'), now);
        assert_eq!(state.active_page, PageKind::Users);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('n'), now);
        assert_eq!(user_page(&view_data)?.container.records().len(), 32);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('d'), now);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('y'), now);
        assert_eq!(user_page(&view_data)?.container.records().len(), 31);
        assert_eq!(state.status_line.as_deref(), Some("deleted Alex Smith"));
        Ok(())
    }

    #[test]
    fn clicks_are_ignored_while_delete_prompt_is_open() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('3'), now);
        tick(&mut state, &mut runtime, &mut view_data, now);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('d'), now);

        // First nav row is Dashboard.
        click(&mut state, &mut view_data, 5, 3, now);
        assert_eq!(state.active_page, PageKind::Users);
        assert!(
            user_page(&view_data)?
                .confirming()
                .is_some_and(|prompt| prompt.contains("delete this user"))
        );

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc, now);
        click(&mut state, &mut view_data, 5, 3, now);
        assert_eq!(state.active_page, PageKind::Dashboard);
        Ok(())
    }

    #[test]
    fn pageless_entry_reports_then_clears_status() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('4'), now);
        assert_eq!(state.active_page, PageKind::Dashboard);
        assert_eq!(
            state.status_line.as_deref(),
            Some("Analytics is not available yet")
        );

        tick(&mut state, &mut runtime, &mut view_data, now + Duration::from_secs(4));
        assert_eq!(state.status_line, None);
        Ok(())
    }

    #[test]
    fn role_key_cycles_selected_user() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('3'), now);
        tick(&mut state, &mut runtime, &mut view_data, now);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('r'), now);
        assert_eq!(
            state.status_line.as_deref(),
            Some("Alex Smith is now Editor")
        );
        Ok(())
    }

    #[test]
    fn failed_load_leaves_loading_with_status() -> Result<()> {
        let mut runtime = TestRuntime::new();
        runtime.fail_loads = true;
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('2'), now);
        tick(&mut state, &mut runtime, &mut view_data, now);

        let MountedPage::Products(page) = &view_data.page else {
            return Err(anyhow!("expected products page"));
        };
        assert!(!page.container.is_loading());
        assert!(page.container.records().is_empty());
        assert_eq!(
            state.status_line.as_deref(),
            Some("load failed: product source offline")
        );
        Ok(())
    }

    #[test]
    fn overlays_swallow_keys_until_closed() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('n'), now);
        assert_eq!(state.overlay, Overlay::Notifications);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('2'), now);
        assert_eq!(state.active_page, PageKind::Dashboard);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc, now);
        assert_eq!(state.overlay, Overlay::None);
        Ok(())
    }

    #[test]
    fn shell_layout_per_presentation() {
        let area = Rect::new(0, 0, 120, 40);
        let expanded = shell_areas(area, SidebarPresentation::DesktopExpanded);
        assert_eq!(expanded.sidebar.map(|rect| rect.width), Some(24));
        assert_eq!(expanded.main.x, 24);

        let collapsed = shell_areas(area, SidebarPresentation::DesktopCollapsed);
        assert_eq!(collapsed.sidebar.map(|rect| rect.width), Some(7));

        assert_eq!(
            shell_areas(area, SidebarPresentation::MobileHidden),
            ShellAreas {
                sidebar: None,
                main: area,
                backdrop: false,
            }
        );
        let overlay = shell_areas(area, SidebarPresentation::MobileOverlay);
        assert!(overlay.backdrop);
        assert_eq!(overlay.main, area);
    }

    #[test]
    fn nav_rows_start_below_brand() {
        let sidebar = Rect::new(0, 0, 24, 40);
        assert_eq!(nav_item_at(sidebar, 2), None);
        assert_eq!(nav_item_at(sidebar, 3), Some(NavItem::Dashboard));
        assert_eq!(nav_item_at(sidebar, 8), Some(NavItem::Help));
        assert_eq!(nav_item_at(sidebar, 9), None);
    }

    #[test]
    fn metric_bar_scales_to_width() {
        assert_eq!(metric_bar(0), "░".repeat(20));
        assert_eq!(metric_bar(32), format!("{}{}", "█".repeat(6), "░".repeat(14)));
        assert_eq!(metric_bar(100), "█".repeat(20));
    }

    #[test]
    fn unread_notifications_are_marked() {
        let palette = Palette::for_theme(false);
        let lines = notification_lines(&notifications(), &palette);
        let text = lines.iter().map(line_text).collect::<Vec<_>>();
        assert_eq!(text[0], "● New user registered");
        assert_eq!(text[1], "  5 min ago");
        assert_eq!(text[4], "  System update available");
    }

    #[test]
    fn help_mentions_sidebar_toggle() {
        assert!(help_overlay_text().contains("ctrl+b sidebar"));
    }

    #[test]
    fn products_page_renders_list_and_summary() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('2'), now);

        let loading = screen_text(&state, &view_data)?;
        assert!(loading.contains("Product Management"));
        assert!(loading.contains("Loading..."));

        tick(&mut state, &mut runtime, &mut view_data, now);
        let loaded = screen_text(&state, &view_data)?;
        assert!(loaded.contains("Showing 1 to 8 of 24 results"));
        assert!(loaded.contains("Page 1 of 3"));
        assert!(loaded.contains("Total Products"));
        assert!(loaded.contains("DashPro"));
        Ok(())
    }

    #[test]
    fn dashboard_renders_after_load() -> Result<()> {
        let mut runtime = TestRuntime::new();
        let (mut state, mut view_data, now) = setup(120, &mut runtime)?;
        assert!(screen_text(&state, &view_data)?.contains("Loading dashboard..."));

        tick(&mut state, &mut runtime, &mut view_data, now);
        let text = screen_text(&state, &view_data)?;
        assert!(text.contains("Dashboard Overview"));
        assert!(text.contains("Total Revenue"));
        assert!(text.contains("Recent Activity"));
        assert!(text.contains("Performance Metrics"));
        Ok(())
    }
}
