//! GUI overlay layout and input handling.
//!
//! Every button, list row and slider rectangle is computed here from the
//! [`ScreenSize`] so the renderer and the input handling agree on where
//! things are. The handlers take an [`OverlayInput`] snapshot and mutate
//! component data; the draw code in [`crate::systems::render`] only reads.
//!
//! Overlays:
//! - the Pomodoro panel in the GUI band of the Pomodoro interior;
//! - the library list, opened from the librarian;
//! - the to-do list, opened from the desk;
//! - the control mode buttons and the volume sliders, always present.

use std::path::Path;
use std::time::Instant;

use bevy_ecs::prelude::*;
use log::{info, warn};
use raylib::prelude::{Rectangle, Vector2};
use smallvec::SmallVec;

use crate::components::building::{BuildingInterior, GuiType};
use crate::components::library::{Ebook, LIBRARY_VISIBLE_ROWS, LibraryData};
use crate::components::player::Player;
use crate::components::playerinput::PlayerInput;
use crate::components::scene::Scene;
use crate::components::todolist::{TODO_VISIBLE_ROWS, TodoListData};
use crate::events::audio::{AudioCmd, MUSIC_BACKGROUND};
use crate::persistence::{save_library, save_todo_list};
use crate::resources::audio::AudioVolumes;
use crate::resources::datapaths::DataPaths;
use crate::resources::input::InputState;
use crate::resources::pomodoro::PomodoroTimer;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;

/// Longest search text accepted by the library overlay.
pub const SEARCH_LIMIT: usize = 128;
pub const NEW_BOOK_PATH: &str = "path/to/new/book.pdf";
pub const NEW_BOOK_TITLE: &str = "New Book";

pub fn point_in_rect(p: Vector2, r: &Rectangle) -> bool {
    p.x >= r.x && p.x < r.x + r.width && p.y >= r.y && p.y < r.y + r.height
}

/// True while an overlay swallows typed letters: the library search box, or
/// the to-do list's new task field. Letter shortcuts stay quiet meanwhile.
pub fn captures_text<'a>(
    libraries: impl IntoIterator<Item = &'a LibraryData>,
    lists: impl IntoIterator<Item = &'a TodoListData>,
) -> bool {
    libraries.into_iter().any(|lib| lib.is_showing_ui)
        || lists.into_iter().any(|todo| todo.is_adding_new)
}

/// Pointer and text input consumed by the overlays in one frame.
#[derive(Debug, Clone)]
pub struct OverlayInput {
    pub pointer: Vector2,
    pub clicked: bool,
    pub held: bool,
    pub wheel: f32,
    pub typed: SmallVec<[char; 8]>,
    pub backspace: bool,
    pub enter: bool,
}

impl OverlayInput {
    /// Nothing pressed, pointer at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pointer: Vector2::new(x, y),
            clicked: false,
            held: false,
            wheel: 0.0,
            typed: SmallVec::new(),
            backspace: false,
            enter: false,
        }
    }

    /// A left click at the centre of `target`.
    pub fn click(target: &Rectangle) -> Self {
        let mut input = Self::at(
            target.x + target.width / 2.0,
            target.y + target.height / 2.0,
        );
        input.clicked = true;
        input.held = true;
        input
    }

    pub fn from_state(input: &InputState) -> Self {
        Self {
            pointer: input.pointer.position,
            clicked: input.pointer.left_pressed,
            held: input.pointer.left_down,
            wheel: input.pointer.wheel,
            typed: input.pointer.typed.clone(),
            backspace: input.backspace.just_pressed,
            enter: input.confirm.just_pressed,
        }
    }

    pub fn hits(&self, target: &Rectangle) -> bool {
        self.clicked && point_in_rect(self.pointer, target)
    }
}

/// "Manual" and "Wander" buttons in the top-right corner.
pub fn control_panel_buttons(screen: &ScreenSize) -> (Rectangle, Rectangle) {
    let x = screen.w - 180.0;
    (
        Rectangle::new(x, 8.0, 80.0, 28.0),
        Rectangle::new(x + 90.0, 8.0, 80.0, 28.0),
    )
}

/// Music and FX slider tracks in the bottom-right corner.
pub fn volume_sliders(screen: &ScreenSize) -> (Rectangle, Rectangle) {
    let x = screen.w - 180.0;
    (
        Rectangle::new(x, screen.h - 56.0, 170.0, 12.0),
        Rectangle::new(x, screen.h - 24.0, 170.0, 12.0),
    )
}

/// Slider value under the pointer while the button is held on the track.
pub fn slider_value(track: &Rectangle, input: &OverlayInput) -> Option<f32> {
    let grab = Rectangle::new(track.x - 4.0, track.y - 6.0, track.width + 8.0, track.height + 12.0);
    if !input.held || !point_in_rect(input.pointer, &grab) {
        return None;
    }
    Some(((input.pointer.x - track.x) / track.width).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroAction {
    FewerCycles,
    MoreCycles,
    Start,
    Reset,
    Break,
}

/// Buttons of the Pomodoro panel, centred in the GUI band.
#[derive(Debug, Clone, Copy)]
pub struct PomodoroPanel {
    pub center_x: f32,
    pub title_y: f32,
    pub cycles_y: f32,
    pub minus: Rectangle,
    pub plus: Rectangle,
    pub start: Rectangle,
    pub reset: Rectangle,
    pub brk: Rectangle,
    pub status_y: f32,
}

impl PomodoroPanel {
    pub fn layout(screen: &ScreenSize) -> Self {
        let cx = screen.w / 2.0;
        let wide = |y: f32| Rectangle::new(cx - 75.0, y, 150.0, 40.0);
        Self {
            center_x: cx,
            title_y: 50.0,
            cycles_y: 110.0,
            minus: Rectangle::new(cx - 50.0, 110.0, 30.0, 30.0),
            plus: Rectangle::new(cx + 40.0, 110.0, 30.0, 30.0),
            start: wide(170.0),
            reset: wide(230.0),
            brk: wide(290.0),
            status_y: 345.0,
        }
    }

    /// Button clicked this frame. Start is hidden while the timer runs.
    pub fn action(&self, input: &OverlayInput, running: bool) -> Option<PomodoroAction> {
        if input.hits(&self.minus) {
            Some(PomodoroAction::FewerCycles)
        } else if input.hits(&self.plus) {
            Some(PomodoroAction::MoreCycles)
        } else if !running && input.hits(&self.start) {
            Some(PomodoroAction::Start)
        } else if input.hits(&self.reset) {
            Some(PomodoroAction::Reset)
        } else if input.hits(&self.brk) {
            Some(PomodoroAction::Break)
        } else {
            None
        }
    }
}

pub fn apply_pomodoro_action(
    action: PomodoroAction,
    timer: &mut PomodoroTimer,
    now: Instant,
    player: Option<&mut PlayerInput>,
) {
    match action {
        PomodoroAction::FewerCycles => {
            timer.decrement_cycles();
        }
        PomodoroAction::MoreCycles => {
            timer.increment_cycles();
        }
        PomodoroAction::Start => {
            if timer.start(now) {
                info!("pomodoro started from the panel");
            }
        }
        PomodoroAction::Reset => timer.reset(),
        PomodoroAction::Break => {
            timer.reset();
            if let Some(control) = player {
                control.frozen = false;
            }
        }
    }
}

/// Shared geometry of the library and to-do overlays: a panel covering 80 %
/// of the screen, a toolbar row and a fixed number of list rows.
#[derive(Debug, Clone, Copy)]
pub struct ListOverlay {
    pub panel: Rectangle,
    pub close: Rectangle,
    pub add: Rectangle,
    pub toolbar_y: f32,
    pub list_top: f32,
    pub row_height: f32,
    pub rows: usize,
}

impl ListOverlay {
    fn new(screen: &ScreenSize, row_height: f32, rows: usize) -> Self {
        let w = screen.w * 0.8;
        let h = screen.h * 0.8;
        let panel = Rectangle::new((screen.w - w) / 2.0, (screen.h - h) / 2.0, w, h);
        Self {
            panel,
            close: Rectangle::new(panel.x + w - 80.0, panel.y + 10.0, 70.0, 30.0),
            add: Rectangle::new(0.0, 0.0, 0.0, 0.0),
            toolbar_y: panel.y + 50.0,
            list_top: panel.y + 130.0,
            row_height,
            rows,
        }
    }

    pub fn library(screen: &ScreenSize) -> Self {
        let mut layout = Self::new(screen, 60.0, LIBRARY_VISIBLE_ROWS);
        let p = layout.panel;
        layout.add = Rectangle::new(p.x + p.width - 150.0, layout.toolbar_y, 130.0, 30.0);
        layout
    }

    pub fn todo(screen: &ScreenSize) -> Self {
        let mut layout = Self::new(screen, 50.0, TODO_VISIBLE_ROWS);
        layout.add = Rectangle::new(layout.panel.x + 20.0, layout.toolbar_y, 150.0, 35.0);
        layout
    }

    pub fn row(&self, slot: usize) -> Rectangle {
        Rectangle::new(
            self.panel.x + 20.0,
            self.list_top + slot as f32 * self.row_height,
            self.panel.width - 40.0,
            self.row_height - 5.0,
        )
    }

    fn scroll_y(&self) -> f32 {
        self.list_top + self.rows as f32 * self.row_height + 5.0
    }

    pub fn up(&self) -> Rectangle {
        let cx = self.panel.x + self.panel.width / 2.0;
        Rectangle::new(cx - 100.0, self.scroll_y(), 50.0, 25.0)
    }

    pub fn down(&self) -> Rectangle {
        let cx = self.panel.x + self.panel.width / 2.0;
        Rectangle::new(cx + 50.0, self.scroll_y(), 50.0, 25.0)
    }

    pub fn search_box(&self) -> Rectangle {
        Rectangle::new(self.panel.x + 90.0, self.toolbar_y, 300.0, 30.0)
    }

    pub fn open_button(&self, slot: usize) -> Rectangle {
        let row = self.row(slot);
        Rectangle::new(self.panel.x + self.panel.width - 120.0, row.y + 15.0, 90.0, 30.0)
    }

    pub fn input_box(&self) -> Rectangle {
        Rectangle::new(self.panel.x + 120.0, self.toolbar_y, 300.0, 35.0)
    }

    pub fn confirm(&self) -> Rectangle {
        Rectangle::new(self.panel.x + 430.0, self.toolbar_y, 70.0, 35.0)
    }

    pub fn cancel(&self) -> Rectangle {
        Rectangle::new(self.panel.x + 510.0, self.toolbar_y, 70.0, 35.0)
    }

    pub fn checkbox(&self, slot: usize) -> Rectangle {
        let row = self.row(slot);
        Rectangle::new(self.panel.x + 30.0, row.y + 12.0, 25.0, 25.0)
    }

    pub fn delete_button(&self, slot: usize) -> Rectangle {
        let row = self.row(slot);
        Rectangle::new(self.panel.x + self.panel.width - 100.0, row.y + 10.0, 70.0, 30.0)
    }

    /// Up/Down steps clamped to `[0, len - rows]`. True when the click hit
    /// one of the two buttons.
    fn step_scroll(&self, offset: &mut usize, len: usize, input: &OverlayInput) -> bool {
        if len <= self.rows {
            return false;
        }
        if input.hits(&self.up()) {
            *offset = offset.saturating_sub(1);
            true
        } else if input.hits(&self.down()) {
            if *offset < len - self.rows {
                *offset += 1;
            }
            true
        } else {
            false
        }
    }
}

/// Side effect requested by the library overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEffect {
    Save,
    Open(String),
}

pub fn library_overlay_input(
    library: &mut LibraryData,
    layout: &ListOverlay,
    input: &OverlayInput,
) -> Option<LibraryEffect> {
    if !input.typed.is_empty() || input.backspace {
        for &c in &input.typed {
            if !c.is_control() && library.search_buffer.chars().count() < SEARCH_LIMIT {
                library.search_buffer.push(c);
            }
        }
        if input.backspace {
            library.search_buffer.pop();
        }
        library.scroll_by(0.0);
    }
    if input.wheel != 0.0 {
        library.scroll_by(input.wheel);
    }
    if !input.clicked {
        return None;
    }

    if input.hits(&layout.close) {
        library.close();
        return None;
    }
    if input.hits(&layout.add) {
        library.add_ebook(Ebook::new(NEW_BOOK_PATH, NEW_BOOK_TITLE));
        return Some(LibraryEffect::Save);
    }

    let visible = library.matching_indices();
    if layout.step_scroll(&mut library.scroll_offset, visible.len(), input) {
        return None;
    }
    let shown: Vec<usize> = visible
        .into_iter()
        .skip(library.scroll_offset)
        .take(layout.rows)
        .collect();
    for (slot, index) in shown.into_iter().enumerate() {
        if input.hits(&layout.open_button(slot)) {
            library.select(index);
            return Some(LibraryEffect::Open(library.ebooks[index].path.clone()));
        }
        if input.hits(&layout.row(slot)) {
            library.select(index);
            return None;
        }
    }
    None
}

/// Returns true when the task list changed and must be saved.
pub fn todo_overlay_input(todo: &mut TodoListData, layout: &ListOverlay, input: &OverlayInput) -> bool {
    if input.wheel != 0.0 {
        todo.scroll_by(input.wheel);
    }
    if todo.is_adding_new {
        for &c in &input.typed {
            todo.push_char(c);
        }
        if input.backspace {
            todo.pop_char();
        }
        if input.enter && todo.commit_input() {
            return true;
        }
    }
    if !input.clicked {
        return false;
    }

    if input.hits(&layout.close) {
        todo.close();
        return false;
    }
    if todo.is_adding_new {
        if input.hits(&layout.confirm()) {
            return todo.commit_input();
        }
        if input.hits(&layout.cancel()) {
            todo.cancel_adding();
            return false;
        }
    } else if input.hits(&layout.add) {
        todo.begin_adding();
        return false;
    }

    if layout.step_scroll(&mut todo.scroll_offset, todo.tasks.len(), input) {
        return false;
    }
    let end = (todo.scroll_offset + layout.rows).min(todo.tasks.len());
    for (slot, index) in (todo.scroll_offset..end).enumerate() {
        if input.hits(&layout.checkbox(slot)) {
            return todo.toggle(index);
        }
        if input.hits(&layout.delete_button(slot)) {
            return todo.remove(index).is_some();
        }
    }
    false
}

/// Hand `path` to the desktop's default viewer.
pub fn open_with_system_viewer(path: &str) {
    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", "", path])
        .spawn();
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(path).spawn();
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let result = std::process::Command::new("xdg-open").arg(path).spawn();

    match result {
        Ok(_) => info!("opened {}", path),
        Err(e) => warn!("could not open {}: {}", path, e),
    }
}

fn save_library_logged(path: &Path, library: &LibraryData) {
    if let Err(e) = save_library(path, &library.ebooks) {
        warn!("library not saved: {}", e);
    }
}

fn save_todo_logged(path: &Path, todo: &TodoListData) {
    if let Err(e) = save_todo_list(path, &todo.tasks) {
        warn!("todo list not saved: {}", e);
    }
}

/// Apply this frame's pointer and text input to every visible overlay.
#[allow(clippy::too_many_arguments)]
pub fn overlay_input_system(
    input: Res<InputState>,
    scene: Res<SceneState>,
    screen: Res<ScreenSize>,
    paths: Res<DataPaths>,
    mut timer: ResMut<PomodoroTimer>,
    mut volumes: ResMut<AudioVolumes>,
    interiors: Query<(&BuildingInterior, &Scene)>,
    mut libraries: Query<(&mut LibraryData, Option<&Scene>)>,
    mut lists: Query<(&mut TodoListData, Option<&Scene>)>,
    mut players: Query<&mut PlayerInput, With<Player>>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let overlay = OverlayInput::from_state(&input);
    let current = scene.current;
    let here = |s: Option<&Scene>| s.is_none_or(|s| s.id() == current);

    let (music_track, fx_track) = volume_sliders(&screen);
    if let Some(vol) = slider_value(&music_track, &overlay) {
        if vol != volumes.music {
            volumes.music = vol;
            audio.write(AudioCmd::VolumeMusic {
                id: MUSIC_BACKGROUND.to_string(),
                vol,
            });
        }
    }
    if let Some(vol) = slider_value(&fx_track, &overlay) {
        if vol != volumes.fx {
            volumes.fx = vol;
            audio.write(AudioCmd::VolumeFx { vol });
        }
    }

    let pomodoro_here = interiors
        .iter()
        .any(|(interior, s)| s.id() == current && interior.gui_type == GuiType::Pomodoro);
    if pomodoro_here {
        let panel = PomodoroPanel::layout(&screen);
        if let Some(action) = panel.action(&overlay, timer.is_running()) {
            let mut player = players.iter_mut().next();
            apply_pomodoro_action(action, &mut timer, Instant::now(), player.as_deref_mut());
        }
    }

    let library_layout = ListOverlay::library(&screen);
    for (mut library, s) in libraries.iter_mut() {
        if !library.is_showing_ui || !here(s) {
            continue;
        }
        match library_overlay_input(&mut library, &library_layout, &overlay) {
            Some(LibraryEffect::Save) => save_library_logged(&paths.library, &library),
            Some(LibraryEffect::Open(path)) => open_with_system_viewer(&path),
            None => {}
        }
    }

    let todo_layout = ListOverlay::todo(&screen);
    for (mut todo, s) in lists.iter_mut() {
        if !todo.is_showing_ui || !here(s) {
            continue;
        }
        if todo_overlay_input(&mut todo, &todo_layout, &overlay) {
            save_todo_logged(&paths.todo, &todo);
        }
    }
}
