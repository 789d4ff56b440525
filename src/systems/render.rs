//! Rendering.
//!
//! [`render_frame`] takes the Raylib handle out of the world for the length
//! of one drawing scope and paints, in order:
//! 1. backgrounds: the town backdrop, or the interior's GUI band and game area;
//! 2. entities visible in the current scene, the player last;
//! 3. speech bubbles;
//! 4. GUI overlays, the control panel and the debug overlay.
//!
//! Interior positions are local to the game area. The GUI band offset is
//! added here and nowhere else.
//!
//! The geometry helpers at the top are pure and tested without a window.

use std::ffi::CString;
use std::path::Path;

use bevy_ecs::prelude::*;
use log::{info, warn};
use raylib::prelude::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::components::animation::Animation;
use crate::components::background::Background;
use crate::components::building::{Backdrop, BuildingInterior, GuiType};
use crate::components::exitdoor::ExitDoor;
use crate::components::hitbox::Hitbox;
use crate::components::interactionzone::InteractionZone;
use crate::components::library::LibraryData;
use crate::components::player::Player;
use crate::components::playerinput::PlayerInput;
use crate::components::position::Position;
use crate::components::scene::{Scene, SceneId};
use crate::components::speechbubble::SpeechBubble;
use crate::components::sprite::Sprite;
use crate::components::todolist::TodoListData;
use crate::resources::audio::AudioVolumes;
use crate::resources::debugmode::DebugMode;
use crate::resources::pomodoro::{PomodoroPhase, PomodoroTimer, format_hms};
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::gui::{ListOverlay, PomodoroPanel, control_panel_buttons, volume_sliders};

pub const BUBBLE_TEXTURE: &str = "assets/speech_v2_32x24.png";
pub const BUBBLE_TEXTURE_WIDTH: f32 = 32.0;
pub const BUBBLE_TEXTURE_HEIGHT: f32 = 24.0;
pub const BUBBLE_BORDER: f32 = 8.0;
pub const BUBBLE_PADDING: f32 = 8.0;
pub const BUBBLE_LINE_HEIGHT: f32 = 12.0;
pub const BUBBLE_FONT_SIZE: i32 = 10;
pub const BUBBLE_MAX_TEXT_WIDTH: f32 = 160.0;

/// Scene filter: untagged entities and the player always draw.
pub fn is_visible(scene: Option<SceneId>, is_player: bool, current: SceneId) -> bool {
    is_player || scene.is_none_or(|s| s == current)
}

/// Screen-space shift applied to every non-background entity.
pub fn draw_offset_y(current: SceneId, screen: &ScreenSize) -> f32 {
    if current.is_main() { 0.0 } else { screen.gui_height }
}

/// Greedy word wrap against `max_width`. `\n` forces a break and a word
/// wider than the limit gets a line of its own.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    measure: impl Fn(&str) -> f32,
) -> SmallVec<[String; 4]> {
    let mut lines = SmallVec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", line, word);
            if measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}

/// Background of a bubble holding `line_count` lines at most `text_width`
/// wide. `anchor` is where a single-line bubble's top-left sits; extra lines
/// grow the bubble upward.
pub fn bubble_rect(anchor: Vector2, text_width: f32, line_count: usize) -> Rectangle {
    let lines = line_count.max(1) as f32;
    let height = lines * BUBBLE_LINE_HEIGHT + 2.0 * BUBBLE_PADDING;
    Rectangle::new(
        anchor.x,
        anchor.y - (lines - 1.0) * BUBBLE_LINE_HEIGHT,
        text_width + 2.0 * BUBBLE_PADDING,
        height,
    )
}

/// Source/destination pairs of a nine-slice draw of the bubble texture into
/// `dest`. Corners keep their size, edges stretch along one axis and the
/// centre along both.
pub fn nine_slice(dest: &Rectangle) -> [(Rectangle, Rectangle); 9] {
    let b = BUBBLE_BORDER;
    let src_cols = [0.0, b, BUBBLE_TEXTURE_WIDTH - b];
    let src_rows = [0.0, b, BUBBLE_TEXTURE_HEIGHT - b];
    let src_w = [b, BUBBLE_TEXTURE_WIDTH - 2.0 * b, b];
    let src_h = [b, BUBBLE_TEXTURE_HEIGHT - 2.0 * b, b];

    let inner_w = (dest.width - 2.0 * b).max(0.0);
    let inner_h = (dest.height - 2.0 * b).max(0.0);
    let dst_cols = [dest.x, dest.x + b, dest.x + b + inner_w];
    let dst_rows = [dest.y, dest.y + b, dest.y + b + inner_h];
    let dst_w = [b, inner_w, b];
    let dst_h = [b, inner_h, b];

    std::array::from_fn(|i| {
        let (row, col) = (i / 3, i % 3);
        (
            Rectangle::new(src_cols[col], src_rows[row], src_w[col], src_h[row]),
            Rectangle::new(dst_cols[col], dst_rows[row], dst_w[col], dst_h[row]),
        )
    })
}

fn measure(text: &str, font_size: i32) -> f32 {
    let Ok(c_text) = CString::new(text) else {
        return 0.0;
    };
    unsafe { ffi::MeasureText(c_text.as_ptr(), font_size) as f32 }
}

/// Realize every texture referenced by sprites, interior backdrops and the
/// bubble skin. Each `loaded` flag flips once, when its texture exists.
/// Missing files are reported in the error and the caller keeps going with
/// flat-coloured rectangles.
pub fn load_textures(
    world: &mut World,
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
) -> Result<(), String> {
    let mut wanted: Vec<String> = vec![BUBBLE_TEXTURE.to_string()];
    {
        let mut sprites = world.query::<&Sprite>();
        wanted.extend(
            sprites
                .iter(world)
                .filter(|s| s.has_texture() && !s.loaded)
                .map(|s| s.tex_key.clone()),
        );
        let mut interiors = world.query::<&BuildingInterior>();
        wanted.extend(
            interiors
                .iter(world)
                .filter(|i| !i.loaded)
                .flat_map(|i| i.texture_paths().map(str::to_string).collect::<Vec<_>>()),
        );
    }

    let mut missing: Vec<String> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    world.resource_scope(|_, mut store: Mut<TextureStore>| {
        for path in wanted {
            if !seen.insert(path.clone()) || store.contains(&path) {
                continue;
            }
            if !Path::new(&path).exists() {
                missing.push(path);
                continue;
            }
            match rl.load_texture(thread, &path) {
                Ok(texture) => {
                    info!("texture loaded: {}", path);
                    store.insert(path, texture);
                }
                Err(e) => {
                    warn!("texture {} failed to load: {}", path, e);
                    missing.push(path);
                }
            }
        }
    });

    world.resource_scope(|world, store: Mut<TextureStore>| {
        let mut sprites = world.query::<&mut Sprite>();
        for mut sprite in sprites.iter_mut(world) {
            if store.contains(&sprite.tex_key) {
                sprite.mark_loaded();
            }
        }
        let mut interiors = world.query::<&mut BuildingInterior>();
        for mut interior in interiors.iter_mut(world) {
            if !interior.loaded && interior.texture_paths().all(|p| store.contains(p)) {
                interior.loaded = true;
            }
        }
    });

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing textures: {}", missing.join(", ")))
    }
}

/// Paint one frame. A no-op when the window handles are not in the world.
pub fn render_frame(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };
    {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::RAYWHITE);
        draw_backgrounds(world, &mut d);
        draw_entities(world, &mut d);
        draw_bubbles(world, &mut d);
        draw_overlays(world, &mut d);
        draw_control_panel(world, &mut d);
        draw_debug(world, &mut d);
    }
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);
}

fn draw_stretched(d: &mut RaylibDrawHandle, tex: &Texture2D, dest: Rectangle, tint: Color) {
    let src = Rectangle::new(0.0, 0.0, tex.width as f32, tex.height as f32);
    d.draw_texture_pro(tex, src, dest, Vector2::zero(), 0.0, tint);
}

fn draw_backdrop(d: &mut RaylibDrawHandle, store: &TextureStore, backdrop: &Backdrop, dest: Rectangle) {
    match backdrop.texture.as_deref().and_then(|p| store.get(p)) {
        Some(tex) => draw_stretched(d, tex, dest, Color::WHITE),
        None => d.draw_rectangle_rec(dest, backdrop.color),
    }
}

fn draw_backgrounds(world: &mut World, d: &mut RaylibDrawHandle) {
    let current = world.resource::<SceneState>().current;
    let screen = *world.resource::<ScreenSize>();

    if current.is_main() {
        let mut backgrounds = world.query_filtered::<(&Sprite, Option<&Scene>), With<Background>>();
        let store = world.resource::<TextureStore>();
        let full = Rectangle::new(0.0, 0.0, screen.w, screen.h);
        for (sprite, scene) in backgrounds.iter(world) {
            if scene.is_some_and(|s| !s.id().is_main()) {
                continue;
            }
            match store.get(&sprite.tex_key) {
                Some(tex) => draw_stretched(d, tex, full, Color::WHITE),
                None => d.draw_rectangle_rec(full, sprite.tint),
            }
            break;
        }
        return;
    }

    let mut interiors = world.query::<(&BuildingInterior, &Scene)>();
    let store = world.resource::<TextureStore>();
    if let Some((interior, _)) = interiors.iter(world).find(|(_, s)| s.id() == current) {
        draw_backdrop(d, store, &interior.gui_backdrop, Rectangle::new(0.0, 0.0, screen.w, screen.gui_height));
        draw_backdrop(
            d,
            store,
            &interior.game_backdrop,
            Rectangle::new(0.0, screen.gui_height, screen.w, screen.game_height),
        );
    }
}

type DrawQuery<'a> = (
    Entity,
    &'a Position,
    &'a Sprite,
    Option<&'a Animation>,
    Option<&'a Scene>,
    Option<&'a ExitDoor>,
    Has<Player>,
);

fn draw_entities(world: &mut World, d: &mut RaylibDrawHandle) {
    let current = world.resource::<SceneState>().current;
    let screen = *world.resource::<ScreenSize>();
    let offset_y = draw_offset_y(current, &screen);

    let mut query = world.query_filtered::<DrawQuery, (Without<Background>, Without<BuildingInterior>)>();
    let store = world.resource::<TextureStore>();
    let mut visible: Vec<_> = query
        .iter(world)
        .filter(|(_, _, _, _, scene, _, is_player)| {
            is_visible(scene.map(Scene::id), *is_player, current)
        })
        .collect();
    visible.sort_by_key(|(entity, .., is_player)| (*is_player, *entity));

    for (_, pos, sprite, anim, _, door, _) in visible {
        let dest = Rectangle::new(pos.x, pos.y + offset_y, sprite.width, sprite.height);
        match store.get(&sprite.tex_key) {
            Some(tex) => {
                let src = match anim {
                    Some(a) => Rectangle::new(a.source_x(), 0.0, a.frame_width, a.frame_height),
                    None => Rectangle::new(0.0, 0.0, tex.width as f32, tex.height as f32),
                };
                d.draw_texture_pro(tex, src, dest, Vector2::zero(), 0.0, Color::WHITE);
            }
            None => d.draw_rectangle_rec(dest, sprite.tint),
        }
        if let Some(door) = door {
            let label = door.display_text.as_str();
            let w = measure(label, 10);
            d.draw_text(
                label,
                (dest.x + (dest.width - w) / 2.0) as i32,
                (dest.y - 12.0) as i32,
                10,
                Color::BLACK,
            );
        }
    }
}

fn draw_bubbles(world: &mut World, d: &mut RaylibDrawHandle) {
    let current = world.resource::<SceneState>().current;
    let screen = *world.resource::<ScreenSize>();
    let offset_y = draw_offset_y(current, &screen);

    let mut query = world.query::<(&Position, &SpeechBubble, Option<&Scene>, Has<Player>)>();
    let store = world.resource::<TextureStore>();
    let skin = store.get(BUBBLE_TEXTURE);

    for (pos, bubble, scene, is_player) in query.iter(world) {
        if !bubble.active || !is_visible(scene.map(Scene::id), is_player, current) {
            continue;
        }
        let lines = wrap_text(&bubble.text, BUBBLE_MAX_TEXT_WIDTH, |s| {
            measure(s, BUBBLE_FONT_SIZE)
        });
        let text_width = lines
            .iter()
            .map(|l| measure(l, BUBBLE_FONT_SIZE))
            .fold(0.0, f32::max);
        let anchor = Vector2::new(pos.x + bubble.offset.x, pos.y + offset_y + bubble.offset.y);
        let rect = bubble_rect(anchor, text_width, lines.len());

        match skin {
            Some(tex) => {
                for (src, dst) in nine_slice(&rect) {
                    d.draw_texture_pro(tex, src, dst, Vector2::zero(), 0.0, Color::WHITE);
                }
            }
            None => {
                d.draw_rectangle_rec(rect, Color::WHITE);
                d.draw_rectangle_lines_ex(rect, 1.0, Color::DARKGRAY);
            }
        }
        for (i, line) in lines.iter().enumerate() {
            d.draw_text(
                line,
                (rect.x + BUBBLE_PADDING) as i32,
                (rect.y + BUBBLE_PADDING + i as f32 * BUBBLE_LINE_HEIGHT) as i32,
                BUBBLE_FONT_SIZE,
                Color::BLACK,
            );
        }
    }
}

fn draw_button(d: &mut RaylibDrawHandle, rect: Rectangle, label: &str) {
    d.draw_rectangle_rec(rect, Color::LIGHTGRAY);
    d.draw_rectangle_lines_ex(rect, 1.0, Color::DARKGRAY);
    let size = 16;
    let w = measure(label, size);
    d.draw_text(
        label,
        (rect.x + (rect.width - w) / 2.0) as i32,
        (rect.y + (rect.height - size as f32) / 2.0) as i32,
        size,
        Color::BLACK,
    );
}

fn draw_overlays(world: &mut World, d: &mut RaylibDrawHandle) {
    let current = world.resource::<SceneState>().current;
    let screen = *world.resource::<ScreenSize>();

    let gui = {
        let mut interiors = world.query::<(&BuildingInterior, &Scene)>();
        interiors
            .iter(world)
            .find(|(_, s)| s.id() == current)
            .map(|(i, _)| i.gui_type)
    };
    if gui == Some(GuiType::Pomodoro) {
        draw_pomodoro_panel(d, &screen, world.resource::<PomodoroTimer>());
    }

    let here = |s: Option<&Scene>| s.is_none_or(|s| s.id() == current);
    let mut libraries = world.query::<(&LibraryData, Option<&Scene>)>();
    for (library, s) in libraries.iter(world) {
        if library.is_showing_ui && here(s) {
            draw_library(d, &ListOverlay::library(&screen), library);
        }
    }
    let mut lists = world.query::<(&TodoListData, Option<&Scene>)>();
    for (todo, s) in lists.iter(world) {
        if todo.is_showing_ui && here(s) {
            draw_todo(d, &ListOverlay::todo(&screen), todo);
        }
    }
}

fn draw_pomodoro_panel(d: &mut RaylibDrawHandle, screen: &ScreenSize, timer: &PomodoroTimer) {
    let panel = PomodoroPanel::layout(screen);
    let cx = panel.center_x as i32;
    d.draw_text("Pomodoro Timer", cx - 100, panel.title_y as i32, 30, Color::BLACK);
    d.draw_text("Cycles:", cx - 150, panel.cycles_y as i32 + 8, 20, Color::BLACK);
    draw_button(d, panel.minus, "-");
    d.draw_text(
        &timer.cycle_count().to_string(),
        cx - 10,
        panel.cycles_y as i32 + 5,
        20,
        Color::BLACK,
    );
    draw_button(d, panel.plus, "+");
    if !timer.is_running() {
        draw_button(d, panel.start, "Start");
    }
    draw_button(d, panel.reset, "Reset");
    draw_button(d, panel.brk, "Break");

    if !timer.is_running() && timer.state() == PomodoroPhase::Idle {
        return;
    }
    let (label, color) = match timer.state() {
        PomodoroPhase::Study => ("STUDY TIME", Color::DARKGREEN),
        PomodoroPhase::Break => ("BREAK TIME", Color::DARKBLUE),
        PomodoroPhase::Idle => ("Idle", Color::GRAY),
    };
    let y = panel.status_y as i32;
    d.draw_text(label, cx - 330, y, 24, color);
    d.draw_text(
        &format!("Cycle {} / {}", timer.current_cycle(), timer.cycle_count()),
        cx - 150,
        y + 4,
        18,
        Color::BLACK,
    );
    d.draw_text(
        &format!("Left: {}", format_hms(timer.phase_remaining())),
        cx + 10,
        y + 4,
        18,
        Color::BLACK,
    );
    d.draw_text(
        &format!("Elapsed: {}", format_hms(timer.total_elapsed())),
        cx + 170,
        y + 4,
        18,
        Color::DARKGRAY,
    );
}

fn draw_panel(d: &mut RaylibDrawHandle, layout: &ListOverlay, title: &str, fill: Color, ink: Color) {
    d.draw_rectangle_rec(layout.panel, fill);
    d.draw_rectangle_lines_ex(layout.panel, 1.0, ink);
    let cx = layout.panel.x + layout.panel.width / 2.0;
    d.draw_text(title, cx as i32 - 100, layout.panel.y as i32 + 10, 24, ink);
    draw_button(d, layout.close, "Close");
}

fn draw_scroll_footer(d: &mut RaylibDrawHandle, layout: &ListOverlay, offset: usize, len: usize, ink: Color) {
    if len <= layout.rows {
        return;
    }
    let up = layout.up();
    d.draw_text(
        &format!("{} / {}", offset + 1, len),
        (layout.panel.x + layout.panel.width / 2.0) as i32 - 30,
        up.y as i32 + 5,
        14,
        ink,
    );
    draw_button(d, up, "Up");
    draw_button(d, layout.down(), "Down");
}

fn draw_library(d: &mut RaylibDrawHandle, layout: &ListOverlay, library: &LibraryData) {
    draw_panel(d, layout, "My eBook Library", Color::new(200, 200, 200, 242), Color::DARKGRAY);
    let p = layout.panel;
    let search = layout.search_box();
    d.draw_text("Search:", p.x as i32 + 20, search.y as i32 + 5, 16, Color::BLACK);
    d.draw_rectangle_rec(search, Color::WHITE);
    d.draw_rectangle_lines_ex(search, 1.0, Color::DARKGRAY);
    d.draw_text(&library.search_buffer, search.x as i32 + 6, search.y as i32 + 7, 16, Color::BLACK);
    draw_button(d, layout.add, "Add Book");
    d.draw_text("Books:", p.x as i32 + 20, layout.list_top as i32 - 30, 18, Color::BLACK);

    let visible = library.matching_indices();
    for (slot, &index) in visible
        .iter()
        .skip(library.scroll_offset)
        .take(layout.rows)
        .enumerate()
    {
        let row = layout.row(slot);
        let book = &library.ebooks[index];
        let fill = if library.selected == Some(index) {
            Color::new(0, 121, 241, 77)
        } else {
            Color::new(255, 255, 255, 128)
        };
        d.draw_rectangle_rec(row, fill);
        d.draw_rectangle_lines_ex(row, 1.0, Color::DARKGRAY);
        d.draw_text(&book.title, row.x as i32 + 10, row.y as i32 + 10, 16, Color::BLACK);
        let path = if book.path.chars().count() > 60 {
            format!("{}...", book.path.chars().take(57).collect::<String>())
        } else {
            book.path.clone()
        };
        d.draw_text(&path, row.x as i32 + 10, row.y as i32 + 30, 12, Color::DARKGRAY);
        draw_button(d, layout.open_button(slot), "Open");
    }
    draw_scroll_footer(d, layout, library.scroll_offset, visible.len(), Color::DARKGRAY);
}

fn draw_todo(d: &mut RaylibDrawHandle, layout: &ListOverlay, todo: &TodoListData) {
    draw_panel(d, layout, "My To-Do List", Color::new(211, 176, 131, 242), Color::DARKBROWN);
    let p = layout.panel;
    if todo.is_adding_new {
        let input = layout.input_box();
        d.draw_text("New Task:", p.x as i32 + 20, input.y as i32 + 8, 16, Color::DARKBROWN);
        d.draw_rectangle_rec(input, Color::WHITE);
        d.draw_rectangle_lines_ex(input, 1.0, Color::DARKBROWN);
        d.draw_text(&todo.input_buffer, input.x as i32 + 6, input.y as i32 + 9, 16, Color::BLACK);
        draw_button(d, layout.confirm(), "Add");
        draw_button(d, layout.cancel(), "Cancel");
    } else {
        draw_button(d, layout.add, "+ Add Task");
    }
    d.draw_text(
        &format!("Tasks ({} total):", todo.tasks.len()),
        p.x as i32 + 20,
        layout.list_top as i32 - 30,
        18,
        Color::DARKBROWN,
    );

    let end = (todo.scroll_offset + layout.rows).min(todo.tasks.len());
    for (slot, index) in (todo.scroll_offset..end).enumerate() {
        let row = layout.row(slot);
        let task = &todo.tasks[index];
        let fill = if task.completed {
            Color::new(0, 228, 48, 51)
        } else {
            Color::new(255, 255, 255, 128)
        };
        d.draw_rectangle_rec(row, fill);
        d.draw_rectangle_lines_ex(row, 1.0, Color::DARKBROWN);

        let check = layout.checkbox(slot);
        d.draw_rectangle_lines_ex(check, 2.0, Color::DARKBROWN);
        if task.completed {
            d.draw_rectangle_rec(
                Rectangle::new(check.x + 5.0, check.y + 5.0, check.width - 10.0, check.height - 10.0),
                Color::DARKBROWN,
            );
        }
        let ink = if task.completed { Color::GRAY } else { Color::BLACK };
        let tx = p.x as i32 + 65;
        d.draw_text(&task.task, tx, row.y as i32 + 15, 16, ink);
        if task.completed {
            let w = measure(&task.task, 16) as i32;
            d.draw_line(tx, row.y as i32 + 23, tx + w, row.y as i32 + 23, Color::GRAY);
        }
        draw_button(d, layout.delete_button(slot), "Delete");
    }
    draw_scroll_footer(d, layout, todo.scroll_offset, todo.tasks.len(), Color::DARKBROWN);
}

fn draw_slider(d: &mut RaylibDrawHandle, track: Rectangle, label: &str, value: f32) {
    d.draw_text(label, track.x as i32, track.y as i32 - 12, 10, Color::BLACK);
    d.draw_rectangle_rec(track, Color::LIGHTGRAY);
    d.draw_rectangle_rec(
        Rectangle::new(track.x, track.y, track.width * value, track.height),
        Color::SKYBLUE,
    );
    d.draw_rectangle_lines_ex(track, 1.0, Color::DARKGRAY);
}

fn draw_control_panel(world: &mut World, d: &mut RaylibDrawHandle) {
    let screen = *world.resource::<ScreenSize>();
    let volumes = *world.resource::<AudioVolumes>();
    let controlled = {
        let mut players = world.query_filtered::<&PlayerInput, With<Player>>();
        players.iter(world).next().map(|c| (c.controlled, c.frozen))
    };

    let (manual, wander) = control_panel_buttons(&screen);
    draw_button(d, manual, "Manual");
    draw_button(d, wander, "Wander");

    let mode = match controlled {
        Some((true, true)) => "Mode: manual (studying)",
        Some((true, false)) => "Mode: manual",
        Some((false, _)) => "Mode: wander",
        None => "Mode: -",
    };
    let y = screen.h as i32 - 64;
    d.draw_text(mode, 10, y, 16, Color::BLACK);
    d.draw_text(
        "Arrows move  X use  Z exit  M/W/T mode  F1 debug  F3 unstuck",
        10,
        y + 22,
        10,
        Color::DARKGRAY,
    );

    let (music, fx) = volume_sliders(&screen);
    draw_slider(d, music, "Music", volumes.music);
    draw_slider(d, fx, "FX", volumes.fx);
}

fn draw_debug(world: &mut World, d: &mut RaylibDrawHandle) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let current = world.resource::<SceneState>().current;
    let screen = *world.resource::<ScreenSize>();
    let offset_y = draw_offset_y(current, &screen);
    let shift = |r: Rectangle| Rectangle::new(r.x, r.y + offset_y, r.width, r.height);

    let mut bodies = world.query::<(Option<&Hitbox>, Option<&InteractionZone>, Option<&Scene>, Has<Player>)>();
    for (hitbox, zone, scene, is_player) in bodies.iter(world) {
        if !is_visible(scene.map(Scene::id), is_player, current) {
            continue;
        }
        if let Some(hb) = hitbox {
            let color = if hb.colliding { Color::RED } else { Color::GREEN };
            d.draw_rectangle_lines_ex(shift(hb.bounds), 1.0, color);
        }
        if let Some(zone) = zone {
            d.draw_rectangle_lines_ex(shift(zone.bounds), 1.0, Color::YELLOW);
        }
    }

    let player_pos = {
        let mut players = world.query_filtered::<&Position, With<Player>>();
        players.iter(world).next().copied()
    };
    let entity_count = world.iter_entities().count();
    let uptime = world.get_resource::<WorldTime>().map_or(0.0, |t| t.elapsed);
    let mut lines = vec![
        format!("DEBUG MODE (F1) | FPS: {} | {:.1}s", d.get_fps(), uptime),
        format!("Entities: {}", entity_count),
        format!("Scene: {} ({})", current, current.0),
    ];
    if let Some(p) = player_pos {
        lines.push(format!("Player: ({:.1}, {:.1})", p.x, p.y));
    }
    for (i, line) in lines.iter().enumerate() {
        d.draw_text(line, 10, 10 + i as i32 * 14, 10, Color::BLACK);
    }
}
