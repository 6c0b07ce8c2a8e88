//! Zone Slider
//!
//! Compare the hour of day across several time zones. Dragging any zone's
//! slider re-anchors every zone on one UTC instant; zones can be reordered by
//! drag, added, removed and reversed, and the selected date feeds meeting
//! links.

mod drawing;
mod links;
mod prefs;
mod session;
mod ui;

use chrono::Utc;
use clap::Parser;
use nannou::prelude::*;
use nannou_egui::{self, egui, Egui};

use crate::drawing::{colors, draw_timeline, TimelineLayout};
use crate::links::{open_in_browser, schedule_meet_url, shareable_link};
use crate::prefs::{load_preferences, Args, Config};
use crate::session::Session;
use crate::ui::{
    draw_controls, draw_share_window, draw_zone_list, draw_zone_picker, ShareDialog,
    ZonePickerState,
};

const LEFT_PANEL_WIDTH: f32 = 420.0;
const TOP_PANEL_HEIGHT: f32 = 40.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    nannou::app(model).update(update).run();
}

/// Application state
struct Model {
    /// All widget state
    session: Session,
    /// Preferences loaded at startup
    config: Config,
    /// IANA zone picker window
    picker: ZonePickerState,
    /// Open share window, if any
    share_dialog: Option<ShareDialog>,
    /// Whether an egui text field has keyboard focus
    text_focus: bool,
    /// egui integration
    egui: Egui,
}

impl Model {
    fn share_link(&mut self) {
        let link = shareable_link(
            &self.config.share_origin,
            self.session.selected_date,
            self.session.zone_ids(),
        )
        .map(|url| url.to_string())
        .map_err(|e| e.to_string());

        match &link {
            Ok(url) => tracing::info!(%url, "generated share link"),
            Err(e) => tracing::warn!("Failed to build share link: {}", e),
        }
        self.share_dialog = Some(ShareDialog { link });
    }

    fn schedule_meet(&self) {
        open_in_browser(&schedule_meet_url(self.session.selected_date));
    }
}

fn model(app: &App) -> Model {
    let args = Args::parse();

    // Create window
    let window_id = app
        .new_window()
        .title("Zone Slider")
        .size(1280, 720)
        .min_size(900, 500)
        .view(view)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config = load_preferences(&args);
    let session = Session::new(config.seed_zones.clone(), Utc::now(), config.dark_mode);
    tracing::info!(
        zones = session.entries.len(),
        dark_mode = session.dark_mode,
        "session started"
    );

    Model {
        session,
        config,
        picker: ZonePickerState::default(),
        share_dialog: None,
        text_focus: false,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    let now = Utc::now();

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    ctx.set_visuals(if model.session.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let controls = draw_controls(&ctx, &model.session, &model.config.zone_options);
    let list = draw_zone_list(&ctx, &model.session, LEFT_PANEL_WIDTH, now);
    let picked = if model.picker.is_open {
        let tracked: Vec<&str> = model.session.zone_ids().collect();
        draw_zone_picker(&ctx, &mut model.picker, &tracked)
    } else {
        Default::default()
    };
    let close_share = model
        .share_dialog
        .as_ref()
        .map(|dialog| draw_share_window(&ctx, dialog))
        .unwrap_or(false);
    model.text_focus = ctx.wants_keyboard_input();

    // Now apply UI results after egui frame is done (ctx is dropped here)
    drop(ctx);

    let session = &mut model.session;

    // Zone list
    if let Some((index, hour)) = list.slider_changed {
        session.change_slider(hour, index);
    }
    if let Some(index) = list.drag_started {
        session.begin_drag(index);
    }
    if let Some(index) = list.drag_over {
        session.drag_over(index);
    }
    if list.drag_ended {
        session.end_drag();
    }
    if let Some(index) = list.remove_zone {
        session.remove_zone(index);
    }

    // Controls bar
    if let Some(date) = controls.set_date {
        session.set_date(date);
    }
    if controls.reverse_order {
        session.reverse_order();
    }
    if controls.toggle_dark_mode {
        session.toggle_dark_mode();
    }
    if let Some(zone) = controls.select_pending {
        session.select_pending(zone);
    }
    if controls.add_zone {
        session.add_pending_zone();
    }
    if let Some(zone) = picked.add_zone {
        session.select_pending(zone);
        session.add_pending_zone();
    }
    if picked.close_picker {
        model.picker.close();
    }
    if controls.open_picker {
        model.picker.open();
    }
    if controls.share_link {
        model.share_link();
    }
    if controls.schedule_meet {
        model.schedule_meet();
    }

    if close_share {
        model.share_dialog = None;
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let palette = colors::for_mode(model.session.dark_mode);

    // Clear background
    draw.background().color(palette.background);

    let layout = TimelineLayout::calculate(window_rect, LEFT_PANEL_WIDTH, TOP_PANEL_HEIGHT);
    draw_timeline(
        &draw,
        &layout,
        &model.session.entries,
        model.session.dragged_index,
        palette,
        Utc::now(),
    );

    // Render to frame
    if let Err(e) = draw.to_frame(app, &frame) {
        tracing::warn!("Failed to render timeline: {:?}", e);
    }

    // Render egui on top
    if let Err(e) = model.egui.draw_to_frame(&frame) {
        tracing::warn!("Failed to render controls: {:?}", e);
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.text_focus {
        return;
    }

    match key {
        // Escape closes the share window or the picker, or cancels a drag
        Key::Escape => {
            if model.share_dialog.is_some() {
                model.share_dialog = None;
            } else if model.picker.is_open {
                model.picker.close();
            } else {
                model.session.end_drag();
            }
        }
        Key::D => model.session.toggle_dark_mode(),
        Key::R => model.session.reverse_order(),
        Key::S => model.share_link(),
        Key::M => model.schedule_meet(),
        _ => {}
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events for keyboard and mouse input
    model.egui.handle_raw_event(event);
}
