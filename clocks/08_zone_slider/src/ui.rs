//! UI module - egui controls for the zone slider
//!
//! Provides:
//! - Controls bar (top panel): share, schedule, date stepper, reverse, theme, add zone
//! - Zone list (left panel): one slider row per zone with drag handle and remove button
//! - Share window: the generated public link with a copy button
//! - Zone picker: searchable list of every IANA time zone
//!
//! Drawing functions only read the session. They return result structs that
//! the main loop applies once the egui frame is done.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use nannou_egui::egui;
use shared::{
    anchor_instant, clamp_date, format_utc_offset, local_date, search_timezones, shift_date,
    utc_offset_minutes,
};

use crate::session::Session;

/// State for the IANA zone picker window
#[derive(Default)]
pub struct ZonePickerState {
    /// Whether the picker is currently open
    pub is_open: bool,
    /// Current search query
    pub search_query: String,
    /// Cached search results
    pub search_results: Vec<Tz>,
    /// Whether the search field should be focused
    pub should_focus_search: bool,
}

impl ZonePickerState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.search_query.clear();
        self.search_results = search_timezones("");
        self.should_focus_search = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn update_search(&mut self) {
        self.search_results = search_timezones(self.search_query.trim());
    }
}

/// Result of zone picker interactions
#[derive(Default)]
pub struct PickerResult {
    /// IANA zone chosen from the list
    pub add_zone: Option<String>,
    /// If true, close the picker
    pub close_picker: bool,
}

/// Result of controls bar interactions
#[derive(Default)]
pub struct ControlsResult {
    pub share_link: bool,
    pub schedule_meet: bool,
    pub reverse_order: bool,
    pub toggle_dark_mode: bool,
    /// New add-zone selection
    pub select_pending: Option<String>,
    /// Add button clicked
    pub add_zone: bool,
    /// Search button clicked
    pub open_picker: bool,
    /// New calendar date
    pub set_date: Option<NaiveDate>,
}

/// Result of zone list interactions
#[derive(Default)]
pub struct ZoneListResult {
    /// (index, new hour)
    pub slider_changed: Option<(usize, u32)>,
    pub remove_zone: Option<usize>,
    pub drag_started: Option<usize>,
    /// Row currently under the pointer while dragging
    pub drag_over: Option<usize>,
    pub drag_ended: bool,
}

/// Contents of the share window
pub struct ShareDialog {
    /// The link, or the reason it could not be built
    pub link: Result<String, String>,
}

/// Draw the controls bar (top)
pub fn draw_controls(
    ctx: &egui::Context,
    session: &Session,
    zone_options: &[String],
) -> ControlsResult {
    let mut result = ControlsResult::default();

    egui::TopBottomPanel::top("controls_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                if ui.button("Get Shareable Public Link").clicked() {
                    result.share_link = true;
                }
                if ui.button("Schedule Meet").clicked() {
                    result.schedule_meet = true;
                }

                ui.separator();
                result.set_date = draw_date_stepper(ui, session.selected_date);
                ui.separator();

                if ui.button("Reverse Order").clicked() {
                    result.reverse_order = true;
                }
                let theme_label = if session.dark_mode { "Light Mode" } else { "Dark Mode" };
                if ui.button(theme_label).on_hover_text("Toggle dark mode (D)").clicked() {
                    result.toggle_dark_mode = true;
                }

                ui.separator();
                result.select_pending = draw_zone_combo(ui, &session.pending_zone, zone_options);
                if ui.button("Add Time Zone").clicked() {
                    result.add_zone = true;
                }
                if ui.button("Search…").on_hover_text("Find any IANA time zone").clicked() {
                    result.open_picker = true;
                }
            });
            ui.add_space(4.0);
        });

    result
}

/// Previous/next day buttons plus editable year, month and day.
///
/// Works on the calendar date of the machine's local zone.
fn draw_date_stepper(ui: &mut egui::Ui, selected: DateTime<Utc>) -> Option<NaiveDate> {
    let date = local_date(selected, &Local);
    let mut picked = None;

    if ui.small_button("◀").on_hover_text("Previous day").clicked() {
        picked = Some(shift_date(date, -1));
    }

    let mut year = date.year();
    let mut month = date.month();
    let mut day = date.day();
    let mut edited = false;
    edited |= ui
        .add(egui::DragValue::new(&mut year).clamp_range(1970..=2100))
        .changed();
    ui.label("-");
    edited |= ui
        .add(egui::DragValue::new(&mut month).clamp_range(1..=12))
        .changed();
    ui.label("-");
    edited |= ui
        .add(egui::DragValue::new(&mut day).clamp_range(1..=31))
        .changed();
    if edited {
        picked = clamp_date(year, month, day);
    }

    if ui.small_button("▶").on_hover_text("Next day").clicked() {
        picked = Some(shift_date(date, 1));
    }
    if ui.small_button("Today").clicked() {
        picked = Some(Local::now().date_naive());
    }

    picked.filter(|&new_date| new_date != date)
}

/// Add-zone selector over the configured options
fn draw_zone_combo(ui: &mut egui::Ui, pending: &str, zone_options: &[String]) -> Option<String> {
    let mut selected = None;
    let shown = if pending.is_empty() { "Select Time Zone" } else { pending };

    egui::ComboBox::from_id_source("add_zone_combo")
        .selected_text(shown)
        .width(220.0)
        .show_ui(ui, |ui| {
            if ui.selectable_label(pending.is_empty(), "Select Time Zone").clicked() {
                selected = Some(String::new());
            }
            for option in zone_options {
                if ui.selectable_label(pending == option, option).clicked() {
                    selected = Some(option.clone());
                }
            }
        });

    selected
}

/// Draw the zone picker window
pub fn draw_zone_picker(
    ctx: &egui::Context,
    picker: &mut ZonePickerState,
    tracked_zones: &[&str],
) -> PickerResult {
    let mut result = PickerResult::default();
    let mut is_open = picker.is_open;

    egui::Window::new("Add Time Zone")
        .open(&mut is_open)
        .collapsible(false)
        .resizable(true)
        .default_width(380.0)
        .default_height(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                let response = ui.text_edit_singleline(&mut picker.search_query);
                if picker.should_focus_search {
                    response.request_focus();
                    picker.should_focus_search = false;
                }
                if response.changed() {
                    picker.update_search();
                }
            });

            ui.separator();
            ui.label(format!("{} time zones found", picker.search_results.len()));

            egui::ScrollArea::vertical()
                .max_height(300.0)
                .show(ui, |ui| {
                    for tz in &picker.search_results {
                        // Duplicates are allowed, so tracked zones stay clickable
                        let tracked = tracked_zones.contains(&tz.name());
                        let label = if tracked {
                            format!("{} ✓", tz.name())
                        } else {
                            tz.name().to_string()
                        };
                        if ui.selectable_label(tracked, label).clicked() {
                            result.add_zone = Some(tz.name().to_string());
                            result.close_picker = true;
                        }
                    }
                });

            ui.separator();
            if ui.button("Cancel").clicked() {
                result.close_picker = true;
            }
        });

    // Title bar close button
    if !is_open {
        result.close_picker = true;
    }
    result
}

/// Draw the zone list (left)
pub fn draw_zone_list(
    ctx: &egui::Context,
    session: &Session,
    panel_width: f32,
    now: DateTime<Utc>,
) -> ZoneListResult {
    let mut result = ZoneListResult::default();
    let can_remove = session.can_remove();

    egui::SidePanel::left("zone_list_panel")
        .resizable(false)
        .exact_width(panel_width)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Convert Time between Time Zones");
            ui.add_space(10.0);

            let mut row_rects = Vec::with_capacity(session.entries.len());

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, entry) in session.entries.iter().enumerate() {
                    let is_dragged = session.dragged_index == Some(index);
                    let mut frame = egui::Frame::group(ui.style());
                    if is_dragged {
                        frame = frame.stroke(ui.visuals().selection.stroke);
                    }

                    // The zone id keys the row, so duplicate zones share widget state
                    let row = ui.push_id(&entry.zone, |ui| {
                        frame.show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                let handle = ui
                                    .add(egui::Label::new("≡").sense(egui::Sense::drag()))
                                    .on_hover_text("Drag to reorder");
                                if handle.drag_started() {
                                    result.drag_started = Some(index);
                                }
                                if handle.drag_released() {
                                    result.drag_ended = true;
                                }

                                ui.strong(&entry.name);

                                if can_remove {
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui.small_button("Remove").clicked() {
                                                result.remove_zone = Some(index);
                                            }
                                        },
                                    );
                                }
                            });

                            let mut hour = entry.slider_value;
                            if ui
                                .add(egui::Slider::new(&mut hour, 0..=23).text("h"))
                                .changed()
                            {
                                result.slider_changed = Some((index, hour));
                            }

                            let readout = entry.readout_at(now);
                            let anchor = anchor_instant(now, entry.slider_value);
                            ui.label(format!("{} UTC", readout.utc));
                            ui.label(format!("{} {}", readout.local, entry.name))
                                .on_hover_text(format_utc_offset(utc_offset_minutes(
                                    &entry.zone,
                                    anchor,
                                )));
                        })
                    });
                    row_rects.push(row.response.rect);
                    ui.add_space(6.0);
                }
            });

            if session.dragged_index.is_some() {
                let pointer = ui.input(|i| i.pointer.hover_pos());
                if let Some(pos) = pointer {
                    result.drag_over = row_rects.iter().position(|rect| rect.contains(pos));
                }
                if ui.input(|i| i.pointer.any_released()) {
                    result.drag_ended = true;
                }
            }
        });

    result
}

/// Draw the share window. Returns true when it should close.
pub fn draw_share_window(ctx: &egui::Context, dialog: &ShareDialog) -> bool {
    let mut close = false;

    egui::Window::new("Shareable Public Link")
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            match &dialog.link {
                Ok(link) => {
                    ui.label("Shareable public link:");
                    ui.add(egui::Label::new(egui::RichText::new(link).monospace()).wrap(true));
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.button("Copy").clicked() {
                            ui.output_mut(|o| o.copied_text = link.clone());
                        }
                        if ui.button("OK").clicked() {
                            close = true;
                        }
                    });
                }
                Err(reason) => {
                    ui.colored_label(egui::Color32::from_rgb(255, 107, 53), reason);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                }
            }
        });

    close
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_opens_on_every_zone() {
        let mut picker = ZonePickerState::default();
        assert!(!picker.is_open);

        picker.open();
        assert!(picker.is_open);
        assert!(picker.should_focus_search);
        assert_eq!(picker.search_results.len(), chrono_tz::TZ_VARIANTS.len());
    }

    #[test]
    fn test_picker_search() {
        let mut picker = ZonePickerState::default();
        picker.open();
        picker.search_query = "kolk".to_string();
        picker.update_search();
        assert!(picker.search_results.iter().any(|tz| tz.name() == "Asia/Kolkata"));
        assert!(picker.search_results.len() < 5);

        picker.search_query = "   ".to_string();
        picker.update_search();
        assert_eq!(picker.search_results.len(), chrono_tz::TZ_VARIANTS.len());
    }

    #[test]
    fn test_picker_close_resets() {
        let mut picker = ZonePickerState::default();
        picker.open();
        picker.search_query = "tokyo".to_string();
        picker.update_search();

        picker.close();
        assert!(!picker.is_open);
        assert!(picker.search_query.is_empty());
        assert!(picker.search_results.is_empty());

        // Reopening starts from a fresh query
        picker.open();
        assert!(picker.search_query.is_empty());
        assert!(picker.should_focus_search);
    }
}
