//! Session module - the tracked zone list and its transitions
//!
//! All widget state lives in [`Session`]. UI code never mutates it directly;
//! it records what the user did and the main loop calls one of the named
//! transitions below after the egui frame has finished.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    anchor_instant, format_zone_label, utc_label, with_local_date, ZoneRule, KOLKATA,
};

/// One tracked time zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneEntry {
    /// Display label
    pub name: String,
    /// IANA identifier or free-text label
    pub zone: String,
    /// Displayed hour-of-day (0-23)
    #[serde(default, skip_serializing)]
    pub slider_value: u32,
}

impl TimeZoneEntry {
    pub fn new(name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: zone.into(),
            slider_value: 0,
        }
    }

    /// Labels shown under this entry's slider, anchored on `now`
    pub fn readout_at(&self, now: DateTime<Utc>) -> Readout {
        let anchor = anchor_instant(now, self.slider_value);
        Readout {
            utc: utc_label(anchor),
            local: format_zone_label(anchor, &self.zone),
        }
    }
}

/// The two "HH:MM" strings derived from an entry's slider value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    /// Anchor in UTC
    pub utc: String,
    /// Anchor converted into the entry's zone
    pub local: String,
}

/// The zones every session starts with
pub fn default_seed() -> Vec<TimeZoneEntry> {
    vec![
        TimeZoneEntry::new("UTC", "UTC"),
        TimeZoneEntry::new("Indian Standard Time", KOLKATA),
    ]
}

/// Minimum list length; Remove is hidden at or below it
pub const MIN_ZONES: usize = 2;

/// Complete widget state
#[derive(Debug, Clone)]
pub struct Session {
    /// Tracked zones in display order
    pub entries: Vec<TimeZoneEntry>,
    /// Date (and time of day) used for meeting links
    pub selected_date: DateTime<Utc>,
    /// Flipped by every reverse; nothing reads it
    pub is_reversed: bool,
    /// Dark theme enabled
    pub dark_mode: bool,
    /// Zone chosen in the add-zone control, empty when nothing is chosen
    pub pending_zone: String,
    /// Entry currently being drag-reordered
    pub dragged_index: Option<usize>,
}

impl Session {
    /// Create a session seeded with `seed`, falling back to the default pair
    /// when fewer than [`MIN_ZONES`] entries are given.
    pub fn new(seed: Vec<TimeZoneEntry>, selected_date: DateTime<Utc>, dark_mode: bool) -> Self {
        let entries = if seed.len() < MIN_ZONES {
            tracing::warn!(count = seed.len(), "too few seed zones, using defaults");
            default_seed()
        } else {
            seed.into_iter()
                .map(|entry| TimeZoneEntry {
                    slider_value: 0,
                    ..entry
                })
                .collect()
        };

        Self {
            entries,
            selected_date,
            is_reversed: false,
            dark_mode,
            pending_zone: String::new(),
            dragged_index: None,
        }
    }

    /// Whether the Remove control should be offered
    pub fn can_remove(&self) -> bool {
        self.entries.len() > MIN_ZONES
    }

    /// Move the slider at `index` to `new_hour` using the current time
    pub fn change_slider(&mut self, new_hour: u32, index: usize) {
        self.change_slider_at(new_hour, index, Utc::now());
    }

    /// Move the slider at `index` to `new_hour`.
    ///
    /// `new_hour` becomes the UTC hour of the anchor instant, and every
    /// entry's slider value (including the one that moved) is replaced by the
    /// local hour of that anchor in its own zone.
    pub fn change_slider_at(&mut self, new_hour: u32, index: usize, now: DateTime<Utc>) {
        let new_hour = new_hour.min(23);
        if let Some(entry) = self.entries.get_mut(index) {
            entry.slider_value = new_hour;
        }

        let anchor = anchor_instant(now, new_hour);
        for entry in &mut self.entries {
            entry.slider_value = ZoneRule::for_slider(&entry.zone).local_hour(anchor);
        }
        tracing::debug!(new_hour, index, %anchor, "rebased sliders");
    }

    /// Append a zone; empty identifiers are ignored
    pub fn add_zone(&mut self, zone_identifier: &str) {
        if zone_identifier.is_empty() {
            return;
        }
        if !ZoneRule::general(zone_identifier).is_resolved() {
            tracing::warn!(zone = zone_identifier, "unknown time zone, hours will follow UTC");
        }
        self.entries.push(TimeZoneEntry::new(zone_identifier, zone_identifier));
        tracing::debug!(zone = zone_identifier, count = self.entries.len(), "added zone");
    }

    /// Add whatever the add-zone control currently holds
    pub fn add_pending_zone(&mut self) {
        let pending = self.pending_zone.clone();
        self.add_zone(&pending);
    }

    /// Set the add-zone control's selection
    pub fn select_pending(&mut self, zone: impl Into<String>) {
        self.pending_zone = zone.into();
    }

    /// Remove the entry at `index`; out-of-range indices do nothing.
    ///
    /// The minimum length is not checked here, only by [`Session::can_remove`].
    pub fn remove_zone(&mut self, index: usize) {
        if index < self.entries.len() {
            let removed = self.entries.remove(index);
            tracing::debug!(zone = %removed.zone, index, "removed zone");
        }
    }

    /// Reverse the list and flip the tracked flag
    pub fn reverse_order(&mut self) {
        self.entries.reverse();
        self.is_reversed = !self.is_reversed;
    }

    pub fn begin_drag(&mut self, index: usize) {
        self.dragged_index = Some(index);
    }

    pub fn end_drag(&mut self) {
        self.dragged_index = None;
    }

    /// The dragged entry is hovering over `target_index`
    pub fn drag_over(&mut self, target_index: usize) {
        if let Some(dragged) = self.dragged_index {
            self.reorder(dragged, target_index);
        }
    }

    /// Move the entry at `dragged_index` to `target_index` and keep tracking it
    pub fn reorder(&mut self, dragged_index: usize, target_index: usize) {
        if dragged_index == target_index || dragged_index >= self.entries.len() {
            return;
        }
        let entry = self.entries.remove(dragged_index);
        let target_index = target_index.min(self.entries.len());
        self.entries.insert(target_index, entry);
        self.dragged_index = Some(target_index);
    }

    /// Replace the local calendar date, keeping the local time of day
    pub fn set_date(&mut self, date: NaiveDate) {
        self.set_date_in(date, &Local);
    }

    /// [`Session::set_date`] against an explicit wall-clock zone
    pub fn set_date_in<Z: TimeZone>(&mut self, date: NaiveDate, zone: &Z) {
        self.selected_date = with_local_date(self.selected_date, date, zone);
        tracing::debug!(selected = %self.selected_date, "date changed");
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Zone identifiers in display order
    pub fn zone_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.zone.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::{calendar_stamp, schedule_meet_url};
    use chrono::FixedOffset;

    fn clock(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, h, m, 0).unwrap()
    }

    fn session() -> Session {
        Session::new(default_seed(), clock(12, 0), false)
    }

    fn zones(session: &Session) -> Vec<&str> {
        session.zone_ids().collect()
    }

    fn three_zones() -> Session {
        let mut s = session();
        s.add_zone("Europe/London");
        s
    }

    #[test]
    fn test_initial_state() {
        let s = session();
        assert_eq!(zones(&s), vec!["UTC", KOLKATA]);
        assert!(s.entries.iter().all(|e| e.slider_value == 0));
        assert!(!s.can_remove());
        assert_eq!(s.dragged_index, None);
        assert!(!s.is_reversed);
    }

    #[test]
    fn test_short_seed_falls_back_to_defaults() {
        let s = Session::new(vec![TimeZoneEntry::new("Solo", "UTC")], clock(0, 0), true);
        assert_eq!(s.entries, default_seed());
        assert!(s.dark_mode);
    }

    #[test]
    fn test_seed_slider_values_reset() {
        let mut seed = default_seed();
        seed[0].slider_value = 9;
        let s = Session::new(seed, clock(0, 0), false);
        assert_eq!(s.entries[0].slider_value, 0);
    }

    #[test]
    fn test_change_slider_rebases_every_entry() {
        for h in 0..24 {
            for index in 0..2 {
                let mut s = session();
                s.change_slider_at(h, index, clock(7, 0));
                assert_eq!(s.entries[0].slider_value, h);
                assert_eq!(s.entries[1].slider_value, (h + 5) % 24);
            }
        }
    }

    #[test]
    fn test_change_slider_half_hour_rolls_kolkata_forward() {
        let mut s = session();
        s.change_slider_at(18, 0, clock(3, 45));
        assert_eq!(s.entries[1].slider_value, 0);
    }

    #[test]
    fn test_change_slider_from_kolkata_row_uses_value_as_utc() {
        // Dragging the Kolkata slider to 10 still anchors at 10:00 UTC
        let mut s = session();
        s.change_slider_at(10, 1, clock(0, 0));
        assert_eq!(s.entries[0].slider_value, 10);
        assert_eq!(s.entries[1].slider_value, 15);
    }

    #[test]
    fn test_change_slider_named_and_unknown_zones() {
        let mut s = session();
        s.add_zone("America/New_York");
        s.add_zone("Eastern Time");
        s.change_slider_at(3, 0, clock(0, 0));
        assert_eq!(s.entries[2].slider_value, 22);
        assert_eq!(s.entries[3].slider_value, 3);
    }

    #[test]
    fn test_change_slider_clamps_hour() {
        let mut s = session();
        s.change_slider_at(40, 0, clock(0, 0));
        assert_eq!(s.entries[0].slider_value, 23);
    }

    #[test]
    fn test_add_zone() {
        let mut s = session();
        s.add_zone("Eastern Time");
        assert_eq!(s.entries.len(), 3);
        assert_eq!(s.entries[2], TimeZoneEntry::new("Eastern Time", "Eastern Time"));
        assert!(s.can_remove());
    }

    #[test]
    fn test_add_empty_zone_is_noop() {
        let mut s = session();
        s.add_zone("");
        assert_eq!(s.entries, default_seed());
    }

    #[test]
    fn test_add_pending_zone() {
        let mut s = session();
        s.add_pending_zone();
        assert_eq!(s.entries.len(), 2);

        s.select_pending("Pacific Standard Time");
        s.add_pending_zone();
        s.add_pending_zone();
        // Duplicates are allowed
        assert_eq!(&zones(&s)[2..], &["Pacific Standard Time", "Pacific Standard Time"]);
    }

    #[test]
    fn test_remove_zone_preserves_order() {
        let mut s = three_zones();
        s.remove_zone(1);
        assert_eq!(zones(&s), vec!["UTC", "Europe/London"]);
        assert!(!s.can_remove());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut s = three_zones();
        s.remove_zone(3);
        assert_eq!(s.entries.len(), 3);
    }

    #[test]
    fn test_reverse_twice_restores_order() {
        let mut s = three_zones();
        let original = s.entries.clone();
        s.reverse_order();
        assert_eq!(zones(&s), vec!["Europe/London", KOLKATA, "UTC"]);
        assert!(s.is_reversed);
        s.reverse_order();
        assert_eq!(s.entries, original);
        assert!(!s.is_reversed);
    }

    #[test]
    fn test_reorder_moves_and_tracks() {
        let mut s = three_zones();
        s.begin_drag(0);
        s.drag_over(2);
        assert_eq!(zones(&s), vec![KOLKATA, "Europe/London", "UTC"]);
        assert_eq!(s.dragged_index, Some(2));

        s.drag_over(1);
        assert_eq!(zones(&s), vec![KOLKATA, "UTC", "Europe/London"]);
        assert_eq!(s.dragged_index, Some(1));

        s.end_drag();
        s.drag_over(0);
        assert_eq!(zones(&s), vec![KOLKATA, "UTC", "Europe/London"]);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut s = three_zones();
        s.begin_drag(1);
        s.drag_over(1);
        assert_eq!(zones(&s), vec!["UTC", KOLKATA, "Europe/London"]);
        assert_eq!(s.dragged_index, Some(1));
    }

    #[test]
    fn test_set_date_keeps_time() {
        let mut s = session();
        s.set_date_in(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), &Utc);
        assert_eq!(s.selected_date, Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_set_date_uses_local_calendar() {
        // 02:00 on June 1st in Kolkata, still May 31st in UTC
        let kolkata = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let selected = Utc.with_ymd_and_hms(2025, 5, 31, 20, 30, 0).unwrap();
        let mut s = Session::new(default_seed(), selected, false);

        s.set_date_in(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), &kolkata);
        assert_eq!(calendar_stamp(s.selected_date), "20250531T203000Z");
        assert!(schedule_meet_url(s.selected_date)
            .contains("dates=20250531T203000Z/20250531T203000Z"));

        s.set_date_in(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), &kolkata);
        assert_eq!(calendar_stamp(s.selected_date), "20250601T203000Z");
    }

    #[test]
    fn test_toggle_dark_mode() {
        let mut s = session();
        s.toggle_dark_mode();
        assert!(s.dark_mode);
        s.toggle_dark_mode();
        assert!(!s.dark_mode);
    }

    #[test]
    fn test_readout_double_shifts_local_zone() {
        // After a rebase Kolkata holds its local hour, which the readout then
        // treats as a UTC hour again
        let mut s = session();
        s.change_slider_at(4, 0, clock(0, 0));
        let readout = s.entries[1].readout_at(clock(0, 0));
        assert_eq!(readout.utc, "09:00");
        assert_eq!(readout.local, "14:30");
    }
}
