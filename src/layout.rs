use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::KvStore;

/// Canonical store key for the section layout snapshot
pub const CANONICAL_KEY: &str = "wd-contact-sections-order";
/// Pre-2.0 store key, migrated forward on first restore
pub const LEGACY_KEY: &str = "contactSectionsOrder";
/// Backup written by the pre-2.0 code, deleted together with the legacy key
pub const LEGACY_BACKUP_KEY: &str = "contactSectionsBackup";
/// Schema tag written into every snapshot
pub const SNAPSHOT_VERSION: &str = "2.0";

/// Default trailing-edge delay for coalesced snapshot writes
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

// =============================================================================
// Model
// =============================================================================

/// Static definition of a section, as configured (id + visible title).
#[derive(Debug, Clone)]
pub struct SectionDef {
    pub id: Option<String>,
    pub title: String,
}

impl SectionDef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
        }
    }
}

/// A live collapsible section in the contact-info container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Stable identity: the configured id, or a synthesized key when absent
    pub key: String,
    pub title: String,
    /// Expanded/collapsed; sections start collapsed
    pub open: bool,
}

/// One entry of the persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSection {
    pub id: String,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    pub order: usize,
}

/// The persisted layout record (schema "2.0").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub sections: Vec<SavedSection>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
    pub version: String,
}

/// A saved entry normalized from either the 2.0 wrapper or a legacy record.
/// Legacy entries may lack an id and carry a title instead; legacy
/// `collapsed` is inverted into `open`.
#[derive(Debug, Clone)]
struct RestoreEntry {
    id: Option<String>,
    title: Option<String>,
    open: Option<bool>,
}

fn epoch_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn synthesize_key() -> String {
    format!("section-{}", Uuid::new_v4())
}

// =============================================================================
// Debouncer
// =============================================================================

/// Trailing-edge debounce timer, polled from the event loop. Re-scheduling
/// while a write is pending resets the timer; it never queues a second fire.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once after the quiet period elapses.
    pub fn fire(&mut self) -> bool {
        self.fire_at(Instant::now())
    }

    pub fn fire_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

// =============================================================================
// Section Layout Manager
// =============================================================================

/// Owns the ordered list of collapsible sections in the contact-info panel:
/// grab/move/drop reordering, collapse/expand, and snapshot persistence with
/// one-time migration from the legacy store keys.
///
/// One instance per container; the drag session and debounce timer are
/// instance state, not globals.
#[derive(Debug)]
pub struct SectionLayout {
    sections: Vec<Section>,
    drag: Option<usize>,
    drop_target: Option<usize>,
    debounce: Debouncer,
}

impl SectionLayout {
    pub fn new(defs: &[SectionDef], debounce_delay: Duration) -> Self {
        let sections = defs
            .iter()
            .map(|def| Section {
                key: def.id.clone().unwrap_or_else(synthesize_key),
                title: def.title.clone(),
                open: false,
            })
            .collect();
        Self {
            sections,
            drag: None,
            drop_target: None,
            debounce: Debouncer::new(debounce_delay),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag
    }

    pub fn drop_target(&self) -> Option<usize> {
        self.drop_target
    }

    pub fn debounce(&mut self) -> &mut Debouncer {
        &mut self.debounce
    }

    // -------------------------------------------------------------------------
    // Snapshot capture / persistence
    // -------------------------------------------------------------------------

    /// Serialize the current order and open/closed flags. Order is the index
    /// in the live sequence, so a replayed snapshot reproduces exactly this
    /// arrangement.
    pub fn capture_snapshot(&self) -> LayoutSnapshot {
        let sections = self
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| SavedSection {
                id: section.key.clone(),
                is_open: section.open,
                order: index,
            })
            .collect();
        LayoutSnapshot {
            sections,
            last_updated: epoch_ms(),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Capture and write the full snapshot under the canonical key,
    /// overwriting any previous value.
    pub fn save(&self, store: &mut KvStore) -> Result<()> {
        let snapshot = self.capture_snapshot();
        let body = serde_json::to_string(&snapshot).context("serializing layout snapshot")?;
        store.set(CANONICAL_KEY, body)
    }

    /// Restore order and open/closed state from the store.
    ///
    /// Reads the canonical key, migrating the legacy key forward first if the
    /// canonical one is absent. Entries are applied in saved order by moving
    /// each matched section to the end of the sequence, which makes the
    /// operation idempotent. Entries that match no live section are skipped.
    ///
    /// Returns `true` when a stored value was found and parsed; malformed
    /// JSON is logged and treated as absent data.
    pub fn restore(&mut self, store: &mut KvStore) -> bool {
        let (raw, migrated) = match store.get(CANONICAL_KEY) {
            Some(raw) => (raw.to_string(), false),
            None => match migrate_legacy(store) {
                Some(raw) => (raw, true),
                None => return false,
            },
        };

        let Some(entries) = parse_entries(&raw) else {
            return false;
        };

        for entry in &entries {
            let Some(index) = self.resolve(entry.id.as_deref(), entry.title.as_deref()) else {
                debug!(id = ?entry.id, title = ?entry.title, "saved section has no live match");
                continue;
            };
            let mut section = self.sections.remove(index);
            if let Some(open) = entry.open {
                section.open = open;
            }
            self.sections.push(section);
        }

        if migrated {
            // Rewrite the migrated record in the current schema
            if let Err(err) = self.save(store) {
                warn!(%err, "rewriting migrated layout snapshot failed");
            }
        }

        true
    }

    /// Identity resolver: saved id against the live key first, then exact
    /// title text for legacy entries that carry no id or whose id no longer
    /// matches.
    fn resolve(&self, id: Option<&str>, title: Option<&str>) -> Option<usize> {
        if let Some(id) = id {
            if let Some(index) = self.sections.iter().position(|s| s.key == id) {
                return Some(index);
            }
        }
        if let Some(title) = title {
            return self.sections.iter().position(|s| s.title == title);
        }
        None
    }

    // -------------------------------------------------------------------------
    // Toggle
    // -------------------------------------------------------------------------

    /// Flip a section between expanded and collapsed. Returns false when the
    /// index is out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.sections.get_mut(index) {
            Some(section) => {
                section.open = !section.open;
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Drag session
    // -------------------------------------------------------------------------

    /// Begin a drag session for the section at `index`. Only one section may
    /// be dragged at a time; starting a new session replaces the old marker.
    pub fn start_drag(&mut self, index: usize) -> bool {
        if index >= self.sections.len() {
            return false;
        }
        self.drag = Some(index);
        self.drop_target = None;
        true
    }

    /// Mark `index` as the candidate drop target. No data mutation happens
    /// until the drop; hovering the dragged section itself clears the marker.
    pub fn drag_over(&mut self, index: usize) {
        if self.drag.is_none() || index >= self.sections.len() {
            return;
        }
        if self.drag == Some(index) {
            self.drop_target = None;
        } else {
            self.drop_target = Some(index);
        }
    }

    pub fn drag_leave(&mut self) {
        self.drop_target = None;
    }

    /// Drop the dragged section on `target`. If the dragged section sat
    /// before the target it lands immediately after it, otherwise immediately
    /// before it; both cases reduce to reinserting at the target's original
    /// index once the dragged element is removed. Dropping a section on
    /// itself is a no-op. Returns true when the order changed.
    pub fn drop_on(&mut self, target: usize) -> bool {
        let Some(from) = self.drag else {
            return false;
        };
        self.drop_target = None;
        if from == target || target >= self.sections.len() {
            return false;
        }

        let section = self.sections.remove(from);
        self.sections.insert(target, section);
        // Dragged index follows the section so a later drop_on still works
        self.drag = Some(target);
        true
    }

    /// End the drag session, clearing all drag markers. Returns true when a
    /// session was active; the caller writes exactly one snapshot then.
    pub fn end_drag(&mut self) -> bool {
        self.drop_target = None;
        self.drag.take().is_some()
    }
}

// =============================================================================
// Store-level helpers
// =============================================================================

/// Copy the legacy record under the canonical key and delete both legacy
/// keys. Returns the raw legacy value when one existed.
fn migrate_legacy(store: &mut KvStore) -> Option<String> {
    let raw = store.get(LEGACY_KEY)?.to_string();
    if let Err(err) = store.set(CANONICAL_KEY, raw.clone()) {
        warn!(%err, "migrating legacy layout key failed");
    }
    if let Err(err) = store.remove(LEGACY_KEY) {
        warn!(%err, "removing legacy layout key failed");
    }
    if let Err(err) = store.remove(LEGACY_BACKUP_KEY) {
        warn!(%err, "removing legacy backup key failed");
    }
    debug!("migrated section layout from legacy key");
    Some(raw)
}

/// Clear the canonical key and all legacy keys. The next view built from
/// defaults shows the default markup order.
pub fn reset(store: &mut KvStore) -> Result<()> {
    store.remove(CANONICAL_KEY)?;
    store.remove(LEGACY_KEY)?;
    store.remove(LEGACY_BACKUP_KEY)?;
    Ok(())
}

/// Parse a stored value into restore entries. Accepts the 2.0 wrapper
/// (object with a `sections` array) and the bare legacy array.
fn parse_entries(raw: &str) -> Option<Vec<RestoreEntry>> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "stored layout snapshot is not valid JSON");
            return None;
        }
    };

    let items = if let Some(sections) = value.get("sections").and_then(Value::as_array) {
        sections
    } else if let Some(items) = value.as_array() {
        items
    } else {
        warn!("stored layout snapshot has an unknown shape");
        return None;
    };

    let entries = items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let id = obj.get("id").and_then(Value::as_str).map(str::to_string);
            let title = obj
                .get("title")
                .or_else(|| obj.get("sectionTitle"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let open = obj
                .get("isOpen")
                .and_then(Value::as_bool)
                .or_else(|| obj.get("collapsed").and_then(Value::as_bool).map(|c| !c));
            Some(RestoreEntry { id, title, open })
        })
        .collect();
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<SectionDef> {
        vec![
            SectionDef::new("conversation-actions", "Conversation actions"),
            SectionDef::new("conversation-info", "Conversation info"),
            SectionDef::new("conversation-variables", "Conversation variables"),
            SectionDef::new("previous-conversations", "Previous conversations"),
        ]
    }

    fn keys(layout: &SectionLayout) -> Vec<&str> {
        layout.sections().iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn round_trip_restores_order_and_open_flags() {
        let mut store = KvStore::in_memory();
        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);

        layout.toggle(1);
        layout.start_drag(0);
        layout.drop_on(3);
        layout.end_drag();
        layout.save(&mut store).unwrap();
        let saved_keys: Vec<String> =
            layout.sections().iter().map(|s| s.key.clone()).collect();

        // Fresh container in default markup order
        let mut restored = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(restored.restore(&mut store));

        assert_eq!(
            keys(&restored),
            saved_keys.iter().map(String::as_str).collect::<Vec<_>>()
        );
        let info = restored
            .sections()
            .iter()
            .find(|s| s.key == "conversation-info")
            .unwrap();
        assert!(info.open);
        assert!(restored
            .sections()
            .iter()
            .filter(|s| s.key != "conversation-info")
            .all(|s| !s.open));
    }

    #[test]
    fn restore_is_idempotent() {
        let mut store = KvStore::in_memory();
        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        layout.start_drag(2);
        layout.drop_on(0);
        layout.end_drag();
        layout.toggle(0);
        layout.save(&mut store).unwrap();

        let mut restored = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(restored.restore(&mut store));
        let once: Vec<Section> = restored.sections().to_vec();
        assert!(restored.restore(&mut store));
        assert_eq!(restored.sections(), once.as_slice());
    }

    #[test]
    fn legacy_key_is_migrated_and_rewritten_as_current_schema() {
        let mut store = KvStore::in_memory();
        let legacy = r#"[
            {"id":"previous-conversations","order":0,"collapsed":false},
            {"id":"conversation-actions","order":1,"collapsed":true}
        ]"#;
        store.set(LEGACY_KEY, legacy).unwrap();
        store.set(LEGACY_BACKUP_KEY, legacy).unwrap();

        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(layout.restore(&mut store));

        // Order applied: the two saved entries moved to the end, in order
        assert_eq!(
            keys(&layout),
            vec![
                "conversation-info",
                "conversation-variables",
                "previous-conversations",
                "conversation-actions",
            ]
        );
        assert!(layout.sections()[2].open);
        assert!(!layout.sections()[3].open);

        // Legacy keys gone, canonical key holds a "2.0" record
        assert!(store.get(LEGACY_KEY).is_none());
        assert!(store.get(LEGACY_BACKUP_KEY).is_none());
        let snapshot: LayoutSnapshot =
            serde_json::from_str(store.get(CANONICAL_KEY).unwrap()).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.sections.len(), 4);
    }

    #[test]
    fn legacy_entry_without_id_matches_by_title() {
        let mut store = KvStore::in_memory();
        let legacy = r#"[{"title":"Conversation variables","order":0,"collapsed":false}]"#;
        store.set(CANONICAL_KEY, legacy).unwrap();

        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(layout.restore(&mut store));
        assert_eq!(keys(&layout).last(), Some(&"conversation-variables"));
        assert!(layout.sections().last().unwrap().open);
    }

    #[test]
    fn unknown_id_is_skipped_without_error() {
        let mut store = KvStore::in_memory();
        let saved = r#"{
            "sections": [
                {"id":"no-such-section","isOpen":true,"order":0},
                {"id":"conversation-info","isOpen":true,"order":1}
            ],
            "lastUpdated": 0,
            "version": "2.0"
        }"#;
        store.set(CANONICAL_KEY, saved).unwrap();

        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(layout.restore(&mut store));
        assert_eq!(keys(&layout).last(), Some(&"conversation-info"));
        assert!(layout.sections().last().unwrap().open);
    }

    #[test]
    fn malformed_snapshot_is_treated_as_absent() {
        let mut store = KvStore::in_memory();
        store.set(CANONICAL_KEY, "{broken").unwrap();

        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        let default_keys: Vec<String> =
            layout.sections().iter().map(|s| s.key.clone()).collect();
        assert!(!layout.restore(&mut store));
        assert_eq!(
            keys(&layout),
            default_keys.iter().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn restore_without_stored_data_reports_failure() {
        let mut store = KvStore::in_memory();
        let mut layout = SectionLayout::new(&defs(), DEFAULT_DEBOUNCE);
        assert!(!layout.restore(&mut store));
    }

    #[test]
    fn drop_after_target_when_dragged_from_before() {
        // [A(open), B, C]: dragging A onto C yields [B, C, A]
        let defs = vec![
            SectionDef::new("a", "A"),
            SectionDef::new("b", "B"),
            SectionDef::new("c", "C"),
        ];
        let mut store = KvStore::in_memory();
        let mut layout = SectionLayout::new(&defs, DEFAULT_DEBOUNCE);
        layout.toggle(0);

        assert!(layout.start_drag(0));
        layout.drag_over(2);
        assert_eq!(layout.drop_target(), Some(2));
        assert!(layout.drop_on(2));
        // No write happens until the drag ends
        assert!(store.get(CANONICAL_KEY).is_none());
        assert!(layout.end_drag());
        layout.save(&mut store).unwrap();

        assert_eq!(keys(&layout), vec!["b", "c", "a"]);
        assert!(layout.sections()[2].open);
        assert!(store.get(CANONICAL_KEY).is_some());
    }

    #[test]
    fn drop_before_target_when_dragged_from_after() {
        let defs = vec![
            SectionDef::new("a", "A"),
            SectionDef::new("b", "B"),
            SectionDef::new("c", "C"),
        ];
        let mut layout = SectionLayout::new(&defs, DEFAULT_DEBOUNCE);
        layout.start_drag(2);
        assert!(layout.drop_on(0));
        layout.end_drag();
        assert_eq!(keys(&layout), vec!["c", "a", "b"]);
    }

    #[test]
    fn drop_on_self_is_a_noop() {
        let defs = vec![SectionDef::new("a", "A"), SectionDef::new("b", "B")];
        let mut layout = SectionLayout::new(&defs, DEFAULT_DEBOUNCE);
        layout.start_drag(1);
        layout.drag_over(1);
        assert_eq!(layout.drop_target(), None);
        assert!(!layout.drop_on(1));
        assert_eq!(keys(&layout), vec!["a", "b"]);
    }

    #[test]
    fn debounce_coalesces_a_burst_into_one_fire() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        let t0 = Instant::now();

        // Five triggers 25ms apart; each one resets the timer
        for i in 0..5u64 {
            debouncer.schedule_at(t0 + Duration::from_millis(i * 25));
        }

        assert!(!debouncer.fire_at(t0 + Duration::from_millis(200)));
        assert!(debouncer.fire_at(t0 + Duration::from_millis(351)));
        // Already fired; nothing queued behind it
        assert!(!debouncer.fire_at(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn defs_without_id_get_synthesized_keys() {
        let defs = vec![
            SectionDef {
                id: None,
                title: "Untitled".into(),
            },
            SectionDef {
                id: None,
                title: "Untitled".into(),
            },
        ];
        let layout = SectionLayout::new(&defs, DEFAULT_DEBOUNCE);
        assert!(layout.sections()[0].key.starts_with("section-"));
        assert_ne!(layout.sections()[0].key, layout.sections()[1].key);
    }
}
