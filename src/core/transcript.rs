//! Append-only transcript with removable entries.
//!
//! Entries are kept in arrival order and addressed by [`EntryHandle`]s drawn
//! from a per-transcript counter, so two placeholders created back to back
//! never share an identity. Removing an entry leaves the relative order of
//! everything else untouched.
//!
//! Scrolling is tracked here as well: every append re-pins the view to the
//! newest entry, and manual scrolling unpins it until the user returns to the
//! bottom.

use crate::core::message::TranscriptEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(u64);

impl EntryHandle {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<(EntryHandle, TranscriptEntry)>,
    next_handle: u64,
    scroll_offset: u16,
    pinned: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 1,
            scroll_offset: 0,
            pinned: true,
        }
    }

    /// Places `entry` after every existing entry and pins the view to it.
    pub fn append(&mut self, entry: TranscriptEntry) -> EntryHandle {
        let handle = EntryHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, entry));
        self.pinned = true;
        handle
    }

    /// Removes the entry behind `handle`. Unknown or already removed handles
    /// are ignored; the return value says whether anything was removed.
    pub fn remove(&mut self, handle: EntryHandle) -> bool {
        match self.entries.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&TranscriptEntry> {
        self.entries
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries().filter(|entry| entry.is_pending()).count()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Effective scroll offset for a view whose maximum offset is `max_offset`.
    pub fn scroll_offset(&self, max_offset: u16) -> u16 {
        if self.pinned {
            max_offset
        } else {
            self.scroll_offset.min(max_offset)
        }
    }

    pub fn scroll_up(&mut self, lines: u16, max_offset: u16) {
        let current = self.scroll_offset(max_offset);
        self.scroll_offset = current.saturating_sub(lines);
        self.pinned = false;
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        let current = self.scroll_offset(max_offset);
        self.scroll_offset = current.saturating_add(lines).min(max_offset);
        self.pinned = self.scroll_offset >= max_offset;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.pinned = false;
    }

    pub fn pin_to_bottom(&mut self) {
        self.pinned = true;
    }
}
