//! Client-side cache of submissions under review. The backend endpoints are
//! called first; on success the matching local record is patched in place,
//! no refetch. Everything here is plain state manipulation so the page
//! component stays thin.

use std::collections::HashSet;

use crate::backend::policy::{CountrySubmission, PolicyStatus};

/// Moderation page size.
pub const PAGE_SIZE: usize = 10;

/// Which status bucket the moderation page is looking at. Maps one-to-one
/// onto the three list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    Pending,
    Approved,
    Rejected,
}

impl StatusView {
    pub fn label(self) -> &'static str {
        match self {
            StatusView::Pending => "Pending",
            StatusView::Approved => "Approved",
            StatusView::Rejected => "Rejected",
        }
    }
}

/// One country row in the moderation list. `pinned` keeps a fully-resolved
/// country visible in the pending view; it is an explicit flag set by its
/// own control, persisted locally.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationEntry {
    pub submission: CountrySubmission,
    pub pinned: bool,
}

impl ModerationEntry {
    /// True once every present policy of the country has a terminal status.
    pub fn is_resolved(&self) -> bool {
        let present: Vec<_> = self
            .submission
            .policy_initiatives
            .iter()
            .filter(|p| p.is_present())
            .collect();
        !present.is_empty()
            && present
                .iter()
                .all(|p| p.status.map(PolicyStatus::is_terminal).unwrap_or(false))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModerationStore {
    pub view: StatusView,
    pub entries: Vec<ModerationEntry>,
    /// 1-based current page.
    pub page: usize,
    pub total_pages: usize,
    /// Index into `entries` of the expanded country row, if any.
    pub expanded: Option<usize>,
    pub per_page: usize,
}

impl ModerationStore {
    pub fn new() -> Self {
        Self {
            view: StatusView::Pending,
            entries: Vec::new(),
            page: 1,
            total_pages: 1,
            expanded: None,
            per_page: PAGE_SIZE,
        }
    }

    /// Switching views resets pagination and collapses the expanded row.
    /// The caller re-fetches.
    pub fn set_view(&mut self, view: StatusView) {
        self.view = view;
        self.page = 1;
        self.total_pages = 1;
        self.expanded = None;
        self.entries.clear();
    }

    /// Replace the current page with a fetched one.
    pub fn load_page(
        &mut self,
        page: usize,
        total_pages: usize,
        submissions: Vec<CountrySubmission>,
        pinned: &HashSet<String>,
    ) {
        self.page = page.max(1);
        self.total_pages = total_pages.max(1);
        self.expanded = None;
        self.entries = submissions
            .into_iter()
            .map(|submission| ModerationEntry {
                pinned: pinned.contains(&submission.country),
                submission,
            })
            .collect();
    }

    /// Page to fetch next, or `None` when already on the last page.
    pub fn next_page(&self) -> Option<usize> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }

    /// Page to fetch previous, or `None` when already on the first.
    pub fn prev_page(&self) -> Option<usize> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn toggle_expanded(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn set_pinned(&mut self, country: &str, pinned: bool) {
        if let Some(entry) = self.entry_mut(country) {
            entry.pinned = pinned;
        }
    }

    /// Patch one record's status and notes after the backend accepted the
    /// transition. In the pending view, a country whose every present policy
    /// just became terminal is dropped — unless pinned. Returns true when
    /// the country left the list so the caller can decide to re-fetch.
    pub fn apply_status(
        &mut self,
        country: &str,
        policy_index: usize,
        status: PolicyStatus,
        notes: &str,
    ) -> bool {
        let Some(entry) = self.entry_mut(country) else {
            return false;
        };
        if let Some(record) = entry.submission.policy_initiatives.get_mut(policy_index) {
            record.status = Some(status);
            if !notes.is_empty() {
                record.admin_notes = Some(notes.to_string());
            }
        }
        if self.view == StatusView::Pending {
            if let Some(pos) = self.position(country) {
                if self.entries[pos].is_resolved() && !self.entries[pos].pinned {
                    self.drop_at(pos);
                    return true;
                }
            }
        }
        false
    }

    /// Patch an edited record (text and status) after `/update-policy`.
    pub fn apply_edit(
        &mut self,
        country: &str,
        policy_index: usize,
        text: &str,
        status: PolicyStatus,
    ) {
        if let Some(entry) = self.entry_mut(country) {
            if let Some(record) = entry.submission.policy_initiatives.get_mut(policy_index) {
                record.policy_description = text.to_string();
                record.status = Some(status);
            }
        }
    }

    /// Drop a whole country after `/remove-submission`. Returns true when a
    /// row actually left the list so the caller re-fetches the page.
    pub fn remove_country(&mut self, country: &str) -> bool {
        if let Some(pos) = self.position(country) {
            self.drop_at(pos);
            true
        } else {
            false
        }
    }

    fn drop_at(&mut self, pos: usize) {
        self.entries.remove(pos);
        self.expanded = match self.expanded {
            Some(e) if e == pos => None,
            Some(e) if e > pos => Some(e - 1),
            other => other,
        };
        // last row of a non-first page gone: step back so the caller
        // re-fetches a page that still exists
        if self.entries.is_empty() && self.page > 1 {
            self.page -= 1;
        }
    }

    fn position(&self, country: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.submission.country == country)
    }

    fn entry_mut(&mut self, country: &str) -> Option<&mut ModerationEntry> {
        self.entries.iter_mut().find(|e| e.submission.country == country)
    }
}

impl Default for ModerationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::policy::PolicyRecord;

    fn country(name: &str, names: &[&str]) -> CountrySubmission {
        let mut submission = CountrySubmission::empty();
        submission.country = name.to_string();
        for (i, n) in names.iter().enumerate() {
            submission.policy_initiatives[i] = PolicyRecord {
                policy_name: n.to_string(),
                status: Some(PolicyStatus::Pending),
                ..PolicyRecord::empty()
            };
        }
        submission
    }

    fn store_with(entries: Vec<CountrySubmission>) -> ModerationStore {
        let mut store = ModerationStore::new();
        store.load_page(1, 1, entries, &HashSet::new());
        store
    }

    #[test]
    fn test_approving_last_policy_drops_country() {
        let mut store = store_with(vec![country("France", &["AI Act"])]);
        let dropped = store.apply_status("France", 0, PolicyStatus::Approved, "");
        assert!(dropped);
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_pinned_country_stays_after_resolution() {
        let mut store = ModerationStore::new();
        let mut pinned = HashSet::new();
        pinned.insert("France".to_string());
        store.load_page(1, 1, vec![country("France", &["AI Act"])], &pinned);

        let dropped = store.apply_status("France", 0, PolicyStatus::Approved, "");
        assert!(!dropped);
        assert_eq!(store.entries.len(), 1);
        assert_eq!(
            store.entries[0].submission.policy_initiatives[0].status,
            Some(PolicyStatus::Approved)
        );
    }

    #[test]
    fn test_partially_resolved_country_stays() {
        let mut store = store_with(vec![country("France", &["AI Act", "Compute Fund"])]);
        let dropped = store.apply_status("France", 0, PolicyStatus::Approved, "looks good");
        assert!(!dropped);
        let record = &store.entries[0].submission.policy_initiatives[0];
        assert_eq!(record.status, Some(PolicyStatus::Approved));
        assert_eq!(record.admin_notes.as_deref(), Some("looks good"));
    }

    #[test]
    fn test_needs_revision_is_not_terminal() {
        let mut store = store_with(vec![country("France", &["AI Act"])]);
        let dropped = store.apply_status("France", 0, PolicyStatus::NeedsRevision, "");
        assert!(!dropped);
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn test_drop_adjusts_expanded_row() {
        let mut store = store_with(vec![
            country("France", &["AI Act"]),
            country("Japan", &["Society 5.0"]),
        ]);
        store.toggle_expanded(1);
        store.apply_status("France", 0, PolicyStatus::Rejected, "");
        // Japan shifted up by one, expansion follows it
        assert_eq!(store.expanded, Some(0));
        assert_eq!(store.entries[0].submission.country, "Japan");
    }

    #[test]
    fn test_drop_collapses_expanded_dropped_row() {
        let mut store = store_with(vec![
            country("France", &["AI Act"]),
            country("Japan", &["Society 5.0"]),
        ]);
        store.toggle_expanded(0);
        store.apply_status("France", 0, PolicyStatus::Approved, "");
        assert_eq!(store.expanded, None);
    }

    #[test]
    fn test_emptied_later_page_steps_back() {
        let mut store = ModerationStore::new();
        store.load_page(3, 3, vec![country("France", &["AI Act"])], &HashSet::new());
        let dropped = store.apply_status("France", 0, PolicyStatus::Approved, "");
        // the drop signal tells the caller to re-fetch the stepped-back page
        assert!(dropped);
        assert_eq!(store.page, 2);
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_remove_reports_drop_for_refetch() {
        let mut store = ModerationStore::new();
        store.load_page(2, 3, vec![country("France", &["AI Act"])], &HashSet::new());
        assert!(store.remove_country("France"));
        assert_eq!(store.page, 1);
        // already gone: nothing dropped, no re-fetch needed
        assert!(!store.remove_country("France"));
    }

    #[test]
    fn test_pagination_clamps_at_both_ends() {
        let mut store = ModerationStore::new();
        store.load_page(1, 3, vec![], &HashSet::new());
        assert_eq!(store.prev_page(), None);
        assert_eq!(store.next_page(), Some(2));

        store.load_page(3, 3, vec![], &HashSet::new());
        assert_eq!(store.next_page(), None);
        assert_eq!(store.prev_page(), Some(2));
    }

    #[test]
    fn test_set_view_resets_state() {
        let mut store = store_with(vec![country("France", &["AI Act"])]);
        store.toggle_expanded(0);
        store.set_view(StatusView::Approved);
        assert_eq!(store.page, 1);
        assert_eq!(store.expanded, None);
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_apply_edit_patches_text_and_status() {
        let mut store = store_with(vec![country("France", &["AI Act"])]);
        store.apply_edit("France", 0, "revised description", PolicyStatus::NeedsRevision);
        let record = &store.entries[0].submission.policy_initiatives[0];
        assert_eq!(record.policy_description, "revised description");
        assert_eq!(record.status, Some(PolicyStatus::NeedsRevision));
    }
}
