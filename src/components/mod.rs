pub mod common;
pub mod map_page;
pub mod moderation_page;
pub mod nav_bar;
pub mod submission_page;

use dioxus::prelude::*;
use std::collections::HashMap;

use crate::backend::moderation::ModerationStore;
use crate::backend::policy::{CountrySubmission, FileAttachment, POLICY_SLOTS};
use crate::backend::prefs::AdminPrefs;
use crate::backend::{AppCmd, AppEvent, NOTICE_TTL_SECS};

/// Transient banner content. Both kinds auto-clear after [`NOTICE_TTL_SECS`]
/// and can be dismissed by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone, Copy)]
pub struct AppState {
    // submission form
    pub submission: Signal<CountrySubmission>,
    pub attachments: Signal<Vec<Option<FileAttachment>>>,
    pub submitting: Signal<bool>,
    pub form_notice: Signal<Option<Notice>>,

    // moderation dashboard
    pub moderation: Signal<ModerationStore>,
    pub moderation_notice: Signal<Option<Notice>>,
    pub admin_prefs: Signal<AdminPrefs>,

    // map view
    pub policy_counts: Signal<HashMap<String, usize>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            submission: use_signal(CountrySubmission::empty),
            attachments: use_signal(|| vec![None; POLICY_SLOTS]),
            submitting: use_signal(|| false),
            form_notice: use_signal(|| None),
            moderation: use_signal(ModerationStore::new),
            moderation_notice: use_signal(|| None),
            admin_prefs: use_signal(AdminPrefs::default),
            policy_counts: use_signal(HashMap::new),
        }
    }

    /// Fold one backend event into the signals. Runs in the event loop task
    /// the app root spawns. Returns a follow-up command when a moderation
    /// drop left the current page in need of a re-fetch.
    pub fn apply(&mut self, event: AppEvent) -> Option<AppCmd> {
        match event {
            AppEvent::SubmissionAccepted { message } => {
                self.submitting.set(false);
                self.submission.set(CountrySubmission::empty());
                self.attachments.set(vec![None; POLICY_SLOTS]);
                post_notice(self.form_notice, Notice::Success(message));
            }
            AppEvent::SubmissionFailed { message } => {
                self.submitting.set(false);
                post_notice(self.form_notice, Notice::Error(message));
            }
            AppEvent::SubmissionsFetched {
                view,
                page,
                total_pages,
                submissions,
            } => {
                let pinned = self.admin_prefs.read().pinned.clone();
                let mut store = self.moderation.write();
                // a response for a view the admin already left is stale
                if store.view == view {
                    store.load_page(page, total_pages, submissions, &pinned);
                }
            }
            AppEvent::ModerationFailed { message } => {
                post_notice(self.moderation_notice, Notice::Error(message));
            }
            AppEvent::StatusApplied {
                country,
                policy_index,
                status,
                notes,
            } => {
                let mut store = self.moderation.write();
                if store.apply_status(&country, policy_index, status, &notes) {
                    // the country left the pending list; backfill the page
                    // (possibly the stepped-back one) from the server
                    return Some(AppCmd::FetchSubmissions {
                        view: store.view,
                        page: store.page,
                    });
                }
            }
            AppEvent::PolicyEdited {
                country,
                policy_index,
                text,
                status,
            } => {
                self.moderation
                    .write()
                    .apply_edit(&country, policy_index, &text, status);
            }
            AppEvent::SubmissionRemoved { country } => {
                let mut store = self.moderation.write();
                if store.remove_country(&country) {
                    return Some(AppCmd::FetchSubmissions {
                        view: store.view,
                        page: store.page,
                    });
                }
            }
            AppEvent::PolicyCountsFetched(counts) => {
                self.policy_counts.set(counts);
            }
            AppEvent::PrefsLoaded(prefs) => {
                {
                    let mut store = self.moderation.write();
                    let pinned = prefs.pinned.clone();
                    for entry in store.entries.iter_mut() {
                        entry.pinned = pinned.contains(&entry.submission.country);
                    }
                }
                self.admin_prefs.set(prefs);
            }
        }
        None
    }
}

/// Show a banner and schedule its removal, unless something else replaced it
/// in the meantime.
fn post_notice(mut slot: Signal<Option<Notice>>, notice: Notice) {
    slot.set(Some(notice.clone()));
    spawn(async move {
        sleep_secs(NOTICE_TTL_SECS).await;
        let mut current = slot.write();
        if current.as_ref() == Some(&notice) {
            *current = None;
        }
    });
}

async fn sleep_secs(secs: u64) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new((secs * 1000) as u32).await;
}
