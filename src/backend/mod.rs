pub mod api;
pub mod form;
pub mod map_data;
pub mod moderation;
pub mod policy;
pub mod prefs;
pub mod submit;

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{info, warn};

use api::ApiClient;
use moderation::{StatusView, PAGE_SIZE};
use policy::{CountrySubmission, FileAttachment, PolicyStatus, POLICY_SLOTS};
use prefs::{AdminPrefs, PrefsStore};

/// How long the transient success banner stays up.
pub const NOTICE_TTL_SECS: u64 = 5;

/// Page cap when aggregating approved submissions for the map.
const MAX_COUNT_PAGES: usize = 50;

#[derive(Debug)]
pub enum AppCmd {
    SubmitPolicies {
        submission: CountrySubmission,
        attachments: Vec<Option<FileAttachment>>,
    },
    FetchSubmissions {
        view: StatusView,
        page: usize,
    },
    ApprovePolicy {
        country: String,
        policy_index: usize,
        notes: String,
    },
    DeclinePolicy {
        country: String,
        policy_index: usize,
        notes: String,
    },
    RequestRevision {
        country: String,
        policy_index: usize,
        notes: String,
    },
    EditPolicy {
        country: String,
        policy_index: usize,
        text: String,
        status: PolicyStatus,
    },
    RemoveSubmission {
        country: String,
    },
    FetchPolicyCounts,
    SaveAdminNote {
        country: String,
        note: String,
    },
    TogglePinned {
        country: String,
    },
    LoadPrefs,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    SubmissionAccepted {
        message: String,
    },
    SubmissionFailed {
        message: String,
    },
    SubmissionsFetched {
        view: StatusView,
        page: usize,
        total_pages: usize,
        submissions: Vec<CountrySubmission>,
    },
    /// Any moderation-side call that failed; message shown in the banner.
    ModerationFailed {
        message: String,
    },
    StatusApplied {
        country: String,
        policy_index: usize,
        status: PolicyStatus,
        notes: String,
    },
    PolicyEdited {
        country: String,
        policy_index: usize,
        text: String,
        status: PolicyStatus,
    },
    SubmissionRemoved {
        country: String,
    },
    PolicyCountsFetched(HashMap<String, usize>),
    PrefsLoaded(AdminPrefs),
}

pub struct Backend {
    api: ApiClient,
    prefs: PrefsStore,
    admin_prefs: AdminPrefs,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Backend {
    pub fn new(
        api: ApiClient,
        prefs: PrefsStore,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let admin_prefs = prefs.load_admin_prefs();
        Self {
            api,
            prefs,
            admin_prefs,
            cmd_rx,
            event_tx,
        }
    }

    pub async fn run(&mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_command(cmd).await;
        }
    }

    async fn handle_command(&mut self, cmd: AppCmd) {
        match cmd {
            AppCmd::SubmitPolicies {
                submission,
                attachments,
            } => {
                if let Err(e) = submit::validate(&submission) {
                    let _ = self
                        .event_tx
                        .send(AppEvent::SubmissionFailed { message: e.to_string() });
                    return;
                }

                // Best-effort uploads, one per attached slot. A degraded
                // upload never aborts the submission; the record just keeps
                // a local-only file stub.
                let mut file_paths: Vec<Option<String>> = vec![None; POLICY_SLOTS];
                for (slot, attachment) in attachments.iter().enumerate().take(POLICY_SLOTS) {
                    let Some(file) = attachment else { continue };
                    if !submission.policy_initiatives[slot].is_present() {
                        continue;
                    }
                    let outcome = self
                        .api
                        .upload_policy_file(&submission.country, slot, file)
                        .await;
                    if outcome.file_path.is_none() {
                        warn!("slot {slot}: {}", outcome.message);
                    }
                    file_paths[slot] = outcome.file_path;
                }

                let payload = submit::build_payload(&submission, &file_paths);
                info!(
                    country = %payload.country,
                    policies = payload.policy_initiatives.len(),
                    "submitting policies"
                );
                match self.api.submit_policies(&payload).await {
                    Ok(message) => {
                        let _ = self.event_tx.send(AppEvent::SubmissionAccepted { message });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::SubmissionFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::FetchSubmissions { view, page } => {
                match self.api.fetch_submissions(view, page, PAGE_SIZE).await {
                    Ok(fetched) => {
                        let _ = self.event_tx.send(AppEvent::SubmissionsFetched {
                            view,
                            page,
                            total_pages: fetched.pagination.total_pages,
                            submissions: fetched.submissions,
                        });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::ModerationFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::ApprovePolicy {
                country,
                policy_index,
                notes,
            } => {
                // Approval also moves the policy into the master database server-side.
                match self.api.approve_policy(&country, policy_index, &notes).await {
                    Ok(()) => {
                        let _ = self.event_tx.send(AppEvent::StatusApplied {
                            country,
                            policy_index,
                            status: PolicyStatus::Approved,
                            notes,
                        });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::ModerationFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::DeclinePolicy {
                country,
                policy_index,
                notes,
            } => match self.api.decline_policy(&country, policy_index, &notes).await {
                Ok(()) => {
                    let _ = self.event_tx.send(AppEvent::StatusApplied {
                        country,
                        policy_index,
                        status: PolicyStatus::Rejected,
                        notes,
                    });
                }
                Err(e) => {
                    let _ = self
                        .event_tx
                        .send(AppEvent::ModerationFailed { message: e.to_string() });
                }
            },

            AppCmd::RequestRevision {
                country,
                policy_index,
                notes,
            } => {
                match self
                    .api
                    .update_policy(&country, policy_index, &notes, PolicyStatus::NeedsRevision)
                    .await
                {
                    Ok(()) => {
                        let _ = self.event_tx.send(AppEvent::StatusApplied {
                            country,
                            policy_index,
                            status: PolicyStatus::NeedsRevision,
                            notes,
                        });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::ModerationFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::EditPolicy {
                country,
                policy_index,
                text,
                status,
            } => {
                match self
                    .api
                    .update_policy(&country, policy_index, &text, status)
                    .await
                {
                    Ok(()) => {
                        let _ = self.event_tx.send(AppEvent::PolicyEdited {
                            country,
                            policy_index,
                            text,
                            status,
                        });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::ModerationFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::RemoveSubmission { country } => {
                match self.api.remove_submission(&country).await {
                    Ok(()) => {
                        let _ = self.event_tx.send(AppEvent::SubmissionRemoved { country });
                    }
                    Err(e) => {
                        let _ = self
                            .event_tx
                            .send(AppEvent::ModerationFailed { message: e.to_string() });
                    }
                }
            }

            AppCmd::FetchPolicyCounts => {
                let mut all = Vec::new();
                let mut page = 1;
                loop {
                    match self
                        .api
                        .fetch_submissions(StatusView::Approved, page, PAGE_SIZE)
                        .await
                    {
                        Ok(fetched) => {
                            let total_pages = fetched.pagination.total_pages;
                            all.extend(fetched.submissions);
                            if page >= total_pages || page >= MAX_COUNT_PAGES {
                                break;
                            }
                            page += 1;
                        }
                        Err(e) => {
                            let _ = self
                                .event_tx
                                .send(AppEvent::ModerationFailed { message: e.to_string() });
                            return;
                        }
                    }
                }
                let counts = map_data::policy_counts(&all);
                let _ = self.event_tx.send(AppEvent::PolicyCountsFetched(counts));
            }

            AppCmd::SaveAdminNote { country, note } => {
                if note.trim().is_empty() {
                    self.admin_prefs.notes.remove(&country);
                } else {
                    self.admin_prefs.notes.insert(country, note);
                }
                self.persist_prefs();
            }

            AppCmd::TogglePinned { country } => {
                if !self.admin_prefs.pinned.remove(&country) {
                    self.admin_prefs.pinned.insert(country);
                }
                self.persist_prefs();
            }

            AppCmd::LoadPrefs => {
                self.admin_prefs = self.prefs.load_admin_prefs();
                let _ = self
                    .event_tx
                    .send(AppEvent::PrefsLoaded(self.admin_prefs.clone()));
            }
        }
    }

    fn persist_prefs(&self) {
        if let Err(e) = self.prefs.save_admin_prefs(&self.admin_prefs) {
            warn!("failed to persist admin prefs: {e}");
        }
        let _ = self
            .event_tx
            .send(AppEvent::PrefsLoaded(self.admin_prefs.clone()));
    }
}

pub async fn init(
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let prefs = match PrefsStore::new("policy_atlas_prefs.db") {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("failed to open prefs store: {e}");
            return;
        }
    };
    let mut backend = Backend::new(ApiClient::new(), prefs, cmd_rx, event_tx);
    backend.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spawn_backend() -> (
        mpsc::UnboundedSender<AppCmd>,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        // none of the commands exercised here may reach the network
        let api = ApiClient::with_base_url("http://127.0.0.1:9/api");
        let prefs = PrefsStore::new_in_memory().expect("prefs store");
        let mut backend = Backend::new(api, prefs, cmd_rx, event_tx);
        tokio::spawn(async move { backend.run().await });
        (cmd_tx, event_rx)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("event within deadline")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_invalid_submission_fails_before_any_network_call() {
        let (cmd_tx, mut event_rx) = spawn_backend();
        cmd_tx
            .send(AppCmd::SubmitPolicies {
                submission: CountrySubmission::empty(),
                attachments: vec![None; POLICY_SLOTS],
            })
            .expect("send");

        match next_event(&mut event_rx).await {
            AppEvent::SubmissionFailed { message } => {
                assert!(message.contains("country"), "unexpected message: {message}");
            }
            other => panic!("expected SubmissionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_prefs_commands_round_trip() {
        let (cmd_tx, mut event_rx) = spawn_backend();

        cmd_tx.send(AppCmd::LoadPrefs).expect("send");
        match next_event(&mut event_rx).await {
            AppEvent::PrefsLoaded(prefs) => assert_eq!(prefs, AdminPrefs::default()),
            other => panic!("expected PrefsLoaded, got {other:?}"),
        }

        cmd_tx
            .send(AppCmd::SaveAdminNote {
                country: "France".to_string(),
                note: "budget unclear".to_string(),
            })
            .expect("send");
        match next_event(&mut event_rx).await {
            AppEvent::PrefsLoaded(prefs) => {
                assert_eq!(
                    prefs.notes.get("France").map(String::as_str),
                    Some("budget unclear")
                );
            }
            other => panic!("expected PrefsLoaded, got {other:?}"),
        }

        cmd_tx
            .send(AppCmd::TogglePinned {
                country: "France".to_string(),
            })
            .expect("send");
        match next_event(&mut event_rx).await {
            AppEvent::PrefsLoaded(prefs) => assert!(prefs.pinned.contains("France")),
            other => panic!("expected PrefsLoaded, got {other:?}"),
        }

        cmd_tx
            .send(AppCmd::TogglePinned {
                country: "France".to_string(),
            })
            .expect("send");
        match next_event(&mut event_rx).await {
            AppEvent::PrefsLoaded(prefs) => assert!(!prefs.pinned.contains("France")),
            other => panic!("expected PrefsLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_note_clears_entry() {
        let (cmd_tx, mut event_rx) = spawn_backend();

        cmd_tx
            .send(AppCmd::SaveAdminNote {
                country: "Japan".to_string(),
                note: "check translation".to_string(),
            })
            .expect("send");
        let _ = next_event(&mut event_rx).await;

        cmd_tx
            .send(AppCmd::SaveAdminNote {
                country: "Japan".to_string(),
                note: "   ".to_string(),
            })
            .expect("send");
        match next_event(&mut event_rx).await {
            AppEvent::PrefsLoaded(prefs) => assert!(!prefs.notes.contains_key("Japan")),
            other => panic!("expected PrefsLoaded, got {other:?}"),
        }
    }
}
