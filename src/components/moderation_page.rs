use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::backend::api::policy_file_href;
use crate::backend::moderation::StatusView;
use crate::backend::policy::PolicyStatus;
use crate::backend::AppCmd;
use crate::components::common::{NoticeBanner, StatusBadge};
use crate::components::AppState;

const VIEWS: &[StatusView] = &[
    StatusView::Pending,
    StatusView::Approved,
    StatusView::Rejected,
];

#[component]
pub fn ModerationComponent() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();

    let mut moderation = app_state.moderation;
    let admin_prefs = app_state.admin_prefs;

    // (country, policy index) of the record being edited inline
    let mut editing = use_signal(|| None::<(String, usize)>);
    let mut edit_text = use_signal(String::new);
    // free-text sent along with the next approve/decline/revision click
    let mut action_notes = use_signal(String::new);

    let fetch = {
        let cmd_tx = cmd_tx.clone();
        move |view: StatusView, page: usize| {
            let _ = cmd_tx.send(AppCmd::FetchSubmissions { view, page });
        }
    };

    // fetch once on mount; peek so page reloads from responses don't retrigger
    {
        let fetch = fetch.clone();
        use_effect(move || {
            let store = moderation.peek();
            fetch(store.view, store.page);
        });
    }

    let store = moderation.read().clone();
    let prefs = admin_prefs.read().clone();

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header",
                h1 { class: "page-title", "Moderation" }
                p { class: "text-[var(--text-secondary)]",
                    "Review submitted policies and move them into the master database."
                }
            }

            NoticeBanner { notice: app_state.moderation_notice }

            div { class: "flex gap-4 mb-6",
                for view in VIEWS.iter().copied() {
                    {
                        let fetch = fetch.clone();
                        rsx! {
                            button {
                                key: "{view.label()}",
                                class: if store.view == view { "btn btn-primary" } else { "btn btn-secondary" },
                                onclick: move |_| {
                                    moderation.write().set_view(view);
                                    fetch(view, 1);
                                    editing.set(None);
                                },
                                "{view.label()}"
                            }
                        }
                    }
                }
            }

            if store.entries.is_empty() {
                div { class: "panel text-center text-[var(--text-muted)]",
                    "No {store.view.label().to_lowercase()} submissions."
                }
            }

            for (row, entry) in store.entries.iter().enumerate() {
                {
                    let country = entry.submission.country.clone();
                    let expanded = store.expanded == Some(row);
                    let present = entry.submission.present_count();
                    let pinned = entry.pinned;
                    let note = prefs.notes.get(&country).cloned().unwrap_or_default();
                    let cmd_tx = cmd_tx.clone();
                    let country_pin = country.clone();
                    let country_remove = country.clone();
                    let country_note = country.clone();
                    let cmd_tx_pin = cmd_tx.clone();
                    let cmd_tx_remove = cmd_tx.clone();
                    let cmd_tx_note = cmd_tx.clone();

                    rsx! {
                        div { key: "{country}", class: "panel mb-4",
                            div { class: "flex justify-between items-center",
                                div { class: "flex items-center gap-3",
                                    button {
                                        class: "btn btn-secondary btn-sm",
                                        onclick: move |_| moderation.write().toggle_expanded(row),
                                        if expanded { "▾" } else { "▸" }
                                    }
                                    span { class: "font-semibold", "{country}" }
                                    span { class: "text-sm text-[var(--text-muted)]",
                                        if present == 1 { "1 policy" } else { "{present} policies" }
                                    }
                                    if pinned {
                                        span { class: "badge badge-active", "pinned" }
                                    }
                                }
                                div { class: "flex gap-2",
                                    button {
                                        class: "btn btn-secondary btn-sm",
                                        title: "Keep this country listed after all its policies are resolved",
                                        onclick: move |_| {
                                            let _ = cmd_tx_pin.send(AppCmd::TogglePinned {
                                                country: country_pin.clone(),
                                            });
                                        },
                                        if pinned { "Unpin" } else { "Pin" }
                                    }
                                    button {
                                        class: "btn btn-secondary btn-sm",
                                        onclick: move |_| {
                                            let _ = cmd_tx_remove.send(AppCmd::RemoveSubmission {
                                                country: country_remove.clone(),
                                            });
                                        },
                                        "Remove"
                                    }
                                }
                            }

                            if expanded {
                                div { class: "mt-4 grid gap-4",
                                    for (index, record) in entry.submission.policy_initiatives.iter().enumerate().filter(|(_, r)| r.is_present()) {
                                        {
                                            let country = country.clone();
                                            let is_editing = editing.read().as_ref()
                                                == Some(&(country.clone(), index));
                                            let cmd_approve = cmd_tx.clone();
                                            let cmd_decline = cmd_tx.clone();
                                            let cmd_revise = cmd_tx.clone();
                                            let cmd_edit = cmd_tx.clone();
                                            let c_approve = country.clone();
                                            let c_decline = country.clone();
                                            let c_revise = country.clone();
                                            let c_edit = country.clone();
                                            let c_begin = country.clone();
                                            let description = record.policy_description.clone();
                                            let status = record.status;

                                            rsx! {
                                                div { key: "{index}", class: "border border-[var(--border)] rounded p-4",
                                                    div { class: "flex justify-between items-center mb-2",
                                                        div { class: "flex items-center gap-2",
                                                            span { class: "font-medium", "{record.policy_name}" }
                                                            StatusBadge { status: record.status }
                                                        }
                                                        if let Some(meta) = &record.policy_file {
                                                            if let Some(path) = &meta.path {
                                                                a {
                                                                    class: "text-sm nav-link",
                                                                    href: "{policy_file_href(path)}",
                                                                    target: "_blank",
                                                                    "📄 {meta.name}"
                                                                }
                                                            }
                                                        }
                                                    }
                                                    if !record.policy_area.is_empty() {
                                                        p { class: "text-sm text-[var(--text-muted)] mb-2", "{record.policy_area}" }
                                                    }
                                                    if let Some(notes) = &record.admin_notes {
                                                        p { class: "text-sm italic mb-2", "Reviewer: {notes}" }
                                                    }

                                                    if is_editing {
                                                        textarea {
                                                            class: "input min-h-[100px] mb-2",
                                                            value: "{edit_text}",
                                                            oninput: move |e| edit_text.set(e.value()),
                                                        }
                                                        div { class: "flex gap-2",
                                                            button {
                                                                class: "btn btn-primary btn-sm",
                                                                onclick: move |_| {
                                                                    let _ = cmd_edit.send(AppCmd::EditPolicy {
                                                                        country: c_edit.clone(),
                                                                        policy_index: index,
                                                                        text: edit_text.read().clone(),
                                                                        status: status.unwrap_or(PolicyStatus::Pending),
                                                                    });
                                                                    editing.set(None);
                                                                },
                                                                "Save"
                                                            }
                                                            button {
                                                                class: "btn btn-secondary btn-sm",
                                                                onclick: move |_| editing.set(None),
                                                                "Cancel"
                                                            }
                                                        }
                                                    } else {
                                                        if !description.is_empty() {
                                                            p { class: "text-sm mb-2", "{description}" }
                                                        }
                                                        div { class: "flex gap-2 flex-wrap items-center",
                                                            input {
                                                                class: "input input-inline",
                                                                placeholder: "Notes for this decision...",
                                                                value: "{action_notes}",
                                                                oninput: move |e| action_notes.set(e.value()),
                                                            }
                                                            button {
                                                                class: "btn btn-primary btn-sm",
                                                                onclick: move |_| {
                                                                    let _ = cmd_approve.send(AppCmd::ApprovePolicy {
                                                                        country: c_approve.clone(),
                                                                        policy_index: index,
                                                                        notes: action_notes.read().clone(),
                                                                    });
                                                                    action_notes.set(String::new());
                                                                },
                                                                "Approve"
                                                            }
                                                            button {
                                                                class: "btn btn-secondary btn-sm",
                                                                onclick: move |_| {
                                                                    let _ = cmd_decline.send(AppCmd::DeclinePolicy {
                                                                        country: c_decline.clone(),
                                                                        policy_index: index,
                                                                        notes: action_notes.read().clone(),
                                                                    });
                                                                    action_notes.set(String::new());
                                                                },
                                                                "Decline"
                                                            }
                                                            button {
                                                                class: "btn btn-secondary btn-sm",
                                                                onclick: move |_| {
                                                                    let _ = cmd_revise.send(AppCmd::RequestRevision {
                                                                        country: c_revise.clone(),
                                                                        policy_index: index,
                                                                        notes: action_notes.read().clone(),
                                                                    });
                                                                    action_notes.set(String::new());
                                                                },
                                                                "Request revision"
                                                            }
                                                            button {
                                                                class: "btn btn-secondary btn-sm",
                                                                onclick: move |_| {
                                                                    edit_text.set(description.clone());
                                                                    editing.set(Some((c_begin.clone(), index)));
                                                                },
                                                                "Edit"
                                                            }
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }

                                    div { class: "form-group",
                                        label { class: "form-label", "Private note (stays on this device)" }
                                        textarea {
                                            class: "input",
                                            value: "{note}",
                                            onchange: move |e| {
                                                let _ = cmd_tx_note.send(AppCmd::SaveAdminNote {
                                                    country: country_note.clone(),
                                                    note: e.value(),
                                                });
                                            },
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "flex justify-center items-center gap-4 mt-6",
                {
                    let fetch = fetch.clone();
                    let prev = store.prev_page();
                    let view = store.view;
                    rsx! {
                        button {
                            class: "btn btn-secondary btn-sm",
                            disabled: prev.is_none(),
                            onclick: move |_| {
                                if let Some(page) = prev {
                                    fetch(view, page);
                                }
                            },
                            "← Prev"
                        }
                    }
                }
                span { class: "text-sm", "Page {store.page} of {store.total_pages}" }
                {
                    let fetch = fetch.clone();
                    let next = store.next_page();
                    let view = store.view;
                    rsx! {
                        button {
                            class: "btn btn-secondary btn-sm",
                            disabled: next.is_none(),
                            onclick: move |_| {
                                if let Some(page) = next {
                                    fetch(view, page);
                                }
                            },
                            "Next →"
                        }
                    }
                }
            }
        }
    }
}
