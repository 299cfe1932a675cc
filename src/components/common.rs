use dioxus::prelude::*;

use crate::backend::policy::PolicyStatus;
use crate::components::Notice;

/// Dismissible success/error banner fed by a notice signal. The signal's
/// owner handles the auto-clear; the × just clears it early.
#[component]
pub fn NoticeBanner(notice: Signal<Option<Notice>>) -> Element {
    let current = notice.read().clone();
    match current {
        None => rsx! {},
        Some(n) => {
            let (class, text) = match &n {
                Notice::Success(msg) => ("banner banner-success", msg.clone()),
                Notice::Error(msg) => ("banner banner-error", msg.clone()),
            };
            rsx! {
                div { class: "{class} flex justify-between items-center mb-4 animate-fade-in",
                    span { "{text}" }
                    button {
                        class: "banner-dismiss",
                        onclick: move |_| notice.set(None),
                        "×"
                    }
                }
            }
        }
    }
}

/// 0..=10 score dropdown.
#[component]
pub fn ScoreSelect(label: String, value: u8, onchange: EventHandler<u8>) -> Element {
    rsx! {
        div { class: "form-group",
            label { class: "form-label", "{label}" }
            select {
                class: "input",
                value: "{value}",
                onchange: move |e| onchange.call(e.value().parse().unwrap_or(0)),
                for score in 0..=10u8 {
                    option { value: "{score}", "{score}" }
                }
            }
        }
    }
}

#[component]
pub fn StatusBadge(status: Option<PolicyStatus>) -> Element {
    let (class, text) = match status {
        Some(PolicyStatus::Approved) => ("badge badge-approved", "approved"),
        Some(PolicyStatus::Rejected) => ("badge badge-rejected", "rejected"),
        Some(PolicyStatus::NeedsRevision) => ("badge badge-revision", "needs revision"),
        Some(PolicyStatus::Active) => ("badge badge-active", "active"),
        Some(PolicyStatus::Pending) | None => ("badge badge-pending", "pending"),
    };
    rsx! {
        span { class: "{class}", "{text}" }
    }
}
