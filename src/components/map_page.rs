use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

use crate::backend::map_data;
use crate::backend::AppCmd;
use crate::components::AppState;

#[component]
pub fn MapComponent() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();

    {
        let cmd_tx = cmd_tx.clone();
        use_effect(move || {
            let _ = cmd_tx.send(AppCmd::FetchPolicyCounts);
        });
    }

    let counts = app_state.policy_counts.read().clone();
    let regions = map_data::regions(&counts);
    let total: usize = regions.iter().map(|r| r.count).sum();

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header flex justify-between items-center",
                div {
                    h1 { class: "page-title", "Policy Map" }
                    p { class: "text-[var(--text-secondary)]",
                        "{total} approved policies across {regions.len()} countries"
                    }
                }
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| {
                        let _ = cmd_tx.send(AppCmd::FetchPolicyCounts);
                    },
                    "Refresh"
                }
            }

            if regions.is_empty() {
                div { class: "panel text-center text-[var(--text-muted)]",
                    "No approved policies yet. Approved submissions show up here."
                }
            } else {
                div { class: "map-grid",
                    for region in regions.iter() {
                        div {
                            key: "{region.country}",
                            class: "map-region",
                            style: "background-color: {region.fill}",
                            title: "{region.label}",
                            span { class: "map-region-name", "{region.country}" }
                            span { class: "map-region-count", "{region.count}" }
                        }
                    }
                }

                div { class: "flex gap-4 mt-6 text-sm text-[var(--text-muted)]",
                    span { "Shade scales with policy count:" }
                    LegendSwatch { fill: map_data::fill_for(1), text: "1-2" }
                    LegendSwatch { fill: map_data::fill_for(3), text: "3-5" }
                    LegendSwatch { fill: map_data::fill_for(6), text: "6+" }
                }
            }
        }
    }
}

#[component]
fn LegendSwatch(fill: &'static str, text: &'static str) -> Element {
    rsx! {
        span { class: "flex items-center gap-1",
            span {
                class: "map-legend-swatch",
                style: "background-color: {fill}",
            }
            "{text}"
        }
    }
}
