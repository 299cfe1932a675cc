mod backend;
mod components;

use components::map_page::MapComponent;
use components::moderation_page::ModerationComponent;
use components::nav_bar::NavComponent;
use components::submission_page::SubmissionComponent;

use dioxus::prelude::*;
use tokio::sync::mpsc;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(NavComponent)]
    #[route("/")]
    SubmissionComponent {},
    #[route("/moderation")]
    ModerationComponent {},
    #[route("/map")]
    MapComponent {},
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut app_state = use_context_provider(components::AppState::new);

    // One backend task owns the API client; events flow back into signals.
    let cmd_tx = use_hook(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<backend::AppCmd>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<backend::AppEvent>();
        spawn(async move {
            backend::init(cmd_rx, event_tx).await;
        });
        let follow_up_tx = cmd_tx.clone();
        spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if let Some(cmd) = app_state.apply(event) {
                    let _ = follow_up_tx.send(cmd);
                }
            }
        });
        cmd_tx
    });
    use_context_provider(|| cmd_tx.clone());

    let cmd_tx_startup = cmd_tx.clone();
    use_effect(move || {
        let _ = cmd_tx_startup.send(backend::AppCmd::LoadPrefs);
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        Router::<Route> {}
    }
}
