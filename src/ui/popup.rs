/// Popup UI for the Swooosh extension
///
/// Shows who is signed in and the per-platform saved-item counts from
/// the stored user record. Sign-in itself happens on the dashboard, not
/// here; the popup only reflects what the identity flow stored.

use crate::message::{SaveMetrics, StoredUser};
use crate::storage;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    SignedOut,
    SignedIn(StoredUser),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);

    // Load the stored user record on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match storage::signed_in_user().await {
                    Some(user) => state.set(PopupState::SignedIn(user)),
                    None => state.set(PopupState::SignedOut),
                }
            });
            || ()
        });
    }

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Swooosh"}</h1>

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::SignedOut => html! {
                    <Alert r#type={AlertType::Info} title={"Not signed in"} inline={true}>
                        {"Sign in from the Swooosh dashboard to start saving."}
                    </Alert>
                },
                PopupState::SignedIn(user) => html! {
                    <>
                        <div class="user-info">
                            if let Some(picture) = &user.picture {
                                <img class="user-picture" src={picture.clone()} alt="avatar" />
                            }
                            <p class="user-name">{user.name.clone().unwrap_or_else(|| "N/A".to_string())}</p>
                            <p class="user-email">{user.email.clone().unwrap_or_else(|| "N/A".to_string())}</p>
                        </div>
                        {metrics_view(user.metrics.clone().unwrap_or_default())}
                    </>
                },
            }}

            <p class="footer-popup">
                {"Swooosh v0.1.0"}
            </p>
        </div>
    }
}

fn metrics_view(metrics: SaveMetrics) -> Html {
    let rows = [
        ("X", metrics.x),
        ("Reddit", metrics.reddit),
        ("LinkedIn", metrics.linkedin),
        ("ChatGPT", metrics.chatgpt),
    ];

    html! {
        <div class="stats-container">
            <h2 class="stats-title">{"Saved items"}</h2>
            <div class="stats-box">
                {for rows.into_iter().map(|(label, count)| html! {
                    <div class="stat-item">
                        <span class="stat-domain">{label}</span>
                        <span class="stat-count">{count}</span>
                    </div>
                })}
            </div>
        </div>
    }
}
