//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::APP_TITLE;
use crate::utils::format::format_chain;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet_ctx = use_wallet_context();

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <A href="/" attr:class="nav-link-clean">
                    <span class="nav-title">{APP_TITLE}</span>
                </A>
                <span class="nav-status">
                    {move || {
                        let connection = wallet_ctx.connection.get();
                        if connection.is_active() {
                            format!("Connected to {}", format_chain(&connection))
                        } else {
                            "Not connected".to_string()
                        }
                    }}
                </span>
            </div>
        </nav>
    }
}
