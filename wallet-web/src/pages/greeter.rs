//! Greeter Page - connection status, connect/disconnect and contract actions

use leptos::prelude::*;

use crate::state::wallet::use_wallet_context;
use crate::utils::format::{format_account, format_chain, format_tx_hash, tx_url};

#[component]
pub fn GreeterPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();

    let active = move || wallet_ctx.connection.with(|c| c.is_active());
    let busy = move || wallet_ctx.pending.get();

    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="width: 100%; max-width: 500px;">
                <h1 class="card-title" style="text-align: center; margin-bottom: 16px;">
                    "Greeter"
                </h1>

                <div class="info">
                    <p>"ChainId: " {move || wallet_ctx.connection.with(format_chain)}</p>
                    <p>"Account: "
                        <span style="font-family: monospace;">
                            {move || wallet_ctx.connection.with(format_account)}
                        </span>
                    </p>
                </div>

                {move || wallet_ctx.error.get().map(|err| view! {
                    <div class="error">
                        <p style="text-align: center;">{err}</p>
                    </div>
                })}

                {move || if active() {
                    view! {
                        <button
                            class="btn"
                            style="width: 100%; background: var(--bg-error);"
                            on:click=move |_| wallet_ctx.disconnect()
                        >
                            "Disconnect"
                        </button>
                    }.into_any()
                } else {
                    view! {
                        <button
                            class="btn"
                            style="width: 100%;"
                            disabled=move || busy() || !wallet_ctx.tried.get()
                            on:click=move |_| wallet_ctx.connect()
                        >
                            "Connect"
                        </button>
                    }.into_any()
                }}

                <div style="display: flex; flex-direction: column; gap: 12px; margin-top: 24px;">
                    <button
                        class="btn"
                        disabled=move || !active()
                        on:click=move |_| wallet_ctx.get_greeting()
                    >
                        "Get Greeting"
                    </button>
                    <button
                        class="btn"
                        disabled=move || !active() || busy()
                        on:click=move |_| wallet_ctx.set_hello_greeting()
                    >
                        "Set Greeting to \"Hello World!\""
                    </button>
                    <button
                        class="btn"
                        disabled=move || !active() || busy()
                        on:click=move |_| wallet_ctx.set_goodbye_greeting()
                    >
                        "Set Greeting to \"Goodbye World!\""
                    </button>
                </div>

                {move || wallet_ctx.last_greeting.get().map(|greeting| view! {
                    <div class="success">
                        <p>"Greeting: " {greeting}</p>
                    </div>
                })}

                {move || wallet_ctx.last_receipt.get().map(|receipt| {
                    let chain_id = wallet_ctx.connection.with(|c| c.chain_id);
                    let label = format_tx_hash(&receipt.transaction_hash);
                    view! {
                        <div class="success">
                            <p>"Transaction: "
                                {match tx_url(chain_id, &receipt.transaction_hash) {
                                    Some(url) => view! { <a href=url target="_blank">{label}</a> }.into_any(),
                                    None => view! { <span>{label}</span> }.into_any(),
                                }}
                            </p>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
