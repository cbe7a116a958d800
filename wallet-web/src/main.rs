//! Greeter dApp frontend
//!
//! Connects to the injected Ethereum wallet and talks to the deployed
//! Greeter contract.

use std::rc::Rc;

use leptos::prelude::*;
use lib_wallet::{Config, GreeterDapp};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

mod app;
mod components;
mod pages;
mod services;
mod state;
mod utils;

use app::{App, ConfigurationError};
use services::BrowserEthereum;
use utils::constants::LOADING_ELEMENT_ID;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("[GREETER] Starting...");

    hide_loading_screen();

    match build_dapp() {
        Ok(dapp) => {
            leptos::mount::mount_to_body(move || view! { <App dapp=dapp/> });
        }
        Err(e) => {
            log::error!("[GREETER] {}", e);
            let message = e.to_string();
            leptos::mount::mount_to_body(move || view! { <ConfigurationError message=message/> });
        }
    }
}

fn build_dapp() -> lib_wallet::Result<GreeterDapp> {
    let config = Config::from_build_env()?;
    GreeterDapp::new(&config, Rc::new(BrowserEthereum::new()))
}

/// Hide the loading screen element
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("[GREETER] No document available");
        return;
    };

    match document.get_element_by_id(LOADING_ELEMENT_ID) {
        Some(loading_element) => {
            if let Some(html_element) = loading_element.dyn_ref::<HtmlElement>() {
                html_element.class_list().add_1("hidden").ok();
            }
            // Also set display:none as backup
            loading_element.set_attribute("style", "display: none !important;").ok();
        }
        None => log::debug!("[GREETER] Loading element not found"),
    }
}
