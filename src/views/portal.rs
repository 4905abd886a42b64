// ============================================================================
// PORTAL VIEW - Área autenticada: acciones de identidad + feed
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, button, on_click, set_text_content, update_status, ElementBuilder};
use crate::services::{BrowserNavigator, EncryptionPolicy};
use crate::views::{paint_message, WebAppState, PORTAL_STATUS_ID};

pub fn render_portal(state: &WebAppState) -> Result<Element, JsValue> {
    log::info!("🎬 [PORTAL] render_portal()");
    let vm = state.portal_viewmodel();

    let screen = ElementBuilder::new("div")?.class("portal-screen").build();

    // Header
    let logout = button("btn-logout", "Log out", "button")?;
    {
        let vm = vm.clone();
        on_click(&logout, move |_| {
            log::info!("👋 [PORTAL] Logout");
            vm.logout(&BrowserNavigator);
        })?;
    }
    let header = ElementBuilder::new("header")?
        .class("portal-header")
        .child(ElementBuilder::new("h1")?.text("SchoolCloud Portal").build())?
        .child(logout)?
        .build();
    append_child(&screen, &header)?;

    let status = ElementBuilder::new("div")?.id(PORTAL_STATUS_ID)?.class("status-message").build();
    if let Some(message) = vm.message.snapshot() {
        status.set_class_name(message.css_class());
        set_text_content(&status, message.text());
    }

    // Acciones de identidad
    let actions = ElementBuilder::new("section")?
        .class("identity-actions")
        .child(ElementBuilder::new("h2")?.text("Identity").build())?
        .build();
    for policy in [EncryptionPolicy::SseS3, EncryptionPolicy::SseKms] {
        let btn = button("btn-secondary", &format!("Use {}", policy.as_str()), "button")?;
        let vm = vm.clone();
        let status = status.clone();
        on_click(&btn, move |_| {
            let vm = vm.clone();
            update_status(&status, "🔄 Saving...", "status-message pending");
            spawn_local(async move {
                vm.set_encryption(policy).await;
                paint_message(&vm.message.snapshot(), PORTAL_STATUS_ID);
            });
        })?;
        append_child(&actions, &btn)?;
    }
    for group in ["student", "teacher", "admin"] {
        let btn = button("btn-secondary", &format!("Join {} group", group), "button")?;
        let vm = vm.clone();
        let status = status.clone();
        on_click(&btn, move |_| {
            let vm = vm.clone();
            update_status(&status, "🔄 Saving...", "status-message pending");
            spawn_local(async move {
                vm.add_to_group(group).await;
                paint_message(&vm.message.snapshot(), PORTAL_STATUS_ID);
            });
        })?;
        append_child(&actions, &btn)?;
    }
    append_child(&actions, &status)?;
    append_child(&screen, &actions)?;

    // Feed de actividad
    let feed = vm.feed.snapshot();
    let list = ElementBuilder::new("ul")?.class("activity-feed").build();
    if feed.events().is_empty() {
        let empty = ElementBuilder::new("li")?.class("activity-empty").text("No activity yet").build();
        append_child(&list, &empty)?;
    }
    for event in feed.events() {
        let class = match event.status.as_deref() {
            Some("OK") => "activity-item ok",
            Some(_) => "activity-item failed",
            None => "activity-item",
        };
        let item = ElementBuilder::new("li")?.class(class).text(&event.summary()).build();
        append_child(&list, &item)?;
    }
    let section = ElementBuilder::new("section")?
        .class("activity")
        .child(ElementBuilder::new("h2")?.text("Recent activity").build())?
        .child(list)?
        .build();
    append_child(&screen, &section)?;

    Ok(screen)
}
