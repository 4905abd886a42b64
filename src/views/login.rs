// ============================================================================
// LOGIN VIEW - Login local, signup y acceso por hosted UI
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, button, input, input_value, on_click, on_submit, select_value, set_text_content, update_status, ElementBuilder};
use crate::models::{SignupRequest, UserRole};
use crate::services::BrowserNavigator;
use crate::views::{paint_message, WebAppState, LOGIN_STATUS_ID};

/// Renderizar vista de login
pub fn render_login(state: &WebAppState) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login()");
    let vm = state.login_viewmodel();

    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let container = ElementBuilder::new("div")?.class("login-container").build();

    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(ElementBuilder::new("h1")?.text("SchoolCloud Portal").build())?
        .child(ElementBuilder::new("p")?.text("Sign in to continue").build())?
        .build();
    append_child(&container, &header)?;

    // Mensaje de estado, se actualiza en sitio al terminar cada petición
    let status = ElementBuilder::new("div")?.id(LOGIN_STATUS_ID)?.class("status-message").build();
    if let Some(message) = vm.message.snapshot() {
        status.set_class_name(message.css_class());
        set_text_content(&status, message.text());
    }

    // --- Login local ---
    let form = ElementBuilder::new("form")?
        .class("login-form")
        .child(input("login-email", "email", "Email")?)?
        .child(input("login-password", "password", "Password")?)?
        .child(button("btn-primary", "Log in", "submit")?)?
        .build();
    {
        let vm = vm.clone();
        let status = status.clone();
        on_submit(&form, move || {
            let email = input_value("login-email");
            let password = input_value("login-password");
            let vm = vm.clone();
            update_status(&status, "🔄 Logging in...", "status-message pending");
            spawn_local(async move {
                vm.login(&email, &password, &BrowserNavigator).await;
                paint_message(&vm.message.snapshot(), LOGIN_STATUS_ID);
            });
        })?;
    }
    append_child(&container, &form)?;

    // --- Hosted UI ---
    if vm.hosted_login_enabled() {
        let sso = button("btn-secondary", "Sign in with SchoolCloud SSO", "button")?;
        let vm = vm.clone();
        on_click(&sso, move |_| {
            vm.hosted_login(&BrowserNavigator);
            paint_message(&vm.message.snapshot(), LOGIN_STATUS_ID);
        })?;
        append_child(&container, &sso)?;
    }

    // --- Signup ---
    let role = ElementBuilder::new("select")?.id("signup-role")?.build();
    for value in [UserRole::Student, UserRole::Teacher, UserRole::Admin] {
        let option = ElementBuilder::new("option")?.attr("value", value.as_str())?.text(value.as_str()).build();
        append_child(&role, &option)?;
    }
    let signup = ElementBuilder::new("form")?
        .class("signup-form")
        .child(ElementBuilder::new("h2")?.text("Create an account").build())?
        .child(input("signup-email", "email", "Email")?)?
        .child(input("signup-password", "password", "Password")?)?
        .child(role)?
        .child(input("signup-school", "text", "School ID")?)?
        .child(input("signup-dob", "date", "Date of birth")?)?
        .child(button("btn-secondary", "Sign up", "submit")?)?
        .build();
    {
        let vm = vm.clone();
        let status = status.clone();
        on_submit(&signup, move || {
            update_status(&status, "🔄 Creating account...", "status-message pending");
            let request = SignupRequest {
                email: input_value("signup-email"),
                password: input_value("signup-password"),
                role: UserRole::parse(&select_value("signup-role")).unwrap_or_default(),
                school_id: input_value("signup-school"),
                dob: input_value("signup-dob"),
            };
            let vm = vm.clone();
            spawn_local(async move {
                vm.signup(request, &BrowserNavigator).await;
                paint_message(&vm.message.snapshot(), LOGIN_STATUS_ID);
            });
        })?;
    }
    append_child(&container, &signup)?;

    append_child(&container, &status)?;
    append_child(&screen, &container)?;
    Ok(screen)
}
