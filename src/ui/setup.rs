use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::rc::Rc;

use crate::api::ConsoleClient;
use crate::app::Settings;

/// First-run window asking where the console and bot servers live.
pub fn show_setup_window(app: &Application, settings: Settings) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Chatdesk")
        .default_width(420)
        .default_height(280)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Conectar con el servidor"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let console_entry = gtk::Entry::new();
    console_entry.set_placeholder_text(Some("URL de la consola (p. ej. http://localhost:5000)"));
    console_entry.set_text(&settings.console_url);
    console_entry.set_hexpand(true);

    let bot_entry = gtk::Entry::new();
    bot_entry.set_placeholder_text(Some("URL del bot"));
    bot_entry.set_text(&settings.bot_url);
    bot_entry.set_hexpand(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&console_entry);
    form.append(&bot_entry);
    root.append(&form);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let connect_btn = gtk::Button::with_label("Conectar");
    connect_btn.add_css_class("suggested-action");
    connect_btn.set_halign(gtk::Align::End);
    root.append(&connect_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    container.append(&adw::HeaderBar::new());
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_connect = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let console_entry = console_entry.clone();
        let bot_entry = bot_entry.clone();
        move || {
            let console_url = crate::utils::normalize_url(&console_entry.text());
            let bot_url = crate::utils::normalize_url(&bot_entry.text());
            if console_url.is_empty() || bot_url.is_empty() {
                overlay.add_toast(adw::Toast::new("Introduce la URL de la consola y del bot."));
                return;
            }
            let client = match ConsoleClient::new(&console_url, settings.request_timeout()) {
                Ok(client) => client,
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&e.to_string()));
                    return;
                }
            };

            status.set_label("Conectando…");

            let mut updated = settings.clone();
            updated.console_url = console_url;
            updated.bot_url = bot_url;

            let status_label = status.clone();
            let app2 = app.clone();
            let window2 = window.clone();
            let overlay2 = overlay.clone();
            crate::utils::run_async_to_main(async move { client.ping().await }, move |res| {
                // settings are kept even when the server cannot be reached yet
                match res {
                    Ok(code) => {
                        log::info!("console server answered with HTTP {code}");
                        status_label.set_label("Conectado");
                    }
                    Err(e) => {
                        log::warn!("console server unreachable: {e}");
                        status_label.set_label("Guardado (servidor no disponible)");
                    }
                }
                if let Err(e) = updated.save() {
                    overlay2.add_toast(adw::Toast::new(&format!("No se pudo guardar la configuración: {e}")));
                }
                crate::ui::main_window::show_main_window(&app2, updated);
                window2.close();
            });
        }
    };

    let on_connect: Rc<dyn Fn()> = Rc::new(on_connect);
    {
        let on_connect = on_connect.clone();
        connect_btn.connect_clicked(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        console_entry.connect_activate(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        bot_entry.connect_activate(move |_| (on_connect)());
    }

    window.present();
}
