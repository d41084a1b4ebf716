use gtk4 as gtk;

const CSS: &str = r#"
.message {
    border-radius: 12px;
    padding: 6px 10px;
}
.message.client,
.message.received {
    background-color: alpha(@card_bg_color, 0.9);
}
.message.bot {
    background-color: alpha(@accent_bg_color, 0.25);
}
.message.human,
.message.sent {
    background-color: alpha(@success_bg_color, 0.3);
}
.sender-label {
    font-weight: bold;
    font-size: smaller;
}
.timestamp {
    font-size: x-small;
    opacity: 0.7;
}
.status.humano {
    color: @warning_color;
}
.status.bot {
    color: @accent_color;
}
"#;

pub fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        log::warn!("no display, skipping stylesheet");
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
