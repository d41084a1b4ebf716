use adw::prelude::*;
use adw::Application;

use crate::app::Settings;
use crate::ui::bot_view::BotPage;
use crate::ui::chat_view::ConsolePage;

pub fn show_main_window(app: &Application, settings: Settings) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Chatdesk")
        .default_width(960)
        .default_height(640)
        .build();

    let stack = adw::ViewStack::new();

    let console = ConsolePage::new(&settings);
    let console_page = stack.add_titled(&console.widget(), Some("console"), "Consola");
    console_page.set_icon_name(Some("system-users-symbolic"));

    let bot = BotPage::new(&settings);
    let bot_page = stack.add_titled(&bot.widget(), Some("bot"), "Bot");
    bot_page.set_icon_name(Some("user-available-symbolic"));

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let switcher = adw::ViewSwitcher::builder()
        .stack(&stack)
        .policy(adw::ViewSwitcherPolicy::Wide)
        .build();
    header.set_title_widget(Some(&switcher));

    let reload_btn = gtk4::Button::from_icon_name("view-refresh-symbolic");
    reload_btn.set_tooltip_text(Some("Recargar conversaciones"));
    header.pack_start(&reload_btn);
    container.append(&header);
    stack.set_vexpand(true);
    container.append(&stack);
    window.set_content(Some(&container));
    window.present();

    {
        let console = console.clone();
        reload_btn.connect_clicked(move |_| console.load_conversations());
    }
    console.load_conversations();
}
