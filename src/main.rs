use adw::prelude::*;
use adw::Application;

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = Application::builder()
        .application_id("com.example.ChatdeskGtk")
        .build();
    app.connect_startup(|_| chatdesk_gtk::ui::style::load_css());
    app.connect_activate(|app| {
        chatdesk_gtk::app::build_ui(app);
    });
    app.run()
}
