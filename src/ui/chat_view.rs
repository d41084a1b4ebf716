use gtk4::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::api::models::Conversation;
use crate::api::{ApiError, ConsoleClient};
use crate::app::Settings;
use crate::console::{
    ChatContent, ClockZone, ConsoleState, LOADING_MESSAGES, LoadTicket, MessageBubble,
    chat_content, send_follow_up,
};
use crate::echo::EchoPolicy;
use crate::ui::bubble;
use crate::ui::sidebar::Sidebar;
use crate::utils::run_async_to_main;

/// Operator console: conversation sidebar plus the selected conversation.
pub struct ConsolePage {
    root: adw::Flap,
    sidebar: Sidebar,
    header: gtk::Label,
    messages_box: gtk::Box,
    scroller: gtk::ScrolledWindow,
    input_row: gtk::Box,
    entry: gtk::Entry,
    state: RefCell<ConsoleState>,
    client: RefCell<Option<ConsoleClient>>,
    base_url: String,
    timeout: Duration,
    policy: EchoPolicy,
    zone: ClockZone,
}

impl ConsolePage {
    pub fn new(settings: &Settings) -> Rc<Self> {
        let root = adw::Flap::builder()
            .reveal_flap(true)
            .locked(true)
            .modal(false)
            .build();

        let sidebar = Sidebar::new();
        root.set_flap(Some(&sidebar.widget()));

        let chat = gtk::Box::new(gtk::Orientation::Vertical, 6);
        chat.set_margin_top(8);
        chat.set_margin_bottom(8);
        chat.set_margin_start(8);
        chat.set_margin_end(8);
        chat.set_hexpand(true);

        let header = gtk::Label::new(Some("Selecciona una conversación"));
        header.add_css_class("title-3");
        header.set_halign(gtk::Align::Start);
        chat.append(&header);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        scroller.set_child(Some(&messages_box));
        chat.append(&scroller);

        // Input row, hidden until a contact is picked
        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Escribe un mensaje…"));
        let send_btn = gtk::Button::with_label("Enviar");
        send_btn.add_css_class("suggested-action");
        input_row.append(&entry);
        input_row.append(&send_btn);
        input_row.set_visible(false);
        chat.append(&input_row);

        root.set_content(Some(&chat));

        let page = Rc::new(Self {
            root,
            sidebar,
            header,
            messages_box,
            scroller,
            input_row,
            entry,
            state: RefCell::new(ConsoleState::new()),
            client: RefCell::new(None),
            base_url: settings.console_url.clone(),
            timeout: settings.request_timeout(),
            policy: settings.console_policy(),
            zone: settings.clock_zone(),
        });

        {
            let page_for_select = page.clone();
            page.sidebar
                .connect_selected(move |conv| page_for_select.select(conv));
        }
        {
            let page_for_send = page.clone();
            send_btn.connect_clicked(move |_| page_for_send.send());
        }
        {
            let page_for_activate = page.clone();
            page.entry.connect_activate(move |_| page_for_activate.send());
        }

        page
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    fn client(&self) -> Result<ConsoleClient, ApiError> {
        if let Some(client) = self.client.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = ConsoleClient::new(&self.base_url, self.timeout)?;
        *self.client.borrow_mut() = Some(client.clone());
        Ok(client)
    }

    pub fn load_conversations(self: &Rc<Self>) {
        let client = self.client();
        let page = self.clone();
        run_async_to_main(
            async move {
                match client {
                    Ok(client) => client.conversations().await,
                    Err(e) => Err(e),
                }
            },
            move |res| {
                match &res {
                    Ok(convs) => log::info!("loaded {} conversations", convs.len()),
                    Err(e) => log::error!("loading conversations failed: {e}"),
                }
                page.sidebar.set_conversations(res);
            },
        );
    }

    fn select(self: &Rc<Self>, conv: Conversation) {
        self.header.set_label(conv.title());
        self.input_row.set_visible(true);
        let ticket = self.state.borrow_mut().select(conv);
        self.load_messages(ticket);
    }

    fn load_messages(self: &Rc<Self>, ticket: LoadTicket) {
        self.show(ChatContent::Loading);
        let client = self.client();
        let phone = ticket.phone_number.clone();
        let page = self.clone();
        run_async_to_main(
            async move {
                match client {
                    Ok(client) => client.messages(&phone).await,
                    Err(e) => Err(e),
                }
            },
            move |res| {
                if !page.state.borrow().is_current(&ticket) {
                    log::debug!(
                        "dropping stale messages for {} (load #{})",
                        ticket.phone_number,
                        ticket.generation
                    );
                    return;
                }
                if let Err(e) = &res {
                    log::error!("loading messages for {} failed: {e}", ticket.phone_number);
                }
                page.show(chat_content(&res, page.zone));
            },
        );
    }

    fn show(&self, content: ChatContent) {
        bubble::clear(&self.messages_box);
        match content {
            ChatContent::Loading => {
                let placeholder = gtk::Label::new(Some(LOADING_MESSAGES));
                placeholder.add_css_class("dim-label");
                placeholder.set_halign(gtk::Align::Start);
                self.messages_box.append(&placeholder);
            }
            ChatContent::Bubbles(bubbles) => {
                for b in &bubbles {
                    self.messages_box.append(&bubble::bubble_widget(b));
                }
                bubble::scroll_to_bottom(&self.scroller);
            }
        }
    }

    fn send(self: &Rc<Self>) {
        let request = self.state.borrow().prepare_send(&self.entry.text());
        let Some(request) = request else {
            return;
        };
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                log::error!("Error al enviar mensaje: {e}");
                return;
            }
        };
        if self.policy.renders_immediately() {
            let echo = MessageBubble::local_echo(&request.message, self.zone);
            self.messages_box.append(&bubble::bubble_widget(&echo));
            bubble::scroll_to_bottom(&self.scroller);
        }

        let page = self.clone();
        run_async_to_main(
            async move {
                let res = client.send(&request).await;
                (request, res)
            },
            move |(request, res)| {
                if let Err(e) = &res {
                    log::error!("Error al enviar mensaje: {e}");
                }
                let follow = send_follow_up(&res, page.policy);
                if follow.clear_input {
                    page.entry.set_text("");
                }
                if let Some(delay) = follow.reload_after {
                    let page = page.clone();
                    glib::timeout_add_local_once(delay, move || {
                        let ticket = page
                            .state
                            .borrow_mut()
                            .reload_after_send(&request.phone_number);
                        if let Some(ticket) = ticket {
                            page.load_messages(ticket);
                        }
                    });
                }
            },
        );
    }
}
