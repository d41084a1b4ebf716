use gtk4::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::api::{ApiError, BotClient};
use crate::app::Settings;
use crate::bot_chat::{BotEntry, BotTranscript};
use crate::console::MessageBubble;
use crate::ui::bubble;
use crate::utils::run_async_to_main;

/// One-to-one chat box talking to the configured bot endpoint.
pub struct BotPage {
    root: gtk::Box,
    messages_box: gtk::Box,
    scroller: gtk::ScrolledWindow,
    entry: gtk::Entry,
    transcript: RefCell<BotTranscript>,
    client: RefCell<Option<BotClient>>,
    base_url: String,
    timeout: Duration,
}

impl BotPage {
    pub fn new(settings: &Settings) -> Rc<Self> {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Escribe tu mensaje…"));
        let send_btn = gtk::Button::with_label("Enviar");
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        let page = Rc::new(Self {
            root,
            messages_box,
            scroller,
            entry,
            transcript: RefCell::new(BotTranscript::new(settings.bot_policy())),
            client: RefCell::new(None),
            base_url: settings.bot_url.clone(),
            timeout: settings.request_timeout(),
        });

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

    fn client(&self) -> Result<BotClient, ApiError> {
        if let Some(client) = self.client.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = BotClient::new(&self.base_url, self.timeout)?;
        *self.client.borrow_mut() = Some(client.clone());
        Ok(client)
    }

    fn append(&self, entries: &[BotEntry]) {
        for entry in entries {
            let bubble = MessageBubble {
                css_class: entry.direction.css_class().to_string(),
                label: None,
                content: entry.text.clone(),
                time: None,
            };
            self.messages_box.append(&bubble::bubble_widget(&bubble));
        }
        bubble::scroll_to_bottom(&self.scroller);
    }

    fn send(self: &Rc<Self>) {
        let submitted = self
            .transcript
            .borrow_mut()
            .submit(&self.entry.text())
            .map(|(ask, appended)| (ask, appended.to_vec()));
        let Some((ask, appended)) = submitted else {
            return;
        };
        if ask.clears_input() {
            self.entry.set_text("");
        }
        self.append(&appended);

        let client = self.client();
        let text = ask.text.clone();
        let page = self.clone();
        run_async_to_main(
            async move {
                match client {
                    Ok(client) => client.ask(&text).await,
                    Err(e) => Err(e),
                }
            },
            move |res| {
                let (appended, clear_input) = {
                    let mut transcript = page.transcript.borrow_mut();
                    let resolved = transcript.resolve(ask, res);
                    (resolved.appended.to_vec(), resolved.clear_input)
                };
                if clear_input {
                    page.entry.set_text("");
                }
                page.append(&appended);
            },
        );
    }
}
