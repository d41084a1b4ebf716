use gtk4::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::ApiError;
use crate::api::models::Conversation;
use crate::console::{ConversationRow, ListContent, list_content};

pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
    items: Rc<RefCell<Vec<Conversation>>>,
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);
        root.set_width_request(260);

        let title = gtk::Label::new(Some("Conversaciones"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        list.set_selection_mode(gtk::SelectionMode::Single);
        list.add_css_class("navigation-sidebar");
        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .child(&list)
            .build();
        root.append(&scroller);

        Self {
            root,
            list,
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    /// Call `on_select` with the conversation behind a clicked row.
    pub fn connect_selected<F: Fn(Conversation) + 'static>(&self, on_select: F) {
        let items = self.items.clone();
        self.list.connect_row_activated(move |_, row| {
            let picked = usize::try_from(row.index())
                .ok()
                .and_then(|idx| items.borrow().get(idx).cloned());
            if let Some(conv) = picked {
                on_select(conv);
            }
        });
    }

    pub fn set_conversations(&self, result: Result<Vec<Conversation>, ApiError>) {
        let content = list_content(&result);
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        *self.items.borrow_mut() = result.unwrap_or_default();
        match content {
            ListContent::Placeholder(text) => {
                let row = gtk::ListBoxRow::new();
                row.set_selectable(false);
                row.set_activatable(false);
                let label = gtk::Label::new(Some(&text));
                label.set_wrap(true);
                label.set_xalign(0.0);
                label.set_margin_top(8);
                label.set_margin_bottom(8);
                label.set_margin_start(8);
                label.set_margin_end(8);
                row.set_child(Some(&label));
                self.list.append(&row);
            }
            ListContent::Rows(rows) => {
                for row in rows {
                    self.list.append(&conversation_row(&row));
                }
            }
        }
    }
}

fn conversation_row(row: &ConversationRow) -> gtk::ListBoxRow {
    let body = gtk::Box::new(gtk::Orientation::Vertical, 2);
    body.set_margin_top(8);
    body.set_margin_bottom(8);
    body.set_margin_start(8);
    body.set_margin_end(8);

    let title = gtk::Label::new(Some(&row.title));
    title.add_css_class("heading");
    title.set_xalign(0.0);
    body.append(&title);

    let preview = gtk::Label::new(Some(&row.preview));
    preview.add_css_class("dim-label");
    preview.set_xalign(0.0);
    preview.set_ellipsize(gtk::pango::EllipsizeMode::End);
    body.append(&preview);

    let badge = gtk::Label::new(Some(&row.mode.badge()));
    badge.add_css_class("status");
    badge.add_css_class(row.mode.css_class());
    badge.set_xalign(0.0);
    body.append(&badge);

    let item = gtk::ListBoxRow::new();
    item.add_css_class("conversation-item");
    item.set_child(Some(&body));
    item
}
