use gtk4::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;

use crate::console::MessageBubble;

/// Message bubble: optional sender label, text, optional time.
pub fn bubble_widget(bubble: &MessageBubble) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 2);
    root.add_css_class("message");
    root.add_css_class(&bubble.css_class);
    // operator and bot on the right, the contact on the left
    let outgoing = matches!(bubble.css_class.as_str(), "human" | "bot" | "sent");
    root.set_halign(if outgoing { gtk::Align::End } else { gtk::Align::Start });

    if let Some(label) = bubble.label {
        let sender = gtk::Label::new(Some(label));
        sender.add_css_class("sender-label");
        sender.set_xalign(0.0);
        root.append(&sender);
    }

    let text = gtk::Label::new(Some(&bubble.content));
    text.set_wrap(true);
    text.set_wrap_mode(gtk::pango::WrapMode::WordChar);
    text.set_selectable(true);
    text.set_xalign(0.0);
    text.set_max_width_chars(60);
    root.append(&text);

    if let Some(time) = &bubble.time {
        let stamp = gtk::Label::new(Some(time));
        stamp.add_css_class("timestamp");
        stamp.set_halign(gtk::Align::End);
        root.append(&stamp);
    }

    root.upcast()
}

pub fn clear(container: &gtk::Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}

/// Scroll to the newest message. Layout of freshly appended children has not
/// happened yet, so the final jump waits for the adjustment's next `changed`
/// emission, when `upper` reflects the new content.
pub fn scroll_to_bottom(scroller: &gtk::ScrolledWindow) {
    let adj = scroller.vadjustment();
    adj.set_value(bottom_value(adj.upper(), adj.page_size()));

    let handler: Rc<RefCell<Option<glib::SignalHandlerId>>> = Rc::default();
    let slot = handler.clone();
    let id = adj.connect_changed(move |adj| {
        adj.set_value(bottom_value(adj.upper(), adj.page_size()));
        if let Some(id) = slot.borrow_mut().take() {
            adj.disconnect(id);
        }
    });
    *handler.borrow_mut() = Some(id);
}

fn bottom_value(upper: f64, page_size: f64) -> f64 {
    (upper - page_size).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_value_clamps_short_content() {
        assert_eq!(bottom_value(1200.0, 400.0), 800.0);
        assert_eq!(bottom_value(300.0, 400.0), 0.0);
    }
}
