//! Retained element tree the widgets render into.
//!
//! Hosts own a [`MemoryDocument`] and read it back when painting; the widget
//! code only sees the [`Document`] trait.

use std::collections::HashMap;
use std::io;

use crate::banner::BannerView;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Banner(BannerView),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickAction {
    /// Open the target in a new browsing context
    OpenInNewContext(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    content: Content,
    on_click: Option<ClickAction>,
}

impl Element {
    pub fn banner(&self) -> Option<&BannerView> {
        match &self.content {
            Content::Banner(view) => Some(view),
            _ => None,
        }
    }

    /// Stores `text` as a text node; it is never interpreted as markup.
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    pub fn text_content(&self) -> String {
        match &self.content {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Banner(view) => view.text(),
        }
    }

    pub fn replace_with_banner(&mut self, view: BannerView) {
        self.content = Content::Banner(view);
    }

    pub fn inner_html(&self) -> String {
        match &self.content {
            Content::Empty => String::new(),
            Content::Text(text) => escape_html(text),
            Content::Banner(view) => view.markup(),
        }
    }

    /// Replaces any previously attached handler.
    pub fn set_on_click(&mut self, action: ClickAction) {
        self.on_click = Some(action);
    }

    /// Runs the click handler. Returns `false` when none is attached.
    pub fn click(&self, navigator: &mut dyn Navigator) -> io::Result<bool> {
        match &self.on_click {
            Some(ClickAction::OpenInNewContext(target)) => {
                navigator.open_new_context(target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub trait Document {
    fn element_mut(&mut self, id: &str) -> Option<&mut Element>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryDocument {
    elements: HashMap<String, Element>,
}

impl MemoryDocument {
    pub fn with_elements(ids: &[&str]) -> Self {
        let mut doc = Self::default();
        for id in ids {
            doc.insert(id);
        }
        doc
    }

    pub fn insert(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }
}

impl Document for MemoryDocument {
    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }
}

/// Opens targets outside the widget.
pub trait Navigator {
    fn open_new_context(&mut self, target: &str) -> io::Result<()>;
}

/// Opens targets in the user's default browser.
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    #[cfg(windows)]
    fn open_new_context(&mut self, target: &str) -> io::Result<()> {
        crate::native_interop::shell_open(target)
    }

    #[cfg(not(windows))]
    fn open_new_context(&mut self, target: &str) -> io::Result<()> {
        let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
        spawn_reaped(std::process::Command::new(opener).arg(target))?;
        Ok(())
    }
}

/// Starts `command` and waits for it on a helper thread so it never lingers
/// as a zombie.
#[cfg(not(windows))]
fn spawn_reaped(
    command: &mut std::process::Command,
) -> io::Result<std::thread::JoinHandle<io::Result<std::process::ExitStatus>>> {
    let mut child = command.spawn()?;
    Ok(std::thread::spawn(move || child.wait()))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Navigator that records every opened target.
    #[derive(Default)]
    pub(crate) struct RecordingNavigator {
        pub opened: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn open_new_context(&mut self, target: &str) -> io::Result<()> {
            self.opened.push(target.to_string());
            Ok(())
        }
    }

    #[test]
    fn text_content_is_not_markup() {
        let mut doc = MemoryDocument::with_elements(&["note"]);
        doc.element_mut("note").unwrap().set_text_content("<b>bold</b> & co");

        let element = doc.element("note").unwrap();
        assert_eq!(element.text_content(), "<b>bold</b> & co");
        assert_eq!(element.inner_html(), "&lt;b&gt;bold&lt;/b&gt; &amp; co");
    }

    #[test]
    fn missing_element_is_none() {
        let mut doc = MemoryDocument::default();
        assert!(doc.element_mut("astro-banner").is_none());
    }

    #[test]
    fn click_without_handler_does_nothing() {
        let element = Element::default();
        let mut navigator = RecordingNavigator::default();
        assert!(!element.click(&mut navigator).unwrap());
        assert!(navigator.opened.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn opener_process_is_waited_for() {
        let waiter = spawn_reaped(&mut std::process::Command::new("true")).unwrap();
        let status = waiter.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn opener_that_cannot_start_is_an_error() {
        let result = spawn_reaped(&mut std::process::Command::new("/nonexistent/opener"));
        assert!(result.is_err());
    }

    #[test]
    fn reattached_handler_replaces_the_previous_one() {
        let mut element = Element::default();
        element.set_on_click(ClickAction::OpenInNewContext("first.html".into()));
        element.set_on_click(ClickAction::OpenInNewContext("second.html".into()));

        let mut navigator = RecordingNavigator::default();
        assert!(element.click(&mut navigator).unwrap());
        assert_eq!(navigator.opened, vec!["second.html".to_string()]);
    }
}
