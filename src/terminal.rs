use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crate::banner::{self, BannerView, DIES_LABEL, MILIDIES_LABEL, TITLE};
use crate::config::Config;
use crate::dom::{MemoryDocument, Navigator, SystemNavigator};
use crate::poller::ApiClient;
use crate::schedule;

const SEGMENT_COUNT: usize = 10;

/// Lock the document, recovering from a poisoned mutex
fn lock(document: &Mutex<MemoryDocument>) -> MutexGuard<'_, MemoryDocument> {
    document.lock().unwrap_or_else(|e| e.into_inner())
}

/// Console banner: one line per update, Enter clicks the banner.
pub fn run_banner(config: Arc<Config>, client: ApiClient) {
    let document = Arc::new(Mutex::new(MemoryDocument::with_elements(&[
        config.banner_element_id.as_str(),
    ])));

    {
        let config = Arc::clone(&config);
        let document = Arc::clone(&document);
        schedule::spawn_overlapping(config.poll_interval(), move || {
            banner::refresh(&client, &*document, &config);
            let line = lock(&document)
                .element(&config.banner_element_id)
                .and_then(|e| e.banner())
                .map(render_line);
            if let Some(line) = line {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{line}");
            }
        });
    }

    for line in io::stdin().lock().lines() {
        if line.is_err() {
            break;
        }
        if let Err(e) = click_banner(&document, &config.banner_element_id, &mut SystemNavigator) {
            log::warn!("Failed to open {}: {}", config.explanation_page_url, e);
        }
    }

    // stdin closed; keep polling for the life of the process
    loop {
        thread::park();
    }
}

/// Clicks the banner after releasing the document lock.
fn click_banner(
    document: &Mutex<MemoryDocument>,
    id: &str,
    navigator: &mut dyn Navigator,
) -> io::Result<bool> {
    let element = lock(document).element(id).cloned();
    match element {
        Some(element) => element.click(navigator),
        None => Ok(false),
    }
}

pub fn render_line(view: &BannerView) -> String {
    let filled = (view.progress_fraction() * SEGMENT_COUNT as f64).round() as usize;
    let bar: String = (0..SEGMENT_COUNT)
        .map(|i| if i < filled { '#' } else { '-' })
        .collect();

    format!(
        "{TITLE}  {}  [{bar}] {}  ({DIES_LABEL} \u{00b7} {MILIDIES_LABEL})",
        view.time_text(),
        view.progress_width()
    )
}

pub fn show_explanation(lang: &str, text: &str) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "[{lang}]\n{text}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::models::TimeReading;
    use serde_json::json;

    /// Records whether the document was free while the target was opened.
    struct LockCheckingNavigator<'a> {
        document: &'a Mutex<MemoryDocument>,
        unlocked_during_open: Vec<bool>,
    }

    impl Navigator for LockCheckingNavigator<'_> {
        fn open_new_context(&mut self, _target: &str) -> io::Result<()> {
            self.unlocked_during_open.push(self.document.try_lock().is_ok());
            Ok(())
        }
    }

    #[test]
    fn banner_click_releases_the_document_first() {
        let config = Config::default();
        let document = Mutex::new(MemoryDocument::with_elements(&["astro-banner"]));
        banner::update_banner(&mut *lock(&document), &TimeReading::default(), &config);

        let mut navigator = LockCheckingNavigator {
            document: &document,
            unlocked_during_open: Vec::new(),
        };
        assert!(click_banner(&document, "astro-banner", &mut navigator).unwrap());
        assert_eq!(navigator.unlocked_during_open, vec![true]);
    }

    #[test]
    fn click_on_missing_banner_opens_nothing() {
        let document = Mutex::new(MemoryDocument::default());
        let mut navigator = crate::dom::tests::RecordingNavigator::default();
        assert!(!click_banner(&document, "astro-banner", &mut navigator).unwrap());
        assert!(navigator.opened.is_empty());
        assert!(lock(&document).element_mut("astro-banner").is_none());
    }

    #[test]
    fn line_shows_values_and_bar() {
        let view = BannerView::from_reading(&TimeReading {
            dies: Some(json!(311)),
            milidies: Some(json!(7)),
            progress: Some(json!(55)),
        });
        assert_eq!(
            render_line(&view),
            "Astronomical Watch  311 \u{00b7} 007  [######----] 55%  (Dies \u{00b7} miliDies)"
        );
    }

    #[test]
    fn placeholder_line_has_empty_bar() {
        let line = render_line(&BannerView::unavailable());
        assert!(line.contains("-- \u{00b7} --"));
        assert!(line.contains("[----------] 0%"));
    }

    #[test]
    fn oversized_progress_fills_bar_but_keeps_its_label() {
        let view = BannerView {
            dies: "1".into(),
            milidies: "001".into(),
            progress: "250".into(),
        };
        assert!(render_line(&view).contains("[##########] 250%"));
    }
}
