use std::sync::Mutex;

use crate::config::Config;
use crate::dom::{escape_html, ClickAction, Document};
use crate::models::{display_value, is_truthy, TimeReading};
use crate::poller::TimeService;

pub const TITLE: &str = "Astronomical Watch";
pub const PLACEHOLDER: &str = "--";
pub const DIES_LABEL: &str = "Dies";
pub const MILIDIES_LABEL: &str = "miliDies";

/// Display strings derived from one [`TimeReading`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerView {
    pub dies: String,
    pub milidies: String,
    /// Bar width in percent, exactly as received (no clamping).
    pub progress: String,
}

impl BannerView {
    pub fn from_reading(reading: &TimeReading) -> Self {
        let dies = reading
            .dies
            .as_ref()
            .map(display_value)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let milidies = reading
            .milidies
            .as_ref()
            .map(|v| format!("{:0>3}", display_value(v)))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let progress = reading
            .progress
            .as_ref()
            .filter(|v| is_truthy(v))
            .map(display_value)
            .unwrap_or_else(|| "0".to_string());

        Self { dies, milidies, progress }
    }

    /// What the banner shows when the time service cannot be reached.
    pub fn unavailable() -> Self {
        Self::from_reading(&TimeReading::default())
    }

    pub fn progress_width(&self) -> String {
        format!("{}%", self.progress)
    }

    /// Fill ratio for painters that need a bounded bar; unparseable widths count as empty.
    pub fn progress_fraction(&self) -> f64 {
        self.progress
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .map(|p| (p / 100.0).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// "311 · 007"
    pub fn time_text(&self) -> String {
        format!("{} \u{00b7} {}", self.dies, self.milidies)
    }

    pub fn text(&self) -> String {
        format!(
            "{TITLE} {} {DIES_LABEL} {MILIDIES_LABEL}",
            self.time_text()
        )
    }

    pub fn markup(&self) -> String {
        format!(
            r#"<div class="banner-title">{TITLE}</div>
<div class="astro-time">
    <span class="dies">{dies}</span>
    <span class="astro-dot">&middot;</span>
    <span class="milidies">{milidies}</span>
</div>
<div class="labels">
    <span>{DIES_LABEL}</span>
    <span>{MILIDIES_LABEL}</span>
</div>
<div class="progress-bar-bg">
    <div class="progress-bar-fg" style="width:{width}"></div>
</div>
"#,
            dies = escape_html(&self.dies),
            milidies = escape_html(&self.milidies),
            width = escape_html(&self.progress_width()),
        )
    }
}

/// Renders `reading` into the banner container and re-attaches its click handler.
///
/// A document without the container is left untouched.
pub fn update_banner(document: &mut dyn Document, reading: &TimeReading, config: &Config) {
    let Some(banner) = document.element_mut(&config.banner_element_id) else {
        return;
    };

    banner.replace_with_banner(BannerView::from_reading(reading));
    banner.set_on_click(ClickAction::OpenInNewContext(
        config.explanation_page_url.clone(),
    ));
}

/// Any failure collapses into the placeholder reading.
pub fn fetch_or_placeholder(service: &dyn TimeService) -> TimeReading {
    match service.fetch_time() {
        Ok(reading) => reading,
        Err(e) => {
            log::debug!("Time fetch failed, showing placeholders: {e}");
            TimeReading::default()
        }
    }
}

/// One fetch-and-render cycle.
///
/// The document is only locked once the response is in, so cycles started on
/// other threads keep running; whichever finishes last wins the display.
pub fn refresh<D: Document>(service: &dyn TimeService, document: &Mutex<D>, config: &Config) {
    let reading = fetch_or_placeholder(service);
    let mut document = document.lock().unwrap_or_else(|e| e.into_inner());
    update_banner(&mut *document, &reading, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::tests::RecordingNavigator;
    use crate::dom::{Element, MemoryDocument};
    use crate::error::FetchError;
    use serde_json::json;

    struct FixedTime(TimeReading);

    impl TimeService for FixedTime {
        fn fetch_time(&self) -> Result<TimeReading, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl TimeService for Offline {
        fn fetch_time(&self) -> Result<TimeReading, FetchError> {
            Err(FetchError::Transport("connection refused".into()))
        }
    }

    fn reading(dies: Option<serde_json::Value>, milidies: Option<serde_json::Value>, progress: Option<serde_json::Value>) -> TimeReading {
        TimeReading { dies, milidies, progress }
    }

    fn banner_doc() -> Mutex<MemoryDocument> {
        Mutex::new(MemoryDocument::with_elements(&["astro-banner"]))
    }

    fn rendered(doc: &Mutex<MemoryDocument>) -> Element {
        doc.lock().unwrap().element("astro-banner").cloned().unwrap()
    }

    #[test]
    fn milidies_are_zero_padded_to_three() {
        for (input, expected) in [(7, "007"), (42, "042"), (123, "123"), (0, "000")] {
            let view = BannerView::from_reading(&reading(None, Some(json!(input)), None));
            assert_eq!(view.milidies, expected);
        }
    }

    #[test]
    fn absent_fields_show_placeholders() {
        let view = BannerView::from_reading(&TimeReading::default());
        assert_eq!(view.dies, "--");
        assert_eq!(view.milidies, "--");
        assert_eq!(view.progress_width(), "0%");
    }

    #[test]
    fn falsy_progress_renders_zero_width() {
        for progress in [Some(json!(0)), Some(json!(false)), Some(json!("")), None] {
            let view = BannerView::from_reading(&reading(None, None, progress));
            assert_eq!(view.progress_width(), "0%");
        }
        let view = BannerView::from_reading(&reading(None, None, Some(json!(55))));
        assert_eq!(view.progress_width(), "55%");
    }

    #[test]
    fn out_of_range_progress_passes_through() {
        let view = BannerView::from_reading(&reading(None, None, Some(json!(150))));
        assert_eq!(view.progress_width(), "150%");
        assert_eq!(view.progress_fraction(), 1.0);

        let view = BannerView::from_reading(&reading(None, None, Some(json!(-5))));
        assert_eq!(view.progress_width(), "-5%");
        assert_eq!(view.progress_fraction(), 0.0);
    }

    #[test]
    fn markup_has_fixed_structure() {
        let view = BannerView::from_reading(&reading(Some(json!(311)), Some(json!(7)), Some(json!(55))));
        let html = view.markup();

        assert!(html.starts_with(r#"<div class="banner-title">Astronomical Watch</div>"#));
        assert!(html.contains(r#"<span class="dies">311</span>"#));
        assert!(html.contains(r#"<span class="milidies">007</span>"#));
        assert!(html.contains("<span>Dies</span>"));
        assert!(html.contains("<span>miliDies</span>"));
        assert!(html.contains(r#"style="width:55%""#));
    }

    #[test]
    fn markup_escapes_values() {
        let view = BannerView::from_reading(&reading(Some(json!("<i>x</i>")), None, None));
        assert!(view.markup().contains("&lt;i&gt;x&lt;/i&gt;"));
    }

    #[test]
    fn update_without_container_is_silent() {
        let mut doc = MemoryDocument::with_elements(&["somewhere-else"]);
        update_banner(&mut doc, &TimeReading::default(), &Config::default());
        assert_eq!(doc.element("somewhere-else").unwrap().inner_html(), "");
    }

    #[test]
    fn failure_overwrites_previous_reading_with_placeholders() {
        let config = Config::default();
        let doc = banner_doc();

        let good = FixedTime(reading(Some(json!(311)), Some(json!(42)), Some(json!(80))));
        refresh(&good, &doc, &config);
        assert_eq!(rendered(&doc).banner().unwrap().milidies, "042");

        refresh(&Offline, &doc, &config);
        assert_eq!(rendered(&doc).banner(), Some(&BannerView::unavailable()));
        assert!(rendered(&doc).inner_html().contains("width:0%"));
    }

    #[test]
    fn click_after_render_opens_explanation_page_once() {
        let config = Config::default();
        let doc = banner_doc();
        let service = FixedTime(reading(Some(json!(1)), Some(json!(2)), Some(json!(3))));

        refresh(&service, &doc, &config);
        refresh(&service, &doc, &config);

        let mut navigator = RecordingNavigator::default();
        rendered(&doc).click(&mut navigator).unwrap();
        assert_eq!(navigator.opened, vec![config.explanation_page_url.clone()]);
    }

    #[test]
    fn click_handler_is_attached_on_failure_too() {
        let config = Config::default();
        let doc = banner_doc();
        refresh(&Offline, &doc, &config);

        let mut navigator = RecordingNavigator::default();
        assert!(rendered(&doc).click(&mut navigator).unwrap());
        assert_eq!(navigator.opened.len(), 1);
    }
}
