//! Askama templates for the web frontend.

use askama::Template;

use crate::shell::ShellView;
use crate::stations::{RESULT_COUNTS, STATIONS};

/// How often the page reloads itself while a search is pending.
const RELOAD_SECS: u64 = 2;

/// The search window.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: ShellView,
    pub origins: Vec<OptionView>,
    pub destinations: Vec<OptionView>,
    pub counts: Vec<OptionView>,
    pub refresh_secs: u64,
    /// Seconds until the page reloads, if it should.
    pub reload_secs: Option<u64>,
}

impl IndexTemplate {
    pub fn new(view: ShellView, refresh_secs: u64) -> Self {
        let origins = station_options(&view.origin);
        let destinations = station_options(&view.destination);
        let counts = RESULT_COUNTS
            .iter()
            .map(|c| OptionView {
                value: c.to_string(),
                selected: *c == view.count,
            })
            .collect();

        // Poll fast only while a result is pending; otherwise follow the timer.
        let reload_secs = if !view.search_enabled {
            Some(RELOAD_SECS)
        } else if view.auto_refresh {
            Some(refresh_secs)
        } else {
            None
        };

        Self {
            view,
            origins,
            destinations,
            counts,
            refresh_secs,
            reload_secs,
        }
    }

    pub fn refresh_label(&self) -> String {
        if self.view.auto_refresh {
            format!("Auto-Refresh ON ({}s)", self.refresh_secs)
        } else {
            format!("Auto-Refresh ({}s)", self.refresh_secs)
        }
    }
}

/// One entry of a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub selected: bool,
}

/// Catalogue stations, plus the current choice if it is not in the catalogue.
fn station_options(current: &str) -> Vec<OptionView> {
    let mut options: Vec<OptionView> = STATIONS
        .iter()
        .map(|s| OptionView {
            value: (*s).to_string(),
            selected: *s == current,
        })
        .collect();

    if !options.iter().any(|o| o.selected) {
        options.push(OptionView {
            value: current.to_string(),
            selected: true,
        });
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ShellView {
        ShellView {
            origin: "Paoli".into(),
            destination: "Exton".into(),
            count: 15,
            phase: "idle",
            search_enabled: true,
            auto_refresh: false,
            output: "<b>".into(),
            status: "Ready to search for trains".into(),
        }
    }

    #[test]
    fn marks_selected_options() {
        let t = IndexTemplate::new(view(), 30);
        let selected: Vec<_> = t.origins.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "Paoli");
        assert!(t.counts.iter().any(|o| o.selected && o.value == "15"));
        assert_eq!(t.origins.len(), STATIONS.len());
    }

    #[test]
    fn unknown_station_is_kept() {
        let options = station_options("Elm Street");
        assert_eq!(options.len(), STATIONS.len() + 1);
        assert!(options.last().is_some_and(|o| o.selected && o.value == "Elm Street"));
    }

    #[test]
    fn reload_only_when_pending() {
        assert_eq!(IndexTemplate::new(view(), 30).reload_secs, None);

        let mut searching = view();
        searching.search_enabled = false;
        assert_eq!(IndexTemplate::new(searching, 30).reload_secs, Some(RELOAD_SECS));

        let mut refreshing = view();
        refreshing.auto_refresh = true;
        let t = IndexTemplate::new(refreshing.clone(), 30);
        assert_eq!(t.reload_secs, Some(30));
        assert_eq!(t.refresh_label(), "Auto-Refresh ON (30s)");

        refreshing.search_enabled = false;
        assert_eq!(IndexTemplate::new(refreshing, 30).reload_secs, Some(RELOAD_SECS));
    }

    #[test]
    fn idle_auto_refresh_page_reloads_on_the_timer() {
        let mut refreshing = view();
        refreshing.auto_refresh = true;
        let html = IndexTemplate::new(refreshing, 30).render().unwrap();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="30">"#));
    }

    #[test]
    fn renders_escaped_output() {
        let html = IndexTemplate::new(view(), 30).render().unwrap();
        assert!(html.contains("SEPTA Regional Rail Tracker"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("Ready to search for trains"));
        assert!(html.contains("Auto-Refresh (30s)"));
    }
}
