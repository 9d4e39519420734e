//! HTML rendering for the portfolio page.
//!
//! # Responsibility
//! - Render the sidebar navigation, contact list and section bodies.
//! - Derive active/revealed styling from tracker state only.
//!
//! # Invariants
//! - Exactly the nav entry whose id equals the active id carries
//!   `NAV_ACTIVE_CLASS`; every other entry carries `NAV_IDLE_CLASS`.
//! - All configured text is HTML-escaped; hrefs are escaped but not validated.

use crate::config::PortfolioConfig;
use crate::model::content::{ContentBlock, ListItem};
use crate::model::section::{Section, SectionId};
use crate::tracker::reveal::RevealTracker;
use crate::tracker::section_tracker::SectionTracker;
use std::collections::BTreeSet;

pub const NAV_ACTIVE_CLASS: &str = "nav-active";
pub const NAV_IDLE_CLASS: &str = "nav-idle";
pub const REVEALED_CLASS: &str = "is-revealed";
/// Attribute carrying the section id on nav buttons.
pub const NAV_SECTION_ATTR: &str = "data-section";

const STYLESHEET: &str = "\
*{box-sizing:border-box}\n\
body{margin:0;font-family:system-ui,sans-serif;color:#1f2937;background:#fff}\n\
.page{display:flex;min-height:100vh}\n\
.sidebar{position:fixed;left:0;top:0;height:100%;width:16rem;padding:2rem;display:flex;flex-direction:column;justify-content:space-between;z-index:10;border-right:1px solid #e5e7eb;background:#fff}\n\
.brand{font-size:1.5rem;font-weight:300;margin:0 0 3rem}\n\
.nav-list,.contact-list{list-style:none;margin:0;padding:0}\n\
.nav-list li{margin-bottom:1rem}\n\
.nav-link{background:none;border:0;padding:0;font:inherit;text-align:left;cursor:pointer;transition:color .2s}\n\
.nav-idle{color:#9ca3af}\n\
.nav-idle:hover,.nav-active{color:#000}\n\
.contact-title{font-size:.875rem;font-weight:300;color:#9ca3af;margin:0 0 .5rem}\n\
.contact-list li{margin-bottom:.5rem}\n\
.contact-list a{font-size:.875rem;color:#9ca3af;text-decoration:none;transition:color .2s}\n\
.contact-list a:hover{color:#000}\n\
.content{margin-left:16rem;width:100%}\n\
.section{min-height:100vh;padding:4rem;display:flex;align-items:center;border-bottom:1px solid #f3f4f6;position:relative;overflow:hidden;opacity:0;transition:opacity 1.5s}\n\
.section-body{max-width:48rem;z-index:10;opacity:0;transform:translateY(50px);transition:opacity 1.5s .2s,transform 1.5s .2s}\n\
.section.is-revealed{opacity:1}\n\
.section.is-revealed .section-body{opacity:1;transform:none}\n\
.hero-line{font-size:12rem;font-weight:300;line-height:1;margin:0}\n\
.heading{font-size:3.75rem;font-weight:300;color:#d1d5db;margin:0 0 2rem}\n\
.subheading{font-size:1.25rem;font-weight:300;color:#4b5563;margin:2rem 0 1rem}\n\
.entry{margin-bottom:2rem}\n\
.entry-title{font-size:1.5rem;font-weight:300;margin:0 0 .5rem}\n\
.caption{color:#4b5563;margin:0 0 1rem}\n\
.bullets{padding-left:1.25rem}\n\
.bullets li{margin-bottom:.5rem}\n";

/// Snapshot of tracker state consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active: SectionId,
    pub revealed: BTreeSet<SectionId>,
}

impl ViewState {
    /// Initial state: first section active, nothing revealed.
    pub fn initial(config: &PortfolioConfig) -> Option<Self> {
        config.first_section().map(|first| Self {
            active: first.clone(),
            revealed: BTreeSet::new(),
        })
    }

    /// Captures the current state of live trackers.
    pub fn capture(tracker: &SectionTracker, reveal: Option<&RevealTracker>) -> Self {
        Self {
            active: tracker.active(),
            revealed: reveal
                .map(|reveal| reveal.revealed().into_iter().collect())
                .unwrap_or_default(),
        }
    }

    /// State with every section revealed, for static output without scripts.
    pub fn all_revealed(config: &PortfolioConfig) -> Option<Self> {
        let mut state = Self::initial(config)?;
        state.revealed = config
            .sections
            .iter()
            .map(|section| section.id.clone())
            .collect();
        Some(state)
    }
}

/// Returns the page stylesheet.
pub fn stylesheet() -> &'static str {
    STYLESHEET
}

/// Renders a complete HTML document.
pub fn render_page(config: &PortfolioConfig, state: &ViewState) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str(&format!("<title>{}</title>\n", escape_html(&config.title)));
    html.push_str("<style>\n");
    html.push_str(STYLESHEET);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&render_body(config, state));
    html.push_str("</body>\n</html>\n");
    html
}

/// Renders the page body: sidebar plus content column.
pub fn render_body(config: &PortfolioConfig, state: &ViewState) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<div class=\"page\">\n");
    html.push_str("<nav class=\"sidebar\">\n<div>\n");
    html.push_str(&format!(
        "<h1 class=\"brand\">{}</h1>\n",
        escape_html(&config.brand)
    ));
    html.push_str(&render_nav(config, state.active.as_str()));
    html.push_str("</div>\n");
    html.push_str(&render_contacts(config));
    html.push_str("</nav>\n");

    html.push_str("<main class=\"content\">\n");
    for section in &config.sections {
        html.push_str(&render_section(
            config,
            section,
            state.revealed.contains(&section.id),
        ));
    }
    html.push_str("</main>\n</div>\n");
    html
}

/// Renders the navigation list with `active` highlighted.
pub fn render_nav(config: &PortfolioConfig, active: &str) -> String {
    let mut html = String::from("<ul class=\"nav-list\">\n");
    for section in &config.sections {
        let is_active = section.id.as_str() == active;
        let class = if is_active {
            NAV_ACTIVE_CLASS
        } else {
            NAV_IDLE_CLASS
        };
        let current = if is_active {
            " aria-current=\"true\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<li><button type=\"button\" class=\"nav-link {class}\" {NAV_SECTION_ATTR}=\"{}\"{current}>{}</button></li>\n",
            escape_html(section.id.as_str()),
            escape_html(&section.title)
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn render_contacts(config: &PortfolioConfig) -> String {
    let mut html = String::from("<div>\n<h2 class=\"contact-title\">CONTACT</h2>\n");
    html.push_str("<ul class=\"contact-list\">\n");
    for link in &config.contacts {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&link.href),
            escape_html(&link.title)
        ));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

/// Renders one `<section>` with its content blocks.
pub fn render_section(config: &PortfolioConfig, section: &Section, revealed: bool) -> String {
    let class = if revealed {
        format!("section {REVEALED_CLASS}")
    } else {
        "section".to_string()
    };
    let mut html = format!(
        "<section id=\"{}\" class=\"{class}\">\n<div class=\"section-body\">\n",
        escape_html(section.id.as_str())
    );
    for block in config.content_for(section.id.as_str()) {
        render_block(&mut html, block);
    }
    html.push_str("</div>\n</section>\n");
    html
}

fn render_block(html: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::Hero { lines } => {
            html.push_str("<div class=\"hero\">\n");
            for line in lines {
                html.push_str(&format!(
                    "<h2 class=\"hero-line\">{}</h2>\n",
                    escape_html(line)
                ));
            }
            html.push_str("</div>\n");
        }
        ContentBlock::Heading { text } => {
            html.push_str(&format!("<h2 class=\"heading\">{}</h2>\n", escape_html(text)));
        }
        ContentBlock::Subheading { text } => {
            html.push_str(&format!(
                "<h3 class=\"subheading\">{}</h3>\n",
                escape_html(text)
            ));
        }
        ContentBlock::Paragraph { text } => {
            html.push_str(&format!("<p>{}</p>\n", escape_html(text)));
        }
        ContentBlock::Caption { text } => {
            html.push_str(&format!("<p class=\"caption\">{}</p>\n", escape_html(text)));
        }
        ContentBlock::BulletList { items } => {
            html.push_str("<ul class=\"bullets\">\n");
            for item in items {
                html.push_str(&format!("<li>{}</li>\n", render_list_item(item)));
            }
            html.push_str("</ul>\n");
        }
        ContentBlock::Entry {
            title,
            caption,
            blocks,
        } => {
            html.push_str("<div class=\"entry\">\n");
            html.push_str(&format!(
                "<h3 class=\"entry-title\">{}</h3>\n",
                escape_html(title)
            ));
            if let Some(caption) = caption {
                html.push_str(&format!(
                    "<p class=\"caption\">{}</p>\n",
                    escape_html(caption)
                ));
            }
            for nested in blocks {
                render_block(html, nested);
            }
            html.push_str("</div>\n");
        }
    }
}

fn render_list_item(item: &ListItem) -> String {
    match &item.lead {
        Some(lead) => format!(
            "<strong>{}</strong> {}",
            escape_html(lead),
            escape_html(&item.text)
        ),
        None => escape_html(&item.text),
    }
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_html, render_nav, render_section, ViewState, NAV_ACTIVE_CLASS};
    use crate::config::PortfolioConfig;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn nav_marks_only_active_entry() {
        let config = PortfolioConfig::default_portfolio();
        let html = render_nav(&config, "about");
        assert_eq!(html.matches(NAV_ACTIVE_CLASS).count(), 1);
        assert_eq!(html.matches("aria-current").count(), 1);
        assert!(html.contains(
            "class=\"nav-link nav-active\" data-section=\"about\" aria-current=\"true\">About</button>"
        ));
    }

    #[test]
    fn nav_with_unknown_active_marks_nothing() {
        let config = PortfolioConfig::default_portfolio();
        let html = render_nav(&config, "missing");
        assert!(!html.contains(NAV_ACTIVE_CLASS));
    }

    #[test]
    fn section_renders_led_items_and_reveal_class() {
        let config = PortfolioConfig::default_portfolio();
        let about = config.section("about").expect("about section");

        let hidden = render_section(&config, about, false);
        assert!(hidden.starts_with("<section id=\"about\" class=\"section\">"));
        assert!(hidden.contains("<strong>Integrity:</strong> Honesty"));
        assert!(hidden.contains("I&#39;m driven"));

        let revealed = render_section(&config, about, true);
        assert!(revealed.starts_with("<section id=\"about\" class=\"section is-revealed\">"));
    }

    #[test]
    fn all_revealed_covers_every_section() {
        let config = PortfolioConfig::default_portfolio();
        let state = ViewState::all_revealed(&config).expect("non-empty config");
        assert_eq!(state.revealed.len(), config.sections.len());
        assert_eq!(state.active, "home");
    }
}
