//! Subcommand implementations.
//!
//! Every command returns the text to print on stdout so tests can check it
//! without spawning the binary.

use crate::cli::{Command, ConfigSource, PreviewPosition};
use log::{debug, info};
use portfolio_core::view::section_element;
use portfolio_core::{
    render_page, ConfigError, ElementHandle, ManualViewport, PortfolioConfig, PortfolioView,
    ScrollPort, TrackerError, ViewState, VisibilitySource,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// Errors surfaced to the user with a non-zero exit code.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Tracker(TrackerError),
    Output(std::io::Error),
    Logging(String),
    InvalidArgument(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Tracker(err) => write!(f, "failed to mount trackers: {err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
            Self::Logging(message) => write!(f, "failed to initialize logging: {message}"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Tracker(err) => Some(err),
            Self::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TrackerError> for CliError {
    fn from(value: TrackerError) -> Self {
        Self::Tracker(value)
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Runs one subcommand and returns its stdout text.
pub fn run(command: &Command) -> CliResult<String> {
    match command {
        Command::Render { source, out } => render(source, out.as_deref()),
        Command::Preview {
            source,
            position,
            viewport_height,
            section_height,
        } => preview(source, position, *viewport_height, *section_height),
        Command::Check { source } => check(source),
    }
}

fn load_config(source: &ConfigSource) -> CliResult<PortfolioConfig> {
    match &source.config {
        Some(path) => Ok(PortfolioConfig::load(path)?),
        None => {
            debug!("event=config_builtin module=cli status=ok");
            let config = PortfolioConfig::default_portfolio();
            config.validate()?;
            Ok(config)
        }
    }
}

fn render(source: &ConfigSource, out: Option<&Path>) -> CliResult<String> {
    let config = load_config(source)?;
    let state = ViewState::all_revealed(&config).ok_or(CliError::Config(ConfigError::NoSections))?;
    let html = render_page(&config, &state);

    match out {
        Some(path) => {
            std::fs::write(path, &html).map_err(CliError::Output)?;
            info!(
                "event=page_rendered module=cli status=ok bytes={} path={}",
                html.len(),
                path.display()
            );
            Ok(format!("wrote {} bytes to {}\n", html.len(), path.display()))
        }
        None => Ok(html),
    }
}

fn preview(
    source: &ConfigSource,
    position: &PreviewPosition,
    viewport_height: f64,
    section_height: f64,
) -> CliResult<String> {
    if !(viewport_height.is_finite() && viewport_height > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "viewport height must be positive: {viewport_height}"
        )));
    }
    if !(section_height.is_finite() && section_height > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "section height must be positive: {section_height}"
        )));
    }

    let config = load_config(source)?;
    let elements: Vec<ElementHandle> = (0..config.sections.len()).map(section_element).collect();
    let viewport = Rc::new(ManualViewport::uniform(
        viewport_height,
        &elements,
        section_height,
    ));
    let visibility: Rc<dyn VisibilitySource> = viewport.clone();
    let scroller: Rc<dyn ScrollPort> = viewport.clone();
    let view = PortfolioView::mount_indexed(config, visibility, scroller)?;

    let mut report = String::new();
    match (&position.scroll_to, position.offset) {
        (Some(section), _) => {
            if !view.scroll_to_section(section) {
                report.push_str(&format!("no section named `{section}`; viewport unchanged\n"));
            }
        }
        (None, Some(offset)) => viewport.scroll_to(offset),
        (None, None) => {}
    }

    report.push_str(&format!("scroll_top={}\n", viewport.scroll_top()));
    report.push_str(&format!("active={}\n", view.active()));
    for section in &view.config().sections {
        let marker = if view.tracker().is_active(section.id.as_str()) {
            '>'
        } else {
            ' '
        };
        let revealed = if view.reveal().is_revealed(section.id.as_str()) {
            " (revealed)"
        } else {
            ""
        };
        report.push_str(&format!(
            "{marker} {:<14}{}{revealed}\n",
            section.id.as_str(),
            section.title
        ));
    }
    view.unmount();
    Ok(report)
}

fn check(source: &ConfigSource) -> CliResult<String> {
    let config = load_config(source)?;
    let blocks: usize = config
        .sections
        .iter()
        .map(|section| config.content_for(section.id.as_str()).len())
        .sum();
    Ok(format!(
        "ok: {} sections, {} content blocks, {} contacts, active threshold {}, reveal threshold {}\n",
        config.sections.len(),
        blocks,
        config.contacts.len(),
        config.tracking.active_threshold,
        config.tracking.reveal_threshold
    ))
}

#[cfg(test)]
mod tests {
    use super::{run, CliError};
    use crate::cli::{Command, ConfigSource, PreviewPosition};
    use portfolio_core::PortfolioConfig;

    fn builtin() -> ConfigSource {
        ConfigSource::default()
    }

    fn preview_at(position: PreviewPosition) -> String {
        run(&Command::Preview {
            source: builtin(),
            position,
            viewport_height: 800.0,
            section_height: 1000.0,
        })
        .expect("preview succeeds")
    }

    fn active_line(report: &str) -> &str {
        report
            .lines()
            .find(|line| line.starts_with("active="))
            .expect("report has an active line")
    }

    #[test]
    fn preview_at_top_marks_home() {
        let report = preview_at(PreviewPosition {
            scroll_to: None,
            offset: Some(0.0),
        });
        assert_eq!(active_line(&report), "active=home");
        assert!(report.lines().any(|line| line.starts_with("> home")));
        assert_eq!(report.lines().filter(|line| line.starts_with('>')).count(), 1);
    }

    #[test]
    fn preview_scroll_to_projects_marks_projects() {
        let report = preview_at(PreviewPosition {
            scroll_to: Some("projects".to_string()),
            offset: None,
        });
        assert_eq!(active_line(&report), "active=projects");
        assert!(report.contains("scroll_top=4000"));
    }

    #[test]
    fn preview_unknown_section_leaves_viewport_alone() {
        let report = preview_at(PreviewPosition {
            scroll_to: Some("blog".to_string()),
            offset: None,
        });
        assert!(report.starts_with("no section named `blog`"));
        assert!(report.contains("scroll_top=0\n"));
        assert_eq!(active_line(&report), "active=home");
    }

    #[test]
    fn preview_rejects_non_positive_heights() {
        let err = run(&Command::Preview {
            source: builtin(),
            position: PreviewPosition {
                scroll_to: None,
                offset: Some(0.0),
            },
            viewport_height: 0.0,
            section_height: 1000.0,
        })
        .expect_err("zero viewport must fail");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn render_writes_page_to_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("index.html");

        let message = run(&Command::Render {
            source: builtin(),
            out: Some(out.clone()),
        })
        .expect("render succeeds");

        assert!(message.starts_with("wrote "));
        let html = std::fs::read_to_string(&out).expect("read output");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("aria-current=\"true\"").count(), 1);
    }

    #[test]
    fn check_reports_config_error_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("portfolio.json");
        let mut config = PortfolioConfig::default_portfolio();
        config.sections.clear();
        std::fs::write(&path, config.to_json_pretty().expect("serialize")).expect("write");

        let err = run(&Command::Check {
            source: ConfigSource { config: Some(path) },
        })
        .expect_err("empty sections must fail");
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn check_summarizes_builtin_config() {
        let report = run(&Command::Check { source: builtin() }).expect("check succeeds");
        assert!(report.starts_with("ok: 6 sections"));
    }
}
