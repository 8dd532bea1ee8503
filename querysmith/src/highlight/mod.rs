//! Syntax highlighting collaborator
//!
//! Highlighting is asynchronous and results can arrive out of order when the
//! input changes quickly. [`HighlightCoordinator`] hands every batch a ticket
//! from a monotonically increasing counter and only lets the newest ticket
//! update the displayed markup; older results are dropped on arrival.

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::HighlightSettings;
use crate::error::HighlightError;

/// Turns source text into markup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Highlighter: Send + Sync {
    /// Highlight `code`
    ///
    /// # Errors
    ///
    /// Returns `HighlightError::Failed` if no markup can be produced
    async fn highlight(&self, code: &str, language: &str, theme: &str)
        -> Result<String, HighlightError>;
}

/// Highlighter that only escapes text and tags it with language and theme
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

#[async_trait]
impl Highlighter for PlainHighlighter {
    async fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: &str,
    ) -> Result<String, HighlightError> {
        Ok(format!(
            "<pre class=\"highlight {}\" data-language=\"{}\"><code>{}</code></pre>",
            escape_html(theme),
            escape_html(language),
            escape_html(code)
        ))
    }
}

/// Escape text for inclusion in HTML
#[must_use]
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

/// Markup shown when highlighting fails
#[must_use]
pub fn fallback_markup(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(code))
}

/// Markup currently on display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Ticket of the batch that produced it
    pub ticket: u64,
    /// One markup entry per submitted source, in order
    pub markup: Vec<String>,
}

/// What happened to a submitted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// The batch was the newest and is now displayed
    Applied(Highlighted),
    /// A newer batch was submitted while this one was in flight
    Stale {
        /// Ticket of the discarded batch
        ticket: u64,
    },
}

/// Latest-request-wins wrapper around a [`Highlighter`]
pub struct HighlightCoordinator {
    highlighter: Arc<dyn Highlighter>,
    settings: HighlightSettings,
    latest: AtomicU64,
    display: Mutex<Option<Highlighted>>,
}

impl std::fmt::Debug for HighlightCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightCoordinator")
            .field("settings", &self.settings)
            .field("latest", &self.latest)
            .finish_non_exhaustive()
    }
}

impl HighlightCoordinator {
    /// Create a coordinator with nothing displayed
    pub fn new(highlighter: Arc<dyn Highlighter>, settings: HighlightSettings) -> Self {
        Self {
            highlighter,
            settings,
            latest: AtomicU64::new(0),
            display: Mutex::new(None),
        }
    }

    /// Highlight a batch of sources and display it unless a newer batch
    /// was submitted meanwhile
    ///
    /// Sources in a batch are highlighted concurrently and keep their order.
    /// Sources the highlighter rejects are shown as escaped plain text.
    pub async fn submit(&self, sources: &[String]) -> HighlightOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let markup = join_all(sources.iter().map(|source| self.highlight_one(source))).await;

        let mut display = self.display.lock();
        let superseded = ticket != self.latest.load(Ordering::SeqCst)
            || display.as_ref().is_some_and(|shown| shown.ticket > ticket);
        if superseded {
            tracing::debug!(ticket, "Discarding stale highlight result");
            return HighlightOutcome::Stale { ticket };
        }

        let highlighted = Highlighted { ticket, markup };
        *display = Some(highlighted.clone());
        HighlightOutcome::Applied(highlighted)
    }

    /// Markup currently displayed
    #[must_use]
    pub fn current(&self) -> Option<Highlighted> {
        self.display.lock().clone()
    }

    /// Ticket handed to the most recent submission
    #[must_use]
    pub fn latest_ticket(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    async fn highlight_one(&self, source: &str) -> String {
        match self
            .highlighter
            .highlight(source, &self.settings.language, &self.settings.theme)
            .await
        {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(error = %e, "Highlighting failed, showing plain text");
                fallback_markup(source)
            }
        }
    }
}
