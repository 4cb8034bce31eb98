use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

use bedrun_fetch::{Progress, ProgressFn};

const PB_STYLE: &str =
    "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// Download progress bar wired to a fetch progress callback.
pub struct DownloadTracker {
    pb: ProgressBar,
}

impl DownloadTracker {
    pub fn new(msg: impl Into<String>) -> Self {
        let pb = ProgressBar::no_length();
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        Self {
            pb: pb.with_message(msg.into()),
        }
    }

    /// Callback for `FetchOptions::on_progress`. Length is learned from
    /// the first progress event that carries a Content-Length.
    pub fn progress_fn(&self) -> ProgressFn {
        let pb = self.pb.clone();
        Arc::new(move |p: Progress| {
            if let Some(total) = p.total_bytes
                && pb.length().is_none()
            {
                pb.set_length(total);
            }
            pb.set_position(p.bytes_fetched);
        })
    }

    pub fn finish(&self, msg: impl Into<String>) {
        self.pb.finish_with_message(msg.into());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
