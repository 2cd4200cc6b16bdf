use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str =
    "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const PB_STYLE_NO_LEN: &str = "{spinner:.blue} {msg:.cyan} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

const PB_DONE_STYLE: &str = "{msg} [{elapsed}] [{bytes}] [{bytes_per_sec}]";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

static PB_NO_LEN_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE_NO_LEN).ok().map(|s| s.tick_chars(TICK))
});

static PB_DONE_TEMPLATE: Lazy<Option<ProgressStyle>> =
    Lazy::new(|| ProgressStyle::with_template(PB_DONE_STYLE).ok());

#[derive(Debug, Clone)]
pub struct ProgressTrackerConfig {
    pub len:    Option<u64>,
    pub msg:    Option<String>,
    pub hidden: bool,
}

/// Byte counter and elapsed-time display for one download.
pub struct ProgressTracker {
    pub pb: ProgressBar,
}

impl ProgressTracker {
    pub fn new(ctx: ProgressTrackerConfig) -> Self {
        let pb = match (ctx.hidden, ctx.len) {
            (true, len) => ProgressBar::with_draw_target(len, indicatif::ProgressDrawTarget::hidden()),
            (false, Some(len)) => ProgressBar::new(len),
            (false, None) => ProgressBar::no_length(),
        };

        let style = if ctx.len.is_some() { &PB_TEMPLATE } else { &PB_NO_LEN_TEMPLATE };
        let pb = match style.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        let pb = pb.with_message(ctx.msg.unwrap_or_default());

        ProgressTracker { pb }
    }

    pub fn step(&self, len: u64) -> &Self {
        self.pb.inc(len);
        self
    }

    pub fn position(&self) -> u64 { self.pb.position() }

    /// Stop the bar, leaving a summary line with an optional note appended.
    pub fn finish(&self, note: Option<&str>) {
        if let Some(style) = PB_DONE_TEMPLATE.as_ref() {
            self.pb.set_style(style.clone());
        }
        if let Some(note) = note {
            self.pb.set_message(format!("{} [{note}]", self.pb.message()));
        }
        self.pb.finish();
    }

    /// Remove the bar without a summary, used when a download fails.
    pub fn abandon(&self) { self.pb.finish_and_clear(); }
}
