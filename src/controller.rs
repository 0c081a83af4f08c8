use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::{dispatch_conversion, ConversionBackend, ConversionOutcome};
use crate::clipboard::ClipboardSource;
use crate::error::ConvertError;
use crate::localizations::Localizations;
use crate::models::{
    file_path, looks_like_youtube, result_line, AudioBitrate, AudioFormat, ConversionMode,
    ConversionRequest, ConversionResult, VideoHeight,
};
use crate::progress::ProgressTicker;
use crate::view::{Control, Field, Panel, View};

/// Pause between "Complete!" and showing the result panel.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reveal {
    at: Instant,
    line: String,
    target: String,
}

/// Drives the converter page: owns the mode and quality choice, the fake
/// progress timer and the single in-flight request.
pub struct Controller<V: View> {
    view: V,
    localizer: Localizations,
    backend: Arc<dyn ConversionBackend>,
    mode: ConversionMode,
    video_height: VideoHeight,
    is_converting: bool,
    ticker: ProgressTicker,
    pending: Option<Receiver<ConversionOutcome>>,
    reveal: Option<Reveal>,
    last_result: Option<ConversionResult>,
}

impl<V: View> Controller<V> {
    pub fn new(view: V, localizer: Localizations, backend: Arc<dyn ConversionBackend>) -> Self {
        Self::with_ticker(view, localizer, backend, ProgressTicker::new())
    }

    pub fn with_ticker(
        view: V,
        localizer: Localizations,
        backend: Arc<dyn ConversionBackend>,
        ticker: ProgressTicker,
    ) -> Self {
        Self {
            view,
            localizer,
            backend,
            mode: ConversionMode::default(),
            video_height: VideoHeight::default(),
            is_converting: false,
            ticker,
            pending: None,
            reveal: None,
            last_result: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn localizer(&self) -> &Localizations {
        &self.localizer
    }

    #[cfg(test)]
    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    #[cfg(test)]
    pub fn video_height(&self) -> VideoHeight {
        self.video_height
    }

    pub fn is_converting(&self) -> bool {
        self.is_converting
    }

    #[cfg(test)]
    pub fn is_timer_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Filename of the last successful conversion, used by the download action.
    pub fn last_filename(&self) -> Option<&str> {
        self.last_result.as_ref().and_then(|r| r.filename.as_deref())
    }

    /// Earliest moment `tick` has work to do, so the UI loop can sleep until then.
    pub fn next_wakeup(&self) -> Option<Instant> {
        let reveal = self.reveal.as_ref().map(|r| r.at);
        match (self.ticker.next_deadline(), reveal) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn set_mode(&mut self, mode: ConversionMode) {
        if self.is_converting {
            return;
        }
        self.mode = mode;
        self.view.set_active_mode(mode);

        match mode {
            ConversionMode::Audio => {
                self.view.set_visible(Panel::AudioOptions, true);
                self.view.set_visible(Panel::VideoOptions, false);
            }
            ConversionMode::Video => {
                self.view.set_visible(Panel::AudioOptions, false);
                self.view.set_visible(Panel::VideoOptions, true);
            }
        }
        self.refresh_info();
    }

    pub fn select_height(&mut self, height: VideoHeight) {
        if self.is_converting {
            return;
        }
        self.video_height = height;
        self.view.set_active_height(height);
        self.update_video_info();
    }

    pub fn bitrate_changed(&mut self, bitrate: AudioBitrate) {
        self.view.set_bitrate(bitrate);
        if self.mode == ConversionMode::Audio {
            self.update_audio_info();
        }
    }

    pub fn format_changed(&mut self, format: AudioFormat) {
        self.view.set_audio_format(format);
        if self.mode == ConversionMode::Audio {
            self.update_audio_info();
        }
    }

    pub fn paste(&mut self, clipboard: &mut dyn ClipboardSource) {
        match clipboard.read_text() {
            Ok(text) => {
                self.view.set_text(Field::Url, &text);
                self.view.focus_url();
                self.refresh_info();
            }
            Err(e) => log::error!("{}", e),
        }
    }

    pub fn url_edited(&mut self, text: &str) {
        self.view.set_text(Field::Url, text);
        if looks_like_youtube(text) {
            self.refresh_info();
        }
    }

    /// Validates the URL and, if it passes, sends exactly one request.
    /// Returns whether a request went out.
    pub fn convert(&mut self, now: Instant) -> bool {
        if self.is_converting || !self.view.is_enabled(Control::Convert) {
            return false;
        }

        let url = self.view.text(Field::Url).trim().to_string();
        if url.is_empty() || !looks_like_youtube(&url) {
            let message = self
                .localizer
                .text("error-invalid-url", &ConvertError::InvalidUrl.to_string());
            self.view.alert(&message);
            return false;
        }

        let request = self.build_request(url);
        if self.mode == ConversionMode::Audio && self.view.audio_format().is_lossless() {
            log::debug!("Bitrate is ignored for lossless {}", self.view.audio_format());
        }
        self.start_conversion(now);

        log::info!(
            "Requesting {} conversion ({} / {}) for {}",
            request.mode.as_str(),
            request.format,
            request.quality,
            request.url
        );
        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);
        dispatch_conversion(Arc::clone(&self.backend), request, tx);
        true
    }

    fn build_request(&self, url: String) -> ConversionRequest {
        match self.mode {
            ConversionMode::Audio => {
                ConversionRequest::audio(url, self.view.bitrate(), self.view.audio_format())
            }
            ConversionMode::Video => ConversionRequest::video(url, self.video_height),
        }
    }

    fn start_conversion(&mut self, now: Instant) {
        self.is_converting = true;
        self.reveal = None;
        self.view.set_enabled(Control::Convert, false);
        self.view.set_visible(Panel::ConvertSpinner, true);
        self.view.set_visible(Panel::StatusArea, true);
        self.view.set_visible(Panel::ResultArea, false);
        self.view.set_progress(0.0);
        self.ticker.start(now);
    }

    /// Called every frame: picks up the backend reply, advances the progress
    /// animation and shows the result once the reveal delay has passed.
    pub fn tick(&mut self, now: Instant) {
        self.poll_reply(now);
        self.advance_timers(now);
    }

    fn poll_reply(&mut self, now: Instant) {
        let received = match &self.pending {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match received {
            Ok(outcome) => {
                self.pending = None;
                self.handle_outcome(outcome, now);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fail_conversion("Conversion worker stopped unexpectedly");
            }
        }
    }

    fn advance_timers(&mut self, now: Instant) {
        if let Some(progress) = self.ticker.poll(now) {
            self.on_progress(progress);
        }

        if self.reveal.as_ref().is_some_and(|r| r.at <= now) {
            if let Some(reveal) = self.reveal.take() {
                self.show_result(reveal);
            }
        }
    }

    pub fn handle_outcome(&mut self, outcome: ConversionOutcome, now: Instant) {
        let result = outcome.and_then(|result| {
            if result.success {
                Ok(result)
            } else {
                Err(ConvertError::backend(result.error))
            }
        });

        match result {
            Ok(result) => self.complete_conversion(result, now),
            Err(e) => {
                log::warn!("Conversion failed: {}", e);
                self.fail_conversion(&e.to_string());
            }
        }
    }

    fn on_progress(&mut self, progress: f32) {
        log::debug!("progress {:.1}%", progress);
        self.view.set_progress(progress);

        let status = if progress < 30.0 {
            Some(self.localizer.text("status-fetching", "Fetching video info..."))
        } else if progress < 60.0 {
            Some(match self.mode {
                ConversionMode::Audio => self.localizer.text("status-extracting", "Extracting audio..."),
                ConversionMode::Video => self.localizer.text("status-downloading", "Downloading video..."),
            })
        } else if progress < 90.0 {
            Some(match self.mode {
                ConversionMode::Audio => self.localizer.text("status-converting", "Converting format..."),
                ConversionMode::Video => self.localizer.text("status-processing", "Processing video..."),
            })
        } else {
            None
        };

        if let Some(status) = status {
            self.view.set_text(Field::StatusText, &status);
        }
    }

    fn complete_conversion(&mut self, result: ConversionResult, now: Instant) {
        // The timer goes first so it cannot touch the bar again.
        self.ticker.stop();
        self.is_converting = false;

        let Some(filename) = result.filename.clone() else {
            self.fail_conversion(&ConvertError::Malformed("filename").to_string());
            return;
        };

        self.view.set_progress(100.0);
        let complete = self.localizer.text("status-complete", "Complete!");
        self.view.set_text(Field::StatusText, &complete);

        log::info!(
            "Converted {} ({:?}, {:?} bytes)",
            filename,
            result.mode.unwrap_or(self.mode),
            result.size
        );
        if let Some(path) = &result.path {
            log::debug!("Server stored file at {}", path);
        }

        self.reveal = Some(Reveal {
            at: now + REVEAL_DELAY,
            line: result_line(
                &filename,
                result.quality.as_deref().unwrap_or_default(),
                result.size.unwrap_or(0.0),
            ),
            target: file_path(&filename),
        });
        self.last_result = Some(result);
    }

    fn show_result(&mut self, reveal: Reveal) {
        self.restore_convert_control();
        self.view.set_visible(Panel::StatusArea, false);
        self.view.set_visible(Panel::ResultArea, true);
        self.view.set_text(Field::ResultText, &reveal.line);
        self.view.set_download_target(Some(reveal.target));
    }

    fn fail_conversion(&mut self, message: &str) {
        self.ticker.stop();
        self.is_converting = false;
        self.reveal = None;
        self.restore_convert_control();
        self.view.set_visible(Panel::StatusArea, false);

        let prefix = self.localizer.text("error-prefix", "Error:");
        self.view.alert(&format!("{} {}", prefix, message));
    }

    fn restore_convert_control(&mut self) {
        self.view.set_enabled(Control::Convert, true);
        self.view.set_visible(Panel::ConvertSpinner, false);
    }

    pub fn convert_another(&mut self) {
        self.view.set_text(Field::Url, "");
        self.view.set_visible(Panel::ResultArea, false);
        self.view.set_visible(Panel::FileInfo, false);
        self.view.set_progress(0.0);
        self.view.focus_url();
    }

    pub fn download_target(&self) -> Option<String> {
        self.last_filename().map(file_path)
    }

    fn refresh_info(&mut self) {
        match self.mode {
            ConversionMode::Audio => self.update_audio_info(),
            ConversionMode::Video => self.update_video_info(),
        }
    }

    fn update_audio_info(&mut self) {
        let kind = self.localizer.text("type-audio", "Audio");
        let quality = format!("{}kbps {}", self.view.bitrate().as_str(), self.view.audio_format());
        self.view.set_text(Field::TypeDisplay, &kind);
        self.view.set_text(Field::QualityDisplay, &quality);
        self.view.set_visible(Panel::FileInfo, true);
    }

    fn update_video_info(&mut self) {
        let kind = self.localizer.text("type-video", "Video (MP4)");
        self.view.set_text(Field::TypeDisplay, &kind);
        self.view.set_text(Field::QualityDisplay, self.video_height.label());
        self.view.set_visible(Panel::FileInfo, true);
    }

    /// Blocks until the in-flight request answers. Test backends reply
    /// immediately, so this keeps tests free of polling loops.
    #[cfg(test)]
    fn settle(&mut self, now: Instant) {
        if let Some(rx) = self.pending.take() {
            let outcome = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("backend did not answer");
            self.handle_outcome(outcome, now);
        }
    }
}
