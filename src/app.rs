use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::backend::{dispatch_file_download, ConversionBackend};
use crate::clipboard::SystemClipboard;
use crate::controller::Controller;
use crate::error::ConvertError;
use crate::localizations::Localizations;
use crate::ui::{self, UiEvent};
use crate::view::{View, ViewState};

/// How often to look for a backend reply while one is outstanding.
const REPLY_POLL: Duration = Duration::from_millis(100);

type SaveResult = Result<PathBuf, ConvertError>;

pub struct ConvertApp {
    controller: Controller<ViewState>,
    backend: Arc<dyn ConversionBackend>,
    clipboard: SystemClipboard,
    download_dir: PathBuf,
    saved_path: Option<PathBuf>,
    is_saving: bool,
    save_sender: Sender<SaveResult>,
    save_receiver: Receiver<SaveResult>,
}

impl ConvertApp {
    pub fn new(backend: Arc<dyn ConversionBackend>, localizer: Localizations, download_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let controller = Controller::new(ViewState::default(), localizer, Arc::clone(&backend));

        Self {
            controller,
            backend,
            clipboard: SystemClipboard,
            download_dir,
            saved_path: None,
            is_saving: false,
            save_sender: tx,
            save_receiver: rx,
        }
    }

    fn process_save_results(&mut self) {
        while let Ok(result) = self.save_receiver.try_recv() {
            self.is_saving = false;
            match result {
                Ok(path) => {
                    log::info!("Saved {}", path.display());
                    self.saved_path = Some(path);
                }
                Err(e) => {
                    log::error!("Download failed: {}", e);
                    let prefix = self.controller.localizer().text("error-prefix", "Error:");
                    self.controller
                        .view_mut()
                        .alert(&format!("{} {}", prefix, e));
                }
            }
        }
    }

    fn start_file_download(&mut self) {
        if self.is_saving {
            return;
        }
        let (Some(path), Some(filename)) = (
            self.controller.download_target(),
            self.controller.last_filename().map(str::to_string),
        ) else {
            return;
        };

        log::info!("Fetching {} into {}", path, self.download_dir.display());
        self.is_saving = true;
        self.saved_path = None;
        dispatch_file_download(
            Arc::clone(&self.backend),
            path,
            filename,
            self.download_dir.clone(),
            self.save_sender.clone(),
        );
    }

    fn handle_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::UrlEdited(text) => self.controller.url_edited(&text),
            UiEvent::Paste => self.controller.paste(&mut self.clipboard),
            UiEvent::SetMode(mode) => self.controller.set_mode(mode),
            UiEvent::SelectHeight(height) => self.controller.select_height(height),
            UiEvent::BitrateChanged(bitrate) => self.controller.bitrate_changed(bitrate),
            UiEvent::FormatChanged(format) => self.controller.format_changed(format),
            UiEvent::Convert => {
                if self.controller.convert(now) {
                    self.saved_path = None;
                }
            }
            UiEvent::Download => self.start_file_download(),
            UiEvent::ConvertAnother => {
                self.saved_path = None;
                self.controller.convert_another();
            }
            UiEvent::DismissAlert => {
                self.controller.view_mut().take_alert();
            }
        }
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.controller.tick(now);
        self.process_save_results();

        let mut events = Vec::new();
        let focus = self.controller.view_mut().take_focus_request();
        let localizer = self.controller.localizer();
        let view = self.controller.view();
        let blocked = view.alert.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.heading(localizer.text("app-title", "YouTube Converter"));
                ui.add_space(20.0);

                ui::render_url_input(ui, view, localizer, focus, &mut events);
                ui.add_space(10.0);

                ui::render_mode_selector(ui, view, localizer, &mut events);
                ui.add_space(10.0);
                ui::render_audio_options(ui, view, localizer, &mut events);
                ui::render_video_options(ui, view, &mut events);
                ui.add_space(10.0);

                ui::render_file_info(ui, view, localizer);
                ui.add_space(20.0);

                ui::render_convert_button(ui, view, localizer, &mut events);
                ui.add_space(10.0);

                ui::render_status(ui, view);
                ui::render_result(
                    ui,
                    view,
                    localizer,
                    self.saved_path.as_deref(),
                    self.is_saving,
                    &mut events,
                );
                ui.add_space(20.0);

                ui::render_download_dir_selector(ui, &mut self.download_dir, localizer);
            });
        });

        if let Some(message) = &view.alert {
            ui::render_alert(ctx, message, localizer, &mut events);
        }

        for event in events {
            self.handle_event(event, now);
        }

        self.schedule_repaint(ctx, now);
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let mut wait = self
            .controller
            .next_wakeup()
            .map(|at| at.saturating_duration_since(now));

        if self.controller.is_converting() || self.is_saving {
            wait = Some(wait.map_or(REPLY_POLL, |w| w.min(REPLY_POLL)));
        }
        if let Some(wait) = wait {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for ConvertApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}
