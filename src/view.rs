use crate::models::{AudioBitrate, AudioFormat, ConversionMode, VideoHeight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    TypeDisplay,
    QualityDisplay,
    StatusText,
    ResultText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    AudioOptions,
    VideoOptions,
    FileInfo,
    StatusArea,
    ResultArea,
    ConvertSpinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Convert,
}

/// Everything the controller reads from or writes to the page.
pub trait View {
    fn text(&self, field: Field) -> &str;
    fn set_text(&mut self, field: Field, text: &str);

    fn is_visible(&self, panel: Panel) -> bool;
    fn set_visible(&mut self, panel: Panel, visible: bool);

    fn is_enabled(&self, control: Control) -> bool;
    fn set_enabled(&mut self, control: Control, enabled: bool);

    fn progress(&self) -> f32;
    fn set_progress(&mut self, percent: f32);

    fn set_active_mode(&mut self, mode: ConversionMode);
    fn set_active_height(&mut self, height: VideoHeight);

    fn bitrate(&self) -> AudioBitrate;
    fn set_bitrate(&mut self, bitrate: AudioBitrate);
    fn audio_format(&self) -> AudioFormat;
    fn set_audio_format(&mut self, format: AudioFormat);

    fn focus_url(&mut self);
    fn alert(&mut self, message: &str);
    fn set_download_target(&mut self, target: Option<String>);
}

/// Retained widget state. The egui front end draws from it every frame and
/// tests inspect it directly.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub url: String,
    pub type_display: String,
    pub quality_display: String,
    pub status_text: String,
    pub result_text: String,

    pub audio_options_visible: bool,
    pub video_options_visible: bool,
    pub file_info_visible: bool,
    pub status_visible: bool,
    pub result_visible: bool,
    pub spinner_visible: bool,

    pub convert_enabled: bool,
    pub progress: f32,
    pub active_mode: ConversionMode,
    pub active_height: VideoHeight,
    pub bitrate: AudioBitrate,
    pub audio_format: AudioFormat,

    pub focus_requested: bool,
    pub alert: Option<String>,
    pub download_target: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            url: String::new(),
            type_display: String::new(),
            quality_display: String::new(),
            status_text: String::new(),
            result_text: String::new(),
            audio_options_visible: true,
            video_options_visible: false,
            file_info_visible: false,
            status_visible: false,
            result_visible: false,
            spinner_visible: false,
            convert_enabled: true,
            progress: 0.0,
            active_mode: ConversionMode::default(),
            active_height: VideoHeight::default(),
            bitrate: AudioBitrate::default(),
            audio_format: AudioFormat::default(),
            focus_requested: false,
            alert: None,
            download_target: None,
        }
    }
}

impl ViewState {
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

impl View for ViewState {
    fn text(&self, field: Field) -> &str {
        match field {
            Field::Url => &self.url,
            Field::TypeDisplay => &self.type_display,
            Field::QualityDisplay => &self.quality_display,
            Field::StatusText => &self.status_text,
            Field::ResultText => &self.result_text,
        }
    }

    fn set_text(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Url => &mut self.url,
            Field::TypeDisplay => &mut self.type_display,
            Field::QualityDisplay => &mut self.quality_display,
            Field::StatusText => &mut self.status_text,
            Field::ResultText => &mut self.result_text,
        };
        slot.clear();
        slot.push_str(text);
    }

    fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::AudioOptions => self.audio_options_visible,
            Panel::VideoOptions => self.video_options_visible,
            Panel::FileInfo => self.file_info_visible,
            Panel::StatusArea => self.status_visible,
            Panel::ResultArea => self.result_visible,
            Panel::ConvertSpinner => self.spinner_visible,
        }
    }

    fn set_visible(&mut self, panel: Panel, visible: bool) {
        let slot = match panel {
            Panel::AudioOptions => &mut self.audio_options_visible,
            Panel::VideoOptions => &mut self.video_options_visible,
            Panel::FileInfo => &mut self.file_info_visible,
            Panel::StatusArea => &mut self.status_visible,
            Panel::ResultArea => &mut self.result_visible,
            Panel::ConvertSpinner => &mut self.spinner_visible,
        };
        *slot = visible;
    }

    fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Convert => self.convert_enabled,
        }
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        match control {
            Control::Convert => self.convert_enabled = enabled,
        }
    }

    fn progress(&self) -> f32 {
        self.progress
    }

    fn set_progress(&mut self, percent: f32) {
        self.progress = percent.clamp(0.0, 100.0);
    }

    fn set_active_mode(&mut self, mode: ConversionMode) {
        self.active_mode = mode;
    }

    fn set_active_height(&mut self, height: VideoHeight) {
        self.active_height = height;
    }

    fn bitrate(&self) -> AudioBitrate {
        self.bitrate
    }

    fn set_bitrate(&mut self, bitrate: AudioBitrate) {
        self.bitrate = bitrate;
    }

    fn audio_format(&self) -> AudioFormat {
        self.audio_format
    }

    fn set_audio_format(&mut self, format: AudioFormat) {
        self.audio_format = format;
    }

    fn focus_url(&mut self) {
        self.focus_requested = true;
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn set_download_target(&mut self, target: Option<String>) {
        self.download_target = target;
    }
}
