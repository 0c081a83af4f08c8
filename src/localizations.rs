use std::collections::HashMap;

use i18n_embed::DesktopLanguageRequester;
use unic_langid::LanguageIdentifier;

// Simple in-memory translations
#[derive(Default)]
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: &'static str) {
        self.strings.insert(key, value);
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

pub struct Localizations {
    translations: HashMap<&'static str, Translations>,
    current_lang: String,
}

impl Default for Localizations {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizations {
    /// Picks the first desktop language we have a table for.
    pub fn new() -> Self {
        let mut localizer = Self::with_tables();
        localizer.select_from(&DesktopLanguageRequester::requested_languages());
        localizer
    }

    pub fn for_language(lang: &str) -> Self {
        let mut localizer = Self::with_tables();
        localizer.select(lang);
        localizer
    }

    fn with_tables() -> Self {
        let mut translations = HashMap::new();

        let mut en = Translations::new();
        en.insert("app-title", "YouTube Converter");
        en.insert("url-label", "Video URL:");
        en.insert("url-placeholder", "Paste a YouTube link");
        en.insert("paste-button", "Paste");
        en.insert("mode-audio", "Audio");
        en.insert("mode-video", "Video");
        en.insert("bitrate-label", "Bitrate:");
        en.insert("format-label", "Format:");
        en.insert("convert-button", "Convert");
        en.insert("download-button", "Download");
        en.insert("convert-another", "Convert another");
        en.insert("download-to", "Save to:");
        en.insert("browse-button", "Browse...");
        en.insert("type-label", "Type:");
        en.insert("quality-label", "Quality:");
        en.insert("type-audio", "Audio");
        en.insert("type-video", "Video (MP4)");
        en.insert("status-fetching", "Fetching video info...");
        en.insert("status-extracting", "Extracting audio...");
        en.insert("status-downloading", "Downloading video...");
        en.insert("status-converting", "Converting format...");
        en.insert("status-processing", "Processing video...");
        en.insert("status-complete", "Complete!");
        en.insert("status-saving", "Saving file...");
        en.insert("saved-to", "Saved to:");
        en.insert("error-invalid-url", "Please enter a valid YouTube URL");
        en.insert("error-prefix", "Error:");
        en.insert("alert-ok", "OK");
        translations.insert("en-US", en);

        let mut es = Translations::new();
        es.insert("app-title", "Convertidor de YouTube");
        es.insert("url-label", "URL del video:");
        es.insert("url-placeholder", "Pegue un enlace de YouTube");
        es.insert("paste-button", "Pegar");
        es.insert("mode-audio", "Audio");
        es.insert("mode-video", "Video");
        es.insert("bitrate-label", "Tasa de bits:");
        es.insert("format-label", "Formato:");
        es.insert("convert-button", "Convertir");
        es.insert("download-button", "Descargar");
        es.insert("convert-another", "Convertir otro");
        es.insert("download-to", "Guardar en:");
        es.insert("browse-button", "Examinar...");
        es.insert("type-label", "Tipo:");
        es.insert("quality-label", "Calidad:");
        es.insert("type-audio", "Audio");
        es.insert("type-video", "Video (MP4)");
        es.insert("status-fetching", "Obteniendo información del video...");
        es.insert("status-extracting", "Extrayendo audio...");
        es.insert("status-downloading", "Descargando video...");
        es.insert("status-converting", "Convirtiendo formato...");
        es.insert("status-processing", "Procesando video...");
        es.insert("status-complete", "¡Completado!");
        es.insert("status-saving", "Guardando archivo...");
        es.insert("saved-to", "Guardado en:");
        es.insert("error-invalid-url", "Ingrese una URL de YouTube válida");
        es.insert("alert-ok", "Aceptar");
        translations.insert("es-ES", es);

        Self {
            translations,
            current_lang: "en-US".to_string(),
        }
    }

    pub fn current_language(&self) -> &str {
        &self.current_lang
    }

    /// Current language first, then en-US.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        [self.current_lang.as_str(), "en-US"]
            .into_iter()
            .find_map(|lang| self.translations.get(lang)?.lookup(key))
    }

    /// Lookup with a literal fallback, the common case in the UI code.
    pub fn text(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or(fallback).to_string()
    }

    pub fn select_from(&mut self, requested: &[LanguageIdentifier]) {
        let found = requested.iter().find_map(|id| {
            let language = id.language.as_str();
            self.translations
                .keys()
                .find(|key| key.split('-').next() == Some(language))
                .copied()
        });
        self.current_lang = found.unwrap_or("en-US").to_string();
    }

    pub fn select(&mut self, lang: &str) {
        // Try exact match first
        if self.translations.contains_key(lang) {
            self.current_lang = lang.to_string();
            return;
        }

        match lang.parse::<LanguageIdentifier>() {
            Ok(id) => self.select_from(&[id]),
            Err(e) => {
                log::warn!("Ignoring unparsable language '{}': {}", lang, e);
                self.current_lang = "en-US".to_string();
            }
        }
    }
}
