use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use bytes::Bytes;

use crate::error::ConvertError;
use crate::models::{ConversionRequest, ConversionResult};

pub type ConversionOutcome = Result<ConversionResult, ConvertError>;

/// The server that actually fetches and transcodes media.
pub trait ConversionBackend: Send + Sync {
    fn convert(&self, request: &ConversionRequest) -> ConversionOutcome;

    /// `path` is the `/file/...` target bound after a successful conversion.
    fn fetch_file(&self, path: &str) -> Result<Bytes, ConvertError>;
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ConversionBackend for HttpBackend {
    fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
        // Errors come back as `{error}` with a 4xx/5xx status, so the body is
        // decoded regardless of status.
        let response = self
            .client
            .post(self.endpoint("/download"))
            .json(request)
            .send()?;
        log::debug!("POST /download -> {}", response.status());
        Ok(response.json::<ConversionResult>()?)
    }

    fn fetch_file(&self, path: &str) -> Result<Bytes, ConvertError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?)
    }
}

pub fn dispatch_conversion(
    backend: Arc<dyn ConversionBackend>,
    request: ConversionRequest,
    tx: Sender<ConversionOutcome>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let outcome = backend.convert(&request);
        if tx.send(outcome).is_err() {
            log::warn!("Conversion finished after the window closed");
        }
    })
}

pub fn dispatch_file_download(
    backend: Arc<dyn ConversionBackend>,
    path: String,
    filename: String,
    dir: PathBuf,
    tx: Sender<Result<PathBuf, ConvertError>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let saved = backend
            .fetch_file(&path)
            .and_then(|bytes| save_download(&dir, &filename, &bytes));
        if tx.send(saved).is_err() {
            log::warn!("File download finished after the window closed");
        }
    })
}

/// Writes into `dir`, keeping only the last component of `filename`.
pub fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ConvertError> {
    let name = Path::new(filename)
        .file_name()
        .ok_or(ConvertError::Malformed("filename"))?;

    fs::create_dir_all(dir)?;
    let target = dir.join(name);
    fs::write(&target, bytes)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Answers exactly one HTTP request with the given status and body.
    fn serve_once(status: &'static str, content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}", addr)
    }

    fn sample_request() -> ConversionRequest {
        ConversionRequest::audio(
            "https://youtu.be/abc",
            crate::models::AudioBitrate::Kbps192,
            crate::models::AudioFormat::Mp3,
        )
    }

    struct EchoBackend;

    impl ConversionBackend for EchoBackend {
        fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
            Ok(ConversionResult {
                success: true,
                filename: Some(format!("{}.{}", request.quality, request.format)),
                ..Default::default()
            })
        }

        fn fetch_file(&self, path: &str) -> Result<Bytes, ConvertError> {
            Ok(Bytes::from(path.to_string()))
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.endpoint("/download"), "http://localhost:5000/download");
    }

    #[test]
    fn test_dispatch_sends_outcome() {
        let (tx, rx) = mpsc::channel();
        let request = ConversionRequest::video("youtu.be/x", crate::models::VideoHeight::P480);
        dispatch_conversion(Arc::new(EchoBackend), request, tx)
            .join()
            .unwrap();

        let result = rx.recv().unwrap().unwrap();
        assert_eq!(result.filename.as_deref(), Some("480.mp4"));
    }

    #[test]
    fn test_file_download_is_saved() {
        let dir = std::env::temp_dir().join(format!("media-convert-gui-{}", std::process::id()));
        let (tx, rx) = mpsc::channel();
        dispatch_file_download(
            Arc::new(EchoBackend),
            "/file/song.mp3".to_string(),
            "song.mp3".to_string(),
            dir.clone(),
            tx,
        )
        .join()
        .unwrap();

        let saved = rx.recv().unwrap().unwrap();
        assert_eq!(saved, dir.join("song.mp3"));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "/file/song.mp3");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_strips_directories() {
        let dir = std::env::temp_dir().join(format!("media-convert-gui-strip-{}", std::process::id()));
        let saved = save_download(&dir, "../../etc/passwd", b"x").unwrap();
        assert_eq!(saved, dir.join("passwd"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            save_download(&dir, "..", b"x"),
            Err(ConvertError::Malformed("filename"))
        ));
    }

    #[test]
    fn test_error_status_body_is_still_decoded() {
        let base = serve_once(
            "500 Internal Server Error",
            "application/json",
            r#"{"error": "FFmpeg not found"}"#,
        );
        let result = HttpBackend::new(&base).convert(&sample_request()).unwrap();

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("FFmpeg not found"));
    }

    #[test]
    fn test_float_size_over_http() {
        let base = serve_once(
            "200 OK",
            "application/json",
            r#"{"success":true,"filename":"a.mp3","quality":"q","size":5242880.0}"#,
        );
        let result = HttpBackend::new(&base).convert(&sample_request()).unwrap();

        assert!(result.success);
        assert_eq!(result.size, Some(5_242_880.0));
    }

    #[test]
    fn test_non_json_body_is_transport_error() {
        let base = serve_once("502 Bad Gateway", "text/html", "<html>bad gateway</html>");
        let outcome = HttpBackend::new(&base).convert(&sample_request());

        assert!(matches!(outcome, Err(ConvertError::Transport(_))));
    }
}
