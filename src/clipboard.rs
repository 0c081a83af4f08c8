use crate::error::ConvertError;

pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String, ConvertError>;
}

/// The desktop clipboard. Opened per read since some platforms refuse
/// access while another app holds it.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ConvertError> {
        let mut clipboard = arboard::Clipboard::new()?;
        Ok(clipboard.get_text()?)
    }
}
