mod clipboard;
mod controller;

pub use clipboard::{ClipboardSink, EguiClipboard};
pub use controller::{PreviewController, PreviewState, NO_FILE_MESSAGE};
