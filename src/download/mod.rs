mod helper;

pub use helper::{
    parse_content_disposition, sanitize_filename, save_bytes, DownloadError, DownloadHelper,
    DownloadedFile, FileListing,
};
