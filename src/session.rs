use std::collections::HashMap;

pub const CURRENT_FILE_ID: &str = "currentFileId";
pub const CURRENT_FILE_NAME: &str = "currentFileName";

/// Key-value store shared by the upload and preview views.
///
/// Lives as long as the application window; nothing is written to disk.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

/// What the last successful upload left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUpload {
    pub file_id: String,
    pub file_name: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remember_upload(&mut self, file_id: &str, file_name: &str) {
        self.set(CURRENT_FILE_ID, file_id);
        self.set(CURRENT_FILE_NAME, file_name);
    }

    /// `None` when no upload has completed, or the stored id is blank.
    pub fn current_upload(&self) -> Option<CurrentUpload> {
        let file_id = self.get(CURRENT_FILE_ID)?.trim();
        if file_id.is_empty() {
            return None;
        }

        Some(CurrentUpload {
            file_id: file_id.to_string(),
            file_name: self.get(CURRENT_FILE_NAME).map(str::to_string),
        })
    }
}
