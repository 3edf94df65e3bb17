//! Google Drive backup store.
//!
//! The backup is one file in the hidden `appDataFolder` space, which the
//! `drive.appdata` scope restricts to this application.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{RemoteError, RemoteSnapshotStore};

pub const BACKUP_FILE_NAME: &str = "taxi-ledger-backup.json";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const APP_DATA_SPACE: &str = "appDataFolder";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
}

#[derive(Clone)]
pub struct DriveAppDataStore {
    client: Client,
    api_base: String,
    upload_base: String,
    file_name: String,
}

impl DriveAppDataStore {
    pub fn new(client: Client) -> Self {
        Self::with_base_urls(client, DRIVE_API_BASE, DRIVE_UPLOAD_BASE)
    }

    /// Point the store at another endpoint (a proxy or a local test server)
    pub fn with_base_urls(client: Client, api_base: &str, upload_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            file_name: BACKUP_FILE_NAME.to_string(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Drive search expression for the backup file
    pub fn search_query(file_name: &str) -> String {
        format!("name='{}' and trashed=false", file_name.replace('\'', "\\'"))
    }

    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RemoteError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn create_file(&self, token: &str) -> Result<String, RemoteError> {
        let metadata = json!({
            "name": self.file_name,
            "parents": [APP_DATA_SPACE],
            "mimeType": "application/json",
        });

        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .bearer_auth(token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await?;

        let created: FileEntry = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        info!("Created backup file {} ({})", self.file_name, created.id);
        Ok(created.id)
    }
}

#[async_trait]
impl RemoteSnapshotStore for DriveAppDataStore {
    async fn find_or_create(&self, token: &str) -> Result<String, RemoteError> {
        let query = Self::search_query(&self.file_name);
        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(token)
            .query(&[
                ("spaces", APP_DATA_SPACE),
                ("q", query.as_str()),
                ("fields", "files(id,name,modifiedTime)"),
            ])
            .send()
            .await?;

        let list: FileList = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        match list.files.into_iter().next() {
            Some(file) => {
                debug!("Found backup file {}", file.id);
                Ok(file.id)
            }
            None => self.create_file(token).await,
        }
    }

    async fn download(&self, token: &str, file_id: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .send()
            .await?;

        let body = Self::check(response).await?.text().await?;
        debug!("Downloaded {} bytes of backup", body.len());
        Ok(body)
    }

    async fn upload(&self, token: &str, file_id: &str, body: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .patch(format!("{}/files/{}", self.upload_base, file_id))
            .bearer_auth(token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body.to_string())
            .send()
            .await?;

        Self::check(response).await?;
        debug!("Uploaded {} bytes of backup", body.len());
        Ok(())
    }
}
