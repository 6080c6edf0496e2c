use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::client::{Form, ResponseMetadata, SlackClient};
use crate::errors::{ApiFailure, ClassifiedError, ServiceResult};
use crate::pagination::{
    paginate, CursorPage, CursorPaging, CursorSource, PaginatedResult, PaginationRequest,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub name: String,
    pub title: String,
    pub mimetype: String,
    pub filetype: String,
    pub size: i64,
    pub user: String,
    pub created: i64,
    pub url_private: String,
    pub permalink: String,
}

impl File {
    /// Local file name for a download with no explicit destination: the last
    /// component of the remote name, or the file id when that is empty or `..`.
    pub fn local_name(&self) -> PathBuf {
        Path::new(&self.name).file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(&self.id))
    }
}

/// Optional narrowing for `files.list`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct UploadFileParams {
    pub channel_id: String,
    pub filename: String,
    pub title: Option<String>,
    pub content: Vec<u8>,
}

impl std::fmt::Debug for UploadFileParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFileParams")
            .field("channel_id", &self.channel_id)
            .field("filename", &self.filename)
            .field("title", &self.title)
            .field("content_len", &self.content.len())
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireFile {
    id: String,
    name: String,
    title: String,
    mimetype: String,
    filetype: String,
    size: i64,
    user: String,
    created: i64,
    url_private: String,
    url_private_download: String,
    permalink: String,
}

impl From<WireFile> for File {
    fn from(wire: WireFile) -> Self {
        let url_private =
            if wire.url_private_download.is_empty() { wire.url_private } else { wire.url_private_download };
        Self {
            id: wire.id,
            name: wire.name,
            title: wire.title,
            mimetype: wire.mimetype,
            filetype: wire.filetype,
            size: wire.size,
            user: wire.user,
            created: wire.created,
            url_private,
            permalink: wire.permalink,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<WireFile>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    file: WireFile,
}

#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    upload_url: String,
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct CompleteUploadResponse {
    #[serde(default)]
    files: Vec<WireFile>,
}

struct FilesList<'a> {
    client: &'a SlackClient,
    filter: &'a FileFilter,
}

#[async_trait]
impl CursorSource for FilesList<'_> {
    type Item = File;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32) -> ServiceResult<CursorPage<File>> {
        let form = Form::new()
            .with_optional("channel", self.filter.channel_id.as_deref())
            .with_optional("user", self.filter.user_id.as_deref())
            .with("limit", limit.to_string())
            .with_optional("cursor", Some(cursor));
        let response: ListResponse = self.client.call("files.list", &form).await?;
        Ok(CursorPage {
            items: response.files.into_iter().map(File::from).collect(),
            next_cursor: response.response_metadata.next_cursor,
            has_more: None,
        })
    }
}

pub(crate) async fn list(
    client: &SlackClient,
    filter: &FileFilter,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<File>> {
    paginate(&CursorPaging(FilesList { client, filter }), request).await
}

pub(crate) async fn info(client: &SlackClient, file_id: &str) -> ServiceResult<File> {
    let response: FileResponse = client.call("files.info", &Form::new().with("file", file_id)).await?;
    Ok(response.file.into())
}

/// External upload: reserve an upload URL, send the bytes, then share the
/// completed file into the channel.
pub(crate) async fn upload(client: &SlackClient, params: &UploadFileParams) -> ServiceResult<File> {
    let reserve = Form::new()
        .with("filename", params.filename.as_str())
        .with("length", params.content.len().to_string());
    let reserved: UploadUrlResponse = client.call("files.getUploadURLExternal", &reserve).await?;

    client.upload_bytes(&reserved.upload_url, &params.content).await?;

    let title = params.title.as_deref().filter(|title| !title.is_empty()).unwrap_or(&params.filename);
    let files = json!([{ "id": reserved.file_id, "title": title }]).to_string();
    let complete = Form::new().with("files", files).with("channel_id", params.channel_id.as_str());
    let completed: CompleteUploadResponse = client.call("files.completeUploadExternal", &complete).await?;

    info!(file_id = %reserved.file_id, channel = %params.channel_id, "uploaded file");
    let file = completed.files.into_iter().next().map(File::from).unwrap_or_default();
    Ok(File {
        id: if file.id.is_empty() { reserved.file_id } else { file.id },
        title: if file.title.is_empty() { title.to_owned() } else { file.title },
        ..file
    })
}

/// Writes the file at `url` to `dest`, returning the number of bytes written.
pub(crate) async fn download(client: &SlackClient, url: &str, dest: &Path) -> ServiceResult<u64> {
    if url.is_empty() {
        return Err(ClassifiedError::invalid_input("missing_download_url", "file has no private url"));
    }
    let bytes = client.fetch_private(url).await?;
    tokio::fs::write(dest, &bytes).await.map_err(|error| {
        ClassifiedError::from(ApiFailure::from(error)).with_detail(dest.display().to_string())
    })?;
    info!(bytes = bytes.len(), dest = %dest.display(), "downloaded file");
    Ok(bytes.len() as u64)
}

pub(crate) async fn delete(client: &SlackClient, file_id: &str) -> ServiceResult<()> {
    client.call_unit("files.delete", &Form::new().with("file", file_id)).await
}
