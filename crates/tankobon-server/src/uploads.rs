//! Dispatches stored files either to the local filesystem or to the
//! configured CDN, decided once at startup from configuration

use std::path::PathBuf;

use actix_web::http::StatusCode;
use anyhow::{anyhow, Context as _};
use secrecy::{ExposeSecret as _, SecretString};
use tankobon_shared::{
    errors::message_response, id::DbId, req_args::api::uploads::UploadCategory,
};

use crate::configuration::{UploadMethod, UploadSettings};

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("unsupported media type {mime:?} for category {category}")]
    UnsupportedMediaType {
        category: UploadCategory,
        mime: String,
    },
    #[error("a Content-Type header is required")]
    MissingContentType,
    #[error("no stored file for category {category} with id {id}")]
    NotFound { category: UploadCategory, id: DbId },
    #[error("Unexpected Error")]
    Unexpected(#[from] anyhow::Error),
}

impl actix_web::error::ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::UnsupportedMediaType { .. } | UploadError::MissingContentType => {
                StatusCode::BAD_REQUEST
            }
            UploadError::NotFound { .. } => StatusCode::NOT_FOUND,
            UploadError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        match self {
            UploadError::Unexpected(e) => {
                tracing::error!(err = ?e, "upload failed");
                message_response(self.status_code(), "internal error")
            }
            other => message_response(self.status_code(), &other.to_string()),
        }
    }
}

pub enum UploadStorage {
    Local {
        root: PathBuf,
    },
    Cdn {
        client: reqwest::Client,
        base_url: String,
        api_key: SecretString,
    },
}

impl UploadStorage {
    pub fn from_settings(settings: &UploadSettings) -> anyhow::Result<Self> {
        match settings.method {
            UploadMethod::Server => Ok(Self::Local {
                root: settings.local_root.clone(),
            }),
            UploadMethod::Cdn => Ok(Self::Cdn {
                client: reqwest::Client::new(),
                base_url: settings
                    .cdn_base_url
                    .clone()
                    .context("upload.cdn_base_url is required when upload.method is cdn")?,
                api_key: settings
                    .cdn_api_key
                    .clone()
                    .context("upload.cdn_api_key is required when upload.method is cdn")?,
            }),
        }
    }

    /// Stores the file and returns its location (a path relative to the
    /// upload root, or the CDN URL)
    pub async fn store(
        &self,
        category: UploadCategory,
        id: DbId,
        mime: &str,
        body: &[u8],
    ) -> Result<String, UploadError> {
        if !allowed_mime(category, mime) {
            return Err(UploadError::UnsupportedMediaType {
                category,
                mime: mime.to_string(),
            });
        }
        match self {
            UploadStorage::Local { root } => {
                let dir = root.join(category.as_str());
                tokio::fs::create_dir_all(&dir)
                    .await
                    .context("failed to create upload directory")?;
                tokio::fs::write(dir.join(id.to_string()), body)
                    .await
                    .context("failed to write upload")?;
                Ok(relative_location(category, id))
            }
            UploadStorage::Cdn {
                client,
                base_url,
                api_key,
            } => {
                let url = cdn_url(base_url, category, id);
                let response = client
                    .put(&url)
                    .bearer_auth(api_key.expose_secret())
                    .header(reqwest::header::CONTENT_TYPE, mime)
                    .body(body.to_vec())
                    .send()
                    .await
                    .context("failed to send upload to CDN")?;
                if !response.status().is_success() {
                    return Err(anyhow!("CDN rejected upload with status {}", response.status()).into());
                }
                Ok(url)
            }
        }
    }

    pub async fn delete(&self, category: UploadCategory, id: DbId) -> Result<(), UploadError> {
        match self {
            UploadStorage::Local { root } => {
                let path = root.join(category.as_str()).join(id.to_string());
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Err(UploadError::NotFound { category, id })
                    }
                    Err(e) => Err(anyhow::Error::from(e)
                        .context("failed to delete upload")
                        .into()),
                }
            }
            UploadStorage::Cdn {
                client,
                base_url,
                api_key,
            } => {
                let url = cdn_url(base_url, category, id);
                let response = client
                    .delete(&url)
                    .bearer_auth(api_key.expose_secret())
                    .send()
                    .await
                    .context("failed to send delete to CDN")?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(UploadError::NotFound { category, id });
                }
                if !response.status().is_success() {
                    return Err(anyhow!(
                        "CDN rejected delete with status {}",
                        response.status()
                    )
                    .into());
                }
                Ok(())
            }
        }
    }
}

fn allowed_mime(category: UploadCategory, mime: &str) -> bool {
    const IMAGES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
    match category {
        UploadCategory::Chapter | UploadCategory::Content => IMAGES.contains(&mime),
        UploadCategory::Generic => {
            IMAGES.contains(&mime) || mime == "application/pdf" || mime == "application/zip"
        }
    }
}

/// Both stores and deletes derive the location from category and id alone so
/// a delete needs no record of the original upload
fn relative_location(category: UploadCategory, id: DbId) -> String {
    format!("{category}/{id}")
}

fn cdn_url(base_url: &str, category: UploadCategory, id: DbId) -> String {
    format!(
        "{}/files/{category}/{id}",
        base_url.trim_end_matches('/')
    )
}
