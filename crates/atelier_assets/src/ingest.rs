//! Ingestion from local files, in-memory buffers and remote URLs.

use crate::{AssetStore, TempFile};
use atelier_core::{BlobKey, Entity};
use atelier_error::{AssetError, AssetErrorKind, AtelierResult, HttpError};
use atelier_interface::HookEvent;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

impl AssetStore {
    /// Ingest the file at `path`.
    ///
    /// Fills the write-once fields (`ext` from `name` or the path, a fresh
    /// `hash`, a display `name`, the owning `transport`), records the size,
    /// pushes the bytes under the primary key and saves the record. The
    /// caller keeps ownership of `path`.
    ///
    /// Running it again on an ingested entity keeps `hash`, `ext`, `name` and
    /// `transport`, refreshes `size` and overwrites the primary blob.
    ///
    /// # Errors
    ///
    /// `NotFound` when `path` does not exist, in which case no transport or
    /// persistence call is made. Transport and repository failures propagate.
    #[tracing::instrument(skip(self, entity, path), fields(kind = %E::KIND, path = %path.display()))]
    pub async fn from_file<E: Entity>(
        &self,
        entity: &mut E,
        path: &Path,
        name: Option<&str>,
    ) -> AtelierResult<()> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                return Err(AssetError::new(AssetErrorKind::NotFound(format!(
                    "{} is not a file",
                    path.display()
                )))
                .into());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::new(AssetErrorKind::NotFound(path.display().to_string()))
                    .into());
            }
            Err(e) => return Err(AssetError::io(path.display(), e).into()),
        };

        let transport_name = self.registry().resolve_name(entity.asset().transport());
        let transport = self.registry().get(&transport_name)?;

        let ext_source = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let asset = entity.asset_mut();
        asset.ensure_ext(&ext_source);
        asset.ensure_hash();
        asset.set_name(name);
        asset.record_size(metadata.len());
        asset.ensure_transport(&transport_name);
        asset.ensure_created_at();

        self.hooks().before(HookEvent::FileCreate, entity.asset()).await?;

        let key = BlobKey::primary(entity.asset())?;
        transport.push(&key, path).await?;
        let id = self.save(entity).await?;

        self.hooks().after(HookEvent::FileCreate, entity.asset()).await?;

        tracing::info!(
            id = %id,
            key = %key,
            transport = %transport_name,
            size = metadata.len(),
            "Ingested asset"
        );
        Ok(())
    }

    /// Alias of [`from_file`](Self::from_file).
    pub async fn file<E: Entity>(&self, entity: &mut E, path: &Path, name: Option<&str>) -> AtelierResult<()> {
        self.from_file(entity, path, name).await
    }

    /// Ingest in-memory bytes under the display `name`.
    ///
    /// The bytes are staged in the scratch area and handed to
    /// [`from_file`](Self::from_file); the staged copy is removed whether or
    /// not ingestion succeeds.
    #[tracing::instrument(skip(self, entity, bytes), fields(kind = %E::KIND, size = bytes.len()))]
    pub async fn from_buffer<E: Entity>(
        &self,
        entity: &mut E,
        bytes: &[u8],
        name: &str,
    ) -> AtelierResult<()> {
        let asset = entity.asset_mut();
        asset.ensure_ext(name);
        let hash = asset.ensure_hash().to_string();

        self.scratch().ensure().await?;
        let staged = TempFile::new(self.scratch().incoming_path(&hash));
        tokio::fs::write(staged.path(), bytes)
            .await
            .map_err(|e| AssetError::io(staged.path().display(), e))?;

        self.from_file(entity, staged.path(), Some(name)).await
    }

    /// Alias of [`from_buffer`](Self::from_buffer).
    pub async fn buffer<E: Entity>(&self, entity: &mut E, bytes: &[u8], name: &str) -> AtelierResult<()> {
        self.from_buffer(entity, bytes, name).await
    }

    /// Download `link` and ingest it.
    ///
    /// The display name and extension come from the last path segment of the
    /// URL. The download is staged in the scratch area and removed afterwards.
    ///
    /// # Errors
    ///
    /// `HttpError` when the URL is invalid, unreachable or answers with a
    /// non-success status.
    #[tracing::instrument(skip(self, entity), fields(kind = %E::KIND))]
    pub async fn from_url<E: Entity>(&self, entity: &mut E, link: &str) -> AtelierResult<()> {
        let (staged, name) = self.stage_url(entity, link).await?;
        self.from_file(entity, staged.path(), name.as_deref()).await
    }

    /// Alias of [`from_url`](Self::from_url).
    pub async fn download<E: Entity>(&self, entity: &mut E, link: &str) -> AtelierResult<()> {
        self.from_url(entity, link).await
    }

    /// Fetch `link` into the scratch area.
    ///
    /// Assigns `ext` and `hash` on the entity and returns the staged file with
    /// the name taken from the URL path.
    pub(crate) async fn stage_url<E: Entity>(
        &self,
        entity: &mut E,
        link: &str,
    ) -> AtelierResult<(TempFile, Option<String>)> {
        let url = reqwest::Url::parse(link).map_err(|e| HttpError::new(format!("{}: {}", link, e)))?;
        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);

        let asset = entity.asset_mut();
        asset.ensure_ext(name.as_deref().unwrap_or_default());
        let hash = asset.ensure_hash().to_string();

        let response = self
            .http()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {}: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::new(format!("GET {} returned {}", url, status)).into());
        }

        self.scratch().ensure().await?;
        let staged = TempFile::new(self.scratch().incoming_path(&hash));
        let write_err = |e: std::io::Error| AssetError::io(staged.path().display(), e);
        let mut file = tokio::fs::File::create(staged.path()).await.map_err(write_err)?;
        let mut stream = response.bytes_stream();
        let mut size = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| HttpError::new(format!("GET {}: {}", url, e)))?;
            size += chunk.len();
            file.write_all(&chunk).await.map_err(write_err)?;
        }
        file.flush().await.map_err(write_err)?;

        tracing::debug!(url = %url, size, "Downloaded remote source");
        Ok((staged, name))
    }
}
