//! Uploaded post images under the media root.

use std::io;
use std::path::Path;

use uuid::Uuid;

/// Subdirectory of the media root holding post images.
pub const IMAGE_DIR: &str = "post_images";

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Lower-cased extension of an accepted image file name.
pub fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Copy an uploaded file into the media root under a fresh name and return
/// its path relative to the root.
pub async fn store_image(media_root: &Path, upload: &Path, extension: &str) -> io::Result<String> {
    let dir = media_root.join(IMAGE_DIR);
    tokio::fs::create_dir_all(&dir).await?;

    let name = format!("{}.{}", Uuid::new_v4().simple(), extension);
    tokio::fs::copy(upload, dir.join(&name)).await?;

    let relative = format!("{}/{}", IMAGE_DIR, name);
    tracing::debug!(image = %relative, "Stored post image");
    Ok(relative)
}

/// Best-effort removal of a replaced or orphaned image.
pub async fn remove_image(media_root: &Path, relative: &str) {
    if !relative.starts_with(IMAGE_DIR) || relative.contains("..") {
        return;
    }
    if let Err(e) = tokio::fs::remove_file(media_root.join(relative)).await {
        tracing::warn!(image = %relative, "Could not remove image: {}", e);
    }
}
