use std::path::{Component, Path, PathBuf};

use actix_web::{web, HttpResponse};
use tokio::fs;

use crate::{api_errors::ApiError, AppState};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "svg"];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Rejects anything but plain relative segments.
fn safe_relative(filename: &str) -> Option<&Path> {
    let path = Path::new(filename);
    let plain = !filename.is_empty()
        && !filename.contains('\\')
        && path.components().all(|c| matches!(c, Component::Normal(_)));
    plain.then_some(path)
}

/// Maps a root-level asset request onto the static tree by extension:
/// css → `css/`, js → `js/`, images → `img/`, everything else → the root.
pub fn resolve_asset(static_dir: &Path, filename: &str) -> Option<PathBuf> {
    let relative = safe_relative(filename)?;
    let subdir = match extension(relative).as_deref() {
        Some("css") => Some("css"),
        Some("js") => Some("js"),
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => Some("img"),
        _ => None,
    };

    let base = match subdir {
        Some(dir) => static_dir.join(dir),
        None => static_dir.to_path_buf(),
    };
    Some(base.join(relative))
}

/// Requests served from the static tree: anything under `/static/`, or a
/// root-level css, js or image file.
pub fn is_asset_path(path: &str) -> bool {
    if path.starts_with("/static/") {
        return true;
    }
    matches!(
        extension(Path::new(path)).as_deref(),
        Some(ext) if ext == "css" || ext == "js" || IMAGE_EXTENSIONS.contains(&ext)
    )
}

pub fn content_type_for(path: &Path) -> String {
    match extension(path).as_deref() {
        Some("css") => "text/css".to_string(),
        Some("js") => "application/javascript".to_string(),
        _ => mime_guess::from_path(path).first_or_octet_stream().to_string(),
    }
}

async fn serve(path: PathBuf, requested: &str) -> Result<HttpResponse, ApiError> {
    match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(ApiError::NotFound(requested.to_string())),
    }

    let bytes = fs::read(&path).await?;
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&path))
        .body(bytes))
}

/// `GET /<filename>`: css, js and images by extension.
pub async fn static_file(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filename = filename.into_inner();
    match resolve_asset(&state.config.static_dir, &filename) {
        Some(path) => serve(path, &filename).await,
        None => Err(ApiError::NotFound(filename)),
    }
}

/// `GET /static/<path>`: files under the static directory as-is.
pub async fn static_dir_file(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let path = path.into_inner();
    let resolved = safe_relative(&path).map(|relative| state.config.static_dir.join(relative));
    match resolved {
        Some(file) => serve(file, &path).await,
        None => Err(ApiError::NotFound(path)),
    }
}
