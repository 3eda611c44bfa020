use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult};

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Strip any path components and replace shell-hostile characters, keeping
/// only the final file name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn allowed_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Store an uploaded image under `dir` and return its public path.
/// A taken file name is renamed `base_1.ext`, `base_2.ext`, ... instead of
/// overwriting the existing file.
pub async fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> AppResult<String> {
    let name = sanitize_file_name(original_name);
    if name.is_empty() || !allowed_file(&name) {
        return Err(AppError::Validation(
            "unsupported file type; expected png, jpg, jpeg or gif".to_string(),
        ));
    }
    let Some((base, ext)) = name.rsplit_once('.') else {
        return Err(AppError::Validation("file name has no extension".to_string()));
    };

    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut candidate = name.clone();
    let mut suffix = 1;
    while fs::try_exists(dir.join(&candidate))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    {
        candidate = format!("{base}_{suffix}.{ext}");
        suffix += 1;
    }

    fs::write(dir.join(&candidate), bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(format!("/uploads/{candidate}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_file_name("menú del día.png"), "men__del_d_a.png");
    }

    #[tokio::test]
    async fn collision_gets_a_numbered_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let first = store_upload(dir.path(), "pizza.png", b"a").await.unwrap();
        let second = store_upload(dir.path(), "pizza.png", b"b").await.unwrap();
        let third = store_upload(dir.path(), "pizza.png", b"c").await.unwrap();

        assert_eq!(first, "/uploads/pizza.png");
        assert_eq!(second, "/uploads/pizza_1.png");
        assert_eq!(third, "/uploads/pizza_2.png");
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_upload(dir.path(), "menu.pdf", b"x").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
