// ABOUTME: Upload handling for optional per-frame image files
// ABOUTME: Sanitizes client filenames and stores files under the upload directory

use std::path::Path;

use crate::error::Result;

/// An uploaded file as pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Reduce a client-supplied filename to a safe basename: path components
/// are stripped and anything outside ASCII alphanumerics, dots, and dashes
/// becomes an underscore. Leading dots are dropped so the result can never
/// be hidden or traverse upward.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']).trim_end_matches('_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stored name for a frame upload, collision-resistant by construction
/// since (roll_id, frame_number) is unique.
pub fn stored_name(roll_id: i32, frame_number: i32, original_name: &str) -> String {
    format!(
        "{}_{}_{}",
        roll_id,
        frame_number,
        sanitize_filename(original_name)
    )
}

/// Write the upload to disk and return the stored filename to persist on
/// the frame row.
pub async fn store_upload(
    upload_dir: &Path,
    roll_id: i32,
    frame_number: i32,
    upload: &Upload,
) -> Result<String> {
    let name = stored_name(roll_id, frame_number, &upload.original_name);
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&name), &upload.bytes).await?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\scan.jpg"), "scan.jpg");
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("füjì scan.png"), "f_j__scan.png");
    }

    #[test]
    fn sanitize_never_returns_hidden_or_empty_names() {
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("///"), "upload");
    }

    #[test]
    fn stored_name_embeds_roll_and_frame() {
        assert_eq!(stored_name(3, 7, "scan.jpg"), "3_7_scan.jpg");
    }

    #[tokio::test]
    async fn store_upload_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload = Upload {
            original_name: "scan.jpg".to_string(),
            bytes: vec![1, 2, 3],
        };
        let name = store_upload(dir.path(), 1, 2, &upload).await.unwrap();
        assert_eq!(name, "1_2_scan.jpg");
        let written = tokio::fs::read(dir.path().join(&name)).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }
}
