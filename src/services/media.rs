//! `/media/upload`: profile pictures and signatures

use tracing::info;

use crate::client::{ApiClient, ApiRequest, FilePart, Transport};
use crate::error::{ClientError, ClientResult};
use crate::forms::upload::validate_image;
use crate::model::UploadedMedia;
use crate::session::SessionStore;

/// Multipart field the backend reads the file from
pub const UPLOAD_FIELD: &str = "file";

/// Upload an image and return where it landed
pub async fn upload<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> ClientResult<UploadedMedia> {
    validate_image(content_type, bytes.len() as u64)?;

    let request = ApiRequest::post("/media/upload").file(FilePart {
        field: UPLOAD_FIELD.to_string(),
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        bytes,
    });

    let body: serde_json::Value = client.execute_raw(request).await.map_err(map_upload_error)?;
    let media = UploadedMedia::from_response(&body).ok_or_else(|| {
        ClientError::Decode("Invalid response format from upload service".to_string())
    })?;

    info!(url = %media.url, "Uploaded media");
    Ok(media)
}

fn map_upload_error(error: ClientError) -> ClientError {
    match error.status() {
        Some(413) => ClientError::Http {
            status: 413,
            message: "File size too large. Please upload a smaller file.".to_string(),
        },
        Some(415) => ClientError::Http {
            status: 415,
            message: "Invalid file type. Please upload a valid image file.".to_string(),
        },
        _ => match error {
            ClientError::Transport(_) => ClientError::Transport(
                "Network error occurred while uploading. Please check your connection."
                    .to_string(),
            ),
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::client::RequestBody;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn client() -> ApiClient<MockTransport, MemorySessionStore> {
        ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new())
    }

    #[tokio::test]
    async fn test_upload_sends_file_field() {
        let client = client();
        client
            .transport()
            .respond(200, json!({"success": true, "imageUrl": "https://cdn.test/p.png"}));

        let media = upload(&client, "p.png", "image/png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(media.url, "https://cdn.test/p.png");

        let sent = client.transport().requests();
        match &sent[0].body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.bytes.len(), 3);
            }
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_specific_messages() {
        let client = client();
        client.transport().respond(413, json!({"message": "too big"}));
        client.transport().respond(415, json!({}));

        let big = upload(&client, "a.png", "image/png", vec![0]).await.unwrap_err();
        assert_eq!(big.message(), "File size too large. Please upload a smaller file.");

        let kind = upload(&client, "a.png", "image/png", vec![0]).await.unwrap_err();
        assert_eq!(kind.message(), "Invalid file type. Please upload a valid image file.");
    }

    #[tokio::test]
    async fn test_rejects_non_image_before_sending() {
        let client = client();
        let err = upload(&client, "a.pdf", "application/pdf", vec![0]).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(client.transport().request_count(), 0);
    }
}
