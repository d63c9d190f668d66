use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;

use super::model::{ApiErrorBody, PcaResponse, XyzFile};
use crate::config::AppConfig;

/// Multipart field carrying each trajectory file.
pub const UPLOAD_FIELD: &str = "xyz_files";

const GENERIC_API_ERROR: &str = "API request failed";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no .xyz files selected")]
    NoFiles,
    #[error("reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("could not decode PCA response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid PCA response: {0}")]
    InvalidResponse(String),
    #[error("the upload worker stopped unexpectedly")]
    WorkerStopped,
}

impl UploadError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Api { status, .. } => Some(*status),
            UploadError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PcaClient – blocking upload to the PCA service
// ---------------------------------------------------------------------------

pub struct PcaClient {
    http: reqwest::blocking::Client,
    api_url: String,
}

impl PcaClient {
    pub fn new(config: &AppConfig) -> Result<Self, UploadError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(PcaClient {
            http,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Upload `files` and return the service's projection.
    pub fn analyze(&self, files: &[XyzFile]) -> Result<PcaResponse, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        let form = build_form(files)?;

        log::info!("Uploading {} file(s) to {}", files.len(), self.api_url);
        let response = self.http.post(&self.api_url).multipart(form).send()?;
        let status = response.status();
        let body = response.text()?;
        log::debug!("PCA service answered {status} with {} bytes", body.len());

        decode_response(status, &body)
    }
}

fn build_form(files: &[XyzFile]) -> Result<Form, UploadError> {
    files.iter().try_fold(Form::new(), |form, file| {
        let bytes = file.read_bytes().map_err(|source| UploadError::Io {
            name: file.name.clone(),
            source,
        })?;
        let part = Part::bytes(bytes).file_name(file.name.clone());
        Ok(form.part(UPLOAD_FIELD, part))
    })
}

/// Turn an HTTP status and body into a validated response or an error.
pub fn decode_response(status: StatusCode, body: &str) -> Result<PcaResponse, UploadError> {
    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(ApiErrorBody { error: Some(msg) }) => msg,
            Ok(_) => GENERIC_API_ERROR.to_string(),
            Err(_) => format!("{GENERIC_API_ERROR} (HTTP {})", status.as_u16()),
        };
        return Err(UploadError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: PcaResponse = serde_json::from_str(body)?;
    response.validate().map_err(UploadError::InvalidResponse)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;
    use crate::data::model::FileSource;
    use crate::test_support::{OK_BODY, serve_once};

    fn client_for(url: String) -> PcaClient {
        let config = AppConfig {
            api_url: url,
            timestep_size_fs: 1.0,
            request_timeout: Duration::from_secs(10),
        };
        PcaClient::new(&config).unwrap()
    }

    fn frame(name: &str, contents: &'static [u8]) -> XyzFile {
        XyzFile {
            name: name.to_string(),
            source: FileSource::Bytes(contents.into()),
        }
    }

    #[test]
    fn uploads_every_file_under_one_field() {
        let (url, rx) = serve_once(200, OK_BODY);
        let client = client_for(url);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_2.xyz");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"1\nsecond\nH 1.0 0.0 0.0\n").unwrap();

        let files = vec![
            frame("frame_1.xyz", b"1\nfirst\nH 0.0 0.0 0.0\n"),
            XyzFile::from_path(path),
        ];
        let resp = client.analyze(&files).unwrap();
        assert_eq!(resp.points.len(), 2);
        assert_eq!(resp.points[1].label, "frame_2.xyz");

        let sent = String::from_utf8_lossy(&rx.recv().unwrap()).into_owned();
        assert_eq!(sent.matches(r#"name="xyz_files""#).count(), 2);
        assert!(sent.contains(r#"filename="frame_1.xyz""#));
        assert!(sent.contains(r#"filename="frame_2.xyz""#));
        assert!(sent.contains("H 1.0 0.0 0.0"));
    }

    #[test]
    fn surfaces_server_error_message() {
        let (url, _rx) = serve_once(422, r#"{"error": "Need at least 2 files"}"#);
        let err = client_for(url)
            .analyze(&[frame("a_1.xyz", b"")])
            .unwrap_err();
        match err {
            UploadError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Need at least 2 files");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_selection_is_rejected_before_sending() {
        let client = client_for("http://127.0.0.1:9/".into());
        assert!(matches!(client.analyze(&[]), Err(UploadError::NoFiles)));
    }

    #[test]
    fn missing_file_reports_its_name() {
        let client = client_for("http://127.0.0.1:9/".into());
        let gone = XyzFile::from_path("/definitely/not/here/frame_1.xyz".into());
        let err = client.analyze(&[gone]).unwrap_err();
        assert!(err.to_string().starts_with("reading frame_1.xyz"));
    }

    #[test]
    fn generic_message_without_error_field() {
        let err = decode_response(StatusCode::INTERNAL_SERVER_ERROR, "{}").unwrap_err();
        assert_eq!(err.to_string(), GENERIC_API_ERROR);

        let err = decode_response(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "API request failed (HTTP 502)");
    }

    #[test]
    fn success_bodies_are_validated() {
        assert!(decode_response(StatusCode::OK, OK_BODY).is_ok());
        assert!(matches!(
            decode_response(StatusCode::OK, "not json"),
            Err(UploadError::Decode(_))
        ));
        let empty = r#"{"points": [], "explained_variance_ratio_all": [1.0],
                        "cumulative_variance_ratio_all": [1.0]}"#;
        assert!(matches!(
            decode_response(StatusCode::OK, empty),
            Err(UploadError::InvalidResponse(_))
        ));
    }
}
