use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// XyzFile – one selected trajectory frame
// ---------------------------------------------------------------------------

/// Where the bytes of a selected file live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// On disk (native drag & drop, file dialog).
    Path(PathBuf),
    /// Already in memory (drops that only carry bytes).
    Bytes(Arc<[u8]>),
}

/// A `.xyz` file chosen by the user, not yet read.
#[derive(Debug, Clone)]
pub struct XyzFile {
    /// File name as shown to the user and sent to the API.
    pub name: String,
    pub source: FileSource,
}

impl XyzFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        XyzFile {
            name,
            source: FileSource::Path(path),
        }
    }

    /// Read the whole file into memory.
    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => std::fs::read(path),
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl fmt::Display for XyzFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// API response records
// ---------------------------------------------------------------------------

/// One projected frame. `label` is the originating filename.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PcaPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Successful response of the PCA service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PcaResponse {
    pub points: Vec<PcaPoint>,
    pub explained_variance_ratio_all: Vec<f64>,
    pub cumulative_variance_ratio_all: Vec<f64>,
}

/// Body of a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl PcaResponse {
    /// Check the arrays the charts index into are populated.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("response contains no points".into());
        }
        if self.explained_variance_ratio_all.is_empty() {
            return Err("response contains no explained variance ratios".into());
        }
        if self.cumulative_variance_ratio_all.is_empty() {
            return Err("response contains no cumulative variance ratios".into());
        }
        Ok(())
    }

    /// Number of principal components returned.
    pub fn n_components(&self) -> usize {
        self.explained_variance_ratio_all.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_payload() {
        let json = r#"{
            "points": [{"x": 1.5, "y": -0.25, "label": "frame_10.xyz"}],
            "explained_variance_ratio_all": [0.7, 0.2, 0.1],
            "cumulative_variance_ratio_all": [0.7, 0.9, 1.0]
        }"#;
        let resp: PcaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.points[0].label, "frame_10.xyz");
        assert_eq!(resp.n_components(), 3);
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn empty_points_fail_validation() {
        let resp = PcaResponse {
            points: vec![],
            explained_variance_ratio_all: vec![1.0],
            cumulative_variance_ratio_all: vec![1.0],
        };
        assert!(resp.validate().unwrap_err().contains("no points"));
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"bad frame"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("bad frame"));
    }

    #[test]
    fn name_from_path_is_file_name() {
        let f = XyzFile::from_path(PathBuf::from("/tmp/run/step_5.xyz"));
        assert_eq!(f.name, "step_5.xyz");
    }
}
