//! Detail presenter: one application's full record and its CV.

use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Serialize;

use crate::config::MarkThresholds;
use crate::entity::{Application, FinalYearModule};
use crate::error::{AdmissionsError, Result};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const PREVIEW_DIR: &str = "admissions-cv-preview";
const FALLBACK_FILE_NAME: &str = "cv.pdf";

/// Decodes the way a browser's `atob` does: padding optional, stray trailing
/// bits ignored.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Colour tier for a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkTier {
    Good,
    Borderline,
    Low,
}

impl std::fmt::Display for MarkTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkTier::Good => write!(f, "good"),
            MarkTier::Borderline => write!(f, "borderline"),
            MarkTier::Low => write!(f, "low"),
        }
    }
}

impl MarkThresholds {
    pub fn classify(&self, mark: f64) -> MarkTier {
        if mark >= self.good {
            MarkTier::Good
        } else if mark >= self.borderline {
            MarkTier::Borderline
        } else {
            MarkTier::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleLine<'a> {
    #[serde(flatten)]
    pub module: &'a FinalYearModule,
    pub tier: MarkTier,
}

/// Everything the detail view shows for one application.
#[derive(Debug, Clone, Serialize)]
pub struct DetailView<'a> {
    pub application: &'a Application,
    pub average_tier: MarkTier,
    pub modules: Vec<ModuleLine<'a>>,
}

impl<'a> DetailView<'a> {
    pub fn new(application: &'a Application, thresholds: &MarkThresholds) -> Self {
        let modules = application
            .final_year_modules
            .iter()
            .map(|module| ModuleLine {
                module,
                tier: thresholds.classify(module.mark),
            })
            .collect();

        Self {
            application,
            average_tier: thresholds.classify(application.average_mark),
            modules,
        }
    }
}

/// A decoded CV, ready to be saved or previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvDocument {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Decode an application's base64 CV payload.
///
/// Malformed payloads yield [`AdmissionsError::CvDecode`]; callers log and
/// report it and keep the detail view open.
pub fn decode_cv(application: &Application) -> Result<CvDocument> {
    let compact: String = application
        .cv_file
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = FORGIVING
        .decode(compact.as_bytes())
        .map_err(|source| AdmissionsError::CvDecode {
            file_name: application.cv_file_name.clone(),
            source,
        })?;

    if !bytes.starts_with(b"%PDF") {
        tracing::warn!(
            id = %application.id,
            file = %application.cv_file_name,
            "CV payload does not look like a PDF"
        );
    }

    Ok(CvDocument {
        file_name: application.cv_file_name.clone(),
        media_type: PDF_MEDIA_TYPE,
        bytes,
    })
}

impl CvDocument {
    /// File name with any directory components stripped.
    pub fn safe_file_name(&self) -> String {
        Path::new(&self.file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string()
    }

    /// Write the document into `dir` under its stored file name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.safe_file_name());
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "CV saved");
        Ok(path)
    }

    /// Write the document to the preview directory and return its path.
    pub fn preview(&self) -> Result<PathBuf> {
        self.save_to(&preview_dir())
    }
}

pub fn preview_dir() -> PathBuf {
    std::env::temp_dir().join(PREVIEW_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_default_tiers() {
        let marks = MarkThresholds::default();
        assert_eq!(marks.classify(80.0), MarkTier::Good);
        assert_eq!(marks.classify(92.5), MarkTier::Good);
        assert_eq!(marks.classify(79.9), MarkTier::Borderline);
        assert_eq!(marks.classify(70.0), MarkTier::Borderline);
        assert_eq!(marks.classify(69.99), MarkTier::Low);
        assert_eq!(marks.classify(0.0), MarkTier::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let marks = MarkThresholds {
            good: 90.0,
            borderline: 50.0,
        };
        assert_eq!(marks.classify(85.0), MarkTier::Borderline);
        assert_eq!(marks.classify(49.0), MarkTier::Low);
    }

    #[test]
    fn test_detail_view_tiers() {
        let apps = fixture::applications().unwrap();
        let david = &apps[5];
        let view = DetailView::new(david, &MarkThresholds::default());
        assert_eq!(view.average_tier, MarkTier::Borderline);
        let tiers: Vec<MarkTier> = view.modules.iter().map(|m| m.tier).collect();
        assert_eq!(
            tiers,
            [
                MarkTier::Borderline,
                MarkTier::Borderline,
                MarkTier::Low,
                MarkTier::Borderline
            ]
        );
    }

    #[test]
    fn test_fixture_cv_decodes_to_pdf() {
        let app = fixture::applications().unwrap().remove(0);
        let doc = decode_cv(&app).unwrap();
        assert!(doc.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(doc.media_type, "application/pdf");
        assert_eq!(doc.file_name, "sarah_johnson_cv.pdf");
    }

    #[test]
    fn test_padded_and_wrapped_payloads_decode() {
        let mut app = fixture::applications().unwrap().remove(0);
        app.cv_file = "JVBE\nRi0x\r\nLjQ=".to_string();
        assert_eq!(decode_cv(&app).unwrap().bytes, b"%PDF-1.4");
    }

    #[test]
    fn test_malformed_cv_is_decode_error() {
        let mut app = fixture::applications().unwrap().remove(0);
        app.cv_file = "not*valid*base64!".to_string();
        let err = decode_cv(&app).unwrap_err();
        assert!(matches!(err, AdmissionsError::CvDecode { ref file_name, .. } if file_name == "sarah_johnson_cv.pdf"));

        // A single dangling character cannot encode a byte.
        app.cv_file = "JVBER".to_string();
        assert!(decode_cv(&app).is_err());
    }

    #[test]
    fn test_save_to_strips_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let doc = CvDocument {
            file_name: "../../etc/evil.pdf".to_string(),
            media_type: PDF_MEDIA_TYPE,
            bytes: b"%PDF-1.4".to_vec(),
        };
        let path = doc.save_to(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("evil.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_empty_file_name_falls_back() {
        let doc = CvDocument {
            file_name: String::new(),
            media_type: PDF_MEDIA_TYPE,
            bytes: Vec::new(),
        };
        assert_eq!(doc.safe_file_name(), "cv.pdf");
    }
}
