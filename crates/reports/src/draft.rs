//! Report draft and its validation

use reqwest::multipart::{Form, Part};
use std::fmt;
use std::path::Path;

use crate::prompt::ReporterInfo;
use crate::ReportError;

pub const MISSING_TITLE: &str = "Please enter a title for your report.";
pub const MISSING_DESCRIPTION: &str = "Please enter a description of the issue.";
pub const MISSING_LOCATION: &str = "Please select a location for the report.";
pub const MISSING_OTHER_LOCATION: &str = "Please specify the location when \"Other\" is selected.";
pub const MISSING_PHOTO: &str = "Please attach a photo to support your report.";

/// Location choice that asks for a free-text address
pub const OTHER_LOCATION: &str = "Other";

/// Every report is filed with this priority
pub const DEFAULT_PRIORITY: &str = "medium";

/// Issue category offered by the report form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    RoadAndTraffic,
    WasteManagement,
    FloodingAndDrainage,
    PublicSafety,
    Utilities,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::RoadAndTraffic,
        Category::WasteManagement,
        Category::FloodingAndDrainage,
        Category::PublicSafety,
        Category::Utilities,
        Category::Other,
    ];

    /// Value sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RoadAndTraffic => "road-and-traffic",
            Category::WasteManagement => "waste-management",
            Category::FloodingAndDrainage => "flooding-and-drainage",
            Category::PublicSafety => "public-safety",
            Category::Utilities => "utilities",
            Category::Other => "other",
        }
    }

    /// Human-readable label, also used as the default title
    pub fn label(&self) -> &'static str {
        match self {
            Category::RoadAndTraffic => "Road and Traffic",
            Category::WasteManagement => "Waste Management",
            Category::FloodingAndDrainage => "Flooding and Drainage",
            Category::PublicSafety => "Public Safety",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, guessing the image type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());

        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => Some("image/jpeg"),
            Some("png") => Some("image/png"),
            Some("gif") => Some("image/gif"),
            Some("webp") => Some("image/webp"),
            Some("heic") => Some("image/heic"),
            _ => None,
        };

        Ok(Self {
            file_name,
            mime: mime.map(str::to_string),
            bytes,
        })
    }

    /// File name as shown on the upload button
    pub fn display_name(&self) -> String {
        if self.file_name.chars().count() > 20 {
            let short: String = self.file_name.chars().take(20).collect();
            format!("{}...", short)
        } else {
            self.file_name.clone()
        }
    }

    fn into_part(self) -> Result<Part, ReportError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|err| ReportError::Attachment(err.to_string())),
            None => Ok(part),
        }
    }
}

/// Contents of the report form
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    /// Selected location, or [`OTHER_LOCATION`]
    pub location: String,
    /// Free-text address used when the location is [`OTHER_LOCATION`]
    pub location_other: String,
    pub photo: Option<Attachment>,
}

impl ReportDraft {
    /// The title, falling back to the category label
    pub fn effective_title(&self) -> String {
        let title = self.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        match self.category {
            Some(category) if category != Category::Other => category.label().to_string(),
            _ => String::new(),
        }
    }

    /// Check the required fields in form order
    pub fn validate(&self) -> Result<ValidReport, ReportError> {
        let title = self.effective_title();
        if title.is_empty() {
            return Err(ReportError::invalid(MISSING_TITLE));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ReportError::invalid(MISSING_DESCRIPTION));
        }

        let location = self.location.trim();
        if location.is_empty() {
            return Err(ReportError::invalid(MISSING_LOCATION));
        }

        let address = if location == OTHER_LOCATION {
            let other = self.location_other.trim();
            if other.is_empty() {
                return Err(ReportError::invalid(MISSING_OTHER_LOCATION));
            }
            other
        } else {
            location
        };

        let photo = self
            .photo
            .clone()
            .ok_or_else(|| ReportError::invalid(MISSING_PHOTO))?;

        Ok(ValidReport {
            title,
            description: description.to_string(),
            category: self.category.unwrap_or(Category::Other),
            priority: DEFAULT_PRIORITY,
            address: address.to_string(),
            photo,
        })
    }
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReport {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: &'static str,
    pub address: String,
    pub photo: Attachment,
}

impl ValidReport {
    /// Multipart body for the reports endpoints
    pub fn into_form(self, reporter: &ReporterInfo) -> Result<Form, ReportError> {
        let mut form = Form::new()
            .text("title", self.title)
            .text("description", self.description)
            .text("category", self.category.as_str())
            .text("priority", self.priority)
            .text("address", self.address)
            .part("photo", self.photo.into_part()?);

        if let Some(name) = &reporter.name {
            form = form.text("reporterName", name.clone());
        }
        if let Some(email) = &reporter.email {
            form = form.text("reporterEmail", email.clone());
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ReportDraft {
        ReportDraft {
            title: String::new(),
            description: "Large pothole next to the bus stop".to_string(),
            category: Some(Category::RoadAndTraffic),
            location: "Main Street".to_string(),
            location_other: String::new(),
            photo: Some(Attachment::new("pothole.jpg", vec![0xff, 0xd8, 0xff])),
        }
    }

    fn rejection(draft: &ReportDraft) -> String {
        draft.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_title_derived_from_category() {
        let report = complete_draft().validate().unwrap();
        assert_eq!(report.title, "Road and Traffic");
        assert_eq!(report.category, Category::RoadAndTraffic);
        assert_eq!(report.priority, "medium");
        assert_eq!(report.address, "Main Street");
    }

    #[test]
    fn test_other_category_does_not_supply_title() {
        let mut draft = complete_draft();
        draft.category = Some(Category::Other);
        assert_eq!(rejection(&draft), MISSING_TITLE);

        draft.category = None;
        assert_eq!(rejection(&draft), MISSING_TITLE);

        draft.title = "Broken bench".to_string();
        assert_eq!(draft.validate().unwrap().category, Category::Other);
    }

    #[test]
    fn test_fields_checked_in_order() {
        let mut draft = complete_draft();
        draft.description = "  ".to_string();
        draft.location.clear();
        draft.photo = None;
        assert_eq!(rejection(&draft), MISSING_DESCRIPTION);

        draft.description = "Streetlight out".to_string();
        assert_eq!(rejection(&draft), MISSING_LOCATION);

        draft.location = "Park Avenue".to_string();
        assert_eq!(rejection(&draft), MISSING_PHOTO);
    }

    #[test]
    fn test_other_location_needs_free_text() {
        let mut draft = complete_draft();
        draft.location = OTHER_LOCATION.to_string();
        assert_eq!(rejection(&draft), MISSING_OTHER_LOCATION);

        draft.location_other = " 12 Dock Road ".to_string();
        assert_eq!(draft.validate().unwrap().address, "12 Dock Road");
    }

    #[test]
    fn test_category_round_trip_and_display_name() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("potholes"), None);

        let long = Attachment::new("IMG_20240101_123456_HDR.jpg", Vec::new());
        assert_eq!(long.display_name(), "IMG_20240101_123456_...");
        assert_eq!(Attachment::new("a.png", Vec::new()).display_name(), "a.png");
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flood.PNG");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.file_name, "flood.PNG");
        assert_eq!(attachment.mime.as_deref(), Some("image/png"));
        assert_eq!(attachment.bytes, b"\x89PNG".to_vec());
    }
}
