use crate::mirror::{join_path, parent_path, RemoteEntry, NATIVE_MIME_PREFIX};

/// Portable format a native document is exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

const EXPORT_FORMATS: [(&str, ExportFormat); 4] = [
    (
        "application/vnd.google-apps.document",
        ExportFormat {
            mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            extension: ".docx",
        },
    ),
    (
        "application/vnd.google-apps.spreadsheet",
        ExportFormat {
            mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            extension: ".xlsx",
        },
    ),
    (
        "application/vnd.google-apps.presentation",
        ExportFormat {
            mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            extension: ".pptx",
        },
    ),
    (
        "application/vnd.google-apps.drawing",
        ExportFormat {
            mime_type: "image/png",
            extension: ".png",
        },
    ),
];

pub fn export_format_for(mime_type: &str) -> Option<ExportFormat> {
    EXPORT_FORMATS
        .iter()
        .find(|(native, _)| *native == mime_type)
        .map(|(_, format)| *format)
}

/// How the bytes of a source file are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPlan {
    Export(ExportFormat),
    Download,
    /// Native type with no export mapping (forms, sites, maps, ...).
    Unsupported,
}

impl TransferPlan {
    pub fn for_mime_type(mime_type: &str) -> Self {
        if let Some(format) = export_format_for(mime_type) {
            TransferPlan::Export(format)
        } else if mime_type.starts_with(NATIVE_MIME_PREFIX) {
            TransferPlan::Unsupported
        } else {
            TransferPlan::Download
        }
    }
}

/// Name the copy of `entry` gets in the destination; exports carry the
/// extension of their target format.
pub fn destination_name(entry: &RemoteEntry) -> String {
    match export_format_for(&entry.mime_type) {
        Some(format) => format!("{}{}", entry.name, format.extension),
        None => entry.name.clone(),
    }
}

/// Destination index key of the copy of `entry`.
pub fn destination_path(entry: &RemoteEntry) -> String {
    join_path(parent_path(&entry.path), &destination_name(entry))
}
