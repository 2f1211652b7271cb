use clap::ValueEnum;
use lattice_config::ReportFormat;

/// Report format on stdout
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Format {
    /// Human-readable lines
    #[value(name = "text")]
    Text,

    /// A single JSON document
    #[value(name = "json")]
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ReportFormat::Text,
            Format::Json => ReportFormat::Json,
        }
    }
}
