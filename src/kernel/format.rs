use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTrigger;

/// The response shapes the backend can produce for the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured clinical-document markup (FHIR).
    Fhir,
    /// Human-readable pretty-print.
    Pretty,
    /// Flattened property listing.
    Property,
    /// Controlled-vocabulary mapping.
    Umls,
    /// Concept-identifier listing.
    Cui,
    /// Serialized object-graph exchange (XMI).
    Xmi,
}

/// How a sink may interpret a rendered body. Advisory only; the body is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Markup,
    PlainText,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Fhir,
        OutputFormat::Pretty,
        OutputFormat::Property,
        OutputFormat::Umls,
        OutputFormat::Cui,
        OutputFormat::Xmi,
    ];

    /// Value of the `format` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            OutputFormat::Fhir => "fhir",
            OutputFormat::Pretty => "pretty",
            OutputFormat::Property => "property",
            OutputFormat::Umls => "umls",
            OutputFormat::Cui => "cui",
            OutputFormat::Xmi => "xmi",
        }
    }

    pub fn descriptive_name(self) -> &'static str {
        match self {
            OutputFormat::Fhir => "clinical-document-markup",
            OutputFormat::Pretty => "pretty-text",
            OutputFormat::Property => "property-listing",
            OutputFormat::Umls => "controlled-vocabulary-mapping",
            OutputFormat::Cui => "concept-identifier-listing",
            OutputFormat::Xmi => "object-graph-exchange",
        }
    }

    pub fn content_kind(self) -> ContentKind {
        match self {
            OutputFormat::Fhir | OutputFormat::Xmi => ContentKind::Markup,
            _ => ContentKind::PlainText,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

/// Declarative trigger -> format table. A new format is a new row, not a new handler.
#[derive(Debug, Clone)]
pub struct TriggerTable {
    rows: BTreeMap<String, OutputFormat>,
}

impl TriggerTable {
    pub fn empty() -> Self {
        Self { rows: BTreeMap::new() }
    }

    /// Triggers are matched case-insensitively.
    pub fn register(&mut self, trigger: &str, format: OutputFormat) {
        self.rows.insert(trigger.trim().to_ascii_lowercase(), format);
    }

    pub fn resolve(&self, trigger: &str) -> Option<OutputFormat> {
        self.rows.get(&trigger.trim().to_ascii_lowercase()).copied()
    }

    /// Like `resolve`, but an unknown trigger reports every known one.
    pub fn lookup(&self, trigger: &str) -> Result<OutputFormat, UnknownTrigger> {
        self.resolve(trigger).ok_or_else(|| UnknownTrigger {
            trigger: trigger.to_string(),
            known: self.triggers().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

impl Default for TriggerTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for format in OutputFormat::ALL {
            table.register(format.query_value(), format);
            table.register(format.descriptive_name(), format);
        }
        table
    }
}
