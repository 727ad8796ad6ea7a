use crate::prelude::*;

/// Where a cross-referenced field points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrossRef {
    /// `type` of the records the field refers to.
    pub resource_type: String,
    /// Field holding the referenced ids on the searched records.
    pub id_field: String,
}

impl CrossRef {
    pub fn new(resource_type: impl Into<String>, id_field: impl Into<String>) -> CrossRef {
        CrossRef {
            resource_type: resource_type.into(),
            id_field: id_field.into(),
        }
    }
}

/// Searchable fields and cross-reference table.
///
/// Built once at start-up and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Schema {
    pub fields: BTreeSet<String>,
    pub xrefs: HashMap<String, CrossRef>,
}

const CANTUS_FIELDS: &[&str] = &[
    "id", "name", "description", "mass_or_office", "date", "feast_code", "incipit", "source",
    "marginalia", "folio", "sequence", "office", "genre", "position", "cantus_id", "feast",
    "mode", "differentia", "finalis", "full_text", "full_text_manuscript", "proofread_fulltext",
    "volpiano", "notes", "cao_concordances", "siglum", "proofreader", "melody_id", "title",
    "rism", "provenance", "century", "notation_style", "editors", "indexers", "summary",
    "liturgical_occasion", "indexing_notes", "indexing_date", "display_name", "given_name",
    "family_name", "institution", "city", "country", "type", "proofread_fulltext_manuscript",
];

const CANTUS_XREFS: &[(&str, &str, &str)] = &[
    ("feast", "feast", "feast_id"),
    ("genre", "genre", "genre_id"),
    ("office", "office", "office_id"),
    ("source", "source", "source_id"),
    ("provenance", "provenance", "provenance_id"),
    ("century", "century", "century_id"),
    ("notation_style", "notation", "notation_style_id"),
    ("segment", "segment", "segment_id"),
    ("source_status", "source_status", "source_status_id"),
    ("indexers", "indexer", "indexers"),
    ("editors", "indexer", "editors"),
    ("proofreaders", "indexer", "proofreaders"),
];

impl Schema {
    /// The Cantus database schema.
    pub fn cantus() -> Schema {
        let xrefs = CANTUS_XREFS
            .iter()
            .map(|(field, resource_type, id_field)| (field.to_string(), CrossRef::new(*resource_type, *id_field)))
            .collect::<HashMap<_, _>>();
        let mut fields = CANTUS_FIELDS.iter().map(|f| f.to_string()).collect::<BTreeSet<_>>();
        fields.extend(xrefs.values().map(|xref| xref.id_field.clone()));
        Schema { fields, xrefs }
    }

    pub fn from_json(json: &str) -> Result<Schema, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn xref(&self, field: &str) -> Option<&CrossRef> {
        self.xrefs.get(field)
    }

    pub fn is_searchable(&self, field: &str) -> bool {
        self.fields.contains(field) || self.xrefs.contains_key(field)
    }

    /// Check that every named field of a query is known.
    pub fn validate(&self, components: &[Component]) -> Result<(), QueryError> {
        for component in components {
            if let Component::Field { name, .. } = component {
                if !self.is_searchable(name) {
                    return Err(QueryError::UnknownField(name.clone()));
                }
            }
        }
        Ok(())
    }
}
