/// A resource type reachable through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path segment of the browse URL (`/chants/`).
    pub plural: &'static str,
    /// Value of the `type` field of its records in Solr.
    pub type_name: &'static str,
}

/// Browse URL searching all resource types at once.
pub const BROWSE_ALL: Resource = Resource { plural: "browse", type_name: "*" };

pub const RESOURCES: &[Resource] = &[
    Resource { plural: "centuries", type_name: "century" },
    Resource { plural: "chants", type_name: "chant" },
    Resource { plural: "feasts", type_name: "feast" },
    Resource { plural: "genres", type_name: "genre" },
    Resource { plural: "indexers", type_name: "indexer" },
    Resource { plural: "notations", type_name: "notation" },
    Resource { plural: "offices", type_name: "office" },
    Resource { plural: "portfolia", type_name: "portfolio" },
    Resource { plural: "provenances", type_name: "provenance" },
    Resource { plural: "sigla", type_name: "siglum" },
    Resource { plural: "segments", type_name: "segment" },
    Resource { plural: "sources", type_name: "source" },
    Resource { plural: "statii", type_name: "source_status" },
];

impl Resource {
    pub fn from_plural(plural: &str) -> Option<Resource> {
        if plural == BROWSE_ALL.plural {
            return Some(BROWSE_ALL);
        }
        RESOURCES.iter().find(|r| r.plural == plural).copied()
    }

    pub fn url(&self) -> String {
        format!("/{}/", self.plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurals() {
        assert_eq!(Resource::from_plural("chants").map(|r| r.type_name), Some("chant"));
        assert_eq!(Resource::from_plural("statii").map(|r| r.type_name), Some("source_status"));
        assert_eq!(Resource::from_plural("browse"), Some(BROWSE_ALL));
        assert_eq!(Resource::from_plural("chant"), None);
        assert_eq!(Resource::from_plural(""), None);
        assert_eq!(Resource::from_plural("sigla").map(|r| r.url()), Some(String::from("/sigla/")));
    }
}
