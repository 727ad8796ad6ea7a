use crate::prelude::*;

/// Runs the whole pipeline for one SEARCH request.
pub struct Translator<'a> {
    schema: &'a Schema,
    service: &'a dyn SearchService,
}

impl<'a> Translator<'a> {
    pub fn new(schema: &'a Schema, service: &'a dyn SearchService) -> Translator<'a> {
        Translator { schema, service }
    }

    /// Translate a user query into a Solr query restricted to `resource_type`.
    ///
    /// `resource_type` is inserted as is, so `*` searches across all types.
    pub async fn translate(&self, resource_type: &str, raw: &str) -> Result<String, QueryError> {
        let tree = parse(raw)?;
        let components = extract(&tree);
        self.schema.validate(&components)?;
        let resolved = Resolver::new(self.service, self.schema).resolve(components).await?;
        let assembled = assemble(&resolved);
        trace!("Translated {raw:?} into {assembled:?}");

        Ok(format!("type:{resource_type} AND ({})", assembled.trim()))
    }
}
