use crate::prelude::*;
use futures::future::join_all;

/// Replaces cross-referenced fields with the ids of the records they designate.
///
/// A chant has no `genre` field, only a `genre_id`. A query for `genre:antiphon` is therefore
/// resolved by first asking the search service which genres match `antiphon`.
pub struct Resolver<'a> {
    service: &'a dyn SearchService,
    schema: &'a Schema,
}

/// What to do with one slot of the output.
enum Lookup<'a> {
    Keep(Component),
    /// `field:value` on a cross-referenced field; matches are boosted by relevance.
    Simple { field: String, value: String, xref: &'a CrossRef },
    /// `field:(...)` on a cross-referenced field; matches are equally weighted.
    Grouped { field: String, subquery: String, xref: &'a CrossRef },
}

impl<'a> Resolver<'a> {
    pub fn new(service: &'a dyn SearchService, schema: &'a Schema) -> Resolver<'a> {
        Resolver { service, schema }
    }

    /// Resolve every cross-referenced field of `components`.
    ///
    /// Sub-queries run concurrently but the output keeps the input order. When several
    /// sub-queries fail, the error of the leftmost one is returned.
    pub async fn resolve(&self, components: Vec<Component>) -> Result<Vec<Component>, QueryError> {
        let lookups = self.plan(components)?;
        let resolved = join_all(lookups.into_iter().map(|lookup| self.run(lookup))).await;
        resolved.into_iter().collect()
    }

    fn plan(&self, components: Vec<Component>) -> Result<Vec<Lookup<'a>>, QueryError> {
        let mut lookups = Vec::with_capacity(components.len());
        let mut i = 0;
        while i < components.len() {
            let xref = match &components[i] {
                Component::Field { name, .. } => self.schema.xref(name),
                _ => None,
            };
            match (xref, &components[i]) {
                (Some(xref), Component::Field { name, value }) if value.is_empty() => {
                    let (consumed, subquery) = consume_group(&components, i)?;
                    lookups.push(Lookup::Grouped { field: name.clone(), subquery, xref });
                    i += consumed;
                }
                (Some(xref), Component::Field { name, value }) => {
                    lookups.push(Lookup::Simple { field: name.clone(), value: value.clone(), xref });
                    i += 1;
                }
                (_, component) => {
                    lookups.push(Lookup::Keep(component.clone()));
                    i += 1;
                }
            }
        }
        Ok(lookups)
    }

    async fn run(&self, lookup: Lookup<'a>) -> Result<Component, QueryError> {
        match lookup {
            Lookup::Keep(component) => Ok(component),
            Lookup::Simple { field, value, xref } => {
                let subquery = format!("type:{} AND ({value})", xref.resource_type);
                let ids = self.matching_ids(&field, subquery).await?;
                Ok(boosted(&xref.id_field, &ids))
            }
            Lookup::Grouped { field, subquery, xref } => {
                let ids = self.matching_ids(&field, subquery).await?;
                let terms = ids.iter().map(|id| format!("{}:{id}", xref.id_field)).collect::<Vec<_>>();
                Ok(Component::Default(format!("({})", terms.join(" OR "))))
            }
        }
    }

    async fn matching_ids(&self, field: &str, subquery: String) -> Result<Vec<String>, QueryError> {
        debug!("Cross-referencing {field} with {subquery:?}");
        let results = self.service.query(SearchRequest::new(subquery)).await?;
        debug!("Cross-reference on {field} matched {} records", results.docs.len());
        if results.docs.is_empty() {
            return Err(QueryError::NoResults { field: field.to_string() });
        }
        Ok(results.ids()?)
    }
}

/// Find the group scoped by the empty-valued field at `start`.
///
/// Returns how many components the field and its group span, and the group rendered back into a
/// query string (`century:( 20th  OR 21st  ) `).
pub fn consume_group(components: &[Component], start: usize) -> Result<(usize, String), QueryError> {
    let field = components
        .get(start)
        .and_then(Component::field_name)
        .ok_or_else(|| QueryError::MalformedSubquery(format!("no field at position {start}")))?;
    if !components.get(start + 1).is_some_and(|c| c.is_joiner(Joiner::Open)) {
        return Err(QueryError::MalformedSubquery(format!("expected \"(\" after \"{field}:\"")));
    }

    let mut depth = 0usize;
    for (end, component) in components.iter().enumerate().skip(start + 1) {
        match component {
            Component::Joiner(Joiner::Open) => depth += 1,
            Component::Joiner(Joiner::Close) => {
                depth -= 1;
                if depth == 0 {
                    return Ok((end - start + 1, assemble(&components[start..=end])));
                }
            }
            _ => (),
        }
    }

    Err(QueryError::MalformedSubquery(format!("unbalanced parentheses after \"{field}:\"")))
}

/// Turn the ids matched by a sub-query into a single component.
///
/// One id gives a plain `id_field:id` term. Several ids are ORed together and boosted by rank:
/// the first gets the number of ids as weight, the last gets 1.
pub fn boosted(id_field: &str, ids: &[String]) -> Component {
    if let [id] = ids {
        return Component::field(id_field, id.as_str());
    }
    let count = ids.len();
    let terms = ids
        .iter()
        .enumerate()
        .map(|(rank, id)| format!("{id_field}:{id}^{}", count - rank))
        .collect::<Vec<_>>();
    Component::Default(format!("({})", terms.join(" OR ")))
}
