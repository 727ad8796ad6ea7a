use crate::prelude::*;

/// Render components into a single query string for Solr.
///
/// Terms are followed by a space, `AND`/`OR`/parentheses are surrounded by spaces and the prefix
/// operators `!`, `+` and `-` are preceded by one. The result carries incidental double spaces;
/// trim it if you need a tidy string.
///
/// A field with an empty value scopes the group that follows, so it renders as `name:` and the
/// group's opening parenthesis is glued to it (`century:( 20th  OR 21st  ) `). Same for a group
/// right after a prefix operator (`-( a  ) `). Both keep the output valid for [`parse`].
pub fn assemble(components: &[Component]) -> String {
    let mut query = String::new();
    let mut glued = false;

    for component in components {
        match component {
            Component::Joiner(Joiner::Open) if glued => query.push_str("( "),
            Component::Joiner(joiner) if joiner.is_prefix() => {
                query.push(' ');
                query.push_str(joiner.as_str());
            }
            Component::Joiner(joiner) => {
                query.push(' ');
                query.push_str(joiner.as_str());
                query.push(' ');
            }
            Component::Default(value) => {
                query.push_str(value);
                query.push(' ');
            }
            Component::Field { name, value } if value.is_empty() => {
                query.push_str(name);
                query.push(':');
            }
            Component::Field { name, value } => {
                query.push_str(name);
                query.push(':');
                query.push_str(value);
                query.push(' ');
            }
        }

        glued = match component {
            Component::Joiner(joiner) => joiner.is_prefix(),
            Component::Field { value, .. } => value.is_empty(),
            Component::Default(_) => false,
        };
    }

    query
}
