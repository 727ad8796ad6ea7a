use crate::prelude::*;

/// Field name given to values the user did not attach to a field.
pub const DEFAULT_FIELD: &str = "default";

/// Boolean and grouping markers kept between field terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
    Not,
    DoubleAmpersand,
    DoublePipe,
    Bang,
    Plus,
    Minus,
    Open,
    Close,
}

impl Joiner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
            Joiner::Not => "NOT",
            Joiner::DoubleAmpersand => "&&",
            Joiner::DoublePipe => "||",
            Joiner::Bang => "!",
            Joiner::Plus => "+",
            Joiner::Minus => "-",
            Joiner::Open => "(",
            Joiner::Close => ")",
        }
    }

    /// Whether this joiner binds to the term right after it.
    pub fn is_prefix(&self) -> bool {
        matches!(self, Joiner::Bang | Joiner::Plus | Joiner::Minus)
    }
}

impl From<BooleanOp> for Joiner {
    fn from(op: BooleanOp) -> Self {
        match op {
            BooleanOp::And => Joiner::And,
            BooleanOp::Or => Joiner::Or,
            BooleanOp::Not => Joiner::Not,
            BooleanOp::DoubleAmpersand => Joiner::DoubleAmpersand,
            BooleanOp::DoublePipe => Joiner::DoublePipe,
        }
    }
}

impl From<Prefix> for Joiner {
    fn from(prefix: Prefix) -> Self {
        match prefix {
            Prefix::Bang => Joiner::Bang,
            Prefix::Plus => Joiner::Plus,
            Prefix::Minus => Joiner::Minus,
        }
    }
}

/// One element of a flattened query.
///
/// Order matters: operator precedence and grouping are carried by the position of the
/// [`Joiner`]s in the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// A value without a field name, searched in the default field.
    Default(String),
    /// `name:value`. An empty value means the field scopes the group that follows.
    Field { name: String, value: String },
    Joiner(Joiner),
}

impl Component {
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Component {
        Component::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn default(value: impl Into<String>) -> Component {
        Component::Default(value.into())
    }

    /// Field name of a term, [`DEFAULT_FIELD`] for default terms, `None` for joiners.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Component::Default(_) => Some(DEFAULT_FIELD),
            Component::Field { name, .. } => Some(name),
            Component::Joiner(_) => None,
        }
    }

    pub fn is_joiner(&self, joiner: Joiner) -> bool {
        matches!(self, Component::Joiner(j) if *j == joiner)
    }
}

impl From<Joiner> for Component {
    fn from(joiner: Joiner) -> Self {
        Component::Joiner(joiner)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Default(value) => write!(f, "({DEFAULT_FIELD}, {value})"),
            Component::Field { name, value } => write!(f, "({name}, {value})"),
            Component::Joiner(joiner) => write!(f, "{}", joiner.as_str()),
        }
    }
}

/// Flatten a parse tree into components, in document order.
///
/// Groups become an opening marker, their own components and a closing marker. A field scoping a
/// group is emitted as a field with an empty value right before the opening marker.
pub fn extract(tree: &ParseTree) -> Vec<Component> {
    let mut components = Vec::new();
    extract_nodes(&tree.nodes, &mut components);
    components
}

fn extract_nodes(nodes: &[Node], components: &mut Vec<Component>) {
    for node in nodes {
        match node {
            Node::BooleanOp(op) => components.push(Joiner::from(*op).into()),
            Node::Term(term) => extract_term(term, components),
        }
    }
}

fn extract_term(term: &Term, components: &mut Vec<Component>) {
    if let Some(prefix) = term.prefix {
        components.push(Joiner::from(prefix).into());
    }

    match &term.body {
        TermBody::NamedField { name, value: FieldValue::Group(nodes) } => {
            components.push(Component::field(name.as_str(), ""));
            extract_group(nodes, components);
        }
        TermBody::NamedField { name, value: FieldValue::Literal(text) } => {
            components.push(Component::field(name.as_str(), text.as_str()));
        }
        TermBody::DefaultField(FieldValue::Group(nodes)) => extract_group(nodes, components),
        TermBody::DefaultField(FieldValue::Literal(text)) => components.push(Component::default(text.as_str())),
    }
}

fn extract_group(nodes: &[Node], components: &mut Vec<Component>) {
    components.push(Joiner::Open.into());
    extract_nodes(nodes, components);
    components.push(Joiner::Close.into());
}
