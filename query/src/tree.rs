use std::ops::Range;

/// A successfully parsed query.
///
/// The tree owns copies of the matched text so it does not borrow the raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub nodes: Vec<Node>,
}

/// A member of a term list, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Term(Term),
    BooleanOp(BooleanOp),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub prefix: Option<Prefix>,
    pub body: TermBody,
    /// Byte range of the term in the raw query.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermBody {
    // name:value
    NamedField { name: String, value: FieldValue },
    // value
    DefaultField(FieldValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain or quoted text, quotes and wildcards included.
    Literal(String),
    // (term_list)
    Group(Vec<Node>),
}

/// Unary operator glued to the front of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    // !
    Bang,
    // +
    Plus,
    // -
    Minus,
}

/// Operator joining two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Not,
    // &&
    DoubleAmpersand,
    // ||
    DoublePipe,
}
