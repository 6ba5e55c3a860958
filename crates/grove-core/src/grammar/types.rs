//! In-memory form of a `grammar.json` document.

use serde::{Deserialize, Serialize};

/// A grammar as the table compiler consumes it. Rule order is declaration
/// order, and the first rule is the start rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    pub rules: Vec<(String, Rule)>,
    /// Tokens allowed anywhere between other tokens.
    #[serde(default)]
    pub extras: Vec<Rule>,
    /// Ordered groups; within a group, earlier entries bind tighter.
    #[serde(default)]
    pub precedences: Vec<Vec<PrecedenceEntry>>,
    /// Rule sets whose conflicts become GLR forks instead of errors.
    #[serde(default)]
    pub conflicts: Vec<Vec<String>>,
    #[serde(default)]
    pub externals: Vec<Rule>,
    /// Rules spliced into every use site.
    #[serde(default)]
    pub inline: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Identifier rule that keyword literals are checked against.
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub reserved: Vec<(String, Vec<Rule>)>,
    #[serde(default)]
    pub inherits: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    Blank,
    String(String),
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    Symbol(String),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Repeat(Box<Rule>),
    Repeat1(Box<Rule>),
    Field { name: String, content: Box<Rule> },
    /// Renames the node `content` produces; `named: false` makes it
    /// anonymous.
    Alias {
        content: Box<Rule>,
        value: String,
        named: bool,
    },
    /// Lex `content` as one token.
    Token(Box<Rule>),
    /// Like `Token`, with no extras allowed before it.
    ImmediateToken(Box<Rule>),
    Prec {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecLeft {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecRight {
        value: Precedence,
        content: Box<Rule>,
    },
    /// Only consulted when GLR versions compete.
    PrecDynamic { value: i32, content: Box<Rule> },
    Reserved {
        context_name: String,
        content: Box<Rule>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precedence {
    Integer(i32),
    Name(String),
}

/// One slot of a `precedences` group: a named level or a rule name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecedenceEntry {
    Name(String),
    Symbol(String),
}

impl Grammar {
    /// The start rule: the first rule in definition order.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.first().map(|(name, _)| name.as_str())
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rule)| rule)
    }

    /// Names of external tokens declared as symbols.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().filter_map(|rule| match rule {
            Rule::Symbol(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Hidden rules start with an underscore and never appear as tree nodes.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('_')
}

impl Rule {
    /// Visit every direct child rule.
    pub fn children(&self) -> &[Rule] {
        match self {
            Rule::Seq(members) | Rule::Choice(members) => members,
            Rule::Repeat(content)
            | Rule::Repeat1(content)
            | Rule::Token(content)
            | Rule::ImmediateToken(content)
            | Rule::Field { content, .. }
            | Rule::Alias { content, .. }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. }
            | Rule::Reserved { content, .. } => std::slice::from_ref(&**content),
            Rule::Blank | Rule::String(_) | Rule::Pattern { .. } | Rule::Symbol(_) => &[],
        }
    }

    /// Collect every symbol name referenced by this rule, in order of appearance.
    pub fn referenced_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Rule::Symbol(name) = self {
            out.push(name);
        }
        for child in self.children() {
            child.referenced_symbols(out);
        }
    }
}
