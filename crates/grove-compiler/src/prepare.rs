//! Grammar preparation: split rules into syntactic variables and tokens.
//!
//! After this pass every syntactic rule is a [`SynRule`] over [`Sym`]s,
//! every lexical construct is a [`LexToken`] with a regex or literal, and
//! `repeat1` has been replaced by hidden left-recursive auxiliary variables.

use std::collections::{HashMap, HashSet};

use grove_core::{Grammar, Interner, Rule, Symbol, is_hidden_name};

use crate::precedence::{Assoc, PrecValue, PrecedenceOrder};
use crate::{Error, Result};

pub(crate) type VarId = u16;
pub(crate) type TokenId = u16;

/// Grammar symbol after preparation.
///
/// Ordered end, terminals, non-terminals; the automaton relies on this
/// order for deterministic state numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Sym {
    End,
    Terminal(TokenId),
    NonTerminal(VarId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SynRule {
    Blank,
    Sym(Sym),
    Seq(Vec<SynRule>),
    Choice(Vec<SynRule>),
    Repeat1(Box<SynRule>),
    Prec {
        value: PrecValue,
        assoc: Option<Assoc>,
        content: Box<SynRule>,
    },
    Dynamic {
        value: i32,
        content: Box<SynRule>,
    },
    Field {
        name: String,
        content: Box<SynRule>,
    },
    Alias {
        value: String,
        named: bool,
        content: Box<SynRule>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VariableKind {
    Named,
    Hidden,
    /// Introduced by repeat expansion; always hidden.
    Auxiliary,
}

#[derive(Clone, Debug)]
pub(crate) struct Variable {
    pub name: String,
    pub kind: VariableKind,
    pub rule: SynRule,
    /// Index of the grammar rule this variable came from.
    pub origin: usize,
    pub supertype: bool,
}

impl Variable {
    pub(crate) fn visible(&self) -> bool {
        self.kind == VariableKind::Named
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TokenPattern {
    Literal(String),
    Regex(String),
}

impl TokenPattern {
    pub(crate) fn regex(&self) -> String {
        match self {
            TokenPattern::Literal(s) => regex_syntax::escape(s),
            TokenPattern::Regex(r) => r.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LexToken {
    pub name: String,
    pub named: bool,
    pub visible: bool,
    pub pattern: TokenPattern,
    pub precedence: i32,
    pub immediate: bool,
    pub extra: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Prepared {
    pub name: String,
    pub variables: Vec<Variable>,
    pub tokens: Vec<LexToken>,
    pub trivia: Vec<TokenPattern>,
    pub word_token: Option<TokenId>,
    pub precedence: PrecedenceOrder,
    /// Declared conflict groups, as rule declaration indices.
    pub conflicts: Vec<Vec<usize>>,
}

impl Prepared {
    pub(crate) fn extra_tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.extra)
            .map(|(i, _)| i as TokenId)
    }

    /// Symbol as written in a grammar: rules bare, strings quoted.
    pub(crate) fn display(&self, sym: Sym) -> String {
        match sym {
            Sym::End => "end".to_owned(),
            Sym::Terminal(t) => {
                let token = &self.tokens[t as usize];
                if token.named {
                    token.name.clone()
                } else {
                    format!("{:?}", token.name)
                }
            }
            Sym::NonTerminal(v) => self.variables[v as usize].name.clone(),
        }
    }
}

pub(crate) fn prepare(grammar: &Grammar) -> Result<Prepared> {
    if let Some(external) = grammar.externals.first() {
        let name = match external {
            Rule::Symbol(name) | Rule::String(name) => name.clone(),
            other => format!("{other:?}"),
        };
        return Err(Error::UnsupportedExternal(name));
    }

    let mut cx = Preparer::new(grammar);

    for (name, rule) in &grammar.rules {
        if let Some(&var) = cx.var_of.get(name.as_str()) {
            cx.current = name.clone();
            cx.counter = 0;
            let converted = cx.convert(rule)?;
            cx.variables[var as usize].rule = converted;
        } else {
            cx.named_token(name)?;
        }
    }

    for extra in &grammar.extras {
        match extra {
            Rule::Symbol(name) => {
                if cx.var_of.contains_key(name.as_str()) {
                    return Err(Error::UnsupportedExtra(name.clone()));
                }
                let token = cx.named_token(name)?;
                cx.tokens[token as usize].extra = true;
            }
            other => {
                let (pattern, _, _) = lexical_content(other, "extras")?;
                cx.trivia.push(pattern);
            }
        }
    }

    let word_token = match &grammar.word {
        Some(word) if cx.var_of.contains_key(word.as_str()) => {
            return Err(Error::InvalidToken {
                rule: word.clone(),
                message: "the word rule must be a token".to_owned(),
            });
        }
        Some(word) => Some(cx.named_token(word)?),
        None => None,
    };

    let supertypes: HashSet<&str> = grammar.supertypes.iter().map(String::as_str).collect();
    for var in &mut cx.variables {
        var.supertype = supertypes.contains(var.name.as_str());
    }

    // Rule names are unique, so a rule's symbol is its declaration index.
    let mut rule_names = Interner::new();
    for (name, _) in &grammar.rules {
        rule_names.intern(name);
    }
    let conflicts = grammar
        .conflicts
        .iter()
        .map(|group| {
            group
                .iter()
                .filter_map(|name| rule_names.get(name).map(Symbol::index))
                .collect()
        })
        .collect();

    let Preparer {
        mut variables,
        tokens,
        trivia,
        ..
    } = cx;
    expand_repeats(&mut variables);

    Ok(Prepared {
        name: grammar.name.clone(),
        variables,
        tokens,
        trivia,
        word_token,
        precedence: PrecedenceOrder::new(&grammar.precedences),
        conflicts,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TokenKey {
    pattern: TokenPattern,
    immediate: bool,
    precedence: i32,
    named: bool,
}

struct Preparer<'g> {
    grammar: &'g Grammar,
    var_of: HashMap<&'g str, VarId>,
    variables: Vec<Variable>,
    tokens: Vec<LexToken>,
    token_of: HashMap<TokenKey, TokenId>,
    named_token_of: HashMap<String, TokenId>,
    trivia: Vec<TokenPattern>,
    inline: HashSet<&'g str>,
    inline_stack: Vec<&'g str>,
    /// Rule being converted.
    current: String,
    counter: usize,
}

impl<'g> Preparer<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut var_of = HashMap::new();
        let mut variables = Vec::new();
        for (index, (name, rule)) in grammar.rules.iter().enumerate() {
            // The start rule is always syntactic.
            if index > 0 && is_lexical(rule) {
                continue;
            }
            var_of.insert(name.as_str(), variables.len() as VarId);
            variables.push(Variable {
                name: name.clone(),
                kind: if is_hidden_name(name) {
                    VariableKind::Hidden
                } else {
                    VariableKind::Named
                },
                rule: SynRule::Blank,
                origin: index,
                supertype: false,
            });
        }

        Self {
            grammar,
            var_of,
            variables,
            tokens: Vec::new(),
            token_of: HashMap::new(),
            named_token_of: HashMap::new(),
            trivia: Vec::new(),
            inline: grammar.inline.iter().map(String::as_str).collect(),
            inline_stack: Vec::new(),
            current: String::new(),
            counter: 0,
        }
    }

    fn convert(&mut self, rule: &'g Rule) -> Result<SynRule> {
        Ok(match rule {
            Rule::Blank => SynRule::Blank,
            Rule::String(value) => {
                if value.is_empty() {
                    return Err(Error::InvalidToken {
                        rule: self.current.clone(),
                        message: "empty string".to_owned(),
                    });
                }
                let id = self.anonymous_token(value, false, 0);
                SynRule::Sym(Sym::Terminal(id))
            }
            Rule::Pattern { .. } => {
                let (pattern, _, _) = lexical_content(rule, &self.current)?;
                SynRule::Sym(Sym::Terminal(self.auxiliary_token(pattern, false, 0)))
            }
            Rule::Token(content) | Rule::ImmediateToken(content) => {
                let immediate = matches!(rule, Rule::ImmediateToken(_));
                let (pattern, precedence, _) = lexical_content(content, &self.current)?;
                let id = match pattern {
                    TokenPattern::Literal(value) => {
                        self.anonymous_token(&value, immediate, precedence)
                    }
                    regex => self.auxiliary_token(regex, immediate, precedence),
                };
                SynRule::Sym(Sym::Terminal(id))
            }
            Rule::Symbol(name) => self.convert_symbol(name)?,
            Rule::Seq(members) => SynRule::Seq(self.convert_all(members)?),
            Rule::Choice(members) => SynRule::Choice(self.convert_all(members)?),
            Rule::Repeat(content) => SynRule::Choice(vec![
                SynRule::Repeat1(Box::new(self.convert(content)?)),
                SynRule::Blank,
            ]),
            Rule::Repeat1(content) => SynRule::Repeat1(Box::new(self.convert(content)?)),
            Rule::Field { name, content } => SynRule::Field {
                name: name.clone(),
                content: Box::new(self.convert(content)?),
            },
            Rule::Alias {
                content,
                value,
                named,
            } => SynRule::Alias {
                value: value.clone(),
                named: *named,
                content: Box::new(self.convert(content)?),
            },
            Rule::Prec { value, content } => self.prec(value.into(), None, content)?,
            Rule::PrecLeft { value, content } => {
                self.prec(value.into(), Some(Assoc::Left), content)?
            }
            Rule::PrecRight { value, content } => {
                self.prec(value.into(), Some(Assoc::Right), content)?
            }
            Rule::PrecDynamic { value, content } => SynRule::Dynamic {
                value: *value,
                content: Box::new(self.convert(content)?),
            },
            Rule::Reserved { content, .. } => self.convert(content)?,
        })
    }

    fn convert_all(&mut self, members: &'g [Rule]) -> Result<Vec<SynRule>> {
        members.iter().map(|m| self.convert(m)).collect()
    }

    fn prec(&mut self, value: PrecValue, assoc: Option<Assoc>, content: &'g Rule) -> Result<SynRule> {
        Ok(SynRule::Prec {
            value,
            assoc,
            content: Box::new(self.convert(content)?),
        })
    }

    fn convert_symbol(&mut self, name: &'g str) -> Result<SynRule> {
        let Some(&var) = self.var_of.get(name) else {
            return Ok(SynRule::Sym(Sym::Terminal(self.named_token(name)?)));
        };
        let grammar = self.grammar;
        if self.inline.contains(name) && !self.inline_stack.contains(&name) {
            if let Some(body) = grammar.rule(name) {
                self.inline_stack.push(name);
                let expanded = self.convert(body);
                self.inline_stack.pop();
                return expanded;
            }
        }
        Ok(SynRule::Sym(Sym::NonTerminal(var)))
    }

    fn push_token(&mut self, key: TokenKey, name: String, visible: bool) -> TokenId {
        if let Some(&id) = self.token_of.get(&key) {
            return id;
        }
        let id = self.tokens.len() as TokenId;
        self.tokens.push(LexToken {
            name,
            named: key.named,
            visible,
            pattern: key.pattern.clone(),
            precedence: key.precedence,
            immediate: key.immediate,
            extra: false,
        });
        self.token_of.insert(key, id);
        id
    }

    fn anonymous_token(&mut self, value: &str, immediate: bool, precedence: i32) -> TokenId {
        let key = TokenKey {
            pattern: TokenPattern::Literal(value.to_owned()),
            immediate,
            precedence,
            named: false,
        };
        self.push_token(key, value.to_owned(), true)
    }

    fn auxiliary_token(&mut self, pattern: TokenPattern, immediate: bool, precedence: i32) -> TokenId {
        let key = TokenKey {
            pattern,
            immediate,
            precedence,
            named: true,
        };
        if let Some(&id) = self.token_of.get(&key) {
            return id;
        }
        self.counter += 1;
        let name = format!("{}_token{}", self.current, self.counter);
        self.push_token(key, name, false)
    }

    /// Token for a rule whose whole body is lexical.
    fn named_token(&mut self, name: &str) -> Result<TokenId> {
        if let Some(&id) = self.named_token_of.get(name) {
            return Ok(id);
        }
        let Some(rule) = self.grammar.rule(name) else {
            return Err(Error::InvalidToken {
                rule: name.to_owned(),
                message: "undefined token".to_owned(),
            });
        };
        let (pattern, precedence, immediate) = lexical_content(rule, name)?;
        let id = self.tokens.len() as TokenId;
        self.tokens.push(LexToken {
            name: name.to_owned(),
            named: true,
            visible: !is_hidden_name(name),
            pattern,
            precedence,
            immediate,
            extra: false,
        });
        self.named_token_of.insert(name.to_owned(), id);
        Ok(id)
    }
}

/// Whether a rule body, under any `prec` wrappers, is a single token.
fn is_lexical(rule: &Rule) -> bool {
    match rule {
        Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. } => is_lexical(content),
        Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => true,
        _ => false,
    }
}

/// Convert lexical content to a pattern plus its outermost integer
/// precedence and immediacy.
fn lexical_content(rule: &Rule, rule_name: &str) -> Result<(TokenPattern, i32, bool)> {
    let mut precedence = None;
    let mut immediate = false;
    let mut current = rule;
    loop {
        match current {
            Rule::Prec { value, content }
            | Rule::PrecLeft { value, content }
            | Rule::PrecRight { value, content } => {
                if precedence.is_none()
                    && let grove_core::Precedence::Integer(n) = value
                {
                    precedence = Some(*n);
                }
                current = content;
            }
            Rule::Token(content) => current = content,
            Rule::ImmediateToken(content) => {
                immediate = true;
                current = content;
            }
            _ => break,
        }
    }

    let pattern = match current {
        Rule::String(value) if value.is_empty() => {
            return Err(Error::InvalidToken {
                rule: rule_name.to_owned(),
                message: "empty string".to_owned(),
            });
        }
        Rule::String(value) => TokenPattern::Literal(value.clone()),
        other => {
            let regex = to_regex(other, rule_name)?;
            regex_syntax::Parser::new()
                .parse(&regex)
                .map_err(|e| Error::InvalidPattern {
                    rule: rule_name.to_owned(),
                    message: e.to_string(),
                })?;
            TokenPattern::Regex(regex)
        }
    };
    Ok((pattern, precedence.unwrap_or(0), immediate))
}

/// Render token content as a single regex.
fn to_regex(rule: &Rule, rule_name: &str) -> Result<String> {
    let group = |r: &Rule| -> Result<String> { Ok(format!("(?:{})", to_regex(r, rule_name)?)) };
    Ok(match rule {
        Rule::Blank => String::new(),
        Rule::String(value) => regex_syntax::escape(value),
        Rule::Pattern { value, flags } => match flags.as_deref() {
            None | Some("") => format!("(?:{value})"),
            Some("i") => format!("(?i:{value})"),
            Some(other) => {
                return Err(Error::InvalidPattern {
                    rule: rule_name.to_owned(),
                    message: format!("unsupported flags `{other}`"),
                });
            }
        },
        Rule::Seq(members) => members.iter().map(group).collect::<Result<String>>()?,
        Rule::Choice(members) => {
            let alternatives = members
                .iter()
                .map(|m| to_regex(m, rule_name))
                .collect::<Result<Vec<_>>>()?;
            format!("(?:{})", alternatives.join("|"))
        }
        Rule::Repeat(content) => format!("{}*", group(content)?),
        Rule::Repeat1(content) => format!("{}+", group(content)?),
        Rule::Token(content)
        | Rule::ImmediateToken(content)
        | Rule::Field { content, .. }
        | Rule::Alias { content, .. }
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. }
        | Rule::Reserved { content, .. } => to_regex(content, rule_name)?,
        Rule::Symbol(name) => {
            return Err(Error::InvalidToken {
                rule: rule_name.to_owned(),
                message: format!("token content cannot reference rule `{name}`"),
            });
        }
    })
}

/// Replace each `repeat1(x)` with a hidden rule `aux -> aux x | x`.
///
/// Identical repeated content shares one auxiliary rule.
fn expand_repeats(variables: &mut Vec<Variable>) {
    let mut shared: HashMap<SynRule, VarId> = HashMap::new();
    let original = variables.len();
    for var in 0..original {
        let mut rule = std::mem::replace(&mut variables[var].rule, SynRule::Blank);
        let mut counter = 0;
        expand_rule(&mut rule, var, variables, &mut shared, &mut counter);
        variables[var].rule = rule;
    }
}

fn expand_rule(
    rule: &mut SynRule,
    parent: usize,
    variables: &mut Vec<Variable>,
    shared: &mut HashMap<SynRule, VarId>,
    counter: &mut usize,
) {
    match rule {
        SynRule::Blank | SynRule::Sym(_) => {}
        SynRule::Seq(members) | SynRule::Choice(members) => {
            for m in members {
                expand_rule(m, parent, variables, shared, counter);
            }
        }
        SynRule::Prec { content, .. }
        | SynRule::Dynamic { content, .. }
        | SynRule::Field { content, .. }
        | SynRule::Alias { content, .. } => {
            expand_rule(content, parent, variables, shared, counter)
        }
        SynRule::Repeat1(content) => {
            expand_rule(content, parent, variables, shared, counter);
            let content = std::mem::replace(&mut **content, SynRule::Blank);
            let aux = match shared.get(&content) {
                Some(&aux) => aux,
                None => {
                    *counter += 1;
                    let aux = variables.len() as VarId;
                    let body = SynRule::Choice(vec![
                        SynRule::Seq(vec![SynRule::Sym(Sym::NonTerminal(aux)), content.clone()]),
                        content.clone(),
                    ]);
                    variables.push(Variable {
                        name: format!("{}_repeat{}", variables[parent].name, counter),
                        kind: VariableKind::Auxiliary,
                        rule: body,
                        origin: variables[parent].origin,
                        supertype: false,
                    });
                    shared.insert(content, aux);
                    aux
                }
            };
            *rule = SynRule::Sym(Sym::NonTerminal(aux));
        }
    }
}
