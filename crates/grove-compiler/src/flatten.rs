//! Flatten rules into productions.
//!
//! `seq` multiplies alternatives, `choice` adds them. Metadata wrappers
//! annotate every step they cover unless an inner wrapper already did.

use crate::precedence::{Assoc, PrecValue};
use crate::prepare::{Prepared, Sym, SynRule, VarId};

pub(crate) type ProdId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub symbol: Sym,
    pub prec: PrecValue,
    pub assoc: Option<Assoc>,
    pub field: Option<String>,
    /// Alias name and whether it is named.
    pub alias: Option<(String, bool)>,
}

impl Step {
    fn new(symbol: Sym) -> Self {
        Self {
            symbol,
            prec: PrecValue::None,
            assoc: None,
            field: None,
            alias: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Production {
    pub lhs: VarId,
    pub steps: Vec<Step>,
    /// Precedence of the production as a whole, used when it has no steps.
    pub prec: PrecValue,
    pub assoc: Option<Assoc>,
    pub dynamic_precedence: i32,
}

impl Production {
    /// Precedence and associativity used when reducing.
    pub(crate) fn reduce_prec(&self) -> (&PrecValue, Option<Assoc>) {
        match self.steps.last() {
            Some(step) => (&step.prec, step.assoc),
            None => (&self.prec, self.assoc),
        }
    }

    /// Precedence of an item about to shift at `dot`.
    pub(crate) fn shift_prec(&self, dot: usize) -> &PrecValue {
        let step = if dot == 0 { 0 } else { dot - 1 };
        &self.steps[step].prec
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Productions {
    pub list: Vec<Production>,
    /// Production ids by left-hand side.
    pub by_lhs: Vec<Vec<ProdId>>,
}

impl Productions {
    pub(crate) fn get(&self, id: ProdId) -> &Production {
        &self.list[id]
    }

    /// Render a production as `lhs -> a "b" c`.
    pub(crate) fn describe(&self, prepared: &Prepared, id: ProdId) -> String {
        let prod = &self.list[id];
        let mut out = format!("{} ->", prepared.variables[prod.lhs as usize].name);
        if prod.steps.is_empty() {
            out.push_str(" ε");
        }
        for step in &prod.steps {
            out.push(' ');
            out.push_str(&prepared.display(step.symbol));
        }
        out
    }
}

pub(crate) fn flatten(prepared: &Prepared) -> Productions {
    let mut list = Vec::new();
    let mut by_lhs = Vec::with_capacity(prepared.variables.len());

    for (var, variable) in prepared.variables.iter().enumerate() {
        let mut ids = Vec::new();
        for mut prod in flatten_rule(&variable.rule) {
            prod.lhs = var as VarId;
            let duplicate = ids.iter().any(|&id: &ProdId| list[id] == prod);
            if !duplicate {
                ids.push(list.len());
                list.push(prod);
            }
        }
        by_lhs.push(ids);
    }

    Productions { list, by_lhs }
}

fn flatten_rule(rule: &SynRule) -> Vec<Production> {
    match rule {
        SynRule::Blank => vec![Production::default()],
        SynRule::Sym(sym) => vec![Production {
            steps: vec![Step::new(*sym)],
            ..Default::default()
        }],
        SynRule::Seq(members) => {
            let mut acc = vec![Production::default()];
            for member in members {
                let tails = flatten_rule(member);
                let mut next = Vec::with_capacity(acc.len() * tails.len());
                for head in &acc {
                    for tail in &tails {
                        next.push(concat(head, tail));
                    }
                }
                acc = next;
            }
            acc
        }
        SynRule::Choice(members) => members.iter().flat_map(flatten_rule).collect(),
        SynRule::Repeat1(content) => flatten_rule(content),
        SynRule::Prec {
            value,
            assoc,
            content,
        } => {
            let mut prods = flatten_rule(content);
            for prod in &mut prods {
                if prod.prec.is_none() {
                    prod.prec = value.clone();
                }
                if prod.assoc.is_none() {
                    prod.assoc = *assoc;
                }
                for step in &mut prod.steps {
                    if step.prec.is_none() {
                        step.prec = value.clone();
                    }
                    if step.assoc.is_none() {
                        step.assoc = *assoc;
                    }
                }
            }
            prods
        }
        SynRule::Dynamic { value, content } => {
            let mut prods = flatten_rule(content);
            for prod in &mut prods {
                if value.abs() > prod.dynamic_precedence.abs() {
                    prod.dynamic_precedence = *value;
                }
            }
            prods
        }
        SynRule::Field { name, content } => {
            let mut prods = flatten_rule(content);
            for step in prods.iter_mut().flat_map(|p| p.steps.iter_mut()) {
                if step.field.is_none() {
                    step.field = Some(name.clone());
                }
            }
            prods
        }
        SynRule::Alias {
            value,
            named,
            content,
        } => {
            let mut prods = flatten_rule(content);
            for step in prods.iter_mut().flat_map(|p| p.steps.iter_mut()) {
                if step.alias.is_none() {
                    step.alias = Some((value.clone(), *named));
                }
            }
            prods
        }
    }
}

fn concat(head: &Production, tail: &Production) -> Production {
    let mut steps = Vec::with_capacity(head.steps.len() + tail.steps.len());
    steps.extend(head.steps.iter().cloned());
    steps.extend(tail.steps.iter().cloned());
    let dynamic_precedence = if tail.dynamic_precedence.abs() > head.dynamic_precedence.abs() {
        tail.dynamic_precedence
    } else {
        head.dynamic_precedence
    };
    Production {
        lhs: head.lhs,
        steps,
        prec: if head.prec.is_none() {
            tail.prec.clone()
        } else {
            head.prec.clone()
        },
        assoc: head.assoc.or(tail.assoc),
        dynamic_precedence,
    }
}
