//! Structural validation: every symbol defined, every rule reachable.

use std::collections::{HashMap, HashSet, VecDeque};

use super::GrammarError;
use super::types::{Grammar, Rule};

impl Grammar {
    /// Check that the grammar is well formed.
    ///
    /// Reachability starts from the start rule, the rules referenced by
    /// `extras`, and the `word` rule. Left recursion, direct or indirect, is
    /// fine here: the automaton construction handles it.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let Some(start) = self.start_rule() else {
            return Err(GrammarError::StartRuleMissing(self.name.clone()));
        };

        let mut rules: HashMap<&str, &Rule> = HashMap::with_capacity(self.rules.len());
        for (name, rule) in &self.rules {
            if rules.insert(name.as_str(), rule).is_some() {
                return Err(GrammarError::DuplicateRule { name: name.clone() });
            }
        }
        let externals: HashSet<&str> = self.external_names().collect();
        let check = |name: &str, referenced_by: &str| -> Result<(), GrammarError> {
            if rules.contains_key(name) || externals.contains(name) {
                return Ok(());
            }
            Err(GrammarError::UndefinedSymbol {
                name: name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            })
        };

        let mut refs = Vec::new();
        for (name, rule) in &self.rules {
            refs.clear();
            rule.referenced_symbols(&mut refs);
            for r in &refs {
                check(*r, name)?;
            }
        }

        let mut extra_refs = Vec::new();
        for extra in &self.extras {
            extra.referenced_symbols(&mut extra_refs);
        }
        for r in &extra_refs {
            check(*r, "extras")?;
        }
        for (context, words) in &self.reserved {
            refs.clear();
            for rule in words {
                rule.referenced_symbols(&mut refs);
            }
            for r in &refs {
                check(*r, &format!("reserved.{context}"))?;
            }
        }
        if let Some(word) = &self.word {
            check(word, "word")?;
        }
        for name in &self.inline {
            check(name, "inline")?;
        }
        for name in &self.supertypes {
            check(name, "supertypes")?;
        }
        for group in &self.conflicts {
            for name in group {
                check(name, "conflicts")?;
            }
        }

        let mut reached: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(start);
        queue.extend(extra_refs.iter().copied());
        queue.extend(self.word.as_deref());

        while let Some(name) = queue.pop_front() {
            if !reached.insert(name) {
                continue;
            }
            let Some(rule) = rules.get(name) else {
                continue; // external token
            };
            refs.clear();
            rule.referenced_symbols(&mut refs);
            queue.extend(refs.iter().copied().filter(|r| !reached.contains(r)));
        }

        if let Some((name, _)) = self.rules.iter().find(|(n, _)| !reached.contains(n.as_str())) {
            return Err(GrammarError::UnreachableRule {
                name: name.clone(),
                start: start.to_owned(),
            });
        }

        Ok(())
    }
}
