use std::collections::BTreeMap;

use wordgrid_core::{EntityKind, RuleTarget, Sentence};

use crate::{Behavior, Rule};

/// Every rule a sentence could ever ask for, built once per world.
///
/// The catalog covers each concrete subject paired with each meaningful
/// target, so deriving a rule from the grid is a lookup rather than a
/// construction.
#[derive(Clone, Debug)]
pub struct RuleCatalog {
    rules: BTreeMap<Sentence, Rule>,
}

impl RuleCatalog {
    /// Instantiates the rule for every concrete subject and target.
    #[must_use]
    pub fn build() -> Self {
        let mut rules = BTreeMap::new();
        for subject in EntityKind::CONCRETE {
            for target in RuleTarget::all() {
                let sentence = Sentence::new(subject, target);
                let _ = rules.insert(sentence, Rule::for_sentence(sentence));
            }
        }
        log::debug!("rule catalog holds {} rules", rules.len());
        Self { rules }
    }

    /// Rule matching the sentence, if the sentence is well formed.
    #[must_use]
    pub fn lookup(&self, sentence: Sentence) -> Option<Rule> {
        self.rules.get(&sentence).copied()
    }

    /// Number of rules in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Reports whether the catalog holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the catalog in sentence order.
    pub fn iter(&self) -> impl Iterator<Item = (&Sentence, &Rule)> {
        self.rules.iter()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::build()
    }
}

/// Rules in force regardless of the sentences on the grid: every word is pushable.
#[must_use]
pub fn permanent_rules() -> Vec<Rule> {
    EntityKind::ALL
        .into_iter()
        .filter(|kind| kind.is_word())
        .map(|kind| Rule::new(kind, Behavior::Push))
        .collect()
}
