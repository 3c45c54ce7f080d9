//! Preparation of stored report queries before translation
//!
//! Snowflake folds unquoted identifiers to upper case, so charts built on a
//! migrated query only find their columns if quoted aliases are upper-cased
//! as well.

use crate::pipeline::{Translation, Translator};
use crate::rule::Pattern;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Upper-cases quoted column aliases, then translates
pub struct ReportQueryPreparer<'a> {
    translator: Translator<'a>,
    alias: Pattern,
}

impl<'a> ReportQueryPreparer<'a> {
    pub fn new(translator: Translator<'a>) -> Self {
        Self {
            translator,
            alias: Pattern::new(r#"\bas\s+("[^"\n]+"|'[^'\n]+')"#),
        }
    }

    pub fn translator(&self) -> Translator<'a> {
        self.translator
    }

    /// Every distinct quoted alias (`as "x"` or `as 'x'`), quotes included
    pub fn quoted_aliases(&self, raw: &str) -> Vec<String> {
        let regex = match self.alias.regex() {
            Ok(regex) => regex,
            Err(err) => {
                error!(error = %err, "Alias pattern failed, leaving aliases as written");
                return Vec::new();
            }
        };

        regex
            .captures_iter(raw)
            .map(|caps| caps[1].to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Upper-case every occurrence of each quoted alias
    pub fn uppercase_aliases(&self, raw: &str) -> String {
        let mut sql = raw.to_string();
        for alias in self.quoted_aliases(raw) {
            debug!(alias = %alias, "Upper-casing quoted alias");
            sql = sql.replace(&alias, &alias.to_uppercase());
        }
        sql
    }

    pub fn prepare(&self, raw: &str) -> Translation {
        self.translator.translate_detailed(&self.uppercase_aliases(raw))
    }
}
