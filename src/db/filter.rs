//! Composable WHERE-clause builder. Each clause renders to a fragment with
//! positional placeholders and a matching list of bound values, so user text
//! never ends up inside the SQL string.

use rusqlite::types::Value;

use crate::models::ListStatus;

/// One typed condition on the `vocabulary` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `sort_type` is one of the letters. An empty set imposes nothing.
    SortTypeIn(Vec<char>),
    Month(u32),
    Year(i32),
    /// Name contains the text, ASCII case-insensitively.
    NameContains(String),
    Status(ListStatus),
    /// Exact name match, used for duplicate detection.
    NameIs(String),
}

impl Clause {
    fn render(&self, values: &mut Vec<Value>) -> Option<String> {
        match self {
            Clause::SortTypeIn(letters) => {
                if letters.is_empty() {
                    return None;
                }
                let placeholders = letters
                    .iter()
                    .map(|letter| {
                        values.push(Value::Text(letter.to_string()));
                        format!("?{}", values.len())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("sort_type IN ({placeholders})"))
            }
            Clause::Month(month) => {
                values.push(Value::Integer(i64::from(*month)));
                Some(format!("month = ?{}", values.len()))
            }
            Clause::Year(year) => {
                values.push(Value::Integer(i64::from(*year)));
                Some(format!("year = ?{}", values.len()))
            }
            Clause::NameContains(text) => {
                if text.is_empty() {
                    return None;
                }
                values.push(Value::Text(format!("%{}%", escape_like(text))));
                Some(format!("name LIKE ?{} ESCAPE '\\'", values.len()))
            }
            Clause::Status(ListStatus::Practice) => {
                Some("(in_done_list = 0 OR in_done_list IS NULL)".to_string())
            }
            Clause::Status(ListStatus::Done) => Some("in_done_list = 1".to_string()),
            Clause::NameIs(name) => {
                values.push(Value::Text(name.clone()));
                Some(format!("name = ?{}", values.len()))
            }
        }
    }
}

/// Clauses ANDed together. No clauses means every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Add the clause only when there is something to add.
    pub fn and_maybe(self, clause: Option<Clause>) -> Self {
        match clause {
            Some(clause) => self.and(clause),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Render as `" WHERE ..."` (or an empty string) plus bound values.
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut values = Vec::new();
        let fragments: Vec<String> = self
            .clauses
            .iter()
            .filter_map(|clause| clause.render(&mut values))
            .collect();

        if fragments.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", fragments.join(" AND ")), values)
        }
    }
}

/// Escape LIKE wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
