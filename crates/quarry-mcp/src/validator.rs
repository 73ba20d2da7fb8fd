//! Read-only SQL gate for the ad-hoc query tool.
//!
//! A denylist check, not a parser. Keyword scanning runs on an uppercased copy;
//! the caller's original text is what gets executed.
//!
//! Checks, in order:
//! 1. the first token must be `SELECT`
//! 2. no forbidden keyword may appear anywhere, as a plain substring
//! 3. no second statement may follow a `;` outside a quoted literal
//!
//! Check 2 over-rejects on purpose: a column named `update_count` or a string
//! literal containing `'deleted'` is refused.

use thiserror::Error;

/// Keywords that may not appear anywhere in an ad-hoc query.
pub const FORBIDDEN_KEYWORDS: [&str; 7] = [
    "DROP", "DELETE", "INSERT", "UPDATE", "ALTER", "CREATE", "TRUNCATE",
];

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Verdict::Accept => Ok(()),
            Verdict::Reject(reason) => Err(reason),
        }
    }
}

/// Why a query was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Query is empty")]
    Empty,

    #[error("Only SELECT queries are allowed")]
    NotSelect,

    #[error("Query contains forbidden keyword: {0}")]
    ForbiddenKeyword(&'static str),

    #[error("Multiple statements are not allowed")]
    MultipleStatements,
}

/// Decide whether `sql` may be executed.
pub fn validate(sql: &str) -> Verdict {
    let normalized = sql.trim().to_uppercase();
    if normalized.is_empty() {
        return Verdict::Reject(Rejection::Empty);
    }

    let first_token = normalized
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default();
    if first_token != "SELECT" {
        return Verdict::Reject(Rejection::NotSelect);
    }

    if let Some(keyword) = FORBIDDEN_KEYWORDS
        .iter()
        .find(|keyword| normalized.contains(*keyword))
    {
        return Verdict::Reject(Rejection::ForbiddenKeyword(keyword));
    }

    if has_trailing_statement(&normalized) {
        return Verdict::Reject(Rejection::MultipleStatements);
    }

    Verdict::Accept
}

/// True when a `;` outside quotes is followed by anything but whitespace or more `;`.
fn has_trailing_statement(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut terminated = false;

    for c in sql.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if terminated => {
                if !(c.is_whitespace() || c == ';') {
                    return true;
                }
            }
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                ';' => terminated = true,
                _ => {}
            },
        }
    }

    false
}
