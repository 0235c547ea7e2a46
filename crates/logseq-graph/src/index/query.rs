//! Translation of [`Query`] trees into SQL filters over `documents d`.

use logseq_content::query::{self, Query};
use rusqlite::types::Value;

/// A boolean SQL expression and its positional parameters.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Filter {
    pub sql: String,
    pub params: Vec<Value>,
}

pub(crate) fn translate(q: &Query) -> Filter {
    let mut filter = Filter::default();
    push(q, &mut filter);
    filter
}

fn push(q: &Query, out: &mut Filter) {
    match q {
        Query::All => out.sql.push('1'),
        Query::None => out.sql.push('0'),
        Query::And(clauses) => push_all(clauses, " AND ", '1', out),
        Query::Or(clauses) => push_all(clauses, " OR ", '0', out),
        Query::Not(clause) => {
            out.sql.push_str("NOT (");
            push(clause, out);
            out.sql.push(')');
        }
        Query::FieldMatches { field, text } => push_match(field, text, out),
        Query::FieldEquals { field, value } => {
            let field = match field.strip_prefix("prop:") {
                Some(_) => format!("{field}:value"),
                None => field.clone(),
            };
            push_term(field, value.clone(), out);
        }
        Query::FieldRefs { field, target, tag } => {
            let suffix = if *tag { "tag" } else { "ref" };
            push_term(format!("{field}:{suffix}"), target.to_lowercase(), out);
        }
    }
}

fn push_all(clauses: &[Query], op: &str, empty: char, out: &mut Filter) {
    if clauses.is_empty() {
        out.sql.push(empty);
        return;
    }
    out.sql.push('(');
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(op);
        }
        push(clause, out);
    }
    out.sql.push(')');
}

fn push_term(field: String, value: String, out: &mut Filter) {
    out.sql
        .push_str("d.id IN (SELECT doc FROM terms WHERE field = ? AND value = ?)");
    out.params.push(Value::Text(field));
    out.params.push(Value::Text(value));
}

fn push_match(field: &str, text: &str, out: &mut Filter) {
    let Some(expr) = match_expression(text) else {
        out.sql.push('0');
        return;
    };
    match field {
        query::TITLE => {
            out.sql
                .push_str("d.id IN (SELECT rowid FROM titles WHERE titles MATCH ?)");
        }
        query::CONTENT => {
            out.sql
                .push_str("d.id IN (SELECT rowid FROM contents WHERE contents MATCH ?)");
        }
        _ if field.starts_with("prop:") => {
            out.sql.push_str(
                "d.id IN (SELECT doc FROM property_text WHERE field = ? AND property_text MATCH ?)",
            );
            out.params.push(Value::Text(field.to_string()));
        }
        // Keyword fields have no full-text table.
        _ => return push_term(field.to_string(), text.to_string(), out),
    }
    out.params.push(Value::Text(expr));
}

/// FTS5 expression requiring every word of `text`, or `None` when `text`
/// has no words.
pub(crate) fn match_expression(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| format!("\"{w}\""))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logseq_content::query::{
        content_matches, property_equals, property_matches, references_tag, title_matches,
    };
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn constants() {
        assert_eq!(translate(&Query::All).sql, "1");
        assert_eq!(translate(&Query::and([])).sql, "1");
        assert_eq!(translate(&Query::or([])).sql, "0");
    }

    #[test]
    fn boolean_structure_is_preserved() {
        let filter = translate(&Query::and([
            title_matches("rust"),
            Query::not(Query::or([Query::None, references_tag("Draft")])),
        ]));
        assert_eq!(
            filter.sql,
            "(d.id IN (SELECT rowid FROM titles WHERE titles MATCH ?) AND NOT ((0 OR d.id IN (SELECT doc FROM terms WHERE field = ? AND value = ?))))"
        );
        assert_eq!(
            filter.params,
            vec![text("\"rust\""), text("pages:tag"), text("draft")]
        );
    }

    #[test]
    fn property_fields_use_their_own_columns() {
        assert_eq!(
            translate(&property_equals("status", "done")).params,
            vec![text("prop:status:value"), text("done")]
        );
        assert_eq!(
            translate(&property_matches("author", "Le Guin")).params,
            vec![text("prop:author"), text("\"Le\" \"Guin\"")]
        );
    }

    #[test]
    fn every_word_is_required() {
        assert_eq!(
            match_expression("rust, \"borrow\" checker"),
            Some("\"rust\" \"borrow\" \"checker\"".to_string())
        );
        assert_eq!(match_expression(" -- "), None);
        assert_eq!(translate(&content_matches("!!")).sql, "0");
    }
}
