//! The five canonical CRUD operations plus `count`.
//!
//! Every operation compiles a fresh statement. Entity values are bound as
//! `$<node>_<key>` parameters; the statement text only ever contains
//! validated identifiers.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::error::ConstructionError;
use crate::pattern::{check_identifier, param_name, Label, LabelRelation, LabelSet};
use crate::statement::CompiledStatement;

/// Entity data as it arrives from the service layer: a JSON property bag.
pub type Props = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compile to OPTIONAL MATCH for nullable lookups.
    pub optional: bool,
    /// Append a RETURN clause for the matched node.
    pub return_result: bool,
}

impl MatchOptions {
    pub fn returning() -> Self {
        Self {
            optional: false,
            return_result: true,
        }
    }
}

/// Paging bounds. Only present values are compiled in; no default paging
/// is silently injected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn to_labels<I, S>(labels: I) -> Result<Vec<Label>, ConstructionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels = labels
        .into_iter()
        .map(Label::new)
        .collect::<Result<Vec<_>, _>>()?;
    if labels.is_empty() {
        return Err(ConstructionError::EmptyLabelSet);
    }
    Ok(labels)
}

fn colon_form(labels: &[Label]) -> String {
    labels.iter().map(|l| format!(":{l}")).collect()
}

fn match_keyword(optional: bool) -> &'static str {
    if optional {
        "OPTIONAL MATCH"
    } else {
        "MATCH"
    }
}

/// Render `{key: $node_key, ...}` for the non-null fields of `data`,
/// binding each value into `params`. Returns the rendered inline-property
/// entries in map order.
fn bind_fields(
    node_name: &str,
    data: &Props,
    skip_uuid: bool,
    params: &mut BTreeMap<String, Value>,
) -> Result<Vec<String>, ConstructionError> {
    let mut fields = Vec::new();
    for (key, value) in data {
        if value.is_null() || (skip_uuid && key == "uuid") {
            continue;
        }
        check_identifier(key)?;
        let pname = param_name(node_name, key);
        fields.push(format!("{key}: ${pname}"));
        params.insert(pname, value.clone());
    }
    Ok(fields)
}

/// Create an entity: MERGE over the labels with every non-absent field of
/// `data` bound as a parameter, plus a freshly generated `uuid`.
///
/// Any `uuid` field in `data` is ignored; the generated identifier is
/// readable from the statement's parameter map.
pub fn create<I, S>(
    labels: I,
    node_name: &str,
    data: &Props,
    return_result: bool,
) -> Result<CompiledStatement, ConstructionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels = to_labels(labels)?;
    check_identifier(node_name)?;

    let mut params = BTreeMap::new();
    let mut fields = bind_fields(node_name, data, true, &mut params)?;

    let uuid_param = param_name(node_name, "uuid");
    fields.push(format!("uuid: ${uuid_param}"));
    params.insert(uuid_param, Value::String(Uuid::new_v4().to_string()));

    let mut text = format!(
        "MERGE ({node_name}{} {{{}}})",
        colon_form(&labels),
        fields.join(", ")
    );
    if return_result {
        text.push_str(&format!(" RETURN {node_name}"));
    }
    Ok(CompiledStatement::new(text, params))
}

/// Read entities matching the non-absent fields of `filter`.
pub fn read<I, S>(
    labels: I,
    node_name: &str,
    filter: &Props,
    opts: MatchOptions,
) -> Result<CompiledStatement, ConstructionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels = to_labels(labels)?;
    check_identifier(node_name)?;

    let mut params = BTreeMap::new();
    let fields = bind_fields(node_name, filter, false, &mut params)?;

    let props = if fields.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", fields.join(", "))
    };
    let mut text = format!(
        "{} ({node_name}{}{props})",
        match_keyword(opts.optional),
        colon_form(&labels)
    );
    if opts.return_result {
        text.push_str(&format!(" RETURN {node_name}"));
    }
    Ok(CompiledStatement::new(text, params))
}

/// List entities under the label set's combination semantics.
///
/// AND compiles to a multi-label pattern; OR compiles to a disjunction of
/// per-label predicates. `SKIP`/`LIMIT` are bound as integer parameters
/// and appended only when present.
pub fn list(
    labels: &LabelSet,
    node_name: &str,
    page: Page,
    opts: MatchOptions,
) -> Result<CompiledStatement, ConstructionError> {
    check_identifier(node_name)?;

    let mut params = BTreeMap::new();
    let mut text = match labels.relation() {
        LabelRelation::And => format!(
            "{} ({node_name}{})",
            match_keyword(opts.optional),
            labels.colon_form()
        ),
        LabelRelation::Or => format!(
            "{} ({node_name}) WHERE {}",
            match_keyword(opts.optional),
            labels.disjunction(node_name)
        ),
    };

    if opts.return_result {
        text.push_str(&format!(" RETURN {node_name}"));
    }
    if let Some(offset) = page.offset {
        text.push_str(" SKIP $offset");
        params.insert("offset".to_string(), Value::from(offset));
    }
    if let Some(limit) = page.limit {
        text.push_str(" LIMIT $limit");
        params.insert("limit".to_string(), Value::from(limit));
    }
    Ok(CompiledStatement::new(text, params))
}

/// Update an entity matched by identifier and labels, one SET assignment
/// per field of `data`.
///
/// Null fields are kept: `SET n.key = null` removes the property on the
/// store side. The `uuid` field itself is never reassigned.
pub fn update<I, S>(
    labels: I,
    node_name: &str,
    uuid: &str,
    data: &Props,
    opts: MatchOptions,
) -> Result<CompiledStatement, ConstructionError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels = to_labels(labels)?;
    check_identifier(node_name)?;

    let mut params = BTreeMap::new();
    let uuid_param = param_name(node_name, "uuid");
    params.insert(uuid_param.clone(), Value::String(uuid.to_string()));

    let mut assignments = Vec::new();
    for (key, value) in data {
        if key == "uuid" {
            continue;
        }
        check_identifier(key)?;
        let pname = param_name(node_name, key);
        assignments.push(format!("{node_name}.{key} = ${pname}"));
        params.insert(pname, value.clone());
    }

    let mut text = format!(
        "{} ({node_name}{} {{uuid: ${uuid_param}}})",
        match_keyword(opts.optional),
        colon_form(&labels)
    );
    if !assignments.is_empty() {
        text.push_str(&format!(" SET {}", assignments.join(", ")));
    }
    if opts.return_result {
        text.push_str(&format!(" RETURN {node_name}"));
    }
    Ok(CompiledStatement::new(text, params))
}

/// Delete an entity by identifier, detaching its relationships.
///
/// When `return_result` is set the statement appends `RETURN true AS
/// removed`. The literal is emitted whenever the match succeeds, so a
/// `removed: true` record does not mean a node existed — zero returned
/// records is the only "not found" signal.
pub fn delete(
    labels: &LabelSet,
    node_name: &str,
    uuid: &str,
    opts: MatchOptions,
) -> Result<CompiledStatement, ConstructionError> {
    check_identifier(node_name)?;

    let mut params = BTreeMap::new();
    let uuid_param = param_name(node_name, "uuid");
    params.insert(uuid_param.clone(), Value::String(uuid.to_string()));

    let mut text = match labels.relation() {
        LabelRelation::And => format!(
            "{} ({node_name}{} {{uuid: ${uuid_param}}})",
            match_keyword(opts.optional),
            labels.colon_form()
        ),
        LabelRelation::Or => format!(
            "{} ({node_name} {{uuid: ${uuid_param}}}) WHERE {}",
            match_keyword(opts.optional),
            labels.disjunction(node_name)
        ),
    };

    text.push_str(&format!(" DETACH DELETE {node_name}"));
    if opts.return_result {
        text.push_str(" RETURN true AS removed");
    }
    Ok(CompiledStatement::new(text, params))
}

/// Count entities under the label set's combination semantics.
pub fn count(labels: &LabelSet, node_name: &str) -> Result<CompiledStatement, ConstructionError> {
    check_identifier(node_name)?;

    let text = match labels.relation() {
        LabelRelation::And => format!(
            "MATCH ({node_name}{}) RETURN count({node_name}) AS total",
            labels.colon_form()
        ),
        LabelRelation::Or => format!(
            "MATCH ({node_name}) WHERE {} RETURN count({node_name}) AS total",
            labels.disjunction(node_name)
        ),
    };
    Ok(CompiledStatement::new(text, BTreeMap::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(pairs: &[(&str, Value)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_create_binds_every_field_and_generates_uuid() {
        let data = props(&[("title", json!("Hello")), ("views", json!(7))]);
        let stmt = create(["Article"], "a", &data, true).unwrap();

        assert_eq!(
            stmt.text(),
            "MERGE (a:Article {title: $a_title, views: $a_views, uuid: $a_uuid}) RETURN a"
        );
        assert_eq!(stmt.params()["a_title"], json!("Hello"));
        assert_eq!(stmt.params()["a_views"], json!(7));
        // Identifier is generated, not caller-supplied.
        assert!(stmt.params()["a_uuid"].as_str().unwrap().len() == 36);
    }

    #[test]
    fn test_create_ignores_incoming_uuid_and_nulls() {
        let data = props(&[("uuid", json!("forged")), ("draft", Value::Null)]);
        let stmt = create(["Article"], "a", &data, false).unwrap();

        assert_eq!(stmt.text(), "MERGE (a:Article {uuid: $a_uuid})");
        assert_ne!(stmt.params()["a_uuid"], json!("forged"));
        assert!(!stmt.params().contains_key("a_draft"));
    }

    #[test]
    fn test_injection_stays_in_params() {
        let hostile = "\"}) DETACH DELETE (n) //";
        let data = props(&[("title", json!(hostile))]);
        let stmt = create(["Article"], "a", &data, true).unwrap();

        assert!(!stmt.text().contains(hostile));
        assert!(stmt.text().contains("$a_title"));
        assert_eq!(stmt.params()["a_title"], json!(hostile));
    }

    #[test]
    fn test_hostile_property_key_is_rejected() {
        let data = props(&[("title: 'x'}) DETACH DELETE (n", json!("v"))]);
        let err = create(["Article"], "a", &data, false).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_read_optional_and_plain() {
        let filter = props(&[("email", json!("kim@example.com"))]);
        let stmt = read(
            ["User"],
            "u",
            &filter,
            MatchOptions {
                optional: true,
                return_result: true,
            },
        )
        .unwrap();
        assert_eq!(
            stmt.text(),
            "OPTIONAL MATCH (u:User {email: $u_email}) RETURN u"
        );

        let stmt = read(["User"], "u", &Props::new(), MatchOptions::returning()).unwrap();
        assert_eq!(stmt.text(), "MATCH (u:User) RETURN u");
    }

    #[test]
    fn test_list_and_semantics() {
        let labels = LabelSet::all(["User", "Author"]).unwrap();
        let stmt = list(&labels, "n", Page::default(), MatchOptions::returning()).unwrap();
        assert_eq!(stmt.text(), "MATCH (n:User:Author) RETURN n");
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn test_list_or_compiles_to_disjunction() {
        let labels = LabelSet::any(["Member", "Invitee"]).unwrap();
        let stmt = list(&labels, "n", Page::default(), MatchOptions::returning()).unwrap();
        assert_eq!(
            stmt.text(),
            "MATCH (n) WHERE n:Member OR n:Invitee RETURN n"
        );
    }

    #[test]
    fn test_list_paging_bound_only_when_present() {
        let labels = LabelSet::single("User").unwrap();
        let stmt = list(
            &labels,
            "n",
            Page {
                limit: Some(25),
                offset: Some(50),
            },
            MatchOptions::returning(),
        )
        .unwrap();
        assert_eq!(stmt.text(), "MATCH (n:User) RETURN n SKIP $offset LIMIT $limit");
        assert_eq!(stmt.params()["limit"], json!(25));
        assert_eq!(stmt.params()["offset"], json!(50));

        let stmt = list(&labels, "n", Page::default(), MatchOptions::returning()).unwrap();
        assert!(!stmt.text().contains("SKIP"));
        assert!(!stmt.text().contains("LIMIT"));
    }

    #[test]
    fn test_update_sets_each_field_and_keeps_nulls() {
        let data = props(&[("title", json!("New")), ("subtitle", Value::Null)]);
        let stmt = update(["Article"], "a", "id-1", &data, MatchOptions::returning()).unwrap();

        assert_eq!(
            stmt.text(),
            "MATCH (a:Article {uuid: $a_uuid}) SET a.subtitle = $a_subtitle, a.title = $a_title RETURN a"
        );
        assert_eq!(stmt.params()["a_uuid"], json!("id-1"));
        assert_eq!(stmt.params()["a_subtitle"], Value::Null);
    }

    #[test]
    fn test_delete_emits_unconditional_removed_literal() {
        let labels = LabelSet::single("Article").unwrap();
        let stmt = delete(&labels, "a", "id-1", MatchOptions::returning()).unwrap();

        // The literal rides on the match: it can never read `false`, so the
        // only reliable not-found signal is an empty record set.
        assert_eq!(
            stmt.text(),
            "MATCH (a:Article {uuid: $a_uuid}) DETACH DELETE a RETURN true AS removed"
        );
    }

    #[test]
    fn test_delete_or_labels() {
        let labels = LabelSet::any(["Member", "Invitee"]).unwrap();
        let stmt = delete(&labels, "m", "id-9", MatchOptions::default()).unwrap();
        assert_eq!(
            stmt.text(),
            "MATCH (m {uuid: $m_uuid}) WHERE m:Member OR m:Invitee DETACH DELETE m"
        );
    }

    #[test]
    fn test_count_over_label_relations() {
        let stmt = count(&LabelSet::all(["User"]).unwrap(), "n").unwrap();
        assert_eq!(stmt.text(), "MATCH (n:User) RETURN count(n) AS total");

        let stmt = count(&LabelSet::any(["A", "B"]).unwrap(), "n").unwrap();
        assert_eq!(
            stmt.text(),
            "MATCH (n) WHERE n:A OR n:B RETURN count(n) AS total"
        );
    }
}
