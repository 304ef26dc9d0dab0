use crate::model::{
    AggregateTarget, ColumnRef, EmbeddedTarget, JoinType, LogicalExpression, LogicalOperator, Sort,
    SortDirection, SortNulls, Statement, Target,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rendered PostgREST request. Parameter values are emitted verbatim; URL
/// encoding of `full_path` is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub params: Vec<(String, String)>,
    #[serde(rename = "fullPath")]
    pub full_path: String,
}

/// Serializes a Statement into a PostgREST request. The renderer is total
/// over Statements produced by the translator; IR that violates the
/// translator's invariants is a bug and panics.
pub fn render_http(statement: &Statement) -> HttpRequest {
    let Statement::Select {
        from,
        targets,
        filter,
        sorts,
        limit,
        offset,
    } = statement;

    let mut params = Vec::new();

    if !matches!(targets.as_slice(), [Target::Star]) {
        params.push(("select".to_string(), render_select(targets)));
    }

    if let Some(filter) = filter {
        render_filter_params(filter, &mut params);
    }

    if !sorts.is_empty() {
        params.push(("order".to_string(), render_order(sorts)));
    }
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = offset {
        params.push(("offset".to_string(), offset.to_string()));
    }

    let path = format!("/{}", from.name);
    let full_path = if params.is_empty() {
        path.clone()
    } else {
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{path}?{query}")
    };

    HttpRequest {
        method: "GET".to_string(),
        path,
        params,
        full_path,
    }
}

fn render_select(targets: &[Target]) -> String {
    targets
        .iter()
        .map(render_target)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_target(target: &Target) -> String {
    match target {
        Target::Star => "*".to_string(),
        Target::Column(column) => render_column(column),
        Target::Aggregate(aggregate) => render_aggregate(aggregate),
        Target::Embedded(embedded) => render_embedded(embedded),
    }
}

fn render_column(column: &ColumnRef) -> String {
    let mut out = String::new();
    if let Some(alias) = &column.alias {
        out.push_str(alias);
        out.push(':');
    }
    out.push_str(&column.column);
    for step in &column.json_path {
        out.push_str(step.arrow.as_str());
        out.push_str(&step.key);
    }
    if let Some(cast) = &column.cast {
        out.push_str("::");
        out.push_str(cast);
    }
    out
}

fn render_aggregate(aggregate: &AggregateTarget) -> String {
    let mut out = String::new();
    if let Some(alias) = &aggregate.alias {
        out.push_str(alias);
        out.push(':');
    }
    out.push_str(&aggregate.input.column);
    for step in &aggregate.input.json_path {
        out.push_str(step.arrow.as_str());
        out.push_str(&step.key);
    }
    if let Some(cast) = &aggregate.input_cast {
        out.push_str("::");
        out.push_str(cast);
    }
    out.push('.');
    out.push_str(aggregate.function.as_str());
    out.push_str("()");
    if let Some(cast) = &aggregate.output_cast {
        out.push_str("::");
        out.push_str(cast);
    }
    out
}

fn render_embedded(embedded: &EmbeddedTarget) -> String {
    let mut out = String::new();
    if embedded.spread {
        out.push_str("...");
    }
    if let Some(alias) = &embedded.alias {
        out.push_str(alias);
        out.push(':');
    }
    out.push_str(&embedded.relation);
    if embedded.join_type == JoinType::Inner {
        out.push_str("!inner");
    }
    out.push('(');
    out.push_str(&render_select(&embedded.targets));
    out.push(')');
    out
}

// A top-level non-negated AND splits into one query parameter per operand;
// everything else collapses into a single parameter.
fn render_filter_params(filter: &LogicalExpression, params: &mut Vec<(String, String)>) {
    match filter {
        LogicalExpression::Logical {
            operator: LogicalOperator::And,
            negate: false,
            values,
        } => {
            for value in values {
                render_filter_param(value, params);
            }
        }
        other => render_filter_param(other, params),
    }
}

fn render_filter_param(filter: &LogicalExpression, params: &mut Vec<(String, String)>) {
    match filter {
        LogicalExpression::Column {
            column,
            operator,
            value,
            negate,
        } => {
            let not = if *negate { "not." } else { "" };
            params.push((
                column.clone(),
                format!("{not}{}.{}", operator.as_str(), render_value(value)),
            ));
        }
        LogicalExpression::Logical {
            operator,
            negate,
            values,
        } => {
            let key = if *negate {
                format!("not.{}", operator.as_str())
            } else {
                operator.as_str().to_string()
            };
            params.push((key, format!("({})", render_operands(values))));
        }
    }
}

fn render_operands(values: &[LogicalExpression]) -> String {
    values
        .iter()
        .map(render_nested_filter)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_nested_filter(filter: &LogicalExpression) -> String {
    match filter {
        LogicalExpression::Column {
            column,
            operator,
            value,
            negate,
        } => {
            let not = if *negate { "not." } else { "" };
            format!("{column}.{not}{}.{}", operator.as_str(), render_value(value))
        }
        LogicalExpression::Logical {
            operator,
            negate,
            values,
        } => {
            let not = if *negate { "not." } else { "" };
            format!("{not}{}({})", operator.as_str(), render_operands(values))
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let body = items
                .iter()
                .map(render_value)
                .collect::<Vec<_>>()
                .join(",");
            format!("({body})")
        }
        Value::Object(_) => unreachable!("object literals cannot appear in filter values"),
    }
}

fn render_order(sorts: &[Sort]) -> String {
    sorts
        .iter()
        .map(render_sort)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_sort(sort: &Sort) -> String {
    let mut out = String::new();
    if let Some(relation) = &sort.relation {
        out.push_str(relation);
        out.push('.');
    }
    out.push_str(&sort.column);
    match sort.direction {
        Some(SortDirection::Asc) => out.push_str(".asc"),
        Some(SortDirection::Desc) => out.push_str(".desc"),
        None => {}
    }
    match sort.nulls {
        Some(SortNulls::First) => out.push_str(".nullsfirst"),
        Some(SortNulls::Last) => out.push_str(".nullslast"),
        None => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnOperator, Relation};

    #[test]
    fn star_only_select_renders_bare_path() {
        let statement = Statement::Select {
            from: Relation {
                name: "books".to_string(),
                alias: None,
            },
            targets: vec![Target::Star],
            filter: None,
            sorts: Vec::new(),
            limit: None,
            offset: None,
        };

        let request = render_http(&statement);
        assert_eq!(request.method, "GET");
        assert_eq!(request.full_path, "/books");
        assert!(request.params.is_empty());
    }

    #[test]
    fn top_level_and_splits_into_parameters() {
        let statement = Statement::Select {
            from: Relation {
                name: "books".to_string(),
                alias: None,
            },
            targets: vec![Target::Star],
            filter: Some(LogicalExpression::Logical {
                operator: LogicalOperator::And,
                negate: false,
                values: vec![
                    LogicalExpression::Column {
                        column: "title".to_string(),
                        operator: ColumnOperator::Eq,
                        value: serde_json::json!("Cheese"),
                        negate: false,
                    },
                    LogicalExpression::Column {
                        column: "pages".to_string(),
                        operator: ColumnOperator::Gt,
                        value: serde_json::json!(100),
                        negate: true,
                    },
                ],
            }),
            sorts: Vec::new(),
            limit: None,
            offset: None,
        };

        let request = render_http(&statement);
        assert_eq!(
            request.full_path,
            "/books?title=eq.Cheese&pages=not.gt.100"
        );
    }
}
