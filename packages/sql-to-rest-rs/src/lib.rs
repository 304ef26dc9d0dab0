use pg_query::protobuf;
use pg_query::protobuf::node::Node as PgNodeEnum;
use rest_statement_rs::model::{
    AggregateFunction, AggregateTarget, ColumnOperator, ColumnRef, EmbeddedTarget, JoinQualifier,
    JoinType, JsonArrow, JsonPathStep, LogicalExpression, LogicalOperator, Relation, Sort,
    SortDirection, SortNulls, Statement, Target,
};
use serde_json::Value;
use thiserror::Error;

pub use rest_statement_rs::model;
pub use rest_statement_rs::{render_http, HttpRequest};

/// Translates one SQL SELECT statement into the PostgREST Statement IR.
pub fn translate_sql(sql: &str) -> TranslateResult<Statement> {
    parse_select_statement(sql)
}

/// Translates one SQL SELECT statement and renders it as an HTTP request.
pub fn translate_sql_to_request(sql: &str) -> TranslateResult<HttpRequest> {
    Ok(render_http(&translate_sql(sql)?))
}

include!("translator/parse_select.rs");
include!("translator/relations.rs");
include!("translator/targets.rs");
include!("translator/filters.rs");
include!("translator/sorting.rs");
include!("translator/assemble.rs");
include!("translator/literals.rs");

#[cfg(feature = "node")]
mod node_bindings;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("sql parse error: {0}")]
    Parse(String),
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),
    #[error("missing FROM clause")]
    MissingFromClause,
    #[error("multiple FROM relations are unsupported: {0}")]
    MultipleFromRelations(String),
    #[error("unsupported join type: {0}")]
    UnsupportedJoinType(String),
    #[error("join qualifier must be a single column equality: {0}")]
    NonEquiJoin(String),
    #[error("join qualifier must not reference a constant")]
    ConstantInJoin,
    #[error("self joins are unsupported: {0}")]
    SelfJoinUnsupported(String),
    #[error("unknown relation: {0}")]
    UnknownRelation(String),
    #[error("column references a relation without a join: {0}")]
    ForeignColumnWithoutJoin(String),
    #[error("casts are only supported in the select list: {0}")]
    CastOutsideTarget(String),
    #[error("unsupported aggregate function: {0}")]
    UnsupportedAggregate(String),
    #[error("invalid aggregate argument: {0}")]
    AggregateArgumentShape(String),
    #[error("GROUP BY requires at least one aggregate target")]
    GroupByWithoutAggregate,
    #[error("GROUP BY must match the selected columns exactly: {0}")]
    GroupByMissingTarget(String),
    #[error("HAVING is unsupported")]
    HavingUnsupported,
    #[error("LIMIT must be a non-negative integer: {0}")]
    InvalidLimit(String),
    #[error("OFFSET must be a non-negative integer: {0}")]
    InvalidOffset(String),
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("invalid json path: {0}")]
    InvalidJsonPath(String),
}

impl TranslateError {
    /// Machine-readable error kind, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::Parse(_) => "Parse",
            TranslateError::UnsupportedExpression(_) => "UnsupportedExpression",
            TranslateError::MissingFromClause => "MissingFromClause",
            TranslateError::MultipleFromRelations(_) => "MultipleFromRelations",
            TranslateError::UnsupportedJoinType(_) => "UnsupportedJoinType",
            TranslateError::NonEquiJoin(_) => "NonEquiJoin",
            TranslateError::ConstantInJoin => "ConstantInJoin",
            TranslateError::SelfJoinUnsupported(_) => "SelfJoinUnsupported",
            TranslateError::UnknownRelation(_) => "UnknownRelation",
            TranslateError::ForeignColumnWithoutJoin(_) => "ForeignColumnWithoutJoin",
            TranslateError::CastOutsideTarget(_) => "CastOutsideTarget",
            TranslateError::UnsupportedAggregate(_) => "UnsupportedAggregate",
            TranslateError::AggregateArgumentShape(_) => "AggregateArgumentShape",
            TranslateError::GroupByWithoutAggregate => "GroupByWithoutAggregate",
            TranslateError::GroupByMissingTarget(_) => "GroupByMissingTarget",
            TranslateError::HavingUnsupported => "HavingUnsupported",
            TranslateError::InvalidLimit(_) => "InvalidLimit",
            TranslateError::InvalidOffset(_) => "InvalidOffset",
            TranslateError::UnsupportedOperator(_) => "UnsupportedOperator",
            TranslateError::InvalidJsonPath(_) => "InvalidJsonPath",
        }
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    include!("translator/tests_internal.rs");
}
