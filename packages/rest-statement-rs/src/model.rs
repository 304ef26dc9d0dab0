use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Statement {
    #[serde(rename = "select")]
    Select {
        from: Relation,
        targets: Vec<Target>,
        filter: Option<LogicalExpression>,
        sorts: Vec<Sort>,
        limit: Option<u64>,
        offset: Option<u64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Target {
    #[serde(rename = "star")]
    Star,
    #[serde(rename = "column")]
    Column(ColumnRef),
    #[serde(rename = "aggregate")]
    Aggregate(AggregateTarget),
    #[serde(rename = "embedded")]
    Embedded(EmbeddedTarget),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnRef {
    pub relation: Option<String>,
    pub column: String,
    pub alias: Option<String>,
    pub cast: Option<String>,
    #[serde(rename = "jsonPath")]
    pub json_path: Vec<JsonPathStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonPathStep {
    pub arrow: JsonArrow,
    pub key: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JsonArrow {
    #[serde(rename = "->")]
    Json,
    #[serde(rename = "->>")]
    Text,
}

impl JsonArrow {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonArrow::Json => "->",
            JsonArrow::Text => "->>",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateTarget {
    pub function: AggregateFunction,
    pub input: ColumnRef,
    #[serde(rename = "inputCast")]
    pub input_cast: Option<String>,
    #[serde(rename = "outputCast")]
    pub output_cast: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Avg,
    Count,
    Max,
    Min,
    Sum,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Avg => "avg",
            AggregateFunction::Count => "count",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Sum => "sum",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedTarget {
    pub relation: String,
    pub alias: Option<String>,
    #[serde(rename = "joinType")]
    pub join_type: JoinType,
    #[serde(rename = "joinQualifier")]
    pub join_qualifier: JoinQualifier,
    pub targets: Vec<Target>,
    pub spread: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Left,
    Inner,
}

/// The ON equality tying an embedded relation to its parent. Validated by the
/// translator, never rendered: PostgREST infers the join from the embed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinQualifier {
    pub column: String,
    #[serde(rename = "parentRelation")]
    pub parent_relation: String,
    #[serde(rename = "parentColumn")]
    pub parent_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LogicalExpression {
    #[serde(rename = "logical")]
    Logical {
        operator: LogicalOperator,
        negate: bool,
        values: Vec<LogicalExpression>,
    },
    #[serde(rename = "column")]
    Column {
        column: String,
        operator: ColumnOperator,
        value: Value,
        negate: bool,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
    Match,
    Imatch,
    Is,
    In,
    Fts,
    Plfts,
    Phfts,
    Wfts,
    Cs,
    Cd,
    Ov,
    Sl,
    Sr,
    Nxr,
    Nxl,
    Adj,
}

impl ColumnOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnOperator::Eq => "eq",
            ColumnOperator::Neq => "neq",
            ColumnOperator::Gt => "gt",
            ColumnOperator::Gte => "gte",
            ColumnOperator::Lt => "lt",
            ColumnOperator::Lte => "lte",
            ColumnOperator::Like => "like",
            ColumnOperator::Ilike => "ilike",
            ColumnOperator::Match => "match",
            ColumnOperator::Imatch => "imatch",
            ColumnOperator::Is => "is",
            ColumnOperator::In => "in",
            ColumnOperator::Fts => "fts",
            ColumnOperator::Plfts => "plfts",
            ColumnOperator::Phfts => "phfts",
            ColumnOperator::Wfts => "wfts",
            ColumnOperator::Cs => "cs",
            ColumnOperator::Cd => "cd",
            ColumnOperator::Ov => "ov",
            ColumnOperator::Sl => "sl",
            ColumnOperator::Sr => "sr",
            ColumnOperator::Nxr => "nxr",
            ColumnOperator::Nxl => "nxl",
            ColumnOperator::Adj => "adj",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sort {
    pub column: String,
    pub relation: Option<String>,
    pub direction: Option<SortDirection>,
    pub nulls: Option<SortNulls>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortNulls {
    First,
    Last,
}
