fn parse_operator_name(nodes: &[protobuf::Node]) -> TranslateResult<String> {
    parse_name_from_nodes(nodes)
}

fn parse_name_from_nodes(nodes: &[protobuf::Node]) -> TranslateResult<String> {
    let mut parts = Vec::new();
    for node in nodes {
        match node.node.as_ref() {
            Some(PgNodeEnum::String(value)) => parts.push(value.sval.clone()),
            _ => {
                return Err(TranslateError::Parse(
                    "expected string node in identifier/operator name".to_string(),
                ));
            }
        }
    }

    if parts.is_empty() {
        return Err(TranslateError::Parse(
            "empty identifier/operator name in parsed SQL".to_string(),
        ));
    }

    Ok(parts.join("."))
}

fn column_ref_parts(column_ref: &protobuf::ColumnRef) -> TranslateResult<Vec<String>> {
    let mut parts = Vec::with_capacity(column_ref.fields.len());
    for field in &column_ref.fields {
        match field.node.as_ref() {
            Some(PgNodeEnum::String(value)) => parts.push(value.sval.clone()),
            Some(PgNodeEnum::AStar(_)) => {
                return Err(TranslateError::UnsupportedExpression(
                    "star is not allowed in this position".to_string(),
                ));
            }
            _ => {
                return Err(TranslateError::UnsupportedExpression(
                    "unsupported column reference".to_string(),
                ));
            }
        }
    }

    if parts.is_empty() {
        return Err(TranslateError::Parse(
            "empty column reference in parsed SQL".to_string(),
        ));
    }

    Ok(parts)
}

fn literal_value(a_const: &protobuf::AConst) -> TranslateResult<Value> {
    if a_const.isnull {
        return Ok(Value::Null);
    }

    match a_const.val.as_ref() {
        Some(protobuf::a_const::Val::Ival(number)) => Ok(Value::from(i64::from(number.ival))),
        Some(protobuf::a_const::Val::Fval(number)) => {
            let parsed = number.fval.parse::<f64>().map_err(|_| {
                TranslateError::Parse(format!("invalid floating-point literal: {}", number.fval))
            })?;
            serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| {
                    TranslateError::Parse(format!("non-finite literal: {}", number.fval))
                })
        }
        Some(protobuf::a_const::Val::Boolval(value)) => Ok(Value::Bool(value.boolval)),
        Some(protobuf::a_const::Val::Sval(value)) => Ok(Value::String(value.sval.clone())),
        Some(protobuf::a_const::Val::Bsval(value)) => Ok(Value::String(value.bsval.clone())),
        None => Ok(Value::Null),
    }
}

// The parser expands bare SQL type names to their catalog form (float becomes
// pg_catalog.float8). Strip the qualifier and map the numeric families back
// to the SQL spelling so rendered casts match the source query.
fn cast_name(type_cast: &protobuf::TypeCast) -> TranslateResult<String> {
    let type_name = type_cast
        .type_name
        .as_ref()
        .ok_or_else(|| TranslateError::Parse("CAST missing type name".to_string()))?;

    let mut parts = Vec::new();
    for node in &type_name.names {
        match node.node.as_ref() {
            Some(PgNodeEnum::String(value)) => parts.push(value.sval.clone()),
            _ => {
                return Err(TranslateError::Parse(
                    "expected string node in type name".to_string(),
                ));
            }
        }
    }
    if parts.first().map(String::as_str) == Some("pg_catalog") {
        parts.remove(0);
    }
    if parts.is_empty() {
        return Err(TranslateError::Parse("empty cast type name".to_string()));
    }

    let mut name = match parts.join(".").as_str() {
        "int2" => "smallint".to_string(),
        "int4" => "int".to_string(),
        "int8" => "bigint".to_string(),
        "float4" => "real".to_string(),
        "float8" => "float".to_string(),
        other => other.to_string(),
    };
    for _ in &type_name.array_bounds {
        name.push_str("[]");
    }

    Ok(name)
}

// Walks a chain of -> / ->> operators down to the column it is rooted at.
// Returns the column reference parts plus the steps in source order; SQL
// quotes around keys are already stripped by the parser.
fn parse_json_path(
    a_expr: &protobuf::AExpr,
) -> TranslateResult<(Vec<String>, Vec<JsonPathStep>)> {
    let mut steps = Vec::new();
    let mut current = a_expr;

    loop {
        let kind =
            protobuf::AExprKind::try_from(current.kind).unwrap_or(protobuf::AExprKind::Undefined);
        if kind != protobuf::AExprKind::AexprOp {
            return Err(TranslateError::UnsupportedExpression(format!(
                "unsupported expression kind: {kind:?}"
            )));
        }
        let operator = parse_operator_name(&current.name)?;
        let arrow = match operator.as_str() {
            "->" => JsonArrow::Json,
            "->>" => JsonArrow::Text,
            other => {
                return Err(TranslateError::UnsupportedExpression(format!(
                    "unsupported operator in expression: {other}"
                )));
            }
        };

        let rexpr = current
            .rexpr
            .as_deref()
            .ok_or_else(|| TranslateError::Parse("json path missing key operand".to_string()))?;
        let key = match rexpr.node.as_ref() {
            Some(PgNodeEnum::AConst(a_const)) => match literal_value(a_const)? {
                Value::String(text) => text,
                Value::Number(number) if number.is_i64() => number.to_string(),
                other => {
                    return Err(TranslateError::InvalidJsonPath(format!(
                        "path keys must be strings or integers, got {other}"
                    )));
                }
            },
            Some(other) => {
                return Err(TranslateError::InvalidJsonPath(format!(
                    "path keys must be literals, got {}",
                    node_enum_kind(other)
                )));
            }
            None => return Err(TranslateError::Parse("empty json path key".to_string())),
        };
        steps.push(JsonPathStep { arrow, key });

        let lexpr = current
            .lexpr
            .as_deref()
            .ok_or_else(|| TranslateError::Parse("json path missing base operand".to_string()))?;
        match lexpr.node.as_ref() {
            Some(PgNodeEnum::AExpr(inner)) => {
                let inner_operator = parse_operator_name(&inner.name)?;
                if inner_operator == "->" || inner_operator == "->>" {
                    current = inner;
                } else {
                    return Err(TranslateError::InvalidJsonPath(format!(
                        "json path must be rooted at a column, got operator {inner_operator}"
                    )));
                }
            }
            Some(PgNodeEnum::ColumnRef(column_ref)) => {
                let parts = column_ref_parts(column_ref)?;
                steps.reverse();
                return Ok((parts, steps));
            }
            Some(other) => {
                return Err(TranslateError::InvalidJsonPath(format!(
                    "json path must be rooted at a column, got {}",
                    node_enum_kind(other)
                )));
            }
            None => return Err(TranslateError::Parse("empty json path base".to_string())),
        }
    }
}

fn node_kind(node: &protobuf::Node) -> &'static str {
    match node.node.as_ref() {
        Some(inner) => node_enum_kind(inner),
        None => "empty",
    }
}

fn node_enum_kind(node: &PgNodeEnum) -> &'static str {
    match node {
        PgNodeEnum::SelectStmt(_) => "select_stmt",
        PgNodeEnum::RangeVar(_) => "range_var",
        PgNodeEnum::JoinExpr(_) => "join_expr",
        PgNodeEnum::RangeSubselect(_) => "range_subselect",
        PgNodeEnum::RangeFunction(_) => "range_function",
        PgNodeEnum::ResTarget(_) => "res_target",
        PgNodeEnum::ColumnRef(_) => "column_ref",
        PgNodeEnum::AStar(_) => "a_star",
        PgNodeEnum::AConst(_) => "a_const",
        PgNodeEnum::AExpr(_) => "a_expr",
        PgNodeEnum::BoolExpr(_) => "bool_expr",
        PgNodeEnum::BooleanTest(_) => "boolean_test",
        PgNodeEnum::NullTest(_) => "null_test",
        PgNodeEnum::TypeCast(_) => "type_cast",
        PgNodeEnum::FuncCall(_) => "func_call",
        PgNodeEnum::SubLink(_) => "sub_link",
        PgNodeEnum::SortBy(_) => "sort_by",
        PgNodeEnum::CaseExpr(_) => "case_expr",
        PgNodeEnum::CoalesceExpr(_) => "coalesce_expr",
        PgNodeEnum::List(_) => "list",
        _ => "other",
    }
}
