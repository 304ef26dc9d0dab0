fn parse_where_clause(
    node: &protobuf::Node,
    relations: &RelationTable,
) -> TranslateResult<LogicalExpression> {
    parse_filter_expr(node, relations)
}

fn parse_filter_expr(
    node: &protobuf::Node,
    relations: &RelationTable,
) -> TranslateResult<LogicalExpression> {
    match node.node.as_ref() {
        Some(PgNodeEnum::BoolExpr(bool_expr)) => parse_bool_filter(bool_expr, relations),
        Some(PgNodeEnum::AExpr(a_expr)) => parse_comparison(a_expr, relations),
        Some(PgNodeEnum::NullTest(null_test)) => parse_null_filter(null_test, relations),
        Some(PgNodeEnum::BooleanTest(_)) => Err(TranslateError::UnsupportedOperator(
            "IS TRUE/IS FALSE".to_string(),
        )),
        Some(PgNodeEnum::TypeCast(_)) => {
            Err(TranslateError::CastOutsideTarget("WHERE clause".to_string()))
        }
        Some(PgNodeEnum::ColumnRef(_)) => Err(TranslateError::UnsupportedExpression(
            "bare column filters are unsupported, compare against a literal".to_string(),
        )),
        Some(PgNodeEnum::SubLink(_)) => Err(TranslateError::UnsupportedExpression(
            "subqueries in WHERE are unsupported".to_string(),
        )),
        Some(other) => Err(TranslateError::UnsupportedExpression(format!(
            "unsupported filter expression: {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty filter expression".to_string())),
    }
}

fn parse_bool_filter(
    bool_expr: &protobuf::BoolExpr,
    relations: &RelationTable,
) -> TranslateResult<LogicalExpression> {
    let kind = protobuf::BoolExprType::try_from(bool_expr.boolop)
        .unwrap_or(protobuf::BoolExprType::Undefined);

    match kind {
        protobuf::BoolExprType::AndExpr | protobuf::BoolExprType::OrExpr => {
            let operator = if kind == protobuf::BoolExprType::AndExpr {
                LogicalOperator::And
            } else {
                LogicalOperator::Or
            };

            let mut values = Vec::with_capacity(bool_expr.args.len());
            for arg in &bool_expr.args {
                values.push(parse_filter_expr(arg, relations)?);
            }
            if values.is_empty() {
                return Err(TranslateError::Parse(
                    "boolean expression has no arguments".to_string(),
                ));
            }

            Ok(LogicalExpression::Logical {
                operator,
                negate: false,
                values,
            })
        }
        protobuf::BoolExprType::NotExpr => {
            if bool_expr.args.len() != 1 {
                return Err(TranslateError::Parse(
                    "NOT expression must have exactly one argument".to_string(),
                ));
            }
            Ok(negate_filter(parse_filter_expr(
                &bool_expr.args[0],
                relations,
            )?))
        }
        _ => Err(TranslateError::UnsupportedExpression(
            "unsupported boolean expression".to_string(),
        )),
    }
}

// NOT toggles the negate flag in place, so double negation cancels and the
// tree shape survives into PostgREST's not.and(...)/not.or(...) combinators.
fn negate_filter(filter: LogicalExpression) -> LogicalExpression {
    match filter {
        LogicalExpression::Logical {
            operator,
            negate,
            values,
        } => LogicalExpression::Logical {
            operator,
            negate: !negate,
            values,
        },
        LogicalExpression::Column {
            column,
            operator,
            value,
            negate,
        } => LogicalExpression::Column {
            column,
            operator,
            value,
            negate: !negate,
        },
    }
}

fn parse_comparison(
    a_expr: &protobuf::AExpr,
    relations: &RelationTable,
) -> TranslateResult<LogicalExpression> {
    let kind = protobuf::AExprKind::try_from(a_expr.kind).unwrap_or(protobuf::AExprKind::Undefined);

    match kind {
        protobuf::AExprKind::AexprOp
        | protobuf::AExprKind::AexprLike
        | protobuf::AExprKind::AexprIlike => {
            let operator = parse_operator_name(&a_expr.name)?;
            if operator == "->" || operator == "->>" {
                return Err(TranslateError::UnsupportedExpression(
                    "a bare json path cannot be used as a filter".to_string(),
                ));
            }

            let lexpr = a_expr.lexpr.as_deref().ok_or_else(|| {
                TranslateError::UnsupportedOperator(format!("unary {operator}"))
            })?;
            let rexpr = a_expr
                .rexpr
                .as_deref()
                .ok_or_else(|| TranslateError::Parse("comparison missing right operand".to_string()))?;

            let column = filter_column_key(lexpr, relations)?;

            if operator == "@@" {
                return parse_text_search(column, rexpr);
            }

            let Some((mapped, negate)) = map_binary_operator(&operator) else {
                return Err(TranslateError::UnsupportedOperator(operator));
            };

            let value = parse_filter_literal(rexpr)?;
            let value = match mapped {
                ColumnOperator::Like | ColumnOperator::Ilike => {
                    let pattern = literal_pattern(&value, "pattern matching")?;
                    Value::String(translate_like_pattern(pattern))
                }
                ColumnOperator::Match | ColumnOperator::Imatch => {
                    literal_pattern(&value, "regular expression matching")?;
                    value
                }
                _ => {
                    if value.is_null() {
                        return Err(TranslateError::UnsupportedExpression(
                            "comparisons to NULL must use IS NULL".to_string(),
                        ));
                    }
                    value
                }
            };

            Ok(LogicalExpression::Column {
                column,
                operator: mapped,
                value,
                negate,
            })
        }
        protobuf::AExprKind::AexprIn => {
            let operator = parse_operator_name(&a_expr.name)?;
            let negate = match operator.as_str() {
                "=" => false,
                "<>" => true,
                _ => return Err(TranslateError::UnsupportedOperator(operator)),
            };

            let lexpr = a_expr
                .lexpr
                .as_deref()
                .ok_or_else(|| TranslateError::Parse("IN missing left operand".to_string()))?;
            let rexpr = a_expr
                .rexpr
                .as_deref()
                .ok_or_else(|| TranslateError::Parse("IN missing value list".to_string()))?;

            let column = filter_column_key(lexpr, relations)?;
            let Some(PgNodeEnum::List(list)) = rexpr.node.as_ref() else {
                return Err(TranslateError::UnsupportedExpression(
                    "IN requires a literal value list".to_string(),
                ));
            };

            let mut values = Vec::with_capacity(list.items.len());
            for item in &list.items {
                let value = parse_filter_literal(item)?;
                if value.is_null() {
                    return Err(TranslateError::UnsupportedExpression(
                        "NULL cannot appear in an IN list".to_string(),
                    ));
                }
                values.push(value);
            }

            Ok(LogicalExpression::Column {
                column,
                operator: ColumnOperator::In,
                value: Value::Array(values),
                negate,
            })
        }
        protobuf::AExprKind::AexprBetween
        | protobuf::AExprKind::AexprNotBetween
        | protobuf::AExprKind::AexprBetweenSym
        | protobuf::AExprKind::AexprNotBetweenSym => {
            Err(TranslateError::UnsupportedOperator("BETWEEN".to_string()))
        }
        protobuf::AExprKind::AexprSimilar => {
            Err(TranslateError::UnsupportedOperator("SIMILAR TO".to_string()))
        }
        protobuf::AExprKind::AexprDistinct | protobuf::AExprKind::AexprNotDistinct => Err(
            TranslateError::UnsupportedOperator("IS DISTINCT FROM".to_string()),
        ),
        other => Err(TranslateError::UnsupportedExpression(format!(
            "unsupported comparison kind: {other:?}"
        ))),
    }
}

fn parse_text_search(column: String, node: &protobuf::Node) -> TranslateResult<LogicalExpression> {
    let (operator, value) = match node.node.as_ref() {
        Some(PgNodeEnum::FuncCall(func_call)) => {
            let name = parse_name_from_nodes(&func_call.funcname)?;
            let name = name.split('.').next_back().unwrap_or(&name).to_ascii_lowercase();
            let operator = match name.as_str() {
                "to_tsquery" => ColumnOperator::Fts,
                "plainto_tsquery" => ColumnOperator::Plfts,
                "phraseto_tsquery" => ColumnOperator::Phfts,
                "websearch_to_tsquery" => ColumnOperator::Wfts,
                other => {
                    return Err(TranslateError::UnsupportedExpression(format!(
                        "unsupported text search function: {other}"
                    )));
                }
            };
            if func_call.args.len() != 1 {
                return Err(TranslateError::UnsupportedExpression(
                    "text search functions take exactly one query argument".to_string(),
                ));
            }
            (operator, parse_filter_literal(&func_call.args[0])?)
        }
        Some(PgNodeEnum::AConst(_)) => (ColumnOperator::Fts, parse_filter_literal(node)?),
        _ => {
            return Err(TranslateError::UnsupportedExpression(
                "unsupported text search query".to_string(),
            ));
        }
    };

    literal_pattern(&value, "text search")?;
    Ok(LogicalExpression::Column {
        column,
        operator,
        value,
        negate: false,
    })
}

fn map_binary_operator(operator: &str) -> Option<(ColumnOperator, bool)> {
    let mapped = match operator {
        "=" => (ColumnOperator::Eq, false),
        "<>" | "!=" => (ColumnOperator::Neq, false),
        ">" => (ColumnOperator::Gt, false),
        ">=" => (ColumnOperator::Gte, false),
        "<" => (ColumnOperator::Lt, false),
        "<=" => (ColumnOperator::Lte, false),
        "~~" => (ColumnOperator::Like, false),
        "!~~" => (ColumnOperator::Like, true),
        "~~*" => (ColumnOperator::Ilike, false),
        "!~~*" => (ColumnOperator::Ilike, true),
        "~" => (ColumnOperator::Match, false),
        "!~" => (ColumnOperator::Match, true),
        "~*" => (ColumnOperator::Imatch, false),
        "!~*" => (ColumnOperator::Imatch, true),
        "@>" => (ColumnOperator::Cs, false),
        "<@" => (ColumnOperator::Cd, false),
        "&&" => (ColumnOperator::Ov, false),
        "<<" => (ColumnOperator::Sl, false),
        ">>" => (ColumnOperator::Sr, false),
        "&<" => (ColumnOperator::Nxr, false),
        "&>" => (ColumnOperator::Nxl, false),
        "-|-" => (ColumnOperator::Adj, false),
        _ => return None,
    };
    Some(mapped)
}

fn parse_null_filter(
    null_test: &protobuf::NullTest,
    relations: &RelationTable,
) -> TranslateResult<LogicalExpression> {
    let arg = null_test
        .arg
        .as_deref()
        .ok_or_else(|| TranslateError::Parse("NULL test missing argument".to_string()))?;
    let column = filter_column_key(arg, relations)?;

    let kind = protobuf::NullTestType::try_from(null_test.nulltesttype)
        .unwrap_or(protobuf::NullTestType::Undefined);
    let negate = match kind {
        protobuf::NullTestType::IsNull => false,
        protobuf::NullTestType::IsNotNull => true,
        _ => {
            return Err(TranslateError::UnsupportedExpression(
                "unsupported NULL test".to_string(),
            ));
        }
    };

    Ok(LogicalExpression::Column {
        column,
        operator: ColumnOperator::Is,
        value: Value::Null,
        negate,
    })
}

fn filter_column_key(node: &protobuf::Node, relations: &RelationTable) -> TranslateResult<String> {
    match node.node.as_ref() {
        Some(PgNodeEnum::ColumnRef(column_ref)) => {
            let parts = column_ref_parts(column_ref)?;
            resolved_column_key(parts, Vec::new(), relations)
        }
        Some(PgNodeEnum::AExpr(a_expr)) => {
            let operator = parse_operator_name(&a_expr.name)?;
            if operator == "->" || operator == "->>" {
                let (base, steps) = parse_json_path(a_expr)?;
                resolved_column_key(base, steps, relations)
            } else {
                Err(TranslateError::UnsupportedOperator(operator))
            }
        }
        Some(PgNodeEnum::TypeCast(_)) => {
            Err(TranslateError::CastOutsideTarget("WHERE clause".to_string()))
        }
        Some(PgNodeEnum::AConst(_)) => Err(TranslateError::UnsupportedExpression(
            "filters must compare a column to a literal".to_string(),
        )),
        Some(PgNodeEnum::FuncCall(_)) => Err(TranslateError::UnsupportedExpression(
            "function calls are unsupported in filters".to_string(),
        )),
        Some(other) => Err(TranslateError::UnsupportedExpression(format!(
            "unsupported filter operand: {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty filter operand".to_string())),
    }
}

// Columns on joined relations filter through their dotted embed path, e.g.
// authors.name or authors.publishers.name.
fn resolved_column_key(
    mut parts: Vec<String>,
    steps: Vec<JsonPathStep>,
    relations: &RelationTable,
) -> TranslateResult<String> {
    let mut key = match parts.len() {
        1 => parts.remove(0),
        2 => {
            let column = parts.remove(1);
            let qualifier = parts.remove(0);
            match relations.resolve(&qualifier) {
                Some(RelationRef::Primary) => column,
                Some(RelationRef::Joined(index)) => {
                    format!("{}.{column}", relations.embed_path(index))
                }
                None => return Err(TranslateError::ForeignColumnWithoutJoin(qualifier)),
            }
        }
        _ => {
            return Err(TranslateError::UnsupportedExpression(
                "schema-qualified column references are unsupported".to_string(),
            ));
        }
    };

    for step in &steps {
        key.push_str(step.arrow.as_str());
        key.push_str(&step.key);
    }

    Ok(key)
}

fn parse_filter_literal(node: &protobuf::Node) -> TranslateResult<Value> {
    match node.node.as_ref() {
        Some(PgNodeEnum::AConst(a_const)) => literal_value(a_const),
        Some(PgNodeEnum::ColumnRef(_)) => Err(TranslateError::UnsupportedExpression(
            "column-to-column comparisons are unsupported".to_string(),
        )),
        Some(PgNodeEnum::TypeCast(_)) => {
            Err(TranslateError::CastOutsideTarget("WHERE clause".to_string()))
        }
        Some(PgNodeEnum::FuncCall(_)) => Err(TranslateError::UnsupportedExpression(
            "function calls are unsupported in filter values".to_string(),
        )),
        Some(other) => Err(TranslateError::UnsupportedExpression(format!(
            "filter values must be literals, got {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty filter value".to_string())),
    }
}

fn literal_pattern<'a>(value: &'a Value, what: &str) -> TranslateResult<&'a String> {
    match value {
        Value::String(pattern) => Ok(pattern),
        _ => Err(TranslateError::UnsupportedExpression(format!(
            "{what} requires a string literal"
        ))),
    }
}

// SQL `%` becomes the PostgREST `*` wildcard; `_` and backslash escapes pass
// through untouched.
fn translate_like_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '%' => out.push('*'),
            other => out.push(other),
        }
    }
    out
}
