fn parse_select_statement(sql: &str) -> TranslateResult<Statement> {
    let parsed = pg_query::parse(sql)
        .map_err(|e| TranslateError::Parse(format!("pg_query parse error: {e}")))?;

    if parsed.protobuf.stmts.len() != 1 {
        return Err(TranslateError::UnsupportedExpression(
            "exactly one SQL statement is supported".to_string(),
        ));
    }

    let raw_stmt = parsed
        .protobuf
        .stmts
        .first()
        .ok_or_else(|| TranslateError::Parse("missing parsed SQL statement".to_string()))?;
    let stmt = raw_stmt
        .stmt
        .as_ref()
        .and_then(|node| node.node.as_ref())
        .ok_or_else(|| TranslateError::Parse("missing SQL statement AST".to_string()))?;

    let select = match stmt {
        PgNodeEnum::SelectStmt(select) => select,
        other => {
            return Err(TranslateError::UnsupportedExpression(format!(
                "only SELECT statements are supported, got {}",
                node_enum_kind(other)
            )));
        }
    };

    translate_select_stmt(select)
}

fn reject_unsupported_clauses(select: &protobuf::SelectStmt) -> TranslateResult<()> {
    if select.larg.is_some() || select.rarg.is_some() || select.op != 1 {
        return Err(TranslateError::UnsupportedExpression(
            "set operations are unsupported".to_string(),
        ));
    }
    if !select.values_lists.is_empty() {
        return Err(TranslateError::UnsupportedExpression(
            "VALUES lists are unsupported".to_string(),
        ));
    }
    if select.with_clause.is_some() {
        return Err(TranslateError::UnsupportedExpression(
            "WITH clauses are unsupported".to_string(),
        ));
    }
    if !select.distinct_clause.is_empty() {
        return Err(TranslateError::UnsupportedExpression(
            "SELECT DISTINCT is unsupported".to_string(),
        ));
    }
    if !select.window_clause.is_empty() {
        return Err(TranslateError::UnsupportedExpression(
            "window clauses are unsupported".to_string(),
        ));
    }
    if !select.locking_clause.is_empty() {
        return Err(TranslateError::UnsupportedExpression(
            "row locking clauses are unsupported".to_string(),
        ));
    }
    if select.into_clause.is_some() {
        return Err(TranslateError::UnsupportedExpression(
            "SELECT INTO is unsupported".to_string(),
        ));
    }
    if select.having_clause.is_some() {
        return Err(TranslateError::HavingUnsupported);
    }

    Ok(())
}
