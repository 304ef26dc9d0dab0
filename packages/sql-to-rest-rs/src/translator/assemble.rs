fn translate_select_stmt(select: &protobuf::SelectStmt) -> TranslateResult<Statement> {
    reject_unsupported_clauses(select)?;

    if select.target_list.is_empty() {
        return Err(TranslateError::UnsupportedExpression(
            "SELECT list must name at least one target".to_string(),
        ));
    }

    let relations = parse_from_clause(&select.from_clause)?;

    let mut collector = TargetCollector::new(relations.joins.len());
    for target in &select.target_list {
        collector.add_res_target(target, &relations)?;
    }

    let filter = select
        .where_clause
        .as_ref()
        .map(|node| parse_where_clause(node.as_ref(), &relations))
        .transpose()?;

    let sorts = parse_sort_clause(&select.sort_clause, &relations)?;
    let limit = parse_limit(select)?;
    let offset = parse_offset(select)?;

    validate_group_by(select, &collector, &relations)?;

    let from = relations.primary.clone();
    let targets = collector.into_targets(&relations);

    Ok(Statement::Select {
        from,
        targets,
        filter,
        sorts,
        limit,
        offset,
    })
}

// GROUP BY is never rendered: PostgREST infers grouping from aggregates next
// to plain columns. The clause must still match the plain targets exactly.
fn validate_group_by(
    select: &protobuf::SelectStmt,
    collector: &TargetCollector,
    relations: &RelationTable,
) -> TranslateResult<()> {
    if select.group_clause.is_empty() {
        return Ok(());
    }
    if select.group_distinct {
        return Err(TranslateError::UnsupportedExpression(
            "GROUP BY DISTINCT is unsupported".to_string(),
        ));
    }
    if !collector.has_aggregate {
        return Err(TranslateError::GroupByWithoutAggregate);
    }
    if collector.has_star {
        return Err(TranslateError::UnsupportedExpression(
            "GROUP BY cannot be combined with a star projection".to_string(),
        ));
    }
    if collector.embedded_projection {
        return Err(TranslateError::UnsupportedExpression(
            "GROUP BY with joined projections is unsupported".to_string(),
        ));
    }

    let mut grouped = Vec::with_capacity(select.group_clause.len());
    for item in &select.group_clause {
        match item.node.as_ref() {
            Some(PgNodeEnum::ColumnRef(column_ref)) => {
                let mut parts = column_ref_parts(column_ref)?;
                let column = match parts.len() {
                    1 => parts.remove(0),
                    2 => {
                        let column = parts.remove(1);
                        let qualifier = parts.remove(0);
                        match relations.resolve(&qualifier) {
                            Some(RelationRef::Primary) => column,
                            Some(RelationRef::Joined(_)) => {
                                return Err(TranslateError::UnsupportedExpression(
                                    "GROUP BY on joined relations is unsupported".to_string(),
                                ));
                            }
                            None => {
                                return Err(TranslateError::ForeignColumnWithoutJoin(qualifier));
                            }
                        }
                    }
                    _ => {
                        return Err(TranslateError::UnsupportedExpression(
                            "schema-qualified column references are unsupported".to_string(),
                        ));
                    }
                };
                grouped.push(column);
            }
            Some(PgNodeEnum::TypeCast(_)) => {
                return Err(TranslateError::CastOutsideTarget(
                    "GROUP BY clause".to_string(),
                ));
            }
            Some(other) => {
                return Err(TranslateError::UnsupportedExpression(format!(
                    "GROUP BY items must be plain columns, got {}",
                    node_enum_kind(other)
                )));
            }
            None => return Err(TranslateError::Parse("empty GROUP BY item".to_string())),
        }
    }

    for column in &grouped {
        if !collector.primary_columns.contains(column) {
            return Err(TranslateError::GroupByMissingTarget(format!(
                "grouping column {column} is not selected"
            )));
        }
    }
    for column in &collector.primary_columns {
        if !grouped.contains(column) {
            return Err(TranslateError::GroupByMissingTarget(format!(
                "selected column {column} is missing from GROUP BY"
            )));
        }
    }

    Ok(())
}
