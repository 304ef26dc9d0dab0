fn parse_sort_clause(
    sort_clause: &[protobuf::Node],
    relations: &RelationTable,
) -> TranslateResult<Vec<Sort>> {
    let mut sorts = Vec::with_capacity(sort_clause.len());

    for item in sort_clause {
        let Some(PgNodeEnum::SortBy(sort_by)) = item.node.as_ref() else {
            return Err(TranslateError::Parse(
                "expected ORDER BY item in parsed SQL".to_string(),
            ));
        };

        if !sort_by.use_op.is_empty() {
            return Err(TranslateError::UnsupportedExpression(
                "ORDER BY USING is unsupported".to_string(),
            ));
        }

        let node = sort_by
            .node
            .as_deref()
            .ok_or_else(|| TranslateError::Parse("missing ORDER BY expression".to_string()))?;
        let (relation, column) = parse_sort_column(node, relations)?;

        let direction = match protobuf::SortByDir::try_from(sort_by.sortby_dir)
            .unwrap_or(protobuf::SortByDir::Undefined)
        {
            protobuf::SortByDir::SortbyDefault => None,
            protobuf::SortByDir::SortbyAsc => Some(SortDirection::Asc),
            protobuf::SortByDir::SortbyDesc => Some(SortDirection::Desc),
            other => {
                return Err(TranslateError::UnsupportedExpression(format!(
                    "unsupported sort direction: {other:?}"
                )));
            }
        };

        let nulls = match protobuf::SortByNulls::try_from(sort_by.sortby_nulls)
            .unwrap_or(protobuf::SortByNulls::Undefined)
        {
            protobuf::SortByNulls::SortbyNullsDefault => None,
            protobuf::SortByNulls::SortbyNullsFirst => Some(SortNulls::First),
            protobuf::SortByNulls::SortbyNullsLast => Some(SortNulls::Last),
            other => {
                return Err(TranslateError::UnsupportedExpression(format!(
                    "unsupported nulls ordering: {other:?}"
                )));
            }
        };

        sorts.push(Sort {
            column,
            relation,
            direction,
            nulls,
        });
    }

    Ok(sorts)
}

fn parse_sort_column(
    node: &protobuf::Node,
    relations: &RelationTable,
) -> TranslateResult<(Option<String>, String)> {
    match node.node.as_ref() {
        Some(PgNodeEnum::ColumnRef(column_ref)) => {
            let mut parts = column_ref_parts(column_ref)?;
            match parts.len() {
                1 => Ok((None, parts.remove(0))),
                2 => {
                    let column = parts.remove(1);
                    let qualifier = parts.remove(0);
                    match relations.resolve(&qualifier) {
                        Some(RelationRef::Primary) => Ok((None, column)),
                        Some(RelationRef::Joined(index)) => {
                            Ok((Some(relations.embed_path(index)), column))
                        }
                        None => Err(TranslateError::ForeignColumnWithoutJoin(qualifier)),
                    }
                }
                _ => Err(TranslateError::UnsupportedExpression(
                    "schema-qualified column references are unsupported".to_string(),
                )),
            }
        }
        Some(PgNodeEnum::TypeCast(_)) => Err(TranslateError::CastOutsideTarget(
            "ORDER BY clause".to_string(),
        )),
        Some(other) => Err(TranslateError::UnsupportedExpression(format!(
            "ORDER BY items must be plain columns, got {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty ORDER BY item".to_string())),
    }
}

fn parse_limit(select: &protobuf::SelectStmt) -> TranslateResult<Option<u64>> {
    let option = protobuf::LimitOption::try_from(select.limit_option)
        .unwrap_or(protobuf::LimitOption::Undefined);
    if option == protobuf::LimitOption::WithTies {
        return Err(TranslateError::InvalidLimit(
            "FETCH ... WITH TIES is unsupported".to_string(),
        ));
    }

    match &select.limit_count {
        None => Ok(None),
        Some(node) => {
            non_negative_integer(node.as_ref()).map_err(TranslateError::InvalidLimit)
        }
    }
}

fn parse_offset(select: &protobuf::SelectStmt) -> TranslateResult<Option<u64>> {
    match &select.limit_offset {
        None => Ok(None),
        Some(node) => {
            non_negative_integer(node.as_ref()).map_err(TranslateError::InvalidOffset)
        }
    }
}

fn non_negative_integer(node: &protobuf::Node) -> Result<Option<u64>, String> {
    match node.node.as_ref() {
        Some(PgNodeEnum::AConst(a_const)) => {
            // LIMIT ALL parses as a NULL constant.
            if a_const.isnull {
                return Ok(None);
            }
            match a_const.val.as_ref() {
                Some(protobuf::a_const::Val::Ival(number)) => {
                    if number.ival < 0 {
                        Err(format!("{} is negative", number.ival))
                    } else {
                        Ok(Some(number.ival as u64))
                    }
                }
                Some(protobuf::a_const::Val::Fval(number)) => {
                    Err(format!("{} is not an integer", number.fval))
                }
                Some(protobuf::a_const::Val::Sval(value)) => {
                    Err(format!("'{}' is not an integer", value.sval))
                }
                Some(_) => Err("expected an integer literal".to_string()),
                None => Ok(None),
            }
        }
        Some(other) => Err(format!(
            "expected an integer literal, got {}",
            node_enum_kind(other)
        )),
        None => Err("empty literal".to_string()),
    }
}
