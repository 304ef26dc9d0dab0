#[derive(Debug, Clone)]
struct RelationTable {
    primary: Relation,
    joins: Vec<JoinedRelation>,
}

#[derive(Debug, Clone)]
struct JoinedRelation {
    relation: String,
    alias: Option<String>,
    join_type: JoinType,
    qualifier: JoinQualifier,
    parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelationRef {
    Primary,
    Joined(usize),
}

#[derive(Debug, Clone)]
struct JoinOperand {
    qualifier: Option<String>,
    column: String,
}

impl RelationTable {
    fn resolve(&self, name: &str) -> Option<RelationRef> {
        resolve_reference(name, &self.primary, &self.joins)
    }

    fn join_name(&self, index: usize) -> &str {
        let join = &self.joins[index];
        join.alias.as_deref().unwrap_or(&join.relation)
    }

    // Dotted embed path from the primary relation down to this join, used as
    // the filter key prefix for columns on joined relations.
    fn embed_path(&self, index: usize) -> String {
        let mut parts = vec![self.join_name(index)];
        let mut current = index;
        while let Some(parent) = self.joins[current].parent {
            current = parent;
            parts.push(self.join_name(current));
        }
        parts.reverse();
        parts.join(".")
    }
}

fn resolve_reference(
    name: &str,
    primary: &Relation,
    joins: &[JoinedRelation],
) -> Option<RelationRef> {
    let primary_name = primary.alias.as_deref().unwrap_or(&primary.name);
    if name == primary_name {
        return Some(RelationRef::Primary);
    }
    joins
        .iter()
        .position(|join| join.alias.as_deref().unwrap_or(&join.relation) == name)
        .map(RelationRef::Joined)
}

fn parse_from_clause(from_clause: &[protobuf::Node]) -> TranslateResult<RelationTable> {
    if from_clause.is_empty() {
        return Err(TranslateError::MissingFromClause);
    }
    if from_clause.len() > 1 {
        return Err(TranslateError::MultipleFromRelations(format!(
            "FROM lists {} relations",
            from_clause.len()
        )));
    }

    let mut primary = None;
    let mut joins = Vec::new();
    collect_from_item(&from_clause[0], &mut primary, &mut joins)?;
    let primary = primary.ok_or(TranslateError::MissingFromClause)?;

    Ok(RelationTable { primary, joins })
}

fn collect_from_item(
    node: &protobuf::Node,
    primary: &mut Option<Relation>,
    joins: &mut Vec<JoinedRelation>,
) -> TranslateResult<()> {
    match node.node.as_ref() {
        Some(PgNodeEnum::RangeVar(range)) => {
            if primary.is_some() {
                return Err(TranslateError::Parse(
                    "unexpected relation outside a join".to_string(),
                ));
            }
            *primary = Some(range_var_relation(range)?);
            Ok(())
        }
        Some(PgNodeEnum::JoinExpr(join)) => {
            let left = join
                .larg
                .as_ref()
                .ok_or_else(|| TranslateError::Parse("JOIN is missing left relation".to_string()))?;
            collect_from_item(left.as_ref(), primary, joins)?;
            let primary_rel = primary
                .as_ref()
                .ok_or_else(|| TranslateError::Parse("JOIN without a base relation".to_string()))?;

            let join_type = match protobuf::JoinType::try_from(join.jointype)
                .unwrap_or(protobuf::JoinType::Undefined)
            {
                protobuf::JoinType::JoinInner => JoinType::Inner,
                protobuf::JoinType::JoinLeft => JoinType::Left,
                other => {
                    return Err(TranslateError::UnsupportedJoinType(format!("{other:?}")));
                }
            };
            if join.is_natural {
                return Err(TranslateError::NonEquiJoin(
                    "NATURAL joins have no explicit equality".to_string(),
                ));
            }
            if !join.using_clause.is_empty() || join.join_using_alias.is_some() {
                return Err(TranslateError::NonEquiJoin(
                    "USING clauses are unsupported, spell out the equality".to_string(),
                ));
            }
            if join.alias.is_some() {
                return Err(TranslateError::UnsupportedExpression(
                    "parenthesized join aliases are unsupported".to_string(),
                ));
            }

            let right = join
                .rarg
                .as_ref()
                .ok_or_else(|| TranslateError::Parse("JOIN is missing right relation".to_string()))?;
            let joined = match right.node.as_ref() {
                Some(PgNodeEnum::RangeVar(range)) => range_var_relation(range)?,
                Some(other) => {
                    return Err(TranslateError::UnsupportedExpression(format!(
                        "join relation must be a table, got {}",
                        node_enum_kind(other)
                    )));
                }
                None => return Err(TranslateError::Parse("empty join relation".to_string())),
            };

            let quals = join.quals.as_ref().ok_or_else(|| {
                TranslateError::NonEquiJoin("join requires an ON equality".to_string())
            })?;
            let (qualifier, parent) =
                parse_join_qualifier(quals.as_ref(), &joined, primary_rel, joins.as_slice())?;

            joins.push(JoinedRelation {
                relation: joined.name,
                alias: joined.alias,
                join_type,
                qualifier,
                parent,
            });
            Ok(())
        }
        Some(PgNodeEnum::RangeSubselect(_)) => Err(TranslateError::UnsupportedExpression(
            "subqueries in FROM are unsupported".to_string(),
        )),
        Some(PgNodeEnum::RangeFunction(_)) => Err(TranslateError::UnsupportedExpression(
            "table functions in FROM are unsupported".to_string(),
        )),
        Some(other) => Err(TranslateError::UnsupportedExpression(format!(
            "unsupported FROM clause source: {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty FROM clause node".to_string())),
    }
}

fn range_var_relation(range: &protobuf::RangeVar) -> TranslateResult<Relation> {
    let alias = match &range.alias {
        Some(alias) => {
            if !alias.colnames.is_empty() {
                return Err(TranslateError::UnsupportedExpression(
                    "column aliases on relations are unsupported".to_string(),
                ));
            }
            Some(alias.aliasname.clone()).filter(|alias| !alias.is_empty())
        }
        None => None,
    };

    Ok(Relation {
        name: range.relname.clone(),
        alias,
    })
}

fn parse_join_qualifier(
    node: &protobuf::Node,
    joined: &Relation,
    primary: &Relation,
    joins: &[JoinedRelation],
) -> TranslateResult<(JoinQualifier, Option<usize>)> {
    let Some(PgNodeEnum::AExpr(a_expr)) = node.node.as_ref() else {
        return Err(TranslateError::NonEquiJoin(format!(
            "expected a single equality, got {}",
            node_kind(node)
        )));
    };

    let kind = protobuf::AExprKind::try_from(a_expr.kind).unwrap_or(protobuf::AExprKind::Undefined);
    if kind != protobuf::AExprKind::AexprOp {
        return Err(TranslateError::NonEquiJoin(format!(
            "unsupported join condition kind: {kind:?}"
        )));
    }
    let operator = parse_operator_name(&a_expr.name)?;
    if operator != "=" {
        return Err(TranslateError::NonEquiJoin(format!(
            "join operator must be =, got {operator}"
        )));
    }

    let left = join_operand(a_expr.lexpr.as_deref())?;
    let right = join_operand(a_expr.rexpr.as_deref())?;

    let joined_name = joined.alias.as_deref().unwrap_or(&joined.name);
    let left_is_joined = left.qualifier.as_deref() == Some(joined_name);
    let right_is_joined = right.qualifier.as_deref() == Some(joined_name);

    let (own, parent_side) = match (left_is_joined, right_is_joined) {
        (true, true) => return Err(TranslateError::SelfJoinUnsupported(joined.name.clone())),
        (true, false) => (left, right),
        (false, true) => (right, left),
        (false, false) => {
            return Err(TranslateError::NonEquiJoin(format!(
                "join condition must reference {joined_name} exactly once"
            )));
        }
    };

    let parent_ref = match parent_side.qualifier.as_deref() {
        None => RelationRef::Primary,
        Some(name) => resolve_reference(name, primary, joins)
            .ok_or_else(|| TranslateError::UnknownRelation(name.to_string()))?,
    };

    let (parent_relation, parent) = match parent_ref {
        RelationRef::Primary => (
            primary.alias.clone().unwrap_or_else(|| primary.name.clone()),
            None,
        ),
        RelationRef::Joined(index) => {
            let ancestor = &joins[index];
            (
                ancestor
                    .alias
                    .clone()
                    .unwrap_or_else(|| ancestor.relation.clone()),
                Some(index),
            )
        }
    };

    Ok((
        JoinQualifier {
            column: own.column,
            parent_relation,
            parent_column: parent_side.column,
        },
        parent,
    ))
}

fn join_operand(node: Option<&protobuf::Node>) -> TranslateResult<JoinOperand> {
    let node =
        node.ok_or_else(|| TranslateError::Parse("join equality missing an operand".to_string()))?;

    match node.node.as_ref() {
        Some(PgNodeEnum::ColumnRef(column_ref)) => {
            let mut parts = column_ref_parts(column_ref)?;
            match parts.len() {
                1 => Ok(JoinOperand {
                    qualifier: None,
                    column: parts.remove(0),
                }),
                2 => {
                    let column = parts.remove(1);
                    Ok(JoinOperand {
                        qualifier: Some(parts.remove(0)),
                        column,
                    })
                }
                _ => Err(TranslateError::UnsupportedExpression(
                    "schema-qualified join columns are unsupported".to_string(),
                )),
            }
        }
        Some(PgNodeEnum::AConst(_)) => Err(TranslateError::ConstantInJoin),
        Some(PgNodeEnum::TypeCast(_)) => Err(TranslateError::CastOutsideTarget(
            "join qualifier".to_string(),
        )),
        Some(other) => Err(TranslateError::NonEquiJoin(format!(
            "join operand must be a column, got {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty join operand".to_string())),
    }
}
