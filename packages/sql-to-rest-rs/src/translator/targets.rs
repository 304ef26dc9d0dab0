#[derive(Debug, Clone)]
enum Entry {
    Target(Target),
    Child(usize),
}

// Collects select-list targets per relation. Columns on joined relations are
// lifted into the embed for that relation; an embed is mounted into its
// parent's entry list at the position of its first projected column.
#[derive(Debug)]
struct TargetCollector {
    primary_entries: Vec<Entry>,
    join_entries: Vec<Vec<Entry>>,
    mounted: Vec<bool>,
    has_aggregate: bool,
    has_star: bool,
    embedded_projection: bool,
    primary_columns: Vec<String>,
}

impl TargetCollector {
    fn new(join_count: usize) -> Self {
        Self {
            primary_entries: Vec::new(),
            join_entries: vec![Vec::new(); join_count],
            mounted: vec![false; join_count],
            has_aggregate: false,
            has_star: false,
            embedded_projection: false,
            primary_columns: Vec::new(),
        }
    }

    fn add_res_target(
        &mut self,
        node: &protobuf::Node,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        let Some(PgNodeEnum::ResTarget(target)) = node.node.as_ref() else {
            return Err(TranslateError::Parse(
                "expected SELECT target item".to_string(),
            ));
        };

        if !target.indirection.is_empty() {
            return Err(TranslateError::UnsupportedExpression(
                "SELECT target indirection is unsupported".to_string(),
            ));
        }

        let alias = if target.name.is_empty() {
            None
        } else {
            Some(target.name.clone())
        };
        let value = target
            .val
            .as_ref()
            .ok_or_else(|| TranslateError::Parse("missing SELECT target value".to_string()))?;

        self.add_target_value(value.as_ref(), alias, relations)
    }

    fn add_target_value(
        &mut self,
        node: &protobuf::Node,
        alias: Option<String>,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        match node.node.as_ref() {
            Some(PgNodeEnum::ColumnRef(column_ref)) => {
                self.add_column_ref(column_ref, alias, None, Vec::new(), relations)
            }
            Some(PgNodeEnum::AExpr(a_expr)) => {
                let (base, steps) = parse_json_path(a_expr)?;
                self.add_column_parts(base, alias, None, steps, relations)
            }
            Some(PgNodeEnum::TypeCast(type_cast)) => self.add_type_cast(type_cast, alias, relations),
            Some(PgNodeEnum::FuncCall(func_call)) => {
                self.add_aggregate(func_call, alias, None, relations)
            }
            Some(PgNodeEnum::AConst(_)) => Err(TranslateError::UnsupportedExpression(
                "literal select targets are unsupported".to_string(),
            )),
            Some(other) => Err(TranslateError::UnsupportedExpression(format!(
                "unsupported select target: {}",
                node_enum_kind(other)
            ))),
            None => Err(TranslateError::Parse("empty select target".to_string())),
        }
    }

    fn add_type_cast(
        &mut self,
        type_cast: &protobuf::TypeCast,
        alias: Option<String>,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        let cast = cast_name(type_cast)?;
        let arg = type_cast
            .arg
            .as_ref()
            .ok_or_else(|| TranslateError::Parse("CAST missing value expression".to_string()))?;

        match arg.node.as_ref() {
            Some(PgNodeEnum::ColumnRef(column_ref)) => {
                self.add_column_ref(column_ref, alias, Some(cast), Vec::new(), relations)
            }
            Some(PgNodeEnum::AExpr(a_expr)) => {
                let (base, steps) = parse_json_path(a_expr)?;
                self.add_column_parts(base, alias, Some(cast), steps, relations)
            }
            Some(PgNodeEnum::FuncCall(func_call)) => {
                self.add_aggregate(func_call, alias, Some(cast), relations)
            }
            Some(PgNodeEnum::TypeCast(_)) => Err(TranslateError::UnsupportedExpression(
                "nested casts are unsupported".to_string(),
            )),
            Some(PgNodeEnum::AConst(_)) => Err(TranslateError::UnsupportedExpression(
                "literal select targets are unsupported".to_string(),
            )),
            Some(other) => Err(TranslateError::UnsupportedExpression(format!(
                "unsupported cast argument: {}",
                node_enum_kind(other)
            ))),
            None => Err(TranslateError::Parse("empty cast argument".to_string())),
        }
    }

    fn add_column_ref(
        &mut self,
        column_ref: &protobuf::ColumnRef,
        alias: Option<String>,
        cast: Option<String>,
        json_path: Vec<JsonPathStep>,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        let is_star = matches!(
            column_ref.fields.last().and_then(|field| field.node.as_ref()),
            Some(PgNodeEnum::AStar(_))
        );

        if is_star {
            if alias.is_some() {
                return Err(TranslateError::UnsupportedExpression(
                    "star projection cannot be aliased".to_string(),
                ));
            }
            if cast.is_some() {
                return Err(TranslateError::UnsupportedExpression(
                    "star projection cannot be cast".to_string(),
                ));
            }

            let mut qualifier = Vec::new();
            for field in &column_ref.fields[..column_ref.fields.len() - 1] {
                match field.node.as_ref() {
                    Some(PgNodeEnum::String(value)) => qualifier.push(value.sval.clone()),
                    _ => {
                        return Err(TranslateError::UnsupportedExpression(
                            "unsupported star qualifier".to_string(),
                        ));
                    }
                }
            }

            return match qualifier.len() {
                0 => {
                    self.has_star = true;
                    self.primary_entries.push(Entry::Target(Target::Star));
                    Ok(())
                }
                1 => match relations.resolve(&qualifier[0]) {
                    Some(RelationRef::Primary) => {
                        self.has_star = true;
                        self.primary_entries.push(Entry::Target(Target::Star));
                        Ok(())
                    }
                    Some(RelationRef::Joined(index)) => {
                        self.mount(index, relations);
                        self.embedded_projection = true;
                        self.join_entries[index].push(Entry::Target(Target::Star));
                        Ok(())
                    }
                    None => Err(TranslateError::UnknownRelation(qualifier[0].clone())),
                },
                _ => Err(TranslateError::UnsupportedExpression(
                    "schema-qualified star projections are unsupported".to_string(),
                )),
            };
        }

        let parts = column_ref_parts(column_ref)?;
        self.add_column_parts(parts, alias, cast, json_path, relations)
    }

    fn add_column_parts(
        &mut self,
        mut parts: Vec<String>,
        alias: Option<String>,
        cast: Option<String>,
        json_path: Vec<JsonPathStep>,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        let (destination, relation, column) = match parts.len() {
            1 => (RelationRef::Primary, None, parts.remove(0)),
            2 => {
                let column = parts.remove(1);
                let qualifier = parts.remove(0);
                match relations.resolve(&qualifier) {
                    Some(RelationRef::Primary) => (RelationRef::Primary, None, column),
                    Some(RelationRef::Joined(index)) => {
                        (RelationRef::Joined(index), Some(qualifier), column)
                    }
                    None => return Err(TranslateError::UnknownRelation(qualifier)),
                }
            }
            _ => {
                return Err(TranslateError::UnsupportedExpression(
                    "schema-qualified column references are unsupported".to_string(),
                ));
            }
        };

        let alias = alias.filter(|alias| *alias != column);
        let target = Target::Column(ColumnRef {
            relation,
            column: column.clone(),
            alias,
            cast,
            json_path,
        });

        match destination {
            RelationRef::Primary => {
                self.primary_columns.push(column);
                self.primary_entries.push(Entry::Target(target));
            }
            RelationRef::Joined(index) => {
                self.mount(index, relations);
                self.embedded_projection = true;
                self.join_entries[index].push(Entry::Target(target));
            }
        }

        Ok(())
    }

    fn add_aggregate(
        &mut self,
        func_call: &protobuf::FuncCall,
        alias: Option<String>,
        output_cast: Option<String>,
        relations: &RelationTable,
    ) -> TranslateResult<()> {
        if func_call.over.is_some() {
            return Err(TranslateError::UnsupportedExpression(
                "window functions are unsupported".to_string(),
            ));
        }

        let name = parse_name_from_nodes(&func_call.funcname)?;
        let name = name.split('.').next_back().unwrap_or(&name).to_ascii_lowercase();
        let function = match name.as_str() {
            "avg" => AggregateFunction::Avg,
            "count" => AggregateFunction::Count,
            "max" => AggregateFunction::Max,
            "min" => AggregateFunction::Min,
            "sum" => AggregateFunction::Sum,
            _ => return Err(TranslateError::UnsupportedAggregate(name)),
        };

        if func_call.agg_star {
            return Err(TranslateError::AggregateArgumentShape(
                "star arguments are unsupported, select a column".to_string(),
            ));
        }
        if func_call.agg_distinct {
            return Err(TranslateError::AggregateArgumentShape(
                "DISTINCT aggregates are unsupported".to_string(),
            ));
        }
        if !func_call.agg_order.is_empty()
            || func_call.agg_filter.is_some()
            || func_call.agg_within_group
        {
            return Err(TranslateError::AggregateArgumentShape(
                "ordered or filtered aggregates are unsupported".to_string(),
            ));
        }
        if func_call.args.len() != 1 {
            return Err(TranslateError::AggregateArgumentShape(format!(
                "{name} takes exactly one column argument"
            )));
        }

        let (input, input_cast) = aggregate_input(&func_call.args[0], relations)?;

        self.has_aggregate = true;
        self.primary_entries
            .push(Entry::Target(Target::Aggregate(AggregateTarget {
                function,
                input,
                input_cast,
                output_cast,
                alias,
            })));

        Ok(())
    }

    fn mount(&mut self, index: usize, relations: &RelationTable) {
        if self.mounted[index] {
            return;
        }
        self.mounted[index] = true;
        match relations.joins[index].parent {
            None => self.primary_entries.push(Entry::Child(index)),
            Some(parent) => {
                self.mount(parent, relations);
                self.join_entries[parent].push(Entry::Child(index));
            }
        }
    }

    fn into_targets(mut self, relations: &RelationTable) -> Vec<Target> {
        // Joins never projected still become embeds, after the explicit targets.
        for index in 0..relations.joins.len() {
            self.mount(index, relations);
        }
        build_entries(&self.primary_entries, &self.join_entries, relations)
    }
}

fn build_entries(
    entries: &[Entry],
    join_entries: &[Vec<Entry>],
    relations: &RelationTable,
) -> Vec<Target> {
    entries
        .iter()
        .map(|entry| match entry {
            Entry::Target(target) => target.clone(),
            Entry::Child(index) => {
                let join = &relations.joins[*index];
                Target::Embedded(EmbeddedTarget {
                    relation: join.relation.clone(),
                    alias: join.alias.clone(),
                    join_type: join.join_type,
                    join_qualifier: join.qualifier.clone(),
                    targets: build_entries(&join_entries[*index], join_entries, relations),
                    spread: true,
                })
            }
        })
        .collect()
}

fn aggregate_input(
    node: &protobuf::Node,
    relations: &RelationTable,
) -> TranslateResult<(ColumnRef, Option<String>)> {
    match node.node.as_ref() {
        Some(PgNodeEnum::ColumnRef(column_ref)) => {
            let parts = column_ref_parts(column_ref)?;
            Ok((aggregate_column(parts, Vec::new(), relations)?, None))
        }
        Some(PgNodeEnum::AExpr(a_expr)) => {
            let (base, steps) = parse_json_path(a_expr)?;
            Ok((aggregate_column(base, steps, relations)?, None))
        }
        Some(PgNodeEnum::TypeCast(type_cast)) => {
            let cast = cast_name(type_cast)?;
            let arg = type_cast
                .arg
                .as_ref()
                .ok_or_else(|| TranslateError::Parse("CAST missing value expression".to_string()))?;
            let column = match arg.node.as_ref() {
                Some(PgNodeEnum::ColumnRef(column_ref)) => {
                    aggregate_column(column_ref_parts(column_ref)?, Vec::new(), relations)?
                }
                Some(PgNodeEnum::AExpr(a_expr)) => {
                    let (base, steps) = parse_json_path(a_expr)?;
                    aggregate_column(base, steps, relations)?
                }
                _ => {
                    return Err(TranslateError::AggregateArgumentShape(
                        "aggregate arguments must be a single cast column".to_string(),
                    ));
                }
            };
            Ok((column, Some(cast)))
        }
        Some(PgNodeEnum::AConst(_)) => Err(TranslateError::AggregateArgumentShape(
            "aggregate arguments must be columns, got a literal".to_string(),
        )),
        Some(PgNodeEnum::FuncCall(_)) => Err(TranslateError::AggregateArgumentShape(
            "nested aggregates are unsupported".to_string(),
        )),
        Some(other) => Err(TranslateError::AggregateArgumentShape(format!(
            "unsupported aggregate argument: {}",
            node_enum_kind(other)
        ))),
        None => Err(TranslateError::Parse("empty aggregate argument".to_string())),
    }
}

fn aggregate_column(
    mut parts: Vec<String>,
    json_path: Vec<JsonPathStep>,
    relations: &RelationTable,
) -> TranslateResult<ColumnRef> {
    let column = match parts.len() {
        1 => parts.remove(0),
        2 => {
            let column = parts.remove(1);
            let qualifier = parts.remove(0);
            match relations.resolve(&qualifier) {
                Some(RelationRef::Primary) => column,
                Some(RelationRef::Joined(_)) => {
                    return Err(TranslateError::AggregateArgumentShape(
                        "aggregates over joined relations are unsupported".to_string(),
                    ));
                }
                None => return Err(TranslateError::UnknownRelation(qualifier)),
            }
        }
        _ => {
            return Err(TranslateError::UnsupportedExpression(
                "schema-qualified column references are unsupported".to_string(),
            ));
        }
    };

    Ok(ColumnRef {
        relation: None,
        column,
        alias: None,
        cast: None,
        json_path,
    })
}
