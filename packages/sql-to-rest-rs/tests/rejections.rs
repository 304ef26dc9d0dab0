use sql_to_rest_rs::{translate_sql, TranslateError};

fn err(sql: &str) -> TranslateError {
    translate_sql(sql).unwrap_err()
}

#[test]
fn rejects_malformed_sql() {
    let error = err("this is not sql");
    assert!(matches!(error, TranslateError::Parse(_)));
    assert_eq!(error.kind(), "Parse");
}

#[test]
fn rejects_non_select_statements() {
    assert!(matches!(
        err("insert into books (title) values ('x')"),
        TranslateError::UnsupportedExpression(_)
    ));
}

#[test]
fn rejects_literal_targets() {
    assert!(matches!(
        err("select 1 from books"),
        TranslateError::UnsupportedExpression(_)
    ));
    assert!(matches!(
        err("select pages + 1 from books"),
        TranslateError::UnsupportedExpression(_)
    ));
}

#[test]
fn rejects_missing_from_clause() {
    assert!(matches!(
        err("select title"),
        TranslateError::MissingFromClause
    ));
}

#[test]
fn rejects_multiple_from_relations() {
    assert!(matches!(
        err("select * from books, authors"),
        TranslateError::MultipleFromRelations(_)
    ));
}

#[test]
fn rejects_unsupported_join_types() {
    assert!(matches!(
        err("select * from books right join authors on author_id = authors.id"),
        TranslateError::UnsupportedJoinType(_)
    ));
    assert!(matches!(
        err("select * from books full join authors on author_id = authors.id"),
        TranslateError::UnsupportedJoinType(_)
    ));
}

#[test]
fn rejects_non_equi_joins() {
    assert!(matches!(
        err("select * from books join authors on books.id > authors.id"),
        TranslateError::NonEquiJoin(_)
    ));
    assert!(matches!(
        err("select * from books cross join authors"),
        TranslateError::NonEquiJoin(_)
    ));
    assert!(matches!(
        err("select * from books join authors using (id)"),
        TranslateError::NonEquiJoin(_)
    ));
}

#[test]
fn rejects_constants_in_join_qualifiers() {
    assert!(matches!(
        err("select * from books join authors on authors.id = 1"),
        TranslateError::ConstantInJoin
    ));
}

#[test]
fn rejects_self_joins() {
    assert!(matches!(
        err("select * from books join authors on authors.id = authors.editor_id"),
        TranslateError::SelfJoinUnsupported(_)
    ));
}

#[test]
fn rejects_unknown_relations_in_targets() {
    assert!(matches!(
        err("select authors.name from books"),
        TranslateError::UnknownRelation(_)
    ));
}

#[test]
fn rejects_original_name_once_aliased() {
    assert!(matches!(
        err("select authors.name from books join authors a on author_id = a.id"),
        TranslateError::UnknownRelation(_)
    ));
}

#[test]
fn rejects_foreign_columns_without_a_join() {
    assert!(matches!(
        err("select * from books where authors.name = 'x'"),
        TranslateError::ForeignColumnWithoutJoin(_)
    ));
    assert!(matches!(
        err("select * from books order by authors.name"),
        TranslateError::ForeignColumnWithoutJoin(_)
    ));
}

#[test]
fn rejects_casts_outside_the_select_list() {
    assert!(matches!(
        err("select * from books order by title::text"),
        TranslateError::CastOutsideTarget(_)
    ));
    assert!(matches!(
        err("select * from books where pages::text = '10'"),
        TranslateError::CastOutsideTarget(_)
    ));
}

#[test]
fn rejects_unsupported_aggregates() {
    assert!(matches!(
        err("select stddev(amount) from orders"),
        TranslateError::UnsupportedAggregate(_)
    ));
}

#[test]
fn rejects_malformed_aggregate_arguments() {
    assert!(matches!(
        err("select count(*) from books"),
        TranslateError::AggregateArgumentShape(_)
    ));
    assert!(matches!(
        err("select sum(1) from orders"),
        TranslateError::AggregateArgumentShape(_)
    ));
    assert!(matches!(
        err("select sum(distinct amount) from orders"),
        TranslateError::AggregateArgumentShape(_)
    ));
}

#[test]
fn rejects_group_by_without_aggregates() {
    assert!(matches!(
        err("select title from books group by title"),
        TranslateError::GroupByWithoutAggregate
    ));
}

#[test]
fn rejects_group_by_not_matching_targets() {
    assert!(matches!(
        err("select title, count(id) from books group by description"),
        TranslateError::GroupByMissingTarget(_)
    ));
    assert!(matches!(
        err("select title, description, count(id) from books group by title"),
        TranslateError::GroupByMissingTarget(_)
    ));
}

#[test]
fn rejects_having_clauses() {
    assert!(matches!(
        err("select title, count(id) from books group by title having count(id) > 1"),
        TranslateError::HavingUnsupported
    ));
}

#[test]
fn rejects_invalid_limits_and_offsets() {
    assert!(matches!(
        err("select * from books limit 1.5"),
        TranslateError::InvalidLimit(_)
    ));
    assert!(matches!(
        err("select * from books limit -1"),
        TranslateError::InvalidLimit(_)
    ));
    assert!(matches!(
        err("select * from books offset 2.5"),
        TranslateError::InvalidOffset(_)
    ));
}

#[test]
fn rejects_unsupported_operators() {
    assert!(matches!(
        err("select * from books where pages between 1 and 10"),
        TranslateError::UnsupportedOperator(_)
    ));
    assert!(matches!(
        err("select * from books where title is distinct from 'x'"),
        TranslateError::UnsupportedOperator(_)
    ));
}

#[test]
fn rejects_invalid_json_paths() {
    assert!(matches!(
        err("select address->1.5 from books"),
        TranslateError::InvalidJsonPath(_)
    ));
    assert!(matches!(
        err("select address->title from books"),
        TranslateError::InvalidJsonPath(_)
    ));
}

#[test]
fn rejects_statement_level_clauses_outside_the_subset() {
    assert!(matches!(
        err("select distinct title from books"),
        TranslateError::UnsupportedExpression(_)
    ));
    assert!(matches!(
        err("with b as (select * from books) select * from b"),
        TranslateError::UnsupportedExpression(_)
    ));
    assert!(matches!(
        err("select title from books union select title from magazines"),
        TranslateError::UnsupportedExpression(_)
    ));
    assert!(matches!(
        err("select * from (select * from books) b"),
        TranslateError::UnsupportedExpression(_)
    ));
    assert!(matches!(
        err("select * from books where id in (select book_id from orders)"),
        TranslateError::UnsupportedExpression(_)
    ));
}

#[test]
fn error_kinds_are_stable_strings() {
    assert_eq!(
        err("select * from books, authors").kind(),
        "MultipleFromRelations"
    );
    assert_eq!(
        err("select count(*) from books").kind(),
        "AggregateArgumentShape"
    );
    assert_eq!(err("select title").kind(), "MissingFromClause");
}
