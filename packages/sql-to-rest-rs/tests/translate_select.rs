use sql_to_rest_rs::{translate_sql, translate_sql_to_request};

fn full_path(sql: &str) -> String {
    translate_sql_to_request(sql).unwrap().full_path
}

#[test]
fn translates_plain_column_projection() {
    assert_eq!(
        full_path("select title, description from books"),
        "/books?select=title,description"
    );
}

#[test]
fn translates_top_level_and_into_separate_filters() {
    assert_eq!(
        full_path("select * from books where title = 'Cheese' and description ilike '%salsa%'"),
        "/books?title=eq.Cheese&description=ilike.*salsa*"
    );
}

#[test]
fn translates_negated_or_into_single_combinator() {
    assert_eq!(
        full_path("select * from books where not (title = 'Cheese' or title = 'Salsa')"),
        "/books?not.or=(title.eq.Cheese,title.eq.Salsa)"
    );
}

#[test]
fn translates_inner_join_into_spread_embed() {
    assert_eq!(
        full_path("select *, authors.name from books join authors on author_id = authors.id"),
        "/books?select=*,...authors!inner(name)"
    );
}

#[test]
fn translates_aggregate_with_output_cast() {
    assert_eq!(
        full_path("select sum(amount)::float from orders"),
        "/orders?select=amount.sum()::float"
    );
}

#[test]
fn translates_order_limit_and_offset() {
    assert_eq!(
        full_path("select * from books order by title desc nulls last limit 5 offset 10"),
        "/books?order=title.desc.nullslast&limit=5&offset=10"
    );
}

#[test]
fn translates_json_path_projection() {
    assert_eq!(
        full_path("select address->'city'->>'name' from books"),
        "/books?select=address->city->>name"
    );
}

#[test]
fn translation_is_deterministic() {
    let sql = "select title from books where pages > 100 order by title limit 3";
    let first = translate_sql_to_request(sql).unwrap();
    let second = translate_sql_to_request(sql).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.method, "GET");
}

#[test]
fn path_uses_relation_name_not_alias() {
    let request = translate_sql_to_request("select * from books b").unwrap();
    assert_eq!(request.path, "/books");
    assert_eq!(request.full_path, "/books");
}

#[test]
fn select_list_preserves_source_order() {
    assert_eq!(
        full_path("select description, title, id from books"),
        "/books?select=description,title,id"
    );
}

#[test]
fn alias_equal_to_column_name_is_elided() {
    assert_eq!(
        full_path("select title as title from books"),
        "/books?select=title"
    );
    assert_eq!(
        full_path("select title as t from books"),
        "/books?select=t:title"
    );
}

#[test]
fn double_negation_renders_like_the_plain_filter() {
    assert_eq!(
        full_path("select * from books where not (not (title = 'Cheese'))"),
        full_path("select * from books where title = 'Cheese'")
    );
}

#[test]
fn translates_comparison_operators() {
    assert_eq!(
        full_path("select * from books where pages >= 10 and pages < 100"),
        "/books?pages=gte.10&pages=lt.100"
    );
    assert_eq!(
        full_path("select * from books where pages != 42"),
        "/books?pages=neq.42"
    );
    assert_eq!(
        full_path("select * from books where in_print = true"),
        "/books?in_print=eq.true"
    );
}

#[test]
fn translates_null_tests() {
    assert_eq!(
        full_path("select * from books where deleted_at is null"),
        "/books?deleted_at=is.null"
    );
    assert_eq!(
        full_path("select * from books where deleted_at is not null"),
        "/books?deleted_at=not.is.null"
    );
}

#[test]
fn translates_in_lists() {
    assert_eq!(
        full_path("select * from books where id in (1, 2, 3)"),
        "/books?id=in.(1,2,3)"
    );
    assert_eq!(
        full_path("select * from books where category not in ('a', 'b')"),
        "/books?category=not.in.(a,b)"
    );
}

#[test]
fn translates_regex_and_range_operators() {
    assert_eq!(
        full_path("select * from books where title ~ '^The'"),
        "/books?title=match.^The"
    );
    assert_eq!(
        full_path("select * from books where title !~* 'cheese'"),
        "/books?title=not.imatch.cheese"
    );
    assert_eq!(
        full_path("select * from events where duration && '[1,2]'"),
        "/events?duration=ov.[1,2]"
    );
    assert_eq!(
        full_path("select * from books where tags @> '{fiction}'"),
        "/books?tags=cs.{fiction}"
    );
}

#[test]
fn translates_text_search_operators() {
    assert_eq!(
        full_path("select * from books where description @@ to_tsquery('fat & rat')"),
        "/books?description=fts.fat & rat"
    );
    assert_eq!(
        full_path("select * from books where description @@ websearch_to_tsquery('fat rat')"),
        "/books?description=wfts.fat rat"
    );
    assert_eq!(
        full_path("select * from books where description @@ 'rat'"),
        "/books?description=fts.rat"
    );
}

#[test]
fn translates_not_like_into_negated_leaf() {
    assert_eq!(
        full_path("select * from books where title not like 'The %'"),
        "/books?title=not.like.The *"
    );
}

#[test]
fn translates_left_join_without_inner_marker() {
    assert_eq!(
        full_path(
            "select *, authors.name from books left join authors on author_id = authors.id"
        ),
        "/books?select=*,...authors(name)"
    );
}

#[test]
fn translates_aliased_join_with_alias_prefix() {
    assert_eq!(
        full_path("select a.name from books join authors a on author_id = a.id"),
        "/books?select=...a:authors!inner(name)"
    );
}

#[test]
fn translates_nested_joins_into_nested_embeds() {
    assert_eq!(
        full_path(
            "select *, authors.name, publishers.name from books \
             join authors on author_id = authors.id \
             join publishers on authors.publisher_id = publishers.id"
        ),
        "/books?select=*,...authors!inner(name,...publishers!inner(name))"
    );
}

#[test]
fn unprojected_joins_still_become_embeds() {
    assert_eq!(
        full_path("select title from books join authors on author_id = authors.id"),
        "/books?select=title,...authors!inner()"
    );
}

#[test]
fn translates_qualified_star_projection() {
    assert_eq!(
        full_path("select authors.* from books join authors on author_id = authors.id"),
        "/books?select=...authors!inner(*)"
    );
}

#[test]
fn filters_on_joined_relations_use_dotted_keys() {
    assert_eq!(
        full_path(
            "select authors.name from books join authors on author_id = authors.id \
             where authors.name = 'Ampersand'"
        ),
        "/books?select=...authors!inner(name)&authors.name=eq.Ampersand"
    );
}

#[test]
fn sorts_on_joined_relations_use_relation_prefix() {
    assert_eq!(
        full_path(
            "select title, authors.name from books join authors on author_id = authors.id \
             order by authors.name asc"
        ),
        "/books?select=title,...authors!inner(name)&order=authors.name.asc"
    );
}

#[test]
fn translates_group_by_matching_targets() {
    assert_eq!(
        full_path("select title, count(id) from books group by title"),
        "/books?select=title,id.count()"
    );
}

#[test]
fn translates_aggregate_with_inner_cast_and_alias() {
    assert_eq!(
        full_path("select avg((attributes->>'age')::int) as average from users"),
        "/users?select=average:attributes->>age::int.avg()"
    );
}

#[test]
fn translates_json_path_filters() {
    assert_eq!(
        full_path("select * from books where address->'city'->>'code' = 'SF'"),
        "/books?address->city->>code=eq.SF"
    );
}

#[test]
fn translates_integer_json_path_keys() {
    assert_eq!(
        full_path("select items->0 from orders"),
        "/orders?select=items->0"
    );
}

#[test]
fn schema_qualifier_is_dropped_from_the_path() {
    assert_eq!(
        full_path("select title from public.books"),
        "/books?select=title"
    );
}

#[test]
fn limit_all_means_no_limit() {
    assert_eq!(full_path("select * from books limit all"), "/books");
}

#[test]
fn nested_combinators_keep_their_shape() {
    assert_eq!(
        full_path("select * from books where pages > 10 and (title = 'a' or title = 'b')"),
        "/books?pages=gt.10&or=(title.eq.a,title.eq.b)"
    );
    assert_eq!(
        full_path(
            "select * from books where not (title = 'a' or not (pages > 10 and pages < 20))"
        ),
        "/books?not.or=(title.eq.a,not.and(pages.gt.10,pages.lt.20))"
    );
}

#[test]
fn statement_ir_round_trips_through_json() {
    let statement = translate_sql(
        "select title, authors.name from books join authors on author_id = authors.id \
         where pages > 10 order by title limit 2",
    )
    .unwrap();

    let json = serde_json::to_string(&statement).unwrap();
    let reparsed: sql_to_rest_rs::model::Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, statement);
    assert_eq!(
        sql_to_rest_rs::render_http(&reparsed),
        sql_to_rest_rs::render_http(&statement)
    );
}
