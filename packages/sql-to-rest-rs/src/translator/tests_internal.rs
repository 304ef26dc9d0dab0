#[test]
fn translates_like_wildcards() {
    assert_eq!(translate_like_pattern("%salsa%"), "*salsa*");
    assert_eq!(translate_like_pattern("sal_a"), "sal_a");
    assert_eq!(translate_like_pattern(r"100\% done%"), r"100\% done*");
}

#[test]
fn maps_catalog_type_names_back_to_sql() {
    let statement = translate_sql("select sum(amount)::float from orders").unwrap();
    let Statement::Select { targets, .. } = statement;

    let Target::Aggregate(aggregate) = &targets[0] else {
        panic!("expected aggregate target, got {:?}", targets[0]);
    };
    assert_eq!(aggregate.output_cast.as_deref(), Some("float"));

    let statement = translate_sql("select pages::int8 from books").unwrap();
    let Statement::Select { targets, .. } = statement;
    let Target::Column(column) = &targets[0] else {
        panic!("expected column target, got {:?}", targets[0]);
    };
    assert_eq!(column.cast.as_deref(), Some("bigint"));
}

#[test]
fn double_negation_cancels_in_the_filter_tree() {
    let negated_twice =
        translate_sql("select * from books where not (not (title = 'Cheese'))").unwrap();
    let plain = translate_sql("select * from books where title = 'Cheese'").unwrap();
    assert_eq!(negated_twice, plain);
}

#[test]
fn json_path_keys_keep_arrow_kinds() {
    let statement = translate_sql("select address->'city'->>'name' from books").unwrap();
    let Statement::Select { targets, .. } = statement;
    let Target::Column(column) = &targets[0] else {
        panic!("expected column target, got {:?}", targets[0]);
    };

    assert_eq!(column.column, "address");
    assert_eq!(column.json_path.len(), 2);
    assert_eq!(column.json_path[0].arrow, JsonArrow::Json);
    assert_eq!(column.json_path[0].key, "city");
    assert_eq!(column.json_path[1].arrow, JsonArrow::Text);
    assert_eq!(column.json_path[1].key, "name");
}
