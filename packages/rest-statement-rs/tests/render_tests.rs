use rest_statement_rs::{model::Statement, render_http};
use serde_json::json;

fn statement_from_json(value: serde_json::Value) -> Statement {
    serde_json::from_value(value).unwrap()
}

#[test]
fn renders_embedded_relation_select() {
    let statement = statement_from_json(json!({
        "type": "select",
        "from": { "name": "books", "alias": null },
        "targets": [
            { "type": "star" },
            {
                "type": "embedded",
                "relation": "authors",
                "alias": null,
                "joinType": "inner",
                "joinQualifier": {
                    "column": "id",
                    "parentRelation": "books",
                    "parentColumn": "author_id"
                },
                "targets": [
                    {
                        "type": "column",
                        "relation": "authors",
                        "column": "name",
                        "alias": null,
                        "cast": null,
                        "jsonPath": []
                    }
                ],
                "spread": true
            }
        ],
        "filter": null,
        "sorts": [],
        "limit": null,
        "offset": null
    }));

    let request = render_http(&statement);
    assert_eq!(request.path, "/books");
    assert_eq!(request.full_path, "/books?select=*,...authors!inner(name)");
}

#[test]
fn renders_aggregate_with_casts_and_alias() {
    let statement = statement_from_json(json!({
        "type": "select",
        "from": { "name": "orders", "alias": null },
        "targets": [
            {
                "type": "aggregate",
                "function": "sum",
                "input": {
                    "relation": null,
                    "column": "amount",
                    "alias": null,
                    "cast": null,
                    "jsonPath": []
                },
                "inputCast": "int",
                "outputCast": "float",
                "alias": "total"
            }
        ],
        "filter": null,
        "sorts": [],
        "limit": null,
        "offset": null
    }));

    let request = render_http(&statement);
    assert_eq!(
        request.full_path,
        "/orders?select=total:amount::int.sum()::float"
    );
}

#[test]
fn renders_negated_combinator_and_order() {
    let statement = statement_from_json(json!({
        "type": "select",
        "from": { "name": "books", "alias": null },
        "targets": [ { "type": "star" } ],
        "filter": {
            "type": "logical",
            "operator": "or",
            "negate": true,
            "values": [
                {
                    "type": "column",
                    "column": "title",
                    "operator": "eq",
                    "value": "Cheese",
                    "negate": false
                },
                {
                    "type": "logical",
                    "operator": "and",
                    "negate": false,
                    "values": [
                        {
                            "type": "column",
                            "column": "pages",
                            "operator": "gt",
                            "value": 100,
                            "negate": false
                        },
                        {
                            "type": "column",
                            "column": "pages",
                            "operator": "lt",
                            "value": 1000,
                            "negate": true
                        }
                    ]
                }
            ]
        },
        "sorts": [
            {
                "column": "title",
                "relation": null,
                "direction": "desc",
                "nulls": "last"
            }
        ],
        "limit": 5,
        "offset": 10
    }));

    let request = render_http(&statement);
    assert_eq!(
        request.full_path,
        "/books?not.or=(title.eq.Cheese,and(pages.gt.100,pages.not.lt.1000))&order=title.desc.nullslast&limit=5&offset=10"
    );
    assert_eq!(
        request.params,
        vec![
            (
                "not.or".to_string(),
                "(title.eq.Cheese,and(pages.gt.100,pages.not.lt.1000))".to_string()
            ),
            ("order".to_string(), "title.desc.nullslast".to_string()),
            ("limit".to_string(), "5".to_string()),
            ("offset".to_string(), "10".to_string()),
        ]
    );
}

#[test]
fn statement_round_trips_through_json() {
    let source = json!({
        "type": "select",
        "from": { "name": "books", "alias": "b" },
        "targets": [
            {
                "type": "column",
                "relation": null,
                "column": "address",
                "alias": null,
                "cast": null,
                "jsonPath": [
                    { "arrow": "->", "key": "city" },
                    { "arrow": "->>", "key": "name" }
                ]
            }
        ],
        "filter": null,
        "sorts": [],
        "limit": null,
        "offset": null
    });

    let statement = statement_from_json(source.clone());
    let reserialized = serde_json::to_value(&statement).unwrap();
    assert_eq!(reserialized, source);

    let reparsed: Statement = serde_json::from_value(reserialized).unwrap();
    assert_eq!(reparsed, statement);
    assert_eq!(
        render_http(&reparsed).full_path,
        "/books?select=address->city->>name"
    );
}
