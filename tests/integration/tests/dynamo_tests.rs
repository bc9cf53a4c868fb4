//! Store tests against DynamoDB Local
//!
//! Run with:
//! DYNAMODB_ENDPOINT=http://localhost:8000 TABLE_NAME=movies AWS_REGION=us-east-1 \
//! AWS_ACCESS_KEY_ID=local AWS_SECRET_ACCESS_KEY=local cargo test
//!
//! The table must already exist.

use aws_sdk_dynamodb::types::AttributeValue;
use movies_core::{Config, DynamoClient, MovieItem, MovieStore};
use movies_integration_tests::{fixtures::unique_movie_id, skip_if_no_dynamo};
use pretty_assertions::assert_eq;
use serde_dynamo::from_item;

/// Find stored movies by id without assuming the table's key schema
async fn find_movies(client: &DynamoClient, table: &str, id: &str) -> Vec<MovieItem> {
    let result = client
        .inner()
        .scan()
        .table_name(table)
        .filter_expression("#id = :id")
        .expression_attribute_names("#id", "id")
        .expression_attribute_values(":id", AttributeValue::S(id.to_string()))
        .send()
        .await
        .expect("Failed to scan table");

    result
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| from_item(item).expect("Failed to decode movie"))
        .collect()
}

async fn store() -> (DynamoClient, Config) {
    let config = Config::from_env().expect("Invalid configuration");
    (DynamoClient::from_config(&config).await, config)
}

#[tokio::test]
async fn test_put_movie() {
    skip_if_no_dynamo!();
    let (client, config) = store().await;

    let movie = MovieItem::new(1999, "The Matrix", unique_movie_id());
    client
        .put_movie(&config.table_name, &movie)
        .await
        .expect("Failed to put movie");

    assert_eq!(find_movies(&client, &config.table_name, &movie.id).await, vec![movie]);
}

#[tokio::test]
async fn test_put_default_movie() {
    skip_if_no_dynamo!();
    let (client, config) = store().await;

    let movie = MovieItem::default_with_new_id();
    client
        .put_movie(&config.table_name, &movie)
        .await
        .expect("Failed to put movie");

    let stored = find_movies(&client, &config.table_name, &movie.id).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].year, 2012);
    assert_eq!(stored[0].title, "The Amazing Spider-Man 2");
}

#[tokio::test]
async fn test_put_into_missing_table_fails() {
    skip_if_no_dynamo!();
    let (client, _) = store().await;

    let err = client
        .put_movie("movies-table-that-does-not-exist", &MovieItem::default_with_new_id())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "database_error");
}
