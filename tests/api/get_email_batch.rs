//! tests/api/get_email_batch.rs

use crate::helpers::{setup, Test};
use mailing_list::wire::ErrorResponse;

async fn create_many(test: &Test, n: usize) -> Vec<String> {
    let mut emails = Vec::with_capacity(n);
    for i in 1..=n {
        let email = format!("a{}@test.tld", i);
        test.create(&email).await;
        emails.push(email);
    }
    emails
}

#[tokio::test]
async fn batch_returns_entries_in_creation_order() {
    // Arrange
    let test = setup().await;
    let emails = create_many(&test, 5).await;

    // Act
    let first = test.client.get_email_batch(1, 5).await.unwrap();
    let second = test.client.get_email_batch(2, 5).await.unwrap();

    // Assert
    let returned: Vec<String> = first.into_iter().map(|e| e.email).collect();
    assert_eq!(returned, emails);
    assert!(second.is_empty());
}

#[tokio::test]
async fn consecutive_pages_concatenate_to_a_double_page() {
    // Arrange
    let test = setup().await;
    create_many(&test, 7).await;

    // Act
    let page_one = test.client.get_email_batch(1, 3).await.unwrap();
    let page_two = test.client.get_email_batch(2, 3).await.unwrap();
    let double = test.client.get_email_batch(1, 6).await.unwrap();

    // Assert
    assert_eq!(page_one.len(), 3);
    assert_eq!(page_two.len(), 3);
    assert!(page_one.iter().all(|e| !page_two.contains(e)));

    let concatenated: Vec<_> = page_one.into_iter().chain(page_two).collect();
    assert_eq!(concatenated, double);
}

#[tokio::test]
async fn a_short_page_is_the_last_one() {
    // Arrange
    let test = setup().await;
    create_many(&test, 7).await;

    // Act
    let last = test.client.get_email_batch(3, 3).await.unwrap();

    // Assert
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].email, "a7@test.tld");
}

#[tokio::test]
async fn batch_includes_opted_out_entries() {
    // Arrange
    let test = setup().await;
    let mut entry = test.create("a1@test.tld").await;
    entry.opt_out = true;
    test.client.update_email(&entry).await.unwrap();

    // Act
    let entries = test.client.get_email_batch(1, 5).await.unwrap();

    // Assert
    assert_eq!(entries, vec![entry]);
}

#[tokio::test]
async fn batch_returns_a_400_for_non_positive_parameters() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        (serde_json::json!({ "page": 0, "count": 5 }), "zero page"),
        (serde_json::json!({ "page": -1, "count": 5 }), "negative page"),
        (serde_json::json!({ "page": 1, "count": 0 }), "zero count"),
        (serde_json::json!({ "page": 1, "count": -5 }), "negative count"),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = test.post_rpc("GetEmailBatch", body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had a {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn batch_returns_a_json_error_for_a_malformed_body() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        (serde_json::json!({ "page": "one", "count": 5 }), "a string page"),
        (serde_json::json!({ "page": 1 }), "a missing count"),
        (serde_json::json!("page=1&count=5"), "a string body"),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = test.post_rpc("GetEmailBatch", body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            error_message
        );
        let body: ErrorResponse = response
            .json()
            .await
            .unwrap_or_else(|_| panic!("Error body is not JSON for {}.", error_message));
        assert!(!body.error.is_empty());
    }
}
