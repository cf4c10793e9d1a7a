use claims::{assert_err, assert_ok};
use moneris_gateway::{
    client::moneris::ProviderError,
    service::gateway::provider::{BillingProvider, Instrument, TransactionOptions},
};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{
    approved_receipt, credit_card, declined_receipt, receipt, spawn_app, MPG_PATH,
};

fn order(order_id: &str) -> TransactionOptions {
    TransactionOptions {
        order_id: Some(order_id.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn authorize_with_card_sends_preauth_and_returns_authorization() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path(MPG_PATH))
        .and(header("content-type", "application/xml"))
        .and(body_string_contains(
            "<store_id>store3</store_id><api_token>yesguy</api_token>",
        ))
        .and(body_string_contains("<preauth><order_id>ord_1</order_id>"))
        .and(body_string_contains("<amount>5.00</amount>"))
        .and(body_string_contains("<pan>4242424242424242</pan><expdate>3009</expdate>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("58-0_10", "ord_1")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let response = assert_ok!(
        app.client
            .authorize(500, &Instrument::Card(credit_card(1)), &order("ord_1"))
            .await
    );
    assert!(response.success());
    assert!(response.test());
    assert_eq!(response.authorization(), Some("58-0_10;ord_1"));
}

#[tokio::test]
async fn authorize_with_token_sends_res_preauth_cc() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<res_preauth_cc><data_key>dk_abc</data_key>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("60-0_10", "ord_2")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let response = assert_ok!(
        app.client
            .authorize(
                500,
                &Instrument::Token("dk_abc".to_string()),
                &order("ord_2")
            )
            .await
    );
    assert!(response.success());
}

#[tokio::test]
async fn purchase_decline_is_an_unsuccessful_response() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<purchase>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(declined_receipt()))
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let response = assert_ok!(
        app.client
            .purchase(
                500,
                &Instrument::Card(credit_card(1)),
                &TransactionOptions::default()
            )
            .await
    );
    assert!(!response.success());
    assert!(response.message().starts_with("DECLINED"));
}

#[tokio::test]
async fn capture_sends_completion_for_the_authorization() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<completion><order_id>ord_1</order_id>"))
        .and(body_string_contains("<comp_amount>10.00</comp_amount>"))
        .and(body_string_contains("<txn_number>58-0_10</txn_number>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("61-0_10", "ord_1")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let response = assert_ok!(
        app.client
            .capture(1000, "58-0_10;ord_1", &TransactionOptions::default())
            .await
    );
    assert!(response.success());
}

#[tokio::test]
async fn void_releases_a_preauth_with_a_zero_completion() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            "<completion><order_id>ord_1</order_id><comp_amount>0.00</comp_amount><txn_number>58-0_10</txn_number>",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("62-0_10", "ord_1")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let voided = assert_ok!(
        app.client
            .void("58-0_10;ord_1", &TransactionOptions::default())
            .await
    );
    assert!(voided.success());
    let requests = app.moneris_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!String::from_utf8_lossy(&requests[0].body).contains("purchasecorrection"));
}

#[tokio::test]
async fn void_with_purchase_correction_and_refund_use_their_own_transactions() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            "<purchasecorrection><order_id>ord_1</order_id><txn_number>58-0_10</txn_number>",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("62-0_10", "ord_1")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<refund><order_id>ord_1</order_id><amount>2.50</amount>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(approved_receipt("63-0_10", "ord_1")),
        )
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let correction = TransactionOptions {
        purchase_correction: true,
        ..Default::default()
    };
    let voided = assert_ok!(app.client.void("58-0_10;ord_1", &correction).await);
    assert!(voided.success());
    let refunded = assert_ok!(
        app.client
            .refund(250, "58-0_10;ord_1", &TransactionOptions::default())
            .await
    );
    assert!(refunded.success());
}

#[tokio::test]
async fn store_and_unstore_go_through_the_vault() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<res_add_cc><pan>4242424242424242</pan>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(receipt(&[
            ("DataKey", "dk_abc"),
            ("ReceiptId", "null"),
            ("ResponseCode", "001"),
            ("Complete", "true"),
            ("Message", "Successfully registered CC details."),
            ("ResSuccess", "true"),
        ])))
        .expect(1)
        .mount(&app.moneris_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<res_delete><data_key>dk_abc</data_key></res_delete>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(receipt(&[
            ("DataKey", "dk_abc"),
            ("ResponseCode", "001"),
            ("Complete", "true"),
            ("Message", "Successfully deleted CC details."),
            ("ResSuccess", "true"),
        ])))
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let options = TransactionOptions::default();
    let stored = assert_ok!(app.client.store(&credit_card(1), &options).await);
    assert!(stored.success());
    assert_eq!(stored.param("data_key"), Some("dk_abc"));

    let removed = assert_ok!(app.client.unstore("dk_abc", &options).await);
    assert!(removed.success());
}

#[tokio::test]
async fn http_error_status_is_a_provider_error() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let err = assert_err!(
        app.client
            .authorize(
                500,
                &Instrument::Card(credit_card(1)),
                &TransactionOptions::default()
            )
            .await
    );
    assert!(matches!(err, ProviderError::Status { status: 503 }));
}

#[tokio::test]
async fn unparsable_body_is_a_provider_error() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&app.moneris_server)
        .await;

    let err = assert_err!(
        app.client
            .capture(500, "58-0_10;ord_1", &TransactionOptions::default())
            .await
    );
    assert!(matches!(err, ProviderError::Decode { .. }));
}
