use super::verify_signature;
use crate::test_config;
use anyhow::Result;
use paysign_amazon_pay::{string_to_sign, Client, Config, SignatureAlgorithm};
use paysign_core::Context;
use pretty_assertions::assert_eq;
use serde::Serialize;

const BUTTON_PAYLOAD: &str = r#"{"storeId":"amzn1.application-oa2-client.xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx","webCheckoutDetails":{"checkoutReviewReturnUrl":"https://localhost/test/CheckoutReview.php","checkoutResultReturnUrl":"https://localhost/test/CheckoutResult.php"}}"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebCheckoutDetails {
    checkout_review_return_url: String,
    checkout_result_return_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ButtonPayload {
    store_id: String,
    web_checkout_details: WebCheckoutDetails,
}

#[test]
fn test_button_signature_of_raw_payload() -> Result<()> {
    let client = Client::with_context(Context::new(), test_config("NA"))?;
    let signature = client.generate_button_signature(BUTTON_PAYLOAD)?;

    let msg = string_to_sign(SignatureAlgorithm::Default, BUTTON_PAYLOAD);
    assert_eq!(
        msg,
        "AMZN-PAY-RSASSA-PSS\n8dec52d799607be40f82d5c8e7ecb6c171e6591c41b1111a576b16076c89381c"
    );
    assert!(verify_signature(20, &msg, &signature)?);
    Ok(())
}

#[test]
fn test_button_signature_of_serialized_payload() -> Result<()> {
    let client = Client::with_context(
        Context::new(),
        Config {
            algorithm: Some("AMZN-PAY-RSASSA-PSS-V2".to_string()),
            ..test_config("NA")
        },
    )?;
    let payload = ButtonPayload {
        store_id: "amzn1.application-oa2-client.xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string(),
        web_checkout_details: WebCheckoutDetails {
            checkout_review_return_url: "https://localhost/test/CheckoutReview.php".to_string(),
            checkout_result_return_url: "https://localhost/test/CheckoutResult.php".to_string(),
        },
    };

    let (serialized, signature) = client.generate_button_signature_json(&payload)?;
    assert_eq!(serialized, BUTTON_PAYLOAD);

    let msg = string_to_sign(SignatureAlgorithm::V2, &serialized);
    assert!(verify_signature(32, &msg, &signature)?);
    assert!(!verify_signature(20, &msg, &signature)?);
    Ok(())
}
