//! Declarative table of the Amazon Pay API.
//!
//! Every resource is one [`Operation`]; [`crate::Client::execute`] is the only
//! code that turns it into a call.

use crate::constants::{AMAZON_PAY_QUERY_ENCODE_SET, X_AMZ_PAY_IDEMPOTENCY_KEY};
use http::{HeaderMap, HeaderValue, Method};
use paysign_core::{Error, Result};
use percent_encoding::utf8_percent_encode;
use rand::RngCore;

/// One API operation: a method, a resource path and whether it must carry an
/// idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// HTTP method.
    pub method: Method,
    /// Resource path relative to the environment, `{}` marks an id.
    pub path: &'static str,
    /// Operations that create something get an idempotency key if the caller
    /// did not supply one.
    pub idempotent: bool,
}

macro_rules! operation {
    ($(#[$doc:meta])* $name:ident, $method:ident, $path:literal, $idempotent:literal) => {
        $(#[$doc])*
        pub const $name: Operation = Operation {
            method: Method::$method,
            path: $path,
            idempotent: $idempotent,
        };
    };
}

impl Operation {
    operation!(
        /// Create a checkout session.
        CREATE_CHECKOUT_SESSION, POST, "v2/checkoutSessions", true
    );
    operation!(
        /// Get a checkout session.
        GET_CHECKOUT_SESSION, GET, "v2/checkoutSessions/{}", false
    );
    operation!(
        /// Update a checkout session.
        UPDATE_CHECKOUT_SESSION, PATCH, "v2/checkoutSessions/{}", false
    );
    operation!(
        /// Complete a checkout session.
        COMPLETE_CHECKOUT_SESSION, POST, "v2/checkoutSessions/{}/complete", false
    );
    operation!(
        /// Finalize a checkout session.
        FINALIZE_CHECKOUT_SESSION, POST, "v2/checkoutSessions/{}/finalize", false
    );

    operation!(
        /// Get a charge permission.
        GET_CHARGE_PERMISSION, GET, "v2/chargePermissions/{}", false
    );
    operation!(
        /// Update a charge permission.
        UPDATE_CHARGE_PERMISSION, PATCH, "v2/chargePermissions/{}", false
    );
    operation!(
        /// Close a charge permission.
        CLOSE_CHARGE_PERMISSION, DELETE, "v2/chargePermissions/{}/close", false
    );

    operation!(
        /// Create a charge.
        CREATE_CHARGE, POST, "v2/charges", true
    );
    operation!(
        /// Get a charge.
        GET_CHARGE, GET, "v2/charges/{}", false
    );
    operation!(
        /// Capture a charge.
        CAPTURE_CHARGE, POST, "v2/charges/{}/capture", true
    );
    operation!(
        /// Cancel a charge.
        CANCEL_CHARGE, DELETE, "v2/charges/{}/cancel", false
    );

    operation!(
        /// Create a refund.
        CREATE_REFUND, POST, "v2/refunds", true
    );
    operation!(
        /// Get a refund.
        GET_REFUND, GET, "v2/refunds/{}", false
    );

    operation!(
        /// Get the buyer of a buyer token.
        GET_BUYER, GET, "v2/buyers/{}", false
    );

    operation!(
        /// Send delivery tracking information.
        DELIVERY_TRACKERS, POST, "v2/deliveryTrackers", false
    );

    operation!(
        /// Scan a buyer code at a point of sale.
        INSTORE_MERCHANT_SCAN, POST, "in-store/v1/merchantScan", false
    );
    operation!(
        /// Charge at a point of sale.
        INSTORE_CHARGE, POST, "in-store/v1/charge", false
    );
    operation!(
        /// Refund at a point of sale.
        INSTORE_REFUND, POST, "in-store/v1/refund", false
    );

    operation!(
        /// Create a merchant account.
        CREATE_MERCHANT_ACCOUNT, POST, "v2/merchantAccounts", true
    );
    operation!(
        /// Update a merchant account.
        UPDATE_MERCHANT_ACCOUNT, PATCH, "v2/merchantAccounts/{}", true
    );
    operation!(
        /// Claim a merchant account.
        CLAIM_MERCHANT_ACCOUNT, POST, "v2/merchantAccounts/{}/claim", true
    );

    operation!(
        /// List reports.
        GET_REPORTS, GET, "v2/reports", false
    );
    operation!(
        /// Get a report.
        GET_REPORT, GET, "v2/reports/{}", false
    );
    operation!(
        /// Request a report.
        CREATE_REPORT, POST, "v2/reports", true
    );
    operation!(
        /// Get a report document.
        GET_REPORT_DOCUMENT, GET, "v2/report-documents/{}", false
    );
    operation!(
        /// List report schedules.
        GET_REPORT_SCHEDULES, GET, "v2/report-schedules", false
    );
    operation!(
        /// Get a report schedule.
        GET_REPORT_SCHEDULE, GET, "v2/report-schedules/{}", false
    );
    operation!(
        /// Create a report schedule.
        CREATE_REPORT_SCHEDULE, POST, "v2/report-schedules", true
    );
    operation!(
        /// Cancel a report schedule.
        CANCEL_REPORT_SCHEDULE, DELETE, "v2/report-schedules/{}", false
    );

    operation!(
        /// Create a dispute.
        CREATE_DISPUTE, POST, "v2/disputes", true
    );
    operation!(
        /// Get a dispute.
        GET_DISPUTE, GET, "v2/disputes/{}", false
    );
    operation!(
        /// Update a dispute.
        UPDATE_DISPUTE, PATCH, "v2/disputes/{}", false
    );
    operation!(
        /// Contest a dispute.
        CONTEST_DISPUTE, POST, "v2/disputes/{}/contest", false
    );

    operation!(
        /// Upload a file, for example dispute evidence.
        UPLOAD_FILE, POST, "v2/files", true
    );

    /// Substitute `ids` into the `{}` placeholders of the path.
    ///
    /// Every id is encoded as a single path segment, so `/` inside an id can
    /// not change the resource.
    pub fn resource(&self, ids: &[&str]) -> Result<String> {
        let placeholders = self.path.matches("{}").count();
        if placeholders != ids.len() {
            return Err(Error::request_invalid(format!(
                "{} {} expects {placeholders} id(s) but got {}",
                self.method,
                self.path,
                ids.len()
            )));
        }

        let mut resource = String::with_capacity(self.path.len() + 32);
        let mut ids = ids.iter();
        for (idx, part) in self.path.split("{}").enumerate() {
            if idx != 0 {
                if let Some(id) = ids.next() {
                    if id.is_empty() {
                        return Err(Error::request_invalid(format!(
                            "{} {} got an empty id",
                            self.method, self.path
                        )));
                    }
                    resource.extend(utf8_percent_encode(id, &AMAZON_PAY_QUERY_ENCODE_SET));
                }
            }
            resource.push_str(part);
        }

        Ok(resource)
    }
}

/// Generate a random idempotency key: 32 lower-case hex characters.
pub fn generate_idempotency_key() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Insert a fresh `x-amz-pay-idempotency-key` unless one is present.
///
/// `HeaderMap` lookups ignore case, so a caller supplied key in any case is
/// left untouched.
pub fn ensure_idempotency_key(headers: &mut HeaderMap) -> Result<()> {
    if headers.contains_key(X_AMZ_PAY_IDEMPOTENCY_KEY) {
        return Ok(());
    }

    headers.insert(
        X_AMZ_PAY_IDEMPOTENCY_KEY,
        HeaderValue::from_str(&generate_idempotency_key())?,
    );
    Ok(())
}
