// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used by Amazon Pay.
pub const X_AMZ_PAY_REGION: &str = "x-amz-pay-region";
pub const X_AMZ_PAY_DATE: &str = "x-amz-pay-date";
pub const X_AMZ_PAY_HOST: &str = "x-amz-pay-host";
pub const X_AMZ_PAY_IDEMPOTENCY_KEY: &str = "x-amz-pay-idempotency-key";
pub const X_AMZ_PAY_REQUEST_ID: &str = "x-amz-pay-request-id";
pub const APPLICATION_JSON: &str = "application/json";

// Env values used by Amazon Pay.
pub const AMAZON_PAY_REGION: &str = "AMAZON_PAY_REGION";
pub const AMAZON_PAY_ENVIRONMENT: &str = "AMAZON_PAY_ENVIRONMENT";
pub const AMAZON_PAY_PUBLIC_KEY_ID: &str = "AMAZON_PAY_PUBLIC_KEY_ID";
pub const AMAZON_PAY_PRIVATE_KEY: &str = "AMAZON_PAY_PRIVATE_KEY";
pub const AMAZON_PAY_PRIVATE_KEY_PATH: &str = "AMAZON_PAY_PRIVATE_KEY_PATH";
pub const AMAZON_PAY_ALGORITHM: &str = "AMAZON_PAY_ALGORITHM";
pub const AMAZON_PAY_ENDPOINT: &str = "AMAZON_PAY_ENDPOINT";
pub const AMAZON_PAY_MAX_CONNECTIONS: &str = "AMAZON_PAY_MAX_CONNECTIONS";

pub const SDK_NAME: &str = "amazon-pay-api-sdk-rust";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REDACTED: &str = "Redacted";

/// Statuses that are worth sending again.
pub const RETRYABLE_STATUSES: [u16; 6] = [500, 502, 503, 504, 408, 429];
/// Status the service answers with when the caller is throttled.
pub const THROTTLED_STATUS: u16 = 429;

/// AsciiSet for the canonical URI.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~' and '/'.
pub static AMAZON_PAY_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for the canonical query string and single path segments.
///
/// Same as [`AMAZON_PAY_URI_ENCODE_SET`] but `/` is encoded too.
pub static AMAZON_PAY_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
