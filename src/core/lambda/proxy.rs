//! REST API proxy integration event (payload format 1.0)

use super::{LambdaRequest, LambdaResponse, non_empty, null_as_default};
use crate::core::headers::{HeaderMap, MultiHeaderMap, merge_multi_value_headers};
use crate::core::uri::path_style_uri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller identity attached by API Gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequestIdentity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cognito_identity_pool_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cognito_identity_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub caller: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_agent: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_arn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequestContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity: ApiGatewayRequestIdentity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_id: String,
}

/// Proxy integration request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multi_value_headers: MultiHeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multi_value_query_string_parameters: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_parameters: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage_variables: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_context: ApiGatewayProxyRequestContext,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

/// Proxy integration response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multi_value_headers: MultiHeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

impl LambdaRequest for ApiGatewayProxyRequest {
    fn headers(&self) -> HeaderMap {
        merge_multi_value_headers(&self.headers, &self.multi_value_headers)
    }

    fn uri(&self) -> String {
        path_style_uri(
            &self.headers(),
            &self.path,
            &self.query_string_parameters,
            &self.multi_value_query_string_parameters,
        )
    }

    fn method(&self) -> &str {
        &self.http_method
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }

    fn source_ip(&self) -> Option<&str> {
        non_empty(&self.request_context.identity.source_ip)
    }

    fn platform_user_id(&self) -> Option<&str> {
        non_empty(&self.request_context.identity.cognito_identity_id)
    }
}

impl LambdaResponse for ApiGatewayProxyResponse {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn headers(&self) -> HeaderMap {
        merge_multi_value_headers(&self.headers, &self.multi_value_headers)
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }
}
