//! HTTP API event (payload format 2.0)

use super::{LambdaRequest, LambdaResponse, non_empty, null_as_default};
use crate::core::headers::{HeaderMap, MultiHeaderMap, merge_multi_value_headers};
use crate::core::uri::raw_path_uri;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpDescription {
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCognitoIdentity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amr: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity_pool_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpIamAuthorizer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub caller_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cognito_identity: HttpCognitoIdentity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub principal_org_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_arn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpJwtAuthorizer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub claims: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpAuthorizer {
    #[serde(default)]
    pub jwt: Option<HttpJwtAuthorizer>,
    #[serde(default)]
    pub lambda: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub iam: Option<HttpIamAuthorizer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayV2HttpRequestContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(default)]
    pub authorizer: Option<HttpAuthorizer>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_epoch: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub http: HttpDescription,
}

/// HTTP API request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayV2HttpRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_query_string: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cookies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_parameters: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_context: ApiGatewayV2HttpRequestContext,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage_variables: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

/// HTTP API response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayV2HttpResponse {
    pub status_code: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multi_value_headers: MultiHeaderMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cookies: Vec<String>,
}

impl LambdaRequest for ApiGatewayV2HttpRequest {
    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn uri(&self) -> String {
        raw_path_uri(&self.headers, &self.raw_path, &self.raw_query_string)
    }

    fn method(&self) -> &str {
        &self.request_context.http.method
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }

    fn source_ip(&self) -> Option<&str> {
        non_empty(&self.request_context.http.source_ip)
    }

    fn platform_user_id(&self) -> Option<&str> {
        self.request_context
            .authorizer
            .as_ref()
            .and_then(|authorizer| authorizer.iam.as_ref())
            .and_then(|iam| non_empty(&iam.cognito_identity.identity_id))
    }
}

impl LambdaResponse for ApiGatewayV2HttpResponse {
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
