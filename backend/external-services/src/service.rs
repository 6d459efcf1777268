use std::{str::FromStr, time::Duration};

use common_utils::{
    date_time,
    request::{Method, Request, RequestContent},
    CustomResult, ExposeInterface,
};
use domain_types::{
    connector_types::RawConnectorResponse,
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::Maskable;
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::field::Empty;

use crate::shared_metrics as metrics;

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

/// Sends the request a connector builds for `router_data` and lets the same
/// connector interpret whatever comes back.
///
/// A reply that never arrives is reported as `GatewayUnreachable`; HTTP
/// error replies are handed to the connector's error handling.
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        connector = connector_name,
        request.headers = Empty,
        request.body = Empty,
        request.url = Empty,
        request.method = Empty,
        response.body = Empty,
        response.headers = Empty,
        response.error_message = Empty,
        response.status_code = Empty,
        message_ = "Golden Log Line (outgoing)",
        latency = Empty,
    )
)]
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'static, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    connector_name: &str,
    service_name: &str,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: 'static,
    ResourceCommonData: RawConnectorResponse + 'static,
    Req: 'static,
    Resp: 'static,
{
    let start = tokio::time::Instant::now();
    let connector_request = connector.build_request_v2(&router_data)?;

    let request = match connector_request {
        Some(request) => request,
        None => return Ok(router_data),
    };

    let headers_for_logging = Value::Object(request.get_masked_headers());
    tracing::Span::current().record(
        "request.headers",
        tracing::field::display(&headers_for_logging),
    );
    let masked_request = request
        .body
        .as_ref()
        .map(RequestContent::masked_value)
        .unwrap_or(Value::Null);
    tracing::info!(request = %masked_request, "request of connector");
    tracing::Span::current().record("request.body", tracing::field::display(&masked_request));

    let url = request.url.clone();
    let method = request.method;
    let method_label = method.to_string();
    tracing::Span::current().record("request.url", tracing::field::display(&url));
    tracing::Span::current().record("request.method", tracing::field::display(method));

    metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
        .with_label_values(&[&method_label, service_name, connector_name])
        .inc();
    let external_service_start_latency = tokio::time::Instant::now();
    let response = call_connector_api(proxy, request, service_name).await;
    metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
        .with_label_values(&[&method_label, service_name, connector_name])
        .observe(external_service_start_latency.elapsed().as_secs_f64());

    let result = match response {
        Ok(Ok(body)) => {
            tracing::info!(status_code = body.status_code, "response from connector");
            record_response_in_span(&body);
            let router_data = with_raw_response(router_data, &body);
            connector.handle_response_v2(router_data, body)
        }
        Ok(Err(body)) => {
            tracing::warn!(status_code = body.status_code, "error response from connector");
            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                .with_label_values(&[
                    &method_label,
                    service_name,
                    connector_name,
                    body.status_code.to_string().as_str(),
                ])
                .inc();
            record_response_in_span(&body);
            let router_data = with_raw_response(router_data, &body);
            connector.handle_error_response_v2(router_data, body)
        }
        Err(err) => {
            error_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    err
                )),
            );
            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                .with_label_values(&[&method_label, service_name, connector_name, "none"])
                .inc();
            Err(err
                .change_context(ConnectorError::GatewayUnreachable)
                .attach_printable(format!("request to {url} was not answered")))
        }
    };

    let elapsed = start.elapsed().as_millis();
    tracing::Span::current().record("latency", elapsed);
    tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    result
}

fn with_raw_response<F, ResourceCommonData, Req, Resp>(
    mut router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    body: &Response,
) -> RouterDataV2<F, ResourceCommonData, Req, Resp>
where
    ResourceCommonData: RawConnectorResponse,
{
    router_data
        .resource_common_data
        .set_raw_connector_response(strip_bom_and_convert_to_string(&body.response));
    router_data
        .resource_common_data
        .set_connector_http_status_code(body.status_code);
    router_data
}

fn record_response_in_span(body: &Response) {
    tracing::Span::current().record("response.status_code", tracing::field::display(body.status_code));
    let headers = body.headers.clone().unwrap_or_default();
    let map = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (left, right)| {
            let header_value = if right.is_sensitive() {
                Value::String("*** masked ***".to_string())
            } else if let Ok(x) = right.to_str() {
                Value::String(x.to_string())
            } else {
                return acc;
            };
            acc.insert(left.as_str().to_string(), header_value);
            acc
        });
    tracing::Span::current().record(
        "response.headers",
        tracing::field::display(Value::Object(map)),
    );
    // Only JSON replies are echoed; XML replies may carry card fragments.
    if let Ok(mut response) = parse_json_with_bom_handling(&body.response) {
        mask_sensitive_fields(&mut response);
        tracing::Span::current().record("response.body", tracing::field::display(response));
    }
}

/// Keys whose values never reach the logs, wherever they appear in a reply
const SENSITIVE_RESPONSE_KEYS: [&str; 3] = ["access_token", "refresh_token", "id_token"];

fn mask_sensitive_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if SENSITIVE_RESPONSE_KEYS.contains(&key.as_str()) {
                    *value = Value::String("*** masked ***".to_string());
                } else {
                    mask_sensitive_fields(value);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_sensitive_fields),
        _ => {}
    }
}

/// Issues a single HTTP call without retries.
///
/// `Ok(Ok(_))` is a successful reply, `Ok(Err(_))` a 4xx/5xx reply and
/// `Err(_)` a transport failure.
pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
    flow_name: &str,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = create_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let request = {
        match request.method {
            Method::Get => client.get(url),
            Method::Post => {
                let client = client.post(url);
                match request.body {
                    Some(RequestContent::Json(payload)) => client.json(&payload),
                    Some(RequestContent::FormUrlEncoded(payload)) => client.form(&payload),
                    Some(RequestContent::Xml(document)) => client.body(
                        document
                            .to_xml_string()
                            .change_context(ApiClientError::RequestEncodingFailed)?
                            .expose(),
                    ),
                    None => client,
                }
            }
            Method::Put => client.put(url),
            Method::Delete => client.delete(url),
            Method::Patch => client.patch(url),
        }
        .add_headers(headers)
    };

    let (response, latency_ms) = date_time::time_it(|| async {
        request.send().await.map_err(|error| {
            let api_error = match error {
                error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
                _ => ApiClientError::RequestNotSent(error.to_string()),
            };
            info_log(
                "REQUEST_FAILURE",
                &json!(format!("Unable to send request to connector during {flow_name}.")),
            );
            report!(api_error)
        })
    })
    .await;
    debug_log(
        "CONNECTOR_LATENCY",
        &json!({ "flow": flow_name, "latency_ms": latency_ms }),
    );

    handle_response(response?).await
}

pub fn create_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    get_base_client(proxy_config, should_bypass_proxy)
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(match proxy_config.cache_key(should_bypass_proxy) {
        None => &NON_PROXIED_CLIENT,
        Some(_) => &PROXIED_CLIENT,
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=202 | 302 | 204 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let bytes = resp.bytes().await.map_err(|error| {
                report!(error).change_context(ApiClientError::ResponseDecodingFailed)
            })?;

            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
                .attach_printable(format!("status code {status_code}"))
        }
    }
}

/// Helper function to remove BOM from response bytes and convert to string
pub fn strip_bom_and_convert_to_string(response_bytes: &[u8]) -> Option<String> {
    String::from_utf8(response_bytes.to_vec())
        .ok()
        .map(|s| s.trim_start_matches('\u{FEFF}').to_string())
}

/// Helper function to parse JSON from response bytes with BOM handling
fn parse_json_with_bom_handling(response_bytes: &[u8]) -> Result<Value, serde_json::Error> {
    match serde_json::from_slice::<Value>(response_bytes) {
        Ok(value) => Ok(value),
        Err(_) => {
            let cleaned_response = response_bytes
                .strip_prefix(&[0xEF, 0xBB, 0xBF])
                .unwrap_or(response_bytes);
            serde_json::from_slice::<Value>(cleaned_response)
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let is_masked = matches!(header_value, Maskable::Masked(_));
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let mut header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_value.set_sensitive(is_masked);
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

/// Tag attached to the per-call summary log line
#[derive(Debug, Clone, Copy)]
pub enum Tag {
    OutgoingApi,
}

#[inline]
pub fn debug_log(action: &str, message: &Value) {
    tracing::debug!(tags = %action, json_value= %message);
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[inline]
pub fn error_log(action: &str, message: &Value) {
    tracing::error!(tags = %action, json_value= %message);
}
