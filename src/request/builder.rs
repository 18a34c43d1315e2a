//! Request builder

use super::types::{PreparedRequest, RequestContext, RequestShape, PROFILE_LIST_KEY};
use crate::error::{Error, Result};
use crate::pagination::PageToken;
use crate::schema::FieldMetricSet;
use crate::streams::StreamDefinition;
use crate::types::JsonValue;
use serde_json::json;

/// Page size sent with every request (documented API maximum)
pub const PAGE_LIMIT: u32 = 100;

/// Sort sent by GET analytics requests regardless of pagination
const QUERY_SORT: &str = "created_time:asc";

/// Build the parameters and body for one page of `def`.
///
/// A `customer_profile_id_list` in the parent context replaces the
/// configured profile id and is removed from the context.
pub fn build(
    def: &StreamDefinition,
    ctx: &mut RequestContext,
    fields: &FieldMetricSet,
) -> Result<PreparedRequest> {
    if let Some(list) = ctx.parent_context.remove(PROFILE_LIST_KEY) {
        let ids = render_ids(&list).ok_or_else(|| {
            Error::invalid_value(PROFILE_LIST_KEY, format!("unsupported value {list}"))
        })?;
        ctx.customer_profile_id = Some(ids);
    }

    match def.request {
        RequestShape::Plain => Ok(plain(ctx)),
        RequestShape::AnalyticsQuery => analytics_query(ctx, fields),
        RequestShape::AnalyticsBody => analytics_body(def, ctx, fields),
    }
}

fn plain(ctx: &RequestContext) -> PreparedRequest {
    let mut params = vec![("limit".to_string(), PAGE_LIMIT.to_string())];
    merge_token_params(&mut params, ctx.next_page_token.as_ref());
    PreparedRequest { params, body: None }
}

fn analytics_query(
    ctx: &RequestContext,
    fields: &FieldMetricSet,
) -> Result<PreparedRequest> {
    let mut params = vec![
        ("limit".to_string(), PAGE_LIMIT.to_string()),
        ("fields".to_string(), fields.fields_csv()),
        ("metrics".to_string(), fields.metrics_csv()),
    ];
    for filter in base_filters(ctx)? {
        params.push(("filters".to_string(), filter));
    }
    params.push(("sort".to_string(), QUERY_SORT.to_string()));
    merge_token_params(&mut params, ctx.next_page_token.as_ref());

    Ok(PreparedRequest { params, body: None })
}

fn analytics_body(
    def: &StreamDefinition,
    ctx: &RequestContext,
    fields: &FieldMetricSet,
) -> Result<PreparedRequest> {
    let mut filters = base_filters(ctx)?;
    let mut page = json!(1);

    match &ctx.next_page_token {
        Some(PageToken::Guid(guid)) => filters.push(guid_filter(guid)),
        Some(PageToken::Page(n)) => page = json!(n),
        Some(PageToken::Next(token)) => page = json!(token),
        None => {}
    }

    let body = json!({
        "fields": fields.fields,
        "metrics": fields.metrics,
        "filters": filters,
        "limit": PAGE_LIMIT,
        "page": page,
        "sort": [body_sort_key(def)],
    });

    Ok(PreparedRequest {
        params: Vec::new(),
        body: Some(body),
    })
}

/// Profile equality and `created_time` window filters
fn base_filters(ctx: &RequestContext) -> Result<Vec<String>> {
    let ids = ctx
        .customer_profile_id
        .as_deref()
        .filter(|ids| !ids.trim().is_empty())
        .ok_or_else(|| Error::missing_field("customer_profile_id"))?;
    let range = ctx
        .date_range
        .as_ref()
        .ok_or_else(|| Error::missing_field("start_date"))?;

    Ok(vec![
        format!("customer_profile_id.eq({ids})"),
        range.created_time_filter(),
    ])
}

/// POST bodies of guid-cursor streams sort by guid so `guid.gt` stays monotonic
fn body_sort_key(def: &StreamDefinition) -> &'static str {
    if def.pagination.is_guid_cursor() {
        "guid:asc"
    } else {
        QUERY_SORT
    }
}

fn guid_filter(guid: &str) -> String {
    format!("guid.gt({guid})")
}

fn merge_token_params(params: &mut Vec<(String, String)>, token: Option<&PageToken>) {
    match token {
        Some(PageToken::Guid(guid)) => params.push(("filters".to_string(), guid_filter(guid))),
        Some(PageToken::Page(n)) => params.push(("page".to_string(), n.to_string())),
        Some(PageToken::Next(next)) => params.push(("page".to_string(), next.clone())),
        None => {}
    }
}

/// Render a parent-supplied id value as a comma-separated list
fn render_ids(value: &JsonValue) -> Option<String> {
    let scalar = |v: &JsonValue| match v {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    };

    match value {
        JsonValue::Array(items) if !items.is_empty() => items
            .iter()
            .map(scalar)
            .collect::<Option<Vec<_>>>()
            .map(|ids| ids.join(",")),
        other => scalar(other),
    }
}
