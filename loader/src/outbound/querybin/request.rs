//! Query-bin request URL construction.

use url::Url;

use crate::domain::ports::{QueryBinAction, QueryBinRequest, QueryBinSourceError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the URL for one query-bin call.
///
/// The path is `endpoint/querybin/controller` with exactly one `/` between
/// segments. Any query or fragment on the endpoint is dropped. The metadata call carries no query parameters; the export call
/// carries `action=tweet-export&format=csv` followed by `startdate` and
/// `enddate` when set.
///
/// # Examples
/// ```
/// use querybin_loader::domain::ports::{QueryBinAction, QueryBinRequest};
/// use querybin_loader::outbound::querybin::request_url;
/// use url::Url;
///
/// let endpoint = Url::parse("https://tcat.example.org/api/").expect("valid URL");
/// let request = QueryBinRequest::new("climate", "querybin.php");
/// let url = request_url(&endpoint, &request, QueryBinAction::TweetExport).expect("valid request");
/// assert_eq!(
///     url.as_str(),
///     "https://tcat.example.org/api/climate/querybin.php?action=tweet-export&format=csv"
/// );
/// ```
pub fn request_url(
    endpoint: &Url,
    request: &QueryBinRequest,
    action: QueryBinAction,
) -> Result<Url, QueryBinSourceError> {
    let querybin = segment("querybin", &request.querybin)?;
    let controller = segment("controller", &request.controller)?;
    let base_segments = endpoint
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| QueryBinSourceError::invalid_request("endpoint cannot carry a path"))?
        .clear()
        .extend(base_segments.iter().map(String::as_str))
        .extend([querybin, controller]);

    match action {
        QueryBinAction::Metadata => url.set_query(None),
        QueryBinAction::TweetExport => {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("action", "tweet-export");
            query.append_pair("format", "csv");
            if let Some(start) = request.start_date {
                query.append_pair("startdate", &start.format(DATE_FORMAT).to_string());
            }
            if let Some(end) = request.end_date {
                query.append_pair("enddate", &end.format(DATE_FORMAT).to_string());
            }
        }
    }
    Ok(url)
}

fn segment<'a>(name: &str, raw: &'a str) -> Result<&'a str, QueryBinSourceError> {
    let value = raw.trim().trim_matches('/');
    if value.is_empty() {
        return Err(QueryBinSourceError::invalid_request(format!(
            "{name} must not be empty"
        )));
    }
    if value.contains(['/', '?', '#']) {
        return Err(QueryBinSourceError::invalid_request(format!(
            "{name} must be a single path segment"
        )));
    }
    Ok(value)
}
