use axum::{extract::Request, http::Method};

/// Let HTML forms reach PUT, PATCH and DELETE routes.
///
/// Browsers only submit GET and POST, so a POST carrying `_method=<verb>` in
/// its query string is re-dispatched as that verb before routing.
pub fn method_override(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    let overridden = request.uri().query().and_then(override_from_query);
    if let Some(method) = overridden {
        *request.method_mut() = method;
    }

    request
}

fn override_from_query(query: &str) -> Option<Method> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    let (_, value) = pairs.into_iter().find(|(key, _)| key == "_method")?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, uri: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn post_with_override_changes_method() {
        let rewritten = method_override(request(Method::POST, "/students/1?_method=DELETE"));
        assert_eq!(rewritten.method(), Method::DELETE);

        let rewritten = method_override(request(Method::POST, "/students/1?x=1&_method=put"));
        assert_eq!(rewritten.method(), Method::PUT);
    }

    #[test]
    fn override_value_is_percent_decoded() {
        let rewritten = method_override(request(Method::POST, "/students/1?_method=%50UT"));
        assert_eq!(rewritten.method(), Method::PUT);

        let rewritten = method_override(request(Method::POST, "/students/1?%5Fmethod=delete"));
        assert_eq!(rewritten.method(), Method::DELETE);
    }

    #[test]
    fn only_post_is_overridden() {
        let untouched = method_override(request(Method::GET, "/students/1?_method=DELETE"));
        assert_eq!(untouched.method(), Method::GET);
    }

    #[test]
    fn unknown_or_missing_override_is_ignored() {
        let untouched = method_override(request(Method::POST, "/students?_method=CONNECT"));
        assert_eq!(untouched.method(), Method::POST);

        let untouched = method_override(request(Method::POST, "/students"));
        assert_eq!(untouched.method(), Method::POST);
    }
}
