use actix_web::{
    error::ErrorInternalServerError, http::Method, HttpMessage, HttpRequest,
};
use runtime_container::{
    service, Arguments, BindingKey, Class, ClassKey, Container, InjectError,
    InjectResult, Resolver,
};
use tracing::trace;

/// The parts of the current request that services may depend on. It is
/// bound on every request's [`Resolver`], so any class can declare it as a
/// dependency. Outside of a request it can't be constructed.
#[derive(Clone, Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    query_string: String,
    headers: Vec<(String, String)>,
}

impl RequestContext {
    /// Captures the context of a request.
    #[must_use]
    pub fn new(request: &HttpRequest) -> Self {
        let headers = request
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_owned(), value.to_owned()))
            })
            .collect();

        RequestContext {
            method: request.method().clone(),
            path: request.path().to_owned(),
            query_string: request.query_string().to_owned(),
            headers,
        }
    }

    /// The method of the request.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path of the request.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string of the request, without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Gets the first value of a header. Header names are case insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Class for RequestContext {
    fn construct(_args: Arguments) -> InjectResult<Self> {
        Err(InjectError::MissingBinding {
            key: BindingKey::class::<RequestContext>(),
        })
    }
}

/// Gets the [`Resolver`] of a request, creating it the first time it's
/// needed. The [`Container`] must be registered as app data.
pub fn request_resolver(request: &HttpRequest) -> actix_web::Result<Resolver> {
    if let Some(resolver) = request.extensions().get::<Resolver>() {
        return Ok(resolver.clone());
    }

    let container: &Container = request.app_data().ok_or_else(|| {
        ErrorInternalServerError("no container is present in app_data")
    })?;

    let resolver = container.create_resolver();
    resolver
        .bind_value(
            ClassKey::of::<RequestContext>(),
            service(RequestContext::new(request)),
        )
        .map_err(ErrorInternalServerError)?;

    trace!(path = request.path(), "created request resolver");
    request.extensions_mut().insert(resolver.clone());
    Ok(resolver)
}
