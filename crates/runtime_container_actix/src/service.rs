use crate::request_resolver;
use actix_web::{
    dev::Payload, error::ErrorInternalServerError, FromRequest, HttpRequest,
};
use futures_util::future::{err, ok, FutureExt, LocalBoxFuture, Ready};
use runtime_container::{Class, Resolver, Svc};
use std::{fmt::Display, ops::Deref};
use tracing::warn;

/// An injected class. Any class the container can make can be injected by
/// wrapping it in this type and taking it as a parameter of a request
/// handler. It is resolved through the request's [`Resolver`].
///
/// ## Example
///
/// ```no_run
/// use actix_web::{get, App, HttpResponse, HttpServer, Responder};
/// use runtime_container_actix::{
///     service, Arguments, Class, Container, InjectResult, Injected, Svc,
/// };
///
/// struct Answer(Svc<i32>);
///
/// impl Class for Answer {
///     const ARITY: usize = 1;
///
///     fn construct(args: Arguments) -> InjectResult<Self> {
///         Ok(Answer(args.get(0)?))
///     }
/// }
///
/// #[actix_web::main]
/// async fn main() -> std::io::Result<()> {
///     let container = Container::new();
///     container.bind_value("answer", service(42i32)).unwrap();
///     container.inject::<Answer>().constructor(["answer"]).unwrap();
///
///     HttpServer::new(move || {
///         App::new().app_data(container.clone()).service(index)
///     })
///     .bind(("127.0.0.1", 8080))?
///     .run()
///     .await
/// }
///
/// #[get("/")]
/// async fn index(answer: Injected<Answer>) -> impl Responder {
///     HttpResponse::Ok().body(format!("the answer is {}", answer.0))
/// }
/// ```
pub struct Injected<T: Class>(Svc<T>);

impl<T: Class> Injected<T> {
    /// Converts an [`Injected<T>`] to its inner value.
    pub fn into_inner(value: Injected<T>) -> Svc<T> {
        value.0
    }
}

impl<T: Class> Clone for Injected<T> {
    fn clone(&self) -> Self {
        Injected(self.0.clone())
    }
}

impl<T: Class> Deref for Injected<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Class + Display> Display for Injected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Class> FromRequest for Injected<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolver = match request_resolver(req) {
            Ok(resolver) => resolver,
            Err(error) => return err(error).boxed_local(),
        };

        resolver
            .make_class::<T>()
            .map(|result| match result {
                Ok(value) => Ok(Injected(value)),
                Err(error) => {
                    warn!(%error, "failed to inject a request dependency");
                    Err(ErrorInternalServerError(error))
                }
            })
            .boxed_local()
    }
}

/// The [`Resolver`] of the current request. Values bound on it are visible
/// to everything resolved later in the same request, including [`Injected`]
/// parameters that are extracted after it.
#[derive(Clone)]
pub struct Scoped(Resolver);

impl Scoped {
    /// Converts a [`Scoped`] to its inner resolver.
    pub fn into_inner(value: Scoped) -> Resolver {
        value.0
    }
}

impl Deref for Scoped {
    type Target = Resolver;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Scoped {
    type Error = actix_web::Error;
    type Future = Ready<actix_web::Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match request_resolver(req) {
            Ok(resolver) => ok(Scoped(resolver)),
            Err(error) => err(error),
        }
    }
}
