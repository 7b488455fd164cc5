//! Spawns a web server that listens on localhost. A password must be sent to
//! access the index page via the query string. Try connecting to
//! <http://localhost:8080/> without any query strings, then connect with the
//! query string `?code=my_secret_password`. The authenticator is made for
//! each request, with the request's context and the configured password
//! injected into it. Set `RUST_LOG=runtime_container=trace` to watch the
//! container work.

use actix_web::{get, web::Query, App, HttpResponse, HttpServer, Responder};
use runtime_container_actix::{
    define_module, service, Arguments, Class, Container, InjectResult,
    Injected, RequestContext, Resolver, RuntimeValues, Svc,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

struct QueryRequestAuthenticator {
    context: Svc<RequestContext>,
    password: Svc<String>,
}

impl QueryRequestAuthenticator {
    fn new(context: Svc<RequestContext>, password: Svc<String>) -> Self {
        QueryRequestAuthenticator { context, password }
    }

    fn is_allowed(&self) -> bool {
        #[derive(Deserialize)]
        struct QueryData {
            code: String,
        }

        let query =
            match Query::<QueryData>::from_query(self.context.query_string()) {
                Ok(query) => query,
                Err(_) => return false,
            };

        query.code == *self.password
    }
}

impl Class for QueryRequestAuthenticator {
    const ARITY: usize = 2;

    fn construct(args: Arguments) -> InjectResult<Self> {
        Ok(QueryRequestAuthenticator::new(args.get(0)?, args.get(1)?))
    }
}

fn configure_services() -> InjectResult<Container> {
    let module = define_module! {
        singletons = {
            "auth.password" => |_: Resolver, _: RuntimeValues| async {
                Ok(service(String::from("my_secret_password")))
            },
        },
    };

    let mut builder = Container::builder();
    builder.add_module(module);
    let container = builder.build()?;

    container
        .inject::<QueryRequestAuthenticator>()
        .reflect_fn_with(
            QueryRequestAuthenticator::new,
            [None, Some("auth.password")],
        )?;
    Ok(container)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let container = configure_services().map_err(|error| {
        std::io::Error::new(std::io::ErrorKind::Other, error)
    })?;

    HttpServer::new(move || {
        App::new().app_data(container.clone()).service(index)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

#[get("/")]
async fn index(auth: Injected<QueryRequestAuthenticator>) -> impl Responder {
    if auth.is_allowed() {
        HttpResponse::Ok().body("You got the password right!")
    } else {
        HttpResponse::Forbidden().body("Incorrect password")
    }
}
