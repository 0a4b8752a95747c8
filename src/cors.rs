use rocket::{
    fairing::{Fairing, Info, Kind},
    http::Header,
    options, Request, Response,
};

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

/// Permissive cross-origin policy: any origin, method and header, with credentials.
/// Fine for local development, not for a public deployment.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin Resource Sharing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let headers = request.headers();

        // Credentials are not allowed with a wildcard origin, so echo the caller's.
        match headers.get_one("Origin") {
            Some(origin) => {
                response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_owned()));
                response.set_header(Header::new("Vary", "Origin"));
            }
            None => {
                response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
            }
        }
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
        response.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));

        let allowed_headers = headers
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("*")
            .to_owned();
        response.set_header(Header::new("Access-Control-Allow-Headers", allowed_headers));
    }
}

/// Answers preflight requests for every path.
#[options("/<_..>")]
pub fn preflight() {}
